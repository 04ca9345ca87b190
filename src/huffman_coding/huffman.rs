use log::{debug, info, trace};

use super::freq_table::FrequencyTable;
use super::huffman_tree::HuffmanTree;
use crate::bitstream::block::Block;
use crate::compression::flags::Stage;
use crate::error::{JlError, Result};
use crate::tools::report::stage_statistics;

/// Size of the stored length of the original data.
const LENGTH_BYTES: usize = std::mem::size_of::<u64>();

/// Huffman encode a block into a new block.
///
/// Output: the input length (8 bytes, native order), the frequency table, then the code of
/// every input byte, most significant code bit first. Empty input is stored as the length
/// alone.
pub fn huffman_compress(input: &Block) -> Result<Block> {
    let encoding = input.encoding.apply(Stage::Huffman)?;
    let data = input.as_slice();
    let mut out = Block::new(data.len());
    out.encoding = encoding;

    for byte in (data.len() as u64).to_ne_bytes() {
        out.write_byte(byte)?;
    }
    if data.is_empty() {
        stage_statistics("Huffman compressing", 0, out.len());
        return Ok(out);
    }

    // Count the symbols, build the tree, and get the codes.
    let mut table = FrequencyTable::from_data(data);
    let tree = HuffmanTree::build(&table).ok_or_else(|| {
        JlError::FrequencyTableDamaged("no symbols in non-empty input".to_string())
    })?;
    tree.assign_codes(&mut table)?;
    tree.dispose();
    table.check_codes()?;
    debug!(
        "Huffman table has {} symbols, {} bits of codes",
        table.present().count(),
        table.encoded_bits()
    );

    table.write_to(&mut out)?;
    trace!("Code stream starts at byte {}", out.len());

    // Encode
    for &symbol in data {
        let entry = table.entry(symbol);
        for shift in (0..entry.pattern_len).rev() {
            out.write_bit((entry.pattern >> shift) & 1 == 1)?;
        }
    }

    stage_statistics("Huffman compressing", data.len(), out.len());
    Ok(out)
}

/// Undo Huffman encoding. Returns None when the block is not Huffman encoded.
pub fn huffman_decompress(input: &mut Block) -> Result<Option<Block>> {
    if !input.encoding.contains(Stage::Huffman) {
        debug!("Block is not Huffman encoded");
        return Ok(None);
    }
    input.reset_read_cursor();

    let mut length = [0_u8; LENGTH_BYTES];
    for byte in length.iter_mut() {
        *byte = input.read_byte()?;
    }
    let length = u64::from_ne_bytes(length);
    info!("Original length is {} bytes", length);

    let encoding = input.encoding.remove(Stage::Huffman);
    if length == 0 {
        let mut out = Block::new(0);
        out.encoding = encoding;
        stage_statistics("Huffman decompressing", input.len(), 0);
        return Ok(Some(out));
    }

    let table = FrequencyTable::read_from(input)?;
    if table.total() != length {
        return Err(JlError::FrequencyTableDamaged(format!(
            "frequencies add up to {}, expected {}",
            table.total(),
            length
        )));
    }
    // Every code is at least one bit long.
    let bits_left = (input.len() as u64).saturating_mul(8);
    if length > bits_left {
        return Err(JlError::FrequencyTableDamaged(format!(
            "{} bytes cannot be coded in {} bits",
            length, bits_left
        )));
    }
    let tree = HuffmanTree::build(&table).ok_or_else(|| {
        JlError::FrequencyTableDamaged("no symbols in table".to_string())
    })?;

    let mut out = Block::new(length as usize);
    out.encoding = encoding;
    let mut cursor = tree.cursor();
    let mut remaining = length;
    while remaining > 0 {
        let bit = input.read_bit()?;
        if let Some(symbol) = tree.step(&mut cursor, bit) {
            out.write_byte(symbol)?;
            remaining -= 1;
        }
    }
    tree.dispose();

    stage_statistics("Huffman decompressing", input.len(), out.len());
    Ok(Some(out))
}
