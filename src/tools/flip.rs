//! Bit plane transform. The flipped block holds the most significant bit of every byte, then
//! the next most significant bit of every byte, and so on down to bit 0.
//!
//! The size never changes. The transform does not compress anything by itself; it only
//! regroups bits ahead of the other stages.

use log::debug;

use crate::bitstream::block::{get_bit, set_bit, Block};
use crate::compression::flags::Stage;
use crate::error::Result;
use crate::tools::report::stage_statistics;

/// Flip a block into bit plane order.
pub fn flip_bit_order(input: &Block) -> Result<Block> {
    let encoding = input.encoding.apply(Stage::Flip)?;
    let data = input.as_slice();
    let mut out = Block::new(data.len());

    for bit_number in (0..8).rev() {
        for &byte in data {
            out.write_bit(get_bit(bit_number, byte))?;
        }
    }
    out.encoding = encoding;

    stage_statistics("Flipping bit order", data.len(), out.len());
    Ok(out)
}

/// Reverse `flip_bit_order`. Returns None when the block is not flipped.
pub fn unflip_bit_order(input: &mut Block) -> Result<Option<Block>> {
    if !input.encoding.contains(Stage::Flip) {
        debug!("Block does not have bit order flipped");
        return Ok(None);
    }
    input.reset_read_cursor();
    let size = input.len();
    let mut data = vec![0_u8; size];

    for bit_number in (0..8).rev() {
        for byte in data.iter_mut() {
            set_bit(bit_number, byte, input.read_bit()?);
        }
    }
    let out = Block::from_bytes(data, input.encoding.remove(Stage::Flip));

    stage_statistics("Unflipping bit order", size, out.len());
    Ok(Some(out))
}
