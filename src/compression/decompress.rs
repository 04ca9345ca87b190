use std::path::Path;

use log::info;

use crate::bitstream::block::Block;
use crate::error::Result;
use crate::huffman_coding::huffman::huffman_decompress;
use crate::tools::file_io::create_file;
use crate::tools::flip::unflip_bit_order;
use crate::tools::rle::run_length_decompress;

/// Reverse whatever stages the block's flags say were applied, last stage first. Stages
/// that were not applied are skipped.
pub fn decompress_block(mut block: Block) -> Result<Block> {
    if let Some(next) = huffman_decompress(&mut block)? {
        block.dispose();
        block = next;
    }

    if let Some(next) = run_length_decompress(&block)? {
        block.dispose();
        block = next;
    }

    if let Some(next) = unflip_bit_order(&mut block)? {
        block.dispose();
        block = next;
    }

    Ok(block)
}

/// Decompress `input` into `output`. The stages to undo come from the header of `input`.
pub fn decompress(input: &Path, output: &Path) -> Result<()> {
    info!("Decompressing {} to {}", input.display(), output.display());
    let block = Block::map_compressed(input)?;
    let block = decompress_block(block)?;
    create_file(output, &block, false)?;
    block.dispose();
    Ok(())
}
