use std::path::Path;

use log::info;

use crate::bitstream::block::Block;
use crate::error::Result;
use crate::huffman_coding::huffman::huffman_compress;
use crate::tools::file_io::create_file;
use crate::tools::flip::flip_bit_order;
use crate::tools::rle::run_length_compress;

/// Which stages to apply when compressing. They always run in the order flip, run length,
/// Huffman.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStages {
    pub flip: bool,
    pub rle: bool,
    pub huffman: bool,
}

impl CompressionStages {
    /// Stages named explicitly by the user. Naming none gives the default.
    pub fn explicit(flip: bool, rle: bool, huffman: bool) -> Self {
        if flip || rle || huffman {
            Self { flip, rle, huffman }
        } else {
            Self::default()
        }
    }
}

impl Default for CompressionStages {
    /// Run length then Huffman, no flip.
    fn default() -> Self {
        Self {
            flip: false,
            rle: true,
            huffman: true,
        }
    }
}

/// Run the selected stages over a block. Each stage's input is released as soon as its
/// output exists.
pub fn compress_block(mut block: Block, stages: &CompressionStages) -> Result<Block> {
    if stages.flip {
        let next = flip_bit_order(&block)?;
        block.dispose();
        block = next;
    }

    if stages.rle {
        let next = run_length_compress(&block)?;
        block.dispose();
        block = next;
    }

    if stages.huffman {
        let next = huffman_compress(&block)?;
        block.dispose();
        block = next;
    }

    Ok(block)
}

/// Compress `input` into `output`, writing the header that records the stages used.
pub fn compress(stages: &CompressionStages, input: &Path, output: &Path) -> Result<()> {
    info!("Compressing {} to {}", input.display(), output.display());
    let block = Block::map_uncompressed(input)?;
    let block = compress_block(block, stages)?;
    create_file(output, &block, true)?;
    block.dispose();
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compression::flags::{EncodingFlags, Stage};
    use crate::error::JlError;

    #[test]
    fn explicit_stages_test() {
        assert_eq!(
            CompressionStages::explicit(false, false, false),
            CompressionStages::default()
        );
        let flip_only = CompressionStages::explicit(true, false, false);
        assert!(flip_only.flip && !flip_only.rle && !flip_only.huffman);
    }

    #[test]
    fn flags_recorded_test() {
        let block = Block::from_bytes(b"aaaaaaaabbbb".to_vec(), EncodingFlags::empty());
        let stages = CompressionStages {
            flip: true,
            rle: true,
            huffman: true,
        };
        let packed = compress_block(block, &stages).unwrap();
        assert_eq!(packed.encoding.bits(), 0x07);
    }

    #[test]
    fn refuse_double_flip_test() {
        let flags = EncodingFlags::empty().apply(Stage::Flip).unwrap();
        let block = Block::from_bytes(b"abc".to_vec(), flags);
        let stages = CompressionStages::explicit(true, false, false);
        assert!(matches!(
            compress_block(block, &stages),
            Err(JlError::AlreadyApplied(Stage::Flip))
        ));
    }
}
