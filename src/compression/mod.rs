//! The compression module runs the stages in order and records which were applied.
//!
//! Compression happens in the following steps, each optional:
//! - Flip: transpose the bit planes of the data.
//! - Run length encoding: replace runs of 4 or more identical bytes.
//! - Huffman coding: encode frequent byte values with shorter bit codes.
//!
//! Decompression undoes the applied stages in reverse order, as recorded in the file header.

pub mod compress;
pub mod decompress;
pub mod flags;
pub mod header;
