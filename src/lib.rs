//! A small file compressor built from three reversible stages: a bit plane flip, run length
//! encoding and whole-file Huffman coding.
//!
//! The stages used are recorded in a 5 byte header, so decompression needs no options.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> jlcompress test.txt`
//!
//! This will create the file test.txt.compressed. Running `jlcompress` (or `jldecompress`)
//! on that file creates test.txt.decompressed.
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use bitstream::block::Block;
pub use compression::compress::{compress, compress_block, CompressionStages};
pub use compression::decompress::{decompress, decompress_block};
pub use compression::flags::{EncodingFlags, Stage};
pub use error::{JlError, Result};
