//! The huffman module encodes a whole block with a single Huffman table.
//!
//! The table of symbol frequencies is stored ahead of the codes, so the decoder can rebuild
//! exactly the tree the encoder used. Tree building is deterministic: ties between equal
//! weights are always broken the same way.

pub mod freq_table;
pub mod huffman;
pub mod huffman_tree;
