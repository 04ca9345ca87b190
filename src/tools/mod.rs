//! The tools module provides the stages that are not Huffman coding and the helpers around
//! the pipeline.
//!
//! The tools are:
//! - cli: Command line options for both binaries.
//! - file_io: Mapping, writing and naming files.
//! - flip: Bit plane transpose.
//! - report: Size statistics.
//! - rle: Run length encoding.

pub mod cli;
pub mod file_io;
pub mod flip;
pub mod report;
pub mod rle;
