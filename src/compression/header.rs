//! Compressed file header: the magic "JLCM" followed by one byte of encoding flags.
//!
//! A file that is too short, or does not start with the magic, is simply not compressed.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::info;

use super::flags::{EncodingFlags, Stage};
use crate::error::{JlError, Result};

pub const HEADER_SIZE: usize = 5;
const MAGIC: &[u8; 4] = b"JLCM";

/// Build the header for a block with the given flags.
pub fn header_bytes(flags: EncodingFlags) -> [u8; HEADER_SIZE] {
    let mut header = [0; HEADER_SIZE];
    header[..MAGIC.len()].copy_from_slice(MAGIC);
    header[HEADER_SIZE - 1] = flags.bits();
    header
}

/// Decode the flags from the start of a file. Anything without a complete header is
/// uncompressed. Flag bits that no stage owns are an error.
pub fn parse_flags(bytes: &[u8]) -> Result<EncodingFlags> {
    if bytes.len() < HEADER_SIZE || &bytes[..MAGIC.len()] != MAGIC {
        return Ok(EncodingFlags::empty());
    }
    EncodingFlags::from_bits(bytes[HEADER_SIZE - 1])
}

/// Return the compression flags of a file, optionally logging what they mean.
pub fn read_flags(path: &Path, describe: bool) -> Result<EncodingFlags> {
    let file = File::open(path).map_err(|e| JlError::io("open file", path, e))?;
    let mut buffer = Vec::with_capacity(HEADER_SIZE);
    file.take(HEADER_SIZE as u64)
        .read_to_end(&mut buffer)
        .map_err(|e| JlError::io("read file", path, e))?;

    let flags = parse_flags(&buffer)?;
    if describe {
        describe_flags(flags);
    }
    Ok(flags)
}

/// Log a line for each stage applied.
pub fn describe_flags(flags: EncodingFlags) {
    if flags.is_empty() {
        info!("* File is not compressed");
        return;
    }
    for stage in flags.stages() {
        match stage {
            Stage::Flip => info!("* File is flipped"),
            Stage::RunLength => info!("* File is run length encoded"),
            Stage::Huffman => info!("* File is Huffman encoded"),
        }
    }
}
