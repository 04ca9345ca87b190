//! File handling around the pipeline: mapping inputs, writing outputs and choosing names.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;
use memmap2::Mmap;

use crate::bitstream::block::Block;
use crate::compression::header::header_bytes;
use crate::error::{JlError, Result};

const COMPRESSED_SUFFIX: &str = "compressed";
const DECOMPRESSED_SUFFIX: &str = "decompressed";

/// Map a file read-only. Empty files cannot be mapped and return None.
pub fn map_read_only(path: &Path) -> Result<Option<Mmap>> {
    let file = File::open(path).map_err(|e| JlError::io("open file", path, e))?;
    let len = file
        .metadata()
        .map_err(|e| JlError::io("get file length for", path, e))?
        .len();
    if len == 0 {
        return Ok(None);
    }
    // SAFETY: the mapping is read-only and private. Truncating the file underneath a running
    // compressor is outside what it guards against, as with any mmap based reader.
    let map = unsafe { Mmap::map(&file) }.map_err(|e| JlError::io("map file", path, e))?;
    Ok(Some(map))
}

/// File size in bytes.
pub fn file_size(path: &Path) -> Result<u64> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| JlError::io("get file length for", path, e))
}

/// Create `path` and write the used bytes of the block to it, preceded by the header when
/// `write_header` is set.
pub fn create_file(path: &Path, block: &Block, write_header: bool) -> Result<()> {
    let file = File::create(path).map_err(|e| JlError::io("create", path, e))?;
    let mut out = BufWriter::new(file);
    if write_header {
        out.write_all(&header_bytes(block.encoding))
            .map_err(|e| JlError::io("write header to", path, e))?;
    }
    out.write_all(block.as_slice())
        .map_err(|e| JlError::io("write to", path, e))?;
    out.flush().map_err(|e| JlError::io("close", path, e))?;
    debug!("Wrote {} bytes to {}", block.len(), path.display());
    Ok(())
}

/// Output name for an input file. Compressing appends ".compressed", decompressing appends
/// ".decompressed"; an input already carrying the opposite suffix has it replaced.
pub fn make_output_filename(input: &Path, compressing: bool) -> PathBuf {
    let (check_for, append) = if compressing {
        (DECOMPRESSED_SUFFIX, COMPRESSED_SUFFIX)
    } else {
        (COMPRESSED_SUFFIX, DECOMPRESSED_SUFFIX)
    };
    if input.extension() == Some(OsStr::new(check_for)) {
        return input.with_extension(append);
    }
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(append);
    PathBuf::from(name)
}

/// Refuse to read and write the same file, or to replace an existing output unless forced.
pub fn check_output(input: &Path, output: &Path, force: bool) -> Result<()> {
    if input == output {
        return Err(JlError::SameFile);
    }
    if !force && output.exists() {
        return Err(JlError::OutputExists(output.to_path_buf()));
    }
    Ok(())
}
