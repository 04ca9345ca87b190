//! Error type shared by every stage of the compressor.
//!
//! Nothing in the library terminates the process. Each stage returns a `Result` and the
//! binaries turn a top-level error into a message on standard error and a nonzero exit.

use std::path::PathBuf;

use thiserror::Error;

use crate::compression::flags::Stage;

#[derive(Error, Debug)]
pub enum JlError {
    /// Read cursor is at or past the logical end of a block.
    #[error("attempt to read past end of data block (offset {offset}, used size {used})")]
    OutOfRange { offset: usize, used: usize },

    /// Mapped files are read-only.
    #[error("attempt to write to a read-only file mapping")]
    ReadOnlyBlock,

    #[error("file already {0}")]
    AlreadyApplied(Stage),

    #[error("damaged input file - ends with {0}")]
    CorruptRunLength(&'static str),

    #[error("frequency table out of order: slot {index} holds symbol {symbol}")]
    FrequencyTableOrder { index: usize, symbol: u8 },

    #[error("frequency table damaged: {0}")]
    FrequencyTableDamaged(String),

    #[error("symbol {symbol} occurs in file but has no Huffman pattern")]
    MissingCode { symbol: u8 },

    #[error("symbol {symbol} is unused but has a Huffman pattern")]
    UnexpectedCode { symbol: u8 },

    #[error("Huffman pattern for symbol {symbol} needs {length} bits, more than the pattern field holds")]
    CodeTooLong { symbol: u8, length: usize },

    #[error("file too small to be a compressed file")]
    TooSmall,

    #[error("looks like a compressed file, but cannot understand encoding {0:#04x}")]
    UnknownEncoding(u8),

    #[error("unable to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot have same file for input and output")]
    SameFile,

    #[error("output file {0} already exists")]
    OutputExists(PathBuf),
}

impl JlError {
    /// Wrap an I/O error with the action that failed and the file involved.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        JlError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, JlError>;
