//! Encoding flags recorded in a block and in the compressed file header.
//!
//! Each stage owns one bit. Compressing with a stage whose bit is already set is an error;
//! decompressing a stage whose bit is clear is a no-op.

use std::{fmt::Display, fmt::Formatter};

use crate::error::{JlError, Result};

/// The three stages of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Flip,
    RunLength,
    Huffman,
}

impl Stage {
    /// Header bit owned by this stage.
    pub fn bit(self) -> u8 {
        match self {
            Stage::RunLength => EncodingFlags::RUN_LENGTH,
            Stage::Flip => EncodingFlags::FLIPPED,
            Stage::Huffman => EncodingFlags::HUFFMAN,
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Flip => write!(f, "has bit order flipped"),
            Stage::RunLength => write!(f, "run length encoded"),
            Stage::Huffman => write!(f, "Huffman encoded"),
        }
    }
}

/// Bitmask of the stages applied to a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodingFlags(u8);

impl EncodingFlags {
    pub const RUN_LENGTH: u8 = 0x01;
    pub const FLIPPED: u8 = 0x02;
    pub const HUFFMAN: u8 = 0x04;
    const KNOWN: u8 = Self::RUN_LENGTH | Self::FLIPPED | Self::HUFFMAN;

    pub fn empty() -> Self {
        EncodingFlags(0)
    }

    /// Build flags from a header byte, rejecting bits no stage owns.
    pub fn from_bits(bits: u8) -> Result<Self> {
        if bits & !Self::KNOWN != 0 {
            return Err(JlError::UnknownEncoding(bits));
        }
        Ok(EncodingFlags(bits))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, stage: Stage) -> bool {
        self.0 & stage.bit() != 0
    }

    /// Flags with `stage` added. Fails if the stage was already applied.
    pub fn apply(self, stage: Stage) -> Result<Self> {
        if self.contains(stage) {
            return Err(JlError::AlreadyApplied(stage));
        }
        Ok(EncodingFlags(self.0 | stage.bit()))
    }

    /// Flags with `stage` removed.
    pub fn remove(self, stage: Stage) -> Self {
        EncodingFlags(self.0 & !stage.bit())
    }

    /// Stages present, in the order they were applied during compression.
    pub fn stages(self) -> impl Iterator<Item = Stage> {
        [Stage::Flip, Stage::RunLength, Stage::Huffman]
            .into_iter()
            .filter(move |&s| self.contains(s))
    }
}
