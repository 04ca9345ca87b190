//! Run length coding using a repeat marker and an escape marker.
//!
//! Encoded form:
//! - `REPEAT, count, byte` stands for `count + 1` copies of `byte`, with a count of 0 standing
//!   for 256 copies. Longer runs are split.
//! - `ESCAPE, byte` stands for a literal `byte`. Only the two marker values are escaped.
//! - Any other byte stands for itself.
//!
//! Runs shorter than four are left as literals unless the byte is a marker, since the repeat
//! form would be no shorter.

use log::debug;

use crate::bitstream::block::Block;
use crate::compression::flags::Stage;
use crate::error::{JlError, Result};
use crate::tools::report::stage_statistics;

/// Markers are byte values which rarely appear in text, so they rarely need escaping.
pub const REPEAT_SYMBOL: u8 = 235;
pub const ESCAPE_SYMBOL: u8 = 236;

/// Shortest run worth writing in the repeat form.
const MIN_RUN: usize = 4;
/// Longest run a single repeat can describe.
const MAX_RUN: usize = 256;

#[inline(always)]
fn is_marker(byte: u8) -> bool {
    byte == REPEAT_SYMBOL || byte == ESCAPE_SYMBOL
}

/// Write a single byte, escaping it if it is a marker.
fn write_literal(out: &mut Block, byte: u8) -> Result<()> {
    if is_marker(byte) {
        out.write_byte(ESCAPE_SYMBOL)?;
    }
    out.write_byte(byte)?;
    Ok(())
}

/// Write `run` (1..=256) copies of `byte`.
fn write_run(out: &mut Block, byte: u8, run: usize) -> Result<()> {
    if run == 1 || (run < MIN_RUN && !is_marker(byte)) {
        for _ in 0..run {
            write_literal(out, byte)?;
        }
    } else {
        // Count is the number of copies after the first. 0 is used for a full run.
        let count = if run == MAX_RUN { 0 } else { (run - 1) as u8 };
        out.write_byte(REPEAT_SYMBOL)?;
        out.write_byte(count)?;
        out.write_byte(byte)?;
    }
    Ok(())
}

/// Run length encode a block into a new block.
pub fn run_length_compress(input: &Block) -> Result<Block> {
    let encoding = input.encoding.apply(Stage::RunLength)?;
    let data = input.as_slice();
    let mut out = Block::new(data.len());
    out.encoding = encoding;

    let mut idx = 0;
    while idx < data.len() {
        let byte = data[idx];
        // Length of the run starting here, capped at what one repeat can hold.
        let run = data[idx..]
            .iter()
            .take(MAX_RUN)
            .take_while(|&&b| b == byte)
            .count();
        write_run(&mut out, byte, run)?;
        idx += run;
    }

    stage_statistics("Run length encoding", data.len(), out.len());
    Ok(out)
}

/// Undo run length encoding. Returns None when the block is not run length encoded.
pub fn run_length_decompress(input: &Block) -> Result<Option<Block>> {
    if !input.encoding.contains(Stage::RunLength) {
        debug!("Block is not run length encoded");
        return Ok(None);
    }
    let data = input.as_slice();
    let mut out = Block::new(data.len());
    out.encoding = input.encoding.remove(Stage::RunLength);

    let mut bytes = data.iter().copied();
    while let Some(byte) = bytes.next() {
        match byte {
            ESCAPE_SYMBOL => {
                let literal = bytes
                    .next()
                    .ok_or(JlError::CorruptRunLength("escape symbol"))?;
                out.write_byte(literal)?;
            }
            REPEAT_SYMBOL => {
                let count = bytes
                    .next()
                    .ok_or(JlError::CorruptRunLength("repeat symbol"))?;
                let repeated = bytes
                    .next()
                    .ok_or(JlError::CorruptRunLength("repeat count"))?;
                let copies = if count == 0 {
                    MAX_RUN
                } else {
                    count as usize + 1
                };
                for _ in 0..copies {
                    out.write_byte(repeated)?;
                }
            }
            _ => {
                out.write_byte(byte)?;
            }
        }
    }

    stage_statistics("Run length decoding", data.len(), out.len());
    Ok(Some(out))
}
