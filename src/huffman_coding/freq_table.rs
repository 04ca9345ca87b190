//! Symbol frequency table and its sparse serialized form.
//!
//! Stored layout, after the 8 byte length written by the Huffman stage:
//!
//! ```text
//! <number of entries less one>                       1 byte
//! <symbol> <bytes in frequency> <frequency, LSB first>   for each symbol present, ascending
//! ```
//!
//! The count is stored less one because a table can hold all 256 symbols but never none.

use log::trace;

use crate::bitstream::block::Block;
use crate::error::{JlError, Result};

pub const FREQUENCY_TABLE_SIZE: usize = 256;

/// One row of the table. `pattern_len` is 0 while the symbol has no code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrequencyEntry {
    pub symbol: u8,
    pub frequency: u64,
    pub pattern: u64,
    pub pattern_len: u8,
}

/// Frequencies and codes for every byte value. Slot `i` always describes symbol `i`.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    entries: [FrequencyEntry; FREQUENCY_TABLE_SIZE],
}

impl FrequencyTable {
    /// An empty table, every symbol with frequency 0.
    pub fn new() -> Self {
        let mut entries = [FrequencyEntry::default(); FREQUENCY_TABLE_SIZE];
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.symbol = i as u8;
        }
        Self { entries }
    }

    /// Count how often each byte value occurs in `data`.
    pub fn from_data(data: &[u8]) -> Self {
        let mut table = Self::new();
        data.iter()
            .for_each(|&el| table.entries[el as usize].frequency += 1);
        table
    }

    pub fn entry(&self, symbol: u8) -> &FrequencyEntry {
        &self.entries[symbol as usize]
    }

    pub fn entry_mut(&mut self, symbol: u8) -> &mut FrequencyEntry {
        &mut self.entries[symbol as usize]
    }

    /// Entries for symbols that occur, in ascending symbol order.
    pub fn present(&self) -> impl Iterator<Item = &FrequencyEntry> + '_ {
        self.entries.iter().filter(|e| e.frequency > 0)
    }

    /// Total number of symbols counted.
    pub fn total(&self) -> u64 {
        self.present()
            .fold(0_u64, |sum, e| sum.saturating_add(e.frequency))
    }

    /// Number of bits the counted data needs with the assigned codes.
    pub fn encoded_bits(&self) -> u64 {
        self.present()
            .map(|e| e.frequency * e.pattern_len as u64)
            .sum()
    }

    /// Check that each slot still describes its own symbol.
    pub fn check_order(&self) -> Result<()> {
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.symbol as usize != index {
                return Err(JlError::FrequencyTableOrder {
                    index,
                    symbol: entry.symbol,
                });
            }
        }
        Ok(())
    }

    /// Check that every symbol that occurs has a code, and no other symbol does.
    pub fn check_codes(&self) -> Result<()> {
        for entry in self.entries.iter() {
            if entry.frequency > 0 && entry.pattern_len == 0 {
                return Err(JlError::MissingCode {
                    symbol: entry.symbol,
                });
            }
            if entry.frequency == 0 && entry.pattern_len != 0 {
                return Err(JlError::UnexpectedCode {
                    symbol: entry.symbol,
                });
            }
        }
        Ok(())
    }

    /// Write the sparse form of the table. The table must have at least one symbol.
    pub fn write_to(&self, out: &mut Block) -> Result<()> {
        self.check_order()?;
        let count = self.present().count();
        if count == 0 {
            return Err(JlError::FrequencyTableDamaged(
                "no symbols to write".to_string(),
            ));
        }
        out.write_byte((count - 1) as u8)?;

        for entry in self.present() {
            let byte_count = (8 - entry.frequency.leading_zeros() / 8) as usize;
            out.write_byte(entry.symbol)?;
            out.write_byte(byte_count as u8)?;
            for &byte in entry.frequency.to_le_bytes().iter().take(byte_count) {
                out.write_byte(byte)?;
            }
        }
        trace!("Wrote frequency table with {} entries", count);
        Ok(())
    }

    /// Read the sparse form of the table from the read cursor of `input`.
    pub fn read_from(input: &mut Block) -> Result<Self> {
        let mut table = Self::new();
        let count = input.read_byte()? as usize + 1;
        let mut previous: Option<u8> = None;

        for _ in 0..count {
            let symbol = input.read_byte()?;
            if previous.map_or(false, |p| p >= symbol) {
                return Err(JlError::FrequencyTableDamaged(format!(
                    "symbol {} out of order",
                    symbol
                )));
            }
            previous = Some(symbol);

            let byte_count = input.read_byte()? as usize;
            if byte_count > 8 {
                return Err(JlError::FrequencyTableDamaged(format!(
                    "frequency of symbol {} has {} bytes",
                    symbol, byte_count
                )));
            }
            let mut frequency = 0_u64;
            for byte_number in 0..byte_count {
                frequency |= (input.read_byte()? as u64) << (byte_number * 8);
            }
            if frequency == 0 {
                return Err(JlError::FrequencyTableDamaged(format!(
                    "symbol {} stored with no occurrences",
                    symbol
                )));
            }
            table.entries[symbol as usize].frequency = frequency;
        }
        table.check_order()?;
        trace!("Read frequency table with {} entries", count);
        Ok(table)
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compression::flags::EncodingFlags;

    #[test]
    fn from_data_test() {
        let table = FrequencyTable::from_data(b"abracadabra");
        assert_eq!(table.entry(b'a').frequency, 5);
        assert_eq!(table.entry(b'b').frequency, 2);
        assert_eq!(table.entry(b'z').frequency, 0);
        assert_eq!(table.present().count(), 5);
        assert_eq!(table.total(), 11);
        assert!(table.check_order().is_ok());
    }

    #[test]
    fn write_layout_test() {
        let mut data = vec![b'a'; 300];
        data.push(b'b');
        let table = FrequencyTable::from_data(&data);
        let mut out = Block::new(8);
        table.write_to(&mut out).unwrap();
        // 300 = 0x012c, written least significant byte first
        assert_eq!(out.as_slice(), &[1, b'a', 2, 0x2c, 0x01, b'b', 1, 1]);
    }

    #[test]
    fn full_table_count_test() {
        let data: Vec<u8> = (0..=255).collect();
        let table = FrequencyTable::from_data(&data);
        let mut out = Block::new(8);
        table.write_to(&mut out).unwrap();
        assert_eq!(out.as_slice()[0], 255);

        let mut input = Block::from_bytes(out.to_vec(), EncodingFlags::empty());
        let read = FrequencyTable::read_from(&mut input).unwrap();
        assert_eq!(read.present().count(), 256);
        assert!(read.present().all(|e| e.frequency == 1));
    }

    #[test]
    fn read_table_test() {
        let bytes = vec![1, b'a', 2, 0x2c, 0x01, b'b', 1, 1];
        let mut input = Block::from_bytes(bytes, EncodingFlags::empty());
        let table = FrequencyTable::read_from(&mut input).unwrap();
        assert_eq!(table.entry(b'a').frequency, 300);
        assert_eq!(table.entry(b'b').frequency, 1);
        assert_eq!(table.entry(b'c').frequency, 0);
    }

    #[test]
    fn read_unordered_test() {
        let bytes = vec![1, b'b', 1, 1, b'a', 1, 1];
        let mut input = Block::from_bytes(bytes, EncodingFlags::empty());
        assert!(matches!(
            FrequencyTable::read_from(&mut input),
            Err(JlError::FrequencyTableDamaged(_))
        ));
    }

    #[test]
    fn read_oversize_frequency_test() {
        let bytes = vec![0, b'a', 9, 1, 1, 1, 1, 1, 1, 1, 1, 1];
        let mut input = Block::from_bytes(bytes, EncodingFlags::empty());
        assert!(matches!(
            FrequencyTable::read_from(&mut input),
            Err(JlError::FrequencyTableDamaged(_))
        ));
    }

    #[test]
    fn read_truncated_test() {
        let mut input = Block::from_bytes(vec![2, b'a', 1], EncodingFlags::empty());
        assert!(matches!(
            FrequencyTable::read_from(&mut input),
            Err(JlError::OutOfRange { .. })
        ));
    }

    #[test]
    fn check_order_test() {
        let mut table = FrequencyTable::new();
        table.entry_mut(3).symbol = 4;
        assert!(matches!(
            table.check_order(),
            Err(JlError::FrequencyTableOrder { index: 3, symbol: 4 })
        ));
    }

    #[test]
    fn check_codes_test() {
        let mut table = FrequencyTable::from_data(b"a");
        assert!(matches!(
            table.check_codes(),
            Err(JlError::MissingCode { symbol: b'a' })
        ));
        table.entry_mut(b'a').pattern_len = 1;
        assert!(table.check_codes().is_ok());
        table.entry_mut(b'q').pattern_len = 2;
        assert!(matches!(
            table.check_codes(),
            Err(JlError::UnexpectedCode { symbol: b'q' })
        ));
    }
}
