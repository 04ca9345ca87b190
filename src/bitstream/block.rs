//! Block: A module for the jlcompress pipeline.
//!
//! A block holds the entire contents of a file as it moves through the stages. It has a
//! write cursor and an independent read cursor, each addressable down to the bit. Blocks are
//! either owned memory that grows as it is written, or a read-only mapping of an input file.
//!
//! NOTE: Stages may scan `as_slice()` directly for speed. That view always covers exactly the
//! bytes between 0 and the used size, so it stays consistent with the cursors.
//!

use std::path::Path;

use log::{debug, trace};
use memmap2::Mmap;

use crate::compression::flags::EncodingFlags;
use crate::compression::header::{parse_flags, HEADER_SIZE};
use crate::error::{JlError, Result};
use crate::tools::file_io::map_read_only;

/// Where the bytes of a block came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Memory,
    CompressedFile,
    UncompressedFile,
}

#[derive(Debug)]
enum Storage {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

/// Growable, bit addressable byte buffer.
#[derive(Debug)]
pub struct Block {
    storage: Storage,
    /// Start of the visible data in the storage. Non zero only for a compressed file, where
    /// the header is hidden from the stages.
    start: usize,
    allocated_size: usize,
    used_size: usize,

    next_free_byte: usize,
    next_free_bit: u8,

    next_byte_to_read: usize,
    next_bit_to_read: u8,

    /// Stages applied to the data in this block.
    pub encoding: EncodingFlags,
    provenance: Provenance,
}

impl Block {
    /// Allocate an empty in-memory block with room for `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            storage: Storage::Owned(vec![0; size]),
            start: 0,
            allocated_size: size,
            used_size: 0,
            next_free_byte: 0,
            next_free_bit: 0,
            next_byte_to_read: 0,
            next_bit_to_read: 0,
            encoding: EncodingFlags::empty(),
            provenance: Provenance::Memory,
        }
    }

    /// Wrap existing data in an in-memory block. The write cursor sits after the data.
    pub fn from_bytes(data: Vec<u8>, encoding: EncodingFlags) -> Self {
        let size = data.len();
        Self {
            storage: Storage::Owned(data),
            start: 0,
            allocated_size: size,
            used_size: size,
            next_free_byte: size,
            next_free_bit: 0,
            next_byte_to_read: 0,
            next_bit_to_read: 0,
            encoding,
            provenance: Provenance::Memory,
        }
    }

    /// Map an uncompressed file read-only. The size is taken from the mapping itself.
    pub fn map_uncompressed(path: &Path) -> Result<Self> {
        let storage = match map_read_only(path)? {
            Some(map) => Storage::Mapped(map),
            None => Storage::Owned(Vec::new()),
        };
        let size = match &storage {
            Storage::Mapped(map) => map.len(),
            Storage::Owned(v) => v.len(),
        };
        debug!("Mapped {} ({} bytes)", path.display(), size);
        Ok(Self {
            storage,
            start: 0,
            allocated_size: size,
            used_size: size,
            next_free_byte: size,
            next_free_bit: 0,
            next_byte_to_read: 0,
            next_bit_to_read: 0,
            encoding: EncodingFlags::empty(),
            provenance: Provenance::UncompressedFile,
        })
    }

    /// Map a compressed file read-only. The header is read into `encoding` and hidden, so the
    /// stages see only the data that follows it.
    pub fn map_compressed(path: &Path) -> Result<Self> {
        let map = map_read_only(path)?.ok_or(JlError::TooSmall)?;
        if map.len() < HEADER_SIZE {
            return Err(JlError::TooSmall);
        }
        let encoding = parse_flags(&map[..HEADER_SIZE])?;
        let size = map.len() - HEADER_SIZE;
        debug!(
            "Mapped compressed {} ({} bytes after header, flags {:#04x})",
            path.display(),
            size,
            encoding.bits()
        );
        Ok(Self {
            storage: Storage::Mapped(map),
            start: HEADER_SIZE,
            allocated_size: size,
            used_size: size,
            next_free_byte: size,
            next_free_bit: 0,
            next_byte_to_read: 0,
            next_bit_to_read: 0,
            encoding,
            provenance: Provenance::CompressedFile,
        })
    }

    /// Release the block, unmapping or freeing its storage.
    pub fn dispose(self) {
        trace!(
            "Releasing {:?} block of {} bytes",
            self.provenance,
            self.allocated_size
        );
        drop(self)
    }

    /// Logical content length in bytes.
    pub fn len(&self) -> usize {
        self.used_size
    }

    pub fn is_empty(&self) -> bool {
        self.used_size == 0
    }

    pub fn allocated_size(&self) -> usize {
        self.allocated_size
    }

    /// The used bytes of the block.
    pub fn as_slice(&self) -> &[u8] {
        let bytes = match &self.storage {
            Storage::Owned(v) => v.as_slice(),
            Storage::Mapped(m) => &m[..],
        };
        &bytes[self.start..self.start + self.used_size]
    }

    /// Copy out the used bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }

    /// Owned storage for writing, grown so that `index` is addressable.
    fn writable(&mut self, index: usize) -> Result<&mut Vec<u8>> {
        let data = match &mut self.storage {
            Storage::Owned(v) => v,
            Storage::Mapped(_) => return Err(JlError::ReadOnlyBlock),
        };
        // Grow by half again each time. Never shrink.
        while index >= self.allocated_size {
            let new_size = (self.allocated_size + (self.allocated_size + 1) / 2)
                .max(self.allocated_size + 1);
            trace!("Growing block from {} to {} bytes", self.allocated_size, new_size);
            data.resize(new_size, 0);
            self.allocated_size = new_size;
        }
        Ok(data)
    }

    /// Append a byte at the write cursor, returning the offset it was written to. A partly
    /// written byte is closed off first.
    pub fn write_byte(&mut self, byte: u8) -> Result<usize> {
        if self.next_free_bit != 0 {
            self.next_free_bit = 0;
            self.next_free_byte += 1;
        }
        let index = self.next_free_byte;
        self.writable(index)?[index] = byte;
        self.next_free_byte += 1;
        self.used_size = self.next_free_byte;
        Ok(index)
    }

    /// Append a single bit. Bit n of a byte holds the nth bit written to it.
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        let index = self.next_free_byte;
        // Only a new byte can need more room.
        if self.next_free_bit == 0 {
            self.writable(index)?[index] = 0;
            self.used_size = index + 1;
        }
        let bit_number = self.next_free_bit;
        let data = self.writable(index)?;
        set_bit(bit_number, &mut data[index], bit);

        self.next_free_bit += 1;
        if self.next_free_bit > 7 {
            self.next_free_bit = 0;
            self.next_free_byte += 1;
        }
        Ok(())
    }

    /// Read the next bit, in the order `write_bit` stored them.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.next_byte_to_read >= self.used_size {
            return Err(self.out_of_range());
        }
        let value = get_bit(self.next_bit_to_read, self.as_slice()[self.next_byte_to_read]);
        self.next_bit_to_read += 1;
        if self.next_bit_to_read > 7 {
            self.next_bit_to_read = 0;
            self.next_byte_to_read += 1;
        }
        Ok(value)
    }

    /// Read the next whole byte. Any unread bits of a partly read byte are skipped.
    pub fn read_byte(&mut self) -> Result<u8> {
        if self.next_bit_to_read != 0 {
            self.next_bit_to_read = 0;
            self.next_byte_to_read += 1;
        }
        if self.next_byte_to_read >= self.used_size {
            return Err(self.out_of_range());
        }
        let byte = self.as_slice()[self.next_byte_to_read];
        self.next_byte_to_read += 1;
        Ok(byte)
    }

    /// Rewind the read cursor to the start of the block.
    pub fn reset_read_cursor(&mut self) {
        self.next_byte_to_read = 0;
        self.next_bit_to_read = 0;
    }

    fn out_of_range(&self) -> JlError {
        trace!("Read past end of {:?} block at {}", self.provenance, self.loc());
        JlError::OutOfRange {
            offset: self.next_byte_to_read,
            used: self.used_size,
        }
    }

    /// Report the read cursor as [byte.bit].
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.next_byte_to_read, self.next_bit_to_read)
    }
}

/// Value of bit `bit_number` (0 is least significant) of `byte`.
#[inline(always)]
pub fn get_bit(bit_number: u8, byte: u8) -> bool {
    byte & (1 << bit_number) != 0
}

/// Set bit `bit_number` (0 is least significant) of `byte` to `value`.
#[inline(always)]
pub fn set_bit(bit_number: u8, byte: &mut u8, value: bool) {
    let mask = 1 << bit_number;
    if value {
        *byte |= mask
    } else {
        *byte &= !mask
    }
}
