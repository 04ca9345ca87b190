//! The bitstream module holds `Block`, the growable byte buffer every stage reads from and
//! writes to, with independent bit-level read and write cursors.
//!
//! A block either owns its bytes or borrows them read-only from a mapped file.

pub mod block;
