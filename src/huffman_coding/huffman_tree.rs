//! Huffman tree construction, code assignment and bit by bit decoding.
//!
//! The tree lives in an arena owned by `HuffmanTree`. Building, deriving codes and decoding
//! are separate steps; none of them consume the tree. Decoding position is held by the
//! caller in a `DecodeCursor`, so independent streams can be decoded with the same tree.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::trace;

use super::freq_table::FrequencyTable;
use crate::error::{JlError, Result};

/// Longest code the 64 bit pattern field can hold.
const MAX_PATTERN_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeData {
    /// Arena indices of the left (0) and right (1) children.
    Kids(usize, usize),
    Leaf(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub weight: u64,
    pub node_data: NodeData,
}

#[derive(Debug)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: usize,
}

/// Position of a decode in progress: the arena index of the current node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeCursor {
    node: usize,
}

impl HuffmanTree {
    /// Build the tree for the symbols present in `table`. Returns None if there are none.
    ///
    /// The two lightest nodes are combined until one remains. Among nodes of equal weight the
    /// one queued most recently is taken first; leaves are queued in ascending symbol order.
    /// The first node taken becomes the right child. The shape therefore depends only on the
    /// table, so the decoder rebuilds the same tree from the stored frequencies.
    pub fn build(table: &FrequencyTable) -> Option<Self> {
        let mut nodes: Vec<Node> = Vec::with_capacity(511);
        // Min-heap on (weight, newest first). `seq` counts insertions.
        let mut queue: BinaryHeap<Reverse<(u64, Reverse<usize>, usize)>> = BinaryHeap::new();
        let mut seq = 0;

        for entry in table.present() {
            nodes.push(Node {
                weight: entry.frequency,
                node_data: NodeData::Leaf(entry.symbol),
            });
            queue.push(Reverse((entry.frequency, Reverse(seq), nodes.len() - 1)));
            seq += 1;
        }

        while queue.len() > 1 {
            let Reverse((right_weight, _, right)) = queue.pop()?;
            let Reverse((left_weight, _, left)) = queue.pop()?;
            let weight = left_weight.saturating_add(right_weight);
            nodes.push(Node {
                weight,
                node_data: NodeData::Kids(left, right),
            });
            queue.push(Reverse((weight, Reverse(seq), nodes.len() - 1)));
            seq += 1;
        }

        let Reverse((_, _, root)) = queue.pop()?;
        trace!("Built Huffman tree with {} nodes", nodes.len());
        Some(Self { nodes, root })
    }

    pub fn root(&self) -> &Node {
        &self.nodes[self.root]
    }

    /// Walk the tree and record each leaf's pattern and length in `table`. A left edge adds
    /// a 0 bit and a right edge a 1 bit. A tree that is a single leaf gets the 1 bit code 0.
    pub fn assign_codes(&self, table: &mut FrequencyTable) -> Result<()> {
        if let NodeData::Leaf(symbol) = self.root().node_data {
            return record_code(table, symbol, 0, 1);
        }
        self.walk(self.root, table, 0, 0)
    }

    fn walk(&self, index: usize, table: &mut FrequencyTable, pattern: u64, len: usize) -> Result<()> {
        match self.nodes[index].node_data {
            NodeData::Kids(left, right) => {
                // It's just a jump to the left. And then a step to the right.
                self.walk(left, table, pattern << 1, len + 1)?;
                self.walk(right, table, (pattern << 1) | 1, len + 1)
            }
            NodeData::Leaf(symbol) => record_code(table, symbol, pattern, len),
        }
    }

    /// A cursor positioned at the root.
    pub fn cursor(&self) -> DecodeCursor {
        DecodeCursor { node: self.root }
    }

    /// Advance `cursor` by one bit (false goes left, true goes right). Returns the symbol and
    /// moves the cursor back to the root when a leaf is reached.
    pub fn step(&self, cursor: &mut DecodeCursor, bit: bool) -> Option<u8> {
        let next = match self.nodes[cursor.node].node_data {
            // Single leaf tree: every bit is a whole code.
            NodeData::Leaf(symbol) => return Some(symbol),
            NodeData::Kids(left, right) => {
                if bit {
                    right
                } else {
                    left
                }
            }
        };
        match self.nodes[next].node_data {
            NodeData::Leaf(symbol) => {
                cursor.node = self.root;
                Some(symbol)
            }
            NodeData::Kids(..) => {
                cursor.node = next;
                None
            }
        }
    }

    /// Release the arena.
    pub fn dispose(self) {
        trace!("Releasing Huffman tree of {} nodes", self.nodes.len());
    }
}

fn record_code(table: &mut FrequencyTable, symbol: u8, pattern: u64, len: usize) -> Result<()> {
    if len > MAX_PATTERN_LEN {
        return Err(JlError::CodeTooLong {
            symbol,
            length: len,
        });
    }
    let entry = table.entry_mut(symbol);
    if entry.symbol != symbol {
        return Err(JlError::FrequencyTableOrder {
            index: symbol as usize,
            symbol: entry.symbol,
        });
    }
    if entry.pattern_len != 0 {
        return Err(JlError::FrequencyTableDamaged(format!(
            "symbol {} reached twice in the tree",
            symbol
        )));
    }
    entry.pattern = pattern;
    entry.pattern_len = len as u8;
    Ok(())
}
