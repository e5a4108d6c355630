//! Decoding against the fixed 256-node Huffman dictionaries.
//!
//! A dictionary file is 256 nodes of two little-endian `u16` child references.
//! A reference below 256 is a leaf holding that byte; a reference in
//! `256..512` points at node `value - 256`. Decoding always starts at node
//! 254.

use crate::{
    compression::bits::{BitOrder, BitStream},
    utils::mem_reader::MemReader,
};

pub const NODE_COUNT: usize = 256;
pub const ROOT_NODE: u8 = 254;

/// Size in bytes of a dictionary file.
pub const DICTIONARY_SIZE: usize = NODE_COUNT * 4;

const NODE_REF_BASE: u16 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuffmanChild {
    Leaf(u8),
    Node(u8),
}

impl HuffmanChild {
    /// Interprets a raw child reference, rejecting values that do not fit
    /// the 256-node table.
    #[must_use]
    pub fn from_raw(value: u16) -> Option<Self> {
        if let Ok(byte) = u8::try_from(value) {
            return Some(HuffmanChild::Leaf(byte));
        }
        u8::try_from(value - NODE_REF_BASE)
            .ok()
            .map(HuffmanChild::Node)
    }

    #[must_use]
    pub fn to_raw(self) -> u16 {
        match self {
            HuffmanChild::Leaf(byte) => u16::from(byte),
            HuffmanChild::Node(index) => NODE_REF_BASE + u16::from(index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanNode {
    zero: HuffmanChild,
    one: HuffmanChild,
}

impl HuffmanNode {
    #[must_use]
    pub fn new(zero: HuffmanChild, one: HuffmanChild) -> Self {
        Self { zero, one }
    }

    #[must_use]
    pub fn zero(&self) -> HuffmanChild {
        self.zero
    }

    #[must_use]
    pub fn one(&self) -> HuffmanChild {
        self.one
    }

    #[must_use]
    pub fn child(&self, bit: bool) -> HuffmanChild {
        if bit { self.one } else { self.zero }
    }
}

impl Default for HuffmanNode {
    fn default() -> Self {
        Self::new(HuffmanChild::Leaf(0), HuffmanChild::Leaf(0))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("Huffman dictionary needs {DICTIONARY_SIZE} bytes, but only {0} available")]
    Truncated(usize),
    #[error("Huffman node {node} has out-of-range {side} child {value:#06x}")]
    ChildOutOfRange {
        node: usize,
        side: &'static str,
        value: u16,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HuffmanError {
    #[error(
        "Ran out of input on decompressed byte {produced} of {expected} from {available} compressed bytes"
    )]
    Underrun {
        produced: usize,
        expected: usize,
        available: usize,
    },
}

#[derive(Clone, PartialEq, Eq)]
pub struct HuffmanDictionary {
    nodes: Box<[HuffmanNode; NODE_COUNT]>,
}

impl std::fmt::Debug for HuffmanDictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuffmanDictionary")
            .field("root", &self.root())
            .finish_non_exhaustive()
    }
}

impl HuffmanDictionary {
    #[must_use]
    pub fn from_nodes(nodes: [HuffmanNode; NODE_COUNT]) -> Self {
        Self {
            nodes: Box::new(nodes),
        }
    }

    /// Parses a dictionary file. Bytes past the first 1024 are ignored.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DictionaryError> {
        if data.len() < DICTIONARY_SIZE {
            return Err(DictionaryError::Truncated(data.len()));
        }
        if data.len() > DICTIONARY_SIZE {
            log::debug!(
                "Ignoring {} trailing bytes after Huffman dictionary",
                data.len() - DICTIONARY_SIZE
            );
        }
        let mut reader = MemReader::new("huffman dictionary", &data[..DICTIONARY_SIZE]);
        let mut nodes = [HuffmanNode::default(); NODE_COUNT];
        for (index, node) in nodes.iter_mut().enumerate() {
            let raw_zero = reader
                .read_u16_le()
                .map_err(|_| DictionaryError::Truncated(data.len()))?;
            let raw_one = reader
                .read_u16_le()
                .map_err(|_| DictionaryError::Truncated(data.len()))?;
            let child = |side, value| {
                HuffmanChild::from_raw(value).ok_or(DictionaryError::ChildOutOfRange {
                    node: index,
                    side,
                    value,
                })
            };
            *node = HuffmanNode::new(child("zero", raw_zero)?, child("one", raw_one)?);
        }
        Ok(Self::from_nodes(nodes))
    }

    #[must_use]
    pub fn node(&self, index: u8) -> &HuffmanNode {
        &self.nodes[usize::from(index)]
    }

    #[must_use]
    pub fn root(&self) -> &HuffmanNode {
        self.node(ROOT_NODE)
    }

    /// Walks from the root one bit at a time until a leaf is reached.
    ///
    /// Returns `None` if the stream runs dry partway through a code.
    pub fn decode_symbol(&self, stream: &mut BitStream<'_>) -> Option<u8> {
        let mut node = self.root();
        loop {
            match node.child(stream.read_bit()?) {
                HuffmanChild::Leaf(byte) => return Some(byte),
                HuffmanChild::Node(index) => node = self.node(index),
            }
        }
    }

    /// Decodes exactly `expected_len` bytes from `src`.
    ///
    /// Bits left over once the target length is reached are ignored.
    pub fn expand(
        &self,
        src: &[u8],
        expected_len: usize,
        order: BitOrder,
    ) -> Result<Vec<u8>, HuffmanError> {
        let mut stream = BitStream::new(src, order);
        // Every code is at least one bit long.
        let mut output = Vec::with_capacity(expected_len.min(src.len().saturating_mul(8)));
        while output.len() < expected_len {
            let Some(byte) = self.decode_symbol(&mut stream) else {
                return Err(HuffmanError::Underrun {
                    produced: output.len(),
                    expected: expected_len,
                    available: src.len(),
                });
            };
            output.push(byte);
        }
        Ok(output)
    }
}
