use crate::compression::{
    bits::BitOrder,
    huffman::{HuffmanChild, HuffmanDictionary, HuffmanNode, NODE_COUNT, ROOT_NODE},
};

/// A dictionary whose root (node 254) tells `A` (code `0`) apart from node
/// 253, which holds `B` (`10`) and `C` (`11`). Every other node is unused.
pub(crate) fn two_leaf_dictionary() -> HuffmanDictionary {
    let mut nodes = [HuffmanNode::default(); NODE_COUNT];
    nodes[usize::from(ROOT_NODE)] =
        HuffmanNode::new(HuffmanChild::Leaf(b'A'), HuffmanChild::Node(253));
    nodes[253] = HuffmanNode::new(HuffmanChild::Leaf(b'B'), HuffmanChild::Leaf(b'C'));
    HuffmanDictionary::from_nodes(nodes)
}

/// Every byte gets an eight-bit code.
pub(crate) fn balanced_dictionary() -> HuffmanDictionary {
    build_dictionary(|len| len / 2)
}

/// Code lengths vary from a few bits up to well past eight.
pub(crate) fn skewed_dictionary() -> HuffmanDictionary {
    build_dictionary(|len| if len > 16 { len / 3 } else { len / 2 })
}

/// Builds a full tree over all 256 byte values. Internal nodes are numbered
/// downwards from the root so the first allocation lands on node 254.
fn build_dictionary(split: fn(usize) -> usize) -> HuffmanDictionary {
    fn build(
        nodes: &mut [HuffmanNode; NODE_COUNT],
        next_index: &mut u8,
        leaves: &[u8],
        split: fn(usize) -> usize,
    ) -> HuffmanChild {
        if let [leaf] = leaves {
            return HuffmanChild::Leaf(*leaf);
        }
        let index = *next_index;
        *next_index = next_index.saturating_sub(1);
        let (zero_leaves, one_leaves) = leaves.split_at(split(leaves.len()));
        let zero = build(nodes, next_index, zero_leaves, split);
        let one = build(nodes, next_index, one_leaves, split);
        nodes[usize::from(index)] = HuffmanNode::new(zero, one);
        HuffmanChild::Node(index)
    }

    let leaves: Vec<u8> = (0..=u8::MAX).collect();
    let mut nodes = [HuffmanNode::default(); NODE_COUNT];
    let mut next_index = ROOT_NODE;
    let root = build(&mut nodes, &mut next_index, &leaves, split);
    assert_eq!(root, HuffmanChild::Node(ROOT_NODE));
    HuffmanDictionary::from_nodes(nodes)
}

/// Serializes a dictionary the way it appears on disk.
pub(crate) fn dictionary_bytes(dict: &HuffmanDictionary) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(NODE_COUNT * 4);
    for index in 0..=u8::MAX {
        let node = dict.node(index);
        bytes.extend_from_slice(&node.zero().to_raw().to_le_bytes());
        bytes.extend_from_slice(&node.one().to_raw().to_le_bytes());
    }
    bytes
}

fn code_table(dict: &HuffmanDictionary) -> Vec<Option<Vec<bool>>> {
    fn visit(
        dict: &HuffmanDictionary,
        child: HuffmanChild,
        prefix: &mut Vec<bool>,
        codes: &mut Vec<Option<Vec<bool>>>,
    ) {
        match child {
            HuffmanChild::Leaf(byte) => {
                codes[usize::from(byte)].get_or_insert_with(|| prefix.clone());
            }
            HuffmanChild::Node(index) => {
                let node = *dict.node(index);
                for (bit, next) in [(false, node.zero()), (true, node.one())] {
                    prefix.push(bit);
                    visit(dict, next, prefix, codes);
                    prefix.pop();
                }
            }
        }
    }

    let mut codes = vec![None; NODE_COUNT];
    visit(dict, HuffmanChild::Node(ROOT_NODE), &mut Vec::new(), &mut codes);
    codes
}

pub(crate) struct Encoded {
    pub(crate) bytes: Vec<u8>,
    pub(crate) bit_len: usize,
}

impl Encoded {
    /// The encoded stream minus its final byte, which always holds at least
    /// the last bit of the last code.
    pub(crate) fn without_last_byte(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - 1]
    }
}

/// Packs the dictionary's codes for `data` into bytes, padding the final
/// byte with zero bits.
pub(crate) fn encode(dict: &HuffmanDictionary, data: &[u8], order: BitOrder) -> Encoded {
    let codes = code_table(dict);
    let mut bytes = Vec::new();
    let mut bit_len = 0;
    for &byte in data {
        let code = codes[usize::from(byte)]
            .as_ref()
            .unwrap_or_else(|| panic!("byte {byte:#04x} has no code in this dictionary"));
        for &bit in code {
            if bit_len % 8 == 0 {
                bytes.push(0);
            }
            if bit {
                let shift = match order {
                    BitOrder::LsbFirst => bit_len % 8,
                    BitOrder::MsbFirst => 7 - bit_len % 8,
                };
                *bytes.last_mut().unwrap() |= 1 << shift;
            }
            bit_len += 1;
        }
    }
    Encoded { bytes, bit_len }
}
