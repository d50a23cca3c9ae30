// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

//! The static Huffman code defined by RFC 7541 Appendix B, plus an encoder
//! and a table-driven decoder built on top of it.
//!
//! The decoder processes input four bits (one nibble) at a time against a
//! transition table, the same strategy nghttp2 uses, except the table here
//! is derived at startup from `HUFFMAN_CODES` rather than hand-transcribed:
//! the code table has exactly 257 leaves (256 symbols + EOS) and, being a
//! complete prefix code, its bit-trie has exactly 256 internal nodes - one
//! state per table row.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use crate::error::HpackError;

const EOS_SYMBOL: u16 = 256;

/// `(code, length_in_bits)` for symbols 0..=255, plus the EOS code at index 256.
/// Code values are right-aligned (the low `length` bits are significant).
pub static HUFFMAN_CODES: &[(u32, u8)] = &[
    (0x1ff8, 13),
    (0x7fffd8, 23),
    (0xfffffe2, 28),
    (0xfffffe3, 28),
    (0xfffffe4, 28),
    (0xfffffe5, 28),
    (0xfffffe6, 28),
    (0xfffffe7, 28),
    (0xfffffe8, 28),
    (0xffffea, 24),
    (0x3ffffffc, 30),
    (0xfffffe9, 28),
    (0xfffffea, 28),
    (0x3ffffffd, 30),
    (0xfffffeb, 28),
    (0xfffffec, 28),
    (0xfffffed, 28),
    (0xfffffee, 28),
    (0xfffffef, 28),
    (0xffffff0, 28),
    (0xffffff1, 28),
    (0xffffff2, 28),
    (0x3ffffffe, 30),
    (0xffffff3, 28),
    (0xffffff4, 28),
    (0xffffff5, 28),
    (0xffffff6, 28),
    (0xffffff7, 28),
    (0xffffff8, 28),
    (0xffffff9, 28),
    (0xffffffa, 28),
    (0xffffffb, 28),
    (0x14, 6),
    (0x3f8, 10),
    (0x3f9, 10),
    (0xffa, 12),
    (0x1ff9, 13),
    (0x15, 6),
    (0xf8, 8),
    (0x7fa, 11),
    (0x3fa, 10),
    (0x3fb, 10),
    (0xf9, 8),
    (0x7fb, 11),
    (0xfa, 8),
    (0x16, 6),
    (0x17, 6),
    (0x18, 6),
    (0x0, 5),
    (0x1, 5),
    (0x2, 5),
    (0x19, 6),
    (0x1a, 6),
    (0x1b, 6),
    (0x1c, 6),
    (0x1d, 6),
    (0x1e, 6),
    (0x1f, 6),
    (0x5c, 7),
    (0xfb, 8),
    (0x7ffc, 15),
    (0x20, 6),
    (0xffb, 12),
    (0x3fc, 10),
    (0x1ffa, 13),
    (0x21, 6),
    (0x5d, 7),
    (0x5e, 7),
    (0x5f, 7),
    (0x60, 7),
    (0x61, 7),
    (0x62, 7),
    (0x63, 7),
    (0x64, 7),
    (0x65, 7),
    (0x66, 7),
    (0x67, 7),
    (0x68, 7),
    (0x69, 7),
    (0x6a, 7),
    (0x6b, 7),
    (0x6c, 7),
    (0x6d, 7),
    (0x6e, 7),
    (0x6f, 7),
    (0x70, 7),
    (0x71, 7),
    (0x72, 7),
    (0xfc, 8),
    (0x73, 7),
    (0xfd, 8),
    (0x1ffb, 13),
    (0x7fff0, 19),
    (0x1ffc, 13),
    (0x3ffc, 14),
    (0x22, 6),
    (0x7ffd, 15),
    (0x3, 5),
    (0x23, 6),
    (0x4, 5),
    (0x24, 6),
    (0x5, 5),
    (0x25, 6),
    (0x26, 6),
    (0x27, 6),
    (0x6, 5),
    (0x74, 7),
    (0x75, 7),
    (0x28, 6),
    (0x29, 6),
    (0x2a, 6),
    (0x7, 5),
    (0x2b, 6),
    (0x76, 7),
    (0x2c, 6),
    (0x8, 5),
    (0x9, 5),
    (0x2d, 6),
    (0x77, 7),
    (0x78, 7),
    (0x79, 7),
    (0x7a, 7),
    (0x7b, 7),
    (0x7ffe, 15),
    (0x7fc, 11),
    (0x3ffd, 14),
    (0x1ffd, 13),
    (0xffffffc, 28),
    (0xfffe6, 20),
    (0x3fffd2, 22),
    (0xfffe7, 20),
    (0xfffe8, 20),
    (0x3fffd3, 22),
    (0x3fffd4, 22),
    (0x3fffd5, 22),
    (0x7fffd9, 23),
    (0x3fffd6, 22),
    (0x7fffda, 23),
    (0x7fffdb, 23),
    (0x7fffdc, 23),
    (0x7fffdd, 23),
    (0x7fffde, 23),
    (0xffffeb, 24),
    (0x7fffdf, 23),
    (0xffffec, 24),
    (0xffffed, 24),
    (0x3fffd7, 22),
    (0x7fffe0, 23),
    (0xffffee, 24),
    (0x7fffe1, 23),
    (0x7fffe2, 23),
    (0x7fffe3, 23),
    (0x7fffe4, 23),
    (0x1fffdc, 21),
    (0x3fffd8, 22),
    (0x7fffe5, 23),
    (0x3fffd9, 22),
    (0x7fffe6, 23),
    (0x7fffe7, 23),
    (0xffffef, 24),
    (0x3fffda, 22),
    (0x1fffdd, 21),
    (0xfffe9, 20),
    (0x3fffdb, 22),
    (0x3fffdc, 22),
    (0x7fffe8, 23),
    (0x7fffe9, 23),
    (0x1fffde, 21),
    (0x7fffea, 23),
    (0x3fffdd, 22),
    (0x3fffde, 22),
    (0xfffff0, 24),
    (0x1fffdf, 21),
    (0x3fffdf, 22),
    (0x7fffeb, 23),
    (0x7fffec, 23),
    (0x1fffe0, 21),
    (0x1fffe1, 21),
    (0x3fffe0, 22),
    (0x1fffe2, 21),
    (0x7fffed, 23),
    (0x3fffe1, 22),
    (0x7fffee, 23),
    (0x7fffef, 23),
    (0xfffea, 20),
    (0x3fffe2, 22),
    (0x3fffe3, 22),
    (0x3fffe4, 22),
    (0x7ffff0, 23),
    (0x3fffe5, 22),
    (0x3fffe6, 22),
    (0x7ffff1, 23),
    (0x3ffffe0, 26),
    (0x3ffffe1, 26),
    (0xfffeb, 20),
    (0x7fff1, 19),
    (0x3fffe7, 22),
    (0x7ffff2, 23),
    (0x3fffe8, 22),
    (0x1ffffec, 25),
    (0x3ffffe2, 26),
    (0x3ffffe3, 26),
    (0x3ffffe4, 26),
    (0x7ffffde, 27),
    (0x7ffffdf, 27),
    (0x3ffffe5, 26),
    (0xfffff1, 24),
    (0x1ffffed, 25),
    (0x7fff2, 19),
    (0x1fffe3, 21),
    (0x3ffffe6, 26),
    (0x7ffffe0, 27),
    (0x7ffffe1, 27),
    (0x3ffffe7, 26),
    (0x7ffffe2, 27),
    (0xfffff2, 24),
    (0x1fffe4, 21),
    (0x1fffe5, 21),
    (0x3ffffe8, 26),
    (0x3ffffe9, 26),
    (0xffffffd, 28),
    (0x7ffffe3, 27),
    (0x7ffffe4, 27),
    (0x7ffffe5, 27),
    (0xfffec, 20),
    (0xfffff3, 24),
    (0xfffed, 20),
    (0x1fffe6, 21),
    (0x3fffe9, 22),
    (0x1fffe7, 21),
    (0x1fffe8, 21),
    (0x7ffff3, 23),
    (0x3fffea, 22),
    (0x3fffeb, 22),
    (0x1ffffee, 25),
    (0x1ffffef, 25),
    (0xfffff4, 24),
    (0xfffff5, 24),
    (0x3ffffea, 26),
    (0x7ffff4, 23),
    (0x3ffffeb, 26),
    (0x7ffffe6, 27),
    (0x3ffffec, 26),
    (0x3ffffed, 26),
    (0x7ffffe7, 27),
    (0x7ffffe8, 27),
    (0x7ffffe9, 27),
    (0x7ffffea, 27),
    (0x7ffffeb, 27),
    (0xffffffe, 28),
    (0x7ffffec, 27),
    (0x7ffffed, 27),
    (0x7ffffee, 27),
    (0x7ffffef, 27),
    (0x7fffff0, 27),
    (0x3ffffee, 26),
    (0x3fffffff, 30),
];

struct TrieNode {
    children: [Option<Box<TrieNode>>; 2],
    leaf: Option<u16>,
}

impl TrieNode {
    fn new() -> Self {
        TrieNode { children: [None, None], leaf: None }
    }
}

fn build_trie() -> TrieNode {
    let mut root = TrieNode::new();
    for (sym, &(code, len)) in HUFFMAN_CODES.iter().enumerate() {
        let mut node = &mut root;
        for i in (0..len).rev() {
            let bit = ((code >> i) & 1) as usize;
            node = node.children[bit].get_or_insert_with(|| Box::new(TrieNode::new()));
        }
        node.leaf = Some(sym as u16);
    }
    root
}

fn ones_path(root: &TrieNode) -> HashSet<*const TrieNode> {
    let mut set = HashSet::new();
    let mut node = root;
    set.insert(node as *const TrieNode);
    loop {
        match &node.children[1] {
            Some(child) if child.leaf.is_none() => {
                node = child.as_ref();
                set.insert(node as *const TrieNode);
            }
            _ => break,
        }
    }
    set
}

#[derive(Clone, Copy, Default)]
struct NibbleEntry {
    next_state: u16,
    sym: Option<u8>,
    accepted: bool,
    failure: bool,
}

struct HuffmanDfa {
    states: Vec<[NibbleEntry; 16]>,
}

fn walk_nibble<'a>(
    start: &'a TrieNode,
    nibble: u8,
    root: &'a TrieNode,
    id_of: &HashMap<*const TrieNode, usize>,
    accepted: &HashSet<*const TrieNode>,
) -> NibbleEntry {
    let mut node = start;
    let mut sym = None;
    for shift in (0..4).rev() {
        let bit = ((nibble >> shift) & 1) as usize;
        match &node.children[bit] {
            None => return NibbleEntry { next_state: 0, sym: None, accepted: false, failure: true },
            Some(child) => {
                if let Some(s) = child.leaf {
                    if s == EOS_SYMBOL {
                        return NibbleEntry { next_state: 0, sym: None, accepted: false, failure: true };
                    }
                    sym = Some(s as u8);
                    node = root;
                } else {
                    node = child.as_ref();
                }
            }
        }
    }
    let next_state = *id_of.get(&(node as *const TrieNode)).expect("every reachable internal node is numbered");
    NibbleEntry {
        next_state: next_state as u16,
        sym,
        accepted: accepted.contains(&(node as *const TrieNode)),
        failure: false,
    }
}

fn build_dfa() -> HuffmanDfa {
    let root = build_trie();
    let accepted = ones_path(&root);

    let mut order: Vec<&TrieNode> = vec![&root];
    let mut id_of: HashMap<*const TrieNode, usize> = HashMap::new();
    id_of.insert(&root as *const TrieNode, 0);
    let mut i = 0;
    while i < order.len() {
        let node = order[i];
        for child in node.children.iter().flatten() {
            if child.leaf.is_none() {
                let ptr = child.as_ref() as *const TrieNode;
                if !id_of.contains_key(&ptr) {
                    id_of.insert(ptr, order.len());
                    order.push(child.as_ref());
                }
            }
        }
        i += 1;
    }

    let mut states = Vec::with_capacity(order.len());
    for &node in &order {
        let mut entries = [NibbleEntry::default(); 16];
        for nibble in 0u8..16 {
            entries[nibble as usize] = walk_nibble(node, nibble, &root, &id_of, &accepted);
        }
        states.push(entries);
    }
    HuffmanDfa { states }
}

lazy_static! {
    static ref HUFFMAN_DFA: HuffmanDfa = build_dfa();
}

/// Huffman-encodes `input` per RFC 7541 Appendix B, padding the final
/// partial byte with 1-bits (the most significant bits of the EOS code).
pub fn encode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(((input.len() * 3 / 2) + 1).max(128) / 128 * 128);
    let mut bit_buf: u64 = 0;
    let mut bit_count: u32 = 0;
    for &b in input {
        let (code, len) = HUFFMAN_CODES[b as usize];
        bit_buf = (bit_buf << len as u32) | code as u64;
        bit_count += len as u32;
        while bit_count >= 8 {
            bit_count -= 8;
            out.push(((bit_buf >> bit_count) & 0xff) as u8);
        }
    }
    if bit_count > 0 {
        let pad = 8 - bit_count;
        bit_buf = (bit_buf << pad) | ((1u64 << pad) - 1);
        out.push((bit_buf & 0xff) as u8);
    }
    out
}

/// The byte length `encode` would produce for `input`, without allocating.
pub fn encoded_len(input: &[u8]) -> usize {
    let bits: usize = input.iter().map(|&b| HUFFMAN_CODES[b as usize].1 as usize).sum();
    (bits + 7) / 8
}

/// Decodes a Huffman-encoded octet string per RFC 7541 Appendix B, using a
/// nibble-at-a-time transition table built from `HUFFMAN_CODES`.
pub fn decode(input: &[u8]) -> Result<Vec<u8>, HpackError> {
    let dfa = &*HUFFMAN_DFA;
    let mut state = 0usize;
    let mut accepted = true;
    let mut out = Vec::with_capacity(input.len() * 2);
    for &byte in input {
        for nibble in [(byte >> 4) as usize, (byte & 0x0f) as usize] {
            let entry = &dfa.states[state][nibble];
            if entry.failure {
                return Err(HpackError::InvalidHuffmanEncoding);
            }
            if let Some(sym) = entry.sym {
                out.push(sym);
            }
            state = entry.next_state as usize;
            accepted = entry.accepted;
        }
    }
    if !accepted {
        return Err(HpackError::InvalidHuffmanEncoding);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_ascii() {
        for s in [
            "",
            "www.example.com",
            "no-cache",
            "custom-key",
            "custom-value",
            "The quick brown fox jumps over the lazy dog.",
        ] {
            let encoded = encode(s.as_bytes());
            assert_eq!(encoded.len(), encoded_len(s.as_bytes()));
            let decoded = decode(&encoded).unwrap();
            assert_eq!(decoded, s.as_bytes());
        }
    }

    #[test]
    fn decodes_rfc7541_c_4_1_authority_field() {
        let www_example_com = hex("f1e3c2e5f23a6ba0ab90f4ff");
        let decoded = decode(&www_example_com).unwrap();
        assert_eq!(decoded, b"www.example.com");
    }

    #[test]
    fn rejects_eos_inside_string() {
        // 0xff repeated is a run of 1-bits; past 30 of them the EOS leaf is
        // reached before the input ends, which must be rejected.
        let bytes = [0xffu8; 5];
        assert_eq!(decode(&bytes), Err(HpackError::InvalidHuffmanEncoding));
    }

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }
}
