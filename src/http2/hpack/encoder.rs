// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

//! Emits an HPACK-compressed header block for an ordered header list.
//! Literal strings are always Huffman-encoded; the dynamic table mirrors
//! what the peer's decoder maintains and survives across blocks.

use crate::binary::BufMut;
use crate::http2::DEFAULT_SETTINGS_HEADER_TABLE_SIZE;

use super::header_table::HeaderTable;
use super::{huffman, integer};

const INDEXED: u8 = 0x80;
const LITERAL_WITH_INDEXING: u8 = 0x40;
const TABLE_SIZE_UPDATE: u8 = 0x20;
const LITERAL_NEVER_INDEXED: u8 = 0x10;
const LITERAL_WITHOUT_INDEXING: u8 = 0x00;

pub struct Encoder {
    table: HeaderTable,
    out: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::with_dynamic_table_size(DEFAULT_SETTINGS_HEADER_TABLE_SIZE as usize)
    }

    pub fn with_dynamic_table_size(dynamic_table_size: usize) -> Self {
        Encoder { table: HeaderTable::new(dynamic_table_size), out: Vec::with_capacity(128) }
    }

    /// Clears the output buffer so the next `encode_header` calls start a
    /// fresh block; the dynamic table is untouched.
    pub fn reset(&mut self) {
        self.out.clear();
    }

    pub fn output(&self) -> &[u8] {
        &self.out
    }

    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.out)
    }

    /// Updates the dynamic table's byte budget, optionally emitting an
    /// inline size-update representation into the current block so the peer
    /// decoder's table tracks it.
    pub fn set_max_dynamic_table_size(&mut self, new_size: usize, send_update: bool) {
        self.table.dynamic.set_max_size(new_size);
        if send_update {
            integer::encode(&mut self.out, TABLE_SIZE_UPDATE, 5, new_size as u64);
        }
    }

    /// The default encoding mode: indexed when possible, literal with an
    /// indexed name when only the name matches, literal with both name and
    /// value spelled out otherwise. Inserts into the dynamic table whenever
    /// the name was not already fully indexed.
    pub fn encode_header(&mut self, name: &[u8], value: &[u8]) {
        match self.table.first_match(name, value) {
            Some((idx, true)) => {
                integer::encode(&mut self.out, INDEXED, 7, idx as u64);
            }
            Some((idx, false)) => {
                integer::encode(&mut self.out, LITERAL_WITH_INDEXING, 6, idx as u64);
                self.encode_string(value);
                self.table.dynamic.insert(name.to_vec(), value.to_vec());
            }
            None => {
                integer::encode(&mut self.out, LITERAL_WITH_INDEXING, 6, 0);
                self.encode_string(name);
                self.encode_string(value);
                self.table.dynamic.insert(name.to_vec(), value.to_vec());
            }
        }
    }

    /// Emits a literal representation that the peer must not add to its
    /// dynamic table, without otherwise changing codec state.
    pub fn encode_header_without_indexing(&mut self, name: &[u8], value: &[u8]) {
        self.encode_literal_no_insert(LITERAL_WITHOUT_INDEXING, name, value);
    }

    /// As `encode_header_without_indexing`, but marks the field sensitive so
    /// intermediaries must not re-encode it with indexing either.
    pub fn encode_header_never_indexed(&mut self, name: &[u8], value: &[u8]) {
        self.encode_literal_no_insert(LITERAL_NEVER_INDEXED, name, value);
    }

    fn encode_literal_no_insert(&mut self, prefix_bits: u8, name: &[u8], value: &[u8]) {
        match self.table.first_match(name, value) {
            Some((idx, _)) => {
                integer::encode(&mut self.out, prefix_bits, 4, idx as u64);
            }
            None => {
                integer::encode(&mut self.out, prefix_bits, 4, 0);
                self.encode_string(name);
            }
        }
        self.encode_string(value);
    }

    fn encode_string(&mut self, data: &[u8]) {
        let encoded = huffman::encode(data);
        integer::encode(&mut self.out, 0x80, 7, encoded.len() as u64);
        self.out.put_slice(&encoded);
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::super::decoder::Decoder;
    use super::*;

    #[test]
    fn indexed_static_round_trips() {
        let mut enc = Encoder::new();
        enc.encode_header(b":method", b"GET");
        assert_eq!(enc.output(), &[0x82]);

        let mut dec = Decoder::new();
        let headers = dec.decode_block(enc.output()).unwrap();
        assert_eq!(headers, vec![(b":method".to_vec(), b"GET".to_vec())]);
    }

    #[test]
    fn repeated_header_uses_dynamic_table_on_second_pass() {
        let mut enc = Encoder::new();
        let mut dec = Decoder::new();

        enc.encode_header(b"x-custom", b"value-one");
        let block1 = enc.take_output();
        assert_eq!(dec.decode_block(&block1).unwrap(), vec![(b"x-custom".to_vec(), b"value-one".to_vec())]);

        enc.reset();
        enc.encode_header(b"x-custom", b"value-one");
        let block2 = enc.take_output();
        // Second emission should be a single indexed byte: the entry is now
        // at dynamic index 1 -> table index 62.
        assert_eq!(block2, vec![0x80 | 62]);
        assert_eq!(dec.decode_block(&block2).unwrap(), vec![(b"x-custom".to_vec(), b"value-one".to_vec())]);
    }

    #[test]
    fn header_list_round_trips_in_order() {
        let headers: Vec<(Vec<u8>, Vec<u8>)> = vec![
            (b":method".to_vec(), b"GET".to_vec()),
            (b":scheme".to_vec(), b"https".to_vec()),
            (b":path".to_vec(), b"/index.html".to_vec()),
            (b"x-request-id".to_vec(), b"abc-123".to_vec()),
        ];
        let mut enc = Encoder::new();
        for (name, value) in &headers {
            enc.encode_header(name, value);
        }
        let mut dec = Decoder::new();
        let decoded = dec.decode_block(enc.output()).unwrap();
        assert_eq!(decoded, headers);
    }

    #[test]
    fn never_indexed_does_not_grow_dynamic_table() {
        let mut enc = Encoder::new();
        enc.encode_header_never_indexed(b"authorization", b"secret-token");
        let mut dec = Decoder::new();
        let decoded = dec.decode_block(enc.output()).unwrap();
        assert_eq!(decoded, vec![(b"authorization".to_vec(), b"secret-token".to_vec())]);
        assert_eq!(dec.dynamic_table_len(), 0);
    }

    #[test]
    fn set_max_dynamic_table_size_emits_update_when_asked() {
        let mut enc = Encoder::new();
        enc.set_max_dynamic_table_size(0, true);
        assert!(!enc.output().is_empty());

        let mut dec = Decoder::with_dynamic_table_size(4096);
        dec.decode_block(enc.output()).unwrap();
        assert_eq!(dec.dynamic_table_bytes(), 0);
    }
}
