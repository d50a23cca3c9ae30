// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

//! Decodes an HPACK header block into an ordered list of `(name, value)`
//! pairs, dispatching each representation by the high bits of its first
//! byte (RFC 7541 section 6).

use crate::binary::Buf;
use crate::error::HpackError;
use crate::http2::DEFAULT_SETTINGS_HEADER_TABLE_SIZE;

use super::header_table::HeaderTable;
use super::{huffman, integer};

pub type Header = (Vec<u8>, Vec<u8>);

pub struct Decoder {
    table: HeaderTable,
    /// Ceiling on the dynamic table size: the largest value an inline size
    /// update from the peer may request, set from our own advertised
    /// SETTINGS_HEADER_TABLE_SIZE.
    max_allowed_size: usize,
}

impl Decoder {
    pub fn new() -> Self {
        Self::with_dynamic_table_size(DEFAULT_SETTINGS_HEADER_TABLE_SIZE as usize)
    }

    pub fn with_dynamic_table_size(dynamic_table_size: usize) -> Self {
        Decoder { table: HeaderTable::new(dynamic_table_size), max_allowed_size: dynamic_table_size }
    }

    /// Call when the local SETTINGS_HEADER_TABLE_SIZE changes; lowers or
    /// raises both the ceiling and the table's current cap.
    pub fn set_max_allowed_size(&mut self, size: usize) {
        self.max_allowed_size = size;
        self.table.dynamic.set_max_size(size);
    }

    pub fn dynamic_table_len(&self) -> usize {
        self.table.dynamic.len()
    }

    pub fn dynamic_table_bytes(&self) -> usize {
        self.table.dynamic.current_bytes()
    }

    fn resolve_literal_name(&self, index: usize) -> Result<Vec<u8>, HpackError> {
        if index == 0 {
            return Ok(Vec::new());
        }
        self.table.entry(index).map(|(name, _)| name).ok_or(HpackError::IndexOutOfRange(index))
    }

    /// Decodes every representation in `block` and returns the headers in
    /// wire order.
    pub fn decode_block(&mut self, block: &[u8]) -> Result<Vec<Header>, HpackError> {
        let mut cursor: &[u8] = block;
        let mut headers = Vec::new();

        while cursor.has_remaining() {
            let first = cursor.peek_u8().expect("has_remaining checked above");

            if first & 0x80 != 0 {
                let index = integer::decode(&mut cursor, 7)? as usize;
                if index == 0 {
                    return Err(HpackError::IndexOutOfRange(0));
                }
                let (name, value) = self.table.entry(index).ok_or(HpackError::IndexOutOfRange(index))?;
                if value.is_empty() {
                    return Err(HpackError::IndexedHeaderWithNoValue(index));
                }
                headers.push((name, value));
            } else if first & 0x40 != 0 {
                let index = integer::decode(&mut cursor, 6)? as usize;
                let name = if index == 0 { decode_string(&mut cursor)? } else { self.resolve_literal_name(index)? };
                let value = decode_string(&mut cursor)?;
                self.table.dynamic.insert(name.clone(), value.clone());
                headers.push((name, value));
            } else if first & 0x20 != 0 {
                let new_size = integer::decode(&mut cursor, 5)? as usize;
                if new_size > self.max_allowed_size {
                    return Err(HpackError::InvalidTableSizeUpdate);
                }
                self.table.dynamic.set_max_size(new_size);
            } else if first & 0x10 != 0 {
                // Literal never indexed: same wire shape as without-indexing,
                // distinguished only by the sensitivity hint this codec does
                // not surface further upstream.
                let index = integer::decode(&mut cursor, 4)? as usize;
                let name = if index == 0 { decode_string(&mut cursor)? } else { self.resolve_literal_name(index)? };
                let value = decode_string(&mut cursor)?;
                headers.push((name, value));
            } else {
                let index = integer::decode(&mut cursor, 4)? as usize;
                let name = if index == 0 { decode_string(&mut cursor)? } else { self.resolve_literal_name(index)? };
                let value = decode_string(&mut cursor)?;
                headers.push((name, value));
            }
        }

        Ok(headers)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// A literal string: one byte of Huffman flag (top bit) + 7-bit prefixed
/// length, followed by that many octets.
fn decode_string(buf: &mut impl Buf) -> Result<Vec<u8>, HpackError> {
    if !buf.has_remaining() {
        return Err(HpackError::NotEnoughOctets);
    }
    let huffman_encoded = buf.peek_u8().expect("checked above") & 0x80 != 0;
    let len = integer::decode(buf, 7)? as usize;
    if buf.remaining() < len {
        return Err(HpackError::TruncatedBlock);
    }
    let mut raw = vec![0u8; len];
    buf.copy_to_slice(&mut raw);
    let bytes = if huffman_encoded { huffman::decode(&raw)? } else { raw };
    if std::str::from_utf8(&bytes).is_err() {
        return Err(HpackError::InvalidStringEncoding);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len()).step_by(2).map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap()).collect()
    }

    #[test]
    fn decodes_indexed_static_get() {
        let mut d = Decoder::new();
        let headers = d.decode_block(&hex("82")).unwrap();
        assert_eq!(headers, vec![(b":method".to_vec(), b"GET".to_vec())]);
    }

    #[test]
    fn decodes_literal_with_incremental_indexing() {
        let mut d = Decoder::new();
        let headers = d.decode_block(&hex("400a637573746f6d2d6b65790d637573746f6d2d686561646572")).unwrap();
        assert_eq!(headers, vec![(b"custom-key".to_vec(), b"custom-header".to_vec())]);
        assert_eq!(d.dynamic_table_len(), 1);
        assert_eq!(d.dynamic_table_bytes(), 10 + 13 + 32);
    }

    #[test]
    fn decodes_rfc7541_c_4_1_huffman_example() {
        let mut d = Decoder::new();
        let headers = d.decode_block(&hex("828684418cf1e3c2e5f23a6ba0ab90f4ff")).unwrap();
        assert_eq!(
            headers,
            vec![
                (b":method".to_vec(), b"GET".to_vec()),
                (b":scheme".to_vec(), b"http".to_vec()),
                (b":path".to_vec(), b"/".to_vec()),
                (b":authority".to_vec(), b"www.example.com".to_vec()),
            ]
        );
    }

    #[test]
    fn rejects_indexed_header_with_empty_value() {
        let mut d = Decoder::new();
        // Index 15 (after the accept-charset fix) has an empty value.
        let headers = d.decode_block(&[0x80 | 15]);
        assert_eq!(headers, Err(HpackError::IndexedHeaderWithNoValue(15)));
    }

    #[test]
    fn rejects_index_zero() {
        let mut d = Decoder::new();
        assert_eq!(d.decode_block(&[0x80]), Err(HpackError::IndexOutOfRange(0)));
    }

    #[test]
    fn dynamic_table_size_update_cannot_exceed_ceiling() {
        let mut d = Decoder::with_dynamic_table_size(100);
        let mut buf = Vec::new();
        integer::encode(&mut buf, 0x20, 5, 200);
        assert_eq!(d.decode_block(&buf), Err(HpackError::InvalidTableSizeUpdate));
    }

    #[test]
    fn literal_without_indexing_does_not_touch_dynamic_table() {
        let mut d = Decoder::new();
        let mut block = Vec::new();
        integer::encode(&mut block, 0x00, 4, 0);
        integer::encode(&mut block, 0x00, 7, 1);
        block.push(b'x');
        integer::encode(&mut block, 0x00, 7, 1);
        block.push(b'y');
        let headers = d.decode_block(&block).unwrap();
        assert_eq!(headers, vec![(b"x".to_vec(), b"y".to_vec())]);
        assert_eq!(d.dynamic_table_len(), 0);
    }
}
