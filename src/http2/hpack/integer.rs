// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

//! HPACK's variable-length prefixed integer encoding (RFC 7541 section 5.1).

use crate::binary::{Buf, BufMut};
use crate::error::HpackError;

/// Maximum number of continuation octets accepted when decoding; guards
/// against unbounded reads turning into a 64-bit overflow.
const MAX_CONTINUATION_OCTETS: u32 = 10;

/// Encodes `value` with `prefix_size` prefix bits (1..=8) OR'd with
/// `prefix_bits` in the high bits of the first byte. Returns the number of
/// bytes written.
pub fn encode(out: &mut impl BufMut, prefix_bits: u8, prefix_size: u8, value: u64) -> usize {
    debug_assert!((1..=8).contains(&prefix_size));
    let max_prefix = (1u64 << prefix_size) - 1;
    let mut size = 0;
    if value < max_prefix {
        return out.put_u8(prefix_bits | value as u8);
    }
    size += out.put_u8(prefix_bits | max_prefix as u8);
    let mut remainder = value - max_prefix;
    while remainder >= 128 {
        size += out.put_u8(((remainder % 128) as u8) | 0x80);
        remainder /= 128;
    }
    size += out.put_u8(remainder as u8);
    size
}

/// Decodes a prefixed integer with `prefix_size` prefix bits (1..=8),
/// consuming the prefix byte plus any continuation bytes from `buf`.
pub fn decode(buf: &mut impl Buf, prefix_size: u8) -> Result<u64, HpackError> {
    debug_assert!((1..=8).contains(&prefix_size));
    if !buf.has_remaining() {
        return Err(HpackError::NotEnoughOctets);
    }
    let mask = ((1u16 << prefix_size) - 1) as u8;
    let first = buf.get_u8();
    let mut value = (first & mask) as u64;
    if value < mask as u64 {
        return Ok(value);
    }

    let mut shift = 0u32;
    let mut continuations = 0u32;
    loop {
        if continuations >= MAX_CONTINUATION_OCTETS {
            return Err(HpackError::IntegerOverflow);
        }
        if !buf.has_remaining() {
            return Err(HpackError::NotEnoughOctets);
        }
        let b = buf.get_u8();
        continuations += 1;
        value += ((b & 0x7f) as u64) << shift;
        shift += 7;
        if b & 0x80 == 0 {
            break;
        }
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(prefix_size: u8, value: u64) {
        let mut buf = Vec::new();
        encode(&mut buf, 0, prefix_size, value);
        let mut slice = &buf[..];
        let decoded = decode(&mut slice, prefix_size).unwrap();
        assert_eq!(decoded, value, "prefix_size={prefix_size} value={value}");
        assert!(slice.is_empty());
    }

    #[test]
    fn round_trips_every_prefix_width() {
        for prefix_size in 1..=8u8 {
            for value in [0u64, 1, 10, 30, 127, 128, 1000, 1_000_000, u32::MAX as u64] {
                round_trip(prefix_size, value);
            }
        }
    }

    #[test]
    fn matches_rfc7541_c_1_example() {
        // C.1.1: 10 encoded with a 5-bit prefix is a single byte.
        let mut buf = Vec::new();
        encode(&mut buf, 0, 5, 10);
        assert_eq!(buf, vec![0x0a]);

        // C.1.2: 1337 encoded with a 5-bit prefix is three bytes.
        let mut buf = Vec::new();
        encode(&mut buf, 0, 5, 1337);
        assert_eq!(buf, vec![0x1f, 0x9a, 0x0a]);

        // C.1.3: 42 encoded with an 8-bit prefix is a single byte.
        let mut buf = Vec::new();
        encode(&mut buf, 0, 8, 42);
        assert_eq!(buf, vec![0x2a]);
    }

    #[test]
    fn rejects_too_many_continuation_octets() {
        let mut bytes = vec![0x1f];
        bytes.extend(std::iter::repeat(0xff).take(11));
        let mut slice = &bytes[..];
        assert_eq!(decode(&mut slice, 5), Err(HpackError::IntegerOverflow));
    }
}
