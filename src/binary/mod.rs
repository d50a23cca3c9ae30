// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

//! A small, self-contained byte buffer abstraction used by both the HPACK
//! and frame codecs. `Buf` is a read cursor over a borrowed slice; `BufMut`
//! is a growable write sink. Unlike the rest of the family of buffer crates
//! this one's `put_*` calls return the number of bytes written, which lets
//! callers accumulate an encoded size as they go without a second pass.

/// A cursor for reading bytes out of a slice in order.
pub trait Buf {
    /// Bytes left to read.
    fn remaining(&self) -> usize;

    /// The unread portion of the underlying slice.
    fn chunk(&self) -> &[u8];

    /// Advance the read cursor by `cnt` bytes.
    ///
    /// # Panics
    /// Panics if `cnt > self.remaining()`.
    fn advance(&mut self, cnt: usize);

    fn has_remaining(&self) -> bool {
        self.remaining() > 0
    }

    fn get_u8(&mut self) -> u8 {
        let b = self.chunk()[0];
        self.advance(1);
        b
    }

    fn peek_u8(&self) -> Option<u8> {
        self.chunk().first().copied()
    }

    fn get_u16(&mut self) -> u16 {
        let b = self.chunk();
        let v = u16::from_be_bytes([b[0], b[1]]);
        self.advance(2);
        v
    }

    fn get_u24(&mut self) -> u32 {
        let b = self.chunk();
        let v = u32::from_be_bytes([0, b[0], b[1], b[2]]);
        self.advance(3);
        v
    }

    fn get_u32(&mut self) -> u32 {
        let b = self.chunk();
        let v = u32::from_be_bytes([b[0], b[1], b[2], b[3]]);
        self.advance(4);
        v
    }

    fn get_u64(&mut self) -> u64 {
        let b = self.chunk();
        let mut arr = [0u8; 8];
        arr.copy_from_slice(&b[..8]);
        let v = u64::from_be_bytes(arr);
        self.advance(8);
        v
    }

    /// Copies `dst.len()` bytes out and advances past them.
    fn copy_to_slice(&mut self, dst: &mut [u8]) {
        dst.copy_from_slice(&self.chunk()[..dst.len()]);
        self.advance(dst.len());
    }

    /// Copies the remaining bytes into a fresh `Vec<u8>`, without advancing.
    fn copy_to_vec(&self) -> Vec<u8> {
        self.chunk().to_vec()
    }
}

impl Buf for &[u8] {
    fn remaining(&self) -> usize {
        self.len()
    }

    fn chunk(&self) -> &[u8] {
        self
    }

    fn advance(&mut self, cnt: usize) {
        *self = &self[cnt..];
    }
}

/// A growable sink for writing bytes. `put_*` methods return the number of
/// bytes written so callers can fold a running size total.
pub trait BufMut {
    fn put_slice(&mut self, src: &[u8]) -> usize;

    fn put_u8(&mut self, v: u8) -> usize {
        self.put_slice(&[v])
    }

    fn put_u16(&mut self, v: u16) -> usize {
        self.put_slice(&v.to_be_bytes())
    }

    fn put_u24(&mut self, v: u32) -> usize {
        let b = v.to_be_bytes();
        self.put_slice(&b[1..])
    }

    fn put_u32(&mut self, v: u32) -> usize {
        self.put_slice(&v.to_be_bytes())
    }

    fn put_u64(&mut self, v: u64) -> usize {
        self.put_slice(&v.to_be_bytes())
    }
}

impl BufMut for Vec<u8> {
    fn put_slice(&mut self, src: &[u8]) -> usize {
        self.extend_from_slice(src);
        src.len()
    }
}

/// Cursor wrapper kept for symmetry with the rest of the family; plain
/// `&[u8]` already implements `Buf` and is what the codecs pass around.
pub struct Bytes<'a> {
    inner: &'a [u8],
}

impl<'a> Bytes<'a> {
    pub fn new(inner: &'a [u8]) -> Self {
        Bytes { inner }
    }
}

impl<'a> Buf for Bytes<'a> {
    fn remaining(&self) -> usize {
        self.inner.len()
    }

    fn chunk(&self) -> &[u8] {
        self.inner
    }

    fn advance(&mut self, cnt: usize) {
        self.inner = &self.inner[cnt..];
    }
}
