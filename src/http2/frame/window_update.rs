// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

use crate::binary::{Buf, BufMut};
use crate::error::Http2Error;

use super::{Flag, FrameHeader, Kind, StreamIdentifier};

const SIZE_INCREMENT_MASK: u32 = 1 << 31;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WindowUpdate {
    stream_id: StreamIdentifier,
    size_increment: u32,
}

impl WindowUpdate {
    pub fn new(stream_id: StreamIdentifier, size_increment: u32) -> WindowUpdate {
        WindowUpdate { stream_id, size_increment }
    }

    pub fn stream_id(&self) -> StreamIdentifier {
        self.stream_id
    }

    pub fn size_increment(&self) -> u32 {
        self.size_increment
    }

    pub fn parse(head: &FrameHeader, payload: &mut impl Buf) -> Result<WindowUpdate, Http2Error> {
        if payload.remaining() != 4 {
            return Err(Http2Error::InvalidPayloadLength);
        }

        // The reserved top bit is ignored on read.
        let size_increment = payload.get_u32() & !SIZE_INCREMENT_MASK;

        if size_increment == 0 {
            return Err(Http2Error::InvalidWindowUpdateValue);
        }

        Ok(WindowUpdate { stream_id: head.stream_id(), size_increment })
    }

    pub(crate) fn head(&self) -> FrameHeader {
        let mut head = FrameHeader::new(Kind::WindowUpdate, Flag::zero(), self.stream_id);
        head.length = 4;
        head
    }

    pub fn encode(&self, dst: &mut impl BufMut) -> usize {
        let mut size = self.head().encode(dst);
        size += dst.put_u32(self.size_increment);
        log::trace!("encoding WindowUpdate frame; stream={:?} size={}", self.stream_id, size);
        size
    }
}
