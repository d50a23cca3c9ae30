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

use super::{Flag, FrameHeader, Kind, StreamIdentifier, STREAM_ID_MASK};

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Priority {
    stream_id: StreamIdentifier,
    dependency: StreamDependency,
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct StreamDependency {
    dependency_id: StreamIdentifier,
    /// Exposed in the range `[0, 255]` rather than RFC 7540's `[1, 256]`, so
    /// it fits in a `u8`.
    weight: u8,
    is_exclusive: bool,
}

impl Priority {
    pub fn new(stream_id: StreamIdentifier, dependency: StreamDependency) -> Priority {
        Priority { stream_id, dependency }
    }

    pub fn parse(head: &FrameHeader, payload: &mut impl Buf) -> Result<Priority, Http2Error> {
        if head.stream_id().is_zero() {
            return Err(Http2Error::InvalidStreamId);
        }
        if payload.remaining() != 5 {
            return Err(Http2Error::InvalidPayloadLength);
        }

        let dependency = StreamDependency::parse(payload)?;

        if dependency.dependency_id() == head.stream_id() {
            return Err(Http2Error::InvalidDependencyId);
        }

        Ok(Priority { stream_id: head.stream_id(), dependency })
    }

    pub fn stream_id(&self) -> StreamIdentifier {
        self.stream_id
    }

    pub fn dependency_id(&self) -> StreamIdentifier {
        self.dependency.dependency_id
    }

    pub fn weight(&self) -> u8 {
        self.dependency.weight
    }

    pub fn is_exclusive(&self) -> bool {
        self.dependency.is_exclusive
    }

    pub(crate) fn head(&self) -> FrameHeader {
        let mut head = FrameHeader::new(Kind::Priority, Flag::zero(), self.stream_id);
        head.length = 5;
        head
    }

    pub fn encode(&self, dst: &mut impl BufMut) -> usize {
        let mut size = 0;
        size += self.head().encode(dst);
        size += self.dependency.encode(dst);
        log::trace!("encoding Priority frame; stream={:?} size={}", self.stream_id, size);
        size
    }
}

impl StreamDependency {
    pub fn new(dependency_id: StreamIdentifier, weight: u8, is_exclusive: bool) -> Self {
        StreamDependency { dependency_id, weight, is_exclusive }
    }

    pub fn parse(src: &mut impl Buf) -> Result<Self, Http2Error> {
        if src.remaining() < 5 {
            return Err(Http2Error::PayloadLengthTooShort);
        }

        let raw = src.get_u32();
        let dependency_id = StreamIdentifier(raw & STREAM_ID_MASK);
        let is_exclusive = raw & !STREAM_ID_MASK != 0;
        let weight = src.get_u8();
        Ok(StreamDependency::new(dependency_id, weight, is_exclusive))
    }

    pub fn dependency_id(&self) -> StreamIdentifier {
        self.dependency_id
    }

    pub fn weight(&self) -> u8 {
        self.weight
    }

    pub fn is_exclusive(&self) -> bool {
        self.is_exclusive
    }

    pub(crate) fn encode(&self, dst: &mut impl BufMut) -> usize {
        let mut raw = self.dependency_id.encode();
        if self.is_exclusive {
            raw |= !STREAM_ID_MASK;
        }
        let mut size = dst.put_u32(raw);
        size += dst.put_u8(self.weight);
        size
    }
}
