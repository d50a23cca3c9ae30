// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

use std::fmt;

use crate::binary::{Buf, BufMut};
use crate::error::{ErrorCode, Http2Error};

use super::{Flag, FrameHeader, Kind, StreamIdentifier};

#[derive(Clone, Eq, PartialEq)]
pub struct GoAway {
    last_stream_id: StreamIdentifier,
    error_code: ErrorCode,
    debug_data: Vec<u8>,
}

impl GoAway {
    pub fn new(last_stream_id: StreamIdentifier, error_code: ErrorCode) -> Self {
        GoAway { last_stream_id, error_code, debug_data: Vec::new() }
    }

    pub fn with_debug_data(last_stream_id: StreamIdentifier, error_code: ErrorCode, debug_data: Vec<u8>) -> Self {
        GoAway { last_stream_id, error_code, debug_data }
    }

    pub fn last_stream_id(&self) -> StreamIdentifier {
        self.last_stream_id
    }

    pub fn error_code(&self) -> ErrorCode {
        self.error_code
    }

    pub fn debug_data(&self) -> &[u8] {
        &self.debug_data
    }

    pub fn parse(payload: &mut impl Buf) -> Result<GoAway, Http2Error> {
        if payload.remaining() < 8 {
            return Err(Http2Error::PayloadLengthTooShort);
        }

        let last_stream_id = StreamIdentifier::parse(payload.get_u32());
        let error_code = payload.get_u32().into();
        let debug_data = payload.copy_to_vec();

        Ok(GoAway { last_stream_id, error_code, debug_data })
    }

    pub(crate) fn head(&self) -> FrameHeader {
        let mut head = FrameHeader::new(Kind::GoAway, Flag::zero(), StreamIdentifier::zero());
        head.length = 8 + self.debug_data.len() as u32;
        head
    }

    pub fn encode(&self, dst: &mut impl BufMut) -> usize {
        let mut size = self.head().encode(dst);
        size += dst.put_u32(self.last_stream_id.encode());
        size += dst.put_u32(self.error_code.into());
        size += dst.put_slice(&self.debug_data);
        log::trace!("encoding GoAway frame; last_stream_id={:?} size={}", self.last_stream_id, size);
        size
    }
}

impl fmt::Debug for GoAway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("GoAway");
        builder.field("last_stream_id", &self.last_stream_id);
        builder.field("error_code", &self.error_code);
        if !self.debug_data.is_empty() {
            builder.field("debug_data", &self.debug_data);
        }
        builder.finish()
    }
}
