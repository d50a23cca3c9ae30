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
use crate::error::{ErrorCode, Http2Error};

use super::{Flag, FrameHeader, Kind, StreamIdentifier};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Reset {
    stream_id: StreamIdentifier,
    error_code: ErrorCode,
}

impl Reset {
    pub fn new(stream_id: StreamIdentifier, error_code: ErrorCode) -> Reset {
        Reset { stream_id, error_code }
    }

    pub fn stream_id(&self) -> StreamIdentifier {
        self.stream_id
    }

    pub fn error_code(&self) -> ErrorCode {
        self.error_code
    }

    pub fn parse(head: &FrameHeader, payload: &mut impl Buf) -> Result<Reset, Http2Error> {
        if head.stream_id().is_zero() {
            return Err(Http2Error::InvalidStreamId);
        }
        if payload.remaining() != 4 {
            return Err(Http2Error::InvalidPayloadLength);
        }

        Ok(Reset { stream_id: head.stream_id(), error_code: payload.get_u32().into() })
    }

    pub(crate) fn head(&self) -> FrameHeader {
        let mut head = FrameHeader::new(Kind::Reset, Flag::zero(), self.stream_id);
        head.length = 4;
        head
    }

    pub fn encode(&self, dst: &mut impl BufMut) -> usize {
        let mut size = self.head().encode(dst);
        size += dst.put_u32(self.error_code.into());
        log::trace!("encoding Reset frame; stream={:?} size={}", self.stream_id, size);
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        let head = FrameHeader::new(Kind::Reset, Flag::zero(), StreamIdentifier(1));
        let mut payload: &[u8] = &[0, 0, 0];
        assert_eq!(Reset::parse(&head, &mut payload), Err(Http2Error::InvalidPayloadLength));
    }

    #[test]
    fn rejects_stream_zero() {
        let head = FrameHeader::new(Kind::Reset, Flag::zero(), StreamIdentifier::zero());
        let mut payload: &[u8] = &[0, 0, 0, 8];
        assert_eq!(Reset::parse(&head, &mut payload), Err(Http2Error::InvalidStreamId));
    }

    #[test]
    fn round_trips_cancel() {
        let reset = Reset::new(StreamIdentifier(1), ErrorCode::CANCEL);
        let mut out = Vec::new();
        reset.encode(&mut out);

        let head = FrameHeader::parse(&mut &out[..]).unwrap();
        let mut payload = &out[9..];
        let parsed = Reset::parse(&head, &mut payload).unwrap();
        assert_eq!(parsed.error_code(), ErrorCode::CANCEL);
    }
}
