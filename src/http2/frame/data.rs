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

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Data {
    stream_id: StreamIdentifier,
    data: Vec<u8>,
    flags: Flag,
}

impl Data {
    pub fn new(stream_id: StreamIdentifier, data: Vec<u8>) -> Self {
        assert!(!stream_id.is_zero());
        Data { stream_id, data, flags: Flag::zero() }
    }

    pub fn stream_id(&self) -> StreamIdentifier {
        self.stream_id
    }

    pub fn is_end_stream(&self) -> bool {
        self.flags.is_end_stream()
    }

    pub fn set_end_stream(&mut self, val: bool) {
        if val {
            self.flags.set_end_stream();
        } else {
            self.flags.unset_end_stream();
        }
    }

    pub fn flags(&self) -> Flag {
        self.flags
    }

    pub fn payload(&self) -> &[u8] {
        &self.data
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.data
    }

    /// Parses a DATA payload, stripping and validating `PADDED` framing.
    pub fn parse(head: &FrameHeader, payload: &mut impl Buf) -> Result<Data, Http2Error> {
        if head.stream_id().is_zero() {
            return Err(Http2Error::InvalidStreamId);
        }

        let body = if head.flag().is_padded() {
            if !payload.has_remaining() {
                return Err(Http2Error::TooMuchPadding);
            }
            let pad_len = payload.get_u8() as usize;
            if pad_len > payload.remaining() {
                return Err(Http2Error::TooMuchPadding);
            }
            let data_len = payload.remaining() - pad_len;
            let mut data = vec![0u8; data_len];
            payload.copy_to_slice(&mut data);
            payload.advance(pad_len);
            data
        } else {
            payload.copy_to_vec()
        };

        Ok(Data { stream_id: head.stream_id(), data: body, flags: head.flag() })
    }

    pub(crate) fn head(&self) -> FrameHeader {
        let mut head = FrameHeader::new(Kind::Data, self.flags, self.stream_id);
        head.length = self.data.len() as u32;
        head
    }

    /// DATA is never emitted padded (see source notes on outbound framing).
    pub fn encode(&self, dst: &mut impl BufMut) -> usize {
        let mut size = self.head().encode(dst);
        size += dst.put_slice(&self.data);
        log::trace!("encoding Data frame; stream={:?} size={}", self.stream_id, size);
        size
    }
}
