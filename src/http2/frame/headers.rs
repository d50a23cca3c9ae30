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
use crate::error::Http2Error;
use crate::http2::hpack::{Decoder, Encoder, Header};

use super::{Flag, FrameHeader, Kind, StreamDependency, StreamIdentifier};

/// A HEADERS frame. The header block fragment has already been HPACK-decoded
/// into an ordered `(name, value)` list; this codec does not further
/// interpret pseudo-headers or build a request/response view.
#[derive(Eq, PartialEq)]
pub struct Headers {
    stream_id: StreamIdentifier,
    stream_dep: Option<StreamDependency>,
    header_list: Vec<Header>,
    flags: Flag,
}

impl Headers {
    pub fn new(stream_id: StreamIdentifier, header_list: Vec<Header>) -> Self {
        Headers { stream_id, stream_dep: None, header_list, flags: Flag::zero() }
    }

    pub fn with_priority(stream_id: StreamIdentifier, stream_dep: StreamDependency, header_list: Vec<Header>) -> Self {
        Headers { stream_id, stream_dep: Some(stream_dep), header_list, flags: Flag::priority() }
    }

    /// Strips `PADDED`/`PRIORITY` framing and HPACK-decodes the remaining
    /// header block fragment against the connection's shared decoder.
    pub fn parse(head: &FrameHeader, payload: &mut impl Buf, decoder: &mut Decoder) -> Result<Headers, Http2Error> {
        if head.stream_id().is_zero() {
            return Err(Http2Error::InvalidStreamId);
        }
        let flags = head.flag();

        let pad_len = if flags.is_padded() {
            if !payload.has_remaining() {
                return Err(Http2Error::TooMuchPadding);
            }
            Some(payload.get_u8() as usize)
        } else {
            None
        };

        let stream_dep = if flags.is_priority() { Some(StreamDependency::parse(payload)?) } else { None };

        let mut fragment = payload.copy_to_vec();
        if let Some(pad_len) = pad_len {
            if pad_len > fragment.len() {
                return Err(Http2Error::TooMuchPadding);
            }
            fragment.truncate(fragment.len() - pad_len);
        }

        let header_list = decoder.decode_block(&fragment)?;

        Ok(Headers { stream_id: head.stream_id(), stream_dep, header_list, flags })
    }

    pub fn stream_id(&self) -> StreamIdentifier {
        self.stream_id
    }

    pub fn flags(&self) -> Flag {
        self.flags
    }

    pub fn stream_dependency(&self) -> Option<StreamDependency> {
        self.stream_dep
    }

    pub fn is_end_headers(&self) -> bool {
        self.flags.is_end_headers()
    }

    pub fn set_end_headers(&mut self) {
        self.flags.set_end_headers();
    }

    pub fn is_end_stream(&self) -> bool {
        self.flags.is_end_stream()
    }

    pub fn set_end_stream(&mut self) {
        self.flags.set_end_stream();
    }

    pub fn header_list(&self) -> &[Header] {
        &self.header_list
    }

    pub fn into_header_list(self) -> Vec<Header> {
        self.header_list
    }

    /// Re-encodes the header list through `encoder` and writes a complete
    /// HEADERS frame (header + optional priority prefix + header block).
    /// Never emits padding, per the outbound framing choices this codec
    /// makes.
    pub fn encode(&self, encoder: &mut Encoder, dst: &mut impl BufMut) -> usize {
        encoder.reset();
        for (name, value) in &self.header_list {
            encoder.encode_header(name, value);
        }
        let block = encoder.take_output();

        let mut head = FrameHeader::new(Kind::Headers, self.flags, self.stream_id);
        head.length = (block.len() + self.stream_dep.map_or(0, |_| 5)) as u32;

        let mut size = head.encode(dst);
        if let Some(dep) = &self.stream_dep {
            size += dep.encode(dst);
        }
        size += dst.put_slice(&block);
        log::trace!("encoding Headers frame; stream={:?} size={}", self.stream_id, size);
        size
    }
}

impl fmt::Debug for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("Headers");
        builder.field("stream_id", &self.stream_id).field("flags", &self.flags);
        if let Some(dep) = &self.stream_dep {
            builder.field("stream_dep", dep);
        }
        builder.finish()
    }
}

/// A PUSH_PROMISE frame. Like `Headers`, the block fragment is already
/// HPACK-decoded.
#[derive(Eq, PartialEq)]
pub struct PushPromise {
    stream_id: StreamIdentifier,
    promised_id: StreamIdentifier,
    header_list: Vec<Header>,
    flags: Flag,
}

impl PushPromise {
    pub fn new(stream_id: StreamIdentifier, promised_id: StreamIdentifier, header_list: Vec<Header>) -> Self {
        PushPromise { stream_id, promised_id, header_list, flags: Flag::zero() }
    }

    pub fn parse(head: &FrameHeader, payload: &mut impl Buf, decoder: &mut Decoder) -> Result<PushPromise, Http2Error> {
        if head.stream_id().is_zero() {
            return Err(Http2Error::InvalidStreamId);
        }
        let flags = head.flag();

        let pad_len = if flags.is_padded() {
            if !payload.has_remaining() {
                return Err(Http2Error::TooMuchPadding);
            }
            Some(payload.get_u8() as usize)
        } else {
            None
        };

        if payload.remaining() < 4 {
            return Err(Http2Error::PayloadLengthTooShort);
        }
        let promised_id = StreamIdentifier::parse(payload.get_u32());
        if promised_id.is_zero() || promised_id.0 <= head.stream_id().0 {
            return Err(Http2Error::InvalidStreamId);
        }

        let mut fragment = payload.copy_to_vec();
        if let Some(pad_len) = pad_len {
            if pad_len > fragment.len() {
                return Err(Http2Error::TooMuchPadding);
            }
            fragment.truncate(fragment.len() - pad_len);
        }

        let header_list = decoder.decode_block(&fragment)?;

        Ok(PushPromise { stream_id: head.stream_id(), promised_id, header_list, flags })
    }

    pub fn stream_id(&self) -> StreamIdentifier {
        self.stream_id
    }

    pub fn promised_id(&self) -> StreamIdentifier {
        self.promised_id
    }

    pub fn flags(&self) -> Flag {
        self.flags
    }

    pub fn is_end_headers(&self) -> bool {
        self.flags.is_end_headers()
    }

    pub fn set_end_headers(&mut self) {
        self.flags.set_end_headers();
    }

    pub fn header_list(&self) -> &[Header] {
        &self.header_list
    }

    pub fn into_header_list(self) -> Vec<Header> {
        self.header_list
    }

    pub fn encode(&self, encoder: &mut Encoder, dst: &mut impl BufMut) -> usize {
        encoder.reset();
        for (name, value) in &self.header_list {
            encoder.encode_header(name, value);
        }
        let block = encoder.take_output();

        let mut head = FrameHeader::new(Kind::PushPromise, self.flags, self.stream_id);
        head.length = (4 + block.len()) as u32;

        let mut size = head.encode(dst);
        size += dst.put_u32(self.promised_id.encode());
        size += dst.put_slice(&block);
        log::trace!("encoding PushPromise frame; promised_id={:?} size={}", self.promised_id, size);
        size
    }
}

impl fmt::Debug for PushPromise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushPromise")
            .field("stream_id", &self.stream_id)
            .field("promised_id", &self.promised_id)
            .field("flags", &self.flags)
            .finish()
    }
}
