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
use crate::http2::hpack::{Decoder, Encoder, Header};

use super::{Flag, FrameHeader, Kind, StreamIdentifier};

/// A CONTINUATION frame: the entire payload is a header block fragment.
/// The codec does not track END_HEADERS ordering across frames; reassembling
/// fragments before decode is the caller's responsibility (see the source's
/// design note on HEADERS/CONTINUATION boundaries).
#[derive(Eq, PartialEq, Debug)]
pub struct Continuation {
    stream_id: StreamIdentifier,
    header_list: Vec<Header>,
    flags: Flag,
}

impl Continuation {
    pub fn new(stream_id: StreamIdentifier, header_list: Vec<Header>) -> Self {
        Continuation { stream_id, header_list, flags: Flag::zero() }
    }

    pub fn parse(head: &FrameHeader, payload: &mut impl Buf, decoder: &mut Decoder) -> Result<Continuation, Http2Error> {
        if head.stream_id().is_zero() {
            return Err(Http2Error::InvalidStreamId);
        }
        let fragment = payload.copy_to_vec();
        let header_list = decoder.decode_block(&fragment)?;
        Ok(Continuation { stream_id: head.stream_id(), header_list, flags: head.flag() })
    }

    pub fn stream_id(&self) -> StreamIdentifier {
        self.stream_id
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

        let mut head = FrameHeader::new(Kind::Continuation, self.flags, self.stream_id);
        head.length = block.len() as u32;

        let mut size = head.encode(dst);
        size += dst.put_slice(&block);
        log::trace!("encoding Continuation frame; stream={:?} size={}", self.stream_id, size);
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_stream_zero() {
        let head = FrameHeader::new(Kind::Continuation, Flag::zero(), StreamIdentifier::zero());
        let mut decoder = Decoder::new();
        let mut payload: &[u8] = &[0x82];
        assert_eq!(Continuation::parse(&head, &mut payload, &mut decoder), Err(Http2Error::InvalidStreamId));
    }

    #[test]
    fn round_trips_header_block() {
        let mut encoder = Encoder::new();
        let mut decoder = Decoder::new();
        let continuation = Continuation::new(StreamIdentifier(1), vec![(b":method".to_vec(), b"GET".to_vec())]);

        let mut out = Vec::new();
        continuation.encode(&mut encoder, &mut out);

        let head = FrameHeader::parse(&mut &out[..]).unwrap();
        let mut payload = &out[9..];
        let parsed = Continuation::parse(&head, &mut payload, &mut decoder).unwrap();
        assert_eq!(parsed.header_list(), continuation.header_list());
    }
}
