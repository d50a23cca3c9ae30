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
use crate::http2::FRAME_HEADER_BYTES;

use super::{Flag, Kind, StreamIdentifier};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct FrameHeader {
    pub length: u32,
    kind_byte: u8,
    flag: Flag,
    stream_id: StreamIdentifier,
}

impl FrameHeader {
    pub fn new(kind: Kind, flag: Flag, stream_id: StreamIdentifier) -> FrameHeader {
        FrameHeader { length: 0, kind_byte: kind.encode(), flag, stream_id }
    }

    pub fn kind(&self) -> Option<Kind> {
        Kind::parse(self.kind_byte)
    }

    pub fn kind_byte(&self) -> u8 {
        self.kind_byte
    }

    pub fn stream_id(&self) -> StreamIdentifier {
        self.stream_id
    }

    pub fn flag(&self) -> Flag {
        self.flag
    }

    pub fn flag_mut(&mut self) -> &mut Flag {
        &mut self.flag
    }

    /// Masks `self.flag` down to the bits `Kind` defines for this frame, so
    /// undefined bits never surface past decode.
    pub fn mask_flags_to_allowed(&mut self) {
        if let Some(kind) = self.kind() {
            self.flag &= kind.allowed_flags();
        }
    }

    pub fn parse(buf: &mut impl Buf) -> Result<FrameHeader, Http2Error> {
        if buf.remaining() < FRAME_HEADER_BYTES {
            return Err(Http2Error::Short);
        }
        let length = buf.get_u24();
        let kind_byte = buf.get_u8();
        let flag_byte = buf.get_u8();
        let stream_id = StreamIdentifier::parse(buf.get_u32());
        let mut header = FrameHeader { length, kind_byte, flag: Flag::load(flag_byte), stream_id };
        header.mask_flags_to_allowed();
        Ok(header)
    }

    pub fn encode(&self, out: &mut impl BufMut) -> usize {
        let mut size = 0;
        size += out.put_u24(self.length);
        size += out.put_u8(self.kind_byte);
        size += out.put_u8(self.flag.bits_u8());
        size += out.put_u32(self.stream_id.encode());
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_short_input() {
        let mut buf: &[u8] = &[0u8; 8];
        assert_eq!(FrameHeader::parse(&mut buf), Err(Http2Error::Short));
    }

    #[test]
    fn round_trips_ping_header() {
        let header = FrameHeader::new(Kind::Ping, Flag::zero(), StreamIdentifier::zero());
        let mut out = Vec::new();
        header.encode(&mut out);
        assert_eq!(out, vec![0, 0, 0, 6, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn masks_undefined_flags_on_parse() {
        let mut bytes = vec![0, 0, 0, 4, 0xff, 0, 0, 0, 0];
        let mut slice = &bytes[..];
        let header = FrameHeader::parse(&mut slice).unwrap();
        assert_eq!(header.flag(), Kind::Settings.allowed_flags());
        bytes.clear();
    }
}
