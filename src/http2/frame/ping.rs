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

/// An 8-byte opaque payload, echoed back verbatim on the matching ACK.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Ping {
    payload: [u8; 8],
    flags: Flag,
}

impl Ping {
    pub fn new(payload: [u8; 8]) -> Ping {
        Ping { payload, flags: Flag::zero() }
    }

    pub fn ack(payload: [u8; 8]) -> Ping {
        Ping { payload, flags: Flag::ack() }
    }

    pub fn payload(&self) -> [u8; 8] {
        self.payload
    }

    pub fn is_ack(&self) -> bool {
        self.flags.is_ack()
    }

    /// The ACK to send back in reply to this ping.
    pub fn to_ack(&self) -> Ping {
        Ping::ack(self.payload)
    }

    pub fn parse(head: &FrameHeader, payload: &mut impl Buf) -> Result<Ping, Http2Error> {
        if !head.stream_id().is_zero() {
            return Err(Http2Error::InvalidStreamId);
        }
        if payload.remaining() != 8 {
            return Err(Http2Error::InvalidPayloadLength);
        }

        let mut data = [0u8; 8];
        payload.copy_to_slice(&mut data);
        Ok(Ping { payload: data, flags: head.flag() })
    }

    pub(crate) fn head(&self) -> FrameHeader {
        let mut head = FrameHeader::new(Kind::Ping, self.flags, StreamIdentifier::zero());
        head.length = 8;
        head
    }

    pub fn encode(&self, dst: &mut impl BufMut) -> usize {
        let mut size = self.head().encode(dst);
        size += dst.put_slice(&self.payload);
        log::trace!("encoding Ping frame; ack={} size={}", self.is_ack(), size);
        size
    }
}

impl std::fmt::Debug for Ping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ping").field("ack", &self.is_ack()).field("payload", &self.payload).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_zero_stream() {
        let head = FrameHeader::new(Kind::Ping, Flag::zero(), StreamIdentifier(1));
        let mut payload: &[u8] = &[0u8; 8];
        assert_eq!(Ping::parse(&head, &mut payload), Err(Http2Error::InvalidStreamId));
    }

    #[test]
    fn rejects_wrong_length() {
        let head = FrameHeader::new(Kind::Ping, Flag::zero(), StreamIdentifier::zero());
        let mut payload: &[u8] = &[0u8; 7];
        assert_eq!(Ping::parse(&head, &mut payload), Err(Http2Error::InvalidPayloadLength));
    }

    #[test]
    fn round_trips_wire_example() {
        let bytes = [0, 0, 8, 6, 0, 0, 0, 0, 0, 0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef];
        let head = FrameHeader::parse(&mut &bytes[..]).unwrap();
        let mut payload = &bytes[9..];
        let parsed = Ping::parse(&head, &mut payload).unwrap();
        assert_eq!(parsed.payload(), [0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef]);

        let mut out = Vec::new();
        parsed.encode(&mut out);
        assert_eq!(out, bytes);
    }

    #[test]
    fn ack_echoes_payload() {
        let ping = Ping::new([1, 2, 3, 4, 5, 6, 7, 8]);
        let ack = ping.to_ack();
        assert!(ack.is_ack());
        assert_eq!(ack.payload(), ping.payload());
    }
}
