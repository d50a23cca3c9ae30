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
use crate::http2::hpack::{Decoder, Encoder};

use super::{
    Continuation, Data, FrameHeader, GoAway, Headers, Kind, Ping, Priority, PushPromise, Reset,
    Settings, StreamIdentifier, WindowUpdate,
};

/// The tagged union of the nine RFC 7540 frame types. Pattern matching here
/// replaces a source-language switch-over-enum.
#[derive(Debug, Eq, PartialEq)]
pub enum Frame {
    Data(Data),
    Headers(Headers),
    Priority(Priority),
    Reset(Reset),
    Settings(Settings),
    PushPromise(PushPromise),
    Ping(Ping),
    GoAway(GoAway),
    WindowUpdate(WindowUpdate),
    Continuation(Continuation),
}

impl Frame {
    pub fn stream_id(&self) -> StreamIdentifier {
        match self {
            Frame::Data(f) => f.stream_id(),
            Frame::Headers(f) => f.stream_id(),
            Frame::Priority(f) => f.stream_id(),
            Frame::Reset(f) => f.stream_id(),
            Frame::Settings(_) => StreamIdentifier::zero(),
            Frame::PushPromise(f) => f.stream_id(),
            Frame::Ping(_) => StreamIdentifier::zero(),
            Frame::GoAway(_) => StreamIdentifier::zero(),
            Frame::WindowUpdate(f) => f.stream_id(),
            Frame::Continuation(f) => f.stream_id(),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Frame::Data(_) => Kind::Data,
            Frame::Headers(_) => Kind::Headers,
            Frame::Priority(_) => Kind::Priority,
            Frame::Reset(_) => Kind::Reset,
            Frame::Settings(_) => Kind::Settings,
            Frame::PushPromise(_) => Kind::PushPromise,
            Frame::Ping(_) => Kind::Ping,
            Frame::GoAway(_) => Kind::GoAway,
            Frame::WindowUpdate(_) => Kind::WindowUpdate,
            Frame::Continuation(_) => Kind::Continuation,
        }
    }

    pub fn is_end_stream(&self) -> bool {
        match self {
            Frame::Data(f) => f.is_end_stream(),
            Frame::Headers(f) => f.is_end_stream(),
            _ => false,
        }
    }

    /// Parses the payload for a frame whose 9-byte header has already been
    /// read, dispatching per the per-type decode rules. `payload` must be
    /// exactly `head.length` bytes.
    pub fn parse(head: &FrameHeader, payload: &mut impl Buf, decoder: &mut Decoder) -> Result<Frame, Http2Error> {
        let kind = head.kind().ok_or(Http2Error::UnknownType(head.kind_byte()))?;
        match kind {
            Kind::Data => Ok(Frame::Data(Data::parse(head, payload)?)),
            Kind::Headers => Ok(Frame::Headers(Headers::parse(head, payload, decoder)?)),
            Kind::Priority => Ok(Frame::Priority(Priority::parse(head, payload)?)),
            Kind::Reset => Ok(Frame::Reset(Reset::parse(head, payload)?)),
            Kind::Settings => Ok(Frame::Settings(Settings::parse(head, payload)?)),
            Kind::PushPromise => Ok(Frame::PushPromise(PushPromise::parse(head, payload, decoder)?)),
            Kind::Ping => Ok(Frame::Ping(Ping::parse(head, payload)?)),
            Kind::GoAway => Ok(Frame::GoAway(GoAway::parse(payload)?)),
            Kind::WindowUpdate => Ok(Frame::WindowUpdate(WindowUpdate::parse(head, payload)?)),
            Kind::Continuation => Ok(Frame::Continuation(Continuation::parse(head, payload, decoder)?)),
        }
    }

    /// Encodes the frame header and payload, HPACK-encoding any header
    /// block fragment through `encoder`.
    pub fn encode(&self, dst: &mut impl BufMut, encoder: &mut Encoder) -> usize {
        match self {
            Frame::Data(f) => f.encode(dst),
            Frame::Headers(f) => f.encode(encoder, dst),
            Frame::Priority(f) => f.encode(dst),
            Frame::Reset(f) => f.encode(dst),
            Frame::Settings(f) => f.encode(dst),
            Frame::PushPromise(f) => f.encode(encoder, dst),
            Frame::Ping(f) => f.encode(dst),
            Frame::GoAway(f) => f.encode(dst),
            Frame::WindowUpdate(f) => f.encode(dst),
            Frame::Continuation(f) => f.encode(encoder, dst),
        }
    }
}

impl From<Data> for Frame {
    fn from(src: Data) -> Self {
        Frame::Data(src)
    }
}

impl From<Headers> for Frame {
    fn from(src: Headers) -> Self {
        Frame::Headers(src)
    }
}

impl From<Priority> for Frame {
    fn from(src: Priority) -> Self {
        Frame::Priority(src)
    }
}

impl From<Reset> for Frame {
    fn from(src: Reset) -> Self {
        Frame::Reset(src)
    }
}

impl From<Settings> for Frame {
    fn from(src: Settings) -> Self {
        Frame::Settings(src)
    }
}

impl From<PushPromise> for Frame {
    fn from(src: PushPromise) -> Self {
        Frame::PushPromise(src)
    }
}

impl From<Ping> for Frame {
    fn from(src: Ping) -> Self {
        Frame::Ping(src)
    }
}

impl From<GoAway> for Frame {
    fn from(src: GoAway) -> Self {
        Frame::GoAway(src)
    }
}

impl From<WindowUpdate> for Frame {
    fn from(src: WindowUpdate) -> Self {
        Frame::WindowUpdate(src)
    }
}

impl From<Continuation> for Frame {
    fn from(src: Continuation) -> Self {
        Frame::Continuation(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http2::frame::Flag;

    #[test]
    fn unknown_type_is_rejected() {
        let head = FrameHeader::parse(&mut &[0, 0, 0, 99, 0, 0, 0, 0, 0][..]).unwrap();
        let mut decoder = Decoder::new();
        let mut payload: &[u8] = &[];
        assert_eq!(Frame::parse(&head, &mut payload, &mut decoder), Err(Http2Error::UnknownType(99)));
    }

    #[test]
    fn window_update_zero_is_protocol_error() {
        let head = FrameHeader::new(Kind::WindowUpdate, Flag::zero(), StreamIdentifier::zero());
        let mut decoder = Decoder::new();
        let mut payload: &[u8] = &[0, 0, 0, 0];
        assert_eq!(Frame::parse(&head, &mut payload, &mut decoder), Err(Http2Error::InvalidWindowUpdateValue));
    }

    #[test]
    fn settings_ack_round_trips() {
        let bytes = [0, 0, 0, 4, 1, 0, 0, 0, 0];
        let head = FrameHeader::parse(&mut &bytes[..]).unwrap();
        let mut decoder = Decoder::new();
        let mut payload: &[u8] = &[];
        let frame = Frame::parse(&head, &mut payload, &mut decoder).unwrap();

        let mut encoder = Encoder::new();
        let mut out = Vec::new();
        frame.encode(&mut out, &mut encoder);
        assert_eq!(out, bytes);
    }
}
