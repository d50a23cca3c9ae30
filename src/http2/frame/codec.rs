// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

use std::collections::BTreeSet;

use crate::binary::{Buf, BufMut};
use crate::error::Http2Error;
use crate::http2::hpack::{Decoder, Encoder};
use crate::http2::{DEFAULT_MAX_STREAM_CACHE, DEFAULT_SETTINGS_HEADER_TABLE_SIZE, FRAME_HEADER_BYTES};

use super::{read_u24, Frame, FrameHeader};

/// Bounded set of stream ids the codec has observed, so frames referring to
/// since-evicted streams can still be parsed rather than rejected outright.
/// HPACK state lives on `Codec` itself, not per-stream — see the source's
/// design note recommending connection-wide HPACK state; this cache exists
/// purely for `NoSuchStream` liveness bookkeeping.
pub struct StreamCache {
    max_streams: usize,
    streams: BTreeSet<u32>,
}

impl StreamCache {
    const ROOT: u32 = 0;
    const MAX: u32 = i32::MAX as u32;

    pub fn new(max_streams: usize) -> Self {
        let mut streams = BTreeSet::new();
        streams.insert(Self::ROOT);
        streams.insert(Self::MAX);
        StreamCache { max_streams, streams }
    }

    /// Records `stream_id` as known, evicting the lowest-numbered
    /// non-sentinel entry first if the cache is at capacity.
    pub fn touch(&mut self, stream_id: u32) {
        if self.streams.contains(&stream_id) {
            return;
        }
        if self.streams.len() >= self.max_streams {
            let evict = self.streams.iter().copied().find(|&id| id != Self::ROOT && id != Self::MAX);
            if let Some(evict) = evict {
                log::trace!("stream cache full; evicting stream {}", evict);
                self.streams.remove(&evict);
            }
        }
        self.streams.insert(stream_id);
    }

    pub fn contains(&self, stream_id: u32) -> bool {
        self.streams.contains(&stream_id)
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }
}

impl Default for StreamCache {
    fn default() -> Self {
        StreamCache::new(DEFAULT_MAX_STREAM_CACHE)
    }
}

/// Connection-level frame codec. Owns a single HPACK encoder/decoder pair
/// (HPACK is defined per-connection, not per-stream — see source design
/// note) and a bounded cache of stream ids it has seen.
pub struct Codec {
    decoder: Decoder,
    encoder: Encoder,
    streams: StreamCache,
}

impl Codec {
    pub fn new() -> Self {
        Codec::with_header_table_size(DEFAULT_SETTINGS_HEADER_TABLE_SIZE as usize)
    }

    pub fn with_header_table_size(size: usize) -> Self {
        Codec {
            decoder: Decoder::with_dynamic_table_size(size),
            encoder: Encoder::with_dynamic_table_size(size),
            streams: StreamCache::default(),
        }
    }

    pub fn decoder(&mut self) -> &mut Decoder {
        &mut self.decoder
    }

    pub fn encoder(&mut self) -> &mut Encoder {
        &mut self.encoder
    }

    pub fn streams(&self) -> &StreamCache {
        &self.streams
    }

    /// Decodes one frame from the front of `buf`. On `Err(Http2Error::Short)`
    /// no bytes have been consumed, so the caller can retry once more data
    /// arrives.
    pub fn decode_frame(&mut self, buf: &mut impl Buf) -> Result<Frame, Http2Error> {
        if buf.remaining() < FRAME_HEADER_BYTES {
            return Err(Http2Error::Short);
        }

        let length = read_u24(buf.chunk()) as usize;
        if buf.remaining() < FRAME_HEADER_BYTES + length {
            return Err(Http2Error::Short);
        }

        let head = FrameHeader::parse(buf)?;

        // Split off exactly `length` owned bytes and advance past them before
        // attempting to interpret the payload, so a parse failure (including
        // `UnknownType`) never leaves `buf` positioned mid-frame — the next
        // `decode_frame` call always starts at the next frame's header.
        let payload_bytes = buf.chunk()[..length].to_vec();
        buf.advance(length);

        self.streams.touch(head.stream_id().0);

        let mut payload: &[u8] = &payload_bytes;
        let frame = Frame::parse(&head, &mut payload, &mut self.decoder)?;
        Ok(frame)
    }

    /// Encodes `frame`'s header and payload, HPACK-encoding any header
    /// block fragment through the connection's shared encoder.
    pub fn encode_frame(&mut self, frame: &Frame, dst: &mut impl BufMut) -> usize {
        let size = frame.encode(dst, &mut self.encoder);
        self.streams.touch(frame.stream_id().0);
        size
    }
}

impl Default for Codec {
    fn default() -> Self {
        Codec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http2::frame::{Kind, Ping};

    #[test]
    fn decode_frame_reports_short_without_consuming() {
        let mut codec = Codec::new();
        let bytes = [0u8, 0, 8, 6, 0, 0, 0, 0, 0, 1, 2, 3];
        let mut buf: &[u8] = &bytes;
        assert_eq!(codec.decode_frame(&mut buf), Err(Http2Error::Short));
        assert_eq!(buf.remaining(), bytes.len());
    }

    #[test]
    fn round_trips_ping_through_codec() {
        let mut codec = Codec::new();
        let ping = Ping::new([0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef]);
        let mut out = Vec::new();
        codec.encode_frame(&ping.clone().into(), &mut out);

        let mut input: &[u8] = &out;
        let frame = codec.decode_frame(&mut input).unwrap();
        match frame {
            Frame::Ping(p) => assert_eq!(p.payload(), ping.payload()),
            other => panic!("expected Ping, got {other:?}"),
        }
    }

    #[test]
    fn window_update_zero_is_rejected() {
        let mut codec = Codec::new();
        let bytes = [0u8, 0, 4, 8, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut buf: &[u8] = &bytes;
        assert_eq!(codec.decode_frame(&mut buf), Err(Http2Error::InvalidWindowUpdateValue));
    }

    #[test]
    fn stream_cache_evicts_lowest_non_sentinel_at_capacity() {
        let mut cache = StreamCache::new(3);
        cache.touch(5);
        assert_eq!(cache.len(), 3);
        cache.touch(7);
        assert!(!cache.contains(5));
        assert!(cache.contains(7));
        assert!(cache.contains(0));
        assert!(cache.contains(i32::MAX as u32));
    }

    #[test]
    fn settings_frame_kind_round_trips() {
        let mut codec = Codec::new();
        let bytes = [0u8, 0, 0, 4, 1, 0, 0, 0, 0];
        let mut buf: &[u8] = &bytes;
        let frame = codec.decode_frame(&mut buf).unwrap();
        assert_eq!(frame.kind(), Kind::Settings);

        let mut out = Vec::new();
        codec.encode_frame(&frame, &mut out);
        assert_eq!(out, bytes);
    }
}
