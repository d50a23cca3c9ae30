// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

pub mod frame;
pub mod hpack;

pub use frame::{Codec, Flag, Frame, FrameHeader, Kind, StreamIdentifier};
pub use hpack::{Decoder, Encoder};

/// RFC 7540 section 3.5: the 24-octet client connection preface.
pub const HTTP2_MAGIC: &[u8] = b"PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n";
pub const MAGIC_LEN: usize = 24;

pub const FRAME_HEADER_BYTES: usize = 9;

pub const DEFAULT_SETTINGS_HEADER_TABLE_SIZE: u32 = 4096;
pub const DEFAULT_INITIAL_WINDOW_SIZE: u32 = 65535;
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 16384;
pub const MAX_INITIAL_WINDOW_SIZE: u32 = (1 << 31) - 1;
pub const MAX_MAX_FRAME_SIZE: u32 = (1 << 24) - 1;
pub const MAX_WINDOW_SIZE: u32 = (1 << 31) - 1;

/// Bound on the codec's stream-keyed state; a defensive cap so a peer can't
/// force unbounded memory growth by opening many streams.
pub const DEFAULT_MAX_STREAM_CACHE: usize = 1024;

pub type FrameSize = u32;
pub type WindowSize = u32;
