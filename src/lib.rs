//! HTTP/2 (RFC 7540) frame codec and HPACK (RFC 7541) header compression.

pub mod binary;
pub mod error;
pub mod http2;

pub use error::{ErrorCode, HpackError, Http2Error, Result};
pub use http2::{Codec, Decoder, Encoder, Frame, FrameHeader, Kind, StreamIdentifier};
