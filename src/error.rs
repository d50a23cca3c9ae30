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

/// Error codes defined by RFC 7540 section 7, carried on RST_STREAM and
/// GOAWAY frames.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ErrorCode(pub u32);

impl ErrorCode {
    pub const NO_ERROR: ErrorCode = ErrorCode(0x0);
    pub const PROTOCOL_ERROR: ErrorCode = ErrorCode(0x1);
    pub const INTERNAL_ERROR: ErrorCode = ErrorCode(0x2);
    pub const FLOW_CONTROL_ERROR: ErrorCode = ErrorCode(0x3);
    pub const SETTINGS_TIMEOUT: ErrorCode = ErrorCode(0x4);
    pub const STREAM_CLOSED: ErrorCode = ErrorCode(0x5);
    pub const FRAME_SIZE_ERROR: ErrorCode = ErrorCode(0x6);
    pub const REFUSED_STREAM: ErrorCode = ErrorCode(0x7);
    pub const CANCEL: ErrorCode = ErrorCode(0x8);
    pub const COMPRESSION_ERROR: ErrorCode = ErrorCode(0x9);
    pub const CONNECT_ERROR: ErrorCode = ErrorCode(0xa);
    pub const ENHANCE_YOUR_CALM: ErrorCode = ErrorCode(0xb);
    pub const INADEQUATE_SECURITY: ErrorCode = ErrorCode(0xc);
    pub const HTTP_1_1_REQUIRED: ErrorCode = ErrorCode(0xd);
}

impl From<u32> for ErrorCode {
    fn from(v: u32) -> ErrorCode {
        ErrorCode(v)
    }
}

impl From<ErrorCode> for u32 {
    fn from(v: ErrorCode) -> u32 {
        v.0
    }
}

/// Errors produced while decoding an HPACK header block.
#[derive(Debug, Eq, PartialEq)]
pub enum HpackError {
    /// Not enough bytes remained to decode an integer or string literal.
    NotEnoughOctets,
    /// A prefix integer used more than 10 continuation octets.
    IntegerOverflow,
    /// An indexed header field referenced index zero, or an index past the
    /// combined static/dynamic table.
    IndexOutOfRange(usize),
    /// A dynamic table size update asked for a size bigger than the
    /// connection-agreed maximum.
    InvalidTableSizeUpdate,
    /// The Huffman-encoded bit string was malformed (bad padding, or an EOS
    /// symbol appeared inside the string).
    InvalidHuffmanEncoding,
    /// A literal string's declared length ran past the end of the block.
    TruncatedBlock,
    /// Decoded string bytes were not valid UTF-8.
    InvalidStringEncoding,
    /// An indexed header field resolved to an entry with an empty value;
    /// only literal representations may reference such entries.
    IndexedHeaderWithNoValue(usize),
}

impl HpackError {
    fn description_str(&self) -> &'static str {
        match self {
            HpackError::NotEnoughOctets => "not enough octets remaining",
            HpackError::IntegerOverflow => "integer used too many continuation octets",
            HpackError::IndexOutOfRange(_) => "header table index out of range",
            HpackError::InvalidTableSizeUpdate => "dynamic table size update exceeds agreed maximum",
            HpackError::InvalidHuffmanEncoding => "invalid huffman encoding",
            HpackError::TruncatedBlock => "literal string runs past the end of the header block",
            HpackError::InvalidStringEncoding => "decoded string is not valid utf-8",
            HpackError::IndexedHeaderWithNoValue(_) => "indexed header field has no value",
        }
    }
}

impl fmt::Display for HpackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description_str())
    }
}

/// Errors produced while decoding or encoding an HTTP/2 frame.
#[derive(Debug, Eq, PartialEq)]
pub enum Http2Error {
    /// Fewer than 9 bytes were available to decode a frame header.
    Short,
    /// The flags octet could not be parsed for the frame's `Kind`.
    BadFlag(u8),
    /// A frame that must be sent on stream zero carried a non-zero stream id
    /// (or vice versa).
    InvalidStreamId,
    /// A SETTINGS value fell outside the range allowed for its identifier.
    InvalidSettingValue,
    /// A frame's declared payload was shorter than the minimum required for
    /// its type.
    PayloadLengthTooShort,
    /// A frame's payload length did not match what its type requires.
    InvalidPayloadLength,
    /// A SETTINGS payload length was not a multiple of 6.
    PartialSettingLength,
    /// The padding length byte claimed more padding than the frame payload
    /// could hold.
    TooMuchPadding,
    /// A PRIORITY frame declared a stream as dependent on itself.
    InvalidDependencyId,
    /// A frame's declared length exceeded the negotiated SETTINGS_MAX_FRAME_SIZE.
    BadFrameSize,
    /// A WINDOW_UPDATE frame carried a zero size increment.
    InvalidWindowUpdateValue,
    /// The frame type octet did not match any of the nine known kinds.
    UnknownType(u8),
    /// A frame referenced a stream id the connection has no record of.
    NoSuchStream,
    /// Failure surfaced by the HPACK codec while decoding a header block.
    Hpack(HpackError),
}

impl Http2Error {
    fn description_str(&self) -> &'static str {
        match self {
            Http2Error::Short => "not enough bytes for a frame header",
            Http2Error::BadFlag(_) => "invalid flags octet",
            Http2Error::InvalidStreamId => "invalid stream identifier for this frame type",
            Http2Error::InvalidSettingValue => "setting value out of range",
            Http2Error::PayloadLengthTooShort => "payload shorter than the minimum for this frame type",
            Http2Error::InvalidPayloadLength => "payload length invalid for this frame type",
            Http2Error::PartialSettingLength => "settings payload length is not a multiple of 6",
            Http2Error::TooMuchPadding => "pad length exceeds remaining payload",
            Http2Error::InvalidDependencyId => "stream cannot depend on itself",
            Http2Error::BadFrameSize => "frame length exceeds the negotiated maximum",
            Http2Error::InvalidWindowUpdateValue => "window update increment must be non-zero",
            Http2Error::UnknownType(_) => "unknown frame type",
            Http2Error::NoSuchStream => "no record of this stream id",
            Http2Error::Hpack(e) => e.description_str(),
        }
    }
}

impl fmt::Display for Http2Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description_str())
    }
}

impl From<HpackError> for Http2Error {
    fn from(e: HpackError) -> Http2Error {
        Http2Error::Hpack(e)
    }
}

pub type Result<T> = std::result::Result<T, Http2Error>;
