use h2frame::binary::Buf;
use h2frame::error::Http2Error;
use h2frame::http2::frame::{Flag, Kind, Ping, Reset, StreamIdentifier};
use h2frame::http2::hpack::{Decoder, Encoder};
use h2frame::{Codec, Frame, FrameHeader};

fn hex(s: &str) -> Vec<u8> {
    (0..s.len()).step_by(2).map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap()).collect()
}

#[test]
fn hpack_indexed_static_get_round_trips() {
    let mut decoder = Decoder::new();
    let headers = decoder.decode_block(&hex("82")).unwrap();
    assert_eq!(headers, vec![(b":method".to_vec(), b"GET".to_vec())]);

    let mut encoder = Encoder::new();
    encoder.encode_header(b":method", b"GET");
    assert_eq!(encoder.output(), &[0x82]);
}

#[test]
fn hpack_literal_with_incremental_indexing() {
    let mut decoder = Decoder::new();
    let block = hex("400a637573746f6d2d6b65790d637573746f6d2d686561646572");
    let headers = decoder.decode_block(&block).unwrap();
    assert_eq!(headers, vec![(b"custom-key".to_vec(), b"custom-header".to_vec())]);
    assert_eq!(decoder.dynamic_table_bytes(), 10 + 13 + 32);
}

#[test]
fn hpack_huffman_rfc7541_c_4_1() {
    let mut decoder = Decoder::new();
    let block = hex("828684418cf1e3c2e5f23a6ba0ab90f4ff");
    let headers = decoder.decode_block(&block).unwrap();
    assert_eq!(
        headers,
        vec![
            (b":method".to_vec(), b"GET".to_vec()),
            (b":scheme".to_vec(), b"http".to_vec()),
            (b":path".to_vec(), b"/".to_vec()),
            (b":authority".to_vec(), b"www.example.com".to_vec()),
        ]
    );
}

#[test]
fn frame_ping_round_trips() {
    let mut codec = Codec::new();
    let ping = Ping::new([0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef]);
    let mut out = Vec::new();
    codec.encode_frame(&Frame::Ping(ping), &mut out);
    assert_eq!(out, vec![0, 0, 8, 6, 0, 0, 0, 0, 0, 0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef]);

    let mut input: &[u8] = &out;
    let frame = codec.decode_frame(&mut input).unwrap();
    assert!(matches!(frame, Frame::Ping(_)));
}

#[test]
fn frame_settings_ack_round_trips() {
    let mut codec = Codec::new();
    // SETTINGS ACK: length 0, type 4, flags ACK(1), stream 0
    let bytes = vec![0, 0, 0, 4, 1, 0, 0, 0, 0];
    let mut input: &[u8] = &bytes;
    let frame = codec.decode_frame(&mut input).unwrap();
    match &frame {
        Frame::Settings(s) => assert!(s.is_ack()),
        _ => panic!("expected Settings frame"),
    }

    let mut out = Vec::new();
    codec.encode_frame(&frame, &mut out);
    assert_eq!(out, bytes);
}

#[test]
fn frame_window_update_zero_is_protocol_error() {
    let mut codec = Codec::new();
    let bytes = vec![0, 0, 4, 8, 0, 0, 0, 0, 0, 0, 0, 0, 0];
    let mut input: &[u8] = &bytes;
    assert_eq!(codec.decode_frame(&mut input), Err(Http2Error::InvalidWindowUpdateValue));
}

#[test]
fn frame_header_masks_reserved_stream_bit_on_encode() {
    let head = FrameHeader::new(Kind::Reset, Flag::zero(), StreamIdentifier(0x8000_0001));
    let mut out = Vec::new();
    head.encode(&mut out);
    let stream_id_bytes = u32::from_be_bytes([out[5], out[6], out[7], out[8]]);
    assert_eq!(stream_id_bytes & 0x8000_0000, 0);
}

#[test]
fn headers_on_different_streams_share_connection_level_dynamic_table() {
    let mut codec = Codec::new();

    let mut out1 = Vec::new();
    let headers1 = h2frame::http2::frame::Headers::new(
        StreamIdentifier(1),
        vec![(b"x-request-id".to_vec(), b"abc-123".to_vec())],
    );
    codec.encode_frame(&headers1.into(), &mut out1);

    let mut out2 = Vec::new();
    let headers2 = h2frame::http2::frame::Headers::new(
        StreamIdentifier(3),
        vec![(b"x-request-id".to_vec(), b"abc-123".to_vec())],
    );
    codec.encode_frame(&headers2.into(), &mut out2);

    // Same connection-level encoder dynamic table means the second stream's
    // identical header re-uses the dynamic table entry the first stream
    // inserted, so its block is shorter.
    assert!(out2.len() < out1.len());
}

#[test]
fn reset_stream_round_trips_through_codec() {
    let mut codec = Codec::new();
    let reset = Reset::new(StreamIdentifier(3), h2frame::error::ErrorCode::CANCEL);
    let mut out = Vec::new();
    codec.encode_frame(&reset.into(), &mut out);

    let mut input: &[u8] = &out;
    let frame = codec.decode_frame(&mut input).unwrap();
    match frame {
        Frame::Reset(r) => assert_eq!(r.error_code(), h2frame::error::ErrorCode::CANCEL),
        _ => panic!("expected Reset frame"),
    }
}

#[test]
fn unknown_frame_type_is_reported_not_fatal_to_parse_other_frames() {
    let mut codec = Codec::new();
    // An unknown-type (200) frame with a nonzero 3-byte payload, immediately
    // followed by a complete PING frame. Decoding the first must consume
    // exactly its own header + payload, leaving the buffer positioned at the
    // start of the second frame rather than stranded mid-payload.
    let mut bytes = vec![0, 0, 3, 200, 0, 0, 0, 0, 1, 0xaa, 0xbb, 0xcc];
    bytes.extend_from_slice(&[0, 0, 8, 6, 0, 0, 0, 0, 0, 0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef]);
    let mut input: &[u8] = &bytes;

    assert_eq!(codec.decode_frame(&mut input), Err(Http2Error::UnknownType(200)));
    assert_eq!(input.remaining(), 17);

    let frame = codec.decode_frame(&mut input).unwrap();
    assert!(matches!(frame, Frame::Ping(_)));
    assert_eq!(input.remaining(), 0);
}

#[test]
fn settings_values_validated_per_identifier() {
    let mut codec = Codec::new();
    // SETTINGS_ENABLE_PUSH = 2
    let mut bytes = vec![0, 0, 6, 4, 0, 0, 0, 0, 0];
    bytes.extend_from_slice(&[0, 2, 0, 0, 0, 5]);
    let mut input: &[u8] = &bytes;
    assert_eq!(codec.decode_frame(&mut input), Err(Http2Error::InvalidSettingValue));
}
