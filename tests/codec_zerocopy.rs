//! Integration tests for the frame codec
//!
//! These tests validate the zero-copy characteristics of the frame codec:
//! payloads are split off the read buffer, partial frames leave the buffer
//! untouched, and back-to-back frames decode one at a time.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use bytes::{BufMut, Bytes, BytesMut};
use cluster_protocol::core::codec::FrameCodec;
use cluster_protocol::core::packet::{Frame, FRAME_HEADER_SIZE};
use cluster_protocol::error::ProtocolError;
use cluster_protocol::protocol::{AddRootBlockResponse, ClusterOp, ClusterRecord};
use tokio_util::codec::{Decoder, Encoder};

fn sample_frame(rpc_id: u64) -> Frame {
    AddRootBlockResponse {
        error_code: 0,
        switched: true,
    }
    .to_frame(rpc_id)
    .expect("Failed to frame message")
}

#[test]
fn test_codec_decode_zero_copy_split() {
    let mut codec = FrameCodec::new();
    let frame = sample_frame(1);

    let mut buffer = BytesMut::new();
    codec.encode(frame.clone(), &mut buffer).expect("Failed to encode");
    let original_capacity = buffer.capacity();

    let decoded = codec
        .decode(&mut buffer)
        .expect("Failed to decode")
        .expect("Frame should be complete");

    assert_eq!(decoded, frame);
    assert_eq!(&decoded.payload[..], &[0, 0, 0, 0, 1]);
    assert_eq!(buffer.len(), 0);
    assert!(buffer.capacity() <= original_capacity);
}

#[test]
fn test_codec_partial_decode_preserves_buffer() {
    let mut codec = FrameCodec::new();
    let encoded = sample_frame(2).to_bytes().unwrap();

    for cut in 0..encoded.len() {
        let mut buffer = BytesMut::from(&encoded[..cut]);
        let result = codec.decode(&mut buffer).expect("Decode should not error");
        assert!(result.is_none(), "cut at {cut} decoded early");
        assert_eq!(buffer.len(), cut);
    }
}

#[test]
fn test_codec_encode_exact_size() {
    let mut codec = FrameCodec::new();
    let frame = Frame::new(ClusterOp::AddTransactionRequest, 9, Bytes::from(vec![0u8; 100]));

    let mut buffer = BytesMut::new();
    codec.encode(frame.clone(), &mut buffer).expect("Failed to encode");

    assert_eq!(buffer.len(), FRAME_HEADER_SIZE + 100);
    assert_eq!(&buffer[..4], &109u32.to_be_bytes());
    assert_eq!(Frame::from_bytes(&buffer).unwrap(), frame);
}

#[test]
fn test_codec_back_to_back_frames() {
    let mut codec = FrameCodec::new();
    let mut buffer = BytesMut::new();
    for rpc_id in 0..3 {
        codec.encode(sample_frame(rpc_id), &mut buffer).unwrap();
    }

    for rpc_id in 0..3 {
        let frame = codec.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(frame.rpc_id, rpc_id);
    }
    assert!(codec.decode(&mut buffer).unwrap().is_none());
}

#[test]
fn test_codec_rejects_oversized_frame_before_buffering() {
    let mut codec = FrameCodec::with_max_frame_size(1024);
    let mut buffer = BytesMut::new();
    buffer.put_u32(4096);
    buffer.put_u8(ClusterOp::AddMinorBlockRequest.code());

    assert!(matches!(
        codec.decode(&mut buffer),
        Err(ProtocolError::OversizedFrame(4100))
    ));
}

#[test]
fn test_codec_rejects_short_length_field() {
    let mut codec = FrameCodec::new();
    let mut buffer = BytesMut::new();
    buffer.put_u32(3);
    buffer.put_slice(&[129, 0, 0]);

    assert!(matches!(
        codec.decode(&mut buffer),
        Err(ProtocolError::TruncatedInput { .. })
    ));
}

#[test]
fn test_codec_encode_over_limit() {
    let mut codec = FrameCodec::with_max_frame_size(1024);
    let frame = Frame::new(ClusterOp::AddTransactionRequest, 0, Bytes::from(vec![0u8; 2048]));
    let mut buffer = BytesMut::new();

    assert!(matches!(
        codec.encode(frame, &mut buffer),
        Err(ProtocolError::OversizedFrame(_))
    ));
    assert!(buffer.is_empty());
}

#[test]
fn test_payload_shares_read_buffer() {
    let mut codec = FrameCodec::new();
    let mut buffer = BytesMut::new();
    codec
        .encode(Frame::new(ClusterOp::Ping, 1, Bytes::from_static(b"0000\0\0\0\0")), &mut buffer)
        .unwrap();

    let start = buffer.as_ptr() as usize;
    let frame = codec.decode(&mut buffer).unwrap().unwrap();
    assert_eq!(frame.payload.as_ptr() as usize, start + FRAME_HEADER_SIZE);
}
