#![no_main]

use bytes::BytesMut;
use cluster_protocol::{Frame, FrameCodec};
use libfuzzer_sys::fuzz_target;
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    // Whole-buffer parse and streaming decode must agree and never panic
    let parsed = Frame::from_bytes(data);

    let mut codec = FrameCodec::new();
    let mut buffer = BytesMut::from(data);
    if let Ok(Some(frame)) = codec.decode(&mut buffer) {
        if buffer.is_empty() {
            assert_eq!(parsed.ok(), Some(frame));
        }
    }
});
