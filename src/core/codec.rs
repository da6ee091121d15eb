//! Tokio codec for framing cluster messages over byte streams.

use crate::config::{CodecConfig, MAX_FRAME_SIZE};
use crate::core::packet::{Frame, FRAME_HEADER_SIZE, FRAME_META_SIZE, LENGTH_FIELD_SIZE};
use crate::error::ProtocolError;
use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

/// Length-delimited framing for [`Frame`]s.
///
/// Partial input yields `Ok(None)` and leaves the buffer untouched; complete
/// frames are split off the front of the buffer without copying the payload.
#[derive(Debug, Clone, Copy)]
pub struct FrameCodec {
    max_frame_size: usize,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self {
            max_frame_size: MAX_FRAME_SIZE,
        }
    }

    /// Codec with a custom frame size limit
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self { max_frame_size }
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }
}

impl From<&CodecConfig> for FrameCodec {
    fn from(config: &CodecConfig) -> Self {
        Self::with_max_frame_size(config.max_frame_size)
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < LENGTH_FIELD_SIZE {
            return Ok(None);
        }

        let length = u32::from_be_bytes([src[0], src[1], src[2], src[3]]) as usize;
        let total = LENGTH_FIELD_SIZE + length;

        if total > self.max_frame_size {
            debug!(size = total, max = self.max_frame_size, "Rejecting oversized frame");
            return Err(ProtocolError::OversizedFrame(total));
        }
        if length < FRAME_META_SIZE {
            return Err(ProtocolError::TruncatedInput {
                needed: FRAME_META_SIZE,
                remaining: length,
            });
        }

        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }

        let mut frame = src.split_to(total);
        frame.advance(LENGTH_FIELD_SIZE);
        let opcode = frame.get_u8();
        let rpc_id = frame.get_u64();
        debug_assert_eq!(frame.len(), total - FRAME_HEADER_SIZE);

        Ok(Some(Frame {
            opcode,
            rpc_id,
            payload: frame.freeze(),
        }))
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if item.encoded_len() > self.max_frame_size {
            return Err(ProtocolError::OversizedFrame(item.encoded_len()));
        }
        item.write_to(dst)
    }
}
