//! Frame envelope carrying one encoded cluster message.
//!
//! ## Wire Format
//! ```text
//! [Length(4)] [Opcode(1)] [RpcId(8)] [Payload(N)]
//! ```
//! `Length` counts everything after itself (`1 + 8 + N`). All integers are
//! big-endian. The rpc id is opaque here; transports use it to pair a
//! response with its request.

use crate::config::MAX_FRAME_SIZE;
use crate::core::reader::WireReader;
use crate::error::{ProtocolError, Result};
use crate::protocol::opcode::ClusterOp;
use bytes::{BufMut, Bytes, BytesMut};

/// Size of the length field
pub const LENGTH_FIELD_SIZE: usize = 4;

/// Opcode and rpc id, the part of the header counted by the length field
pub const FRAME_META_SIZE: usize = 1 + 8;

/// Full header size
pub const FRAME_HEADER_SIZE: usize = LENGTH_FIELD_SIZE + FRAME_META_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub opcode: u8,
    pub rpc_id: u64,
    pub payload: Bytes,
}

impl Frame {
    pub fn new(op: ClusterOp, rpc_id: u64, payload: Bytes) -> Self {
        Self {
            opcode: op.code(),
            rpc_id,
            payload,
        }
    }

    /// Resolve the opcode against the cluster catalog
    pub fn op(&self) -> Result<ClusterOp> {
        ClusterOp::from_code(u32::from(self.opcode))
    }

    /// Total size on the wire, header included
    pub fn encoded_len(&self) -> usize {
        FRAME_HEADER_SIZE + self.payload.len()
    }

    /// Append the framed bytes to `dst`
    pub fn write_to(&self, dst: &mut BytesMut) -> Result<()> {
        let body_len = FRAME_META_SIZE + self.payload.len();
        let length = u32::try_from(body_len)
            .map_err(|_| ProtocolError::OversizedFrame(self.encoded_len()))?;

        dst.reserve(self.encoded_len());
        dst.put_u32(length);
        dst.put_u8(self.opcode);
        dst.put_u64(self.rpc_id);
        dst.put_slice(&self.payload);
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.write_to(&mut buf)?;
        Ok(buf.freeze())
    }

    /// Parse exactly one frame spanning the whole of `data`
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_limit(data, MAX_FRAME_SIZE)
    }

    pub fn from_bytes_with_limit(data: &[u8], max_frame_size: usize) -> Result<Self> {
        let mut reader = WireReader::new(data);
        let length = u32::from_be_bytes(reader.read_array()?) as usize;

        let total = LENGTH_FIELD_SIZE + length;
        if total > max_frame_size {
            return Err(ProtocolError::OversizedFrame(total));
        }
        if length < FRAME_META_SIZE {
            return Err(ProtocolError::TruncatedInput {
                needed: FRAME_META_SIZE,
                remaining: length,
            });
        }

        let [opcode] = reader.read_array::<1>()?;
        let rpc_id = u64::from_be_bytes(reader.read_array()?);
        let payload = reader.read_bytes(length - FRAME_META_SIZE)?;
        reader.finish()?;

        Ok(Self {
            opcode,
            rpc_id,
            payload: Bytes::copy_from_slice(payload),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn test_frame_layout() {
        let frame = Frame::new(ClusterOp::Ping, 7, Bytes::from_static(&[0xAA, 0xBB]));
        let bytes = frame.to_bytes().unwrap();

        assert_eq!(&bytes[..4], &11u32.to_be_bytes());
        assert_eq!(bytes[4], 129);
        assert_eq!(&bytes[5..13], &7u64.to_be_bytes());
        assert_eq!(&bytes[13..], &[0xAA, 0xBB]);
        assert_eq!(bytes.len(), frame.encoded_len());
    }

    #[test]
    fn test_frame_roundtrip() {
        let frame = Frame::new(ClusterOp::AddRootBlockResponse, 42, Bytes::new());
        let decoded = Frame::from_bytes(&frame.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, frame);
        assert_eq!(decoded.op().unwrap(), ClusterOp::AddRootBlockResponse);
    }

    #[test]
    fn test_frame_truncated_header() {
        assert!(matches!(
            Frame::from_bytes(&[0, 0]),
            Err(ProtocolError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_frame_length_below_header() {
        let data = [0, 0, 0, 3, 129, 0, 0];
        assert!(matches!(
            Frame::from_bytes(&data),
            Err(ProtocolError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_frame_over_limit() {
        let mut data = (2000u32).to_be_bytes().to_vec();
        data.extend_from_slice(&[0u8; 16]);
        assert!(matches!(
            Frame::from_bytes_with_limit(&data, 1024),
            Err(ProtocolError::OversizedFrame(2004))
        ));
    }

    #[test]
    fn test_frame_with_unknown_opcode_still_parses() {
        let frame = Frame {
            opcode: 3,
            rpc_id: 0,
            payload: Bytes::new(),
        };
        let decoded = Frame::from_bytes(&frame.to_bytes().unwrap()).unwrap();
        assert!(matches!(decoded.op(), Err(ProtocolError::UnknownOpcode(3))));
    }
}
