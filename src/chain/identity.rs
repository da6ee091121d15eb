use crate::core::reader::WireReader;
use crate::core::wire::Wire;
use crate::error::{constants, ProtocolError, Result};
use bytes::BytesMut;
use std::fmt;
use std::str::FromStr;

/// Fixed 4-byte identity naming a cluster participant.
///
/// Encoded as exactly 4 raw bytes. Built either from raw bytes or from
/// 4 ASCII characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PeerId([u8; 4]);

impl PeerId {
    pub const LEN: usize = 4;

    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Identity from text such as `"S001"`
    pub fn from_ascii(text: &str) -> Result<Self> {
        if !text.is_ascii() {
            return Err(ProtocolError::InvalidPeerId(
                constants::ERR_PEER_ID_ASCII.to_string(),
            ));
        }
        Self::try_from(text.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<[u8; 4]> for PeerId {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for PeerId {
    type Error = ProtocolError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let array: [u8; 4] = bytes.try_into().map_err(|_| {
            ProtocolError::InvalidPeerId(format!(
                "{} (got {})",
                constants::ERR_PEER_ID_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }
}

impl FromStr for PeerId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_ascii(s)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(|b| b.is_ascii_graphic()) {
            for byte in self.0 {
                write!(f, "{}", byte as char)?;
            }
            Ok(())
        } else {
            write!(f, "0x{:08x}", u32::from_be_bytes(self.0))
        }
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({self})")
    }
}

impl Wire for PeerId {
    #[inline]
    fn encode_to(&self, buf: &mut BytesMut) -> Result<()> {
        self.0.encode_to(buf)
    }

    #[inline]
    fn decode_from(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self(reader.read_array()?))
    }
}
