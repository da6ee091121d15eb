//! # Primitive Codec
//!
//! The [`Wire`] trait and its implementations for fixed-width values.
//!
//! ## Wire Format
//! ```text
//! u16 / u32 / u64 / u128   2 / 4 / 8 / 16 bytes, big-endian
//! U256                     32 bytes, big-endian
//! bool                     1 byte, 0x00 or 0x01
//! H256                     32 raw bytes, no prefix
//! [u8; N]                  N raw bytes, no prefix
//! ```
//!
//! Big-endian is the single canonical byte order of the protocol; there is
//! no per-field negotiation.

use crate::core::reader::{DecodeLimits, WireReader};
use crate::error::{ProtocolError, Result};
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

/// A value with a canonical binary encoding.
///
/// Implementations append to a `BytesMut` and pull from a [`WireReader`].
/// Decoding is all-or-nothing: a value is only returned once every byte it
/// needs has been read and validated.
pub trait Wire: Sized {
    /// Append the encoding of `self` to `buf`
    fn encode_to(&self, buf: &mut BytesMut) -> Result<()>;

    /// Decode one value starting at the reader's current position
    fn decode_from(reader: &mut WireReader<'_>) -> Result<Self>;

    /// Encode into a fresh buffer
    fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        self.encode_to(&mut buf)?;
        Ok(buf.freeze())
    }

    /// Decode a value from the front of `data`, returning it with the number
    /// of bytes consumed. Bytes after the value are left alone.
    fn decode_prefix(data: &[u8]) -> Result<(Self, usize)> {
        let mut reader = WireReader::new(data);
        let value = Self::decode_from(&mut reader)?;
        Ok((value, reader.position()))
    }

    /// Decode a value that must span the whole of `data`
    fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_limits(data, DecodeLimits::default())
    }

    fn from_bytes_with_limits(data: &[u8], limits: DecodeLimits) -> Result<Self> {
        let mut reader = WireReader::with_limits(data, limits);
        let value = Self::decode_from(&mut reader)?;
        reader.finish()?;
        Ok(value)
    }
}

macro_rules! impl_wire_uint {
    ($($ty:ty => $put:ident),* $(,)?) => {
        $(
            impl Wire for $ty {
                #[inline]
                fn encode_to(&self, buf: &mut BytesMut) -> Result<()> {
                    buf.$put(*self);
                    Ok(())
                }

                #[inline]
                fn decode_from(reader: &mut WireReader<'_>) -> Result<Self> {
                    Ok(<$ty>::from_be_bytes(reader.read_array()?))
                }
            }
        )*
    };
}

impl_wire_uint!(u16 => put_u16, u32 => put_u32, u64 => put_u64, u128 => put_u128);

impl Wire for bool {
    #[inline]
    fn encode_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(u8::from(*self));
        Ok(())
    }

    fn decode_from(reader: &mut WireReader<'_>) -> Result<Self> {
        let [byte] = reader.read_array::<1>()?;
        match byte {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ProtocolError::InvalidBoolean(other)),
        }
    }
}

impl<const N: usize> Wire for [u8; N] {
    #[inline]
    fn encode_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_slice(self);
        Ok(())
    }

    #[inline]
    fn decode_from(reader: &mut WireReader<'_>) -> Result<Self> {
        reader.read_array()
    }
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for byte in bytes {
        write!(f, "{byte:02x}")?;
    }
    Ok(())
}

/// 32-byte hash digest, encoded verbatim
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct H256([u8; 32]);

impl H256 {
    pub const ZERO: H256 = H256([0u8; 32]);

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for H256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        write_hex(f, &self.0)
    }
}

impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H256({self})")
    }
}

impl Wire for H256 {
    #[inline]
    fn encode_to(&self, buf: &mut BytesMut) -> Result<()> {
        self.0.encode_to(buf)
    }

    #[inline]
    fn decode_from(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self(reader.read_array()?))
    }
}

/// 256-bit unsigned integer held as 32 big-endian bytes.
///
/// Amounts and counters on the wire use this width. Byte-wise ordering of
/// big-endian data is numeric ordering, so the derived `Ord` compares values.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct U256([u8; 32]);

impl U256 {
    pub const ZERO: U256 = U256([0u8; 32]);

    pub const fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn to_be_bytes(self) -> [u8; 32] {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// The value as a `u128`, or `None` if it does not fit
    pub fn to_u128(&self) -> Option<u128> {
        let (high, low) = self.0.split_at(16);
        if high.iter().any(|b| *b != 0) {
            return None;
        }
        let mut out = [0u8; 16];
        out.copy_from_slice(low);
        Some(u128::from_be_bytes(out))
    }

    pub fn checked_add(self, other: U256) -> Option<U256> {
        let mut out = [0u8; 32];
        let mut carry = 0u16;
        for i in (0..32).rev() {
            let sum = u16::from(self.0[i]) + u16::from(other.0[i]) + carry;
            out[i] = (sum & 0xFF) as u8;
            carry = sum >> 8;
        }
        (carry == 0).then_some(U256(out))
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        U256::from(u128::from(value))
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        let mut out = [0u8; 32];
        out[16..].copy_from_slice(&value.to_be_bytes());
        Self(out)
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_u128() {
            Some(small) => write!(f, "{small}"),
            None => {
                f.write_str("0x")?;
                write_hex(f, &self.0)
            }
        }
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256({self})")
    }
}

impl Wire for U256 {
    #[inline]
    fn encode_to(&self, buf: &mut BytesMut) -> Result<()> {
        self.0.encode_to(buf)
    }

    #[inline]
    fn decode_from(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self(reader.read_array()?))
    }
}
