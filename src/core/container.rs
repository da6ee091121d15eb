//! # Length-Prefixed Container Codec
//!
//! Variable-length blobs and record sequences, each preceded by an explicit
//! size field of configurable width.
//!
//! ## Wire Format
//! ```text
//! blob:      [len: W bytes, BE] [raw bytes]
//! sequence:  [count: W bytes, BE] [element 1] [element 2] ...
//! ```
//!
//! `W` is 4 unless a field says otherwise. Prefixes read from the wire are
//! checked against the reader's [`DecodeLimits`](crate::core::reader::DecodeLimits)
//! before anything is allocated, and pre-allocation never reserves more
//! memory than the bytes actually remaining in the input.
//!
//! ## Field codecs
//! Record fields name their codec as a type:
//! - [`Native`]: the field type's own [`Wire`] encoding
//! - [`PrefixedBytes<W>`]: a `Vec<u8>` blob with a `W`-byte length prefix
//! - [`PrefixedList<C, W>`]: a `Vec<T>` with a `W`-byte count prefix, each
//!   element encoded by codec `C`
//!
//! Codecs nest, so a list of 4-byte-prefixed blobs is
//! `PrefixedList<PrefixedBytes<4>, 4>`.

use crate::config::DEFAULT_PREFIX_WIDTH;
use crate::core::reader::WireReader;
use crate::core::wire::Wire;
use crate::error::{ProtocolError, Result};
use bytes::{BufMut, BytesMut};
use std::marker::PhantomData;
use std::mem::size_of;

/// Width of a length or count prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixWidth {
    U8,
    U16,
    U32,
    U64,
}

impl PrefixWidth {
    /// Width for a byte count. Evaluated at compile time for codec type
    /// parameters, so an unsupported width fails the build.
    pub const fn from_len(len: usize) -> Self {
        match len {
            1 => PrefixWidth::U8,
            2 => PrefixWidth::U16,
            4 => PrefixWidth::U32,
            8 => PrefixWidth::U64,
            _ => panic!("prefix width must be 1, 2, 4 or 8 bytes"),
        }
    }

    #[allow(clippy::len_without_is_empty)]
    pub const fn len(self) -> usize {
        match self {
            PrefixWidth::U8 => 1,
            PrefixWidth::U16 => 2,
            PrefixWidth::U32 => 4,
            PrefixWidth::U64 => 8,
        }
    }

    /// Largest length this prefix can express
    pub const fn max_value(self) -> u64 {
        match self {
            PrefixWidth::U8 => u8::MAX as u64,
            PrefixWidth::U16 => u16::MAX as u64,
            PrefixWidth::U32 => u32::MAX as u64,
            PrefixWidth::U64 => u64::MAX,
        }
    }

    /// Append `len` as a prefix of this width
    pub fn write(self, buf: &mut BytesMut, len: usize) -> Result<()> {
        let value = len as u64;
        if value > self.max_value() {
            return Err(ProtocolError::PrefixOverflow {
                len,
                width: self.len(),
            });
        }

        match self {
            PrefixWidth::U8 => buf.put_u8(value as u8),
            PrefixWidth::U16 => buf.put_u16(value as u16),
            PrefixWidth::U32 => buf.put_u32(value as u32),
            PrefixWidth::U64 => buf.put_u64(value),
        }
        Ok(())
    }

    /// Read a raw prefix of this width
    pub fn read(self, reader: &mut WireReader<'_>) -> Result<u64> {
        Ok(match self {
            PrefixWidth::U8 => u64::from(reader.read_array::<1>()?[0]),
            PrefixWidth::U16 => u64::from(u16::from_be_bytes(reader.read_array()?)),
            PrefixWidth::U32 => u64::from(u32::from_be_bytes(reader.read_array()?)),
            PrefixWidth::U64 => u64::from_be_bytes(reader.read_array()?),
        })
    }

    /// Read a prefix and reject it if it exceeds `max`
    pub fn read_bounded(self, reader: &mut WireReader<'_>, max: usize) -> Result<usize> {
        let count = self.read(reader)?;
        if count > max as u64 {
            return Err(ProtocolError::CountOverflow { count, max });
        }
        Ok(count as usize)
    }
}

/// Encoding strategy for one record field of type `T`
pub trait FieldCodec<T> {
    fn encode_field(value: &T, buf: &mut BytesMut) -> Result<()>;
    fn decode_field(reader: &mut WireReader<'_>) -> Result<T>;
}

/// Use the field type's own [`Wire`] encoding
#[derive(Debug, Clone, Copy, Default)]
pub struct Native;

impl<T: Wire> FieldCodec<T> for Native {
    #[inline]
    fn encode_field(value: &T, buf: &mut BytesMut) -> Result<()> {
        value.encode_to(buf)
    }

    #[inline]
    fn decode_field(reader: &mut WireReader<'_>) -> Result<T> {
        T::decode_from(reader)
    }
}

/// Byte blob with a `W`-byte length prefix
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixedBytes<const W: usize = { DEFAULT_PREFIX_WIDTH }>;

impl<const W: usize> PrefixedBytes<W> {
    const WIDTH: PrefixWidth = PrefixWidth::from_len(W);
}

impl<const W: usize> FieldCodec<Vec<u8>> for PrefixedBytes<W> {
    fn encode_field(value: &Vec<u8>, buf: &mut BytesMut) -> Result<()> {
        Self::WIDTH.write(buf, value.len())?;
        buf.put_slice(value);
        Ok(())
    }

    fn decode_field(reader: &mut WireReader<'_>) -> Result<Vec<u8>> {
        let max = reader.limits().max_blob_len;
        let len = Self::WIDTH.read_bounded(reader, max)?;
        Ok(reader.read_bytes(len)?.to_vec())
    }
}

/// Ordered sequence with a `W`-byte count prefix, elements encoded by `C`
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixedList<C = Native, const W: usize = { DEFAULT_PREFIX_WIDTH }>(PhantomData<C>);

impl<C, const W: usize> PrefixedList<C, W> {
    const WIDTH: PrefixWidth = PrefixWidth::from_len(W);
}

impl<T, C, const W: usize> FieldCodec<Vec<T>> for PrefixedList<C, W>
where
    C: FieldCodec<T>,
{
    fn encode_field(value: &Vec<T>, buf: &mut BytesMut) -> Result<()> {
        Self::WIDTH.write(buf, value.len())?;
        for item in value {
            C::encode_field(item, buf)?;
        }
        Ok(())
    }

    fn decode_field(reader: &mut WireReader<'_>) -> Result<Vec<T>> {
        let max = reader.limits().max_list_len;
        let count = Self::WIDTH.read_bounded(reader, max)?;

        let mut items = Vec::with_capacity(initial_capacity::<T>(count, reader.remaining()));
        for _ in 0..count {
            items.push(C::decode_field(reader)?);
        }
        Ok(items)
    }
}

/// Elements to reserve for a list claiming `count` entries. The reservation
/// is bounded in bytes by `remaining`; the vector grows past it only as
/// elements actually decode.
fn initial_capacity<T>(count: usize, remaining: usize) -> usize {
    count.min(remaining / size_of::<T>().max(1))
}

/// Sequences of wire values default to a 4-byte count prefix
impl<T: Wire> Wire for Vec<T> {
    fn encode_to(&self, buf: &mut BytesMut) -> Result<()> {
        <PrefixedList as FieldCodec<Vec<T>>>::encode_field(self, buf)
    }

    fn decode_from(reader: &mut WireReader<'_>) -> Result<Self> {
        <PrefixedList as FieldCodec<Vec<T>>>::decode_field(reader)
    }
}
