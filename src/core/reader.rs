//! Sequential read cursor over an immutable input buffer.
//!
//! Every decoder in the crate pulls bytes through a [`WireReader`], which
//! tracks the read offset and carries the [`DecodeLimits`] that length
//! prefixes are checked against. A failed read never advances the cursor.

use crate::config::{MAX_BLOB_LEN, MAX_LIST_LEN};
use crate::error::{ProtocolError, Result};

/// Sanity bounds for length and count prefixes read from untrusted input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum number of elements in one sequence
    pub max_list_len: usize,
    /// Maximum number of bytes in one blob
    pub max_blob_len: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_list_len: MAX_LIST_LEN,
            max_blob_len: MAX_BLOB_LEN,
        }
    }
}

/// Read cursor with offset tracking
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
    limits: DecodeLimits,
}

impl<'a> WireReader<'a> {
    /// Reader with default limits
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_limits(data, DecodeLimits::default())
    }

    pub fn with_limits(data: &'a [u8], limits: DecodeLimits) -> Self {
        Self {
            data,
            pos: 0,
            limits,
        }
    }

    /// Current read offset from the start of the buffer
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    #[inline]
    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    /// Borrow the next `len` bytes and advance past them
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(ProtocolError::TruncatedInput {
                needed: len,
                remaining,
            });
        }

        let data: &'a [u8] = self.data;
        let slice = &data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Copy the next `N` bytes into a fixed-size array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Fail unless the whole buffer has been consumed
    pub fn finish(&self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(ProtocolError::TrailingBytes(n)),
        }
    }
}
