//! SSH wire encoding primitives
//!
//! Everything in the OpenSSH key formats is built from three pieces:
//! - `uint32`: 4 bytes, big-endian
//! - `string`: a `uint32` length followed by that many bytes
//! - `mpint`: a `string` holding a big-endian two's complement integer
//!
//! [`WireReader`] never indexes past the end of its input: every read
//! checks the remaining length first and reports a [`WireError`].

use thiserror::Error;

/// Failure while reading wire-encoded data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("string is not valid UTF-8")]
    InvalidUtf8,
}

/// Cursor over a borrowed byte slice
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not consumed yet
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Take exactly `len` bytes
    pub fn read_raw(&mut self, len: usize) -> Result<&'a [u8], WireError> {
        let remaining = self.data.len() - self.pos;
        if len > remaining {
            return Err(WireError::Truncated {
                needed: len,
                remaining,
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32, WireError> {
        let bytes = self.read_raw(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a length-prefixed buffer without copying it
    pub fn read_length_prefixed(&mut self) -> Result<&'a [u8], WireError> {
        let len = self.read_u32()? as usize;
        self.read_raw(len)
    }

    /// Read a length-prefixed UTF-8 string
    pub fn read_string(&mut self) -> Result<&'a str, WireError> {
        let bytes = self.read_length_prefixed()?;
        std::str::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8)
    }

    /// Read an `mpint` and return its magnitude with leading zeros stripped
    ///
    /// Private scalars are never negative, so the sign byte OpenSSH adds
    /// when the high bit is set is simply dropped.
    pub fn read_mpint(&mut self) -> Result<&'a [u8], WireError> {
        let bytes = self.read_length_prefixed()?;
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        Ok(&bytes[start..])
    }
}

/// Growable output buffer
#[derive(Debug, Default, Clone)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Append bytes without a length prefix
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_length_prefixed(&mut self, bytes: &[u8]) {
        self.write_u32(bytes.len() as u32);
        self.write_raw(bytes);
    }

    pub fn write_string(&mut self, s: &str) {
        self.write_length_prefixed(s.as_bytes());
    }

    /// Write a non-negative big-endian integer as an `mpint`
    pub fn write_mpint(&mut self, magnitude: &[u8]) {
        let start = magnitude
            .iter()
            .position(|&b| b != 0)
            .unwrap_or(magnitude.len());
        let trimmed = &magnitude[start..];

        if trimmed.first().is_some_and(|&b| b & 0x80 != 0) {
            self.write_u32(trimmed.len() as u32 + 1);
            self.buf.push(0);
            self.write_raw(trimmed);
        } else {
            self.write_length_prefixed(trimmed);
        }
    }

    /// Write a nested length-prefixed section
    ///
    /// The closure fills a scratch writer; its byte count becomes the
    /// length prefix.
    pub fn write_composite<F>(&mut self, build: F)
    where
        F: FnOnce(&mut WireWriter),
    {
        let mut inner = WireWriter::new();
        build(&mut inner);
        self.write_length_prefixed(&inner.buf);
        inner.wipe();
    }

    /// Zero the buffer contents in place
    pub fn wipe(&mut self) {
        use zeroize::Zeroize;
        self.buf.zeroize();
    }
}
