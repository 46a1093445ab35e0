//! # Binary Buffers
//!
//! Read cursor and growable write buffer used by every routable factory.
//!
//! ## Encoding Conventions
//! - Integers are fixed-width, signed, big-endian (network byte order)
//! - Booleans are a single byte, `0` or `1`; any other byte is rejected
//! - Strings are an `i32` byte length followed by UTF-8 bytes
//! - Raw byte fields are an `i32` length followed by the bytes
//!
//! A [`ByteBuffer`] never panics on short input: every read checks the
//! remaining length first and fails with `BufferUnderrun` without advancing.
//! A [`GrowableByteBuffer`] never fails on capacity; it grows on demand.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{ProtocolError, Result};

/// Width of an encoded `i32` length prefix
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Read cursor over an immutable byte range.
#[derive(Debug, Clone)]
pub struct ByteBuffer<'a> {
    data: &'a [u8],
    total: usize,
}

impl<'a> ByteBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            total: data.len(),
        }
    }

    /// Number of bytes consumed so far
    pub fn position(&self) -> usize {
        self.total - self.data.len()
    }

    /// Number of bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn ensure(&self, needed: usize) -> Result<()> {
        if self.data.len() < needed {
            return Err(ProtocolError::BufferUnderrun {
                needed,
                remaining: self.data.len(),
            });
        }
        Ok(())
    }

    /// Consume exactly `width` bytes.
    pub fn read_fixed(&mut self, width: usize) -> Result<&'a [u8]> {
        self.ensure(width)?;
        let (head, tail) = self.data.split_at(width);
        self.data = tail;
        Ok(head)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.data.get_u8())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.data.get_i32())
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.ensure(8)?;
        Ok(self.data.get_i64())
    }

    /// Read a canonical boolean byte.
    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ProtocolError::MalformedValue(format!(
                "boolean byte must be 0 or 1, got 0x{other:02x}"
            ))),
        }
    }

    /// Read an `i32` length that must not be negative.
    pub fn read_length(&mut self) -> Result<usize> {
        let len = self.read_i32()?;
        usize::try_from(len)
            .map_err(|_| ProtocolError::MalformedValue(format!("negative length prefix {len}")))
    }

    /// Read an `i32` length followed by that many raw bytes.
    pub fn read_length_prefixed_bytes(&mut self) -> Result<&'a [u8]> {
        let start = self.clone();
        let len = self.read_length()?;
        match self.read_fixed(len) {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                // leave the cursor where the field started
                *self = start;
                Err(e)
            }
        }
    }

    /// Read an `i32` length followed by that many UTF-8 bytes.
    pub fn read_length_prefixed_string(&mut self) -> Result<String> {
        let start = self.clone();
        let bytes = self.read_length_prefixed_bytes()?;
        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_owned()),
            Err(e) => {
                *self = start;
                Err(ProtocolError::MalformedValue(format!(
                    "string is not valid UTF-8: {e}"
                )))
            }
        }
    }
}

/// Append-only byte buffer that grows on demand.
#[derive(Debug, Default, Clone)]
pub struct GrowableByteBuffer {
    inner: BytesMut,
}

impl GrowableByteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: BytesMut::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.inner
    }

    /// Drop everything written after `len`. Used to discard the tail of a
    /// failed encode.
    pub fn truncate(&mut self, len: usize) {
        self.inner.truncate(len);
    }

    pub fn write_fixed(&mut self, bytes: &[u8]) {
        self.inner.put_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.inner.put_u8(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.inner.put_i32(value);
    }

    pub fn write_i64(&mut self, value: i64) {
        self.inner.put_i64(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.inner.put_u8(u8::from(value));
    }

    /// Write an `i32` length prefix. Fails for lengths that do not fit.
    pub fn write_length(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len).map_err(|_| {
            ProtocolError::EncodeFailed(format!("length {len} does not fit in a 32-bit prefix"))
        })?;
        self.inner.put_i32(len);
        Ok(())
    }

    pub fn write_length_prefixed_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_length(bytes.len())?;
        self.inner.put_slice(bytes);
        Ok(())
    }

    pub fn write_length_prefixed_string(&mut self, value: &str) -> Result<()> {
        self.write_length_prefixed_bytes(value.as_bytes())
    }

    /// Freeze the written bytes into an immutable, cheaply clonable buffer.
    pub fn freeze(self) -> Bytes {
        self.inner.freeze()
    }
}
