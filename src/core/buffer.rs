// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Byte buffer and primitive codec.
//!
//! A [`DataBuf`] is an expandable byte array with an independent read cursor;
//! writes append at the end. All multi-byte values are little-endian on the
//! wire. Every read is bounds-checked and reports [`MudError::BufferTooShort`]
//! instead of panicking.
//!
//! # Wire primitives
//!
//! - Integers: `u16`/`u32`/`i16`/`i32`, little-endian
//! - Floats: IEEE-754 `f64`, little-endian
//! - Times: `u32` seconds since 1970-01-01 UTC
//! - Strings: `u16` byte-length prefix, then that many bytes, no trailing NUL

use byteorder::{ByteOrder, LittleEndian};

use super::error::{MudError, Result};

/// Serialized length of a string: length prefix plus bytes.
pub fn str_wire_len(s: &str) -> u32 {
    2 + s.len() as u32
}

/// Expandable byte buffer with a read cursor.
///
/// Decoding walks the buffer with `read_*` calls; encoding appends with
/// `write_*` calls. The read cursor never moves past the end: a short read
/// leaves the cursor untouched and returns an error.
#[derive(Debug, Default, Clone)]
pub struct DataBuf {
    data: Vec<u8>,
    read_pos: usize,
}

impl DataBuf {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            read_pos: 0,
        }
    }

    /// Wrap an existing byte vector for decoding.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self { data, read_pos: 0 }
    }

    /// Total number of bytes in the buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current read position.
    pub fn position(&self) -> usize {
        self.read_pos
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.read_pos
    }

    /// Move the read cursor to an absolute position.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(MudError::buffer_too_short(
                pos,
                self.data.len(),
                self.read_pos,
            ));
        }
        self.read_pos = pos;
        Ok(())
    }

    /// Borrow the full contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, yielding the underlying bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Check that `n` bytes can be read, and return their start offset.
    fn take(&mut self, n: usize) -> Result<usize> {
        if self.remaining() < n {
            return Err(MudError::buffer_too_short(
                n,
                self.remaining(),
                self.read_pos,
            ));
        }
        let at = self.read_pos;
        self.read_pos += n;
        Ok(at)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let at = self.take(2)?;
        Ok(LittleEndian::read_u16(&self.data[at..]))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        let at = self.take(2)?;
        Ok(LittleEndian::read_i16(&self.data[at..]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let at = self.take(4)?;
        Ok(LittleEndian::read_u32(&self.data[at..]))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let at = self.take(4)?;
        Ok(LittleEndian::read_i32(&self.data[at..]))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        let at = self.take(8)?;
        Ok(LittleEndian::read_f64(&self.data[at..]))
    }

    /// Read a `u32` seconds-since-epoch timestamp.
    pub fn read_time(&mut self) -> Result<u32> {
        self.read_u32()
    }

    /// Read a length-prefixed string.
    ///
    /// A zero length yields an empty string. Non-UTF-8 bytes (legacy latin-1
    /// producers) are replaced, never propagated as an error.
    pub fn read_str(&mut self) -> Result<String> {
        let len = self.read_u16()? as usize;
        let at = self.take(len)?;
        Ok(String::from_utf8_lossy(&self.data[at..at + len]).into_owned())
    }

    /// Read `n` raw bytes.
    pub fn read_raw(&mut self, n: usize) -> Result<Vec<u8>> {
        let at = self.take(n)?;
        Ok(self.data[at..at + n].to_vec())
    }

    pub fn write_u16(&mut self, v: u16) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i16(&mut self, v: i16) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f64(&mut self, v: f64) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    /// Write a `u32` seconds-since-epoch timestamp.
    pub fn write_time(&mut self, v: u32) {
        self.write_u32(v);
    }

    /// Write a length-prefixed string.
    ///
    /// The on-disk length prefix is a `u16`; longer inputs are rejected so a
    /// file can never carry a truncated prefix.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        if s.len() > u16::MAX as usize {
            return Err(MudError::invalid_input(
                "string",
                format!("length {} exceeds the u16 wire prefix", s.len()),
            ));
        }
        self.write_u16(s.len() as u16);
        self.data.extend_from_slice(s.as_bytes());
        Ok(())
    }

    /// Write raw bytes.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_round_trip() {
        let mut buf = DataBuf::new();
        buf.write_u16(0xBEEF);
        buf.write_i16(-2);
        buf.write_u32(0xDEADBEEF);
        buf.write_i32(-123456);

        assert_eq!(buf.read_u16().unwrap(), 0xBEEF);
        assert_eq!(buf.read_i16().unwrap(), -2);
        assert_eq!(buf.read_u32().unwrap(), 0xDEADBEEF);
        assert_eq!(buf.read_i32().unwrap(), -123456);
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_little_endian_layout() {
        let mut buf = DataBuf::new();
        buf.write_u32(0x0403_0201);
        assert_eq!(buf.as_slice(), &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_f64_round_trip() {
        let mut buf = DataBuf::new();
        buf.write_f64(1.25e-9);
        assert_eq!(buf.read_f64().unwrap(), 1.25e-9);
    }

    #[test]
    fn test_str_round_trip() {
        let mut buf = DataBuf::new();
        buf.write_str("Sample calibration").unwrap();
        buf.write_str("").unwrap();
        assert_eq!(buf.read_str().unwrap(), "Sample calibration");
        assert_eq!(buf.read_str().unwrap(), "");
    }

    #[test]
    fn test_str_wire_len() {
        assert_eq!(str_wire_len(""), 2);
        assert_eq!(str_wire_len("abc"), 5);
    }

    #[test]
    fn test_over_read_reports_short_buffer() {
        let mut buf = DataBuf::from_vec(vec![1, 2]);
        let err = buf.read_u32().unwrap_err();
        assert!(matches!(err, MudError::BufferTooShort { .. }));
        // Cursor untouched after the failed read.
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.read_u16().unwrap(), 0x0201);
    }

    #[test]
    fn test_str_length_exceeding_payload() {
        let mut buf = DataBuf::new();
        buf.write_u16(10);
        buf.write_raw(b"abc");
        assert!(buf.read_str().is_err());
    }

    #[test]
    fn test_seek() {
        let mut buf = DataBuf::from_vec(vec![0, 0, 0, 7]);
        buf.seek(3).unwrap();
        assert_eq!(buf.read_raw(1).unwrap(), vec![7]);
        assert!(buf.seek(5).is_err());
    }
}
