// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Variable-width histogram bin packing.
//!
//! Used when a histogram header declares `bytes_per_bin == 0`. Each bin
//! value is stored as a one-byte width tag followed by the value in the
//! smallest of 1, 2 or 4 little-endian bytes:
//!
//! ```text
//! 0x00 v            value <= 0xFF
//! 0x01 v v          value <= 0xFFFF
//! 0x02 v v v v      otherwise
//! ```
//!
//! The scheme is self-delimiting, so a stream decodes without knowing the
//! bin count in advance; callers that do know it use [`unpack_n`] to demand
//! an exact element count.

use crate::core::{DataBuf, MudError, Result};

const TAG_1BYTE: u8 = 0x00;
const TAG_2BYTE: u8 = 0x01;
const TAG_4BYTE: u8 = 0x02;

/// Pack bin values into a variable-width byte stream.
pub fn pack(values: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 2);
    for &v in values {
        if v <= u8::MAX as u32 {
            out.push(TAG_1BYTE);
            out.push(v as u8);
        } else if v <= u16::MAX as u32 {
            out.push(TAG_2BYTE);
            out.extend_from_slice(&(v as u16).to_le_bytes());
        } else {
            out.push(TAG_4BYTE);
            out.extend_from_slice(&v.to_le_bytes());
        }
    }
    out
}

/// Unpack a complete packed stream.
pub fn unpack(stream: &[u8]) -> Result<Vec<u32>> {
    let mut buf = DataBuf::from_vec(stream.to_vec());
    let mut values = Vec::new();
    while buf.remaining() > 0 {
        values.push(unpack_one(&mut buf)?);
    }
    Ok(values)
}

/// Unpack exactly `n` values, rejecting trailing bytes.
pub fn unpack_n(stream: &[u8], n: usize) -> Result<Vec<u32>> {
    let mut buf = DataBuf::from_vec(stream.to_vec());
    let mut values = Vec::with_capacity(n);
    for _ in 0..n {
        values.push(unpack_one(&mut buf)?);
    }
    if buf.remaining() != 0 {
        return Err(MudError::invalid_input(
            "packed histogram",
            format!("{} trailing bytes after {} bins", buf.remaining(), n),
        ));
    }
    Ok(values)
}

fn unpack_one(buf: &mut DataBuf) -> Result<u32> {
    let tag = buf.read_raw(1)?[0];
    match tag {
        TAG_1BYTE => Ok(buf.read_raw(1)?[0] as u32),
        TAG_2BYTE => Ok(buf.read_u16()? as u32),
        TAG_4BYTE => buf.read_u32(),
        other => Err(MudError::invalid_input(
            "packed histogram",
            format!("unknown width tag {other:#04x}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_boundary_values() {
        let xs = [0, 1, 255, 256, 65535, 65536, 0xFFFF_FFFF];
        assert_eq!(unpack(&pack(&xs)).unwrap(), xs);
    }

    #[test]
    fn test_minimal_widths() {
        assert_eq!(pack(&[7]), vec![0x00, 7]);
        assert_eq!(pack(&[0x1234]), vec![0x01, 0x34, 0x12]);
        assert_eq!(pack(&[0x0001_0000]), vec![0x02, 0x00, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn test_unpack_n_exact() {
        let stream = pack(&[10, 20, 30]);
        assert_eq!(unpack_n(&stream, 3).unwrap(), vec![10, 20, 30]);
        assert!(unpack_n(&stream, 2).is_err());
        assert!(unpack_n(&stream, 4).is_err());
    }

    #[test]
    fn test_bad_tag_rejected() {
        assert!(unpack(&[0x03, 0x00]).is_err());
    }

    #[test]
    fn test_truncated_value_rejected() {
        assert!(unpack(&[0x02, 0x01, 0x02]).is_err());
    }

    #[test]
    fn test_empty_stream() {
        assert_eq!(unpack(&[]).unwrap(), Vec::<u32>::new());
        assert_eq!(pack(&[]), Vec::<u8>::new());
    }
}
