// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Histogram header and data payloads.
//!
//! A histogram occupies two sections inside its group: a header
//! (`SEC_GEN_HIST_HDR_ID` or a TRIUMF alias) and a data section
//! (`SEC_GEN_HIST_DAT_ID`) holding `n_bytes` of bin storage.
//!
//! # Bin interval
//!
//! `fs_per_bin` carries the bin interval in integer femtoseconds. When the
//! interval is not representable that way, the header grows a trailing
//! IEEE-754 `seconds_per_bin` — detected on decode by exactly eight bytes of
//! payload remaining after the title string.
//!
//! # Bin storage
//!
//! `bytes_per_bin` of 1, 2 or 4 means fixed-width little-endian bins;
//! 0 means the variable-width packed stream of [`super::packing`].

use crate::core::{str_wire_len, DataBuf, Result};

/// Histogram header fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistHdr {
    pub hist_type: u32,
    /// Byte length of the paired data section's bin storage.
    pub n_bytes: u32,
    pub n_bins: u32,
    /// Element width in bytes: 1, 2 or 4, or 0 for the packed stream.
    pub bytes_per_bin: u32,
    /// Bin interval in femtoseconds; superseded by `seconds_per_bin` when set.
    pub fs_per_bin: u32,
    pub t0_ps: u32,
    pub t0_bin: u32,
    pub good_bin1: u32,
    pub good_bin2: u32,
    pub bkgd1: u32,
    pub bkgd2: u32,
    pub n_events: u32,
    pub title: String,
    /// Exact bin interval when `fs_per_bin` cannot represent it.
    pub seconds_per_bin: Option<f64>,
}

/// Fixed part of the header payload: twelve `u32` fields.
const HIST_HDR_FIXED_LEN: u32 = 12 * 4;

impl HistHdr {
    /// Decode a header from a payload of `payload_len` bytes.
    ///
    /// The payload length disambiguates the optional trailing interval.
    pub fn decode(buf: &mut DataBuf, payload_len: u32) -> Result<Self> {
        let start = buf.position();
        let mut hdr = Self {
            hist_type: buf.read_u32()?,
            n_bytes: buf.read_u32()?,
            n_bins: buf.read_u32()?,
            bytes_per_bin: buf.read_u32()?,
            fs_per_bin: buf.read_u32()?,
            t0_ps: buf.read_u32()?,
            t0_bin: buf.read_u32()?,
            good_bin1: buf.read_u32()?,
            good_bin2: buf.read_u32()?,
            bkgd1: buf.read_u32()?,
            bkgd2: buf.read_u32()?,
            n_events: buf.read_u32()?,
            title: buf.read_str()?,
            seconds_per_bin: None,
        };
        let consumed = (buf.position() - start) as u32;
        if payload_len.saturating_sub(consumed) == 8 {
            hdr.seconds_per_bin = Some(buf.read_f64()?);
        }
        Ok(hdr)
    }

    pub fn encode(&self, buf: &mut DataBuf) -> Result<()> {
        buf.write_u32(self.hist_type);
        buf.write_u32(self.n_bytes);
        buf.write_u32(self.n_bins);
        buf.write_u32(self.bytes_per_bin);
        buf.write_u32(self.fs_per_bin);
        buf.write_u32(self.t0_ps);
        buf.write_u32(self.t0_bin);
        buf.write_u32(self.good_bin1);
        buf.write_u32(self.good_bin2);
        buf.write_u32(self.bkgd1);
        buf.write_u32(self.bkgd2);
        buf.write_u32(self.n_events);
        buf.write_str(&self.title)?;
        if let Some(spb) = self.seconds_per_bin {
            buf.write_f64(spb);
        }
        Ok(())
    }

    pub fn wire_size(&self) -> u32 {
        HIST_HDR_FIXED_LEN
            + str_wire_len(&self.title)
            + if self.seconds_per_bin.is_some() { 8 } else { 0 }
    }

    /// Bin interval in seconds, preferring the exact trailing value.
    pub fn seconds_per_bin(&self) -> f64 {
        self.seconds_per_bin
            .unwrap_or(self.fs_per_bin as f64 * 1e-15)
    }
}

/// Histogram bin storage (`SEC_GEN_HIST_DAT_ID`).
///
/// The bytes are opaque at this layer; the paired header's `bytes_per_bin`
/// selects fixed-width or packed interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistData {
    pub data: Vec<u8>,
}

impl HistData {
    pub fn decode(buf: &mut DataBuf, payload_len: u32) -> Result<Self> {
        Ok(Self {
            data: buf.read_raw(payload_len as usize)?,
        })
    }

    pub fn encode(&self, buf: &mut DataBuf) {
        buf.write_raw(&self.data);
    }

    pub fn wire_size(&self) -> u32 {
        self.data.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hdr() -> HistHdr {
        HistHdr {
            hist_type: 0x1200_0002,
            n_bytes: 8,
            n_bins: 4,
            bytes_per_bin: 2,
            fs_per_bin: 48_828_125,
            t0_ps: 1200,
            t0_bin: 3,
            good_bin1: 5,
            good_bin2: 32760,
            bkgd1: 1,
            bkgd2: 2,
            n_events: 1_000_000,
            title: "Backward".to_string(),
            seconds_per_bin: None,
        }
    }

    #[test]
    fn test_hdr_round_trip_without_interval() {
        let hdr = sample_hdr();
        let mut buf = DataBuf::new();
        hdr.encode(&mut buf).unwrap();
        assert_eq!(buf.len() as u32, hdr.wire_size());

        let decoded = HistHdr::decode(&mut buf, hdr.wire_size()).unwrap();
        assert_eq!(decoded, hdr);
        assert_eq!(decoded.seconds_per_bin, None);
    }

    #[test]
    fn test_hdr_round_trip_with_interval() {
        let mut hdr = sample_hdr();
        hdr.seconds_per_bin = Some(4.8828125e-8 / 3.0);

        let mut buf = DataBuf::new();
        hdr.encode(&mut buf).unwrap();
        let decoded = HistHdr::decode(&mut buf, hdr.wire_size()).unwrap();
        assert_eq!(decoded.seconds_per_bin, hdr.seconds_per_bin);
    }

    #[test]
    fn test_seconds_per_bin_prefers_exact_value() {
        let mut hdr = sample_hdr();
        assert_eq!(hdr.seconds_per_bin(), 48_828_125f64 * 1e-15);
        hdr.seconds_per_bin = Some(1.0e-9);
        assert_eq!(hdr.seconds_per_bin(), 1.0e-9);
    }

    #[test]
    fn test_data_round_trip() {
        let dat = HistData {
            data: vec![1, 2, 3, 4, 5, 6, 7],
        };
        let mut buf = DataBuf::new();
        dat.encode(&mut buf);
        assert_eq!(HistData::decode(&mut buf, 7).unwrap(), dat);
    }
}
