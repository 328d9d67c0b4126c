// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Independent-variable payloads.
//!
//! The plain section (`SEC_GEN_IND_VAR_ID`) carries summary statistics and
//! naming strings. The array section (`SEC_GEN_IND_VAR_ARR_ID`) appends a
//! sampled history: raw elements of `elem_size` bytes each, optionally
//! followed by one `u32` timestamp per sample.

use crate::core::{str_wire_len, DataBuf, MudError, Result};

/// Sampled history attached to an independent variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndVarArray {
    pub num_data: u32,
    pub elem_size: u32,
    pub data_type: u32,
    pub has_time: bool,
    /// `elem_size * num_data` raw bytes.
    pub data: Vec<u8>,
    /// One timestamp per sample when `has_time` is set.
    pub time_data: Vec<u32>,
}

/// Independent variable section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndVar {
    pub low: f64,
    pub high: f64,
    pub mean: f64,
    pub stddev: f64,
    pub skewness: f64,
    pub name: String,
    pub description: String,
    pub units: String,
    /// Present exactly for `SEC_GEN_IND_VAR_ARR_ID` sections.
    pub array: Option<IndVarArray>,
}

impl IndVar {
    /// Decode the statistics-and-strings part shared by both variants.
    pub fn decode_plain(buf: &mut DataBuf) -> Result<Self> {
        Ok(Self {
            low: buf.read_f64()?,
            high: buf.read_f64()?,
            mean: buf.read_f64()?,
            stddev: buf.read_f64()?,
            skewness: buf.read_f64()?,
            name: buf.read_str()?,
            description: buf.read_str()?,
            units: buf.read_str()?,
            array: None,
        })
    }

    /// Decode the array variant.
    pub fn decode_with_array(buf: &mut DataBuf) -> Result<Self> {
        let mut var = Self::decode_plain(buf)?;
        let num_data = buf.read_u32()?;
        let elem_size = buf.read_u32()?;
        let data_type = buf.read_u32()?;
        let has_time = buf.read_u32()? != 0;
        let byte_len = (num_data as usize)
            .checked_mul(elem_size as usize)
            .ok_or_else(|| {
                MudError::invalid_input("ind_var array", "num_data * elem_size overflows")
            })?;
        let data = buf.read_raw(byte_len)?;
        let mut time_data = Vec::new();
        if has_time {
            time_data.reserve(num_data as usize);
            for _ in 0..num_data {
                time_data.push(buf.read_u32()?);
            }
        }
        var.array = Some(IndVarArray {
            num_data,
            elem_size,
            data_type,
            has_time,
            data,
            time_data,
        });
        Ok(var)
    }

    pub fn encode(&self, buf: &mut DataBuf) -> Result<()> {
        buf.write_f64(self.low);
        buf.write_f64(self.high);
        buf.write_f64(self.mean);
        buf.write_f64(self.stddev);
        buf.write_f64(self.skewness);
        buf.write_str(&self.name)?;
        buf.write_str(&self.description)?;
        buf.write_str(&self.units)?;
        if let Some(arr) = &self.array {
            buf.write_u32(arr.num_data);
            buf.write_u32(arr.elem_size);
            buf.write_u32(arr.data_type);
            buf.write_u32(arr.has_time as u32);
            buf.write_raw(&arr.data);
            if arr.has_time {
                for t in &arr.time_data {
                    buf.write_u32(*t);
                }
            }
        }
        Ok(())
    }

    pub fn wire_size(&self) -> u32 {
        let mut size = 5 * 8
            + str_wire_len(&self.name)
            + str_wire_len(&self.description)
            + str_wire_len(&self.units);
        if let Some(arr) = &self.array {
            size += 4 * 4 + arr.data.len() as u32;
            if arr.has_time {
                size += 4 * arr.num_data;
            }
        }
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_round_trip() {
        let var = IndVar {
            low: 2.31,
            high: 2.74,
            mean: 2.5,
            stddev: 0.08,
            skewness: -0.2,
            name: "Temperature".to_string(),
            description: "sample cell diode".to_string(),
            units: "K".to_string(),
            array: None,
        };
        let mut buf = DataBuf::new();
        var.encode(&mut buf).unwrap();
        assert_eq!(buf.len() as u32, var.wire_size());
        assert_eq!(IndVar::decode_plain(&mut buf).unwrap(), var);
    }

    #[test]
    fn test_array_round_trip_with_time() {
        let var = IndVar {
            mean: 99.5,
            name: "Field".to_string(),
            units: "G".to_string(),
            array: Some(IndVarArray {
                num_data: 3,
                elem_size: 2,
                data_type: 1,
                has_time: true,
                data: vec![0x10, 0x00, 0x20, 0x00, 0x30, 0x00],
                time_data: vec![100, 200, 300],
            }),
            ..Default::default()
        };
        let mut buf = DataBuf::new();
        var.encode(&mut buf).unwrap();
        assert_eq!(buf.len() as u32, var.wire_size());
        assert_eq!(IndVar::decode_with_array(&mut buf).unwrap(), var);
    }

    #[test]
    fn test_array_round_trip_without_time() {
        let var = IndVar {
            array: Some(IndVarArray {
                num_data: 2,
                elem_size: 4,
                data_type: 2,
                has_time: false,
                data: vec![1, 2, 3, 4, 5, 6, 7, 8],
                time_data: Vec::new(),
            }),
            ..Default::default()
        };
        let mut buf = DataBuf::new();
        var.encode(&mut buf).unwrap();
        assert_eq!(IndVar::decode_with_array(&mut buf).unwrap(), var);
    }
}
