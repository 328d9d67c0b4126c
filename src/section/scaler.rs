// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Scaler payload: a pair of counters and a label.
//!
//! `counts[0]` is the running total, `counts[1]` the most recent update.

use crate::core::{str_wire_len, DataBuf, Result};

/// Scaler section (`SEC_GEN_SCALER_ID` / `SEC_TRI_TD_SCALER_ID`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scaler {
    pub counts: [u32; 2],
    pub label: String,
}

impl Scaler {
    pub fn decode(buf: &mut DataBuf) -> Result<Self> {
        Ok(Self {
            counts: [buf.read_u32()?, buf.read_u32()?],
            label: buf.read_str()?,
        })
    }

    pub fn encode(&self, buf: &mut DataBuf) -> Result<()> {
        buf.write_u32(self.counts[0]);
        buf.write_u32(self.counts[1]);
        buf.write_str(&self.label)
    }

    pub fn wire_size(&self) -> u32 {
        8 + str_wire_len(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaler_round_trip() {
        let scaler = Scaler {
            counts: [123_456_789, 1042],
            label: "CLOCK".to_string(),
        };
        let mut buf = DataBuf::new();
        scaler.encode(&mut buf).unwrap();
        assert_eq!(buf.len() as u32, scaler.wire_size());
        assert_eq!(Scaler::decode(&mut buf).unwrap(), scaler);
    }
}
