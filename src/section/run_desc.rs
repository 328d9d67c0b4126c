// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Run description payloads.
//!
//! Two variants share the five counters and the first ten strings:
//! - [`RunDesc`] (generic and TD files) ends with `temperature` and `field`
//! - [`TiRunDesc`] (TI files) ends with `subtitle` and three comment strings

use crate::core::{str_wire_len, DataBuf, Result};

/// Generic run description (`SEC_GEN_RUN_DESC_ID`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunDesc {
    pub expt_number: u32,
    pub run_number: u32,
    /// Start of run, seconds since epoch.
    pub time_begin: u32,
    /// End of run, seconds since epoch.
    pub time_end: u32,
    pub elapsed_sec: u32,
    pub title: String,
    pub lab: String,
    pub area: String,
    pub method: String,
    pub apparatus: String,
    pub insert: String,
    pub sample: String,
    pub orient: String,
    pub das: String,
    pub experimenter: String,
    pub temperature: String,
    pub field: String,
}

impl RunDesc {
    pub fn decode(buf: &mut DataBuf) -> Result<Self> {
        Ok(Self {
            expt_number: buf.read_u32()?,
            run_number: buf.read_u32()?,
            time_begin: buf.read_time()?,
            time_end: buf.read_time()?,
            elapsed_sec: buf.read_u32()?,
            title: buf.read_str()?,
            lab: buf.read_str()?,
            area: buf.read_str()?,
            method: buf.read_str()?,
            apparatus: buf.read_str()?,
            insert: buf.read_str()?,
            sample: buf.read_str()?,
            orient: buf.read_str()?,
            das: buf.read_str()?,
            experimenter: buf.read_str()?,
            temperature: buf.read_str()?,
            field: buf.read_str()?,
        })
    }

    pub fn encode(&self, buf: &mut DataBuf) -> Result<()> {
        buf.write_u32(self.expt_number);
        buf.write_u32(self.run_number);
        buf.write_time(self.time_begin);
        buf.write_time(self.time_end);
        buf.write_u32(self.elapsed_sec);
        for s in self.strings() {
            buf.write_str(s)?;
        }
        Ok(())
    }

    pub fn wire_size(&self) -> u32 {
        5 * 4 + self.strings().iter().map(|s| str_wire_len(s)).sum::<u32>()
    }

    fn strings(&self) -> [&str; 12] {
        [
            &self.title,
            &self.lab,
            &self.area,
            &self.method,
            &self.apparatus,
            &self.insert,
            &self.sample,
            &self.orient,
            &self.das,
            &self.experimenter,
            &self.temperature,
            &self.field,
        ]
    }
}

/// Time-integral run description (`SEC_TRI_TI_RUN_DESC_ID`).
///
/// Replaces temperature/field with a subtitle and three free-form comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TiRunDesc {
    pub expt_number: u32,
    pub run_number: u32,
    pub time_begin: u32,
    pub time_end: u32,
    pub elapsed_sec: u32,
    pub title: String,
    pub lab: String,
    pub area: String,
    pub method: String,
    pub apparatus: String,
    pub insert: String,
    pub sample: String,
    pub orient: String,
    pub das: String,
    pub experimenter: String,
    pub subtitle: String,
    pub comment1: String,
    pub comment2: String,
    pub comment3: String,
}

impl TiRunDesc {
    pub fn decode(buf: &mut DataBuf) -> Result<Self> {
        Ok(Self {
            expt_number: buf.read_u32()?,
            run_number: buf.read_u32()?,
            time_begin: buf.read_time()?,
            time_end: buf.read_time()?,
            elapsed_sec: buf.read_u32()?,
            title: buf.read_str()?,
            lab: buf.read_str()?,
            area: buf.read_str()?,
            method: buf.read_str()?,
            apparatus: buf.read_str()?,
            insert: buf.read_str()?,
            sample: buf.read_str()?,
            orient: buf.read_str()?,
            das: buf.read_str()?,
            experimenter: buf.read_str()?,
            subtitle: buf.read_str()?,
            comment1: buf.read_str()?,
            comment2: buf.read_str()?,
            comment3: buf.read_str()?,
        })
    }

    pub fn encode(&self, buf: &mut DataBuf) -> Result<()> {
        buf.write_u32(self.expt_number);
        buf.write_u32(self.run_number);
        buf.write_time(self.time_begin);
        buf.write_time(self.time_end);
        buf.write_u32(self.elapsed_sec);
        for s in self.strings() {
            buf.write_str(s)?;
        }
        Ok(())
    }

    pub fn wire_size(&self) -> u32 {
        5 * 4 + self.strings().iter().map(|s| str_wire_len(s)).sum::<u32>()
    }

    fn strings(&self) -> [&str; 14] {
        [
            &self.title,
            &self.lab,
            &self.area,
            &self.method,
            &self.apparatus,
            &self.insert,
            &self.sample,
            &self.orient,
            &self.das,
            &self.experimenter,
            &self.subtitle,
            &self.comment1,
            &self.comment2,
            &self.comment3,
        ]
    }
}
