// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Friendly file handle: field-level access over the section tree.
//!
//! [`MudFile`] owns one open file's tree and hides traversal behind flat
//! accessors. Getters return `None` when the addressed section is absent;
//! setters return [`MudError::NotFound`] until the matching initializer
//! (`set_run_desc`, `set_hists`, `set_scalers`, `set_ind_vars`,
//! `set_comments`) has built the subtree.
//!
//! Accessor indexes are 1-based, matching the producer-assigned instance
//! numbering inside each group.

use std::path::{Path, PathBuf};

use crate::core::{MudError, Result};
use crate::io::{reader, writer};
use crate::section::constants::*;
use crate::section::{
    Comment, HistData, HistHdr, IndVar, RunDesc, Scaler, Section, SectionPayload, TiRunDesc,
};
use crate::tree::{find_child, find_child_mut, remove_from_group};

/// How a file was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
    ReadWrite,
}

/// Group kinds that may hold histograms, in lookup order.
const HIST_GROUPS: &[u32] = &[GRP_TRI_TD_HIST_ID, GRP_TRI_TI_HIST_ID, GRP_GEN_HIST_ID];
/// Group kinds that may hold scalers.
const SCALER_GROUPS: &[u32] = &[GRP_TRI_TD_SCALER_ID, GRP_GEN_SCALER_ID];
/// Group kinds that may hold independent variables.
const IND_VAR_GROUPS: &[u32] = &[GRP_GEN_IND_VAR_ID, GRP_GEN_IND_VAR_ARR_ID];
/// Group kinds that may hold comments.
const CMT_GROUPS: &[u32] = &[GRP_CMT_ID];

/// An open MUD file: path, mode and the in-memory section tree.
///
/// Dropping the handle discards the tree without writing (the `closeRead`
/// path); `close_write` / `close_write_as` flush it.
#[derive(Debug)]
pub struct MudFile {
    path: PathBuf,
    mode: OpenMode,
    root: Section,
}

impl MudFile {
    /// Open an existing file for reading.
    pub fn open_read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let root = reader::read_file(&path)?;
        Ok(Self {
            path,
            mode: OpenMode::Read,
            root,
        })
    }

    /// Open a fresh file for writing.
    ///
    /// Starts from an empty outer group of the given format; nothing touches
    /// the disk until `close_write`.
    pub fn open_write<P: AsRef<Path>>(path: P, fmt_id: u32) -> Result<Self> {
        if !is_file_format(fmt_id) {
            return Err(MudError::invalid_input(
                "fmt_id",
                format!("{fmt_id:#010x} is not a file-format ID"),
            ));
        }
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            mode: OpenMode::Write,
            root: Section::new_group(fmt_id),
        })
    }

    /// Open an existing file for update.
    pub fn open_read_write<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let root = reader::read_file(&path)?;
        Ok(Self {
            path,
            mode: OpenMode::ReadWrite,
            root,
        })
    }

    /// File-format ID of the outer group.
    pub fn format_id(&self) -> u32 {
        self.root.instance_id
    }

    /// Path the handle was opened against.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// How the handle was opened.
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// The outer group, for direct tree traversal.
    pub fn root(&self) -> &Section {
        &self.root
    }

    /// Mutable access to the outer group.
    pub fn root_mut(&mut self) -> &mut Section {
        &mut self.root
    }

    /// Write the tree back to the path the handle was opened against,
    /// keeping the handle alive.
    ///
    /// Fails on read-only handles; `write_as` can write to another path.
    pub fn write_back(&self) -> Result<()> {
        if self.mode == OpenMode::Read {
            return Err(MudError::invalid_input(
                "handle",
                "opened read-only; write_as can write to another path",
            ));
        }
        writer::write_file(&self.path, &self.root)
    }

    /// Write the tree to a different path, regardless of open mode.
    pub fn write_as<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        writer::write_file(path, &self.root)
    }

    /// Write the tree back to the handle's own path and close.
    pub fn close_write(self) -> Result<()> {
        self.write_back()
    }

    /// Write the tree to a different path and close.
    pub fn close_write_as<P: AsRef<Path>>(self, path: P) -> Result<()> {
        self.write_as(path)
    }

    // ------------------------------------------------------------------
    // Internal lookup helpers
    // ------------------------------------------------------------------

    fn gen_desc(&self) -> Option<&RunDesc> {
        match &find_child(&self.root, SEC_GEN_RUN_DESC_ID, 1)?.payload {
            SectionPayload::RunDesc(d) => Some(d),
            _ => None,
        }
    }

    fn gen_desc_mut(&mut self) -> Option<&mut RunDesc> {
        match &mut find_child_mut(&mut self.root, SEC_GEN_RUN_DESC_ID, 1)?.payload {
            SectionPayload::RunDesc(d) => Some(d),
            _ => None,
        }
    }

    fn ti_desc(&self) -> Option<&TiRunDesc> {
        match &find_child(&self.root, SEC_TRI_TI_RUN_DESC_ID, 1)?.payload {
            SectionPayload::TiRunDesc(d) => Some(d),
            _ => None,
        }
    }

    fn ti_desc_mut(&mut self) -> Option<&mut TiRunDesc> {
        match &mut find_child_mut(&mut self.root, SEC_TRI_TI_RUN_DESC_ID, 1)?.payload {
            SectionPayload::TiRunDesc(d) => Some(d),
            _ => None,
        }
    }

    fn group(&self, kinds: &[u32]) -> Option<&Section> {
        kinds
            .iter()
            .find_map(|&k| find_child(&self.root, SEC_GRP_ID, k))
    }

    fn group_mut(&mut self, kinds: &[u32]) -> Option<&mut Section> {
        let kind = kinds
            .iter()
            .copied()
            .find(|&k| find_child(&self.root, SEC_GRP_ID, k).is_some())?;
        find_child_mut(&mut self.root, SEC_GRP_ID, kind)
    }

    /// Replace any group of the listed kinds with a fresh one.
    fn replace_group(&mut self, kinds: &[u32], fresh: Section) -> Result<()> {
        for &k in kinds {
            remove_from_group(&mut self.root, SEC_GRP_ID, k);
        }
        crate::tree::add_to_group(&mut self.root, fresh)
    }

    fn member<'a>(
        &'a self,
        kinds: &[u32],
        sec_id: u32,
        index: u32,
    ) -> Option<&'a Section> {
        find_child(self.group(kinds)?, sec_id, index)
    }

    fn member_mut<'a>(
        &'a mut self,
        kinds: &[u32],
        sec_id: u32,
        index: u32,
    ) -> Option<&'a mut Section> {
        find_child_mut(self.group_mut(kinds)?, sec_id, index)
    }

    fn count_members(&self, kinds: &[u32], sec_id: u32) -> Option<(u32, u32)> {
        let grp = self.group(kinds)?;
        let n = grp
            .members()?
            .iter()
            .filter(|m| m.sec_id == sec_id)
            .count() as u32;
        Some((grp.instance_id, n))
    }

    fn hist_hdr(&self, index: u32) -> Option<&HistHdr> {
        match &self.member(HIST_GROUPS, SEC_GEN_HIST_HDR_ID, index)?.payload {
            SectionPayload::HistHdr(h) => Some(h),
            _ => None,
        }
    }

    fn hist_hdr_mut(&mut self, index: u32) -> Result<&mut HistHdr> {
        match self.member_mut(HIST_GROUPS, SEC_GEN_HIST_HDR_ID, index) {
            Some(Section {
                payload: SectionPayload::HistHdr(h),
                ..
            }) => Ok(h),
            _ => Err(MudError::not_found(format!("histogram header {index}"))),
        }
    }

    fn hist_dat(&self, index: u32) -> Option<&HistData> {
        match &self.member(HIST_GROUPS, SEC_GEN_HIST_DAT_ID, index)?.payload {
            SectionPayload::HistData(d) => Some(d),
            _ => None,
        }
    }

    fn hist_dat_mut(&mut self, index: u32) -> Result<&mut HistData> {
        match self.member_mut(HIST_GROUPS, SEC_GEN_HIST_DAT_ID, index) {
            Some(Section {
                payload: SectionPayload::HistData(d),
                ..
            }) => Ok(d),
            _ => Err(MudError::not_found(format!("histogram data {index}"))),
        }
    }

    fn scaler(&self, index: u32) -> Option<&Scaler> {
        match &self.member(SCALER_GROUPS, SEC_GEN_SCALER_ID, index)?.payload {
            SectionPayload::Scaler(s) => Some(s),
            _ => None,
        }
    }

    fn scaler_mut(&mut self, index: u32) -> Result<&mut Scaler> {
        match self.member_mut(SCALER_GROUPS, SEC_GEN_SCALER_ID, index) {
            Some(Section {
                payload: SectionPayload::Scaler(s),
                ..
            }) => Ok(s),
            _ => Err(MudError::not_found(format!("scaler {index}"))),
        }
    }

    fn ind_var(&self, index: u32) -> Option<&IndVar> {
        for sec_id in [SEC_GEN_IND_VAR_ID, SEC_GEN_IND_VAR_ARR_ID] {
            if let Some(sec) = self.member(IND_VAR_GROUPS, sec_id, index) {
                if let SectionPayload::IndVar(v) = &sec.payload {
                    return Some(v);
                }
            }
        }
        None
    }

    fn ind_var_mut(&mut self, index: u32) -> Result<&mut IndVar> {
        let sec_id = [SEC_GEN_IND_VAR_ID, SEC_GEN_IND_VAR_ARR_ID]
            .into_iter()
            .find(|&id| self.member(IND_VAR_GROUPS, id, index).is_some())
            .ok_or_else(|| MudError::not_found(format!("independent variable {index}")))?;
        match self.member_mut(IND_VAR_GROUPS, sec_id, index) {
            Some(Section {
                payload: SectionPayload::IndVar(v),
                ..
            }) => Ok(v),
            _ => Err(MudError::not_found(format!("independent variable {index}"))),
        }
    }

    fn comment(&self, index: u32) -> Option<&Comment> {
        match &self.member(CMT_GROUPS, SEC_CMT_ID, index)?.payload {
            SectionPayload::Comment(c) => Some(c),
            _ => None,
        }
    }

    fn comment_mut(&mut self, index: u32) -> Result<&mut Comment> {
        match self.member_mut(CMT_GROUPS, SEC_CMT_ID, index) {
            Some(Section {
                payload: SectionPayload::Comment(c),
                ..
            }) => Ok(c),
            _ => Err(MudError::not_found(format!("comment {index}"))),
        }
    }

    fn desc_u32(&self, gen: fn(&RunDesc) -> u32, ti: fn(&TiRunDesc) -> u32) -> Option<u32> {
        self.gen_desc().map(gen).or_else(|| self.ti_desc().map(ti))
    }

    fn desc_str(
        &self,
        gen: fn(&RunDesc) -> &String,
        ti: fn(&TiRunDesc) -> &String,
    ) -> Option<&str> {
        if let Some(d) = self.gen_desc() {
            return Some(gen(d).as_str());
        }
        self.ti_desc().map(|d| ti(d).as_str())
    }

    fn set_desc_u32(
        &mut self,
        field: &str,
        gen: fn(&mut RunDesc) -> &mut u32,
        ti: fn(&mut TiRunDesc) -> &mut u32,
        value: u32,
    ) -> Result<()> {
        if let Some(d) = self.gen_desc_mut() {
            *gen(d) = value;
            return Ok(());
        }
        if let Some(d) = self.ti_desc_mut() {
            *ti(d) = value;
            return Ok(());
        }
        Err(MudError::not_found(format!("run description ({field})")))
    }

    fn set_desc_str(
        &mut self,
        field: &str,
        gen: fn(&mut RunDesc) -> &mut String,
        ti: fn(&mut TiRunDesc) -> &mut String,
        value: &str,
    ) -> Result<()> {
        if let Some(d) = self.gen_desc_mut() {
            *gen(d) = value.to_string();
            return Ok(());
        }
        if let Some(d) = self.ti_desc_mut() {
            *ti(d) = value.to_string();
            return Ok(());
        }
        Err(MudError::not_found(format!("run description ({field})")))
    }

    /// Clamp a set-time value to the `u32` wire format.
    fn clamp_time(field: &str, secs: u64) -> u32 {
        if secs > u32::MAX as u64 {
            tracing::warn!(field, secs, "time exceeds the u32 wire format, clamping");
            u32::MAX
        } else {
            secs as u32
        }
    }

    // ------------------------------------------------------------------
    // Run description getters
    // ------------------------------------------------------------------

    pub fn get_expt_number(&self) -> Option<u32> {
        self.desc_u32(|d| d.expt_number, |d| d.expt_number)
    }

    pub fn get_run_number(&self) -> Option<u32> {
        self.desc_u32(|d| d.run_number, |d| d.run_number)
    }

    pub fn get_elapsed_sec(&self) -> Option<u32> {
        self.desc_u32(|d| d.elapsed_sec, |d| d.elapsed_sec)
    }

    pub fn get_time_begin(&self) -> Option<u64> {
        self.desc_u32(|d| d.time_begin, |d| d.time_begin)
            .map(u64::from)
    }

    pub fn get_time_end(&self) -> Option<u64> {
        self.desc_u32(|d| d.time_end, |d| d.time_end).map(u64::from)
    }

    pub fn get_title(&self) -> Option<&str> {
        self.desc_str(|d| &d.title, |d| &d.title)
    }

    pub fn get_lab(&self) -> Option<&str> {
        self.desc_str(|d| &d.lab, |d| &d.lab)
    }

    pub fn get_area(&self) -> Option<&str> {
        self.desc_str(|d| &d.area, |d| &d.area)
    }

    pub fn get_method(&self) -> Option<&str> {
        self.desc_str(|d| &d.method, |d| &d.method)
    }

    pub fn get_apparatus(&self) -> Option<&str> {
        self.desc_str(|d| &d.apparatus, |d| &d.apparatus)
    }

    pub fn get_insert(&self) -> Option<&str> {
        self.desc_str(|d| &d.insert, |d| &d.insert)
    }

    pub fn get_sample(&self) -> Option<&str> {
        self.desc_str(|d| &d.sample, |d| &d.sample)
    }

    pub fn get_orient(&self) -> Option<&str> {
        self.desc_str(|d| &d.orient, |d| &d.orient)
    }

    pub fn get_das(&self) -> Option<&str> {
        self.desc_str(|d| &d.das, |d| &d.das)
    }

    pub fn get_experimenter(&self) -> Option<&str> {
        self.desc_str(|d| &d.experimenter, |d| &d.experimenter)
    }

    /// Generic/TD files only.
    pub fn get_temperature(&self) -> Option<&str> {
        self.gen_desc().map(|d| d.temperature.as_str())
    }

    /// Generic/TD files only.
    pub fn get_field(&self) -> Option<&str> {
        self.gen_desc().map(|d| d.field.as_str())
    }

    /// TI files only.
    pub fn get_subtitle(&self) -> Option<&str> {
        self.ti_desc().map(|d| d.subtitle.as_str())
    }

    /// TI files only.
    pub fn get_comment1(&self) -> Option<&str> {
        self.ti_desc().map(|d| d.comment1.as_str())
    }

    /// TI files only.
    pub fn get_comment2(&self) -> Option<&str> {
        self.ti_desc().map(|d| d.comment2.as_str())
    }

    /// TI files only.
    pub fn get_comment3(&self) -> Option<&str> {
        self.ti_desc().map(|d| d.comment3.as_str())
    }

    // ------------------------------------------------------------------
    // Run description setters
    // ------------------------------------------------------------------

    /// Initializer: create (or reset) the run description for this format.
    ///
    /// Must be called before the per-field setters on a fresh write handle.
    pub fn set_run_desc(&mut self) -> Result<()> {
        let sec_id = if self.format_id() == FMT_TRI_TI_ID {
            SEC_TRI_TI_RUN_DESC_ID
        } else {
            SEC_GEN_RUN_DESC_ID
        };
        remove_from_group(&mut self.root, SEC_GEN_RUN_DESC_ID, 0);
        remove_from_group(&mut self.root, SEC_TRI_TI_RUN_DESC_ID, 0);
        crate::tree::add_to_group(&mut self.root, Section::new(sec_id, 1))
    }

    pub fn set_expt_number(&mut self, value: u32) -> Result<()> {
        self.set_desc_u32(
            "expt_number",
            |d| &mut d.expt_number,
            |d| &mut d.expt_number,
            value,
        )
    }

    pub fn set_run_number(&mut self, value: u32) -> Result<()> {
        self.set_desc_u32(
            "run_number",
            |d| &mut d.run_number,
            |d| &mut d.run_number,
            value,
        )
    }

    pub fn set_elapsed_sec(&mut self, value: u32) -> Result<()> {
        self.set_desc_u32(
            "elapsed_sec",
            |d| &mut d.elapsed_sec,
            |d| &mut d.elapsed_sec,
            value,
        )
    }

    pub fn set_time_begin(&mut self, secs: u64) -> Result<()> {
        let clamped = Self::clamp_time("time_begin", secs);
        self.set_desc_u32(
            "time_begin",
            |d| &mut d.time_begin,
            |d| &mut d.time_begin,
            clamped,
        )
    }

    pub fn set_time_end(&mut self, secs: u64) -> Result<()> {
        let clamped = Self::clamp_time("time_end", secs);
        self.set_desc_u32(
            "time_end",
            |d| &mut d.time_end,
            |d| &mut d.time_end,
            clamped,
        )
    }

    pub fn set_title(&mut self, value: &str) -> Result<()> {
        self.set_desc_str("title", |d| &mut d.title, |d| &mut d.title, value)
    }

    pub fn set_lab(&mut self, value: &str) -> Result<()> {
        self.set_desc_str("lab", |d| &mut d.lab, |d| &mut d.lab, value)
    }

    pub fn set_area(&mut self, value: &str) -> Result<()> {
        self.set_desc_str("area", |d| &mut d.area, |d| &mut d.area, value)
    }

    pub fn set_method(&mut self, value: &str) -> Result<()> {
        self.set_desc_str("method", |d| &mut d.method, |d| &mut d.method, value)
    }

    pub fn set_apparatus(&mut self, value: &str) -> Result<()> {
        self.set_desc_str(
            "apparatus",
            |d| &mut d.apparatus,
            |d| &mut d.apparatus,
            value,
        )
    }

    pub fn set_insert(&mut self, value: &str) -> Result<()> {
        self.set_desc_str("insert", |d| &mut d.insert, |d| &mut d.insert, value)
    }

    pub fn set_sample(&mut self, value: &str) -> Result<()> {
        self.set_desc_str("sample", |d| &mut d.sample, |d| &mut d.sample, value)
    }

    pub fn set_orient(&mut self, value: &str) -> Result<()> {
        self.set_desc_str("orient", |d| &mut d.orient, |d| &mut d.orient, value)
    }

    pub fn set_das(&mut self, value: &str) -> Result<()> {
        self.set_desc_str("das", |d| &mut d.das, |d| &mut d.das, value)
    }

    pub fn set_experimenter(&mut self, value: &str) -> Result<()> {
        self.set_desc_str(
            "experimenter",
            |d| &mut d.experimenter,
            |d| &mut d.experimenter,
            value,
        )
    }

    /// Generic/TD files only.
    pub fn set_temperature(&mut self, value: &str) -> Result<()> {
        match self.gen_desc_mut() {
            Some(d) => {
                d.temperature = value.to_string();
                Ok(())
            }
            None => Err(MudError::not_found("run description (temperature)")),
        }
    }

    /// Generic/TD files only.
    pub fn set_field(&mut self, value: &str) -> Result<()> {
        match self.gen_desc_mut() {
            Some(d) => {
                d.field = value.to_string();
                Ok(())
            }
            None => Err(MudError::not_found("run description (field)")),
        }
    }

    /// TI files only.
    pub fn set_subtitle(&mut self, value: &str) -> Result<()> {
        match self.ti_desc_mut() {
            Some(d) => {
                d.subtitle = value.to_string();
                Ok(())
            }
            None => Err(MudError::not_found("TI run description (subtitle)")),
        }
    }

    /// TI files only.
    pub fn set_comment1(&mut self, value: &str) -> Result<()> {
        match self.ti_desc_mut() {
            Some(d) => {
                d.comment1 = value.to_string();
                Ok(())
            }
            None => Err(MudError::not_found("TI run description (comment1)")),
        }
    }

    /// TI files only.
    pub fn set_comment2(&mut self, value: &str) -> Result<()> {
        match self.ti_desc_mut() {
            Some(d) => {
                d.comment2 = value.to_string();
                Ok(())
            }
            None => Err(MudError::not_found("TI run description (comment2)")),
        }
    }

    /// TI files only.
    pub fn set_comment3(&mut self, value: &str) -> Result<()> {
        match self.ti_desc_mut() {
            Some(d) => {
                d.comment3 = value.to_string();
                Ok(())
            }
            None => Err(MudError::not_found("TI run description (comment3)")),
        }
    }

    // ------------------------------------------------------------------
    // Histogram getters
    // ------------------------------------------------------------------

    /// The histogram group's kind and the number of histograms in it.
    pub fn get_hists(&self) -> Option<(u32, u32)> {
        self.count_members(HIST_GROUPS, SEC_GEN_HIST_HDR_ID)
    }

    pub fn get_hist_type(&self, index: u32) -> Option<u32> {
        self.hist_hdr(index).map(|h| h.hist_type)
    }

    pub fn get_hist_num_bytes(&self, index: u32) -> Option<u32> {
        self.hist_hdr(index).map(|h| h.n_bytes)
    }

    pub fn get_hist_num_bins(&self, index: u32) -> Option<u32> {
        self.hist_hdr(index).map(|h| h.n_bins)
    }

    pub fn get_hist_bytes_per_bin(&self, index: u32) -> Option<u32> {
        self.hist_hdr(index).map(|h| h.bytes_per_bin)
    }

    pub fn get_hist_fs_per_bin(&self, index: u32) -> Option<u32> {
        self.hist_hdr(index).map(|h| h.fs_per_bin)
    }

    /// Bin interval in seconds, preferring the exact stored value over
    /// `fs_per_bin * 1e-15`.
    pub fn get_hist_seconds_per_bin(&self, index: u32) -> Option<f64> {
        self.hist_hdr(index).map(|h| h.seconds_per_bin())
    }

    pub fn get_hist_t0_ps(&self, index: u32) -> Option<u32> {
        self.hist_hdr(index).map(|h| h.t0_ps)
    }

    pub fn get_hist_t0_bin(&self, index: u32) -> Option<u32> {
        self.hist_hdr(index).map(|h| h.t0_bin)
    }

    pub fn get_hist_good_bin1(&self, index: u32) -> Option<u32> {
        self.hist_hdr(index).map(|h| h.good_bin1)
    }

    pub fn get_hist_good_bin2(&self, index: u32) -> Option<u32> {
        self.hist_hdr(index).map(|h| h.good_bin2)
    }

    pub fn get_hist_bkgd1(&self, index: u32) -> Option<u32> {
        self.hist_hdr(index).map(|h| h.bkgd1)
    }

    pub fn get_hist_bkgd2(&self, index: u32) -> Option<u32> {
        self.hist_hdr(index).map(|h| h.bkgd2)
    }

    pub fn get_hist_num_events(&self, index: u32) -> Option<u32> {
        self.hist_hdr(index).map(|h| h.n_events)
    }

    pub fn get_hist_title(&self, index: u32) -> Option<&str> {
        self.hist_hdr(index).map(|h| h.title.as_str())
    }

    /// Decode histogram bins into `u32` elements.
    ///
    /// Fixed-width storage widens 1-, 2- or 4-byte little-endian bins; a
    /// `bytes_per_bin` of 0 unpacks the variable-width stream. `None` when
    /// the histogram is absent or its storage is inconsistent with the
    /// header.
    pub fn get_hist_data(&self, index: u32) -> Option<Vec<u32>> {
        let hdr = self.hist_hdr(index)?;
        let dat = self.hist_dat(index)?;
        let n = hdr.n_bins as usize;
        match hdr.bytes_per_bin {
            0 => crate::section::packing::unpack_n(&dat.data, n).ok(),
            1 => {
                if dat.data.len() != n {
                    return None;
                }
                Some(dat.data.iter().map(|&b| b as u32).collect())
            }
            2 => {
                if dat.data.len() != n * 2 {
                    return None;
                }
                Some(
                    dat.data
                        .chunks_exact(2)
                        .map(|c| u16::from_le_bytes([c[0], c[1]]) as u32)
                        .collect(),
                )
            }
            4 => {
                if dat.data.len() != n * 4 {
                    return None;
                }
                Some(
                    dat.data
                        .chunks_exact(4)
                        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                        .collect(),
                )
            }
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Histogram setters
    // ------------------------------------------------------------------

    /// Initializer: replace any histogram group with a fresh one of
    /// `group_kind`, holding `n` zeroed header/data pairs numbered 1..n.
    pub fn set_hists(&mut self, group_kind: u32, n: u32) -> Result<()> {
        if !HIST_GROUPS.contains(&group_kind) {
            return Err(MudError::invalid_input(
                "group_kind",
                format!("{group_kind:#010x} is not a histogram group kind"),
            ));
        }
        let mut grp = Section::new_group(group_kind);
        for i in 1..=n {
            crate::tree::add_to_group(&mut grp, Section::new(SEC_GEN_HIST_HDR_ID, i))?;
            crate::tree::add_to_group(&mut grp, Section::new(SEC_GEN_HIST_DAT_ID, i))?;
        }
        self.replace_group(HIST_GROUPS, grp)
    }

    pub fn set_hist_type(&mut self, index: u32, value: u32) -> Result<()> {
        self.hist_hdr_mut(index)?.hist_type = value;
        Ok(())
    }

    pub fn set_hist_num_bins(&mut self, index: u32, value: u32) -> Result<()> {
        self.hist_hdr_mut(index)?.n_bins = value;
        Ok(())
    }

    pub fn set_hist_bytes_per_bin(&mut self, index: u32, value: u32) -> Result<()> {
        if !matches!(value, 0 | 1 | 2 | 4) {
            return Err(MudError::invalid_input(
                "bytes_per_bin",
                "must be 0, 1, 2 or 4",
            ));
        }
        self.hist_hdr_mut(index)?.bytes_per_bin = value;
        Ok(())
    }

    pub fn set_hist_fs_per_bin(&mut self, index: u32, value: u32) -> Result<()> {
        self.hist_hdr_mut(index)?.fs_per_bin = value;
        Ok(())
    }

    /// Record an exact bin interval that `fs_per_bin` cannot express.
    pub fn set_hist_seconds_per_bin(&mut self, index: u32, value: f64) -> Result<()> {
        if !value.is_finite() || value <= 0.0 {
            return Err(MudError::invalid_input(
                "seconds_per_bin",
                "must be finite and positive",
            ));
        }
        self.hist_hdr_mut(index)?.seconds_per_bin = Some(value);
        Ok(())
    }

    pub fn set_hist_t0_ps(&mut self, index: u32, value: u32) -> Result<()> {
        self.hist_hdr_mut(index)?.t0_ps = value;
        Ok(())
    }

    pub fn set_hist_t0_bin(&mut self, index: u32, value: u32) -> Result<()> {
        self.hist_hdr_mut(index)?.t0_bin = value;
        Ok(())
    }

    pub fn set_hist_good_bin1(&mut self, index: u32, value: u32) -> Result<()> {
        self.hist_hdr_mut(index)?.good_bin1 = value;
        Ok(())
    }

    pub fn set_hist_good_bin2(&mut self, index: u32, value: u32) -> Result<()> {
        self.hist_hdr_mut(index)?.good_bin2 = value;
        Ok(())
    }

    pub fn set_hist_bkgd1(&mut self, index: u32, value: u32) -> Result<()> {
        self.hist_hdr_mut(index)?.bkgd1 = value;
        Ok(())
    }

    pub fn set_hist_bkgd2(&mut self, index: u32, value: u32) -> Result<()> {
        self.hist_hdr_mut(index)?.bkgd2 = value;
        Ok(())
    }

    pub fn set_hist_num_events(&mut self, index: u32, value: u32) -> Result<()> {
        self.hist_hdr_mut(index)?.n_events = value;
        Ok(())
    }

    pub fn set_hist_title(&mut self, index: u32, value: &str) -> Result<()> {
        self.hist_hdr_mut(index)?.title = value.to_string();
        Ok(())
    }

    /// Store histogram bins.
    ///
    /// Encodes per the header's `bytes_per_bin` (packing when 0), updates
    /// `n_bins` and `n_bytes` to match. Fixed-width storage rejects values
    /// that do not fit the configured width.
    pub fn set_hist_data(&mut self, index: u32, values: &[u32]) -> Result<()> {
        let bytes_per_bin = self.hist_hdr_mut(index)?.bytes_per_bin;
        let encoded = match bytes_per_bin {
            0 => crate::section::packing::pack(values),
            1 => {
                let mut out = Vec::with_capacity(values.len());
                for &v in values {
                    if v > u8::MAX as u32 {
                        return Err(MudError::invalid_input(
                            "values",
                            format!("{v} does not fit 1 byte per bin"),
                        ));
                    }
                    out.push(v as u8);
                }
                out
            }
            2 => {
                let mut out = Vec::with_capacity(values.len() * 2);
                for &v in values {
                    if v > u16::MAX as u32 {
                        return Err(MudError::invalid_input(
                            "values",
                            format!("{v} does not fit 2 bytes per bin"),
                        ));
                    }
                    out.extend_from_slice(&(v as u16).to_le_bytes());
                }
                out
            }
            4 => {
                let mut out = Vec::with_capacity(values.len() * 4);
                for &v in values {
                    out.extend_from_slice(&v.to_le_bytes());
                }
                out
            }
            other => {
                return Err(MudError::invalid_input(
                    "bytes_per_bin",
                    format!("{other} is not a valid bin width"),
                ))
            }
        };

        {
            let hdr = self.hist_hdr_mut(index)?;
            hdr.n_bins = values.len() as u32;
            hdr.n_bytes = encoded.len() as u32;
        }
        self.hist_dat_mut(index)?.data = encoded;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Scalers
    // ------------------------------------------------------------------

    /// The scaler group's kind and the number of scalers in it.
    pub fn get_scalers(&self) -> Option<(u32, u32)> {
        self.count_members(SCALER_GROUPS, SEC_GEN_SCALER_ID)
    }

    pub fn get_scaler_label(&self, index: u32) -> Option<&str> {
        self.scaler(index).map(|s| s.label.as_str())
    }

    /// `[total, most recent update]`.
    pub fn get_scaler_counts(&self, index: u32) -> Option<[u32; 2]> {
        self.scaler(index).map(|s| s.counts)
    }

    /// Initializer: replace any scaler group with `n` zeroed scalers.
    pub fn set_scalers(&mut self, group_kind: u32, n: u32) -> Result<()> {
        if !SCALER_GROUPS.contains(&group_kind) {
            return Err(MudError::invalid_input(
                "group_kind",
                format!("{group_kind:#010x} is not a scaler group kind"),
            ));
        }
        let mut grp = Section::new_group(group_kind);
        for i in 1..=n {
            crate::tree::add_to_group(&mut grp, Section::new(SEC_GEN_SCALER_ID, i))?;
        }
        self.replace_group(SCALER_GROUPS, grp)
    }

    pub fn set_scaler_label(&mut self, index: u32, value: &str) -> Result<()> {
        self.scaler_mut(index)?.label = value.to_string();
        Ok(())
    }

    pub fn set_scaler_counts(&mut self, index: u32, counts: [u32; 2]) -> Result<()> {
        self.scaler_mut(index)?.counts = counts;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Independent variables
    // ------------------------------------------------------------------

    /// The independent-variable group's kind and member count.
    pub fn get_ind_vars(&self) -> Option<(u32, u32)> {
        let grp = self.group(IND_VAR_GROUPS)?;
        let n = grp
            .members()?
            .iter()
            .filter(|m| matches!(m.sec_id, SEC_GEN_IND_VAR_ID | SEC_GEN_IND_VAR_ARR_ID))
            .count() as u32;
        Some((grp.instance_id, n))
    }

    pub fn get_ind_var_low(&self, index: u32) -> Option<f64> {
        self.ind_var(index).map(|v| v.low)
    }

    pub fn get_ind_var_high(&self, index: u32) -> Option<f64> {
        self.ind_var(index).map(|v| v.high)
    }

    pub fn get_ind_var_mean(&self, index: u32) -> Option<f64> {
        self.ind_var(index).map(|v| v.mean)
    }

    pub fn get_ind_var_stddev(&self, index: u32) -> Option<f64> {
        self.ind_var(index).map(|v| v.stddev)
    }

    pub fn get_ind_var_skewness(&self, index: u32) -> Option<f64> {
        self.ind_var(index).map(|v| v.skewness)
    }

    pub fn get_ind_var_name(&self, index: u32) -> Option<&str> {
        self.ind_var(index).map(|v| v.name.as_str())
    }

    pub fn get_ind_var_description(&self, index: u32) -> Option<&str> {
        self.ind_var(index).map(|v| v.description.as_str())
    }

    pub fn get_ind_var_units(&self, index: u32) -> Option<&str> {
        self.ind_var(index).map(|v| v.units.as_str())
    }

    pub fn get_ind_var_num_data(&self, index: u32) -> Option<u32> {
        self.ind_var(index)?.array.as_ref().map(|a| a.num_data)
    }

    pub fn get_ind_var_elem_size(&self, index: u32) -> Option<u32> {
        self.ind_var(index)?.array.as_ref().map(|a| a.elem_size)
    }

    pub fn get_ind_var_data_type(&self, index: u32) -> Option<u32> {
        self.ind_var(index)?.array.as_ref().map(|a| a.data_type)
    }

    pub fn get_ind_var_has_time(&self, index: u32) -> Option<bool> {
        self.ind_var(index)?.array.as_ref().map(|a| a.has_time)
    }

    pub fn get_ind_var_data(&self, index: u32) -> Option<&[u8]> {
        self.ind_var(index)?.array.as_ref().map(|a| a.data.as_slice())
    }

    pub fn get_ind_var_time_data(&self, index: u32) -> Option<&[u32]> {
        let arr = self.ind_var(index)?.array.as_ref()?;
        if arr.has_time {
            Some(&arr.time_data)
        } else {
            None
        }
    }

    /// Initializer: replace any independent-variable group.
    ///
    /// A `GRP_GEN_IND_VAR_ARR_ID` group gets array-variant members.
    pub fn set_ind_vars(&mut self, group_kind: u32, n: u32) -> Result<()> {
        if !IND_VAR_GROUPS.contains(&group_kind) {
            return Err(MudError::invalid_input(
                "group_kind",
                format!("{group_kind:#010x} is not an independent-variable group kind"),
            ));
        }
        let sec_id = if group_kind == GRP_GEN_IND_VAR_ARR_ID {
            SEC_GEN_IND_VAR_ARR_ID
        } else {
            SEC_GEN_IND_VAR_ID
        };
        let mut grp = Section::new_group(group_kind);
        for i in 1..=n {
            crate::tree::add_to_group(&mut grp, Section::new(sec_id, i))?;
        }
        self.replace_group(IND_VAR_GROUPS, grp)
    }

    pub fn set_ind_var_low(&mut self, index: u32, value: f64) -> Result<()> {
        self.ind_var_mut(index)?.low = value;
        Ok(())
    }

    pub fn set_ind_var_high(&mut self, index: u32, value: f64) -> Result<()> {
        self.ind_var_mut(index)?.high = value;
        Ok(())
    }

    pub fn set_ind_var_mean(&mut self, index: u32, value: f64) -> Result<()> {
        self.ind_var_mut(index)?.mean = value;
        Ok(())
    }

    pub fn set_ind_var_stddev(&mut self, index: u32, value: f64) -> Result<()> {
        self.ind_var_mut(index)?.stddev = value;
        Ok(())
    }

    pub fn set_ind_var_skewness(&mut self, index: u32, value: f64) -> Result<()> {
        self.ind_var_mut(index)?.skewness = value;
        Ok(())
    }

    pub fn set_ind_var_name(&mut self, index: u32, value: &str) -> Result<()> {
        self.ind_var_mut(index)?.name = value.to_string();
        Ok(())
    }

    pub fn set_ind_var_description(&mut self, index: u32, value: &str) -> Result<()> {
        self.ind_var_mut(index)?.description = value.to_string();
        Ok(())
    }

    pub fn set_ind_var_units(&mut self, index: u32, value: &str) -> Result<()> {
        self.ind_var_mut(index)?.units = value.to_string();
        Ok(())
    }

    /// Store a sampled history on an array-variant member.
    ///
    /// `data.len()` must be a multiple of `elem_size`; `num_data` is derived.
    pub fn set_ind_var_data(
        &mut self,
        index: u32,
        elem_size: u32,
        data_type: u32,
        data: &[u8],
    ) -> Result<()> {
        if elem_size == 0 || data.len() % elem_size as usize != 0 {
            return Err(MudError::invalid_input(
                "data",
                format!("length {} is not a multiple of elem_size", data.len()),
            ));
        }
        let var = self.ind_var_mut(index)?;
        let arr = var.array.as_mut().ok_or_else(|| {
            MudError::invalid_input("index", "independent variable has no array variant")
        })?;
        arr.num_data = (data.len() / elem_size as usize) as u32;
        arr.elem_size = elem_size;
        arr.data_type = data_type;
        arr.data = data.to_vec();
        if arr.time_data.len() as u32 != arr.num_data {
            arr.has_time = false;
            arr.time_data.clear();
        }
        Ok(())
    }

    /// Attach one timestamp per sample to an array-variant member.
    pub fn set_ind_var_time_data(&mut self, index: u32, times: &[u32]) -> Result<()> {
        let var = self.ind_var_mut(index)?;
        let arr = var.array.as_mut().ok_or_else(|| {
            MudError::invalid_input("index", "independent variable has no array variant")
        })?;
        if times.len() as u32 != arr.num_data {
            return Err(MudError::invalid_input(
                "times",
                format!("expected {} entries, got {}", arr.num_data, times.len()),
            ));
        }
        arr.has_time = true;
        arr.time_data = times.to_vec();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    /// The comment group's kind and the number of comments in it.
    pub fn get_comments(&self) -> Option<(u32, u32)> {
        self.count_members(CMT_GROUPS, SEC_CMT_ID)
    }

    pub fn get_comment_prev(&self, index: u32) -> Option<u32> {
        self.comment(index).map(|c| c.prev_reply_id)
    }

    pub fn get_comment_next(&self, index: u32) -> Option<u32> {
        self.comment(index).map(|c| c.next_reply_id)
    }

    pub fn get_comment_time(&self, index: u32) -> Option<u64> {
        self.comment(index).map(|c| u64::from(c.time))
    }

    pub fn get_comment_author(&self, index: u32) -> Option<&str> {
        self.comment(index).map(|c| c.author.as_str())
    }

    pub fn get_comment_title(&self, index: u32) -> Option<&str> {
        self.comment(index).map(|c| c.title.as_str())
    }

    pub fn get_comment_body(&self, index: u32) -> Option<&str> {
        self.comment(index).map(|c| c.body.as_str())
    }

    /// Initializer: replace the comment group with `n` empty comments,
    /// assigned IDs 1..n.
    pub fn set_comments(&mut self, n: u32) -> Result<()> {
        let mut grp = Section::new_group(GRP_CMT_ID);
        for i in 1..=n {
            let mut cmt = Section::new(SEC_CMT_ID, i);
            if let SectionPayload::Comment(c) = &mut cmt.payload {
                c.id = i;
            }
            crate::tree::add_to_group(&mut grp, cmt)?;
        }
        self.replace_group(CMT_GROUPS, grp)
    }

    pub fn set_comment_prev(&mut self, index: u32, value: u32) -> Result<()> {
        self.comment_mut(index)?.prev_reply_id = value;
        Ok(())
    }

    pub fn set_comment_next(&mut self, index: u32, value: u32) -> Result<()> {
        self.comment_mut(index)?.next_reply_id = value;
        Ok(())
    }

    pub fn set_comment_time(&mut self, index: u32, secs: u64) -> Result<()> {
        let clamped = Self::clamp_time("comment_time", secs);
        self.comment_mut(index)?.time = clamped;
        Ok(())
    }

    pub fn set_comment_author(&mut self, index: u32, value: &str) -> Result<()> {
        self.comment_mut(index)?.author = value.to_string();
        Ok(())
    }

    pub fn set_comment_title(&mut self, index: u32, value: &str) -> Result<()> {
        self.comment_mut(index)?.title = value.to_string();
        Ok(())
    }

    pub fn set_comment_body(&mut self, index: u32, value: &str) -> Result<()> {
        self.comment_mut(index)?.body = value.to_string();
        Ok(())
    }
}
