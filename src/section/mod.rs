// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Section model and codec dispatch.
//!
//! A MUD file is a tree of typed records. Each record is a [`Section`]: a
//! 24-byte core followed by a type-specific payload. The payload lives in
//! the [`SectionPayload`] tagged enum; the `sec_id → codec` dispatch of the
//! legacy proc tables becomes a match on [`SectionKind`].
//!
//! Section IDs not in the catalogue decode into `SectionPayload::Opaque`
//! and re-encode verbatim, preserving forward compatibility.

pub mod comment;
pub mod constants;
pub mod core;
pub mod group;
pub mod hist;
pub mod ind_var;
pub mod packing;
pub mod run_desc;
pub mod scaler;

use std::fmt;

use crate::core::{DataBuf, MudError, Result};

pub use self::core::{DecodedCore, SectionCore};
pub use comment::Comment;
pub use group::Group;
pub use hist::{HistData, HistHdr};
pub use ind_var::{IndVar, IndVarArray};
pub use run_desc::{RunDesc, TiRunDesc};
pub use scaler::Scaler;

use constants::*;

/// Registered section kinds; the dispatch key derived from a `sec_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Group,
    RunDesc,
    TiRunDesc,
    HistHdr,
    HistData,
    Scaler,
    IndVar,
    IndVarArr,
    Comment,
    Eof,
    Unknown,
}

/// Resolve a section ID against the catalogue.
pub fn kind_of(sec_id: u32) -> SectionKind {
    match sec_id {
        SEC_GRP_ID => SectionKind::Group,
        SEC_GEN_RUN_DESC_ID => SectionKind::RunDesc,
        SEC_TRI_TI_RUN_DESC_ID => SectionKind::TiRunDesc,
        SEC_GEN_HIST_HDR_ID | SEC_TRI_TD_HIST_ID | SEC_TRI_TI_HIST_ID => SectionKind::HistHdr,
        SEC_GEN_HIST_DAT_ID => SectionKind::HistData,
        SEC_GEN_SCALER_ID | SEC_TRI_TD_SCALER_ID => SectionKind::Scaler,
        SEC_GEN_IND_VAR_ID => SectionKind::IndVar,
        SEC_GEN_IND_VAR_ARR_ID => SectionKind::IndVarArr,
        SEC_CMT_ID => SectionKind::Comment,
        SEC_EOF_ID => SectionKind::Eof,
        _ => SectionKind::Unknown,
    }
}

/// Type-specific payload of a section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionPayload {
    Group(Group),
    RunDesc(RunDesc),
    TiRunDesc(TiRunDesc),
    HistHdr(HistHdr),
    HistData(HistData),
    Scaler(Scaler),
    IndVar(IndVar),
    Comment(Comment),
    Eof,
    /// Unregistered section ID, preserved verbatim.
    Opaque(Vec<u8>),
}

/// One record of the file tree: identity plus payload.
///
/// A section exclusively owns its payload; a group payload exclusively owns
/// its members, so dropping the root releases the whole tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub sec_id: u32,
    pub instance_id: u32,
    pub payload: SectionPayload,
}

impl Section {
    /// Factory: allocate a zero-initialized payload of the registered shape.
    pub fn new(sec_id: u32, instance_id: u32) -> Self {
        let payload = match kind_of(sec_id) {
            SectionKind::Group => SectionPayload::Group(Group::default()),
            SectionKind::RunDesc => SectionPayload::RunDesc(RunDesc::default()),
            SectionKind::TiRunDesc => SectionPayload::TiRunDesc(TiRunDesc::default()),
            SectionKind::HistHdr => SectionPayload::HistHdr(HistHdr::default()),
            SectionKind::HistData => SectionPayload::HistData(HistData::default()),
            SectionKind::Scaler => SectionPayload::Scaler(Scaler::default()),
            SectionKind::IndVar => SectionPayload::IndVar(IndVar::default()),
            SectionKind::IndVarArr => SectionPayload::IndVar(IndVar {
                array: Some(IndVarArray::default()),
                ..Default::default()
            }),
            SectionKind::Comment => SectionPayload::Comment(Comment::default()),
            SectionKind::Eof => SectionPayload::Eof,
            SectionKind::Unknown => SectionPayload::Opaque(Vec::new()),
        };
        Self {
            sec_id,
            instance_id,
            payload,
        }
    }

    /// Shorthand for an empty group of the given kind.
    pub fn new_group(group_kind: u32) -> Self {
        Self::new(SEC_GRP_ID, group_kind)
    }

    pub fn is_group(&self) -> bool {
        matches!(self.payload, SectionPayload::Group(_))
    }

    /// Direct members, when this section is a group.
    pub fn members(&self) -> Option<&[Section]> {
        match &self.payload {
            SectionPayload::Group(g) => Some(&g.members),
            _ => None,
        }
    }

    pub fn members_mut(&mut self) -> Option<&mut Vec<Section>> {
        match &mut self.payload {
            SectionPayload::Group(g) => Some(&mut g.members),
            _ => None,
        }
    }

    /// Payload byte count if encoded now (the `size` op).
    pub fn size(&self) -> u32 {
        match &self.payload {
            SectionPayload::Group(g) => g.wire_size(),
            SectionPayload::RunDesc(d) => d.wire_size(),
            SectionPayload::TiRunDesc(d) => d.wire_size(),
            SectionPayload::HistHdr(h) => h.wire_size(),
            SectionPayload::HistData(d) => d.wire_size(),
            SectionPayload::Scaler(s) => s.wire_size(),
            SectionPayload::IndVar(v) => v.wire_size(),
            SectionPayload::Comment(c) => c.wire_size(),
            SectionPayload::Eof => 0,
            SectionPayload::Opaque(bytes) => bytes.len() as u32,
        }
    }

    /// Serialized record length: core plus payload.
    pub fn record_len(&self) -> u32 {
        CORE_WIRE_LEN + self.size()
    }

    /// Decode a payload of `core.size` bytes at the current read position.
    ///
    /// On return the cursor sits at the end of the payload. Producers may
    /// append fields this catalogue predates; the spare bytes are skipped.
    /// A payload that decodes past its declared size is corrupt.
    pub fn decode_payload(buf: &mut DataBuf, core: &SectionCore) -> Result<SectionPayload> {
        let start = buf.position();
        let end = start + core.size as usize;
        if end > buf.len() {
            return Err(MudError::corrupt(
                core.sec_id,
                start,
                format!(
                    "declared payload size {} overruns the enclosing scope",
                    core.size
                ),
            ));
        }

        let payload = match kind_of(core.sec_id) {
            SectionKind::Group => SectionPayload::Group(Group::decode(buf, core)?),
            SectionKind::RunDesc => SectionPayload::RunDesc(RunDesc::decode(buf)?),
            SectionKind::TiRunDesc => SectionPayload::TiRunDesc(TiRunDesc::decode(buf)?),
            SectionKind::HistHdr => SectionPayload::HistHdr(HistHdr::decode(buf, core.size)?),
            SectionKind::HistData => SectionPayload::HistData(HistData::decode(buf, core.size)?),
            SectionKind::Scaler => SectionPayload::Scaler(Scaler::decode(buf)?),
            SectionKind::IndVar => SectionPayload::IndVar(IndVar::decode_plain(buf)?),
            SectionKind::IndVarArr => SectionPayload::IndVar(IndVar::decode_with_array(buf)?),
            SectionKind::Comment => SectionPayload::Comment(Comment::decode(buf)?),
            SectionKind::Eof => SectionPayload::Eof,
            SectionKind::Unknown => {
                tracing::warn!(
                    sec_id = core.sec_id,
                    size = core.size,
                    "unknown section ID, preserving payload verbatim"
                );
                SectionPayload::Opaque(buf.read_raw(core.size as usize)?)
            }
        };

        let pos = buf.position();
        if pos > end {
            return Err(MudError::corrupt(
                core.sec_id,
                start,
                format!("payload decoded {} bytes past its declared size", pos - end),
            ));
        }
        if pos < end {
            buf.seek(end)?;
        }
        Ok(payload)
    }

    /// Emit the payload bytes (the `encode` op).
    pub fn encode_payload(&self, buf: &mut DataBuf) -> Result<()> {
        match &self.payload {
            SectionPayload::Group(g) => g.encode(buf),
            SectionPayload::RunDesc(d) => d.encode(buf),
            SectionPayload::TiRunDesc(d) => d.encode(buf),
            SectionPayload::HistHdr(h) => h.encode(buf),
            SectionPayload::HistData(d) => {
                d.encode(buf);
                Ok(())
            }
            SectionPayload::Scaler(s) => s.encode(buf),
            SectionPayload::IndVar(v) => v.encode(buf),
            SectionPayload::Comment(c) => c.encode(buf),
            SectionPayload::Eof => Ok(()),
            SectionPayload::Opaque(bytes) => {
                buf.write_raw(bytes);
                Ok(())
            }
        }
    }

    /// Emit a full record: sized core, then payload.
    ///
    /// `next_offset` points at the following sibling, or 0 when this is the
    /// last member of its scope.
    pub fn encode_record(&self, buf: &mut DataBuf, is_last: bool) -> Result<()> {
        let size = self.size();
        let core = SectionCore {
            next_offset: if is_last { 0 } else { CORE_WIRE_LEN + size },
            size,
            sec_id: self.sec_id,
            instance_id: self.instance_id,
        };
        core.encode(buf);
        let payload_start = buf.len();
        self.encode_payload(buf)?;
        debug_assert_eq!(buf.len() - payload_start, size as usize);
        Ok(())
    }

    fn kind_name(&self) -> &'static str {
        match kind_of(self.sec_id) {
            SectionKind::Group => "group",
            SectionKind::RunDesc => "run description",
            SectionKind::TiRunDesc => "TI run description",
            SectionKind::HistHdr => "histogram header",
            SectionKind::HistData => "histogram data",
            SectionKind::Scaler => "scaler",
            SectionKind::IndVar => "independent variable",
            SectionKind::IndVarArr => "independent variable array",
            SectionKind::Comment => "comment",
            SectionKind::Eof => "eof",
            SectionKind::Unknown => "unknown",
        }
    }

    fn show(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(
            f,
            "{:indent$}{} sec_id={:#010x} instance={} size={}",
            "",
            self.kind_name(),
            self.sec_id,
            self.instance_id,
            self.size(),
            indent = depth * 2
        )?;
        if let Some(members) = self.members() {
            for member in members {
                member.show(f, depth + 1)?;
            }
        }
        Ok(())
    }
}

/// The `show` op: an indented dump of the section and its members.
impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.show(f, 0)
    }
}
