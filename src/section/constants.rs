// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MUD section identifiers.
//!
//! This module contains the section ID catalogue of the MUD container
//! format. A section ID selects the codec for a record; a group's
//! `instance_id` selects the group kind.
//!
//! Using a single source of truth for these constants prevents bugs from
//! ID mismatches between reader and writer implementations.

/// Serialized length of a section core.
///
/// Six `u32` slots: `next_offset`, `size`, `sec_id`, `instance_id`, and two
/// struct-dump residue slots (`size_of`, `proc_ref`) that the legacy
/// producers wrote but never read back.
pub const CORE_WIRE_LEN: u32 = 24;

// File-format IDs. The outer group's `instance_id` carries one of these.

/// Format family marker shared by the structural section IDs.
pub const FMT_ALL_ID: u32 = 0x1700_0000;
/// Generic µSR data file.
pub const FMT_GEN_ID: u32 = 0x1100_0000;
/// TRIUMF time-differential µSR data file.
pub const FMT_TRI_TD_ID: u32 = 0x1200_0000;
/// TRIUMF time-integral µSR data file.
pub const FMT_TRI_TI_ID: u32 = 0x1300_0000;

// Structural section IDs.

/// Group section: `num_members` then member records.
pub const SEC_GRP_ID: u32 = FMT_ALL_ID | 0x0004;
/// End-of-file marker section (catalogued; never emitted by this writer).
pub const SEC_EOF_ID: u32 = FMT_ALL_ID | 0x0010;
/// Comment section.
pub const SEC_CMT_ID: u32 = FMT_ALL_ID | 0x0020;

// Generic-format section IDs.

/// Run description.
pub const SEC_GEN_RUN_DESC_ID: u32 = FMT_GEN_ID | 0x0001;
/// Histogram header.
pub const SEC_GEN_HIST_HDR_ID: u32 = FMT_GEN_ID | 0x0002;
/// Histogram data (fixed-width or packed bins).
pub const SEC_GEN_HIST_DAT_ID: u32 = FMT_GEN_ID | 0x0003;
/// Scaler.
pub const SEC_GEN_SCALER_ID: u32 = FMT_GEN_ID | 0x0004;
/// Independent variable.
pub const SEC_GEN_IND_VAR_ID: u32 = FMT_GEN_ID | 0x0005;
/// Independent variable with sampled-array history.
pub const SEC_GEN_IND_VAR_ARR_ID: u32 = FMT_GEN_ID | 0x0007;

// TRIUMF time-differential section IDs.

/// TD histogram header (same payload as [`SEC_GEN_HIST_HDR_ID`]).
pub const SEC_TRI_TD_HIST_ID: u32 = FMT_TRI_TD_ID | 0x0002;
/// TD scaler (same payload as [`SEC_GEN_SCALER_ID`]).
pub const SEC_TRI_TD_SCALER_ID: u32 = FMT_TRI_TD_ID | 0x0004;

// TRIUMF time-integral section IDs.

/// TI run description (subtitle and comment strings instead of
/// temperature/field).
pub const SEC_TRI_TI_RUN_DESC_ID: u32 = FMT_TRI_TI_ID | 0x0001;
/// TI histogram header (same payload as [`SEC_GEN_HIST_HDR_ID`]).
pub const SEC_TRI_TI_HIST_ID: u32 = FMT_TRI_TI_ID | 0x0002;

// Group kinds: the `instance_id` of a group section.

pub const GRP_GEN_HIST_ID: u32 = SEC_GEN_HIST_HDR_ID;
pub const GRP_GEN_SCALER_ID: u32 = SEC_GEN_SCALER_ID;
pub const GRP_GEN_IND_VAR_ID: u32 = SEC_GEN_IND_VAR_ID;
pub const GRP_GEN_IND_VAR_ARR_ID: u32 = SEC_GEN_IND_VAR_ID | 0x8000;
pub const GRP_TRI_TD_HIST_ID: u32 = SEC_TRI_TD_HIST_ID;
pub const GRP_TRI_TD_SCALER_ID: u32 = SEC_TRI_TD_SCALER_ID;
pub const GRP_TRI_TI_HIST_ID: u32 = SEC_TRI_TI_HIST_ID;
pub const GRP_CMT_ID: u32 = SEC_CMT_ID;

/// Whether `fmt_id` is one of the known file-format IDs.
pub fn is_file_format(fmt_id: u32) -> bool {
    matches!(fmt_id, FMT_GEN_ID | FMT_TRI_TD_ID | FMT_TRI_TI_ID)
}
