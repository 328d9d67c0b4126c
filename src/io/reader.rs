// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Whole-file reader.
//!
//! A MUD file is one outer group record. Reading maps the file, validates
//! the outer core (`sec_id` must be the group ID, `instance_id` a known
//! file-format ID), slurps the declared payload and dispatches to the group
//! decoder. The entire tree lives in memory afterwards; nothing holds the
//! file open.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::core::{DataBuf, MudError, Result};
use crate::section::constants::{is_file_format, CORE_WIRE_LEN, SEC_GRP_ID};
use crate::section::{Section, SectionCore};

/// Read a MUD file into its section tree, returning the root group.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Section> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        MudError::io(
            "read_file",
            format!("failed to open {}: {e}", path.display()),
        )
    })?;
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| {
        MudError::io(
            "read_file",
            format!("failed to map {}: {e}", path.display()),
        )
    })?;
    read_bytes(&mmap)
}

/// Decode a MUD stream already in memory.
pub fn read_bytes(bytes: &[u8]) -> Result<Section> {
    if bytes.len() < CORE_WIRE_LEN as usize {
        return Err(MudError::invalid_file(
            "read_bytes",
            format!(
                "stream of {} bytes is shorter than the outer core",
                bytes.len()
            ),
        ));
    }

    let mut buf = DataBuf::from_vec(bytes.to_vec());
    let dc = SectionCore::decode(&mut buf)?;
    if dc.core.sec_id != SEC_GRP_ID || !is_file_format(dc.core.instance_id) {
        return Err(MudError::invalid_file(
            "read_bytes",
            format!(
                "outer record sec_id={:#010x} instance={:#010x} is not a known file format",
                dc.core.sec_id, dc.core.instance_id
            ),
        ));
    }

    let total = CORE_WIRE_LEN as usize + dc.core.size as usize;
    if total > bytes.len() {
        return Err(MudError::invalid_file(
            "read_bytes",
            format!(
                "outer record declares {total} bytes but the stream holds {}",
                bytes.len()
            ),
        ));
    }
    if total < bytes.len() {
        // Some producers append marker records after the outer group.
        tracing::warn!(
            trailing = bytes.len() - total,
            "ignoring bytes after the outer group payload"
        );
    }

    let payload = Section::decode_payload(&mut buf, &dc.core)?;
    Ok(Section {
        sec_id: dc.core.sec_id,
        instance_id: dc.core.instance_id,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataBuf;
    use crate::section::constants::*;

    fn encoded_empty_file(fmt: u32) -> Vec<u8> {
        let root = Section::new_group(fmt);
        let mut buf = DataBuf::new();
        root.encode_record(&mut buf, true).unwrap();
        buf.into_vec()
    }

    #[test]
    fn test_read_empty_file() {
        let bytes = encoded_empty_file(FMT_TRI_TD_ID);
        let root = read_bytes(&bytes).unwrap();
        assert_eq!(root.sec_id, SEC_GRP_ID);
        assert_eq!(root.instance_id, FMT_TRI_TD_ID);
        assert_eq!(root.members().unwrap().len(), 0);
    }

    #[test]
    fn test_short_stream_is_invalid_file() {
        let err = read_bytes(&[0u8; 10]).unwrap_err();
        assert!(matches!(err, MudError::InvalidFile { .. }));
    }

    #[test]
    fn test_unknown_format_is_invalid_file() {
        let bytes = encoded_empty_file(0x4242_0000);
        let err = read_bytes(&bytes).unwrap_err();
        assert!(matches!(err, MudError::InvalidFile { .. }));
    }

    #[test]
    fn test_non_group_outer_record_is_invalid_file() {
        let sec = Section::new(SEC_GEN_RUN_DESC_ID, 1);
        let mut buf = DataBuf::new();
        sec.encode_record(&mut buf, true).unwrap();
        let err = read_bytes(buf.as_slice()).unwrap_err();
        assert!(matches!(err, MudError::InvalidFile { .. }));
    }

    #[test]
    fn test_truncated_payload_is_invalid_file() {
        let mut bytes = encoded_empty_file(FMT_GEN_ID);
        bytes.truncate(bytes.len() - 1);
        let err = read_bytes(&bytes).unwrap_err();
        assert!(matches!(err, MudError::InvalidFile { .. }));
    }
}
