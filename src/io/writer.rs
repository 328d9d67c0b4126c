// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Whole-file writer.
//!
//! `next_offset` sits at the front of every core, so a record cannot be
//! emitted until the sizes of everything inside it are known. Flushing a
//! tree therefore runs in passes:
//!
//! 1. sizing — measure every section bottom-up (a group is
//!    `4 + Σ (24 + member size)`),
//! 2. offsets — each non-final member's `next_offset` becomes
//!    `24 + size`, the final member's 0,
//! 3. emit — write cores and payloads depth-first.
//!
//! The passes are fused per record: by the time a core is written, the
//! sizing recursion below it has already run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::{DataBuf, MudError, Result};
use crate::section::Section;

/// Serialize a section tree to bytes.
///
/// The root is the sole record of the file scope, so its `next_offset` is 0.
pub fn write_bytes(root: &Section) -> Result<Vec<u8>> {
    let total = root.record_len() as usize;
    let mut buf = DataBuf::with_capacity(total);
    root.encode_record(&mut buf, true)?;
    debug_assert_eq!(buf.len(), total);
    Ok(buf.into_vec())
}

/// Serialize a section tree and replace the file at `path` with it.
pub fn write_file<P: AsRef<Path>>(path: P, root: &Section) -> Result<()> {
    let path = path.as_ref();
    let bytes = write_bytes(root)?;

    let file = File::create(path).map_err(|e| {
        MudError::io(
            "write_file",
            format!("failed to create {}: {e}", path.display()),
        )
    })?;
    let mut out = BufWriter::new(file);
    out.write_all(&bytes).map_err(|e| {
        MudError::io(
            "write_file",
            format!("failed to write {}: {e}", path.display()),
        )
    })?;
    out.flush().map_err(|e| {
        MudError::io(
            "write_file",
            format!("failed to flush {}: {e}", path.display()),
        )
    })?;

    tracing::debug!(
        path = %path.display(),
        bytes = bytes.len(),
        "wrote MUD file"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::reader::read_bytes;
    use crate::section::constants::*;
    use crate::section::{Section, SectionPayload};
    use crate::tree::add_to_group;

    fn small_tree() -> Section {
        let mut root = Section::new_group(FMT_TRI_TD_ID);
        let mut desc = Section::new(SEC_GEN_RUN_DESC_ID, 1);
        if let SectionPayload::RunDesc(d) = &mut desc.payload {
            d.run_number = 6663;
            d.title = "Sample calibration".to_string();
        }
        add_to_group(&mut root, desc).unwrap();
        root
    }

    #[test]
    fn test_write_bytes_matches_record_len() {
        let root = small_tree();
        let bytes = write_bytes(&root).unwrap();
        assert_eq!(bytes.len() as u32, root.record_len());
    }

    #[test]
    fn test_write_then_read_back() {
        let root = small_tree();
        let bytes = write_bytes(&root).unwrap();
        let reread = read_bytes(&bytes).unwrap();
        assert_eq!(reread, root);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let root = small_tree();
        assert_eq!(write_bytes(&root).unwrap(), write_bytes(&root).unwrap());
    }
}
