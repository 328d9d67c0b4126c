// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Integer-handle compatibility shim.
//!
//! Rust callers should hold a [`MudFile`] directly. Tooling ported from the
//! small-integer handle convention can use this process-wide table instead:
//! opening allocates the lowest free slot, `-1` signals failure, and close
//! operations return 1 on success and 0 on failure. A failed `close_write`
//! leaves the tree in the table so the caller can still `close_read` it.
//!
//! The table is mutex-guarded; handles are independent, so callers on
//! different handles never observe each other.

use std::sync::{Mutex, MutexGuard};

use super::file::MudFile;

/// Reserved failure value for open operations.
pub const BAD_HANDLE: i32 = -1;

static TABLE: Mutex<Vec<Option<MudFile>>> = Mutex::new(Vec::new());

fn table() -> MutexGuard<'static, Vec<Option<MudFile>>> {
    match TABLE.lock() {
        Ok(guard) => guard,
        // A panic mid-operation cannot leave a slot half-written; the
        // table stays usable.
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn alloc(file: MudFile) -> i32 {
    let mut slots = table();
    if let Some(free) = slots.iter().position(Option::is_none) {
        slots[free] = Some(file);
        free as i32
    } else {
        slots.push(Some(file));
        (slots.len() - 1) as i32
    }
}

fn take(fh: i32) -> Option<MudFile> {
    let mut slots = table();
    slots.get_mut(usize::try_from(fh).ok()?)?.take()
}

fn put_back(fh: i32, file: MudFile) {
    let mut slots = table();
    if let Some(slot) = slots.get_mut(fh as usize) {
        *slot = Some(file);
    }
}

/// Open a file for reading. Returns `(handle, format_id)`, or
/// `(BAD_HANDLE, 0)` on failure.
pub fn open_read(path: &str) -> (i32, u32) {
    match MudFile::open_read(path) {
        Ok(file) => {
            let fmt = file.format_id();
            (alloc(file), fmt)
        }
        Err(err) => {
            tracing::warn!(path, %err, "open_read failed");
            (BAD_HANDLE, 0)
        }
    }
}

/// Open a fresh file for writing. Returns a handle or `BAD_HANDLE`.
pub fn open_write(path: &str, fmt_id: u32) -> i32 {
    match MudFile::open_write(path, fmt_id) {
        Ok(file) => alloc(file),
        Err(err) => {
            tracing::warn!(path, %err, "open_write failed");
            BAD_HANDLE
        }
    }
}

/// Open a file for update. Returns `(handle, format_id)` or
/// `(BAD_HANDLE, 0)`.
pub fn open_read_write(path: &str) -> (i32, u32) {
    match MudFile::open_read_write(path) {
        Ok(file) => {
            let fmt = file.format_id();
            (alloc(file), fmt)
        }
        Err(err) => {
            tracing::warn!(path, %err, "open_read_write failed");
            (BAD_HANDLE, 0)
        }
    }
}

/// Discard the tree without writing. 1 on success, 0 for a dead handle.
pub fn close_read(fh: i32) -> i32 {
    match take(fh) {
        Some(_) => 1,
        None => 0,
    }
}

/// Write the tree back to its own path and free the handle.
///
/// 0 on failure, with the tree left in the table.
pub fn close_write(fh: i32) -> i32 {
    let Some(file) = take(fh) else { return 0 };
    match file.write_back() {
        Ok(()) => 1,
        Err(err) => {
            tracing::warn!(%err, "close_write failed");
            put_back(fh, file);
            0
        }
    }
}

/// Write the tree to a different path and free the handle.
///
/// 0 on failure, with the tree left in the table.
pub fn close_write_file(fh: i32, path: &str) -> i32 {
    let Some(file) = take(fh) else { return 0 };
    match file.write_as(path) {
        Ok(()) => 1,
        Err(err) => {
            tracing::warn!(path, %err, "close_write_file failed");
            put_back(fh, file);
            0
        }
    }
}

/// Run `f` against an open handle's file.
pub fn with_file<R>(fh: i32, f: impl FnOnce(&MudFile) -> R) -> Option<R> {
    let slots = table();
    let file = slots.get(usize::try_from(fh).ok()?)?.as_ref()?;
    Some(f(file))
}

/// Run `f` against an open handle's file, mutably.
pub fn with_file_mut<R>(fh: i32, f: impl FnOnce(&mut MudFile) -> R) -> Option<R> {
    let mut slots = table();
    let file = slots.get_mut(usize::try_from(fh).ok()?)?.as_mut()?;
    Some(f(file))
}

/// `MUD_getRunNumber` contract: copy into the out-parameter, return 1/0.
pub fn get_run_number(fh: i32, out: &mut u32) -> i32 {
    match with_file(fh, |f| f.get_run_number()).flatten() {
        Some(v) => {
            *out = v;
            1
        }
        None => 0,
    }
}

/// `MUD_getTitle` contract: truncate into the caller's buffer and
/// NUL-terminate. Returns 1/0.
pub fn get_title(fh: i32, out: &mut [u8]) -> i32 {
    if out.is_empty() {
        return 0;
    }
    let title = match with_file(fh, |f| f.get_title().map(str::to_owned)).flatten() {
        Some(t) => t,
        None => return 0,
    };
    let n = title.len().min(out.len() - 1);
    out[..n].copy_from_slice(&title.as_bytes()[..n]);
    out[n] = 0;
    1
}

/// `MUD_setTitle` contract: returns 1/0.
pub fn set_title(fh: i32, value: &str) -> i32 {
    match with_file_mut(fh, |f| f.set_title(value)) {
        Some(Ok(())) => 1,
        _ => 0,
    }
}
