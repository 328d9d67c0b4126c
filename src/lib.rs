// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # mudcodec
//!
//! Reader/writer for the MUD (Muon Data) self-describing binary container
//! format used for time-differential and time-integral µSR run data.
//!
//! A MUD file is one outer group record holding a tree of typed sections.
//! This library is organized in layers:
//! - **Wire primitives** in [`core`] — buffer, integers, strings, times
//! - **Section model** in [`section`] — the typed record catalogue and the
//!   `sec_id → codec` dispatch
//! - **Tree operations** in [`tree`] — membership, lookup, path search
//! - **File driver** in [`io`] — whole-file read and multi-pass write
//! - **Friendly API** in [`friendly`] — flat field accessors over a handle
//!
//! ## Example: reading headline fields
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use mudcodec::MudFile;
//!
//! let mf = MudFile::open_read("006663.msr")?;
//! if let (Some(run), Some(title)) = (mf.get_run_number(), mf.get_title()) {
//!     println!("run {run}: {title}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: walking the tree directly
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use mudcodec::section::constants::*;
//! use mudcodec::{search, MudFile};
//!
//! let mf = MudFile::open_read("006663.msr")?;
//! let third_hist = search(
//!     mf.root(),
//!     &[
//!         (SEC_GRP_ID, FMT_TRI_TD_ID),
//!         (SEC_GRP_ID, GRP_TRI_TD_HIST_ID),
//!         (SEC_GEN_HIST_HDR_ID, 3),
//!     ],
//! );
//! # let _ = third_hist;
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{DataBuf, MudError, Result};

// Section model and codecs
pub mod section;

pub use section::{Section, SectionKind, SectionPayload};

// Tree operations
pub mod tree;

pub use tree::{add_to_group, find_child, remove_from_group, search};

// File driver
pub mod io;

pub use io::{read_bytes, read_file, write_bytes, write_file};

// Friendly API
pub mod friendly;

pub use friendly::{MudFile, OpenMode};
