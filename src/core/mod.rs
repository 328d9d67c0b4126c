// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout mudcodec.
//!
//! This module provides the foundational types for the library:
//! - [`MudError`] - Comprehensive error handling
//! - [`DataBuf`] - Expandable byte buffer with the wire primitive codec

pub mod buffer;
pub mod error;

pub use buffer::{str_wire_len, DataBuf};
pub use error::{MudError, Result};
