// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for mudcodec.
//!
//! Provides error types for MUD container operations:
//! - File-level validation (outer record)
//! - Section decoding and encoding
//! - Buffer primitives
//! - Friendly-API lookups and inputs

use std::fmt;

/// Errors that can occur while reading or writing a MUD file.
#[derive(Debug, Clone)]
pub enum MudError {
    /// The stream is not a MUD file: too short for the outer core, or the
    /// outer record does not carry a known file-format ID.
    InvalidFile {
        /// What was being validated
        context: String,
        /// Why validation failed
        reason: String,
    },

    /// A section's framing is inconsistent with its enclosing scope.
    CorruptSection {
        /// Section ID of the offending record
        sec_id: u32,
        /// Byte offset of the record within the enclosing payload
        offset: usize,
        /// What was wrong
        reason: String,
    },

    /// Buffer too short for requested read
    BufferTooShort {
        /// Requested bytes
        requested: usize,
        /// Available bytes
        available: usize,
        /// Cursor position when error occurred
        position: usize,
    },

    /// A friendly accessor addressed a section absent from the tree.
    NotFound {
        /// What was looked up
        item: String,
    },

    /// A friendly setter received a value that violates a type constraint.
    InvalidInput {
        /// Parameter that was rejected
        param: String,
        /// Why it was rejected
        reason: String,
    },

    /// Underlying read/write or open failed.
    Io {
        /// Operation that failed
        context: String,
        /// Error message
        message: String,
    },
}

impl MudError {
    /// Create an invalid-file error.
    pub fn invalid_file(context: impl Into<String>, reason: impl Into<String>) -> Self {
        MudError::InvalidFile {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Create a corrupt-section error.
    pub fn corrupt(sec_id: u32, offset: usize, reason: impl Into<String>) -> Self {
        MudError::CorruptSection {
            sec_id,
            offset,
            reason: reason.into(),
        }
    }

    /// Create a buffer-too-short error.
    pub fn buffer_too_short(requested: usize, available: usize, position: usize) -> Self {
        MudError::BufferTooShort {
            requested,
            available,
            position,
        }
    }

    /// Create a not-found error.
    pub fn not_found(item: impl Into<String>) -> Self {
        MudError::NotFound { item: item.into() }
    }

    /// Create an invalid-input error.
    pub fn invalid_input(param: impl Into<String>, reason: impl Into<String>) -> Self {
        MudError::InvalidInput {
            param: param.into(),
            reason: reason.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, message: impl Into<String>) -> Self {
        MudError::Io {
            context: context.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for MudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MudError::InvalidFile { context, reason } => {
                write!(f, "Invalid MUD file ({context}): {reason}")
            }
            MudError::CorruptSection {
                sec_id,
                offset,
                reason,
            } => write!(
                f,
                "Corrupt section {sec_id:#010x} at offset {offset}: {reason}"
            ),
            MudError::BufferTooShort {
                requested,
                available,
                position,
            } => write!(
                f,
                "Buffer too short: requested {requested} bytes at position {position}, but only {available} bytes available"
            ),
            MudError::NotFound { item } => write!(f, "Not found: {item}"),
            MudError::InvalidInput { param, reason } => {
                write!(f, "Invalid input for '{param}': {reason}")
            }
            MudError::Io { context, message } => write!(f, "I/O error in {context}: {message}"),
        }
    }
}

impl std::error::Error for MudError {}

impl From<std::io::Error> for MudError {
    fn from(err: std::io::Error) -> Self {
        MudError::Io {
            context: "io".to_string(),
            message: err.to_string(),
        }
    }
}

/// Result type for mudcodec operations.
pub type Result<T> = std::result::Result<T, MudError>;
