// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Comment payload.
//!
//! Comments form reply chains through `prev_reply_id` / `next_reply_id`,
//! which reference other comments' `id` fields (0 = none).

use crate::core::{str_wire_len, DataBuf, Result};

/// Comment section (`SEC_CMT_ID`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    pub id: u32,
    pub prev_reply_id: u32,
    pub next_reply_id: u32,
    /// When the comment was written, seconds since epoch.
    pub time: u32,
    pub author: String,
    pub title: String,
    pub body: String,
}

impl Comment {
    pub fn decode(buf: &mut DataBuf) -> Result<Self> {
        Ok(Self {
            id: buf.read_u32()?,
            prev_reply_id: buf.read_u32()?,
            next_reply_id: buf.read_u32()?,
            time: buf.read_time()?,
            author: buf.read_str()?,
            title: buf.read_str()?,
            body: buf.read_str()?,
        })
    }

    pub fn encode(&self, buf: &mut DataBuf) -> Result<()> {
        buf.write_u32(self.id);
        buf.write_u32(self.prev_reply_id);
        buf.write_u32(self.next_reply_id);
        buf.write_time(self.time);
        buf.write_str(&self.author)?;
        buf.write_str(&self.title)?;
        buf.write_str(&self.body)
    }

    pub fn wire_size(&self) -> u32 {
        4 * 4
            + str_wire_len(&self.author)
            + str_wire_len(&self.title)
            + str_wire_len(&self.body)
    }
}
