// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Group payload: an ordered list of member sections.
//!
//! On the wire a group is `num_members: u32` followed by each member's
//! record (core plus payload). Members are chained by their cores'
//! `next_offset` fields; the last member's is 0. Decoding honors
//! `next_offset` when seeking to the next sibling and rejects offsets that
//! leave the group's payload.

use crate::core::{DataBuf, MudError, Result};

use super::constants::CORE_WIRE_LEN;
use super::{Section, SectionCore};

/// Member list of a group section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    pub members: Vec<Section>,
}

impl Group {
    /// Decode group members from a payload of `core.size` bytes.
    pub fn decode(buf: &mut DataBuf, core: &SectionCore) -> Result<Self> {
        let payload_start = buf.position();
        let payload_end = payload_start + core.size as usize;
        let num_members = buf.read_u32()?;

        // Member count is producer-controlled; grow as records decode
        // rather than trusting it for allocation.
        let mut members = Vec::new();
        for n in 0..num_members {
            let dc = SectionCore::decode(buf)?;
            if buf.position() + dc.core.size as usize > payload_end {
                return Err(MudError::corrupt(
                    dc.core.sec_id,
                    dc.record_start,
                    format!(
                        "member {} payload size {} overruns the group",
                        n + 1,
                        dc.core.size
                    ),
                ));
            }
            let next = dc.record_start + dc.core.next_offset as usize;
            if dc.core.next_offset != 0 && next > payload_end {
                return Err(MudError::corrupt(
                    dc.core.sec_id,
                    dc.record_start,
                    format!(
                        "member {} next_offset {} overruns the group",
                        n + 1,
                        dc.core.next_offset
                    ),
                ));
            }

            let payload = Section::decode_payload(buf, &dc.core)?;
            members.push(Section {
                sec_id: dc.core.sec_id,
                instance_id: dc.core.instance_id,
                payload,
            });

            // Legacy readers seek by next_offset; honor it here too so a
            // record padded past its payload still chains correctly.
            if dc.core.next_offset != 0 {
                buf.seek(next)?;
            }
        }
        Ok(Self { members })
    }

    /// Emit `num_members` then each member record in insertion order.
    pub fn encode(&self, buf: &mut DataBuf) -> Result<()> {
        buf.write_u32(self.members.len() as u32);
        let last = self.members.len().saturating_sub(1);
        for (i, member) in self.members.iter().enumerate() {
            member.encode_record(buf, i == last)?;
        }
        Ok(())
    }

    /// `4 + Σ (core + member payload)` — the group sizing identity.
    pub fn wire_size(&self) -> u32 {
        4 + self
            .members
            .iter()
            .map(|m| CORE_WIRE_LEN + m.size())
            .sum::<u32>()
    }
}
