// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Tree operations over section groups.
//!
//! Members of a group form an ordered list; insertion order is what gets
//! serialized. Lookup matches a `(sec_id, instance_id)` pair, where an
//! `instance_id` of 0 is the wildcard used by [`search`] to descend into a
//! group without selecting a specific instance. Well-formed producers
//! number repeated sections 1..n, so the `instance_id` field doubles as a
//! 1-based selector.
//!
//! There is no explicit free operation: a group owns its members, so
//! dropping a detached section (or a whole root) releases the subtree.

use crate::core::{MudError, Result};
use crate::section::Section;

fn matches(section: &Section, sec_id: u32, instance_id: u32) -> bool {
    section.sec_id == sec_id && (instance_id == 0 || section.instance_id == instance_id)
}

/// Append `child` at the end of `parent`'s members.
///
/// The parent takes ownership. Fails when `parent` is not a group.
pub fn add_to_group(parent: &mut Section, child: Section) -> Result<()> {
    match parent.members_mut() {
        Some(members) => {
            members.push(child);
            Ok(())
        }
        None => Err(MudError::invalid_input(
            "parent",
            format!("section {:#010x} is not a group", parent.sec_id),
        )),
    }
}

/// Detach the first member matching `(sec_id, instance_id)`.
///
/// The caller takes ownership of the returned section.
pub fn remove_from_group(parent: &mut Section, sec_id: u32, instance_id: u32) -> Option<Section> {
    let members = parent.members_mut()?;
    let at = members.iter().position(|m| matches(m, sec_id, instance_id))?;
    Some(members.remove(at))
}

/// Find a direct child of `parent` by `(sec_id, instance_id)`.
///
/// Searches members in insertion order; `instance_id == 0` matches the
/// first member with the right `sec_id`.
pub fn find_child(parent: &Section, sec_id: u32, instance_id: u32) -> Option<&Section> {
    parent
        .members()?
        .iter()
        .find(|m| matches(m, sec_id, instance_id))
}

/// Mutable variant of [`find_child`].
pub fn find_child_mut(parent: &mut Section, sec_id: u32, instance_id: u32) -> Option<&mut Section> {
    parent
        .members_mut()?
        .iter_mut()
        .find(|m| matches(m, sec_id, instance_id))
}

/// Chained [`find_child`] across depths.
///
/// The first path step is matched against `root` itself; each further step
/// selects among the current section's direct members. An empty path yields
/// `root`.
pub fn search<'a>(root: &'a Section, path: &[(u32, u32)]) -> Option<&'a Section> {
    let mut steps = path.iter();
    if let Some(&(sec_id, instance_id)) = steps.next() {
        if !matches(root, sec_id, instance_id) {
            return None;
        }
    }
    let mut current = root;
    for &(sec_id, instance_id) in steps {
        current = find_child(current, sec_id, instance_id)?;
    }
    Some(current)
}

/// Mutable variant of [`search`].
pub fn search_mut<'a>(root: &'a mut Section, path: &[(u32, u32)]) -> Option<&'a mut Section> {
    let mut steps = path.iter();
    if let Some(&(sec_id, instance_id)) = steps.next() {
        if !matches(root, sec_id, instance_id) {
            return None;
        }
    }
    let mut current = root;
    for &(sec_id, instance_id) in steps {
        current = find_child_mut(current, sec_id, instance_id)?;
    }
    Some(current)
}
