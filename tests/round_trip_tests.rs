// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Round-trip integration tests.
//!
//! Tests cover:
//! - Structural equality through decode → encode → decode
//! - The group sizing and sibling offset identities on the wire
//! - Verbatim preservation of unknown section IDs
//! - Packed-histogram round trips

use mudcodec::section::constants::*;
use mudcodec::section::packing;
use mudcodec::section::{Section, SectionCore, SectionPayload};
use mudcodec::{add_to_group, read_bytes, write_bytes, DataBuf};

mod common;

// ============================================================================
// Tree builders
// ============================================================================

/// A tree touching every registered section type.
fn full_tree() -> Section {
    let mut root = Section::new_group(FMT_TRI_TD_ID);

    let mut desc = Section::new(SEC_GEN_RUN_DESC_ID, 1);
    if let SectionPayload::RunDesc(d) = &mut desc.payload {
        d.expt_number = 791;
        d.run_number = 6663;
        d.time_begin = 820_454_400;
        d.time_end = 820_458_000;
        d.elapsed_sec = 3600;
        d.title = "Sample calibration".to_string();
        d.lab = "TRIUMF".to_string();
        d.temperature = "2.5 K".to_string();
    }
    add_to_group(&mut root, desc).unwrap();

    let mut hists = Section::new_group(GRP_TRI_TD_HIST_ID);
    for i in 1..=2u32 {
        let packed = packing::pack(&[i, 0, 70_000, 255]);
        let mut hdr = Section::new(SEC_GEN_HIST_HDR_ID, i);
        if let SectionPayload::HistHdr(h) = &mut hdr.payload {
            h.hist_type = SEC_TRI_TD_HIST_ID;
            h.n_bins = 4;
            h.n_bytes = packed.len() as u32;
            h.bytes_per_bin = 0;
            h.fs_per_bin = 48_828_125;
            h.title = format!("Counter {i}");
            if i == 2 {
                // An interval fs_per_bin cannot express.
                h.seconds_per_bin = Some(4.8828125e-8 / 3.0);
            }
        }
        let mut dat = Section::new(SEC_GEN_HIST_DAT_ID, i);
        if let SectionPayload::HistData(d) = &mut dat.payload {
            d.data = packed;
        }
        add_to_group(&mut hists, hdr).unwrap();
        add_to_group(&mut hists, dat).unwrap();
    }
    add_to_group(&mut root, hists).unwrap();

    let mut scalers = Section::new_group(GRP_TRI_TD_SCALER_ID);
    let mut scaler = Section::new(SEC_GEN_SCALER_ID, 1);
    if let SectionPayload::Scaler(s) = &mut scaler.payload {
        s.counts = [1_000_000, 17];
        s.label = "CLOCK".to_string();
    }
    add_to_group(&mut scalers, scaler).unwrap();
    add_to_group(&mut root, scalers).unwrap();

    let mut vars = Section::new_group(GRP_GEN_IND_VAR_ARR_ID);
    let mut var = Section::new(SEC_GEN_IND_VAR_ARR_ID, 1);
    if let SectionPayload::IndVar(v) = &mut var.payload {
        v.mean = 2.5;
        v.name = "Temperature".to_string();
        v.units = "K".to_string();
        let arr = v.array.as_mut().unwrap();
        arr.num_data = 3;
        arr.elem_size = 2;
        arr.data_type = 1;
        arr.has_time = true;
        arr.data = vec![1, 0, 2, 0, 3, 0];
        arr.time_data = vec![100, 200, 300];
    }
    add_to_group(&mut vars, var).unwrap();
    add_to_group(&mut root, vars).unwrap();

    let mut cmts = Section::new_group(GRP_CMT_ID);
    let mut cmt = Section::new(SEC_CMT_ID, 1);
    if let SectionPayload::Comment(c) = &mut cmt.payload {
        c.id = 1;
        c.time = 820_454_500;
        c.author = "tw".to_string();
        c.body = "target changed at run start".to_string();
    }
    add_to_group(&mut cmts, cmt).unwrap();
    add_to_group(&mut root, cmts).unwrap();

    root
}

// ============================================================================
// Structural round trips
// ============================================================================

#[test]
fn test_decode_encode_decode_is_identity() {
    let tree = full_tree();
    let first = write_bytes(&tree).unwrap();

    let decoded = read_bytes(&first).unwrap();
    assert_eq!(decoded, tree);

    let second = write_bytes(&decoded).unwrap();
    assert_eq!(second, first);
    assert_eq!(read_bytes(&second).unwrap(), decoded);
}

#[test]
fn test_round_trip_preserves_member_order() {
    let tree = full_tree();
    let decoded = read_bytes(&write_bytes(&tree).unwrap()).unwrap();

    let kinds: Vec<u32> = decoded
        .members()
        .unwrap()
        .iter()
        .map(|m| m.instance_id)
        .collect();
    assert_eq!(
        kinds,
        vec![
            1, // run description
            GRP_TRI_TD_HIST_ID,
            GRP_TRI_TD_SCALER_ID,
            GRP_GEN_IND_VAR_ARR_ID,
            GRP_CMT_ID,
        ]
    );
}

#[test]
fn test_size_op_matches_encoded_length() {
    let tree = full_tree();
    // Every node in the tree, not just the root.
    fn check(section: &Section) {
        let mut buf = DataBuf::new();
        section.encode_payload(&mut buf).unwrap();
        assert_eq!(
            buf.len() as u32,
            section.size(),
            "size() mismatch for sec_id {:#010x}",
            section.sec_id
        );
        if let Some(members) = section.members() {
            members.iter().for_each(check);
        }
    }
    check(&tree);
}

#[test]
fn test_group_sizing_identity() {
    let tree = full_tree();
    fn check(section: &Section) {
        if let Some(members) = section.members() {
            let expected: u32 = 4 + members.iter().map(|m| 24 + m.size()).sum::<u32>();
            assert_eq!(section.size(), expected);
            members.iter().for_each(check);
        }
    }
    check(&tree);
}

#[test]
fn test_sibling_offsets_on_wire() {
    let bytes = write_bytes(&full_tree()).unwrap();
    let mut buf = DataBuf::from_vec(bytes);

    // Walk the outer group's member chain by core offsets alone.
    let outer = SectionCore::decode(&mut buf).unwrap();
    let payload_end = buf.position() + outer.core.size as usize;
    let mut num_members = buf.read_u32().unwrap();
    while num_members > 0 {
        let dc = SectionCore::decode(&mut buf).unwrap();
        num_members -= 1;
        if num_members == 0 {
            assert_eq!(dc.core.next_offset, 0, "last member must end the chain");
            break;
        }
        assert_eq!(
            dc.core.next_offset,
            24 + dc.core.size,
            "next_offset must be core + payload for sec_id {:#010x}",
            dc.core.sec_id
        );
        let next = dc.record_start + dc.core.next_offset as usize;
        assert!(next <= payload_end);
        buf.seek(next).unwrap();
    }
}

// ============================================================================
// Unknown sections
// ============================================================================

#[test]
fn test_unknown_section_preserved_verbatim() {
    let mut tree = full_tree();
    let unknown = Section {
        sec_id: 0x1234_5678,
        instance_id: 1,
        payload: SectionPayload::Opaque(vec![1, 2, 3, 4, 5, 6, 7]),
    };
    add_to_group(&mut tree, unknown).unwrap();

    let first = write_bytes(&tree).unwrap();
    let offset = first
        .windows(7)
        .position(|w| w == &[1u8, 2, 3, 4, 5, 6, 7])
        .expect("unknown payload not found in stream");

    let decoded = read_bytes(&first).unwrap();
    let last = decoded.members().unwrap().last().unwrap();
    assert_eq!(last.sec_id, 0x1234_5678);
    assert_eq!(
        last.payload,
        SectionPayload::Opaque(vec![1, 2, 3, 4, 5, 6, 7])
    );

    // Same bytes at the same offset after the round trip.
    let second = write_bytes(&decoded).unwrap();
    assert_eq!(second, first);
    assert_eq!(&second[offset..offset + 7], &[1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn test_deadbeef_section_round_trip() {
    let mut tree = full_tree();
    let payload: Vec<u8> = (0..41).map(|i| (i * 31) as u8).collect();
    add_to_group(
        &mut tree,
        Section {
            sec_id: 0xDEAD_BEEF,
            instance_id: 3,
            payload: SectionPayload::Opaque(payload.clone()),
        },
    )
    .unwrap();

    let bytes = write_bytes(&tree).unwrap();
    let decoded = read_bytes(&bytes).unwrap();
    assert_eq!(write_bytes(&decoded).unwrap(), bytes);
    match &decoded.members().unwrap().last().unwrap().payload {
        SectionPayload::Opaque(p) => assert_eq!(p, &payload),
        other => panic!("expected opaque payload, got {other:?}"),
    }
}

// ============================================================================
// Packing
// ============================================================================

#[test]
fn test_packing_round_trip_pinned_values() {
    let xs = [0u32, 1, 255, 256, 65535, 65536, 0xFFFF_FFFF];
    assert_eq!(packing::unpack(&packing::pack(&xs)).unwrap(), xs);
}

#[test]
fn test_packing_round_trip_fixture_shape() {
    // A realistic decay spectrum: mostly small counts, a prompt peak.
    let bins = common::fixture_bins(3);
    let packed = packing::pack(&bins);
    assert!(packed.len() < bins.len() * 4, "packing should not expand");
    assert_eq!(packing::unpack_n(&packed, bins.len()).unwrap(), bins);
}
