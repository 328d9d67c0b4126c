// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Path-search integration tests over decoded trees.

use mudcodec::section::constants::*;
use mudcodec::section::SectionPayload;
use mudcodec::{search, MudFile};

mod common;

use common::{temp_path, write_td_fixture, FIXTURE_NUM_BINS};

#[test]
fn test_search_third_histogram_header() {
    let (path, _guard) = temp_path("search.msr");
    write_td_fixture(&path);
    let mf = MudFile::open_read(&path).unwrap();

    let third = search(
        mf.root(),
        &[
            (SEC_GRP_ID, FMT_TRI_TD_ID),
            (SEC_GRP_ID, GRP_TRI_TD_HIST_ID),
            (SEC_GEN_HIST_HDR_ID, 3),
        ],
    )
    .expect("third histogram header");

    assert_eq!(third.instance_id, 3);
    match &third.payload {
        SectionPayload::HistHdr(h) => {
            assert_eq!(h.n_bins, FIXTURE_NUM_BINS);
            assert_eq!(h.title, "Counter 3");
        }
        other => panic!("expected a histogram header, got {other:?}"),
    }
}

#[test]
fn test_search_with_wildcard_group_step() {
    let (path, _guard) = temp_path("wildcard.msr");
    write_td_fixture(&path);
    let mf = MudFile::open_read(&path).unwrap();

    // Instance 0 descends into the outer group without naming the format.
    let desc = search(mf.root(), &[(SEC_GRP_ID, 0), (SEC_GEN_RUN_DESC_ID, 1)])
        .expect("run description");
    match &desc.payload {
        SectionPayload::RunDesc(d) => assert_eq!(d.run_number, 6663),
        other => panic!("expected a run description, got {other:?}"),
    }
}

#[test]
fn test_search_misses_are_none() {
    let (path, _guard) = temp_path("miss.msr");
    write_td_fixture(&path);
    let mf = MudFile::open_read(&path).unwrap();

    // Wrong format ID in the first step.
    assert!(search(mf.root(), &[(SEC_GRP_ID, FMT_TRI_TI_ID)]).is_none());
    // Histogram number past the group.
    assert!(search(
        mf.root(),
        &[
            (SEC_GRP_ID, FMT_TRI_TD_ID),
            (SEC_GRP_ID, GRP_TRI_TD_HIST_ID),
            (SEC_GEN_HIST_HDR_ID, 9),
        ],
    )
    .is_none());
    // Group kind absent from this file.
    assert!(search(
        mf.root(),
        &[(SEC_GRP_ID, FMT_TRI_TD_ID), (SEC_GRP_ID, GRP_TRI_TI_HIST_ID)],
    )
    .is_none());
}

#[test]
fn test_search_into_scaler_group() {
    let (path, _guard) = temp_path("scaler_search.msr");
    write_td_fixture(&path);
    let mf = MudFile::open_read(&path).unwrap();

    let second = search(
        mf.root(),
        &[
            (SEC_GRP_ID, FMT_TRI_TD_ID),
            (SEC_GRP_ID, GRP_TRI_TD_SCALER_ID),
            (SEC_GEN_SCALER_ID, 2),
        ],
    )
    .expect("second scaler");
    match &second.payload {
        SectionPayload::Scaler(s) => assert_eq!(s.label, "BEAM"),
        other => panic!("expected a scaler, got {other:?}"),
    }
}
