// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use mudcodec::section::constants::*;
use mudcodec::MudFile;

// ============================================================================
// Test Fixtures
// ============================================================================

/// Get a temporary directory for test files
fn temp_dir() -> PathBuf {
    let random = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    std::env::temp_dir().join(format!("mudcodec_test_{}_{}", std::process::id(), random))
}

/// Create a temporary file path with cleanup guard
pub fn temp_path(name: &str) -> (PathBuf, CleanupGuard) {
    let dir = temp_dir();
    fs::create_dir_all(&dir).ok();
    let path = dir.join(name);
    let guard = CleanupGuard(dir);
    (path, guard)
}

/// Cleanup guard for test temporary files
pub struct CleanupGuard(PathBuf);

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

// ============================================================================
// Fixture Builders
// ============================================================================

/// Bins stored in every fixture histogram.
pub const FIXTURE_NUM_BINS: u32 = 32768;

/// Bin values for fixture histogram `index`.
pub fn fixture_bins(index: u32) -> Vec<u32> {
    (0..FIXTURE_NUM_BINS)
        .map(|j| (j.wrapping_mul(index) % 700) + if j == 17 { 100_000 } else { 0 })
        .collect()
}

/// Write a representative TD-µSR fixture to `path`:
/// run 6663 "Sample calibration", 8 packed histograms of
/// [`FIXTURE_NUM_BINS`] bins, 3 scalers, 2 independent variables and one
/// comment chain.
pub fn write_td_fixture(path: &std::path::Path) {
    let mut mf = MudFile::open_write(path, FMT_TRI_TD_ID).expect("open_write failed");

    mf.set_run_desc().unwrap();
    mf.set_expt_number(791).unwrap();
    mf.set_run_number(6663).unwrap();
    mf.set_time_begin(820_454_400).unwrap();
    mf.set_time_end(820_458_000).unwrap();
    mf.set_elapsed_sec(3600).unwrap();
    mf.set_title("Sample calibration").unwrap();
    mf.set_lab("TRIUMF").unwrap();
    mf.set_area("M20").unwrap();
    mf.set_method("TD-uSR").unwrap();
    mf.set_apparatus("OMNI").unwrap();
    mf.set_sample("CeB6").unwrap();
    mf.set_orient("c-axis").unwrap();
    mf.set_das("MDARC").unwrap();
    mf.set_experimenter("TW/DA").unwrap();
    mf.set_temperature("2.5 K").unwrap();
    mf.set_field("100 G").unwrap();

    mf.set_hists(GRP_TRI_TD_HIST_ID, 8).unwrap();
    for i in 1..=8u32 {
        mf.set_hist_type(i, SEC_TRI_TD_HIST_ID).unwrap();
        mf.set_hist_fs_per_bin(i, 48_828_125).unwrap();
        mf.set_hist_t0_bin(i, 3).unwrap();
        mf.set_hist_good_bin1(i, 5).unwrap();
        mf.set_hist_good_bin2(i, FIXTURE_NUM_BINS - 8).unwrap();
        mf.set_hist_title(i, &format!("Counter {i}")).unwrap();
        mf.set_hist_data(i, &fixture_bins(i)).unwrap();
        mf.set_hist_num_events(i, fixture_bins(i).iter().map(|&v| v as u64).sum::<u64>() as u32)
            .unwrap();
    }

    mf.set_scalers(GRP_TRI_TD_SCALER_ID, 3).unwrap();
    for (i, label) in [(1u32, "CLOCK"), (2, "BEAM"), (3, "MU")] {
        mf.set_scaler_label(i, label).unwrap();
        mf.set_scaler_counts(i, [1_000_000 * i, 17 * i]).unwrap();
    }

    mf.set_ind_vars(GRP_GEN_IND_VAR_ID, 2).unwrap();
    mf.set_ind_var_name(1, "Temperature").unwrap();
    mf.set_ind_var_units(1, "K").unwrap();
    mf.set_ind_var_mean(1, 2.5).unwrap();
    mf.set_ind_var_low(1, 2.31).unwrap();
    mf.set_ind_var_high(1, 2.74).unwrap();
    mf.set_ind_var_name(2, "Field").unwrap();
    mf.set_ind_var_units(2, "G").unwrap();
    mf.set_ind_var_mean(2, 99.6).unwrap();

    mf.set_comments(2).unwrap();
    mf.set_comment_time(1, 820_454_500).unwrap();
    mf.set_comment_author(1, "tw").unwrap();
    mf.set_comment_title(1, "target").unwrap();
    mf.set_comment_body(1, "target changed at run start").unwrap();
    mf.set_comment_next(1, 2).unwrap();
    mf.set_comment_prev(2, 1).unwrap();
    mf.set_comment_author(2, "da").unwrap();
    mf.set_comment_body(2, "confirmed").unwrap();

    mf.close_write().expect("close_write failed");
}
