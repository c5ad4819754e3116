//! End-to-end analysis of fixture mining logs

use std::io::Cursor;

use plotcheck_core::{LogAnalyzer, NoProgress, PlotFileRegistry, UnmatchedPolicy};

const MINING_LOG: &str = include_str!("fixtures/mining.log");
const TIE_LOG: &str = include_str!("fixtures/tie.log");
const EMPTY_LOG: &str = include_str!("fixtures/empty.log");

const PLOT_A: &str = "1234567890_0_8192_8192";
const PLOT_B: &str = "1234567890_8192_8192_8192";

fn scan(log: &str, policy: UnmatchedPolicy) -> PlotFileRegistry {
    LogAnalyzer::new()
        .with_policy(policy)
        .scan(Cursor::new(log), &mut NoProgress)
        .unwrap()
}

fn pending(registry: &PlotFileRegistry, name: &str) -> Vec<String> {
    registry
        .get(name)
        .unwrap()
        .pending_deadlines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_mining_log_diagnostic_policy() {
    let registry = scan(MINING_LOG, UnmatchedPolicy::Diagnostic);
    let report = registry.report();

    assert_eq!(report.len(), 2);
    assert_eq!(report[0].name, PLOT_A);
    assert_eq!(report[0].healthy_count, 1);
    assert_eq!(report[0].corrupted_count, 0);
    assert_eq!(report[1].name, PLOT_B);
    assert_eq!(report[1].healthy_count, 1);
    assert_eq!(report[1].corrupted_count, 0);

    assert_eq!(pending(&registry, PLOT_B), vec!["5210"]);
    assert_eq!(registry.unmatched_confirmation_count(), 1);
    assert_eq!(registry.get_mining_log_error_count(), 1);
}

#[test]
fn test_mining_log_attribute_latest_policy() {
    let registry = scan(MINING_LOG, UnmatchedPolicy::AttributeLatest);
    let report = registry.report();

    assert_eq!(report[0].healthy_count, 1);
    assert_eq!(report[0].corrupted_count, 0);
    assert_eq!(report[1].healthy_count, 1);
    assert_eq!(report[1].corrupted_count, 1);

    assert!(pending(&registry, PLOT_B).is_empty());
    assert_eq!(registry.unmatched_confirmation_count(), 1);
}

#[test]
fn test_single_match_is_healthy() {
    let log = "... found deadline=100 nonce ... file: plotA\n... confirmed deadline: 100\n";
    let registry = scan(log, UnmatchedPolicy::Diagnostic);

    let record = registry.get("plotA").unwrap();
    assert_eq!(record.stats().healthy_count, 1);
    assert_eq!(record.stats().corrupted_count, 0);
    assert_eq!(record.pending_count(), 0);
    assert_eq!(registry.unmatched_confirmation_count(), 0);
}

#[test]
fn test_unmatched_confirmation_is_diagnostic_only() {
    let log = "found deadline=100 nonce ... file: plotA\nconfirmed deadline: 999\n";
    let registry = scan(log, UnmatchedPolicy::Diagnostic);

    let record = registry.get("plotA").unwrap();
    assert_eq!(record.stats().healthy_count, 0);
    assert_eq!(record.stats().corrupted_count, 0);
    assert_eq!(pending(&registry, "plotA"), vec!["100"]);
    assert_eq!(registry.unmatched_confirmation_count(), 1);
}

#[test]
fn test_tie_credits_first_submission() {
    let registry = scan(TIE_LOG, UnmatchedPolicy::Diagnostic);

    assert_eq!(registry.get("plotA").unwrap().stats().healthy_count, 1);
    assert_eq!(registry.get("plotB").unwrap().stats().healthy_count, 0);
    assert_eq!(pending(&registry, "plotB"), vec!["50"]);
    assert!(pending(&registry, "plotA").is_empty());
}

#[test]
fn test_empty_log_has_empty_report() {
    let registry = scan(EMPTY_LOG, UnmatchedPolicy::Diagnostic);
    assert!(registry.report().is_empty());
    assert_eq!(registry.get_mining_log_error_count(), 0);
}

#[test]
fn test_merge_sums_fixture_stats_in_either_order() {
    let mining = scan(MINING_LOG, UnmatchedPolicy::AttributeLatest);
    let tie = scan(TIE_LOG, UnmatchedPolicy::AttributeLatest);

    let forward = PlotFileRegistry::merge(&mining, &tie);
    let backward = PlotFileRegistry::merge(&tie, &mining);

    for name in [PLOT_A, PLOT_B, "plotA", "plotB"] {
        assert_eq!(
            forward.get(name).unwrap().stats(),
            backward.get(name).unwrap().stats(),
            "{name}"
        );
    }
    assert_eq!(forward.total_stats(), mining.total_stats() + tie.total_stats());
    assert_eq!(forward.unmatched_confirmation_count(), 1);
    assert_eq!(forward.get_mining_log_error_count(), 1);
}

#[test]
fn test_recount_after_scan_is_stable() {
    let mut registry = scan(MINING_LOG, UnmatchedPolicy::AttributeLatest);
    let before = registry.report();

    registry.calculate_corrupted_count();
    registry.calculate_corrupted_count();

    assert_eq!(registry.report(), before);
}
