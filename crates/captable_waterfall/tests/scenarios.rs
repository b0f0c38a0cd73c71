//! End-to-end waterfall scenarios.
//!
//! Each test builds a cap table through the public API and checks the
//! detailed steps, the summary and the sweep against hand-computed values.

use approx::assert_relative_eq;
use captable_core::presets::{default_cap_table, default_share_classes, DEFAULT_EXIT_AMOUNT};
use captable_core::{CapTable, ExitAmount, PreferenceType, ShareClass, Transaction};
use captable_waterfall::{
    compute_detailed_waterfall, compute_exit_distribution, compute_summary_waterfall, issue_round,
    RoundTerms, StepKind, RETAINED_BY_COMPANY,
};

fn exit(value: f64) -> ExitAmount {
    ExitAmount::new(value).unwrap()
}

// ========================================
// Single common class
// ========================================

/// A lone common class takes the whole exit.
#[test]
fn test_single_common_class_takes_everything() {
    let table = CapTable::new(
        vec![ShareClass::common(1, "Common", 1)],
        vec![Transaction::new(1, "Common", 1_000.0, 0.0)],
    )
    .unwrap();

    let summary = compute_summary_waterfall(&table, exit(1_000_000.0));
    assert_eq!(summary.len(), 1);
    let entry = summary.entry("Common").unwrap();
    assert_relative_eq!(entry.payout, 1_000_000.0);
    assert_eq!(entry.percentage, 100.0);
}

// ========================================
// Default fixture
// ========================================

/// Preferences are paid first, then the single pass splits the rest.
#[test]
fn test_default_fixture_at_ten_million() {
    let table = default_cap_table().unwrap();
    let steps = compute_detailed_waterfall(&table, exit(DEFAULT_EXIT_AMOUNT));

    let prefs: Vec<(&str, f64)> = steps
        .iter()
        .filter(|s| s.kind == StepKind::LiquidationPreference)
        .map(|s| (s.share_class.as_deref().unwrap_or(""), s.payout()))
        .collect();
    assert_eq!(prefs, vec![("Series A", 1_000_000.0), ("Series B", 3_000_000.0)]);

    // Remaining after preferences
    assert_eq!(steps[3].remaining_proceeds, 6_000_000.0);

    let summary = compute_summary_waterfall(&table, exit(DEFAULT_EXIT_AMOUNT));
    assert!(summary.payout_for("Series B") <= 6_000_000.0);
    assert_relative_eq!(summary.payout_for("Series A"), 2_600_000.0, epsilon = 1e-6);
    assert_relative_eq!(summary.payout_for("Series B"), 5_346_666.666_666_667, epsilon = 1e-6);
    assert_relative_eq!(summary.payout_for("Common"), 2_053_333.333_333_333, epsilon = 1e-6);
    assert_relative_eq!(summary.total_payout(), DEFAULT_EXIT_AMOUNT, epsilon = 1e-6);
}

// ========================================
// Degenerate inputs
// ========================================

/// A zero exit produces only the starting step and no payouts.
#[test]
fn test_zero_exit() {
    let table = default_cap_table().unwrap();
    let steps = compute_detailed_waterfall(&table, exit(0.0));
    assert_eq!(steps.len(), 1);
    assert!(steps[0].is_starting);

    let summary = compute_summary_waterfall(&table, exit(0.0));
    for name in ["Series A", "Series B", "Common"] {
        assert_eq!(summary.payout_for(name), 0.0);
    }
}

/// With no shares outstanding the company retains the whole exit.
#[test]
fn test_all_shares_zero_retains_exit() {
    let classes = default_share_classes();
    let transactions = vec![
        Transaction::new(1, "Series A", 0.0, 0.0),
        Transaction::new(2, "Series B", 0.0, 0.0),
        Transaction::new(3, "Common", 0.0, 0.0),
    ];
    let table = CapTable::new(classes, transactions).unwrap();
    let steps = compute_detailed_waterfall(&table, exit(1_000_000.0));

    assert_eq!(steps.len(), 2);
    assert!(steps[0].is_starting);
    assert!(steps[1].is_retained);
    assert_eq!(steps[1].label, RETAINED_BY_COMPANY);
    assert_eq!(steps[1].payout(), 1_000_000.0);

    let summary = compute_summary_waterfall(&table, exit(1_000_000.0));
    assert_eq!(summary.retained(), 1_000_000.0);
    assert_eq!(summary.entry(RETAINED_BY_COMPANY).unwrap().percentage, 100.0);
}

// ========================================
// Sweep
// ========================================

/// Three grid points, every row reconciling with its exit value.
#[test]
fn test_sweep_three_points() {
    let table = default_cap_table().unwrap();
    let sweep = compute_exit_distribution(&table, exit(2_000_000.0), 2).unwrap();

    assert_eq!(sweep.exit_values, vec![0.0, 1_000_000.0, 2_000_000.0]);
    for (i, &value) in sweep.exit_values.iter().enumerate() {
        let row: f64 = sweep.distributions[i].iter().sum();
        assert_relative_eq!(row + sweep.retained[i], value, epsilon = 1e-6);
    }
    // 2M only covers Series A's 1M preference and 1M of Series B's 3M
    assert_eq!(sweep.distributions[2], vec![1_000_000.0, 1_000_000.0, 0.0]);
}

// ========================================
// Round modelling
// ========================================

/// A new senior round is paid ahead of the existing classes.
#[test]
fn test_issued_round_runs_through_waterfall() {
    let table = default_cap_table().unwrap();
    let series_c = ShareClass::preferred(4, "Series C", 0, 1.0, PreferenceType::Participating);
    let issued = issue_round(
        &table,
        series_c,
        RoundTerms::PreMoney {
            pre_money: 15_000_000.0,
            investment: 5_000_000.0,
        },
        4,
    )
    .unwrap();

    let steps = compute_detailed_waterfall(&issued.table, exit(5_000_000.0));
    assert_eq!(steps[1].label, "Series C (Liquidation Preference)");
    assert_relative_eq!(steps[1].payout(), 5_000_000.0);
    assert_eq!(steps.len(), 2);
}
