//! Three-phase liquidation waterfall.
//!
//! ## Phases
//!
//! 1. **Liquidation preference**: preferred classes, in seniority order,
//!    recover `investment × liquidation_pref` while proceeds last.
//! 2. **Participation**: participating preferred and common classes share
//!    what is left pro rata by shares, subject to caps on preferred classes.
//! 3. **Residual**: anything still left is split among common classes by
//!    their share of common stock, or retained by the company when no common
//!    stock exists.
//!
//! Every payment is recorded as a [`WaterfallStep`]. The sum of payouts always
//! equals the exit amount: sub-tolerance remainders are reported as retained
//! and the last common class absorbs floating-point dust.

use captable_core::{CapTable, ClassHoldings, ExitAmount, ShareClass};
use tracing::{debug, trace};

use crate::config::{EngineConfig, ParticipationMode, SeniorityOrder};
use crate::step::{StepKind, WaterfallStep};

/// Remainders at or below this are float noise, not proceeds.
const DUST: f64 = 1e-6;

/// Running state of one waterfall evaluation.
struct Ledger<'a> {
    classes: &'a [ShareClass],
    steps: Vec<WaterfallStep>,
    remaining: f64,
    received: Vec<f64>,
}

impl<'a> Ledger<'a> {
    fn new(classes: &'a [ShareClass], exit_amount: f64) -> Self {
        Self {
            classes,
            steps: vec![WaterfallStep::starting(exit_amount)],
            remaining: exit_amount,
            received: vec![0.0; classes.len()],
        }
    }

    fn pay(&mut self, kind: StepKind, idx: usize, amount: f64) {
        let name = &self.classes[idx].name;
        trace!(class = %name, kind = %kind, amount, remaining = self.remaining, "payout");
        self.steps.push(WaterfallStep::class_payout(
            kind,
            name,
            amount,
            self.remaining,
        ));
        self.received[idx] += amount;
        self.remaining -= amount;
    }

    fn retain(&mut self) {
        let amount = self.remaining;
        trace!(amount, "retained by company");
        self.steps.push(WaterfallStep::retained(amount, amount));
        self.remaining = 0.0;
    }

    /// Headroom left under a class's cap, or `None` if uncapped.
    fn cap_headroom(&self, idx: usize, holdings: &ClassHoldings) -> Option<f64> {
        self.classes[idx]
            .effective_cap()
            .map(|cap| holdings.investment * cap - self.received[idx])
    }
}

/// Waterfall calculator parameterised by an [`EngineConfig`].
///
/// # Examples
/// ```
/// use captable_core::presets::default_cap_table;
/// use captable_core::ExitAmount;
/// use captable_waterfall::{EngineConfig, ParticipationMode, WaterfallEngine};
///
/// let table = default_cap_table().unwrap();
/// let engine = WaterfallEngine::new(
///     EngineConfig::default().with_participation_mode(ParticipationMode::FixedPoint),
/// );
/// let steps = engine.compute_detailed(&table, ExitAmount::new(10_000_000.0).unwrap());
///
/// // Series B is held to its 3x cap of $6,000,000
/// let series_b: f64 = steps
///     .iter()
///     .filter(|s| s.share_class.as_deref() == Some("Series B"))
///     .map(|s| s.payout())
///     .sum();
/// assert!((series_b - 6_000_000.0).abs() < 1e-6);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaterfallEngine {
    config: EngineConfig,
}

impl WaterfallEngine {
    /// Creates an engine with the given settings.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The engine's settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Computes the ordered list of waterfall steps for one exit amount.
    ///
    /// The first step is always the starting step. An empty cap table yields
    /// only that step; a zero exit yields only that step as well.
    pub fn compute_detailed(&self, table: &CapTable, exit: ExitAmount) -> Vec<WaterfallStep> {
        let exit_amount = exit.value();
        let classes = table.share_classes();
        let mut ledger = Ledger::new(classes, exit_amount);

        if table.is_empty() {
            debug!("no transactions; nothing to distribute");
            return ledger.steps;
        }

        let holdings = table.holdings();
        let ordered = self.seniority_ordered(classes, &holdings);
        debug!(
            exit_amount,
            active_classes = ordered.len(),
            order = self.config.seniority_order.name(),
            mode = self.config.participation_mode.name(),
            "computing waterfall"
        );

        self.pay_preferences(&mut ledger, &ordered, &holdings);

        if table.total_shares() > 0.0 {
            self.pay_participation(&mut ledger, &ordered, &holdings);
        } else {
            debug!("total shares are zero; skipping participation");
        }

        self.distribute_residual(&mut ledger, &holdings);
        ledger.steps
    }

    /// Indices of active classes, stably sorted by seniority.
    fn seniority_ordered(&self, classes: &[ShareClass], holdings: &[ClassHoldings]) -> Vec<usize> {
        let mut ordered: Vec<usize> = (0..classes.len())
            .filter(|&idx| holdings[idx].is_active())
            .collect();
        match self.config.seniority_order {
            SeniorityOrder::Ascending => ordered.sort_by_key(|&idx| classes[idx].seniority),
            SeniorityOrder::Descending => {
                ordered.sort_by(|&a, &b| classes[b].seniority.cmp(&classes[a].seniority))
            }
        }
        ordered
    }

    fn pay_preferences(&self, ledger: &mut Ledger<'_>, ordered: &[usize], holdings: &[ClassHoldings]) {
        for &idx in ordered {
            if ledger.remaining <= 0.0 {
                break;
            }
            let class = &ledger.classes[idx];
            if !class.is_preferred() {
                continue;
            }
            let pref_amount = holdings[idx].investment * class.liquidation_pref;
            let payout = pref_amount.min(ledger.remaining);
            if payout > 0.0 {
                ledger.pay(StepKind::LiquidationPreference, idx, payout);
            }
        }
        debug!(remaining = ledger.remaining, "liquidation preferences paid");
    }

    fn pay_participation(&self, ledger: &mut Ledger<'_>, ordered: &[usize], holdings: &[ClassHoldings]) {
        if ledger.remaining <= 0.0 {
            return;
        }
        let eligible: Vec<usize> = ordered
            .iter()
            .copied()
            .filter(|&idx| ledger.classes[idx].participates_pro_rata())
            .collect();
        let participating_shares: f64 = eligible.iter().map(|&idx| holdings[idx].shares).sum();
        if participating_shares <= 0.0 {
            debug!("no participating shares; skipping participation");
            return;
        }

        match self.config.participation_mode {
            ParticipationMode::SinglePass => {
                single_pass(ledger, &eligible, holdings, participating_shares)
            }
            ParticipationMode::FixedPoint => fixed_point(ledger, &eligible, holdings),
        }
        debug!(remaining = ledger.remaining, "participation paid");
    }

    fn distribute_residual(&self, ledger: &mut Ledger<'_>, holdings: &[ClassHoldings]) {
        if ledger.remaining <= DUST {
            return;
        }
        if ledger.remaining <= self.config.residual_tolerance {
            debug!(remaining = ledger.remaining, "residual below tolerance; retained");
            ledger.retain();
            return;
        }

        // Declaration order, not seniority order
        let commons: Vec<usize> = (0..ledger.classes.len())
            .filter(|&idx| ledger.classes[idx].is_common() && holdings[idx].is_active())
            .collect();
        let total_common: f64 = commons.iter().map(|&idx| holdings[idx].shares).sum();
        let last = commons.iter().rposition(|&idx| holdings[idx].shares > 0.0);

        let last = match last {
            Some(last) if total_common > 0.0 => last,
            _ => {
                debug!(remaining = ledger.remaining, "no common shares; residual retained");
                ledger.retain();
                return;
            }
        };

        let pool = ledger.remaining;
        for (pos, &idx) in commons.iter().enumerate().take(last + 1) {
            let amount = if pos == last {
                ledger.remaining
            } else {
                (holdings[idx].shares / total_common * pool).min(ledger.remaining)
            };
            if amount > 0.0 {
                ledger.pay(StepKind::AdditionalDistribution, idx, amount);
            }
        }
        debug!(pool, "residual distributed to common");
    }
}

fn participation_kind(class: &ShareClass) -> StepKind {
    if class.is_common() {
        StepKind::CommonDistribution
    } else {
        StepKind::Participation
    }
}

/// Each award is a share of what is left at the time the class is reached.
fn single_pass(
    ledger: &mut Ledger<'_>,
    eligible: &[usize],
    holdings: &[ClassHoldings],
    participating_shares: f64,
) {
    for &idx in eligible {
        if ledger.remaining <= 0.0 {
            break;
        }
        let mut award = holdings[idx].shares / participating_shares * ledger.remaining;
        if let Some(headroom) = ledger.cap_headroom(idx, &holdings[idx]) {
            award = award.min(headroom);
        }
        let award = award.min(ledger.remaining).max(0.0);
        if award > 0.0 {
            ledger.pay(participation_kind(&ledger.classes[idx]), idx, award);
        }
    }
}

/// Splits the pool among uncapped classes, clamps any class that hits its
/// cap, and re-splits the freed amount until nothing changes.
fn fixed_point(ledger: &mut Ledger<'_>, eligible: &[usize], holdings: &[ClassHoldings]) {
    let mut awards = vec![0.0; eligible.len()];
    let mut capped = vec![false; eligible.len()];
    let mut pool = ledger.remaining;

    // Each round either caps a new class or exhausts the pool
    for round in 0..=eligible.len() {
        let open_shares: f64 = eligible
            .iter()
            .enumerate()
            .filter(|&(pos, _)| !capped[pos])
            .map(|(_, &idx)| holdings[idx].shares)
            .sum();
        if open_shares <= 0.0 || pool <= DUST {
            break;
        }

        let mut distributed = 0.0;
        let mut newly_capped = false;
        for (pos, &idx) in eligible.iter().enumerate() {
            if capped[pos] {
                continue;
            }
            let mut give = holdings[idx].shares / open_shares * pool;
            if let Some(headroom) = ledger.cap_headroom(idx, &holdings[idx]) {
                let headroom = (headroom - awards[pos]).max(0.0);
                if give >= headroom {
                    give = headroom;
                    capped[pos] = true;
                    newly_capped = true;
                }
            }
            awards[pos] += give;
            distributed += give;
        }
        pool -= distributed;
        trace!(round, distributed, pool, "fixed-point round");

        if !newly_capped {
            break;
        }
    }

    for (pos, &idx) in eligible.iter().enumerate() {
        let award = awards[pos].min(ledger.remaining);
        if award > 0.0 {
            ledger.pay(participation_kind(&ledger.classes[idx]), idx, award);
        }
    }
}

/// Runs the default engine (ascending seniority, single-pass participation).
pub fn compute_detailed_waterfall(table: &CapTable, exit: ExitAmount) -> Vec<WaterfallStep> {
    WaterfallEngine::default().compute_detailed(table, exit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::RETAINED_BY_COMPANY;
    use approx::assert_relative_eq;
    use captable_core::presets::default_cap_table;
    use captable_core::{PreferenceType, ReferencePolicy, Transaction};

    fn exit(value: f64) -> ExitAmount {
        ExitAmount::new(value).unwrap()
    }

    fn paid_to(steps: &[WaterfallStep], name: &str) -> f64 {
        steps
            .iter()
            .filter(|s| s.share_class.as_deref() == Some(name))
            .map(|s| s.payout())
            .sum()
    }

    fn total_paid(steps: &[WaterfallStep]) -> f64 {
        steps.iter().map(|s| s.payout()).sum()
    }

    // ========================================
    // Phase 0
    // ========================================

    #[test]
    fn test_empty_table_returns_only_starting_step() {
        let table = CapTable::new(vec![ShareClass::common(1, "Common", 1)], vec![]).unwrap();
        let steps = compute_detailed_waterfall(&table, exit(5_000.0));
        assert_eq!(steps.len(), 1);
        assert!(steps[0].is_starting);
        assert_eq!(steps[0].value, 5_000.0);
    }

    #[test]
    fn test_zero_exit_returns_only_starting_step() {
        let table = default_cap_table().unwrap();
        let steps = compute_detailed_waterfall(&table, exit(0.0));
        assert_eq!(steps.len(), 1);
    }

    // ========================================
    // Default fixture, single pass
    // ========================================

    #[test]
    fn test_default_fixture_step_sequence() {
        let table = default_cap_table().unwrap();
        let steps = compute_detailed_waterfall(&table, exit(10_000_000.0));

        let labels: Vec<&str> = steps.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Total Exit Proceeds",
                "Series A (Liquidation Preference)",
                "Series B (Liquidation Preference)",
                "Series A (Participation)",
                "Series B (Participation)",
                "Common (Common Distribution)",
                "Common (Additional Distribution)",
            ]
        );

        assert_relative_eq!(steps[1].payout(), 1_000_000.0);
        assert_relative_eq!(steps[2].payout(), 3_000_000.0);
        assert_relative_eq!(steps[3].payout(), 1_600_000.0, epsilon = 1e-6);
        assert_relative_eq!(steps[4].payout(), 2_346_666.666_666_667, epsilon = 1e-6);
        assert_relative_eq!(steps[5].payout(), 410_666.666_666_667, epsilon = 1e-6);
        assert_relative_eq!(steps[6].payout(), 1_642_666.666_666_667, epsilon = 1e-6);
    }

    #[test]
    fn test_default_fixture_class_totals() {
        let table = default_cap_table().unwrap();
        let steps = compute_detailed_waterfall(&table, exit(10_000_000.0));

        assert_relative_eq!(paid_to(&steps, "Series A"), 2_600_000.0, epsilon = 1e-6);
        assert_relative_eq!(paid_to(&steps, "Series B"), 5_346_666.666_666_667, epsilon = 1e-6);
        assert_relative_eq!(paid_to(&steps, "Common"), 2_053_333.333_333_333, epsilon = 1e-6);
        assert_relative_eq!(total_paid(&steps), 10_000_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_remaining_proceeds_is_pre_step_amount() {
        let table = default_cap_table().unwrap();
        let steps = compute_detailed_waterfall(&table, exit(10_000_000.0));
        for pair in steps[1..].windows(2) {
            assert_relative_eq!(
                pair[1].remaining_proceeds,
                pair[0].remaining_proceeds - pair[0].payout(),
                epsilon = 1e-6
            );
        }
        assert_eq!(steps[1].remaining_proceeds, 10_000_000.0);
    }

    #[test]
    fn test_preferences_exhaust_small_exit() {
        let table = default_cap_table().unwrap();
        let steps = compute_detailed_waterfall(&table, exit(2_500_000.0));

        assert_eq!(steps.len(), 3);
        assert_relative_eq!(paid_to(&steps, "Series A"), 1_000_000.0);
        assert_relative_eq!(paid_to(&steps, "Series B"), 1_500_000.0);
        assert_eq!(paid_to(&steps, "Common"), 0.0);
    }

    // ========================================
    // Caps
    // ========================================

    #[test]
    fn test_single_pass_cap_clamps_award() {
        let classes = vec![
            ShareClass::preferred(1, "Seed", 1, 1.0, PreferenceType::Participating).with_cap(1.5),
            ShareClass::common(2, "Common", 2),
        ];
        let txs = vec![
            Transaction::new(1, "Seed", 1_000.0, 1_000.0),
            Transaction::new(2, "Common", 1_000.0, 0.0),
        ];
        let table = CapTable::new(classes, txs).unwrap();
        let steps = compute_detailed_waterfall(&table, exit(11_000.0));

        // 1,000 preference, then 5,000 pro-rata award clamped to 500 headroom
        assert_relative_eq!(paid_to(&steps, "Seed"), 1_500.0, epsilon = 1e-9);
        assert_relative_eq!(paid_to(&steps, "Common"), 9_500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cap_at_preference_blocks_participation() {
        let classes = vec![
            ShareClass::preferred(1, "Seed", 1, 2.0, PreferenceType::Participating).with_cap(2.0),
            ShareClass::common(2, "Common", 2),
        ];
        let txs = vec![
            Transaction::new(1, "Seed", 500.0, 1_000.0),
            Transaction::new(2, "Common", 500.0, 0.0),
        ];
        let table = CapTable::new(classes, txs).unwrap();
        let steps = compute_detailed_waterfall(&table, exit(10_000.0));

        assert_relative_eq!(paid_to(&steps, "Seed"), 2_000.0, epsilon = 1e-9);
        assert!(!steps.iter().any(|s| s.label == "Seed (Participation)"));
    }

    #[test]
    fn test_fixed_point_redistributes_capped_excess() {
        let table = default_cap_table().unwrap();
        let engine = WaterfallEngine::new(
            EngineConfig::default().with_participation_mode(ParticipationMode::FixedPoint),
        );
        let steps = engine.compute_detailed(&table, exit(10_000_000.0));

        assert_relative_eq!(paid_to(&steps, "Series B"), 6_000_000.0, epsilon = 1e-6);
        // 200,000 freed by the cap is split 1 : 0.75 between A and Common
        assert_relative_eq!(paid_to(&steps, "Series A"), 2_714_285.714_285_714, epsilon = 1e-6);
        assert_relative_eq!(paid_to(&steps, "Common"), 1_285_714.285_714_286, epsilon = 1e-6);
        assert_relative_eq!(total_paid(&steps), 10_000_000.0, epsilon = 1e-6);
        assert!(!steps.iter().any(|s| s.kind == StepKind::AdditionalDistribution));
    }

    // ========================================
    // Ordering
    // ========================================

    #[test]
    fn test_descending_order_pays_highest_rank_first() {
        let table = default_cap_table().unwrap();
        let engine = WaterfallEngine::new(
            EngineConfig::default().with_seniority_order(SeniorityOrder::Descending),
        );
        let steps = engine.compute_detailed(&table, exit(3_500_000.0));

        assert_eq!(steps[1].label, "Series B (Liquidation Preference)");
        assert_relative_eq!(paid_to(&steps, "Series B"), 3_000_000.0);
        assert_relative_eq!(paid_to(&steps, "Series A"), 500_000.0);
    }

    #[test]
    fn test_seniority_ties_keep_declaration_order() {
        let classes = vec![
            ShareClass::preferred(1, "First", 1, 1.0, PreferenceType::NonParticipating),
            ShareClass::preferred(2, "Second", 1, 1.0, PreferenceType::NonParticipating),
        ];
        let txs = vec![
            Transaction::new(1, "Second", 10.0, 100.0),
            Transaction::new(2, "First", 10.0, 100.0),
        ];
        let table = CapTable::new(classes, txs).unwrap();
        let steps = compute_detailed_waterfall(&table, exit(150.0));

        assert_eq!(steps[1].share_class.as_deref(), Some("First"));
        assert_relative_eq!(paid_to(&steps, "Second"), 50.0);
    }

    // ========================================
    // Residual
    // ========================================

    #[test]
    fn test_non_participating_only_leaves_residual_retained() {
        let classes = vec![ShareClass::preferred(
            1,
            "Seed",
            1,
            1.0,
            PreferenceType::NonParticipating,
        )];
        let txs = vec![Transaction::new(1, "Seed", 100.0, 1_000.0)];
        let table = CapTable::new(classes, txs).unwrap();
        let steps = compute_detailed_waterfall(&table, exit(4_000.0));

        let last = steps.last().unwrap();
        assert!(last.is_retained);
        assert_eq!(last.label, RETAINED_BY_COMPANY);
        assert_relative_eq!(last.payout(), 3_000.0);
    }

    #[test]
    fn test_zero_total_shares_retains_everything() {
        let classes = vec![
            ShareClass::preferred(1, "Seed", 1, 1.0, PreferenceType::Participating),
            ShareClass::common(2, "Common", 2),
        ];
        let txs = vec![
            Transaction::new(1, "Seed", 0.0, 0.0),
            Transaction::new(2, "Common", 0.0, 0.0),
        ];
        let table = CapTable::new(classes, txs).unwrap();
        let steps = compute_detailed_waterfall(&table, exit(1_000.0));

        assert_eq!(steps.len(), 2);
        assert!(steps[1].is_retained);
        assert_eq!(steps[1].payout(), 1_000.0);
    }

    #[test]
    fn test_sub_tolerance_residual_is_retained() {
        let classes = vec![ShareClass::preferred(
            1,
            "Seed",
            1,
            1.0,
            PreferenceType::NonParticipating,
        )];
        let txs = vec![Transaction::new(1, "Seed", 1.0, 100.0)];
        let table = CapTable::new(classes, txs).unwrap();
        let steps = compute_detailed_waterfall(&table, exit(100.005));

        assert_eq!(steps.len(), 3);
        assert!(steps[2].is_retained);
        assert_relative_eq!(total_paid(&steps), 100.005, epsilon = 1e-12);
    }

    #[test]
    fn test_residual_split_across_common_classes() {
        let classes = vec![
            ShareClass::preferred(1, "Seed", 1, 1.0, PreferenceType::NonParticipating),
            ShareClass::common(2, "Founders", 2),
            ShareClass::common(3, "Pool", 3),
        ];
        let txs = vec![
            Transaction::new(1, "Seed", 0.0, 1_000.0),
            Transaction::new(2, "Founders", 300.0, 0.0),
            Transaction::new(3, "Pool", 100.0, 0.0),
        ];
        let table = CapTable::new(classes, txs).unwrap();
        let steps = compute_detailed_waterfall(&table, exit(5_000.0));

        // Participation pays 3,000 then 250; residual 750 splits 3 : 1
        assert_relative_eq!(paid_to(&steps, "Founders"), 3_000.0 + 562.5, epsilon = 1e-9);
        assert_relative_eq!(paid_to(&steps, "Pool"), 250.0 + 187.5, epsilon = 1e-9);
        assert_relative_eq!(total_paid(&steps), 5_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_lenient_orphan_dilutes_but_is_not_paid() {
        let classes = vec![ShareClass::common(1, "Common", 1)];
        let txs = vec![
            Transaction::new(1, "Common", 100.0, 0.0),
            Transaction::new(2, "Ghost", 100.0, 0.0),
        ];
        let table = CapTable::with_policy(classes, txs, ReferencePolicy::Lenient).unwrap();
        let steps = compute_detailed_waterfall(&table, exit(1_000.0));

        assert!(steps.iter().all(|s| s.share_class.as_deref() != Some("Ghost")));
        assert_relative_eq!(paid_to(&steps, "Common"), 1_000.0, epsilon = 1e-9);
    }
}
