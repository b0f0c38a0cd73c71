//! Priced round modelling.
//!
//! Prices a new financing round from either a pre-money valuation or a
//! target ownership stake, and issues the round into a cap table so the
//! post-round waterfall can be computed.

use captable_core::{CapTable, CapTableError, ShareClass, Transaction};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WaterfallError;

/// Highest ownership percentage a new investor can target.
pub const MAX_TARGET_OWNERSHIP_PCT: f64 = 99.99;

/// How the round's valuation is set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum RoundTerms {
    /// Investment at an agreed pre-money valuation.
    #[serde(rename_all = "camelCase")]
    PreMoney {
        /// Pre-money valuation
        pre_money: f64,
        /// New money invested
        investment: f64,
    },
    /// Investment sized to buy a target ownership stake.
    #[serde(rename_all = "camelCase")]
    TargetOwnership {
        /// New money invested
        investment: f64,
        /// Post-money ownership of the new investor, in percent
        target_pct: f64,
    },
}

impl RoundTerms {
    /// Get the name of the pricing method.
    pub fn name(&self) -> &'static str {
        match self {
            RoundTerms::PreMoney { .. } => "pre-money",
            RoundTerms::TargetOwnership { .. } => "target-ownership",
        }
    }

    /// New money invested.
    pub fn investment(&self) -> f64 {
        match *self {
            RoundTerms::PreMoney { investment, .. } => investment,
            RoundTerms::TargetOwnership { investment, .. } => investment,
        }
    }
}

/// Valuation and ownership outcome of a round.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundPricing {
    /// Pre-money valuation
    pub pre_money: f64,
    /// Post-money valuation
    pub post_money: f64,
    /// New money invested
    pub investment: f64,
    /// New investor's post-money ownership, in percent
    pub new_ownership_pct: f64,
    /// Existing holders' post-money ownership, in percent
    pub existing_ownership_pct: f64,
    /// Ownership given up by existing holders, in percent
    pub dilution_pct: f64,
}

fn check(field: &'static str, value: f64) -> Result<f64, WaterfallError> {
    CapTableError::ensure_non_negative(field, value, || "round terms".to_string())
        .map_err(WaterfallError::from)
}

/// Prices a round.
///
/// Target ownership at or above 100% is clamped to 99.99%.
///
/// # Examples
/// ```
/// use captable_waterfall::{price_round, RoundTerms};
///
/// let pricing = price_round(RoundTerms::PreMoney {
///     pre_money: 8_000_000.0,
///     investment: 2_000_000.0,
/// })
/// .unwrap();
/// assert_eq!(pricing.post_money, 10_000_000.0);
/// assert_eq!(pricing.new_ownership_pct, 20.0);
/// assert_eq!(pricing.existing_ownership_pct, 80.0);
/// ```
///
/// # Errors
///
/// - `CapTable(InvalidInput)` for negative or non-finite amounts
/// - `InvalidRound` for a zero post-money valuation or a zero target
pub fn price_round(terms: RoundTerms) -> Result<RoundPricing, WaterfallError> {
    let (pre_money, post_money, investment, new_ownership_pct) = match terms {
        RoundTerms::PreMoney {
            pre_money,
            investment,
        } => {
            let pre_money = check("preMoney", pre_money)?;
            let investment = check("investment", investment)?;
            let post_money = pre_money + investment;
            if post_money <= 0.0 {
                return Err(WaterfallError::InvalidRound(
                    "post-money valuation must be positive".to_string(),
                ));
            }
            (pre_money, post_money, investment, investment / post_money * 100.0)
        }
        RoundTerms::TargetOwnership {
            investment,
            target_pct,
        } => {
            let investment = check("investment", investment)?;
            let target_pct = check("targetPct", target_pct)?;
            if target_pct <= 0.0 {
                return Err(WaterfallError::InvalidRound(
                    "target ownership must be positive".to_string(),
                ));
            }
            let target_pct = target_pct.min(MAX_TARGET_OWNERSHIP_PCT);
            let post_money = investment * 100.0 / target_pct;
            (post_money - investment, post_money, investment, target_pct)
        }
    };

    Ok(RoundPricing {
        pre_money,
        post_money,
        investment,
        new_ownership_pct,
        existing_ownership_pct: 100.0 - new_ownership_pct,
        dilution_pct: new_ownership_pct,
    })
}

/// A round issued into a cap table.
#[derive(Clone, Debug, PartialEq)]
pub struct IssuedRound {
    /// Valuation outcome
    pub pricing: RoundPricing,
    /// Pre-money valuation divided by existing shares
    pub price_per_share: f64,
    /// Shares issued to the new investor
    pub new_shares: f64,
    /// Cap table with the new class and transaction appended
    pub table: CapTable,
}

/// Prices a round and appends it to a cap table.
///
/// Shares are priced at `pre_money / total_shares`, so the new investor's
/// share count matches the post-money ownership. The returned table keeps
/// the input table's reference policy.
///
/// # Errors
///
/// - Everything [`price_round`] can return
/// - `InvalidRound` when the table has no shares or the round prices them at
///   zero
/// - `CapTable` when the new class or transaction id clashes with an
///   existing record
pub fn issue_round(
    table: &CapTable,
    new_class: ShareClass,
    terms: RoundTerms,
    transaction_id: u64,
) -> Result<IssuedRound, WaterfallError> {
    let pricing = price_round(terms)?;
    let existing_shares = table.total_shares();
    if existing_shares <= 0.0 {
        return Err(WaterfallError::InvalidRound(
            "cannot price a round against a cap table with no shares".to_string(),
        ));
    }
    let price_per_share = pricing.pre_money / existing_shares;
    if price_per_share <= 0.0 {
        return Err(WaterfallError::InvalidRound(
            "pre-money valuation must be positive to price new shares".to_string(),
        ));
    }
    let new_shares = pricing.investment / price_per_share;

    debug!(
        class = %new_class.name,
        method = terms.name(),
        pre_money = pricing.pre_money,
        price_per_share,
        new_shares,
        "issuing round"
    );

    let policy = table.policy();
    let (mut classes, mut transactions) = table.clone().into_parts();
    transactions.push(Transaction::new(
        transaction_id,
        new_class.name.clone(),
        new_shares,
        pricing.investment,
    ));
    classes.push(new_class);
    let table = CapTable::with_policy(classes, transactions, policy)?;

    Ok(IssuedRound {
        pricing,
        price_per_share,
        new_shares,
        table,
    })
}
