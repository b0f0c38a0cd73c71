//! Round command implementation
//!
//! Prices a new financing round, issues it into the cap table and shows the
//! post-round waterfall.

use std::io::Write;
use std::path::Path;

use captable_core::{PreferenceType, ShareClass};
use captable_waterfall::{issue_round, RoundPricing, RoundTerms, SummaryEntry};
use serde::Serialize;
use tracing::info;

use super::{finish, require_json_or_table, stdout};
use crate::config::{OutputFormat, WaterfallConfig};
use crate::input::RequestFile;
use crate::output::{write_json, write_round_table, write_summary_table};
use crate::{CliError, Result};

/// Round command options
#[derive(Debug, Clone)]
pub struct RoundArgs<'a> {
    pub input: Option<&'a Path>,
    pub class_name: String,
    pub investment: f64,
    pub pre_money: Option<f64>,
    pub target_ownership: Option<f64>,
    pub liquidation_pref: f64,
    pub participating: bool,
    pub cap: Option<f64>,
    pub seniority: Option<i64>,
    pub exit_amount: Option<f64>,
}

impl RoundArgs<'_> {
    fn terms(&self) -> Result<RoundTerms> {
        match (self.pre_money, self.target_ownership) {
            (Some(pre_money), None) => Ok(RoundTerms::PreMoney {
                pre_money,
                investment: self.investment,
            }),
            (None, Some(target_pct)) => Ok(RoundTerms::TargetOwnership {
                investment: self.investment,
                target_pct,
            }),
            _ => Err(CliError::InvalidArgument(
                "exactly one of --pre-money or --target-ownership is required".to_string(),
            )),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RoundReport<'a> {
    pricing: &'a RoundPricing,
    price_per_share: f64,
    new_shares: f64,
    summary: &'a [SummaryEntry],
}

/// Run the round command
pub fn run(config: &WaterfallConfig, args: &RoundArgs<'_>, format: OutputFormat) -> Result<()> {
    require_json_or_table("round", format)?;
    let terms = args.terms()?;
    let request = RequestFile::load(args.input)?;
    let exit = request.exit_amount(args.exit_amount)?;
    let table = request
        .waterfall_request(args.exit_amount)?
        .cap_table(config.reference_policy())?;

    // New money ranks ahead of every existing class unless told otherwise
    let seniority = args.seniority.unwrap_or_else(|| {
        table
            .share_classes()
            .iter()
            .map(|sc| sc.seniority)
            .min()
            .map_or(1, |s| s - 1)
    });
    let next_class_id = table
        .share_classes()
        .iter()
        .map(|sc| sc.id.value())
        .max()
        .unwrap_or(0)
        + 1;
    let next_tx_id = table
        .transactions()
        .iter()
        .map(|tx| tx.id.value())
        .max()
        .unwrap_or(0)
        + 1;
    let pref_type = if args.participating {
        PreferenceType::Participating
    } else {
        PreferenceType::NonParticipating
    };
    let mut new_class = ShareClass::preferred(
        next_class_id,
        args.class_name.clone(),
        seniority,
        args.liquidation_pref,
        pref_type,
    );
    new_class.cap = args.cap;

    info!("Pricing {} round for {}", terms.name(), args.class_name);
    let issued = issue_round(&table, new_class, terms, next_tx_id)?;
    let summary = config.engine().compute_summary(&issued.table, exit);

    let mut out = stdout();
    match format {
        OutputFormat::Json => write_json(
            &mut out,
            &RoundReport {
                pricing: &issued.pricing,
                price_per_share: issued.price_per_share,
                new_shares: issued.new_shares,
                summary: &summary.entries,
            },
        )?,
        _ => {
            write_round_table(
                &mut out,
                &issued.pricing,
                issued.price_per_share,
                issued.new_shares,
            )?;
            writeln!(out)?;
            writeln!(out, "Post-round waterfall at {}:", exit)?;
            write_summary_table(&mut out, &summary.entries)?;
        }
    }
    finish(out)
}
