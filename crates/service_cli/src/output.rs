//! Rendering of command results as tables, JSON or CSV.

use std::io::Write;

use captable_core::money::format_currency;
use captable_waterfall::{ExitDistributionSweep, RoundPricing, SummaryEntry, WaterfallStep};
use serde::Serialize;

use crate::Result;

const RULE: &str = "------------------------------------------------------------------------";

/// Pretty-printed JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Detailed waterfall as a table.
pub fn write_steps_table<W: Write>(out: &mut W, steps: &[WaterfallStep]) -> Result<()> {
    writeln!(out, "{:<44} {:>16} {:>16}", "Step", "Amount", "Remaining")?;
    writeln!(out, "{}", RULE)?;
    for step in steps {
        let amount = if step.is_starting {
            format_currency(step.value)
        } else {
            format_currency(-step.payout())
        };
        writeln!(
            out,
            "{:<44} {:>16} {:>16}",
            step.label,
            amount,
            format_currency(step.remaining_proceeds)
        )?;
    }
    Ok(())
}

/// Summary entries as a table.
pub fn write_summary_table<W: Write>(out: &mut W, entries: &[SummaryEntry]) -> Result<()> {
    writeln!(
        out,
        "{:<22} {:>16} {:>8} {:>16} {:>16}",
        "Share Class", "Payout", "%", "Preference", "Pro Rata"
    )?;
    writeln!(out, "{}", RULE)?;
    for entry in entries {
        let c = &entry.components;
        let pro_rata = c.participation + c.common_distribution + c.additional_distribution;
        writeln!(
            out,
            "{:<22} {:>16} {:>7.2}% {:>16} {:>16}",
            entry.name,
            format_currency(entry.payout),
            entry.percentage,
            format_currency(c.liquidation_preference),
            format_currency(pro_rata)
        )?;
    }
    Ok(())
}

/// Sweep as a table, one row per exit value.
pub fn write_sweep_table<W: Write>(out: &mut W, sweep: &ExitDistributionSweep) -> Result<()> {
    write!(out, "{:>16}", "Exit")?;
    for name in &sweep.active_share_classes {
        write!(out, " {:>16}", name)?;
    }
    writeln!(out, " {:>16}", "Retained")?;
    writeln!(out, "{}", RULE)?;
    for (i, exit) in sweep.exit_values.iter().enumerate() {
        write!(out, "{:>16}", format_currency(*exit))?;
        for value in &sweep.distributions[i] {
            write!(out, " {:>16}", format_currency(*value))?;
        }
        writeln!(out, " {:>16}", format_currency(sweep.retained[i]))?;
    }
    Ok(())
}

/// Sweep as CSV with an `exit` column, one column per class and `retained`.
pub fn write_sweep_csv<W: Write>(out: W, sweep: &ExitDistributionSweep) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = Vec::with_capacity(sweep.active_share_classes.len() + 2);
    header.push("exit".to_string());
    header.extend(sweep.active_share_classes.iter().cloned());
    header.push("retained".to_string());
    writer.write_record(&header)?;

    for (i, exit) in sweep.exit_values.iter().enumerate() {
        let mut record = Vec::with_capacity(header.len());
        record.push(exit.to_string());
        record.extend(sweep.distributions[i].iter().map(|v| v.to_string()));
        record.push(sweep.retained[i].to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Round pricing as a key/value table.
pub fn write_round_table<W: Write>(
    out: &mut W,
    pricing: &RoundPricing,
    price_per_share: f64,
    new_shares: f64,
) -> Result<()> {
    let rows = [
        ("Pre-money valuation", format_currency(pricing.pre_money)),
        ("Investment", format_currency(pricing.investment)),
        ("Post-money valuation", format_currency(pricing.post_money)),
        ("Price per share", format_currency(price_per_share)),
        ("New shares", format!("{:.0}", new_shares)),
        ("New investor ownership", format!("{:.2}%", pricing.new_ownership_pct)),
        ("Existing ownership", format!("{:.2}%", pricing.existing_ownership_pct)),
        ("Dilution", format!("{:.2}%", pricing.dilution_pct)),
    ];
    for (label, value) in rows {
        writeln!(out, "{:<24} {:>18}", label, value)?;
    }
    Ok(())
}
