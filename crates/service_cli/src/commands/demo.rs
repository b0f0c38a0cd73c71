//! Demo command for the three-class example cap table.
//!
//! Walks through the default fixture (Series A 1x participating, Series B
//! 1.5x participating capped at 3x, Common) at a $10M exit:
//! - Liquidation preferences paid in seniority order
//! - Single-pass participation and the residual split to common
//! - The same exit under fixed-point participation, where Series B's cap binds
//! - A coarse exit sweep up to $20M
//!
//! # Expected Output
//!
//! ```text
//! [Demo] Series A   $2,600,000
//! [Demo] Series B   $5,346,666.67
//! [Demo] Common     $2,053,333.33
//! ```

use captable_core::money::format_currency;
use captable_core::presets::{default_cap_table, DEFAULT_EXIT_AMOUNT, DEFAULT_SWEEP_MULTIPLE};
use captable_core::ExitAmount;
use captable_waterfall::{EngineConfig, ParticipationMode, SweepConfig, WaterfallEngine};

use crate::config::WaterfallConfig;
use crate::output::{write_steps_table, write_summary_table, write_sweep_table};
use crate::Result;

/// Runs the waterfall demonstration.
///
/// # Returns
///
/// `Ok(())` on success, `Err` on failure.
pub fn run(config: &WaterfallConfig) -> Result<()> {
    println!("========================================");
    println!("Exit Waterfall Demo");
    println!("========================================");
    println!();

    let table = default_cap_table()?;
    let exit = ExitAmount::new(DEFAULT_EXIT_AMOUNT)?;
    let engine = config.engine();
    let mut out = std::io::stdout().lock();

    // Step 1: Detailed waterfall
    println!("[Demo] Detailed waterfall at {}:", format_currency(exit.value()));
    let steps = engine.compute_detailed(&table, exit);
    write_steps_table(&mut out, &steps)?;
    println!();

    // Step 2: Summary
    println!("[Demo] Payout by share class:");
    let summary = engine.compute_summary(&table, exit);
    write_summary_table(&mut out, &summary.entries)?;
    println!();

    // Step 3: Fixed-point participation
    let fixed = WaterfallEngine::new(EngineConfig {
        participation_mode: ParticipationMode::FixedPoint,
        ..*engine.config()
    });
    let fixed_summary = fixed.compute_summary(&table, exit);
    println!("[Demo] Fixed-point participation (capped excess re-split):");
    for entry in summary.iter() {
        println!(
            "  {:<10} {:>16} -> {:>16}",
            entry.name,
            format_currency(entry.payout),
            format_currency(fixed_summary.payout_for(&entry.name))
        );
    }
    println!();

    // Step 4: Exit sweep
    let max_exit = ExitAmount::new(DEFAULT_EXIT_AMOUNT * DEFAULT_SWEEP_MULTIPLE)?;
    let sweep = engine.compute_exit_distribution(
        &table,
        max_exit,
        &SweepConfig::with_points(4).with_parallel_threshold(config.sweep.parallel_threshold),
    )?;
    println!("[Demo] Exit sweep:");
    write_sweep_table(&mut out, &sweep)?;
    println!();

    println!("========================================");
    println!("Demo completed successfully!");
    println!("========================================");

    Ok(())
}
