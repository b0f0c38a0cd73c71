//! Check command implementation
//!
//! Validates the resolved configuration and, optionally, a request file.

use std::path::Path;

use captable_core::money::format_currency;
use tracing::{info, warn};

use crate::config::WaterfallConfig;
use crate::input::RequestFile;
use crate::Result;

/// Run the check command
pub fn run(config: &WaterfallConfig, input: Option<&Path>) -> Result<()> {
    println!("Configuration");
    println!("  Log level:          {}", config.log_level);
    println!("  Default format:     {}", config.default_format.name());
    println!("  Seniority order:    {}", config.engine.seniority_order.name());
    println!("  Participation mode: {}", config.engine.participation_mode.name());
    println!("  Residual tolerance: {}", config.engine.residual_tolerance);
    println!("  Reference policy:   {}", config.reference_policy().name());
    println!("  Sweep points:       {}", config.sweep.num_points);
    println!("  Parallel threshold: {}", config.sweep.parallel_threshold);

    let Some(path) = input else {
        info!("No input file given; configuration check only");
        return Ok(());
    };

    let request = RequestFile::load(Some(path))?;
    let table = request
        .waterfall_request(None)?
        .cap_table(config.reference_policy())?;

    println!();
    println!("Cap table: {}", path.display());
    println!("  Share classes:      {}", table.share_classes().len());
    println!("  Active classes:     {}", table.active_share_classes().count());
    println!("  Transactions:       {}", table.transactions().len());
    println!("  Total shares:       {:.0}", table.total_shares());

    match table.ownership() {
        Some(ownership) => {
            for (name, fraction) in ownership.iter() {
                println!("    {:<20} {:>7.2}%", name, fraction * 100.0);
            }
        }
        None => warn!("Cap table has no shares; every exit will be retained"),
    }

    let holdings = table.holdings();
    for (class, h) in table.share_classes().iter().zip(&holdings) {
        if class.is_preferred() && h.is_active() {
            println!(
                "  {:<20} preference {}",
                class.name,
                format_currency(h.investment * class.liquidation_pref)
            );
        }
    }

    let orphaned = table.orphaned_transactions().count();
    if orphaned > 0 {
        println!("  Orphaned transactions: {}", orphaned);
    }

    println!();
    println!("OK");
    Ok(())
}
