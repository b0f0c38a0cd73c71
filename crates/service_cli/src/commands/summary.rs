//! Summary command implementation
//!
//! Prints the payout of each share class at one exit amount.

use std::path::Path;

use captable_waterfall::api::handle_summary;
use tracing::info;

use super::{finish, require_json_or_table, stdout};
use crate::config::{OutputFormat, WaterfallConfig};
use crate::input::RequestFile;
use crate::output::{write_json, write_summary_table};
use crate::Result;

/// Run the summary command
pub fn run(
    config: &WaterfallConfig,
    input: Option<&Path>,
    exit_amount: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    require_json_or_table("summary", format)?;
    let request = RequestFile::load(input)?.waterfall_request(exit_amount)?;
    info!("Computing summary waterfall at {}", request.exit_amount);

    let entries = handle_summary(&config.engine(), &request, config.reference_policy())?;

    let mut out = stdout();
    match format {
        OutputFormat::Json => write_json(&mut out, &entries)?,
        _ => write_summary_table(&mut out, &entries)?,
    }
    finish(out)
}
