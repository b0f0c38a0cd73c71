//! Detailed command implementation
//!
//! Prints every step of the waterfall at one exit amount.

use std::path::Path;

use captable_waterfall::api::handle_detailed;
use tracing::info;

use super::{finish, require_json_or_table, stdout};
use crate::config::{OutputFormat, WaterfallConfig};
use crate::input::RequestFile;
use crate::output::{write_json, write_steps_table};
use crate::Result;

/// Run the detailed command
pub fn run(
    config: &WaterfallConfig,
    input: Option<&Path>,
    exit_amount: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    require_json_or_table("detailed", format)?;
    let request = RequestFile::load(input)?.waterfall_request(exit_amount)?;
    info!("Computing detailed waterfall at {}", request.exit_amount);

    let steps = handle_detailed(&config.engine(), &request, config.reference_policy())?;

    let mut out = stdout();
    match format {
        OutputFormat::Json => write_json(&mut out, &steps)?,
        _ => write_steps_table(&mut out, &steps)?,
    }
    finish(out)
}
