//! Calculate command implementation
//!
//! Prints the detailed steps and the summary from a single engine run, the
//! same payload a calculation endpoint would return.

use std::io::Write;
use std::path::Path;

use captable_waterfall::api::handle_calculate;
use tracing::info;

use super::{finish, require_json_or_table, stdout};
use crate::config::{OutputFormat, WaterfallConfig};
use crate::input::RequestFile;
use crate::output::{write_json, write_steps_table, write_summary_table};
use crate::Result;

/// Run the calculate command
pub fn run(
    config: &WaterfallConfig,
    input: Option<&Path>,
    exit_amount: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    require_json_or_table("calculate", format)?;
    let request = RequestFile::load(input)?.waterfall_request(exit_amount)?;
    info!("Calculating waterfall at {}", request.exit_amount);

    let response = handle_calculate(&config.engine(), &request, config.reference_policy())?;

    let mut out = stdout();
    match format {
        OutputFormat::Json => write_json(&mut out, &response)?,
        _ => {
            write_steps_table(&mut out, &response.detailed)?;
            writeln!(out)?;
            write_summary_table(&mut out, &response.summary)?;
        }
    }
    finish(out)
}
