//! Sweep command implementation
//!
//! Evaluates class payouts across a grid of exit values, for charting.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use captable_waterfall::api::handle_exit_distribution;
use captable_waterfall::ExitDistributionSweep;
use tracing::info;

use super::{finish, stdout};
use crate::config::{OutputFormat, WaterfallConfig};
use crate::input::RequestFile;
use crate::output::{write_json, write_sweep_csv, write_sweep_table};
use crate::Result;

/// Sweep command options
#[derive(Debug, Clone, Default)]
pub struct SweepArgs<'a> {
    pub input: Option<&'a Path>,
    pub max_exit_amount: Option<f64>,
    pub num_points: Option<usize>,
    pub output: Option<&'a Path>,
}

/// Run the sweep command
pub fn run(config: &WaterfallConfig, args: &SweepArgs<'_>, format: OutputFormat) -> Result<()> {
    let request =
        RequestFile::load(args.input)?.distribution_request(args.max_exit_amount, args.num_points)?;
    info!(
        "Sweeping exit values up to {} ({} intervals)",
        request.max_exit_amount,
        request.num_points.unwrap_or(config.sweep.num_points)
    );

    let sweep = handle_exit_distribution(
        &config.engine(),
        &request,
        &config.sweep,
        config.reference_policy(),
    )?;

    match args.output {
        Some(path) => {
            info!("Writing sweep to: {}", path.display());
            let mut out = BufWriter::new(File::create(path)?);
            render(&mut out, &sweep, format)?;
            finish(out)
        }
        None => {
            let mut out = stdout();
            render(&mut out, &sweep, format)?;
            finish(out)
        }
    }
}

fn render<W: Write>(out: &mut W, sweep: &ExitDistributionSweep, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, sweep),
        OutputFormat::Csv => write_sweep_csv(out, sweep),
        OutputFormat::Table => write_sweep_table(out, sweep),
    }
}
