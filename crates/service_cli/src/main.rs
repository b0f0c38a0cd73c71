//! Exit Waterfall CLI - Command Line Operations for Exit Proceeds Analysis
//!
//! This is the operational entry point for the waterfall engine.
//!
//! # Commands
//!
//! - `waterfall detailed --input <file>` - Every allocation step at one exit amount
//! - `waterfall summary --input <file>` - Payout per share class
//! - `waterfall calculate --input <file>` - Steps and summary from one run
//! - `waterfall sweep --input <file>` - Payouts across a grid of exit values
//! - `waterfall round --investment <amount> --pre-money <amount>` - Price a new round
//! - `waterfall check` - Validate configuration and a request file
//! - `waterfall init` - Write the demo cap table as a request file
//! - `waterfall demo` - Walk through the demo cap table
//!
//! Without `--input`, commands run against the built-in demo cap table.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod input;
mod output;

pub use error::{CliError, Result};

use commands::round::RoundArgs;
use commands::sweep::SweepArgs;
use config::{build_config, CliArgs as ConfigCliArgs, OutputFormat, WaterfallConfig};

/// Exit Waterfall CLI
#[derive(Parser)]
#[command(name = "waterfall")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Seniority order (ascending, descending)
    #[arg(long, global = true)]
    seniority_order: Option<String>,

    /// Participation mode (single-pass, fixed-point)
    #[arg(long, global = true)]
    participation_mode: Option<String>,

    /// Handling of transactions naming unknown classes (strict, lenient)
    #[arg(long, global = true)]
    reference_policy: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every allocation step at one exit amount
    Detailed {
        /// Request file (JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Exit amount, overriding the request file
        #[arg(short, long)]
        exit_amount: Option<f64>,

        /// Output format (json, table)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Print the payout of each share class
    Summary {
        /// Request file (JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Exit amount, overriding the request file
        #[arg(short, long)]
        exit_amount: Option<f64>,

        /// Output format (json, table)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Print detailed steps and summary from a single run
    Calculate {
        /// Request file (JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Exit amount, overriding the request file
        #[arg(short, long)]
        exit_amount: Option<f64>,

        /// Output format (json, table)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Sweep class payouts across a grid of exit values
    Sweep {
        /// Request file (JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Upper end of the grid; defaults to twice the exit amount
        #[arg(short, long)]
        max_exit_amount: Option<f64>,

        /// Number of grid intervals
        #[arg(short, long)]
        num_points: Option<usize>,

        /// Output format (json, table, csv)
        #[arg(short, long)]
        format: Option<String>,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Price a new financing round and show the post-round waterfall
    Round {
        /// Request file (JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Name of the new share class
        #[arg(long, default_value = "New Round")]
        class_name: String,

        /// New money invested
        #[arg(long)]
        investment: f64,

        /// Pre-money valuation
        #[arg(long)]
        pre_money: Option<f64>,

        /// Target post-money ownership of the new investor, in percent
        #[arg(long)]
        target_ownership: Option<f64>,

        /// Liquidation preference multiple of the new class
        #[arg(long, default_value = "1.0")]
        liquidation_pref: f64,

        /// Give the new class a participation right
        #[arg(long)]
        participating: bool,

        /// Participation cap multiple
        #[arg(long)]
        cap: Option<f64>,

        /// Seniority rank; defaults to ahead of every existing class
        #[arg(long)]
        seniority: Option<i64>,

        /// Exit amount for the post-round waterfall
        #[arg(short, long)]
        exit_amount: Option<f64>,

        /// Output format (json, table)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Check configuration and optionally validate a request file
    Check {
        /// Request file (JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Write the demo cap table as a request file
    Init {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Run the demo cap table walkthrough
    Demo,
}

impl From<&Cli> for ConfigCliArgs {
    fn from(cli: &Cli) -> Self {
        ConfigCliArgs {
            config_file: cli.config.clone(),
            log_level: cli.log_level.clone(),
            verbose: cli.verbose,
            seniority_order: cli.seniority_order.clone(),
            participation_mode: cli.participation_mode.clone(),
            reference_policy: cli.reference_policy.clone(),
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve_format(flag: Option<&str>, config: &WaterfallConfig) -> Result<OutputFormat> {
    match flag {
        Some(s) => Ok(OutputFormat::from_str(s)?),
        None => Ok(config.default_format),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&ConfigCliArgs::from(&cli)).context("failed to load configuration")?;

    init_tracing(config.log_level.as_filter_str());
    debug!(?config, "configuration loaded");

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Detailed {
            input,
            exit_amount,
            format,
        } => {
            let format = resolve_format(format.as_deref(), &config)?;
            commands::detailed::run(&config, input.as_deref(), exit_amount, format)?
        }
        Commands::Summary {
            input,
            exit_amount,
            format,
        } => {
            let format = resolve_format(format.as_deref(), &config)?;
            commands::summary::run(&config, input.as_deref(), exit_amount, format)?
        }
        Commands::Calculate {
            input,
            exit_amount,
            format,
        } => {
            let format = resolve_format(format.as_deref(), &config)?;
            commands::calculate::run(&config, input.as_deref(), exit_amount, format)?
        }
        Commands::Sweep {
            input,
            max_exit_amount,
            num_points,
            format,
            output,
        } => {
            let format = resolve_format(format.as_deref(), &config)?;
            let args = SweepArgs {
                input: input.as_deref(),
                max_exit_amount,
                num_points,
                output: output.as_deref(),
            };
            commands::sweep::run(&config, &args, format)?
        }
        Commands::Round {
            input,
            class_name,
            investment,
            pre_money,
            target_ownership,
            liquidation_pref,
            participating,
            cap,
            seniority,
            exit_amount,
            format,
        } => {
            let format = resolve_format(format.as_deref(), &config)?;
            let args = RoundArgs {
                input: input.as_deref(),
                class_name,
                investment,
                pre_money,
                target_ownership,
                liquidation_pref,
                participating,
                cap,
                seniority,
                exit_amount,
            };
            commands::round::run(&config, &args, format)?
        }
        Commands::Check { input } => commands::check::run(&config, input.as_deref())?,
        Commands::Init { output, force } => commands::init::run(output.as_deref(), force)?,
        Commands::Demo => commands::demo::run(&config)?,
    }

    Ok(())
}
