//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

use std::io::Write;

use crate::config::OutputFormat;
use crate::{CliError, Result};

pub mod calculate;
pub mod check;
pub mod demo;
pub mod detailed;
pub mod init;
pub mod round;
pub mod summary;
pub mod sweep;

/// Rejects formats a command cannot render.
fn require_json_or_table(command: &str, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Csv {
        return Err(CliError::InvalidArgument(format!(
            "{} supports json and table output only",
            command
        )));
    }
    Ok(())
}

/// Locked stdout, flushed by the caller.
fn stdout() -> std::io::StdoutLock<'static> {
    std::io::stdout().lock()
}

fn finish<W: Write>(mut out: W) -> Result<()> {
    out.flush()?;
    Ok(())
}
