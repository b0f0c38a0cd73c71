//! Init command implementation
//!
//! Writes the demo cap table as a request file to start editing from.

use std::path::Path;

use tracing::info;

use super::{finish, stdout};
use crate::input::RequestFile;
use crate::output::write_json;
use crate::{CliError, Result};

/// Run the init command
pub fn run(output: Option<&Path>, force: bool) -> Result<()> {
    let request = RequestFile::demo();
    match output {
        Some(path) => {
            if path.exists() && !force {
                return Err(CliError::InvalidArgument(format!(
                    "{} already exists; pass --force to overwrite",
                    path.display()
                )));
            }
            let mut file = std::fs::File::create(path)?;
            write_json(&mut file, &request)?;
            info!("Wrote request file to: {}", path.display());
            finish(file)
        }
        None => {
            let mut out = stdout();
            write_json(&mut out, &request)?;
            finish(out)
        }
    }
}
