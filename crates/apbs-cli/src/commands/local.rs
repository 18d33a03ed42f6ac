use crate::config::AppConfig;
use crate::error::{CliError, Result};
use apbs_opal::workflows::local;
use std::path::Path;
use tracing::{info, warn};

pub fn run(deck: &Path, config: &AppConfig) -> Result<()> {
    let invocation = local::plan(deck, &config.solver, &config.local)?;

    println!("Running:  {invocation}...");
    let status = local::run(&invocation)?;
    info!("APBS finished with {}", status);

    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(CliError::SolverExit { code }),
        None => {
            warn!("APBS was terminated by a signal.");
            Err(CliError::SolverExit { code: 1 })
        }
    }
}
