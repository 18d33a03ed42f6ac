use super::SolverOptions;
use super::error::WorkflowError;
use crate::core::io::deck::DeckSummary;
use crate::remote::admission::{self, Admission};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::{info, instrument, warn};

/// Name of the solver executable on `PATH` and inside an installation's `bin` directory.
pub const EXECUTABLE_NAME: &str = "apbs";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalOptions {
    /// Explicit solver executable.
    pub executable: Option<PathBuf>,
    /// Root of an APBS installation containing `bin/apbs`.
    pub library_location: Option<PathBuf>,
    /// Refuse grids whose estimated memory reaches this many megabytes.
    pub memory_ceiling_mb: Option<u64>,
}

/// A solver invocation that passed the admission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRun {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl fmt::Display for LocalRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

pub fn resolve_executable(options: &LocalOptions) -> PathBuf {
    if let Some(executable) = &options.executable {
        return executable.clone();
    }
    match &options.library_location {
        Some(root) => root.join("bin").join(EXECUTABLE_NAME),
        None => PathBuf::from(EXECUTABLE_NAME),
    }
}

/// Solver arguments for a local run: logging options, then the deck path.
pub fn command_args(deck_path: &Path, options: &SolverOptions) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(file) = &options.output_file {
        args.push(format!("--output-file={file}"));
    }
    if let Some(format) = options.output_format {
        args.push(format!("--output-format={format}"));
    }
    args.push(deck_path.display().to_string());
    args
}

/// Scans the deck and applies the memory admission guard.
#[instrument(skip_all, name = "plan_local_run", fields(deck = %deck_path.display()))]
pub fn plan(
    deck_path: &Path,
    solver_options: &SolverOptions,
    local_options: &LocalOptions,
) -> Result<LocalRun, WorkflowError> {
    let deck = DeckSummary::from_path(deck_path)?;
    match &deck.grid {
        Some(grid) => {
            if let Admission::Refused {
                required_mb,
                ceiling_mb,
            } = admission::check(grid, local_options.memory_ceiling_mb)
            {
                return Err(WorkflowError::InsufficientMemory {
                    required_mb,
                    ceiling_mb,
                });
            }
            info!(
                estimate_mb = admission::estimate_megabytes(grid),
                "Memory estimate within limits."
            );
        }
        None if local_options.memory_ceiling_mb.is_some() => {
            warn!("Deck has no 'dime' directive; skipping the memory estimate.");
        }
        None => {}
    }

    Ok(LocalRun {
        program: resolve_executable(local_options),
        args: command_args(deck_path, solver_options),
    })
}

/// Runs the solver to completion, inheriting the standard streams.
pub fn run(local: &LocalRun) -> Result<ExitStatus, WorkflowError> {
    info!("Running: {local}");
    Command::new(&local.program)
        .args(&local.args)
        .status()
        .map_err(|source| WorkflowError::Launch {
            program: local.program.display().to_string(),
            source,
        })
}
