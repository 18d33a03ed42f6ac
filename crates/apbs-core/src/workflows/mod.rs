//! # Workflows Module
//!
//! High-level entry points that tie the core parsers, the remote client and the solver
//! driver together.
//!
//! - **Submission** ([`submit`]) - Assembles a job bundle from a deck on disk, routes it to
//!   an endpoint and runs it to completion (or detaches)
//! - **Status Check** ([`status`]) - Resumes a previously submitted job from its identifier
//! - **Local Runs** ([`local`]) - Prepares and launches a local solver executable behind the
//!   memory admission guard

pub mod error;
pub mod local;
pub mod status;
pub mod submit;

use std::fmt;
use std::str::FromStr;

/// Output logging format understood by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Flat,
    Xml,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Flat => "flat",
            OutputFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat" => Ok(OutputFormat::Flat),
            "xml" => Ok(OutputFormat::Xml),
            other => Err(format!("invalid output format '{other}' (expected xml or flat)")),
        }
    }
}

/// Solver options forwarded on the command line of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverOptions {
    pub output_file: Option<String>,
    pub output_format: Option<OutputFormat>,
}
