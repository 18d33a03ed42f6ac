use apbs_opal::workflows::error::WorkflowError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Exit status for invalid usage and configuration.
pub const USAGE_EXIT_CODE: i32 = 13;
/// Exit status for every other failure.
pub const FAILURE_EXIT_CODE: i32 = 1;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("APBS exited with status {code}")]
    SolverExit { code: i32 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::Argument(_) | CliError::FileParsing { .. } => {
                USAGE_EXIT_CODE
            }
            CliError::Workflow(WorkflowError::Deck(_) | WorkflowError::InvalidDeckPath(_)) => {
                USAGE_EXIT_CODE
            }
            CliError::SolverExit { code } => *code,
            _ => FAILURE_EXIT_CODE,
        }
    }
}
