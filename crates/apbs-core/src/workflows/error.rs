use crate::core::io::deck::DeckError;
use crate::remote::error::{ClientError, ServiceError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Failed to read input deck: {0}")]
    Deck(#[from] DeckError),

    #[error("Failed to read input file '{path}': {source}", path = path.display())]
    InputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input deck path '{0}' has no file name")]
    InvalidDeckPath(PathBuf),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(
        "Job will use too much memory to complete calculation ({required_mb} MB required, ceiling {ceiling_mb} MB)"
    )]
    InsufficientMemory { required_mb: u64, ceiling_mb: u64 },

    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
