use super::lifecycle::LifecycleState;
use crate::core::models::job::JobId;
use crate::core::models::status::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of a single call against the remote service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Malformed response from service: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Remote service call failed: {0}")]
    Service(#[from] ServiceError),

    #[error(
        "The remote server version of APBS ({remote}) does not match the local version ({local})"
    )]
    VersionMismatch { remote: String, local: String },

    #[error("The calculation failed: {message}")]
    JobFailed { job_id: JobId, message: String },

    #[error("Job {job_id} has not been completed yet (status: {code})")]
    NotReady { job_id: JobId, code: StatusCode },

    #[error("Job {job_id} did not reach a terminal status after {attempts} status queries")]
    PollTimeout { job_id: JobId, attempts: u32 },

    #[error("Failed to write result file '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No job identifier has been obtained yet")]
    NotSubmitted,

    #[error("Invalid job lifecycle transition from {from} to {to}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },
}
