use apbs_opal::core::models::job::JobId;
use apbs_opal::remote::config::ClientConfig;
use apbs_opal::workflows::SolverOptions;
use apbs_opal::workflows::local::LocalOptions;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Submit the deck to a remote service.
    Remote { deck: PathBuf },
    /// Check on, and fetch the results of, an earlier submission.
    Status { job_id: JobId },
    /// Run the solver executable on this machine.
    Local { deck: PathBuf },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mode: Mode,
    pub solver: SolverOptions,
    pub client: ClientConfig,
    pub local: LocalOptions,
}
