use super::describe_outcome;
use crate::config::AppConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use apbs_opal::core::models::job::JobId;
use apbs_opal::remote::progress::ProgressReporter;
use apbs_opal::workflows::status;
use tracing::info;

pub fn run(job_id: &JobId, config: &AppConfig) -> Result<()> {
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!(
        "Checking job {} at {}",
        job_id,
        status::resume_endpoint(&config.client)
    );
    let outcome = status::check(job_id.clone(), &config.client, reporter)?;

    print!("{}", describe_outcome(&outcome));
    Ok(())
}
