use super::describe_outcome;
use crate::config::AppConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use apbs_opal::remote::progress::ProgressReporter;
use apbs_opal::workflows::submit;
use std::path::Path;
use tracing::info;

pub fn run(deck: &Path, config: &AppConfig) -> Result<()> {
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Launching remote APBS job");
    info!("Submitting {:?}", deck);
    let outcome = submit::run(deck, &config.solver, &config.client, reporter)?;
    info!("Remote run finished for job {}.", outcome.job_id());

    print!("{}", describe_outcome(&outcome));
    Ok(())
}
