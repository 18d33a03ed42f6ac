use super::SolverOptions;
use super::error::WorkflowError;
use crate::core::io::deck::DeckSummary;
use crate::core::models::job::{InputFile, JobRequest};
use crate::remote::client::{JobClient, JobOutcome};
use crate::remote::config::{ClientConfig, Route};
use crate::remote::http::HttpJobService;
use crate::remote::progress::ProgressReporter;
use crate::remote::service::JobService;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Everything needed to launch one deck, resolved before any network activity.
#[derive(Debug, Clone)]
pub struct SubmissionPlan {
    pub deck: DeckSummary,
    pub route: Route,
    pub request: JobRequest,
}

/// The argument string passed to the remote solver: logging options first, then the deck.
///
/// The output format is only forwarded together with an output file.
pub fn argument_string(deck_name: &str, options: &SolverOptions) -> String {
    let mut args = Vec::new();
    if let Some(file) = &options.output_file {
        args.push(format!("--output-file={file}"));
        if let Some(format) = options.output_format {
            args.push(format!("--output-format={format}"));
        }
    }
    args.push(deck_name.to_string());
    args.join(" ")
}

/// Reads the deck and every file its `read` block references, and chooses an endpoint.
///
/// Bundled files are named by their bare file name. Their contents are read relative to
/// the directory containing the deck.
#[instrument(skip_all, name = "plan_submission", fields(deck = %deck_path.display()))]
pub fn plan(
    deck_path: &Path,
    options: &SolverOptions,
    config: &ClientConfig,
) -> Result<SubmissionPlan, WorkflowError> {
    let deck_name = deck_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| WorkflowError::InvalidDeckPath(deck_path.to_path_buf()))?;
    let directory = deck_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let contents = read_input(deck_path)?;
    let deck = DeckSummary::scan(&mut Cursor::new(&contents))?;

    let auxiliary = deck
        .auxiliary_files
        .iter()
        .map(|name| Ok(InputFile::new(name.clone(), read_input(&directory.join(name))?)))
        .collect::<Result<Vec<_>, WorkflowError>>()?;

    let process_count = u32::try_from(deck.process_grid.process_count()).unwrap_or(u32::MAX);
    let request = JobRequest::new(
        argument_string(&deck_name, options),
        process_count,
        InputFile::new(deck_name, contents),
        auxiliary,
    );
    let route = config.route(&deck);
    info!(
        endpoint = %route.endpoint,
        parallel = route.parallel,
        files = request.files().len(),
        "Prepared job bundle."
    );

    Ok(SubmissionPlan {
        deck,
        route,
        request,
    })
}

/// Plans and runs a deck against the HTTP service chosen by the plan's route.
pub fn run<'a>(
    deck_path: &Path,
    options: &SolverOptions,
    config: &'a ClientConfig,
    reporter: ProgressReporter<'a>,
) -> Result<JobOutcome, WorkflowError> {
    let plan = plan(deck_path, options, config)?;
    let service = HttpJobService::new(&plan.route.endpoint)?;
    run_with(service, &plan, config, reporter)
}

pub fn run_with<'a, S: JobService>(
    service: S,
    plan: &SubmissionPlan,
    config: &'a ClientConfig,
    reporter: ProgressReporter<'a>,
) -> Result<JobOutcome, WorkflowError> {
    let client = JobClient::new(service, config).with_reporter(reporter);
    Ok(client.run(&plan.request, plan.route.check_version)?)
}

fn read_input(path: &Path) -> Result<Vec<u8>, WorkflowError> {
    fs::read(path).map_err(|source| WorkflowError::InputFile {
        path: path.to_path_buf(),
        source,
    })
}
