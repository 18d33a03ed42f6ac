use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{AppConfig, Mode};
use crate::cli::Cli;
use crate::error::{CliError, Result};
use apbs_opal::core::models::job::JobId;
use apbs_opal::remote::config::{ClientConfigBuilder, FetchPolicy, VersionPolicy};
use apbs_opal::workflows::SolverOptions;
use apbs_opal::workflows::local::LocalOptions;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Layers built-in defaults, the configuration file and command-line flags, in increasing
/// order of precedence.
pub fn build_config(cli: &Cli) -> Result<AppConfig> {
    let file_config = FileConfig::discover(cli.config.as_deref())?;
    build_from_parts(cli, file_config)
}

fn build_from_parts(cli: &Cli, file_config: FileConfig) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();
    let service = file_config.service.unwrap_or_default();
    let polling = file_config.polling.unwrap_or_default();
    let local = file_config.local.unwrap_or_default();

    let mode = resolve_mode(cli)?;
    debug!("Resolved run mode: {:?}", mode);

    let expected_version = if service.version_check.unwrap_or(defaults.version_check) {
        Some(service.expected_version.unwrap_or(defaults.expected_version))
    } else {
        None
    };

    let fetch = if cli.no_fetch {
        FetchPolicy::ListOnly
    } else {
        FetchPolicy::Download {
            directory: cli
                .fetch
                .clone()
                .unwrap_or_else(|| PathBuf::from(&defaults.fetch_directory)),
        }
    };

    let client = ClientConfigBuilder::new()
        .default_endpoint(service.default_endpoint.unwrap_or(defaults.default_endpoint))
        .parallel_endpoint(service.parallel_endpoint.unwrap_or(defaults.parallel_endpoint))
        .override_endpoint(cli.service_location.clone())
        .expected_version(expected_version)
        .version_policy(VersionPolicy::Warn)
        .poll_interval(Duration::from_secs(
            polling.interval_secs.unwrap_or(defaults.poll_interval_secs),
        ))
        .max_attempts(polling.max_attempts)
        .fetch(fetch)
        .blocking(!cli.non_blocking)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        mode,
        solver: SolverOptions {
            output_file: cli.output_file.clone(),
            output_format: cli.output_format.map(Into::into),
        },
        client,
        local: LocalOptions {
            executable: local.executable,
            library_location: cli.library_location.clone(),
            memory_ceiling_mb: local.memory_ceiling_mb,
        },
    })
}

fn resolve_mode(cli: &Cli) -> Result<Mode> {
    if let Some(job_id) = &cli.job_id {
        if job_id.trim().is_empty() {
            return Err(CliError::Argument("--job-id must not be empty".to_string()));
        }
        return Ok(Mode::Status {
            job_id: JobId::new(job_id.trim()),
        });
    }

    let deck = cli
        .deck
        .clone()
        .ok_or_else(|| CliError::Argument("an input deck is required".to_string()))?;
    if cli.local {
        Ok(Mode::Local { deck })
    } else {
        Ok(Mode::Remote { deck })
    }
}
