use super::error::WorkflowError;
use crate::core::models::job::JobId;
use crate::remote::client::{JobClient, JobOutcome};
use crate::remote::config::ClientConfig;
use crate::remote::http::HttpJobService;
use crate::remote::progress::ProgressReporter;
use crate::remote::service::JobService;

/// The endpoint queried when resuming a job: the explicit override, else the default
/// service.
pub fn resume_endpoint(config: &ClientConfig) -> &str {
    config
        .endpoints
        .override_endpoint
        .as_deref()
        .unwrap_or(&config.endpoints.default_endpoint)
}

/// Checks a previously submitted job once and retrieves its outputs if it is done.
pub fn check<'a>(
    job_id: JobId,
    config: &'a ClientConfig,
    reporter: ProgressReporter<'a>,
) -> Result<JobOutcome, WorkflowError> {
    let service = HttpJobService::new(resume_endpoint(config))?;
    check_with(service, job_id, config, reporter)
}

pub fn check_with<'a, S: JobService>(
    service: S,
    job_id: JobId,
    config: &'a ClientConfig,
    reporter: ProgressReporter<'a>,
) -> Result<JobOutcome, WorkflowError> {
    let client = JobClient::new(service, config).with_reporter(reporter);
    Ok(client.resume(job_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::config::{ClientConfigBuilder, DEFAULT_SERVICE_URL, FetchPolicy};
    use crate::remote::error::ClientError;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn resume_uses_override_when_present() {
        let default = ClientConfigBuilder::new().build().unwrap();
        assert_eq!(resume_endpoint(&default), DEFAULT_SERVICE_URL);

        let custom = ClientConfigBuilder::new()
            .override_endpoint(Some("http://localhost/apbs".into()))
            .build()
            .unwrap();
        assert_eq!(resume_endpoint(&custom), "http://localhost/apbs");
    }

    #[test]
    fn check_reports_unfinished_job_over_http() {
        let server = MockServer::start();
        let status = server.mock(|when, then| {
            when.method(GET)
                .path("/apbs/queryStatus")
                .query_param("jobID", "app99");
            then.status(200).json_body(json!({
                "code": 2,
                "message": "Running",
                "baseURL": "http://host/app99"
            }));
        });
        let config = ClientConfigBuilder::new()
            .override_endpoint(Some(server.url("/apbs")))
            .fetch(FetchPolicy::ListOnly)
            .build()
            .unwrap();

        let err = check(JobId::new("app99"), &config, ProgressReporter::new()).unwrap_err();

        status.assert();
        assert!(matches!(
            err,
            WorkflowError::Client(ClientError::NotReady { .. })
        ));
    }
}
