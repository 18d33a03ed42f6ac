use super::error::ServiceError;
use super::service::{JobService, ServiceMetadata};
use crate::core::models::job::{JobId, JobRequest};
use crate::core::models::outputs::{JobOutputs, OutputFileRef};
use crate::core::models::status::JobStatus;
use reqwest::blocking::{Client, Response, multipart};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, trace};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Deserialize)]
struct WireStatus {
    code: i32,
    #[serde(default)]
    message: String,
    #[serde(rename = "baseURL", default)]
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct WireLaunchResponse {
    #[serde(rename = "jobID")]
    job_id: String,
    status: WireStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireOutputs {
    #[serde(default)]
    std_out: String,
    #[serde(default)]
    std_err: String,
    #[serde(default)]
    output_file: Vec<OutputFileRef>,
}

#[derive(Debug, Deserialize)]
struct WireMetadata {
    #[serde(default)]
    usage: String,
    #[serde(default)]
    info: Option<String>,
}

impl WireStatus {
    fn into_status(self, job_id: JobId) -> JobStatus {
        JobStatus::new(job_id, self.code, self.message, self.base_url)
    }
}

/// [`JobService`] over an Opal-style HTTP gateway.
///
/// Operations map to `{endpoint}/launchJob` (multipart), `{endpoint}/queryStatus`,
/// `{endpoint}/getOutputs` and `{endpoint}/getAppMetadata`. Output files are fetched
/// from the URL the service advertises for them.
#[derive(Debug, Clone)]
pub struct HttpJobService {
    endpoint: String,
    client: Client,
}

impl HttpJobService {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .user_agent(concat!("apbs-opal/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(endpoint, client))
    }

    pub fn with_client(endpoint: impl Into<String>, client: Client) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self { endpoint, client }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn operation_url(&self, operation: &str) -> String {
        format!("{}/{}", self.endpoint, operation)
    }

    fn check(response: Response) -> Result<Response, ServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .unwrap_or_else(|_| "Failed to read response text".to_string());
        Err(ServiceError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

impl JobService for HttpJobService {
    fn submit(&self, request: &JobRequest) -> Result<JobStatus, ServiceError> {
        let mut form = multipart::Form::new()
            .text("argList", request.argument_string().to_string())
            .text("numProcs", request.process_count().to_string());
        for file in request.files() {
            trace!("Attaching '{}' ({} bytes)", file.name, file.contents.len());
            let part = multipart::Part::bytes(file.contents.clone()).file_name(file.name.clone());
            form = form.part("inputFile", part);
        }

        debug!("Launching job at {}", self.endpoint);
        let response = self
            .client
            .post(self.operation_url("launchJob"))
            .multipart(form)
            .send()?;
        let launch: WireLaunchResponse = Self::check(response)?.json()?;
        if launch.job_id.trim().is_empty() {
            return Err(ServiceError::Malformed(
                "launch response carries an empty job ID".to_string(),
            ));
        }
        Ok(launch.status.into_status(JobId::new(launch.job_id)))
    }

    fn query_status(&self, job_id: &JobId) -> Result<JobStatus, ServiceError> {
        let response = self
            .client
            .get(self.operation_url("queryStatus"))
            .query(&[("jobID", job_id.as_str())])
            .send()?;
        let status: WireStatus = Self::check(response)?.json()?;
        Ok(status.into_status(job_id.clone()))
    }

    fn list_outputs(&self, job_id: &JobId) -> Result<JobOutputs, ServiceError> {
        let response = self
            .client
            .get(self.operation_url("getOutputs"))
            .query(&[("jobID", job_id.as_str())])
            .send()?;
        let outputs: WireOutputs = Self::check(response)?.json()?;
        Ok(JobOutputs {
            std_out_url: outputs.std_out,
            std_err_url: outputs.std_err,
            files: outputs.output_file,
        })
    }

    fn metadata(&self) -> Result<ServiceMetadata, ServiceError> {
        let response = self
            .client
            .get(self.operation_url("getAppMetadata"))
            .send()?;
        let metadata: WireMetadata = Self::check(response)?.json()?;
        Ok(ServiceMetadata {
            usage: metadata.usage,
            info: metadata.info,
        })
    }

    fn download(&self, file: &OutputFileRef) -> Result<Vec<u8>, ServiceError> {
        debug!("Downloading {} from {}", file.name, file.url);
        let response = self.client.get(&file.url).send()?;
        Ok(Self::check(response)?.bytes()?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::job::InputFile;
    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use serde_json::json;

    fn service_for(server: &MockServer) -> HttpJobService {
        HttpJobService::new(server.url("/opal2/services/apbs_1.3/")).unwrap()
    }

    #[test]
    fn trailing_slash_is_trimmed_from_endpoint() {
        let service = HttpJobService::new("http://example.org/apbs/").unwrap();
        assert_eq!(service.endpoint(), "http://example.org/apbs");
    }

    #[test]
    fn submit_posts_multipart_and_returns_job_id() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/opal2/services/apbs_1.3/launchJob")
                .body_contains("apbs.in")
                .body_contains("mol pqr ion.pqr");
            then.status(200).json_body(json!({
                "jobID": "app_apbs_123",
                "status": {
                    "code": 1,
                    "message": "Launching executable",
                    "baseURL": "http://example.org/app_apbs_123"
                }
            }));
        });

        let request = JobRequest::new(
            "apbs.in",
            1,
            InputFile::new("apbs.in", "read\n mol pqr ion.pqr\nend\n"),
            vec![InputFile::new("ion.pqr", "ATOM")],
        );
        let status = service_for(&server).submit(&request).unwrap();

        mock.assert();
        assert_eq!(status.job_id.as_str(), "app_apbs_123");
        assert_eq!(status.raw_code, 1);
        assert_eq!(status.base_url, "http://example.org/app_apbs_123");
    }

    #[test]
    fn query_status_sends_job_id_parameter() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/opal2/services/apbs_1.3/queryStatus")
                .query_param("jobID", "app_apbs_123");
            then.status(200).json_body(json!({
                "code": 8,
                "message": "Execution complete",
                "baseURL": "http://example.org/app_apbs_123"
            }));
        });

        let status = service_for(&server)
            .query_status(&JobId::new("app_apbs_123"))
            .unwrap();

        mock.assert();
        assert!(status.is_terminal());
        assert_eq!(status.message, "Execution complete");
    }

    #[test]
    fn list_outputs_maps_manifest() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/opal2/services/apbs_1.3/getOutputs");
            then.status(200).json_body(json!({
                "stdOut": "http://example.org/j/stdout.txt",
                "stdErr": "http://example.org/j/stderr.txt",
                "outputFile": [
                    { "name": "pot.dx", "url": "http://example.org/j/pot.dx" }
                ]
            }));
        });

        let outputs = service_for(&server)
            .list_outputs(&JobId::new("j"))
            .unwrap();

        assert_eq!(outputs.std_out_url, "http://example.org/j/stdout.txt");
        assert_eq!(outputs.files.len(), 1);
        assert_eq!(outputs.files[0].name, "pot.dx");
    }

    #[test]
    fn metadata_exposes_usage_version() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/opal2/services/apbs_1.3/getAppMetadata");
            then.status(200)
                .json_body(json!({ "usage": "APBS version 1.3" }));
        });

        let metadata = service_for(&server).metadata().unwrap();
        assert_eq!(metadata.version(), Some("1.3"));
        assert!(metadata.info.is_none());
    }

    #[test]
    fn download_returns_raw_bytes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/files/pot.dx");
            then.status(200).body("object 1 class gridpositions");
        });

        let file = OutputFileRef {
            name: "pot.dx".into(),
            url: server.url("/files/pot.dx"),
        };
        let bytes = service_for(&server).download(&file).unwrap();
        assert_eq!(bytes, b"object 1 class gridpositions");
    }

    #[test]
    fn non_success_status_becomes_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/opal2/services/apbs_1.3/queryStatus");
            then.status(500).body("internal fault");
        });

        let err = service_for(&server)
            .query_status(&JobId::new("j"))
            .unwrap_err();
        match err {
            ServiceError::Http { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "internal fault");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unreachable_endpoint_is_a_transport_error() {
        let service = HttpJobService::new("http://127.0.0.1:9").unwrap();
        let result = service.metadata();
        assert!(matches!(result, Err(ServiceError::Transport(_))));
    }
}
