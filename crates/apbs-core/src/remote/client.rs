use super::config::{ClientConfig, FetchPolicy, VersionPolicy};
use super::error::ClientError;
use super::lifecycle::Lifecycle;
use super::progress::{Progress, ProgressReporter};
use super::service::JobService;
use crate::core::models::job::{JobId, JobRequest};
use crate::core::models::outputs::JobOutputs;
use crate::core::models::status::{JobStatus, StatusCode};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// How a client run ended, when it did not end in an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Submitted without waiting for completion.
    Detached { job_id: JobId, base_url: String },
    /// Finished, with every advertised output written to `directory`.
    Fetched {
        job_id: JobId,
        directory: PathBuf,
        files: Vec<PathBuf>,
    },
    /// Finished, outputs listed but not downloaded.
    Completed { job_id: JobId, outputs: JobOutputs },
}

impl JobOutcome {
    pub fn job_id(&self) -> &JobId {
        match self {
            JobOutcome::Detached { job_id, .. }
            | JobOutcome::Fetched { job_id, .. }
            | JobOutcome::Completed { job_id, .. } => job_id,
        }
    }
}

/// Drives one job through submission, polling and result retrieval against a single
/// service endpoint.
pub struct JobClient<'a, S: JobService> {
    service: S,
    config: &'a ClientConfig,
    reporter: ProgressReporter<'a>,
}

impl<'a, S: JobService> JobClient<'a, S> {
    pub fn new(service: S, config: &'a ClientConfig) -> Self {
        Self {
            service,
            config,
            reporter: ProgressReporter::new(),
        }
    }

    pub fn with_reporter(mut self, reporter: ProgressReporter<'a>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Compares the solver version advertised by the service with the expected one.
    ///
    /// A mismatch is always logged. Under [`VersionPolicy::Abort`] it is also returned as
    /// an error.
    #[instrument(skip_all, name = "version_check")]
    pub fn check_version(&self) -> Result<(), ClientError> {
        let Some(expected) = &self.config.expected_version else {
            return Ok(());
        };
        let metadata = self.service.metadata()?;
        let remote = metadata.version().unwrap_or_default();
        if remote == expected {
            debug!(version = %remote, "Remote solver version matches.");
            return Ok(());
        }

        warn!(
            remote = %remote,
            local = %expected,
            "The remote server version of APBS does not match the local version."
        );
        match self.config.version_policy {
            VersionPolicy::Abort => Err(ClientError::VersionMismatch {
                remote: remote.to_string(),
                local: expected.clone(),
            }),
            VersionPolicy::Warn => {
                self.reporter.report(Progress::Message(format!(
                    "Remote APBS version {remote} differs from local version {expected}; continuing."
                )));
                Ok(())
            }
        }
    }

    /// Submits `request` and, when blocking, waits for the job and retrieves its outputs.
    #[instrument(skip_all, name = "remote_run", fields(processes = request.process_count()))]
    pub fn run(
        &self,
        request: &JobRequest,
        verify_version: bool,
    ) -> Result<JobOutcome, ClientError> {
        if verify_version {
            self.check_version()?;
        }

        let mut lifecycle = Lifecycle::new();
        let status = self.service.submit(request)?;
        lifecycle.mark_submitted(&status)?;
        let job_id = lifecycle.job_id()?.clone();
        info!(job_id = %job_id, base_url = %status.base_url, "Job submitted.");
        self.reporter.report(Progress::Submitted {
            job_id: job_id.clone(),
            base_url: status.base_url.clone(),
        });

        if !self.config.blocking {
            lifecycle.detach()?;
            return Ok(JobOutcome::Detached {
                job_id,
                base_url: status.base_url,
            });
        }

        lifecycle.start_polling()?;
        let final_status = self.poll(&mut lifecycle, status)?;
        match lifecycle.last_code() {
            Some(StatusCode::Done) => self.complete(job_id),
            _ => Err(ClientError::JobFailed {
                job_id,
                message: final_status.message,
            }),
        }
    }

    /// Picks up a previously submitted job with a single status query.
    ///
    /// Unlike [`JobClient::run`] this never waits: a job that is not finished yet is
    /// reported as [`ClientError::NotReady`].
    #[instrument(skip_all, name = "resume", fields(job_id = %job_id))]
    pub fn resume(&self, job_id: JobId) -> Result<JobOutcome, ClientError> {
        let mut lifecycle = Lifecycle::resumed(job_id);
        let job_id = lifecycle.job_id()?.clone();
        let status = self.service.query_status(&job_id)?;
        let code = lifecycle.observe(&status)?;
        self.report_status(code, &status);

        match code {
            StatusCode::Done => self.complete(job_id),
            StatusCode::Failed => Err(ClientError::JobFailed {
                job_id,
                message: status.message,
            }),
            code => Err(ClientError::NotReady { job_id, code }),
        }
    }

    fn poll(
        &self,
        lifecycle: &mut Lifecycle,
        initial: JobStatus,
    ) -> Result<JobStatus, ClientError> {
        let job_id = lifecycle.job_id()?.clone();
        let policy = self.config.poll;
        let mut status = initial;
        let mut attempts: u32 = 0;

        loop {
            let code = lifecycle.observe(&status)?;
            self.report_status(code, &status);
            if code.is_terminal() {
                return Ok(status);
            }
            if policy.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(ClientError::PollTimeout { job_id, attempts });
            }

            self.reporter.report(Progress::Waiting {
                interval: policy.interval,
            });
            std::thread::sleep(policy.interval);
            status = self.service.query_status(&job_id)?;
            attempts += 1;
        }
    }

    fn report_status(&self, code: StatusCode, status: &JobStatus) {
        info!(
            code = status.raw_code,
            status = %code,
            message = %status.message,
            base_url = %status.base_url,
            "Job status."
        );
        self.reporter.report(Progress::StatusReport {
            code,
            message: status.message.clone(),
            base_url: status.base_url.clone(),
        });
    }

    fn complete(&self, job_id: JobId) -> Result<JobOutcome, ClientError> {
        let outputs = self.service.list_outputs(&job_id)?;
        match &self.config.fetch {
            FetchPolicy::ListOnly => Ok(JobOutcome::Completed { job_id, outputs }),
            FetchPolicy::Download { directory } => {
                let files = self.fetch(&outputs, directory)?;
                Ok(JobOutcome::Fetched {
                    job_id,
                    directory: directory.clone(),
                    files,
                })
            }
        }
    }

    /// Downloads every advertised output file into `directory`.
    ///
    /// The directory is created when missing. Files are stored under the final component of
    /// their advertised name and replace existing files of the same name.
    pub fn fetch(
        &self,
        outputs: &JobOutputs,
        directory: &Path,
    ) -> Result<Vec<PathBuf>, ClientError> {
        fs::create_dir_all(directory).map_err(|source| ClientError::Io {
            path: directory.to_path_buf(),
            source,
        })?;

        self.reporter.report(Progress::DownloadStart {
            total_files: outputs.files.len() as u64,
        });
        let mut written = Vec::with_capacity(outputs.files.len());
        for file in &outputs.files {
            let Some(name) = Path::new(&file.name).file_name() else {
                warn!(name = %file.name, "Skipping output file without a usable name.");
                continue;
            };
            let path = directory.join(name);
            let contents = self.service.download(file)?;
            fs::write(&path, contents).map_err(|source| ClientError::Io {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "Downloaded output file.");
            self.reporter.report(Progress::FileDownloaded { path: path.clone() });
            written.push(path);
        }
        self.reporter.report(Progress::DownloadFinish);

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::job::InputFile;
    use crate::core::models::outputs::OutputFileRef;
    use crate::core::models::status::codes;
    use crate::remote::config::ClientConfigBuilder;
    use crate::remote::error::ServiceError;
    use crate::remote::service::ServiceMetadata;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::time::Duration;

    const BASE_URL: &str = "http://host/app42";

    struct ScriptedService {
        usage: String,
        statuses: RefCell<VecDeque<i32>>,
        submits: Cell<u32>,
        queries: Cell<u32>,
        downloads: Cell<u32>,
        outputs: JobOutputs,
    }

    impl ScriptedService {
        fn new(submit_code: i32, later: &[i32]) -> Self {
            let mut statuses = VecDeque::from(vec![submit_code]);
            statuses.extend(later.iter().copied());
            Self {
                usage: "apbs [options] input-file 1.3".to_string(),
                statuses: RefCell::new(statuses),
                submits: Cell::new(0),
                queries: Cell::new(0),
                downloads: Cell::new(0),
                outputs: JobOutputs {
                    std_out_url: format!("{BASE_URL}/stdout.txt"),
                    std_err_url: format!("{BASE_URL}/stderr.txt"),
                    files: vec![
                        OutputFileRef {
                            name: "io.mc".into(),
                            url: format!("{BASE_URL}/io.mc"),
                        },
                        OutputFileRef {
                            name: "pot.dx".into(),
                            url: format!("{BASE_URL}/pot.dx"),
                        },
                    ],
                },
            }
        }

        fn with_usage(mut self, usage: &str) -> Self {
            self.usage = usage.to_string();
            self
        }

        fn next_status(&self) -> JobStatus {
            let code = self
                .statuses
                .borrow_mut()
                .pop_front()
                .expect("status script exhausted");
            JobStatus::new(JobId::new("app42"), code, format!("code {code}"), BASE_URL)
        }
    }

    impl JobService for ScriptedService {
        fn submit(&self, _request: &JobRequest) -> Result<JobStatus, ServiceError> {
            self.submits.set(self.submits.get() + 1);
            Ok(self.next_status())
        }

        fn query_status(&self, job_id: &JobId) -> Result<JobStatus, ServiceError> {
            assert_eq!(job_id.as_str(), "app42");
            self.queries.set(self.queries.get() + 1);
            Ok(self.next_status())
        }

        fn list_outputs(&self, _job_id: &JobId) -> Result<JobOutputs, ServiceError> {
            Ok(self.outputs.clone())
        }

        fn metadata(&self) -> Result<ServiceMetadata, ServiceError> {
            Ok(ServiceMetadata {
                usage: self.usage.clone(),
                info: None,
            })
        }

        fn download(&self, file: &OutputFileRef) -> Result<Vec<u8>, ServiceError> {
            self.downloads.set(self.downloads.get() + 1);
            Ok(format!("contents of {}", file.name).into_bytes())
        }
    }

    fn request() -> JobRequest {
        JobRequest::new("apbs.in", 1, InputFile::new("apbs.in", "read end"), vec![])
    }

    fn config(fetch: FetchPolicy) -> ClientConfig {
        ClientConfigBuilder::new()
            .poll_interval(Duration::ZERO)
            .fetch(fetch)
            .build()
            .unwrap()
    }

    #[test]
    fn blocking_run_polls_until_done_and_downloads_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("results");
        let config = config(FetchPolicy::Download {
            directory: target.clone(),
        });
        let service = ScriptedService::new(codes::PENDING, &[codes::ACTIVE, codes::DONE]);
        let client = JobClient::new(&service, &config);

        let outcome = client.run(&request(), true).unwrap();

        assert_eq!(service.submits.get(), 1);
        assert_eq!(service.queries.get(), 2);
        assert_eq!(service.downloads.get(), 2);
        match outcome {
            JobOutcome::Fetched { directory, files, .. } => {
                assert_eq!(directory, target);
                assert_eq!(files.len(), 2);
                assert_eq!(
                    fs::read_to_string(target.join("pot.dx")).unwrap(),
                    "contents of pot.dx"
                );
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn failed_job_reports_server_message_and_skips_fetch() {
        let config = config(FetchPolicy::ListOnly);
        let service = ScriptedService::new(codes::PENDING, &[codes::FAILED]);
        let client = JobClient::new(&service, &config);

        let err = client.run(&request(), false).unwrap_err();

        assert!(matches!(
            err,
            ClientError::JobFailed { ref message, .. } if message == "code 4"
        ));
        assert_eq!(service.downloads.get(), 0);
    }

    #[test]
    fn no_status_query_happens_after_terminal_status() {
        let config = config(FetchPolicy::ListOnly);
        let service = ScriptedService::new(codes::DONE, &[]);
        let client = JobClient::new(&service, &config);

        let outcome = client.run(&request(), false).unwrap();

        assert_eq!(service.queries.get(), 0);
        assert!(matches!(outcome, JobOutcome::Completed { ref outputs, .. } if outputs.files.len() == 2));
    }

    #[test]
    fn non_blocking_run_detaches_without_further_calls() {
        let config = ClientConfigBuilder::new().blocking(false).build().unwrap();
        let service = ScriptedService::new(codes::PENDING, &[]);
        let client = JobClient::new(&service, &config);

        let outcome = client.run(&request(), false).unwrap();

        assert_eq!(
            outcome,
            JobOutcome::Detached {
                job_id: JobId::new("app42"),
                base_url: BASE_URL.to_string()
            }
        );
        assert_eq!(service.queries.get(), 0);
    }

    #[test]
    fn unknown_codes_keep_polling() {
        let config = config(FetchPolicy::ListOnly);
        let service = ScriptedService::new(codes::PENDING, &[0, 16, codes::DONE]);
        let client = JobClient::new(&service, &config);

        assert!(client.run(&request(), false).is_ok());
        assert_eq!(service.queries.get(), 3);
    }

    #[test]
    fn poll_gives_up_after_max_attempts() {
        let config = ClientConfigBuilder::new()
            .poll_interval(Duration::ZERO)
            .max_attempts(Some(2))
            .build()
            .unwrap();
        let service = ScriptedService::new(codes::PENDING, &[codes::ACTIVE, codes::ACTIVE]);
        let client = JobClient::new(&service, &config);

        let err = client.run(&request(), false).unwrap_err();

        assert!(matches!(err, ClientError::PollTimeout { attempts: 2, .. }));
        assert_eq!(service.queries.get(), 2);
    }

    #[test]
    fn version_mismatch_aborts_before_submission_by_default() {
        let config = config(FetchPolicy::ListOnly);
        let service = ScriptedService::new(codes::DONE, &[]).with_usage("apbs input-file 1.2");
        let client = JobClient::new(&service, &config);

        let err = client.run(&request(), true).unwrap_err();

        assert!(matches!(
            err,
            ClientError::VersionMismatch { ref remote, ref local } if remote == "1.2" && local == "1.3"
        ));
        assert_eq!(service.submits.get(), 0);
    }

    #[test]
    fn version_mismatch_only_warns_under_warn_policy() {
        let config = ClientConfigBuilder::new()
            .version_policy(VersionPolicy::Warn)
            .fetch(FetchPolicy::ListOnly)
            .build()
            .unwrap();
        let service = ScriptedService::new(codes::DONE, &[]).with_usage("apbs input-file 1.2");
        let notices = std::sync::Mutex::new(Vec::new());
        let client = JobClient::new(&service, &config).with_reporter(ProgressReporter::with_callback(
            Box::new(|event| {
                if let Progress::Message(text) = event {
                    notices.lock().unwrap().push(text);
                }
            }),
        ));

        assert!(client.run(&request(), true).is_ok());
        assert_eq!(service.submits.get(), 1);
        drop(client);
        assert_eq!(
            notices.into_inner().unwrap(),
            vec!["Remote APBS version 1.2 differs from local version 1.3; continuing."]
        );
    }

    #[test]
    fn version_check_is_skipped_without_expected_version() {
        let config = ClientConfigBuilder::new().expected_version(None).build().unwrap();
        let service = ScriptedService::new(codes::DONE, &[]).with_usage("");
        let client = JobClient::new(&service, &config);

        assert!(client.check_version().is_ok());
    }

    #[test]
    fn resume_of_unfinished_job_is_not_ready() {
        let config = config(FetchPolicy::ListOnly);
        let service = ScriptedService::new(codes::ACTIVE, &[]);
        let client = JobClient::new(&service, &config);

        let err = client.resume(JobId::new("app42")).unwrap_err();

        assert!(matches!(
            err,
            ClientError::NotReady {
                code: StatusCode::Running,
                ..
            }
        ));
        assert_eq!(service.queries.get(), 1);
    }

    #[test]
    fn resume_of_finished_job_fetches_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(FetchPolicy::Download {
            directory: dir.path().to_path_buf(),
        });
        let service = ScriptedService::new(codes::DONE, &[]);
        let client = JobClient::new(&service, &config);

        let outcome = client.resume(JobId::new("app42")).unwrap();

        assert!(matches!(outcome, JobOutcome::Fetched { ref files, .. } if files.len() == 2));
        assert!(dir.path().join("io.mc").exists());
    }

    #[test]
    fn fetch_overwrites_files_and_strips_directories_from_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("io.mc"), "stale").unwrap();
        let config = config(FetchPolicy::ListOnly);
        let service = ScriptedService::new(codes::DONE, &[]);
        let client = JobClient::new(&service, &config);
        let outputs = JobOutputs {
            files: vec![
                OutputFileRef {
                    name: "io.mc".into(),
                    url: "u1".into(),
                },
                OutputFileRef {
                    name: "../escape.txt".into(),
                    url: "u2".into(),
                },
            ],
            ..Default::default()
        };

        let written = client.fetch(&outputs, dir.path()).unwrap();

        assert_eq!(
            written,
            vec![dir.path().join("io.mc"), dir.path().join("escape.txt")]
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("io.mc")).unwrap(),
            "contents of io.mc"
        );
    }

    #[test]
    fn status_reports_carry_the_job_base_url() {
        use std::sync::Mutex;

        let reports = Mutex::new(Vec::new());
        let config = config(FetchPolicy::ListOnly);
        let service = ScriptedService::new(codes::PENDING, &[codes::DONE]);
        let client = JobClient::new(&service, &config).with_reporter(ProgressReporter::with_callback(
            Box::new(|event| {
                if let Progress::StatusReport { code, base_url, .. } = event {
                    reports.lock().unwrap().push((code, base_url));
                }
            }),
        ));

        client.run(&request(), false).unwrap();
        drop(client);

        assert_eq!(
            reports.into_inner().unwrap(),
            vec![
                (StatusCode::Queued, BASE_URL.to_string()),
                (StatusCode::Done, BASE_URL.to_string()),
            ]
        );
    }

    #[test]
    fn reporter_receives_submission_and_status_events() {
        use std::sync::Mutex;

        let events = Mutex::new(Vec::new());
        let config = config(FetchPolicy::ListOnly);
        let service = ScriptedService::new(codes::PENDING, &[codes::DONE]);
        let client = JobClient::new(&service, &config).with_reporter(ProgressReporter::with_callback(
            Box::new(|event| {
                let label = match event {
                    Progress::Submitted { .. } => "submitted",
                    Progress::StatusReport { .. } => "status",
                    Progress::Waiting { .. } => "waiting",
                    _ => "other",
                };
                events.lock().unwrap().push(label);
            }),
        ));

        client.run(&request(), false).unwrap();
        drop(client);

        assert_eq!(
            events.into_inner().unwrap(),
            vec!["submitted", "status", "waiting", "status"]
        );
    }
}
