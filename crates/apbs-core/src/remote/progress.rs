use crate::core::models::job::JobId;
use crate::core::models::status::StatusCode;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Progress {
    Submitted { job_id: JobId, base_url: String },
    StatusReport {
        code: StatusCode,
        message: String,
        base_url: String,
    },
    Waiting { interval: Duration },

    DownloadStart { total_files: u64 },
    FileDownloaded { path: PathBuf },
    DownloadFinish,

    /// A notice the front-end should show to the user, such as a version mismatch.
    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
