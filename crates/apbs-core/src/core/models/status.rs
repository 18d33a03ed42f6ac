use super::job::JobId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric status codes used by Opal services.
pub mod codes {
    pub const PENDING: i32 = 1;
    pub const ACTIVE: i32 = 2;
    pub const FAILED: i32 = 4;
    pub const DONE: i32 = 8;
}

/// Client-side interpretation of a raw status code.
///
/// `Unknown` is never asserted by the server; it covers every code the client does not
/// recognize and is treated as "not yet done".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusCode {
    Queued,
    Running,
    Done,
    Failed,
    Unknown,
}

impl StatusCode {
    pub fn from_raw(code: i32) -> Self {
        match code {
            codes::PENDING => StatusCode::Queued,
            codes::ACTIVE => StatusCode::Running,
            codes::DONE => StatusCode::Done,
            codes::FAILED => StatusCode::Failed,
            _ => StatusCode::Unknown,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StatusCode::Done | StatusCode::Failed)
    }

    /// Position along queued -> running -> {done | failed}. `Unknown` has no rank.
    pub fn rank(&self) -> Option<u8> {
        match self {
            StatusCode::Queued => Some(0),
            StatusCode::Running => Some(1),
            StatusCode::Done | StatusCode::Failed => Some(2),
            StatusCode::Unknown => None,
        }
    }

    /// Whether moving from `self` to `next` would go backwards in the job lifecycle.
    pub fn regresses_to(&self, next: StatusCode) -> bool {
        match (self.rank(), next.rank()) {
            (Some(current), Some(next_rank)) => next_rank < current,
            _ => false,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StatusCode::Queued => "queued",
            StatusCode::Running => "running",
            StatusCode::Done => "done",
            StatusCode::Failed => "failed",
            StatusCode::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// A snapshot of a remote job's state, refreshed at every poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub job_id: JobId,
    pub raw_code: i32,
    pub message: String,
    pub base_url: String,
}

impl JobStatus {
    pub fn new(
        job_id: JobId,
        raw_code: i32,
        message: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            job_id,
            raw_code,
            message: message.into(),
            base_url: base_url.into(),
        }
    }

    pub fn code(&self) -> StatusCode {
        StatusCode::from_raw(self.raw_code)
    }

    pub fn is_terminal(&self) -> bool {
        self.code().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_codes_map_to_interpreted_codes() {
        assert_eq!(StatusCode::from_raw(1), StatusCode::Queued);
        assert_eq!(StatusCode::from_raw(2), StatusCode::Running);
        assert_eq!(StatusCode::from_raw(4), StatusCode::Failed);
        assert_eq!(StatusCode::from_raw(8), StatusCode::Done);
        assert_eq!(StatusCode::from_raw(0), StatusCode::Unknown);
        assert_eq!(StatusCode::from_raw(16), StatusCode::Unknown);
    }

    #[test]
    fn only_done_and_failed_are_terminal() {
        assert!(StatusCode::Done.is_terminal());
        assert!(StatusCode::Failed.is_terminal());
        assert!(!StatusCode::Queued.is_terminal());
        assert!(!StatusCode::Running.is_terminal());
        assert!(!StatusCode::Unknown.is_terminal());
    }

    #[test]
    fn regression_is_detected_only_between_known_codes() {
        assert!(StatusCode::Running.regresses_to(StatusCode::Queued));
        assert!(StatusCode::Done.regresses_to(StatusCode::Running));
        assert!(!StatusCode::Queued.regresses_to(StatusCode::Running));
        assert!(!StatusCode::Running.regresses_to(StatusCode::Unknown));
        assert!(!StatusCode::Unknown.regresses_to(StatusCode::Queued));
    }
}
