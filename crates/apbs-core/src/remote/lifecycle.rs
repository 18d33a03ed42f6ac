use super::error::ClientError;
use crate::core::models::job::JobId;
use crate::core::models::status::{JobStatus, StatusCode};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Unsubmitted,
    Submitted,
    Polling,
    Done,
    Failed,
    /// Submitted without waiting. The job can only be picked up again by its identifier.
    DetachedPending,
}

impl LifecycleState {
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Unsubmitted, Submitted)
                | (Submitted, Polling)
                | (Submitted, DetachedPending)
                | (Polling, Polling)
                | (Polling, Done)
                | (Polling, Failed)
                | (DetachedPending, Done)
                | (DetachedPending, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, LifecycleState::Done | LifecycleState::Failed)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LifecycleState::Unsubmitted => "unsubmitted",
            LifecycleState::Submitted => "submitted",
            LifecycleState::Polling => "polling",
            LifecycleState::Done => "done",
            LifecycleState::Failed => "failed",
            LifecycleState::DetachedPending => "detached",
        };
        f.write_str(label)
    }
}

/// Client-side bookkeeping for one job.
///
/// A job identifier exists in every state but `Unsubmitted`, so status queries can only
/// be issued once submission succeeded or an identifier was supplied for resumption.
/// Status codes are folded in monotonically: a server-reported step backwards is logged
/// and ignored.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: LifecycleState,
    job_id: Option<JobId>,
    last_code: Option<StatusCode>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Unsubmitted,
            job_id: None,
            last_code: None,
        }
    }

    /// Starts from an identifier obtained by an earlier, detached submission.
    pub fn resumed(job_id: JobId) -> Self {
        Self {
            state: LifecycleState::DetachedPending,
            job_id: Some(job_id),
            last_code: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn job_id(&self) -> Result<&JobId, ClientError> {
        self.job_id.as_ref().ok_or(ClientError::NotSubmitted)
    }

    /// The most advanced status code observed so far.
    pub fn last_code(&self) -> Option<StatusCode> {
        self.last_code
    }

    pub fn mark_submitted(&mut self, status: &JobStatus) -> Result<(), ClientError> {
        self.transition(LifecycleState::Submitted)?;
        self.job_id = Some(status.job_id.clone());
        self.last_code = Some(status.code()).filter(|code| code.rank().is_some());
        Ok(())
    }

    pub fn start_polling(&mut self) -> Result<(), ClientError> {
        self.transition(LifecycleState::Polling)
    }

    pub fn detach(&mut self) -> Result<(), ClientError> {
        self.transition(LifecycleState::DetachedPending)
    }

    /// Folds in a freshly queried status and returns the effective code.
    ///
    /// Terminal codes move the lifecycle to `Done` or `Failed`. Intermediate codes keep a
    /// polling lifecycle in `Polling` and leave a detached one untouched.
    pub fn observe(&mut self, status: &JobStatus) -> Result<StatusCode, ClientError> {
        let reported = status.code();
        let effective = match self.last_code {
            Some(previous) if previous.regresses_to(reported) => {
                warn!(
                    job_id = %status.job_id,
                    previous = %previous,
                    reported = %reported,
                    "Server reported a status regression; keeping the previous status."
                );
                previous
            }
            _ => reported,
        };
        if effective.rank().is_some() {
            self.last_code = Some(effective);
        }

        match effective {
            StatusCode::Done => self.transition(LifecycleState::Done)?,
            StatusCode::Failed => self.transition(LifecycleState::Failed)?,
            _ if self.state == LifecycleState::Polling => {
                self.transition(LifecycleState::Polling)?
            }
            _ => {}
        }
        Ok(effective)
    }

    fn transition(&mut self, next: LifecycleState) -> Result<(), ClientError> {
        if !self.state.can_transition_to(next) {
            return Err(ClientError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::status::codes;

    fn status(code: i32) -> JobStatus {
        JobStatus::new(JobId::new("app123"), code, "msg", "http://host/app123")
    }

    #[test]
    fn fresh_lifecycle_has_no_job_id() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), LifecycleState::Unsubmitted);
        assert!(matches!(lifecycle.job_id(), Err(ClientError::NotSubmitted)));
    }

    #[test]
    fn blocking_path_reaches_done() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.mark_submitted(&status(codes::PENDING)).unwrap();
        assert_eq!(lifecycle.job_id().unwrap().as_str(), "app123");
        lifecycle.start_polling().unwrap();

        assert_eq!(
            lifecycle.observe(&status(codes::ACTIVE)).unwrap(),
            StatusCode::Running
        );
        assert_eq!(lifecycle.state(), LifecycleState::Polling);
        assert_eq!(
            lifecycle.observe(&status(codes::DONE)).unwrap(),
            StatusCode::Done
        );
        assert_eq!(lifecycle.state(), LifecycleState::Done);
    }

    #[test]
    fn failure_code_moves_to_failed() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.mark_submitted(&status(codes::PENDING)).unwrap();
        lifecycle.start_polling().unwrap();
        lifecycle.observe(&status(codes::FAILED)).unwrap();
        assert_eq!(lifecycle.state(), LifecycleState::Failed);
    }

    #[test]
    fn regression_is_ignored() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.mark_submitted(&status(codes::PENDING)).unwrap();
        lifecycle.start_polling().unwrap();
        lifecycle.observe(&status(codes::ACTIVE)).unwrap();

        let effective = lifecycle.observe(&status(codes::PENDING)).unwrap();
        assert_eq!(effective, StatusCode::Running);
        assert_eq!(lifecycle.last_code(), Some(StatusCode::Running));
        assert_eq!(lifecycle.state(), LifecycleState::Polling);
    }

    #[test]
    fn unknown_codes_do_not_replace_last_known_code() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.mark_submitted(&status(codes::PENDING)).unwrap();
        lifecycle.start_polling().unwrap();
        lifecycle.observe(&status(codes::ACTIVE)).unwrap();

        assert_eq!(
            lifecycle.observe(&status(3)).unwrap(),
            StatusCode::Unknown
        );
        assert_eq!(lifecycle.last_code(), Some(StatusCode::Running));
    }

    #[test]
    fn detached_job_stays_detached_until_terminal() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.mark_submitted(&status(codes::PENDING)).unwrap();
        lifecycle.detach().unwrap();
        assert_eq!(lifecycle.state(), LifecycleState::DetachedPending);

        let mut resumed = Lifecycle::resumed(JobId::new("app123"));
        resumed.observe(&status(codes::ACTIVE)).unwrap();
        assert_eq!(resumed.state(), LifecycleState::DetachedPending);
        resumed.observe(&status(codes::DONE)).unwrap();
        assert_eq!(resumed.state(), LifecycleState::Done);
    }

    #[test]
    fn polling_before_submission_is_rejected() {
        let mut lifecycle = Lifecycle::new();
        let err = lifecycle.start_polling().unwrap_err();
        assert!(matches!(
            err,
            ClientError::InvalidTransition {
                from: LifecycleState::Unsubmitted,
                to: LifecycleState::Polling
            }
        ));
    }

    #[test]
    fn terminal_states_have_no_outgoing_transitions() {
        use LifecycleState::*;
        for next in [Unsubmitted, Submitted, Polling, Done, Failed, DetachedPending] {
            assert!(!Done.can_transition_to(next));
            assert!(!Failed.can_transition_to(next));
        }
    }
}
