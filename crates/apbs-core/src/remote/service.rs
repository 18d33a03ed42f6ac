use super::error::ServiceError;
use crate::core::models::job::{JobId, JobRequest};
use crate::core::models::outputs::{JobOutputs, OutputFileRef};
use crate::core::models::status::JobStatus;

/// Application metadata advertised by the remote service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceMetadata {
    pub usage: String,
    pub info: Option<String>,
}

impl ServiceMetadata {
    /// The solver version, taken as the last whitespace-separated token of the usage string.
    pub fn version(&self) -> Option<&str> {
        self.usage.split_whitespace().last()
    }
}

/// The RPC contract consumed from a remote APBS job service.
///
/// Implementations are bound to a single endpoint. The client calls them one at a time.
pub trait JobService {
    /// Launches a job. The returned status carries the newly assigned job identifier.
    fn submit(&self, request: &JobRequest) -> Result<JobStatus, ServiceError>;

    fn query_status(&self, job_id: &JobId) -> Result<JobStatus, ServiceError>;

    /// Lists the output files of a finished job.
    fn list_outputs(&self, job_id: &JobId) -> Result<JobOutputs, ServiceError>;

    fn metadata(&self) -> Result<ServiceMetadata, ServiceError>;

    /// Retrieves the contents of one advertised output file.
    fn download(&self, file: &OutputFileRef) -> Result<Vec<u8>, ServiceError>;
}

impl<S: JobService + ?Sized> JobService for &S {
    fn submit(&self, request: &JobRequest) -> Result<JobStatus, ServiceError> {
        (**self).submit(request)
    }

    fn query_status(&self, job_id: &JobId) -> Result<JobStatus, ServiceError> {
        (**self).query_status(job_id)
    }

    fn list_outputs(&self, job_id: &JobId) -> Result<JobOutputs, ServiceError> {
        (**self).list_outputs(job_id)
    }

    fn metadata(&self) -> Result<ServiceMetadata, ServiceError> {
        (**self).metadata()
    }

    fn download(&self, file: &OutputFileRef) -> Result<Vec<u8>, ServiceError> {
        (**self).download(file)
    }
}

impl<S: JobService + ?Sized> JobService for Box<S> {
    fn submit(&self, request: &JobRequest) -> Result<JobStatus, ServiceError> {
        (**self).submit(request)
    }

    fn query_status(&self, job_id: &JobId) -> Result<JobStatus, ServiceError> {
        (**self).query_status(job_id)
    }

    fn list_outputs(&self, job_id: &JobId) -> Result<JobOutputs, ServiceError> {
        (**self).list_outputs(job_id)
    }

    fn metadata(&self) -> Result<ServiceMetadata, ServiceError> {
        (**self).metadata()
    }

    fn download(&self, file: &OutputFileRef) -> Result<Vec<u8>, ServiceError> {
        (**self).download(file)
    }
}
