use serde::{Deserialize, Serialize};

/// A result file advertised by the remote service once a job is done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFileRef {
    pub name: String,
    pub url: String,
}

/// The output manifest of a finished job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobOutputs {
    pub std_out_url: String,
    pub std_err_url: String,
    pub files: Vec<OutputFileRef>,
}
