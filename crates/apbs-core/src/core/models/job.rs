use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned by the remote service when a job is launched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A named file shipped with a job submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub name: String,
    pub contents: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// A fully assembled job submission.
///
/// The request is built once per submission and is read-only afterwards. The first
/// bundled file is always the primary input deck; auxiliary files follow in the order the
/// deck first references them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    argument_string: String,
    process_count: u32,
    files: Vec<InputFile>,
}

impl JobRequest {
    /// Assembles a request from the primary deck and its auxiliary files.
    ///
    /// Auxiliary files whose name was already bundled are skipped, so the first
    /// reference wins.
    pub fn new(
        argument_string: impl Into<String>,
        process_count: u32,
        primary: InputFile,
        auxiliary: impl IntoIterator<Item = InputFile>,
    ) -> Self {
        let mut files = vec![primary];
        for file in auxiliary {
            if files.iter().all(|f| f.name != file.name) {
                files.push(file);
            }
        }
        Self {
            argument_string: argument_string.into(),
            process_count: process_count.max(1),
            files,
        }
    }

    pub fn argument_string(&self) -> &str {
        &self.argument_string
    }

    pub fn process_count(&self) -> u32 {
        self.process_count
    }

    pub fn files(&self) -> &[InputFile] {
        &self.files
    }

    pub fn primary_file(&self) -> &InputFile {
        &self.files[0]
    }
}
