use crate::core::io::deck::DeckSummary;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SERVICE_URL: &str = "http://kryptonite.nbcr.net/opal2/services/apbs_1.3";
pub const PARALLEL_SERVICE_URL: &str =
    "http://oolite.calit2.optiputer.net/opal2/services/apbs-parallel-1.3";
pub const LOCAL_VERSION: &str = "1.3";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {parameter}: {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// What to do when the remote solver version differs from the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionPolicy {
    /// Warn and decline the submission. Used when the client is embedded in another
    /// program.
    #[default]
    Abort,
    /// Warn and proceed. Used by the interactive command-line client.
    Warn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Upper bound on status queries; `None` polls until a terminal status.
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
        }
    }
}

/// What to do with the outputs of a job that finished successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Download every advertised file into the directory.
    Download { directory: PathBuf },
    /// Only report the output manifest.
    ListOnly,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        FetchPolicy::Download {
            directory: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub default_endpoint: String,
    pub parallel_endpoint: String,
    /// An explicit endpoint always takes precedence over deck-based routing.
    pub override_endpoint: Option<String>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            default_endpoint: DEFAULT_SERVICE_URL.to_string(),
            parallel_endpoint: PARALLEL_SERVICE_URL.to_string(),
            override_endpoint: None,
        }
    }
}

/// The endpoint chosen for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub endpoint: String,
    pub parallel: bool,
    /// Version checking is skipped on the parallel service.
    pub check_version: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoints: EndpointConfig,
    /// Expected solver version; `None` disables the compatibility check.
    pub expected_version: Option<String>,
    pub version_policy: VersionPolicy,
    pub poll: PollPolicy,
    pub fetch: FetchPolicy,
    pub blocking: bool,
}

impl ClientConfig {
    pub fn route(&self, deck: &DeckSummary) -> Route {
        if let Some(endpoint) = &self.endpoints.override_endpoint {
            return Route {
                endpoint: endpoint.clone(),
                parallel: false,
                check_version: true,
            };
        }
        if deck.process_grid.is_parallel() && !deck.async_requested {
            Route {
                endpoint: self.endpoints.parallel_endpoint.clone(),
                parallel: true,
                check_version: false,
            }
        } else {
            Route {
                endpoint: self.endpoints.default_endpoint.clone(),
                parallel: false,
                check_version: true,
            }
        }
    }
}

#[derive(Default)]
pub struct ClientConfigBuilder {
    default_endpoint: Option<String>,
    parallel_endpoint: Option<String>,
    override_endpoint: Option<String>,
    expected_version: Option<Option<String>>,
    version_policy: Option<VersionPolicy>,
    poll_interval: Option<Duration>,
    max_attempts: Option<u32>,
    fetch: Option<FetchPolicy>,
    blocking: Option<bool>,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_endpoint(mut self, url: impl Into<String>) -> Self {
        self.default_endpoint = Some(url.into());
        self
    }
    pub fn parallel_endpoint(mut self, url: impl Into<String>) -> Self {
        self.parallel_endpoint = Some(url.into());
        self
    }
    pub fn override_endpoint(mut self, url: Option<String>) -> Self {
        self.override_endpoint = url;
        self
    }
    pub fn expected_version(mut self, version: Option<String>) -> Self {
        self.expected_version = Some(version);
        self
    }
    pub fn version_policy(mut self, policy: VersionPolicy) -> Self {
        self.version_policy = Some(policy);
        self
    }
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }
    pub fn max_attempts(mut self, attempts: Option<u32>) -> Self {
        self.max_attempts = attempts;
        self
    }
    pub fn fetch(mut self, fetch: FetchPolicy) -> Self {
        self.fetch = Some(fetch);
        self
    }
    pub fn blocking(mut self, blocking: bool) -> Self {
        self.blocking = Some(blocking);
        self
    }

    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let defaults = EndpointConfig::default();
        let default_endpoint = self
            .default_endpoint
            .unwrap_or(defaults.default_endpoint);
        let parallel_endpoint = self
            .parallel_endpoint
            .unwrap_or(defaults.parallel_endpoint);

        if default_endpoint.trim().is_empty() {
            return Err(ConfigError::MissingParameter("default_endpoint"));
        }
        if parallel_endpoint.trim().is_empty() {
            return Err(ConfigError::MissingParameter("parallel_endpoint"));
        }
        if let Some(endpoint) = &self.override_endpoint {
            if endpoint.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    parameter: "override_endpoint",
                    reason: "endpoint URL is empty".to_string(),
                });
            }
        }
        if self.max_attempts == Some(0) {
            return Err(ConfigError::InvalidValue {
                parameter: "max_attempts",
                reason: "must allow at least one status query".to_string(),
            });
        }

        Ok(ClientConfig {
            endpoints: EndpointConfig {
                default_endpoint,
                parallel_endpoint,
                override_endpoint: self.override_endpoint,
            },
            expected_version: self
                .expected_version
                .unwrap_or_else(|| Some(LOCAL_VERSION.to_string())),
            version_policy: self.version_policy.unwrap_or_default(),
            poll: PollPolicy {
                interval: self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
                max_attempts: self.max_attempts,
            },
            fetch: self.fetch.unwrap_or_default(),
            blocking: self.blocking.unwrap_or(true),
        })
    }
}
