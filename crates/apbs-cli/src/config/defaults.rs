use apbs_opal::remote::config::{
    DEFAULT_POLL_INTERVAL, DEFAULT_SERVICE_URL, LOCAL_VERSION, PARALLEL_SERVICE_URL,
};

pub struct DefaultsConfig {
    pub default_endpoint: String,
    pub parallel_endpoint: String,
    pub expected_version: String,
    pub version_check: bool,
    pub poll_interval_secs: u64,
    pub fetch_directory: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            default_endpoint: DEFAULT_SERVICE_URL.to_string(),
            parallel_endpoint: PARALLEL_SERVICE_URL.to_string(),
            expected_version: LOCAL_VERSION.to_string(),
            version_check: true,
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            fetch_directory: ".".to_string(),
        }
    }
}
