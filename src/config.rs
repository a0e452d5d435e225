use derivative::Derivative;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Derivative)]
#[derivative(Default)]
pub struct AppConfig {
    #[derivative(Default(value = "DEFAULT_API_URL.to_string()"))]
    pub api_base_url: String,
    /// Whole-request timeout. `None` lets long processing runs finish.
    pub request_timeout: Option<Duration>,
    #[derivative(Default(value = "\"info\".to_string()"))]
    pub log_level: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            api_base_url: lookup("VIDEO_UPLOADER_API_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_base_url),
            request_timeout: lookup("VIDEO_UPLOADER_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            log_level: lookup("VIDEO_UPLOADER_LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }
}
