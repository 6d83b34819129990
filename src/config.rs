//! Client configuration.

use std::env;
use std::time::Duration;

use reqwest::Url;

use crate::error::ConfigError;

/// Environment variable holding the API base URL (e.g. `https://example.com/api`).
pub const API_URL_VAR: &str = "INTERVIEW_ADMIN_API_URL";
/// Environment variable holding the candidate-facing site URL that interview links point to.
pub const USER_URL_VAR: &str = "INTERVIEW_ADMIN_USER_URL";
/// Environment variable overriding the request timeout, in seconds.
pub const TIMEOUT_VAR: &str = "INTERVIEW_ADMIN_TIMEOUT_SECS";
/// Environment variable overriding the connect timeout, in seconds.
pub const CONNECT_TIMEOUT_VAR: &str = "INTERVIEW_ADMIN_CONNECT_TIMEOUT_SECS";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings used to build an [`AdminClient`](crate::AdminClient).
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL every endpoint path is appended to.
    pub base_url: Url,
    /// Site candidates open to take an interview. Interview links are built from it.
    pub user_url: Option<Url>,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
}

impl Config {
    /// Creates a configuration for `base_url` with the default timeouts.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = parse_http_url(base_url)
            .ok_or_else(|| ConfigError::InvalidBaseUrl(base_url.to_string()))?;

        Ok(Self {
            base_url,
            user_url: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        })
    }

    /// Sets the candidate-facing site URL.
    pub fn with_user_url(mut self, user_url: &str) -> Result<Self, ConfigError> {
        let url = parse_http_url(user_url)
            .ok_or_else(|| ConfigError::InvalidUserUrl(user_url.to_string()))?;
        self.user_url = Some(url);

        Ok(self)
    }

    /// Reads the configuration from the environment, loading a `.env` file first if one exists.
    ///
    /// # Example
    /// ```rust,ignore
    /// // INTERVIEW_ADMIN_API_URL=https://example.com/api
    /// let config = Config::from_env()?;
    /// let state = AppState::from_config(&config)?;
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine, the variables may come from the process environment.
        let _ = dotenvy::dotenv();

        let base_url =
            env::var(API_URL_VAR).map_err(|_| ConfigError::MissingVariable(API_URL_VAR))?;
        let mut config = Self::new(&base_url)?;

        if let Ok(user_url) = env::var(USER_URL_VAR) {
            config = config.with_user_url(&user_url)?;
        }

        if let Some(timeout) = seconds_var(TIMEOUT_VAR)? {
            config.timeout = timeout;
        }
        if let Some(connect_timeout) = seconds_var(CONNECT_TIMEOUT_VAR)? {
            config.connect_timeout = connect_timeout;
        }

        Ok(config)
    }
}

fn parse_http_url(raw: &str) -> Option<Url> {
    let url = Url::parse(raw.trim().trim_end_matches('/')).ok()?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return None;
    }

    Some(url)
}

fn seconds_var(name: &'static str) -> Result<Option<Duration>, ConfigError> {
    let Ok(value) = env::var(name) else {
        return Ok(None);
    };

    value
        .trim()
        .parse::<u64>()
        .map(|secs| Some(Duration::from_secs(secs)))
        .map_err(|_| ConfigError::InvalidTimeout { name, value })
}
