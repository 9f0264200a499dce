//! HTTP client configuration

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use witness_application::config::duration_millis;

/// Environment variable overriding [`ClientConfig::user_agent`].
pub const USER_AGENT_ENV: &str = "WITNESS_USER_AGENT";
/// Environment variable overriding [`ClientConfig::timeout`], in milliseconds.
pub const TIMEOUT_ENV: &str = "WITNESS_TIMEOUT_MS";
/// Environment variable overriding [`ClientConfig::follow_redirects`].
pub const FOLLOW_REDIRECTS_ENV: &str = "WITNESS_FOLLOW_REDIRECTS";
/// Environment variable overriding [`ClientConfig::max_redirects`].
pub const MAX_REDIRECTS_ENV: &str = "WITNESS_MAX_REDIRECTS";

/// Settings for [`crate::ReqwestHttpClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// User-Agent sent with every request that does not set its own.
    pub user_agent: String,
    /// Timeout for a single hop, from connect to the end of the body.
    #[serde(with = "duration_millis")]
    pub timeout: Duration,
    /// Whether 3xx responses with a `Location` are followed.
    pub follow_redirects: bool,
    /// How many redirects to follow before failing.
    pub max_redirects: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("witness/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
            follow_redirects: true,
            max_redirects: 20,
        }
    }
}

impl ClientConfig {
    /// Sets the per-hop timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables or disables redirect following.
    #[must_use]
    pub const fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Sets the redirect limit.
    #[must_use]
    pub const fn with_max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Reads the configuration from the environment, keeping defaults for
    /// unset or unparseable values.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(agent) = std::env::var(USER_AGENT_ENV) {
            config.user_agent = agent;
        }
        if let Some(millis) = parse_env::<u64>(TIMEOUT_ENV) {
            config.timeout = Duration::from_millis(millis);
        }
        if let Some(follow) = parse_env(FOLLOW_REDIRECTS_ENV) {
            config.follow_redirects = follow;
        }
        if let Some(max) = parse_env(MAX_REDIRECTS_ENV) {
            config.max_redirects = max;
        }
        config
    }
}

fn parse_env<T>(name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("ignoring {name}={raw:?}: {e}");
            None
        }
    }
}
