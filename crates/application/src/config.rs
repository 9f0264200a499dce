//! Recorder configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`RecorderConfig::await_timeout`].
pub const AWAIT_TIMEOUT_ENV: &str = "WITNESS_AWAIT_TIMEOUT_MS";

/// Settings for [`crate::ResponseRecorder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// How long to wait for an outcome before giving up.
    #[serde(with = "duration_millis")]
    pub await_timeout: Duration,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            await_timeout: Duration::from_secs(10),
        }
    }
}

impl RecorderConfig {
    /// Sets the await timeout.
    #[must_use]
    pub const fn with_await_timeout(mut self, timeout: Duration) -> Self {
        self.await_timeout = timeout;
        self
    }

    /// Reads the configuration from the environment, keeping defaults for
    /// unset or unparseable values.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(AWAIT_TIMEOUT_ENV) {
            match raw.parse::<u64>() {
                Ok(millis) => config.await_timeout = Duration::from_millis(millis),
                Err(e) => tracing::warn!("ignoring {AWAIT_TIMEOUT_ENV}={raw:?}: {e}"),
            }
        }
        config
    }
}

/// Serde helper storing a `Duration` as whole milliseconds.
pub mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    /// Serializes `duration` as milliseconds.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Truncation is acceptable: durations over ~584 million years are not realistic
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    /// Deserializes milliseconds into a `Duration`.
    ///
    /// # Errors
    ///
    /// Fails if the value is not an unsigned integer.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
