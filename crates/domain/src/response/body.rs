//! Response body

use serde::{Deserialize, Serialize};

/// A fully-read response body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponseBody {
    /// Raw bytes as received.
    pub bytes: Vec<u8>,
    /// Content-Type of the body, if the server sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl ResponseBody {
    /// Creates a body from raw bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>, content_type: Option<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type,
        }
    }

    /// Creates a `text/plain` body.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(
            text.into().into_bytes(),
            Some("text/plain; charset=utf-8".to_string()),
        )
    }

    /// Returns the body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn string(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Parses the body as JSON.
    #[must_use]
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.bytes).ok()
    }

    /// Returns the body size in bytes.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the body has no bytes.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
