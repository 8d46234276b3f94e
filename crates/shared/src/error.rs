use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the backend alongside a non-2xx status.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Error)]
#[error("{}", .error.as_deref().unwrap_or("unknown backend error"))]
pub struct ApiError {
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }

    /// Parses an error body, tolerating bodies that are not JSON at all.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice::<Self>(body).ok()
    }

    pub fn message(&self) -> Option<&str> {
        self.error.as_deref().filter(|message| !message.is_empty())
    }
}
