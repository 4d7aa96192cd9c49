//! Response payload types shared across handlers.

use serde::{Deserialize, Serialize};

/// Uniform success wrapper `{code, message, data}` applied to every
/// successful response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Always `200` for successful responses.
    pub code: u16,
    /// Human-readable status message.
    pub message: String,
    /// Operation payload; `null` for acknowledgement-only responses.
    pub data: T,
}

impl<T> Envelope<T> {
    /// Wrap a payload in the standard success envelope.
    pub fn ok(data: T) -> Self {
        Self {
            code: 200,
            message: "success".to_string(),
            data,
        }
    }
}

/// RFC9457-style error payload returned for failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// Problem type identifier.
    #[serde(rename = "type")]
    pub kind: String,
    /// Short human-readable summary.
    pub title: String,
    /// HTTP status code mirrored into the body.
    pub status: u16,
    /// Optional request-specific detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
