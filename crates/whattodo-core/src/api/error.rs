use reqwest::StatusCode;
use thiserror::Error;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure: DNS, connect, TLS, timeout, or a body that
    /// could not be read/decoded.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status. The body is kept
    /// verbatim so callers can inspect it; only Display truncates.
    #[error("HTTP {}: {}", .status, truncate_body(.body))]
    Http { status: StatusCode, body: String },
}

impl ApiError {
    pub fn from_response(status: StatusCode, body: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            body: body.into(),
        }
    }

    /// HTTP status of the response, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network(e) => e.status(),
        }
    }

    /// The `detail` string from a `{"detail": "..."}` error body, the shape
    /// the backend uses for application-level failures. `None` when the body
    /// is not JSON, has no `detail`, or `detail` is not a string (validation
    /// errors carry a list there).
    pub fn detail(&self) -> Option<String> {
        let ApiError::Http { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value.get("detail")?.as_str().map(str::to_string)
    }

    /// True for 401/403 responses: the token is missing, expired, or not
    /// allowed to see the resource.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }
}

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        body.to_string()
    } else {
        // The cut must land on a char boundary; back up when the limit
        // falls inside a multi-byte sequence.
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..end],
            body.len()
        )
    }
}
