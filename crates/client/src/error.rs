//! Typed errors for all client operations.
//!
//! Every async operation in this crate catches transport and decoding
//! failures and converts them into [`ApiError`] before they reach calling
//! code; callers never see a raw `reqwest` error. Page-level signal routing
//! (what becomes a toast vs. a critical-error page) lives in
//! [`ApiError::signal`].

use thiserror::Error;

use crate::events::{SessionEndReason, Signal};

/// Error type for all Bakeline client operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the request with a business error.
    #[error("{message} [{code}]")]
    Api {
        /// Machine-readable error code from the response envelope.
        code: String,
        /// Human-readable message from the response envelope.
        message: String,
        /// HTTP status of the response.
        status: u16,
        /// Structured error details, when the backend provides them.
        details: Option<serde_json::Value>,
        /// Correlation id from the envelope's meta block.
        request_id: Option<String>,
    },

    /// The request never produced a usable response: DNS, connect, or the
    /// overall timeout. Surfaced to the UI as "no connection".
    #[error("no connection: {0}")]
    NoConnection(String),

    /// Transport failed after a connection was established.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response body could not be decoded into the expected shape.
    #[error("response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request was rejected client-side before any network call
    /// (bad upload type, oversize file, invalid form input).
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Synthesize a business error from an envelope error block.
    #[must_use]
    pub const fn api(
        code: String,
        message: String,
        status: u16,
        details: Option<serde_json::Value>,
        request_id: Option<String>,
    ) -> Self {
        Self::Api {
            code,
            message,
            status,
            details,
            request_id,
        }
    }

    /// HTTP status carried by this error, when one exists.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is the session-invalidation case (401).
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }

    /// Whether the backend was unreachable (DNS, connect, timeout).
    ///
    /// This is the case degradable operations key on: the request never
    /// produced a response, so a local fallback is safe.
    #[must_use]
    pub const fn is_no_connection(&self) -> bool {
        matches!(self, Self::NoConnection(_))
    }

    /// Map this error to the page-level signal it should raise, if any.
    ///
    /// `on_login_endpoint` suppresses the session and notification paths so
    /// the login form can show its own inline message without a double
    /// popup.
    ///
    /// - 5xx, lost connection, undecodable responses: critical error page
    /// - 401 off the login endpoint: session expiry (global redirect)
    /// - 403 and login-endpoint failures: no signal (handled inline)
    /// - other 4xx: transient notification toast
    /// - local validation errors: no signal (shown next to the control)
    #[must_use]
    pub fn signal(&self, on_login_endpoint: bool) -> Option<Signal> {
        match self {
            Self::NoConnection(_) | Self::Transport(_) | Self::Decode(_) => {
                Some(Signal::CriticalError {
                    message: self.to_string(),
                })
            }
            Self::Api {
                status, message, ..
            } => match *status {
                500..=599 => Some(Signal::CriticalError {
                    message: message.clone(),
                }),
                401 if !on_login_endpoint => Some(Signal::SessionExpired {
                    reason: SessionEndReason::Unauthorized,
                }),
                401 | 403 => None,
                400..=499 if !on_login_endpoint => Some(Signal::Notification {
                    message: message.clone(),
                }),
                _ => None,
            },
            Self::Validation(_) => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            Self::NoConnection(err.to_string())
        } else {
            Self::Transport(err)
        }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn api_error(status: u16) -> ApiError {
        ApiError::api("X".into(), "boom".into(), status, None, None)
    }

    #[test]
    fn test_display_includes_code() {
        assert_eq!(api_error(400).to_string(), "boom [X]");
    }

    #[test]
    fn test_signal_routing() {
        assert!(matches!(
            api_error(500).signal(false),
            Some(Signal::CriticalError { .. })
        ));
        assert!(matches!(
            api_error(401).signal(false),
            Some(Signal::SessionExpired { .. })
        ));
        // On the login endpoint a 401 is inline-only.
        assert!(api_error(401).signal(true).is_none());
        assert!(api_error(403).signal(false).is_none());
        assert!(matches!(
            api_error(409).signal(false),
            Some(Signal::Notification { .. })
        ));
        assert!(matches!(
            ApiError::NoConnection("timed out".into()).signal(false),
            Some(Signal::CriticalError { .. })
        ));
        assert!(ApiError::Validation("bad file".into()).signal(false).is_none());
    }
}
