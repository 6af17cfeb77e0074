use std::fmt;

use serde::Deserialize;

use crate::messages;

/// Machine-readable failure category carried by [`ApiError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    ServerError,
    UnknownError,
    /// No response was received.
    NetworkError,
    /// The per-attempt deadline expired.
    Timeout,
    /// The call was rejected before reaching the network.
    InvalidRequest,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::ServerError => "SERVER_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::InvalidRequest => "INVALID_REQUEST",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every client call.
///
/// `user_message` is safe to show directly in the UI; the other fields are
/// for diagnostics.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{code} ({status}): {message}")]
pub struct ApiError {
    /// Technical description of the failure.
    pub message: String,
    /// HTTP status code, `0` when no response was received.
    pub status: u16,
    pub code: ErrorCode,
    /// Bilingual text for end users.
    pub user_message: String,
}

impl ApiError {
    /// Builds the error for a non-success HTTP response.
    ///
    /// `body` is the raw error body; a JSON `message` (or `error`) string in it
    /// is used as the user message for statuses that allow server detail.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let server_message = server_message(body);
        let (code, user_message) = match status {
            400 => (
                ErrorCode::BadRequest,
                server_message.clone().unwrap_or_else(|| messages::BAD_REQUEST.to_owned()),
            ),
            401 => (ErrorCode::Unauthorized, messages::UNAUTHORIZED.to_owned()),
            403 => (ErrorCode::Forbidden, messages::FORBIDDEN.to_owned()),
            404 => (ErrorCode::NotFound, messages::NOT_FOUND.to_owned()),
            500 | 502 | 503 | 504 => (
                ErrorCode::ServerError,
                server_message.clone().unwrap_or_else(|| messages::SERVER_ERROR.to_owned()),
            ),
            _ => (
                ErrorCode::UnknownError,
                server_message.clone().unwrap_or_else(|| messages::UNKNOWN.to_owned()),
            ),
        };

        let message = match server_message {
            Some(detail) => format!("http error {status}: {detail}"),
            None => format!("http error {status}"),
        };

        Self {
            message,
            status,
            code,
            user_message,
        }
    }

    /// Builds the error for a transport-level failure (no response).
    pub fn network(detail: impl fmt::Display) -> Self {
        Self {
            message: format!("network error: {detail}"),
            status: 0,
            code: ErrorCode::NetworkError,
            user_message: messages::NETWORK.to_owned(),
        }
    }

    /// Builds the error for an attempt aborted by the timeout guard.
    pub fn timeout(timeout_ms: u64) -> Self {
        Self {
            message: format!("request timed out after {timeout_ms} ms"),
            status: 408,
            code: ErrorCode::Timeout,
            user_message: messages::TIMEOUT.to_owned(),
        }
    }

    /// Builds the error for a call that could not be prepared.
    pub fn invalid_request(detail: impl fmt::Display) -> Self {
        Self {
            message: format!("invalid request: {detail}"),
            status: 0,
            code: ErrorCode::InvalidRequest,
            user_message: messages::INVALID_REQUEST.to_owned(),
        }
    }

    /// Whether a later attempt could succeed.
    ///
    /// Client errors (4xx) are permanent, except the guard's own 408 timeout.
    pub fn is_transient(&self) -> bool {
        match self.code {
            ErrorCode::NetworkError | ErrorCode::Timeout => true,
            ErrorCode::InvalidRequest => false,
            // Only 4xx is permanent; 5xx and unexpected 1xx/3xx are retried.
            _ => !(400..500).contains(&self.status),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

fn server_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    [parsed.message, parsed.error]
        .into_iter()
        .flatten()
        .find_map(|value| match value {
            serde_json::Value::String(text) if !text.trim().is_empty() => Some(text),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::{ApiError, ErrorCode};
    use crate::messages;

    #[test]
    fn bad_request_prefers_server_message() {
        let err = ApiError::from_response(400, br#"{"message":"phone is required"}"#);
        assert_eq!(err.code, ErrorCode::BadRequest);
        assert_eq!(err.user_message, "phone is required");
        assert_eq!(err.message, "http error 400: phone is required");
    }

    #[test]
    fn bad_request_without_body_uses_fallback() {
        let err = ApiError::from_response(400, b"");
        assert_eq!(err.user_message, messages::BAD_REQUEST);
    }

    #[test]
    fn not_found_ignores_server_message() {
        let err = ApiError::from_response(404, br#"{"message":"no albums"}"#);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.user_message, messages::NOT_FOUND);
        assert!(err.message.contains("no albums"));
    }

    #[test]
    fn auth_statuses_use_fixed_messages() {
        let unauthorized = ApiError::from_response(401, br#"{"message":"token expired"}"#);
        assert_eq!(unauthorized.code, ErrorCode::Unauthorized);
        assert_eq!(unauthorized.user_message, messages::UNAUTHORIZED);

        let forbidden = ApiError::from_response(403, b"");
        assert_eq!(forbidden.code, ErrorCode::Forbidden);
        assert_eq!(forbidden.user_message, messages::FORBIDDEN);
    }

    #[test]
    fn server_errors_fall_back_per_status() {
        for status in [500, 502, 503, 504] {
            let err = ApiError::from_response(status, b"<html>bad gateway</html>");
            assert_eq!(err.code, ErrorCode::ServerError);
            assert_eq!(err.user_message, messages::SERVER_ERROR);
        }

        let err = ApiError::from_response(503, br#"{"error":"maintenance window"}"#);
        assert_eq!(err.user_message, "maintenance window");
    }

    #[test]
    fn unmapped_status_is_unknown() {
        let err = ApiError::from_response(418, br#"{"message":42}"#);
        assert_eq!(err.code, ErrorCode::UnknownError);
        assert_eq!(err.user_message, messages::UNKNOWN);
    }

    #[test]
    fn transience_follows_status_class() {
        assert!(ApiError::network("connection refused").is_transient());
        assert!(ApiError::timeout(10).is_transient());
        assert!(ApiError::from_response(502, b"").is_transient());
        assert!(!ApiError::from_response(404, b"").is_transient());
        assert!(!ApiError::from_response(422, b"").is_transient());
        assert!(!ApiError::invalid_request("empty endpoint").is_transient());
    }

    #[test]
    fn unexpected_non_client_statuses_are_transient() {
        for status in [304, 307, 505] {
            let err = ApiError::from_response(status, b"");
            assert_eq!(err.code, ErrorCode::UnknownError);
            assert!(err.is_transient(), "status {status}");
        }
    }

    #[test]
    fn display_includes_code_and_status() {
        let err = ApiError::timeout(250);
        assert_eq!(err.status, 408);
        assert_eq!(
            err.to_string(),
            "TIMEOUT (408): request timed out after 250 ms"
        );
    }
}
