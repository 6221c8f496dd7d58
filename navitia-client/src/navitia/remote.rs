//! Translation of non-success replies into [`RemoteError`].

use std::fmt;

use serde::Deserialize;
use tracing::{debug, warn};

use super::body::read_limited;

/// A non-success reply from the API.
///
/// Always carries the HTTP status. `message` is `None` when the error body
/// was missing or could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    /// HTTP status code
    pub status: u16,
    /// Server-side error identifier (e.g. `unknown_object`), when given
    pub id: Option<String>,
    /// Server-supplied message, when the body was parseable
    pub message: Option<String>,
}

impl RemoteError {
    /// A remote error whose body could not be parsed.
    pub fn unparsed(status: u16) -> Self {
        Self {
            status,
            id: None,
            message: None,
        }
    }

    /// Whether the server's message could be recovered from the body.
    pub fn message_parsed(&self) -> bool {
        self.message.is_some()
    }

    /// Build a remote error from a status and a (possibly truncated) body.
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(parsed) => {
                let detail = parsed.into_detail();
                if detail.message.is_none() {
                    debug!(status, "error body has no message");
                }
                Self {
                    status,
                    id: detail.id,
                    message: detail.message,
                }
            }
            Err(e) => {
                debug!(status, error = %e, "unparseable error body");
                Self::unparsed(status)
            }
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "remote error {}: {message}", self.status),
            None => write!(f, "remote error {} (no parseable message)", self.status),
        }
    }
}

impl std::error::Error for RemoteError {}

/// Read the body of a non-success reply and translate it.
///
/// Never fails: a body that cannot be read or decoded still yields the
/// status.
pub(crate) async fn translate(mut response: reqwest::Response, limit: usize) -> RemoteError {
    let status = response.status().as_u16();
    match read_limited(&mut response, limit).await {
        Ok(body) => RemoteError::from_body(status, &body.bytes),
        Err(e) => {
            warn!(status, error = %e, "failed to read error body");
            RemoteError::unparsed(status)
        }
    }
}

/// `{"error": {...}}` as sent by Navitia, or the bare detail object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Nested { error: ErrorDetail },
    Flat(ErrorDetail),
}

impl ErrorBody {
    fn into_detail(self) -> ErrorDetail {
        match self {
            ErrorBody::Nested { error } => error,
            ErrorBody::Flat(detail) => detail,
        }
    }
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default, alias = "code")]
    id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_body() {
        let err = RemoteError::from_body(404, br#"{"error":{"message":"no such stop"}}"#);
        assert_eq!(err.status, 404);
        assert_eq!(err.message.as_deref(), Some("no such stop"));
        assert_eq!(err.id, None);
        assert_eq!(err.to_string(), "remote error 404: no such stop");
    }

    #[test]
    fn nested_body_with_id() {
        let err = RemoteError::from_body(
            404,
            br#"{"error":{"id":"unknown_object","message":"Invalid id : stop_area:X"}}"#,
        );
        assert_eq!(err.id.as_deref(), Some("unknown_object"));
        assert_eq!(err.message.as_deref(), Some("Invalid id : stop_area:X"));
    }

    #[test]
    fn flat_body_with_code() {
        let err = RemoteError::from_body(401, br#"{"code":"auth","message":"no token"}"#);
        assert_eq!(err.id.as_deref(), Some("auth"));
        assert_eq!(err.message.as_deref(), Some("no token"));
    }

    #[test]
    fn unparseable_body_keeps_status() {
        let err = RemoteError::from_body(502, b"<html>Bad Gateway</html>");
        assert_eq!(err.status, 502);
        assert!(!err.message_parsed());
        assert_eq!(err.to_string(), "remote error 502 (no parseable message)");
    }

    #[test]
    fn empty_body_keeps_status() {
        let err = RemoteError::from_body(500, b"");
        assert_eq!(err, RemoteError::unparsed(500));
    }

    #[test]
    fn truncated_body_keeps_status() {
        let err = RemoteError::from_body(404, br#"{"error":{"message":"no su"#);
        assert_eq!(err, RemoteError::unparsed(404));
    }
}
