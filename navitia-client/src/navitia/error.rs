//! Navitia client error types.

use super::remote::RemoteError;

/// Errors raised while turning request options into query parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// A duration option was negative
    #[error("{field} must not be negative")]
    NegativeDuration { field: &'static str },
}

/// Errors raised while decoding a successful reply body.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The body was not valid JSON for the target type
    #[error("JSON decoding failed at {path}: {source}")]
    Json {
        /// Field path of the offending value (e.g. `departures[0].route`)
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body exceeded the configured size ceiling and was not decoded
    #[error("reply body exceeds the {limit} byte ceiling")]
    TooLarge { limit: usize },
}

/// Errors from the Navitia client.
#[derive(Debug, thiserror::Error)]
pub enum NavitiaError {
    /// Request options could not be encoded
    #[error("encoding request parameters: {0}")]
    Encoding(#[from] EncodingError),

    /// The request URL could not be built
    #[error("invalid request URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// An identifier cannot be sent as a URL path segment
    #[error("{segment:?} cannot be used as a path segment")]
    InvalidSegment { segment: String },

    /// The HTTP client could not be built
    #[error("building HTTP client: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    /// Connection-level failure (DNS, TLS, timeout, broken body stream)
    #[error("{context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A successful reply could not be decoded
    #[error("decoding reply: {0}")]
    Decode(#[from] DecodeError),

    /// The caller cancelled the request
    #[error("request cancelled")]
    Cancelled,

    /// Invalid client configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// The pipeline stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Building the request (options, URL, client)
    Encode,
    /// The network round trip, including non-success replies
    Send,
    /// Reading and decoding a successful reply
    Decode,
    /// Cancellation observed at a checkpoint
    Cancelled,
}

impl NavitiaError {
    pub(crate) fn transport(context: &'static str, source: reqwest::Error) -> Self {
        NavitiaError::Transport { context, source }
    }

    pub(crate) fn client(source: reqwest::Error) -> Self {
        NavitiaError::Client { source }
    }

    /// Which stage of the call failed.
    pub fn stage(&self) -> Stage {
        match self {
            NavitiaError::Encoding(_)
            | NavitiaError::InvalidUrl { .. }
            | NavitiaError::InvalidSegment { .. }
            | NavitiaError::Client { .. }
            | NavitiaError::Config(_) => Stage::Encode,
            NavitiaError::Transport { .. } | NavitiaError::Remote(_) => Stage::Send,
            NavitiaError::Decode(_) => Stage::Decode,
            NavitiaError::Cancelled => Stage::Cancelled,
        }
    }

    /// The HTTP status of a remote error.
    pub fn status(&self) -> Option<u16> {
        match self {
            NavitiaError::Remote(e) => Some(e.status),
            NavitiaError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if the error came from a caller cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, NavitiaError::Cancelled)
    }
}
