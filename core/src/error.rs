//! Error types for the request/decode pipeline.
//!
//! # Design
//! Callers that register an error delegate see only [`ErrorType`], a flat
//! five-way classification. [`ApiError`] keeps the detail behind each kind
//! (the parse error, the missing path, the numeric status) for logs and for
//! callers of [`crate::Client::fetch`]. [`TransportError`] is the narrower
//! vocabulary a [`crate::Transport`] speaks.

use thiserror::Error;

/// Category of failure delivered to an [`crate::ErrorDelegate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// A response was not obtainable in usable form.
    Server,
    /// The transport failed to complete the exchange.
    Network,
    /// The body was not JSON, the key path did not resolve, or the fragment
    /// did not decode into the model.
    BadParsing,
    /// The target URL could not be turned into a request. Detected before
    /// any I/O.
    BadUrl,
    /// A response arrived with a status outside 200..=299.
    Unknown,
}

/// Detailed failure of a single request.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported url scheme {0:?}")]
    UnsupportedScheme(String),

    #[error("request could not be built: {0}")]
    InvalidRequest(String),

    #[error("network failure: {0}")]
    Network(String),

    #[error("no usable response: {0}")]
    Server(String),

    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    #[error("response body is not valid JSON: {0}")]
    MalformedBody(#[source] serde_json::Error),

    #[error("key path {0:?} not found in response")]
    PathNotFound(String),

    #[error("value at {path:?} does not match the model: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// The delegate-facing category of this error.
    pub fn kind(&self) -> ErrorType {
        match self {
            ApiError::InvalidUrl { .. }
            | ApiError::UnsupportedScheme(_)
            | ApiError::InvalidRequest(_) => ErrorType::BadUrl,
            ApiError::Network(_) => ErrorType::Network,
            ApiError::Server(_) => ErrorType::Server,
            ApiError::Status { .. } => ErrorType::Unknown,
            ApiError::MalformedBody(_) | ApiError::PathNotFound(_) | ApiError::Decode { .. } => {
                ErrorType::BadParsing
            }
        }
    }

    /// HTTP status of a non-2xx response, if that is what failed.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status } => Some(*status),
            _ => None,
        }
    }
}

/// Failure reported by a transport instead of a response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("request timed out")]
    Timeout,

    /// The transport refused the request before sending it, e.g. an invalid
    /// header name.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A response started arriving but could not be read in full.
    #[error("incomplete response: {0}")]
    Incomplete(String),
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connection(_) | TransportError::Timeout => {
                ApiError::Network(err.to_string())
            }
            TransportError::InvalidRequest(msg) => ApiError::InvalidRequest(msg),
            TransportError::Incomplete(msg) => ApiError::Server(msg),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_builder() {
            TransportError::InvalidRequest(err.to_string())
        } else if err.is_body() || err.is_decode() {
            TransportError::Incomplete(err.to_string())
        } else {
            TransportError::Connection(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_collapse_to_unknown() {
        let err = ApiError::Status { status: 404 };
        assert_eq!(err.kind(), ErrorType::Unknown);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "unexpected HTTP status 404");
    }

    #[test]
    fn parse_failures_are_bad_parsing() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ApiError::MalformedBody(json_err).kind(), ErrorType::BadParsing);
        assert_eq!(
            ApiError::PathNotFound("data.user".to_string()).kind(),
            ErrorType::BadParsing
        );
    }

    #[test]
    fn url_failures_are_bad_url() {
        let parse_err = url::Url::parse("").unwrap_err();
        let err = ApiError::InvalidUrl {
            url: String::new(),
            source: parse_err,
        };
        assert_eq!(err.kind(), ErrorType::BadUrl);
        assert_eq!(ApiError::UnsupportedScheme("ftp".into()).kind(), ErrorType::BadUrl);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn transport_errors_map_to_kinds() {
        let cases = [
            (TransportError::Connection("refused".into()), ErrorType::Network),
            (TransportError::Timeout, ErrorType::Network),
            (TransportError::InvalidRequest("bad header".into()), ErrorType::BadUrl),
            (TransportError::Incomplete("eof".into()), ErrorType::Server),
        ];
        for (transport_err, expected) in cases {
            assert_eq!(ApiError::from(transport_err).kind(), expected);
        }
    }
}
