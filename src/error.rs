//! Error types for the Readmill API client.
//!
//! Every fallible operation in this crate returns [`Result`]. The variants
//! fall into four groups: malformed caller input, malformed responses,
//! transport failures and missing client configuration.

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for Readmill operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all Readmill API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed inside the reqwest transport
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Any other transport failure (connection refused, reset, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON was malformed or did not match the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Well-formed JSON that lacks the structure a helper expected
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// API returned an error status (see [`crate::client::Response::error_for_status`])
    #[error("API error: status={status}, code={code:?}, message={message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Optional error code from the API
        code: Option<String>,
        /// Human-readable error message
        message: String,
        /// Raw response body for debugging
        body: Value,
    },

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// An operation needs client configuration that was never set
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns `true` if the request never produced a response.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Transport(_))
    }

    /// Returns `true` if a response arrived but could not be interpreted.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Json(_) | Error::UnexpectedResponse(_))
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input, bad request, missing configuration).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 400 && *status < 500,
            Error::InvalidInput(_) | Error::Config(_) | Error::UrlParse(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Create an API error from a response body.
    ///
    /// Readmill reports failures as `{"error": "..."}`; some endpoints nest a
    /// `code`/`message` object instead. Both shapes are understood.
    pub(crate) fn from_api_response(status: u16, body: Value) -> Self {
        let error = body.get("error");

        let code = error
            .and_then(|e| e.get("code"))
            .and_then(|c| c.as_str())
            .map(String::from);

        let message = error
            .and_then(|e| e.as_str().or_else(|| e.get("message").and_then(|m| m.as_str())))
            .unwrap_or("Unknown API error")
            .to_string();

        Error::Api {
            status,
            code,
            message,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_transport() {
        assert!(Error::Transport("connection reset".into()).is_transport_error());
        assert!(!Error::InvalidInput("bad".into()).is_transport_error());
    }

    #[test]
    fn test_error_parse() {
        let json_err = serde_json::from_str::<Value>("{").unwrap_err();
        assert!(Error::Json(json_err).is_parse_error());
        assert!(Error::UnexpectedResponse("no items".into()).is_parse_error());
        assert!(!Error::Config("no redirect uri".into()).is_parse_error());
    }

    #[test]
    fn test_error_client() {
        assert!(Error::InvalidInput("odd".into()).is_client_error());
        assert!(Error::Config("missing".into()).is_client_error());
        assert!(!Error::Transport("down".into()).is_client_error());
    }

    #[test]
    fn test_from_api_response_nested() {
        let body = serde_json::json!({
            "error": {
                "code": "INVALID_READING",
                "message": "Reading validation failed"
            }
        });

        let err = Error::from_api_response(422, body);
        match err {
            Error::Api {
                status,
                code,
                message,
                ..
            } => {
                assert_eq!(status, 422);
                assert_eq!(code, Some("INVALID_READING".to_string()));
                assert_eq!(message, "Reading validation failed");
            }
            _ => panic!("Expected Api error"),
        }
    }

    #[test]
    fn test_from_api_response_flat() {
        let body = serde_json::json!({ "error": "invalid_grant" });

        let err = Error::from_api_response(401, body);
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        match err {
            Error::Api { code, message, .. } => {
                assert_eq!(code, None);
                assert_eq!(message, "invalid_grant");
            }
            _ => panic!("Expected Api error"),
        }
    }
}
