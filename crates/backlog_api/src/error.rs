//! Error model used by Backlog XML-RPC client operations.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BacklogError>;

/// Represents the failures a remote call can end in: transport problems (HTTP status, authentication, timeout, network), responses that cannot be read as an XML-RPC envelope, remote faults and request composition errors.
#[derive(Debug, Error)]
pub enum BacklogError {
    #[error("http {status}: {message}")]
    Http { status: StatusCode, message: String },
    #[error("authentication error: {0}")]
    Authentication(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("remote fault {code}: {message}")]
    Fault { code: String, message: String },
    #[error("xml write error: {0}")]
    Xml(String),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl BacklogError {
    /// Constructs an HTTP error variant from a status and response body.
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        BacklogError::Http {
            status,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        BacklogError::MalformedResponse(message.into())
    }

    /// Returns true when the call failed before a complete response body was available.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            BacklogError::Http { .. }
                | BacklogError::Authentication(_)
                | BacklogError::Timeout(_)
                | BacklogError::Network(_)
        )
    }
}

impl From<reqwest::Error> for BacklogError {
    /// Converts reqwest errors into semantic BacklogError variants.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BacklogError::Timeout(err.to_string())
        } else if err.is_status() {
            let status = err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            BacklogError::Http {
                status,
                message: err.to_string(),
            }
        } else if err.is_connect() || err.is_request() || err.is_body() || err.is_decode() {
            // decode covers a body cut off before its declared length
            BacklogError::Network(err.to_string())
        } else {
            BacklogError::Other(err.to_string())
        }
    }
}

impl From<quick_xml::Error> for BacklogError {
    /// Parser failures on the response side mean the envelope is unreadable.
    fn from(err: quick_xml::Error) -> Self {
        BacklogError::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::BacklogError;
    use reqwest::StatusCode;

    #[test]
    fn transport_variants_are_classified() {
        assert!(BacklogError::http(StatusCode::BAD_GATEWAY, "down").is_transport());
        assert!(BacklogError::Authentication("denied".into()).is_transport());
        assert!(BacklogError::Timeout("slow".into()).is_transport());
        assert!(!BacklogError::malformed("eof").is_transport());
        assert!(!BacklogError::Fault {
            code: "1".into(),
            message: "nope".into()
        }
        .is_transport());
    }

    #[test]
    fn http_error_display_includes_status() {
        let err = BacklogError::http(StatusCode::NOT_FOUND, "missing");
        assert_eq!(err.to_string(), "http 404 Not Found: missing");
    }
}
