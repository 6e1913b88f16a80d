//! Normalized gateway failures and their classification.

use serde_json::Value;
use thiserror::Error;

/// Message shown for failures that have no more specific wording.
pub const GENERAL_ERROR_MESSAGE: &str =
    "Something went wrong while processing the request. Please try again.";
pub const NOT_FOUND_MESSAGE: &str = "The requested record was not found.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";
pub const SERVER_ERROR_MESSAGE: &str = "The server failed to process the request. Try again later.";
pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to reach the server. Check your connection and try again.";
pub const INVALID_RESPONSE_MESSAGE: &str = "The server returned data in an unexpected format.";

/// Every failed call, normalized to a `{status, message}` shape.
///
/// `status` is `None` when the request never produced a response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} (status: {status:?})")]
pub struct GatewayError {
    pub status: Option<u16>,
    pub message: String,
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    /// A failure where no response was received.
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Builds the error from a non-success response body.
    ///
    /// The message comes from a JSON `message`, `title` or `error` field, then
    /// the raw body text, then the canonical reason phrase.
    pub fn from_response(status: u16, body: &str) -> Self {
        let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
            ["message", "title", "error"].iter().find_map(|key| {
                value
                    .get(key)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
        });

        let message = from_json
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty() && !trimmed.starts_with('{')).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| {
                reqwest::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|code| code.canonical_reason())
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        Self::with_status(status, message)
    }

    pub fn class(&self) -> ErrorClass {
        ErrorClass::classify(self.status)
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => GatewayError::with_status(status.as_u16(), err.to_string()),
            None => GatewayError::network(err.to_string()),
        }
    }
}

/// Coarse failure taxonomy driving the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    NotFound,
    BadRequest,
    /// 401; the session is treated as expired.
    Unauthorized,
    ServerError,
    /// No response was received.
    Network,
    /// The response decoded but did not have the expected shape.
    InvalidResponse,
    Other(u16),
}

impl ErrorClass {
    pub fn classify(status: Option<u16>) -> Self {
        match status {
            None => ErrorClass::Network,
            Some(404) => ErrorClass::NotFound,
            Some(400) => ErrorClass::BadRequest,
            Some(401) => ErrorClass::Unauthorized,
            Some(s) if (500..=599).contains(&s) => ErrorClass::ServerError,
            Some(s) => ErrorClass::Other(s),
        }
    }

    pub fn user_message(self) -> &'static str {
        match self {
            ErrorClass::NotFound => NOT_FOUND_MESSAGE,
            ErrorClass::Unauthorized => SESSION_EXPIRED_MESSAGE,
            ErrorClass::ServerError => SERVER_ERROR_MESSAGE,
            ErrorClass::Network => NETWORK_ERROR_MESSAGE,
            ErrorClass::InvalidResponse => INVALID_RESPONSE_MESSAGE,
            ErrorClass::BadRequest | ErrorClass::Other(_) => GENERAL_ERROR_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_driven_by_status() {
        assert_eq!(ErrorClass::classify(Some(404)), ErrorClass::NotFound);
        assert_eq!(ErrorClass::classify(Some(400)), ErrorClass::BadRequest);
        assert_eq!(ErrorClass::classify(Some(401)), ErrorClass::Unauthorized);
        assert_eq!(ErrorClass::classify(Some(500)), ErrorClass::ServerError);
        assert_eq!(ErrorClass::classify(Some(503)), ErrorClass::ServerError);
        assert_eq!(ErrorClass::classify(Some(409)), ErrorClass::Other(409));
        assert_eq!(ErrorClass::classify(None), ErrorClass::Network);
    }

    #[test]
    fn not_found_is_never_a_server_error() {
        for _ in 0..3 {
            let err = GatewayError::from_response(404, "");
            assert_eq!(err.class(), ErrorClass::NotFound);
            assert_ne!(err.class(), ErrorClass::ServerError);
        }
        assert_eq!(GatewayError::network("refused").class(), ErrorClass::Network);
    }

    #[test]
    fn bad_request_uses_the_general_message() {
        assert_eq!(ErrorClass::BadRequest.user_message(), GENERAL_ERROR_MESSAGE);
        assert_ne!(ErrorClass::BadRequest.user_message(), NOT_FOUND_MESSAGE);
    }

    #[test]
    fn message_is_extracted_from_json_or_text() {
        let err = GatewayError::from_response(400, r#"{"message":"Plate already exists"}"#);
        assert_eq!(err.message, "Plate already exists");

        let err = GatewayError::from_response(400, r#"{"title":"One or more validation errors"}"#);
        assert_eq!(err.message, "One or more validation errors");

        let err = GatewayError::from_response(500, "boom");
        assert_eq!(err.message, "boom");

        let err = GatewayError::from_response(404, "");
        assert_eq!(err.message, "Not Found");
        assert_eq!(err.status, Some(404));
    }
}
