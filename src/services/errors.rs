use thiserror::Error;

use crate::dto::alert::Alert;
use crate::forms::FormError;
use crate::gateway::errors::{ErrorClass, GatewayError};

/// Failure of a page operation. Never escapes the page: callers turn it into an [`Alert`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Local validation failed; nothing was sent.
    #[error("form error: {0}")]
    Form(#[from] FormError),

    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// The response did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("entity not found")]
    NotFound,

    #[error("report export failed: {0}")]
    Export(#[from] csv::Error),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn class(&self) -> Option<ErrorClass> {
        match self {
            ServiceError::Gateway(err) => Some(err.class()),
            ServiceError::Decode(_) => Some(ErrorClass::InvalidResponse),
            ServiceError::NotFound => Some(ErrorClass::NotFound),
            ServiceError::Form(_) | ServiceError::TypeConstraint(_) | ServiceError::Export(_) => {
                None
            }
        }
    }

    /// Localized text for the inline alert.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Form(err) => err.user_message(),
            ServiceError::TypeConstraint(message) => message.clone(),
            ServiceError::Export(_) => "Failed to export the report.".to_string(),
            _ => self
                .class()
                .map(ErrorClass::user_message)
                .unwrap_or_default()
                .to_string(),
        }
    }

    pub fn alert(&self) -> Alert {
        Alert::error(self.user_message())
    }

    /// True when the session must be re-established.
    pub fn is_session_expired(&self) -> bool {
        self.class() == Some(ErrorClass::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::errors::{GENERAL_ERROR_MESSAGE, NOT_FOUND_MESSAGE};

    #[test]
    fn bad_request_shows_the_general_message() {
        let err = ServiceError::from(GatewayError::with_status(400, "Plate already exists"));
        assert_eq!(err.user_message(), GENERAL_ERROR_MESSAGE);
        assert_ne!(err.user_message(), NOT_FOUND_MESSAGE);
    }

    #[test]
    fn unauthorized_is_a_session_expiry() {
        let err = ServiceError::from(GatewayError::with_status(401, "expired"));
        assert!(err.is_session_expired());
        assert!(!ServiceError::NotFound.is_session_expired());
    }

    #[test]
    fn form_errors_have_no_class() {
        let err = ServiceError::from(FormError::Unchanged { field: "status" });
        assert_eq!(err.class(), None);
        assert!(err.user_message().contains("status"));
    }
}
