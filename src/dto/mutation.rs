//! Result of a successful create/update/delete submission.

use std::time::Duration;

use serde::Serialize;

use crate::dto::alert::Alert;

/// Delay before navigating away after a successful submission.
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub to: String,
    pub after: Duration,
}

impl Redirect {
    pub fn delayed(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            after: REDIRECT_DELAY,
        }
    }
}

/// Generic result wrapper for mutations so callers can alert and redirect easily.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MutationOutcome {
    pub alert: Alert,
    pub redirect: Option<Redirect>,
    /// Body returned by the API, if any.
    pub response: serde_json::Value,
}

impl MutationOutcome {
    pub fn new(message: impl Into<String>, response: serde_json::Value) -> Self {
        Self {
            alert: Alert::success(message),
            redirect: None,
            response,
        }
    }

    pub fn redirect_to(mut self, to: impl Into<String>) -> Self {
        self.redirect = Some(Redirect::delayed(to));
        self
    }
}
