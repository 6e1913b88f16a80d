//! Resource fetch-and-render lifecycle shared by every back-office page.
//!
//! A page describes what it reads as a [`Resource`], owns a
//! [`ResourceView`] for it and renders whatever [`ViewState`] the view is in.
//! The lifecycle is `Idle → Loading → Ready | Failed`; a view never runs two
//! fetches at once and never writes state after its owner closed it.

use std::fmt::{Display, Formatter};

use url::form_urlencoded::byte_serialize;

use crate::gateway::errors::{ErrorClass, GatewayError};

pub mod normalize;
pub mod view;

pub use normalize::{normalize, normalize_list, normalize_one};
pub use view::{FetchOutcome, ResourceView};

/// Percent-encodes a dynamic path segment (spaces become `%20`).
pub fn encode_segment(segment: &str) -> String {
    byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// A GET-able endpoint plus its parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Resource {
    path: String,
    query: Vec<(String, String)>,
}

impl Resource {
    /// Starts from a fixed path such as `/api/Housing`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Appends a caller-supplied path value, encoded.
    pub fn segment(mut self, value: impl AsRef<str>) -> Self {
        let encoded = encode_segment(value.as_ref().trim());
        if !self.path.ends_with('/') {
            self.path.push('/');
        }
        self.path.push_str(&encoded);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}

/// A classified failure stored in [`ViewState::Failed`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchError {
    pub class: ErrorClass,
    /// Human-readable message for the page alert.
    pub message: String,
    /// What the server (or transport) reported, for logs.
    pub detail: String,
}

impl FetchError {
    pub fn invalid_response(detail: impl Into<String>) -> Self {
        Self {
            class: ErrorClass::InvalidResponse,
            message: ErrorClass::InvalidResponse.user_message().to_string(),
            detail: detail.into(),
        }
    }
}

impl From<&GatewayError> for FetchError {
    fn from(err: &GatewayError) -> Self {
        let class = err.class();
        Self {
            class,
            message: class.user_message().to_string(),
            detail: err.message.clone(),
        }
    }
}

impl From<GatewayError> for FetchError {
    fn from(err: GatewayError) -> Self {
        FetchError::from(&err)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(Vec<T>),
    Failed(FetchError),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Idle
    }
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn items(&self) -> Option<&[T]> {
        match self {
            ViewState::Ready(items) => Some(items),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            ViewState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// True when the data arrived and there is nothing to show.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, ViewState::Ready(items) if items.is_empty())
    }
}
