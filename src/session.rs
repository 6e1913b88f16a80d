//! Explicit credentials context shared by the gateway and its callers.
//!
//! The session is set once (from configuration or a token file), read on
//! every request, and invalidated when the API answers `401` or the token
//! expires.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bearer token plus its optional expiry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_at: None,
        }
    }

    pub fn expiring_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// Cloneable handle; all clones observe the same credentials.
#[derive(Clone, Debug, Default)]
pub struct Session {
    inner: Arc<RwLock<Option<Credentials>>>,
}

impl Session {
    pub fn new(credentials: Option<Credentials>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(credentials)),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Reads credentials previously written by [`Session::persist`].
    ///
    /// A missing file yields an anonymous session.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No token file at {}", path.display());
            return Ok(Self::anonymous());
        }
        let raw = fs::read_to_string(path)?;
        let credentials: Credentials = serde_json::from_str(&raw).map_err(io::Error::other)?;
        Ok(Self::new(Some(credentials)))
    }

    /// Writes the current credentials, or removes the file when signed out.
    pub fn persist(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        match self.credentials() {
            Some(credentials) => {
                let raw = serde_json::to_string_pretty(&credentials).map_err(io::Error::other)?;
                fs::write(path, raw)
            }
            None if path.exists() => fs::remove_file(path),
            None => Ok(()),
        }
    }

    pub fn set(&self, credentials: Credentials) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(credentials);
    }

    pub fn invalidate(&self) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            log::info!("Session invalidated");
        }
    }

    /// Returns the bearer token, clearing the session once it has expired.
    pub fn token(&self) -> Option<String> {
        self.token_at(Utc::now())
    }

    pub fn token_at(&self, now: DateTime<Utc>) -> Option<String> {
        let credentials = self.credentials()?;
        if credentials.is_expired_at(now) {
            self.invalidate();
            return None;
        }
        Some(credentials.token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn credentials(&self) -> Option<Credentials> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn clones_share_state() {
        let session = Session::anonymous();
        let other = session.clone();
        session.set(Credentials::new("abc"));
        assert_eq!(other.token().as_deref(), Some("abc"));

        other.invalidate();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn expired_token_is_cleared() {
        let now = Utc::now();
        let session =
            Session::new(Some(Credentials::new("abc").expiring_at(now - Duration::minutes(1))));

        assert_eq!(session.token_at(now), None);
        assert!(session.credentials().is_none());
    }

    #[test]
    fn token_before_expiry_is_returned() {
        let now = Utc::now();
        let session =
            Session::new(Some(Credentials::new("abc").expiring_at(now + Duration::hours(1))));
        assert_eq!(session.token_at(now).as_deref(), Some("abc"));
    }

    #[test]
    fn persist_and_load_round_trip_the_token_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("token.json");

        let session = Session::new(Some(Credentials::new("secret")));
        session.persist(&path).expect("persist");

        let loaded = Session::load(&path).expect("load");
        assert_eq!(loaded.token().as_deref(), Some("secret"));

        loaded.invalidate();
        loaded.persist(&path).expect("persist signed out");
        assert!(!path.exists());
        assert!(!Session::load(&path).expect("load missing").is_authenticated());
    }
}
