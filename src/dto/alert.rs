//! Dismissible banner shown near the top of the page content.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AlertLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// CSS class suffix used by the alert banner.
pub fn alert_level_to_str(level: &AlertLevel) -> &'static str {
    match level {
        AlertLevel::Error => "danger",
        AlertLevel::Warning => "warning",
        AlertLevel::Success => "success",
        AlertLevel::Info => "info",
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub dismissible: bool,
}

impl Alert {
    pub fn new(level: AlertLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            dismissible: true,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(AlertLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(AlertLevel::Error, message)
    }

    pub fn css_class(&self) -> &'static str {
        alert_level_to_str(&self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_level_to_str_mappings() {
        assert_eq!(alert_level_to_str(&AlertLevel::Error), "danger");
        assert_eq!(alert_level_to_str(&AlertLevel::Warning), "warning");
        assert_eq!(alert_level_to_str(&AlertLevel::Success), "success");
        assert_eq!(alert_level_to_str(&AlertLevel::Info), "info");
    }

    #[test]
    fn alerts_are_dismissible() {
        let alert = Alert::error("boom");
        assert!(alert.dismissible);
        assert_eq!(alert.css_class(), "danger");
    }
}
