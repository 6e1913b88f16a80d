//! Transient entities returned by the back-office API.
//!
//! Nothing here is persisted locally: values live only as long as the view
//! that fetched them.

pub mod bill;
pub mod housing;
pub mod rider;
pub mod shift;
pub mod spare_part;
pub mod types;
pub mod vehicle;

/// Generates a string-backed status enum with an `Other` catch-all so unknown
/// server values survive a round-trip.
macro_rules! status_enum {
    ($name:ident, $doc:expr, { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[doc = $doc]
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $($name::$variant => f.write_str($label),)+
                    $name::Other(s) => f.write_str(s),
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($label) {
                        return $name::$variant;
                    }
                )+
                $name::Other(trimmed.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                s.as_str().into()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.to_string()
            }
        }
    };
}

pub(crate) use status_enum;
