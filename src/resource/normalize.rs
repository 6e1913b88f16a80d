//! Uniform payload normalization for list and detail reads.
//!
//! Some endpoints answer a single object where a list is expected, or `null`
//! when nothing matches. Every read goes through these functions instead of
//! checking the shape at each call site.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// `null` becomes `[]`, an array yields its items, anything else is wrapped.
pub fn normalize(payload: Value) -> Vec<Value> {
    match payload {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        other => vec![other],
    }
}

pub fn normalize_list<T: DeserializeOwned>(payload: Value) -> Result<Vec<T>, serde_json::Error> {
    normalize(payload)
        .into_iter()
        .map(serde_json::from_value)
        .collect()
}

/// Detail read: `null` or `[]` is `None`, a list yields its first item.
pub fn normalize_one<T: DeserializeOwned>(payload: Value) -> Result<Option<T>, serde_json::Error> {
    normalize(payload)
        .into_iter()
        .next()
        .map(serde_json::from_value)
        .transpose()
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn bare_object_is_wrapped() {
        assert_eq!(normalize(json!({"name": "A"})), vec![json!({"name": "A"})]);
        let typed: Vec<Named> = normalize_list(json!({"name": "A"})).expect("decode");
        assert_eq!(
            typed,
            vec![Named {
                name: "A".to_string()
            }]
        );
    }

    #[test]
    fn null_is_empty() {
        assert!(normalize(Value::Null).is_empty());
        let typed: Vec<Named> = normalize_list(Value::Null).expect("decode");
        assert!(typed.is_empty());
    }

    #[test]
    fn normalization_is_idempotent() {
        let payloads = [
            Value::Null,
            json!({"name": "A"}),
            json!([{"name": "A"}, {"name": "B"}]),
            json!([]),
            json!("text"),
            json!([[1, 2]]),
        ];
        for payload in payloads {
            let once = normalize(payload);
            let twice = normalize(Value::Array(once.clone()));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn detail_reads_take_the_first_item() {
        let one: Option<Named> = normalize_one(json!([{"name": "A"}, {"name": "B"}])).expect("ok");
        assert_eq!(one.map(|n| n.name).as_deref(), Some("A"));
        let none: Option<Named> = normalize_one(json!([])).expect("ok");
        assert!(none.is_none());
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        assert!(normalize_list::<Named>(json!([{"id": 1}])).is_err());
    }
}
