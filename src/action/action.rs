use crate::error::{Result, StoreError};
use rand::Rng;
use serde_json::{Map, Value};
use std::fmt;

/// Action type dispatched when a store is created or its reducer is replaced.
pub(crate) const INIT: &str = "@@reducto/INIT";

const PROBE_PREFIX: &str = "@@reducto/PROBE_UNKNOWN_ACTION_";
const PROBE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLM";
const PROBE_LEN: usize = 20;

/// A request to change state.
///
/// Every action carries a mandatory `type` discriminant plus an open set of
/// payload fields.
///
/// ```
/// use reducto::Action;
///
/// let action = Action::new("ADD_TODO").with("text", "Hello");
/// assert_eq!(action.action_type(), "ADD_TODO");
/// assert_eq!(action.get_str("text"), Some("Hello"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    action_type: String,
    payload: Map<String, Value>,
}

impl Action {
    /// Create an action with an empty payload.
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            payload: Map::new(),
        }
    }

    /// Add a payload field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// The `type` discriminant.
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    /// Whether this action has the given type.
    pub fn is(&self, action_type: &str) -> bool {
        self.action_type == action_type
    }

    /// Every field besides `type`.
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// A payload field, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// A payload field, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }

    /// Whether this is one of the store's private actions (INIT or a probe).
    ///
    /// Reducers must treat reserved actions like any other unknown action.
    pub fn is_reserved(&self) -> bool {
        self.action_type == INIT || self.action_type.starts_with(PROBE_PREFIX)
    }

    /// The record form of this action, with `type` alongside the payload.
    pub fn to_value(&self) -> Value {
        let mut record = self.payload.clone();
        record.insert("type".to_string(), Value::String(self.action_type.clone()));
        Value::Object(record)
    }

    pub(crate) fn init() -> Self {
        Self::new(INIT)
    }

    pub(crate) fn is_init(&self) -> bool {
        self.action_type == INIT
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.action_type)
    }
}

impl TryFrom<Value> for Action {
    type Error = StoreError;

    /// Convert a JSON record into an action.
    ///
    /// Non-object values and records whose `type` is missing or null are rejected.
    /// Scalar types such as `false`, `0` or `""` are accepted.
    fn try_from(value: Value) -> Result<Self> {
        let mut record = match value {
            Value::Object(record) => record,
            other => {
                return Err(StoreError::MalformedAction(format!(
                    "Actions must be plain records, instead received {}. Consider adding \
                     middleware to change this",
                    json_kind(&other)
                )))
            }
        };

        let action_type = match record.remove("type") {
            None | Some(Value::Null) => {
                return Err(StoreError::MalformedAction(
                    "Actions may not have an undefined \"type\" property. Have you misspelled a \
                     constant?"
                        .to_string(),
                ))
            }
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
        };

        Ok(Self {
            action_type,
            payload: record,
        })
    }
}

/// Generate a fresh, unguessable probe action type.
pub(crate) fn probe_type() -> String {
    let mut rng = rand::rng();
    let token: Vec<String> = (0..PROBE_LEN)
        .map(|_| {
            let idx = rng.random_range(0..PROBE_ALPHABET.len());
            (PROBE_ALPHABET[idx] as char).to_string()
        })
        .collect();
    format!("{}{}", PROBE_PREFIX, token.join("."))
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_payload() {
        let action = Action::new("ADD_TODO").with("text", "Hello").with("id", 3);
        assert!(action.is("ADD_TODO"));
        assert_eq!(action.get_str("text"), Some("Hello"));
        assert_eq!(action.get("id"), Some(&json!(3)));
        assert_eq!(
            action.to_value(),
            json!({"type": "ADD_TODO", "text": "Hello", "id": 3})
        );
    }

    #[test]
    fn converts_plain_records() {
        let action = Action::try_from(json!({"type": "ADD_TODO", "text": "Hi"})).unwrap();
        assert_eq!(action.action_type(), "ADD_TODO");
        assert_eq!(action.get_str("text"), Some("Hi"));
        assert!(action.get("type").is_none());
    }

    #[test]
    fn rejects_non_records() {
        for value in [json!(null), json!(42), json!("hey"), json!([1, 2])] {
            let err = Action::try_from(value).unwrap_err();
            assert!(matches!(err, StoreError::MalformedAction(_)));
        }
    }

    #[test]
    fn rejects_missing_or_null_type() {
        for value in [json!({}), json!({"type": null}), json!({"text": "x"})] {
            let err = Action::try_from(value).unwrap_err();
            assert!(err.to_string().contains("may not have an undefined \"type\""));
        }
    }

    #[test]
    fn accepts_falsy_types() {
        assert_eq!(Action::try_from(json!({"type": false})).unwrap().action_type(), "false");
        assert_eq!(Action::try_from(json!({"type": 0})).unwrap().action_type(), "0");
        assert_eq!(Action::try_from(json!({"type": ""})).unwrap().action_type(), "");
    }

    #[test]
    fn probe_types_are_reserved_and_unique() {
        let a = probe_type();
        let b = probe_type();
        assert_ne!(a, b);
        assert!(Action::new(a).is_reserved());
        assert!(Action::init().is_reserved());
        assert!(!Action::new("ADD_TODO").is_reserved());
    }
}
