use crate::domain::ids::OrderId;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One check-in record as held by the document store.
///
/// `fields` is the raw document body. Nothing in this crate mutates it; the
/// projections in [`crate::reorder`] copy out of it by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDocument {
    pub id: OrderId,
    pub created_at: i64,
    pub fields: Map<String, Value>,
}

impl OrderDocument {
    pub fn from_value(id: OrderId, created_at: i64, value: Value) -> Result<Self, CoreError> {
        match value {
            Value::Object(fields) => Ok(Self {
                id,
                created_at,
                fields,
            }),
            _ => Err(CoreError::InvalidDocument),
        }
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn phone(&self) -> Option<String> {
        self.field("phone").and_then(phone_text)
    }
}

/// Text form of a stored `phone` value. Integer phones, as some intake forms
/// submit them, are rendered as their digits; other JSON types are ignored.
pub fn phone_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => number
            .as_u64()
            .map(|digits| digits.to_string())
            .or_else(|| number.as_i64().map(|digits| digits.to_string())),
        _ => None,
    }
}
