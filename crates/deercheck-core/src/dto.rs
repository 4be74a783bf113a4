use crate::domain::OrderDocument;
use crate::reorder::{extract_customer_info, extract_reorder_preferences};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderDto {
    pub success: bool,
    pub customer_info: Map<String, Value>,
    pub preferences: Map<String, Value>,
}

impl ReorderDto {
    pub fn from_order(order: &OrderDocument) -> Self {
        Self {
            success: true,
            customer_info: extract_customer_info(order),
            preferences: extract_reorder_preferences(order),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDto {
    pub success: bool,
    pub error: String,
}

impl ErrorDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneDto {
    pub input: String,
    pub normalized: String,
    pub valid: bool,
    pub display: String,
    pub pattern: String,
    pub exact: bool,
}

impl PhoneDto {
    pub fn from_input(input: &str) -> Self {
        let pattern = crate::domain::build_search_pattern(input);
        Self {
            input: input.to_string(),
            normalized: pattern.digits().to_string(),
            valid: crate::domain::is_valid_length(input),
            display: crate::domain::format_for_display(input),
            pattern: pattern.as_str().to_string(),
            exact: pattern.is_exact(),
        }
    }
}
