//! `{{ variable }}` substitution for notification emails.

use crate::domain::{format_for_display, OrderDocument};
use crate::error::CoreError;
use crate::reorder::{customer_info_from_fields, reorder_preferences_from_fields};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub type TemplateVars = BTreeMap<String, String>;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_.]+)\s*\}\}")
            .unwrap_or_else(|_| unreachable!("placeholder regex is valid"))
    })
}

pub fn validate_variable_name(name: &str) -> Result<&str, CoreError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '.');
    if valid {
        Ok(name)
    } else {
        Err(CoreError::InvalidTemplateVariable(name.to_string()))
    }
}

/// Substitutes known variables. Unknown placeholders stay in the output as
/// written so a missing value is visible rather than silently blank.
pub fn render(template: &str, vars: &TemplateVars) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures<'_>| match vars.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

pub fn placeholders(template: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for caps in placeholder_regex().captures_iter(template) {
        let name = &caps[1];
        if !out.iter().any(|existing| existing == name) {
            out.push(name.to_string());
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

impl EmailTemplate {
    pub fn render(&self, vars: &TemplateVars) -> RenderedEmail {
        RenderedEmail {
            subject: render(&self.subject, vars),
            body: render(&self.body, vars),
        }
    }

    pub fn placeholders(&self) -> Vec<String> {
        let mut names = placeholders(&self.subject);
        for name in placeholders(&self.body) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

/// Variables an order exposes to templates: contact and preference fields
/// only, so a template cannot print money amounts.
pub fn order_variables(order: &OrderDocument, business_name: &str) -> TemplateVars {
    let mut vars = TemplateVars::new();
    let info = customer_info_from_fields(&order.fields);
    let prefs = reorder_preferences_from_fields(&order.fields);
    for (key, value) in info.iter().chain(prefs.iter()) {
        if let Some(text) = scalar_text(value) {
            vars.insert(key.clone(), text);
        }
    }
    if let Some(phone) = order.phone() {
        vars.insert("formattedPhone".to_string(), format_for_display(&phone));
    }
    vars.insert("orderId".to_string(), order.id.to_string());
    vars.insert("businessName".to_string(), business_name.to_string());
    vars
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(if *flag { "yes" } else { "no" }.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
