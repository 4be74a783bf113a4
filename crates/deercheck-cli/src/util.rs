use anyhow::{anyhow, Result};
use chrono::Utc;
use deercheck_core::domain::OrderId;
use deercheck_core::template::{validate_variable_name, TemplateVars};

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn parse_order_id(raw: &str) -> Result<OrderId> {
    OrderId::parse(raw).map_err(|err| anyhow!("invalid order id: {err}"))
}

/// Parses repeated `key=value` flags. Later keys override earlier ones.
pub fn parse_vars(raw: &[String]) -> Result<TemplateVars> {
    let mut vars = TemplateVars::new();
    for item in raw {
        let (key, value) = item
            .split_once('=')
            .ok_or_else(|| anyhow!("template variable must be key=value: {item}"))?;
        let key = validate_variable_name(key.trim())?;
        vars.insert(key.to_string(), value.to_string());
    }
    Ok(vars)
}

#[cfg(test)]
mod tests {
    use super::{parse_order_id, parse_vars};

    #[test]
    fn parse_vars_splits_on_first_equals() {
        let vars = parse_vars(&["name=Pat".to_string(), "note=a=b".to_string()]).unwrap();
        assert_eq!(vars["name"], "Pat");
        assert_eq!(vars["note"], "a=b");
    }

    #[test]
    fn parse_vars_rejects_missing_equals_and_bad_names() {
        assert!(parse_vars(&["name".to_string()]).is_err());
        assert!(parse_vars(&["bad name=x".to_string()]).is_err());
    }

    #[test]
    fn parse_order_id_rejects_blank() {
        assert!(parse_order_id("  ").is_err());
        assert_eq!(parse_order_id("abc").unwrap().as_str(), "abc");
    }
}
