use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("id is required")]
    EmptyId,
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("order document must be a JSON object")]
    InvalidDocument,
    #[error("phone search pattern does not compile: {0}")]
    InvalidSearchPattern(String),
    #[error("invalid template variable name: {0}")]
    InvalidTemplateVariable(String),
}
