pub mod domain;
pub mod dto;
pub mod error;
pub mod reorder;
pub mod template;

pub use domain::*;
pub use dto::*;
pub use error::CoreError;
pub use reorder::{extract_customer_info, extract_reorder_preferences};
pub use template::{EmailTemplate, RenderedEmail, TemplateVars};
