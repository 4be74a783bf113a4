use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const MAX_ID_LEN: usize = 128;

macro_rules! id_type {
    ($name:ident) => {
        /// Opaque document identifier. Generated ids are UUID v4 strings, but
        /// any short printable string assigned by the check-in flow is accepted.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn parse(value: &str) -> Result<Self, CoreError> {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(CoreError::EmptyId);
                }
                if trimmed.len() > MAX_ID_LEN
                    || trimmed.chars().any(|ch| ch.is_control() || ch == '/')
                {
                    return Err(CoreError::InvalidId(trimmed.to_string()));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_type!(OrderId);

#[cfg(test)]
mod tests {
    use super::OrderId;
    use crate::error::CoreError;

    #[test]
    fn parse_trims_and_keeps_opaque_ids() {
        let id = OrderId::parse("  abc123 ").unwrap();
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn parse_rejects_blank_and_path_like_ids() {
        assert_eq!(OrderId::parse("   "), Err(CoreError::EmptyId));
        assert!(matches!(OrderId::parse("a/b"), Err(CoreError::InvalidId(_))));
        assert!(matches!(
            OrderId::parse(&"x".repeat(200)),
            Err(CoreError::InvalidId(_))
        ));
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(OrderId::new(), OrderId::new());
    }
}
