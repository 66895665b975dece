//! Strongly-typed ID wrappers for all entity types
//!
//! Ids are opaque strings on the wire (UUID v4 text) but distinct types in
//! code, so an income id can never be passed where a bank id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Full string form, as stored by the backends
            pub fn to_storage_string(&self) -> String {
                self.0.to_string()
            }

            /// Short prefixed form used in tables and messages
            pub fn short(&self) -> String {
                format!("{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(IncomeId, "inc-");
define_id!(ExpenseId, "exp-");
define_id!(BankId, "bnk-");
define_id!(AccountId, "acc-");
define_id!(CardId, "crd-");
define_id!(WalletId, "wal-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_form() {
        let id = ExpenseId::new();
        let short = id.short();
        assert!(short.starts_with("exp-"));
        assert_eq!(short.len(), 12);
    }

    #[test]
    fn test_display_is_full_uuid() {
        let id = BankId::new();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
        assert_eq!(id.to_string(), id.to_storage_string());
    }

    #[test]
    fn test_parse_round_trip() {
        let id = IncomeId::new();
        let parsed: IncomeId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("not-an-id".parse::<CardId>().is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: WalletId = uuid_str.parse().unwrap();
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            format!("\"{}\"", uuid_str)
        );
    }
}
