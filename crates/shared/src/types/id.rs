//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `UserId` where a `WalletId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user.");
typed_id!(WalletId, "Unique identifier for a wallet.");
typed_id!(PeriodId, "Unique identifier for a budgeting period.");
typed_id!(DepositId, "Unique identifier for a deposit.");
typed_id!(EntityId, "Unique identifier for a transfer counterparty.");
typed_id!(CategoryId, "Unique identifier for a transfer category.");
typed_id!(PredictionId, "Unique identifier for an expense prediction.");
typed_id!(TransferId, "Unique identifier for a transfer.");
typed_id!(SessionId, "Unique identifier for a user session.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(WalletId::new(), WalletId::new());
    }

    #[test]
    fn test_roundtrip_through_uuid() {
        let id = DepositId::new();
        assert_eq!(DepositId::from_uuid(id.into_inner()), id);
    }

    #[test]
    fn test_display_and_parse() {
        let id = PeriodId::new();
        let parsed = PeriodId::from_str(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(CategoryId::from_str("not-a-uuid").is_err());
    }
}
