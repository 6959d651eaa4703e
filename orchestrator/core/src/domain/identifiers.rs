// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Identifier value objects shared by every lifecycle request.
//!
//! All record-of-truth identifiers are UUID strings on the wire. Parsing one of
//! these newtypes is the syntactic identifier check used by request validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }

            pub fn as_uuid(&self) -> Uuid {
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
                Self::from_string(s)
            }
        }
    };
}

uuid_identifier!(
    /// Tenant scope (contract) under which clusters are provisioned
    ContractId
);

uuid_identifier!(
    /// Cloud-provider account a cluster is provisioned into
    CspId
);

uuid_identifier!(
    /// Cluster registered in the record-of-truth service
    ClusterId
);

uuid_identifier!(
    /// App group registered in the record-of-truth service
    AppGroupId
);

/// Returns true when `s` is a syntactically valid record-of-truth identifier.
pub fn is_valid_identifier(s: &str) -> bool {
    Uuid::parse_str(s).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_parsing() {
        let id = ClusterId::new();
        let parsed = ClusterId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);

        assert!(ContractId::from_string("THIS_IS_NOT_UUID").is_err());
        assert!(!is_valid_identifier(""));
        assert!(is_valid_identifier("550e8400-e29b-41d4-a716-446655440000"));
    }
}
