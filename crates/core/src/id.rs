//! Newtype identifiers for the records the engine tracks.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a product record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

/// Identifier of a transaction ledger entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

/// Identifier of a waste log entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WasteLogId(Uuid);

macro_rules! id_newtype {
    ($ty:ty, $label:literal) => {
        impl $ty {
            /// Mint a fresh identifier.
            ///
            /// Backed by UUIDv7, so ids minted later sort after ids minted
            /// earlier. Tests that need fixed ids should pass them in.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl core::fmt::Display for $ty {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $ty {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$ty> for Uuid {
            fn from(value: $ty) -> Self {
                value.0
            }
        }

        impl FromStr for $ty {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $label, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

id_newtype!(ProductId, "ProductId");
id_newtype!(EntryId, "EntryId");
id_newtype!(WasteLogId, "WasteLogId");
