//! Barcode value object.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use shopfloor_core::{DomainError, DomainResult};

/// A product's scannable barcode, its immutable business key.
///
/// Construction trims surrounding whitespace and rejects empty input, so a
/// held `Barcode` is always a usable lookup key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Barcode(String);

impl Barcode {
    pub fn new(raw: impl Into<String>) -> DomainResult<Self> {
        let trimmed = raw.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(DomainError::validation("barcode cannot be empty"));
        }
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Barcode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Barcode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Barcode::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let barcode = Barcode::new("  X1  ").unwrap();
        assert_eq!(barcode.as_str(), "X1");
    }

    #[test]
    fn empty_barcode_is_rejected() {
        let err = Barcode::new("   ").unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("barcode") => {}
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn parses_from_str() {
        let barcode: Barcode = "SKU-001".parse().unwrap();
        assert_eq!(barcode.as_str(), "SKU-001");
    }
}
