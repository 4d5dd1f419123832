//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Stock-keeping unit: the primary key of a product record.
///
/// Always trimmed and never blank. Comparison is exact (case-sensitive), the
/// same way the persisted blob compares ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sku(String);

impl Sku {
    /// Parse a user-entered or persisted identifier.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("SKU cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Build `PREFIX-NNN` (zero-padded to at least 3 digits).
    pub fn from_parts(prefix: &str, number: u64) -> Self {
        Self(format!("{prefix}-{number:03}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading decimal digits after `PREFIX-`, if this id carries that prefix.
    ///
    /// Returns `Some(0)` when the prefix matches but no digits follow.
    pub fn numeric_suffix(&self, prefix: &str) -> Option<u64> {
        let rest = self.0.strip_prefix(prefix)?.strip_prefix('-')?;
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        Some(digits.parse::<u64>().unwrap_or(0))
    }
}

impl core::fmt::Display for Sku {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Sku {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Sku {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Sku> for String {
    fn from(value: Sku) -> Self {
        value.0
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_rejects_blank() {
        assert_eq!(Sku::parse("  ROP-001 ").unwrap().as_str(), "ROP-001");
        match Sku::parse("   ").unwrap_err() {
            DomainError::InvalidId(_) => {}
            other => panic!("Expected InvalidId, got {other:?}"),
        }
    }

    #[test]
    fn from_parts_pads_to_three_digits() {
        assert_eq!(Sku::from_parts("ROP", 4).as_str(), "ROP-004");
        assert_eq!(Sku::from_parts("BODY", 1234).as_str(), "BODY-1234");
    }

    #[test]
    fn numeric_suffix_reads_leading_digits() {
        let sku = Sku::parse("ROP-003").unwrap();
        assert_eq!(sku.numeric_suffix("ROP"), Some(3));
        assert_eq!(sku.numeric_suffix("ACC"), None);

        assert_eq!(Sku::parse("ROP-12b").unwrap().numeric_suffix("ROP"), Some(12));
        assert_eq!(Sku::parse("ROP-abc").unwrap().numeric_suffix("ROP"), Some(0));
        assert_eq!(Sku::parse("ROP-").unwrap().numeric_suffix("ROP"), Some(0));
        // A longer prefix sharing the same letters does not count.
        assert_eq!(Sku::parse("ROPA-009").unwrap().numeric_suffix("ROP"), None);
    }

    #[test]
    fn serde_is_transparent_string() {
        let sku = Sku::parse("PIJ-001").unwrap();
        let json = serde_json::to_string(&sku).unwrap();
        assert_eq!(json, "\"PIJ-001\"");
        let back: Sku = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sku);
        assert!(serde_json::from_str::<Sku>("\"  \"").is_err());
    }
}
