//! Physical-count reconciliation.

use serde::{Deserialize, Serialize};

/// Difference between a manual count and the recorded stock.
///
/// A physical count of 0 means "not yet counted", which is reported separately
/// from a count that happens to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "units", rename_all = "snake_case")]
pub enum Discrepancy {
    NotCounted,
    Match,
    /// More units on the shelf than recorded.
    Surplus(u64),
    /// Fewer units on the shelf than recorded.
    Shortage(u64),
}

impl Discrepancy {
    pub fn between(system_stock: u64, physical_count: u64) -> Self {
        if physical_count == 0 {
            return Self::NotCounted;
        }
        match physical_count.cmp(&system_stock) {
            core::cmp::Ordering::Equal => Self::Match,
            core::cmp::Ordering::Greater => Self::Surplus(physical_count - system_stock),
            core::cmp::Ordering::Less => Self::Shortage(system_stock - physical_count),
        }
    }

    /// `physicalCount − systemStock`, or `None` before a count exists.
    pub fn delta(&self) -> Option<i64> {
        match *self {
            Self::NotCounted => None,
            Self::Match => Some(0),
            Self::Surplus(n) => Some(i64::try_from(n).unwrap_or(i64::MAX)),
            Self::Shortage(n) => Some(i64::try_from(n).map(|v| -v).unwrap_or(i64::MIN)),
        }
    }

    pub fn is_counted(&self) -> bool {
        !matches!(self, Self::NotCounted)
    }
}

impl core::fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotCounted => f.write_str("sin contar"),
            Self::Match => f.write_str("0"),
            Self::Surplus(n) => write!(f, "+{n}"),
            Self::Shortage(n) => write!(f, "-{n}"),
        }
    }
}
