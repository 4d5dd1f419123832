//! Dashboard aggregates (derived, never stored).

use serde::Serialize;

use crate::reconcile::Discrepancy;
use crate::record::ProductRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_products: usize,
    pub total_quantity: u64,
    /// Σ quantity × price.
    pub total_value: f64,
    /// Records with quantity strictly below the profile threshold.
    pub low_stock: usize,
    /// Records with a physical count entered.
    pub counted: usize,
    pub matched: usize,
    pub surplus: usize,
    pub shortage: usize,
}

impl InventorySummary {
    pub fn compute(records: &[ProductRecord], low_stock_threshold: u64) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            acc.total_products += 1;
            acc.total_quantity = acc.total_quantity.saturating_add(r.quantity);
            acc.total_value += r.total_value();
            if r.is_low_stock(low_stock_threshold) {
                acc.low_stock += 1;
            }
            let discrepancy = r.discrepancy();
            if discrepancy.is_counted() {
                acc.counted += 1;
            }
            match discrepancy {
                Discrepancy::NotCounted => {}
                Discrepancy::Match => acc.matched += 1,
                Discrepancy::Surplus(_) => acc.surplus += 1,
                Discrepancy::Shortage(_) => acc.shortage += 1,
            }
            acc
        })
    }

    pub fn not_counted(&self) -> usize {
        self.total_products - self.counted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::InventoryProfile;
    use chrono::Utc;

    #[test]
    fn empty_inventory_is_all_zero() {
        assert_eq!(InventorySummary::compute(&[], 5), InventorySummary::default());
    }

    #[test]
    fn seed_totals() {
        let seed = InventoryProfile::babystock().seed_records(Utc::now());
        let summary = InventorySummary::compute(&seed, 5);
        assert_eq!(summary.total_products, 2);
        assert_eq!(summary.total_quantity, 23);
        assert!((summary.total_value - (15.0 * 12.99 + 8.0 * 18.5)).abs() < 1e-9);
        assert_eq!(summary.low_stock, 0);
        // Same records, reconciliation threshold.
        assert_eq!(InventorySummary::compute(&seed, 10).low_stock, 1);
    }

    #[test]
    fn reconciliation_counts() {
        let now = Utc::now();
        let mut records = InventoryProfile::babystock().seed_records(now);
        records[0].set_physical_count(15, now);
        records[1].set_physical_count(3, now);

        let summary = InventorySummary::compute(&records, 5);
        assert_eq!(summary.counted, 2);
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.shortage, 1);
        assert_eq!(summary.surplus, 0);
        assert_eq!(summary.not_counted(), 0);
    }
}
