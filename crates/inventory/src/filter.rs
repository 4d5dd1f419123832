//! Read-only queries over the collection.

use crate::record::ProductRecord;

/// Filter criteria; every set criterion must match (logical AND).
///
/// Numeric bounds are strict: `min_quantity: Some(5)` keeps records with more
/// than 5 units. Blank search/category strings are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Case-insensitive substring over name, id, observation, size, color and location.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    pub min_quantity: Option<u64>,
    pub max_quantity: Option<u64>,
    /// Bounds on quantity × price.
    pub min_total: Option<f64>,
    pub max_total: Option<f64>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn quantity_above(mut self, n: u64) -> Self {
        self.min_quantity = Some(n);
        self
    }

    pub fn quantity_below(mut self, n: u64) -> Self {
        self.max_quantity = Some(n);
        self
    }

    pub fn total_above(mut self, v: f64) -> Self {
        self.min_total = Some(v);
        self
    }

    pub fn total_below(mut self, v: f64) -> Self {
        self.max_total = Some(v);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.search_term().is_none()
            && self.category_filter().is_none()
            && self.min_quantity.is_none()
            && self.max_quantity.is_none()
            && self.min_total.is_none()
            && self.max_total.is_none()
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn category_filter(&self) -> Option<&str> {
        self.category.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn matches(&self, record: &ProductRecord) -> bool {
        if let Some(term) = self.search_term() {
            let hit = [
                record.display_name(),
                record.id.as_str(),
                record.observation.as_str(),
                record.size.as_str(),
                record.color.as_str(),
                record.location.as_str(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }

        if let Some(category) = self.category_filter() {
            if record.category != category {
                return false;
            }
        }

        let quantity = record.quantity;
        if self.min_quantity.is_some_and(|min| quantity <= min) {
            return false;
        }
        if self.max_quantity.is_some_and(|max| quantity >= max) {
            return false;
        }

        let total = record.total_value();
        if self.min_total.is_some_and(|min| total <= min) {
            return false;
        }
        if self.max_total.is_some_and(|max| total >= max) {
            return false;
        }

        true
    }

    /// Matching records in collection order. Never mutates `records`.
    pub fn apply<'a>(&self, records: &'a [ProductRecord]) -> Vec<&'a ProductRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::InventoryProfile;
    use crate::record::ProductDraft;
    use chrono::Utc;

    fn records() -> Vec<ProductRecord> {
        let profile = InventoryProfile::babystock();
        let now = Utc::now();
        let mut pijama = ProductDraft::new("PIJ-001", "Pijamas")
            .name("Pijama Ositos")
            .quantity(8)
            .price(18.5);
        pijama.color = "Azul".to_string();
        pijama.size = "6M".to_string();

        vec![
            ProductDraft::new("BODY-001", "Bodies")
                .name("Body Blanco")
                .observation("almacén principal")
                .quantity(15)
                .price(12.99),
            pijama,
            ProductDraft::new("ACC-001", "Accesorios").quantity(2).price(3.0),
        ]
        .into_iter()
        .map(|d| d.into_record(&profile, now).unwrap())
        .collect()
    }

    fn ids(found: &[&ProductRecord]) -> Vec<String> {
        found.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn empty_criteria_returns_everything_in_order() {
        let all = records();
        let criteria = FilterCriteria::new().search("   ");
        assert!(criteria.is_empty());
        assert_eq!(ids(&criteria.apply(&all)), vec!["BODY-001", "PIJ-001", "ACC-001"]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let all = records();
        assert_eq!(ids(&FilterCriteria::new().search("OSITOS").apply(&all)), vec!["PIJ-001"]);
        assert_eq!(ids(&FilterCriteria::new().search("body-").apply(&all)), vec!["BODY-001"]);
        assert_eq!(ids(&FilterCriteria::new().search("ALMACÉN").apply(&all)), vec!["BODY-001"]);
        assert_eq!(ids(&FilterCriteria::new().search("azul").apply(&all)), vec!["PIJ-001"]);
        assert_eq!(ids(&FilterCriteria::new().search("6m").apply(&all)), vec!["PIJ-001"]);
    }

    #[test]
    fn search_matches_default_name() {
        let all = records();
        assert_eq!(ids(&FilterCriteria::new().search("sin nombre").apply(&all)), vec!["ACC-001"]);
    }

    #[test]
    fn category_is_exact() {
        let all = records();
        assert_eq!(ids(&FilterCriteria::new().category("Pijamas").apply(&all)), vec!["PIJ-001"]);
        assert!(FilterCriteria::new().category("pijamas").apply(&all).is_empty());
    }

    #[test]
    fn numeric_bounds_are_strict_and_combine_with_and() {
        let all = records();
        assert_eq!(
            ids(&FilterCriteria::new().quantity_above(8).apply(&all)),
            vec!["BODY-001"]
        );
        assert_eq!(
            ids(&FilterCriteria::new().quantity_below(8).apply(&all)),
            vec!["ACC-001"]
        );
        // 15 × 12.99 = 194.85, 8 × 18.5 = 148, 2 × 3 = 6
        assert_eq!(
            ids(&FilterCriteria::new().total_above(100.0).total_below(150.0).apply(&all)),
            vec!["PIJ-001"]
        );
        assert!(
            FilterCriteria::new()
                .category("Bodies")
                .quantity_below(10)
                .apply(&all)
                .is_empty()
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: filtering never changes the collection and only returns members of it.
            #[test]
            fn filter_does_not_mutate(term in "[a-zA-Z0-9 -]{0,8}", min in proptest::option::of(0u64..20)) {
                let all = records();
                let before = all.clone();
                let criteria = FilterCriteria { search: Some(term), min_quantity: min, ..FilterCriteria::default() };

                let found = criteria.apply(&all);
                prop_assert!(found.len() <= all.len());
                for r in &found {
                    prop_assert!(criteria.matches(r));
                }
                prop_assert_eq!(&all, &before);
                prop_assert_eq!(FilterCriteria::new().apply(&all).len(), before.len());
            }
        }
    }
}
