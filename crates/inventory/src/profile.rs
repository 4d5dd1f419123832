//! Per-deployment inventory tables.
//!
//! Each deployment picks one profile: the category/prefix table used for SKU
//! allocation, the low-stock threshold, the storage keys and the seed data used
//! when nothing has been stored yet.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Sku};

use crate::record::{ProductDraft, ProductRecord};
use crate::sku;

/// A category and the short SKU prefix allocated for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPrefix {
    pub category: String,
    pub prefix: String,
}

impl CategoryPrefix {
    pub fn new(category: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            prefix: prefix.into(),
        }
    }
}

/// Built-in profile selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    /// Baby-clothing stock with prices and photos.
    BabyStock,
    /// Generic stock with physical-count reconciliation.
    Count,
}

impl FromStr for ProfileKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "babystock" | "baby" => Ok(Self::BabyStock),
            "count" | "conteo" => Ok(Self::Count),
            other => Err(DomainError::validation(format!("unknown profile: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryProfile {
    app_name: String,
    storage_key: String,
    legacy_key: Option<String>,
    categories: Vec<CategoryPrefix>,
    low_stock_threshold: u64,
    seed: Vec<ProductDraft>,
}

impl InventoryProfile {
    pub fn new(
        app_name: impl Into<String>,
        storage_key: impl Into<String>,
        categories: Vec<CategoryPrefix>,
        low_stock_threshold: u64,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            storage_key: storage_key.into(),
            legacy_key: None,
            categories,
            low_stock_threshold,
            seed: Vec::new(),
        }
    }

    pub fn builtin(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::BabyStock => Self::babystock(),
            ProfileKind::Count => Self::count(),
        }
    }

    /// Baby-clothing stock: seven categories, low stock below 5.
    pub fn babystock() -> Self {
        let categories = [
            ("Bodies", "BODY"),
            ("Pijamas", "PIJ"),
            ("Conjuntos", "CONJ"),
            ("Accesorios", "ACC"),
            ("Calzado", "CALZ"),
            ("Abrigos", "ABR"),
            ("Otros", "OTR"),
        ]
        .into_iter()
        .map(|(c, p)| CategoryPrefix::new(c, p))
        .collect();

        Self::new("BabyStock", "babystock_inventory", categories, 5).with_seed(vec![
            ProductDraft::new("BODY-001", "Bodies")
                .name("Body Blanco")
                .observation("Stock disponible en almacén principal")
                .quantity(15)
                .price(12.99),
            ProductDraft::new("PIJ-001", "Pijamas")
                .name("Pijama Ositos")
                .observation("Muy popular, considerar reposición")
                .quantity(8)
                .price(18.50),
        ])
    }

    /// Generic stock with physical counts: three categories, low stock below 10.
    pub fn count() -> Self {
        let categories = vec![
            CategoryPrefix::new("Ropa", "ROP"),
            CategoryPrefix::new("Accesorios", "ACC"),
            CategoryPrefix::new("Otros", "OTR"),
        ];
        Self::new("Control de Inventario", "inventory_count_items", categories, 10)
            .with_legacy_key("inventory_items")
    }

    pub fn with_legacy_key(mut self, key: impl Into<String>) -> Self {
        self.legacy_key = Some(key.into());
        self
    }

    pub fn with_seed(mut self, seed: Vec<ProductDraft>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_low_stock_threshold(mut self, threshold: u64) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn legacy_key(&self) -> Option<&str> {
        self.legacy_key.as_deref()
    }

    /// Key holding the timestamp of the last successful export.
    pub fn backup_marker_key(&self) -> String {
        format!("{}_last_backup", self.storage_key)
    }

    pub fn low_stock_threshold(&self) -> u64 {
        self.low_stock_threshold
    }

    pub fn prefix_for(&self, category: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.prefix.as_str())
    }

    /// Propose the next free SKU for `category` given the existing records.
    ///
    /// Nothing is reserved: two proposals made before either is inserted will
    /// collide, and the second insert is rejected as a duplicate.
    pub fn next_sku(&self, category: &str, records: &[ProductRecord]) -> DomainResult<Sku> {
        let prefix = self
            .prefix_for(category.trim())
            .ok_or_else(|| DomainError::unknown_category(category.trim()))?;
        Ok(sku::next_sku(prefix, records.iter().map(|r| &r.id)))
    }

    /// Records used when nothing has been persisted yet.
    pub fn seed_records(&self, now: DateTime<Utc>) -> Vec<ProductRecord> {
        self.seed
            .iter()
            .cloned()
            .filter_map(|draft| draft.into_record(self, now).ok())
            .collect()
    }
}
