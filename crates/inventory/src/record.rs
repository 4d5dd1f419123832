//! Product records and the inputs that create or overwrite them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, Sku};

use crate::profile::InventoryProfile;
use crate::reconcile::Discrepancy;
use crate::sanitize::{clamp_price, optional_text};

/// Name shown for records created without one.
pub const DEFAULT_NAME: &str = "Sin nombre";

/// A product record as held in memory and persisted.
///
/// The shape is strict: every numeric field is already non-negative and every
/// text field is trimmed. Loose input goes through [`crate::sanitize`] or
/// [`ProductDraft`] / [`ProductPatch`] first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: Sku,
    pub category: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub observation: String,
    #[serde(default)]
    pub location: String,
    /// Recorded stock (`systemStock` in the physical-count profile).
    #[serde(alias = "systemStock")]
    pub quantity: u64,
    #[serde(default)]
    pub price: f64,
    /// Manually counted stock; 0 means "not yet counted".
    #[serde(default)]
    pub physical_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Entity for ProductRecord {
    type Id = Sku;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl ProductRecord {
    /// Name for display, falling back to [`DEFAULT_NAME`].
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            DEFAULT_NAME
        } else {
            &self.name
        }
    }

    /// quantity × price.
    pub fn total_value(&self) -> f64 {
        self.quantity as f64 * self.price
    }

    pub fn is_low_stock(&self, threshold: u64) -> bool {
        self.quantity < threshold
    }

    pub fn discrepancy(&self) -> Discrepancy {
        Discrepancy::between(self.quantity, self.physical_count)
    }

    /// Record a physical count and refresh the update timestamp.
    pub fn set_physical_count(&mut self, count: u64, now: DateTime<Utc>) {
        self.physical_count = count;
        self.last_updated = now;
    }
}

/// Input for creating a record.
///
/// Numbers are already typed; the app layer turns form strings into them with
/// [`crate::coerce_count_str`] / [`crate::coerce_price_str`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub id: String,
    pub category: String,
    pub name: String,
    pub color: String,
    pub size: String,
    pub observation: String,
    pub location: String,
    pub quantity: u64,
    pub price: f64,
    pub physical_count: u64,
    pub photo: Option<String>,
}

impl ProductDraft {
    pub fn new(id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn observation(mut self, observation: impl Into<String>) -> Self {
        self.observation = observation.into();
        self
    }

    pub fn quantity(mut self, quantity: u64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Validate against the profile and stamp creation time.
    pub fn into_record(self, profile: &InventoryProfile, now: DateTime<Utc>) -> DomainResult<ProductRecord> {
        let id = Sku::parse(&self.id)?;
        let category = self.category.trim().to_string();
        if category.is_empty() {
            return Err(DomainError::validation("category cannot be empty"));
        }
        if profile.prefix_for(&category).is_none() {
            return Err(DomainError::unknown_category(category));
        }

        let name = match self.name.trim() {
            "" => DEFAULT_NAME.to_string(),
            n => n.to_string(),
        };

        Ok(ProductRecord {
            id,
            category,
            name,
            color: self.color.trim().to_string(),
            size: self.size.trim().to_string(),
            observation: self.observation.trim().to_string(),
            location: self.location.trim().to_string(),
            quantity: self.quantity,
            price: clamp_price(self.price),
            physical_count: self.physical_count,
            photo: self.photo.as_deref().and_then(optional_text),
            created_at: now,
            last_updated: now,
        })
    }
}

/// Field-level overwrite for an existing record. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub category: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub observation: Option<String>,
    pub location: Option<String>,
    pub quantity: Option<u64>,
    pub price: Option<f64>,
    /// `Some("")` (or blank) removes the photo.
    pub photo: Option<String>,
}

impl ProductPatch {
    /// Overwrite the listed fields and refresh `last_updated`.
    ///
    /// Validation happens before any field is touched, so a rejected patch
    /// leaves the record unchanged. Keeping the record's current category is
    /// always allowed, even one the profile does not list (imported records).
    pub fn apply_to(
        &self,
        record: &mut ProductRecord,
        profile: &InventoryProfile,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let category = match &self.category {
            Some(c) => {
                let c = c.trim();
                if c != record.category && profile.prefix_for(c).is_none() {
                    return Err(DomainError::unknown_category(c));
                }
                Some(c.to_string())
            }
            None => None,
        };

        if let Some(c) = category {
            record.category = c;
        }
        if let Some(name) = &self.name {
            record.name = match name.trim() {
                "" => DEFAULT_NAME.to_string(),
                n => n.to_string(),
            };
        }
        overwrite(&mut record.color, &self.color);
        overwrite(&mut record.size, &self.size);
        overwrite(&mut record.observation, &self.observation);
        overwrite(&mut record.location, &self.location);
        if let Some(q) = self.quantity {
            record.quantity = q;
        }
        if let Some(p) = self.price {
            record.price = clamp_price(p);
        }
        if let Some(photo) = &self.photo {
            record.photo = optional_text(photo);
        }

        record.last_updated = now;
        Ok(())
    }
}

fn overwrite(field: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        *field = v.trim().to_string();
    }
}
