//! Commands the UI shell calls into.
//!
//! Each command runs to completion against the store and returns a `Notice`
//! describing what happened; no error escapes as a panic or a raw error type.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use thiserror::Error;

use stockroom_core::{DomainError, Sku};
use stockroom_infra::{
    DeleteOutcome, FileKeyValueStore, ImportOutcome, InventoryStore, KeyValueStore, StoreError,
    write_atomic,
};
use stockroom_inventory::{
    BackupStatus, Confirm, FilterCriteria, InventoryProfile, InventorySummary, ProductDraft,
    ProductPatch, ProductRecord, Snapshot, coerce_count_str, coerce_price_str,
};

use crate::config::AppConfig;
use crate::notice::Notice;
use crate::preferences::{self, Theme};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Raw form input, as typed by the user.
///
/// Numeric fields are text; they are coerced to non-negative numbers with the
/// same rules used for imports (`"abc"` becomes 0).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub sku: String,
    pub category: String,
    pub name: String,
    pub color: String,
    pub size: String,
    pub observation: String,
    pub location: String,
    pub quantity: String,
    pub price: String,
    pub photo: Option<String>,
}

impl ProductForm {
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            id: self.sku.clone(),
            category: self.category.clone(),
            name: self.name.clone(),
            color: self.color.clone(),
            size: self.size.clone(),
            observation: self.observation.clone(),
            location: self.location.clone(),
            quantity: coerce_count_str(&self.quantity),
            price: coerce_price_str(&self.price),
            physical_count: 0,
            photo: self.photo.clone(),
        }
    }

    /// The edit form overwrites every field it shows; the photo only when one was picked.
    pub fn to_patch(&self) -> ProductPatch {
        ProductPatch {
            category: Some(self.category.clone()),
            name: Some(self.name.clone()),
            color: Some(self.color.clone()),
            size: Some(self.size.clone()),
            observation: Some(self.observation.clone()),
            location: Some(self.location.clone()),
            quantity: Some(coerce_count_str(&self.quantity)),
            price: Some(coerce_price_str(&self.price)),
            photo: self.photo.clone(),
        }
    }
}

/// Read config from the environment, start logging and open the file-backed app.
pub fn bootstrap() -> anyhow::Result<App<FileKeyValueStore>> {
    let config = AppConfig::from_env()?;
    stockroom_observability::init_with(config.log_format);
    tracing::info!(data_dir = %config.data_dir.display(), profile = ?config.profile, "starting");
    App::from_config(&config, Utc::now())
}

#[derive(Debug)]
pub struct App<S> {
    store: InventoryStore<S>,
    theme: Theme,
}

impl App<FileKeyValueStore> {
    pub fn from_config(config: &AppConfig, now: DateTime<Utc>) -> anyhow::Result<Self> {
        let storage = FileKeyValueStore::open(&config.data_dir)
            .with_context(|| format!("failed to open data dir {:?}", config.data_dir))?;
        App::open(storage, config.inventory_profile(), now).context("failed to open inventory")
    }
}

impl<S> App<S>
where
    S: KeyValueStore,
{
    pub fn open(storage: S, profile: InventoryProfile, now: DateTime<Utc>) -> Result<Self, AppError> {
        let theme = preferences::load_theme(&storage);
        let store = InventoryStore::open(storage, profile, now)?;
        Ok(Self { store, theme })
    }

    pub fn store(&self) -> &InventoryStore<S> {
        &self.store
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Notice {
        let next = self.theme.toggled();
        if let Err(err) = preferences::save_theme(self.store.storage(), next) {
            tracing::error!(error = %err, "failed to persist theme");
            return Notice::error("No se pudo guardar el tema");
        }
        self.theme = next;
        match next {
            Theme::Dark => Notice::info("Modo oscuro activado"),
            Theme::Light => Notice::info("Modo claro activado"),
        }
    }

    pub fn dashboard(&self) -> InventorySummary {
        self.store.summary()
    }

    pub fn list(&self, criteria: &FilterCriteria) -> Vec<&ProductRecord> {
        self.store.filter(criteria)
    }

    /// SKU proposal for the category picked in the form.
    pub fn suggest_sku(&self, category: &str) -> Result<Sku, Notice> {
        if category.trim().is_empty() {
            return Err(Notice::info("Seleccione una categoría primero"));
        }
        self.store.next_sku(category).map_err(|e| notice_for(&e))
    }

    pub fn add_product(&mut self, form: &ProductForm, now: DateTime<Utc>) -> Notice {
        match self.store.add(form.to_draft(), now) {
            Ok(_) => Notice::success("Producto agregado exitosamente"),
            Err(e) => notice_for(&e),
        }
    }

    pub fn edit_product(&mut self, sku: &str, form: &ProductForm, now: DateTime<Utc>) -> Notice {
        let Ok(sku) = Sku::parse(sku) else {
            return Notice::info("Producto no encontrado");
        };
        match self.store.edit(&sku, &form.to_patch(), now) {
            Ok(Some(_)) => Notice::success("Producto actualizado"),
            Ok(None) => Notice::info("Producto no encontrado"),
            Err(e) => notice_for(&e),
        }
    }

    pub fn record_count(&mut self, sku: &str, count: &str, now: DateTime<Utc>) -> Notice {
        let Ok(sku) = Sku::parse(sku) else {
            return Notice::info("Producto no encontrado");
        };
        match self.store.update_count(&sku, coerce_count_str(count), now) {
            Ok(Some(record)) => {
                Notice::success(format!("Conteo registrado ({})", record.discrepancy()))
            }
            Ok(None) => Notice::info("Producto no encontrado"),
            Err(e) => notice_for(&e),
        }
    }

    pub fn delete_product(&mut self, sku: &str, confirm: &dyn Confirm) -> Notice {
        let Ok(sku) = Sku::parse(sku) else {
            return Notice::info("Producto no encontrado");
        };
        match self.store.delete(&sku, confirm) {
            Ok(DeleteOutcome::Deleted(_)) => Notice::info("Producto eliminado"),
            Ok(DeleteOutcome::NotFound) => Notice::info("Producto no encontrado"),
            Ok(DeleteOutcome::Cancelled) => Notice::info("Operación cancelada"),
            Err(e) => notice_for(&e),
        }
    }

    pub fn import_json(&mut self, raw: &str, confirm: &dyn Confirm, now: DateTime<Utc>) -> Notice {
        match self.store.import_replace(raw, confirm, now) {
            Ok(ImportOutcome::Replaced { imported, dropped: 0 }) => Notice::success(format!(
                "Inventario importado exitosamente ({imported} productos)"
            )),
            Ok(ImportOutcome::Replaced { imported, dropped }) => Notice::success(format!(
                "Inventario importado exitosamente ({imported} productos, {dropped} descartados)"
            )),
            Ok(ImportOutcome::Cancelled) => Notice::info("Importación cancelada"),
            Err(e) => notice_for(&e),
        }
    }

    /// Read a user-selected file and import it.
    pub fn import_file(&mut self, path: &Path, confirm: &dyn Confirm, now: DateTime<Utc>) -> Notice {
        match std::fs::read_to_string(path) {
            Ok(raw) => self.import_json(&raw, confirm, now),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to read import file");
                Notice::error("Error al leer el archivo")
            }
        }
    }

    /// Write the backup envelope into `dir` and remember the backup time.
    ///
    /// The file appears whole or not at all; the marker is only set once it exists.
    pub fn export_json(&self, dir: &Path, now: DateTime<Utc>) -> (Notice, Option<PathBuf>) {
        match self.write_snapshot(dir, now) {
            Ok(path) => (Notice::success("JSON exportado exitosamente"), Some(path)),
            Err(err) => {
                tracing::error!(error = %err, "export failed");
                (Notice::error("Error al exportar el inventario"), None)
            }
        }
    }

    fn write_snapshot(&self, dir: &Path, now: DateTime<Utc>) -> Result<PathBuf, AppError> {
        let snapshot: Snapshot = self.store.export_snapshot(now);
        let json = snapshot.to_json_pretty().map_err(StoreError::from)?;
        let path = dir.join(snapshot.file_name());
        write_atomic(&path, &json).map_err(|source| AppError::Io {
            path: path.clone(),
            source,
        })?;
        self.store.record_backup(now)?;

        tracing::info!(path = %path.display(), items = snapshot.metadata.total_items, "inventory exported");
        Ok(path)
    }

    /// Reminder shown at startup when no recent backup exists.
    pub fn backup_reminder(&self, now: DateTime<Utc>) -> Option<Notice> {
        match self.store.backup_status(now) {
            Ok(BackupStatus::Fresh { .. }) => None,
            Ok(BackupStatus::Never) => Some(Notice::info(
                "Nunca se ha realizado una copia de seguridad",
            )),
            Ok(BackupStatus::Stale { days, .. }) => Some(Notice::info(format!(
                "Última copia de seguridad hace {days} días"
            ))),
            Err(e) => {
                tracing::warn!(error = %e, "could not read backup marker");
                None
            }
        }
    }
}

fn notice_for(err: &StoreError) -> Notice {
    match err {
        StoreError::Domain(DomainError::DuplicateSku(_)) => Notice::error("El SKU ya existe"),
        StoreError::Domain(DomainError::InvalidId(_)) => Notice::error("Ingrese un SKU válido"),
        StoreError::Domain(DomainError::UnknownCategory(_)) => {
            Notice::error("Seleccione una categoría válida")
        }
        StoreError::Domain(DomainError::MalformedImport(reason)) => {
            Notice::error(format!("Formato JSON inválido: {reason}"))
        }
        StoreError::Domain(other) => Notice::error(other.to_string()),
        StoreError::Storage(_) | StoreError::Serialize(_) => {
            tracing::error!(error = %err, "inventory could not be saved");
            Notice::error("No se pudo guardar el inventario")
        }
    }
}
