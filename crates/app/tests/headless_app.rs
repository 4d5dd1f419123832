use std::path::PathBuf;

use chrono::{DateTime, Duration, TimeZone, Utc};
use stockroom_app::{App, AppConfig, Notice, NoticeLevel, ProductForm, Theme};
use stockroom_infra::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
use stockroom_inventory::{Discrepancy, FilterCriteria, InventoryProfile, ProfileKind};

struct TempDir(PathBuf);

impl TempDir {
    fn new() -> Self {
        let path = std::env::temp_dir().join(format!("stockroom-app-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&path).expect("failed to create temp dir");
        Self(path)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 1, 9, 0, 0).unwrap()
}

fn accept(_: &str) -> bool {
    true
}

fn decline(_: &str) -> bool {
    false
}

fn form(sku: &str, category: &str, quantity: &str, price: &str) -> ProductForm {
    ProductForm {
        sku: sku.to_string(),
        category: category.to_string(),
        quantity: quantity.to_string(),
        price: price.to_string(),
        ..ProductForm::default()
    }
}

fn config_for(dir: &TempDir, profile: ProfileKind) -> AppConfig {
    AppConfig {
        data_dir: dir.0.join("data"),
        profile,
        ..AppConfig::default()
    }
}

#[test]
fn babystock_lifecycle_survives_restart() {
    let dir = TempDir::new();
    let config = config_for(&dir, ProfileKind::BabyStock);

    {
        let mut app = App::from_config(&config, t0()).unwrap();
        let seed = app.dashboard();
        assert_eq!(seed.total_products, 2);
        assert_eq!(seed.total_quantity, 23);

        let sku = app.suggest_sku("Pijamas").unwrap();
        assert_eq!(sku.as_str(), "PIJ-002");

        let mut new = form(sku.as_str(), "Pijamas", "4", "21.00");
        new.name = "Pijama Estrellas".to_string();
        assert_eq!(
            app.add_product(&new, t0()),
            Notice::success("Producto agregado exitosamente")
        );
        assert_eq!(app.add_product(&new, t0()).level, NoticeLevel::Error);

        let summary = app.dashboard();
        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.low_stock, 1);

        assert_eq!(app.delete_product("BODY-001", &decline), Notice::info("Operación cancelada"));
        assert_eq!(app.delete_product("BODY-001", &accept), Notice::info("Producto eliminado"));
    }

    let app = App::from_config(&config, t0() + Duration::days(1)).unwrap();
    let ids: Vec<String> = app
        .list(&FilterCriteria::new())
        .iter()
        .map(|r| r.id.to_string())
        .collect();
    assert_eq!(ids, vec!["PIJ-001", "PIJ-002"]);
    assert_eq!(
        app.list(&FilterCriteria::new().search("estrellas"))[0].display_name(),
        "Pijama Estrellas"
    );
}

#[test]
fn edit_form_overwrites_and_refreshes_timestamp() {
    let mut app =
        App::open(InMemoryKeyValueStore::new(), InventoryProfile::babystock(), t0()).unwrap();
    let before = app.store().items()[1].clone();

    let mut edit = form("PIJ-001", "Pijamas", "11", "17.5");
    edit.name = "Pijama Ositos".to_string();
    edit.observation = "reponer en octubre".to_string();
    let later = t0() + Duration::hours(3);
    assert_eq!(
        app.edit_product("PIJ-001", &edit, later),
        Notice::success("Producto actualizado")
    );

    let after = &app.store().items()[1];
    assert_eq!(after.quantity, 11);
    assert_eq!(after.price, 17.5);
    assert_eq!(after.observation, "reponer en octubre");
    assert_eq!(after.last_updated, later);
    assert_eq!(after.created_at, before.created_at);

    assert_eq!(
        app.edit_product("NADA-001", &edit, later),
        Notice::info("Producto no encontrado")
    );
}

#[test]
fn physical_count_reconciliation() {
    let mut app = App::open(InMemoryKeyValueStore::new(), InventoryProfile::count(), t0()).unwrap();
    assert!(app.store().is_empty());

    let mut shirt = form("ROP-001", "Ropa", "15", "");
    shirt.location = "Pasillo 3".to_string();
    app.add_product(&shirt, t0());
    app.add_product(&form("ROP-002", "Ropa", "15", ""), t0());
    app.add_product(&form("ACC-001", "Accesorios", "15", ""), t0());

    let surplus = app.record_count("ROP-001", "20", t0());
    assert_eq!(surplus, Notice::success("Conteo registrado (+5)"));
    app.record_count("ROP-002", "10", t0());

    let items = app.store().items();
    assert_eq!(items[0].discrepancy(), Discrepancy::Surplus(5));
    assert_eq!(items[1].discrepancy().delta(), Some(-5));
    assert_eq!(items[2].discrepancy(), Discrepancy::NotCounted);

    let summary = app.dashboard();
    assert_eq!(summary.counted, 2);
    assert_eq!(summary.surplus, 1);
    assert_eq!(summary.shortage, 1);
    assert_eq!(summary.not_counted(), 1);
    assert_eq!(summary.low_stock, 0);

    assert_eq!(
        app.list(&FilterCriteria::new().search("pasillo")).len(),
        1
    );
}

#[test]
fn export_then_import_restores_collection() {
    let dir = TempDir::new();
    let mut app = App::open(InMemoryKeyValueStore::new(), InventoryProfile::babystock(), t0()).unwrap();
    let original = app.store().items().to_vec();

    assert_eq!(
        app.backup_reminder(t0()),
        Some(Notice::info("Nunca se ha realizado una copia de seguridad"))
    );

    let (notice, path) = app.export_json(&dir.0, t0());
    assert_eq!(notice, Notice::success("JSON exportado exitosamente"));
    let path = path.unwrap();
    assert_eq!(path.file_name().unwrap(), "inventario_2025-09-01.json");
    assert_eq!(app.backup_reminder(t0() + Duration::days(2)), None);
    assert_eq!(
        app.backup_reminder(t0() + Duration::days(10)),
        Some(Notice::info("Última copia de seguridad hace 10 días"))
    );

    app.add_product(&form("OTR-001", "Otros", "1", "1"), t0());
    app.delete_product("BODY-001", &accept);

    let cancelled = app.import_file(&path, &decline, t0());
    assert_eq!(cancelled, Notice::info("Importación cancelada"));
    assert_eq!(app.store().len(), 2);

    let imported = app.import_file(&path, &accept, t0());
    assert_eq!(imported.level, NoticeLevel::Success);
    assert_eq!(app.store().items(), original.as_slice());
}

#[test]
fn photo_survives_export_and_import_unchanged() {
    let dir = TempDir::new();
    let mut app = App::open(InMemoryKeyValueStore::new(), InventoryProfile::babystock(), t0()).unwrap();

    let mut with_photo = form("ACC-001", "Accesorios", "2", "4.5");
    with_photo.photo = Some(" data:x ".to_string());
    app.add_product(&with_photo, t0());
    let before = app.store().items().to_vec();
    assert_eq!(before[2].photo.as_deref(), Some("data:x"));

    let (_, path) = app.export_json(&dir.0, t0());
    let imported = app.import_file(&path.unwrap(), &accept, t0());
    assert_eq!(imported.level, NoticeLevel::Success);
    assert_eq!(app.store().items(), before.as_slice());
}

#[test]
fn imported_record_with_foreign_category_can_be_edited() {
    let mut app = App::open(InMemoryKeyValueStore::new(), InventoryProfile::babystock(), t0()).unwrap();
    app.import_json(r#"[{"id":"X-1","category":"Ropa","quantity":7}]"#, &accept, t0());

    let notice = app.edit_product("X-1", &form("X-1", "Ropa", "9", ""), t0());
    assert_eq!(notice, Notice::success("Producto actualizado"));
    assert_eq!(app.store().items()[0].quantity, 9);

    let moved = app.edit_product("X-1", &form("X-1", "Juguetes", "9", ""), t0());
    assert_eq!(moved, Notice::error("Seleccione una categoría válida"));
    assert_eq!(app.store().items()[0].category, "Ropa");
}

#[test]
fn failed_export_leaves_no_file_and_no_marker() {
    let dir = TempDir::new();
    let app = App::open(InMemoryKeyValueStore::new(), InventoryProfile::babystock(), t0()).unwrap();

    let missing = dir.0.join("not-created");
    let (notice, path) = app.export_json(&missing, t0());
    assert_eq!(notice, Notice::error("Error al exportar el inventario"));
    assert_eq!(path, None);
    assert!(!missing.exists());
    assert_eq!(std::fs::read_dir(&dir.0).unwrap().count(), 0);
    assert_eq!(
        app.backup_reminder(t0()),
        Some(Notice::info("Nunca se ha realizado una copia de seguridad"))
    );
}

#[test]
fn unreadable_import_file_is_reported() {
    let dir = TempDir::new();
    let mut app = App::open(InMemoryKeyValueStore::new(), InventoryProfile::babystock(), t0()).unwrap();

    let missing = dir.0.join("no-such-file.json");
    assert_eq!(
        app.import_file(&missing, &accept, t0()),
        Notice::error("Error al leer el archivo")
    );

    let garbage = dir.0.join("garbage.json");
    std::fs::write(&garbage, r#"{"metadata": {}, "products": []}"#).unwrap();
    let notice = app.import_file(&garbage, &accept, t0());
    assert!(notice.is_error());
    assert_eq!(app.store().len(), 2);
}

#[test]
fn theme_is_read_once_and_persisted_on_toggle() {
    let storage = std::sync::Arc::new(InMemoryKeyValueStore::new());
    storage.set("theme", "dark").unwrap();

    let mut app = App::open(storage.clone(), InventoryProfile::babystock(), t0()).unwrap();
    assert_eq!(app.theme(), Theme::Dark);

    assert_eq!(app.toggle_theme(), Notice::info("Modo claro activado"));
    assert_eq!(storage.get("theme").unwrap().as_deref(), Some("light"));

    let reopened = App::open(storage.clone(), InventoryProfile::babystock(), t0()).unwrap();
    assert_eq!(reopened.theme(), Theme::Light);
}

#[test]
fn corrupt_inventory_file_refuses_to_open() {
    let dir = TempDir::new();
    let config = config_for(&dir, ProfileKind::Count);
    let storage = FileKeyValueStore::open(&config.data_dir).unwrap();
    storage.set("inventory_count_items", "not json at all").unwrap();

    assert!(App::from_config(&config, t0()).is_err());
    assert_eq!(
        storage.get("inventory_count_items").unwrap().as_deref(),
        Some("not json at all")
    );
}
