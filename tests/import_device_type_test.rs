mod support;

use rackbase::db::{ComponentKind, Database};
use rackbase::inventory::InventoryManager;
use rackbase::{DeviceTypeImporter, DeviceTypeSpec, ImportError};
use serde_json::json;
use tempfile::TempDir;

use crate::support::tracing_init;

async fn setup() -> (InventoryManager, DeviceTypeImporter, TempDir) {
    tracing_init();

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let database = Database::new(db_path.to_str().unwrap())
        .await
        .expect("Failed to create database");
    let inventory = InventoryManager::new(database);
    let importer = DeviceTypeImporter::new(inventory.clone());

    (inventory, importer, temp_dir)
}

fn spec_from(value: serde_json::Value) -> DeviceTypeSpec {
    serde_json::from_value(value).expect("valid device type spec")
}

#[tokio::test]
async fn test_import_creates_device_type() {
    let (inventory, importer, _tmp) = setup().await;
    inventory.create_or_get_manufacturer("Palo Alto").await.unwrap();

    let spec = spec_from(json!({
        "manufacturer": "Palo Alto",
        "model": "PA-850",
        "part_number": "PAN-PA-850",
        "u_height": 1,
        "is_full_depth": true,
        "console-ports": [
            {"name": "console", "type": "rj-45"},
        ],
        "interfaces": [
            {"name": "ethernet1/1", "type": "1000base-t"},
            {"name": "ethernet1/2", "type": "1000base-t"},
        ],
    }));

    let record = importer.import(&spec, None, None).await.unwrap();

    let manufacturer = inventory
        .find_manufacturer("Palo Alto")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.manufacturer_id, manufacturer.id);
    assert_eq!(record.model, "PA-850");
    assert_eq!(record.part_number.as_deref(), Some("PAN-PA-850"));
    assert_eq!(record.u_height, Some(1.0));
    assert_eq!(record.is_full_depth, Some(true));

    let stored = inventory
        .get_device_type(&manufacturer.id, "PA-850")
        .await
        .unwrap()
        .expect("record persisted");
    assert_eq!(stored.id, record.id);

    let components = inventory.get_component_templates(&record.id).await.unwrap();
    assert_eq!(components.len(), 3);
    assert_eq!(
        components
            .iter()
            .filter(|c| c.kind == ComponentKind::Interfaces)
            .count(),
        2
    );
}

#[tokio::test]
async fn test_import_unknown_manufacturer() {
    let (inventory, importer, _tmp) = setup().await;

    let spec = spec_from(json!({"manufacturer": "Palo Alto", "model": "PA-850"}));
    let err = importer.import(&spec, None, None).await.unwrap_err();

    assert!(matches!(err, ImportError::UnknownManufacturer(ref name) if name == "Palo Alto"));
    assert_eq!(inventory.count_device_types().await.unwrap(), 0);
}

#[tokio::test]
async fn test_import_duplicate_device_type() {
    let (inventory, importer, _tmp) = setup().await;
    inventory.create_or_get_manufacturer("Palo Alto").await.unwrap();

    let spec = spec_from(json!({"manufacturer": "Palo Alto", "model": "PA-850"}));
    importer.import(&spec, None, None).await.unwrap();

    let err = importer.import(&spec, None, None).await.unwrap_err();
    assert!(matches!(
        err,
        ImportError::DuplicateDeviceType { ref manufacturer, ref model }
            if manufacturer == "Palo Alto" && model == "PA-850"
    ));
    assert_eq!(inventory.count_device_types().await.unwrap(), 1);
}

#[tokio::test]
async fn test_import_without_components() {
    let (inventory, importer, _tmp) = setup().await;
    inventory.create_or_get_manufacturer("Cisco").await.unwrap();

    let spec = spec_from(json!({"manufacturer": "Cisco", "model": "Catalyst 9300"}));
    let record = importer.import(&spec, None, None).await.unwrap();

    let components = inventory.get_component_templates(&record.id).await.unwrap();
    assert!(components.is_empty());
}

#[tokio::test]
async fn test_interfaces_drop_poe_fields() {
    let (inventory, importer, _tmp) = setup().await;
    inventory.create_or_get_manufacturer("Juniper").await.unwrap();

    let spec = spec_from(json!({
        "manufacturer": "Juniper",
        "model": "EX4300-48P",
        "interfaces": [
            {"name": "ge-0/0/0", "type": "1000base-t", "poe_mode": "pse", "poe_type": "type2-ieee802.3at"},
            {"name": "ge-0/0/1", "type": "1000base-t", "poe_mode": "pse", "poe_type": "type2-ieee802.3at"},
            {"name": "ge-0/0/2", "type": "1000base-t", "mgmt_only": false},
        ],
    }));

    let record = importer.import(&spec, None, None).await.unwrap();
    let components = inventory.get_component_templates(&record.id).await.unwrap();

    // Count matches the input even though fields were stripped
    assert_eq!(components.len(), 3);
    for component in &components {
        assert!(!component.attrs.contains_key("poe_mode"));
        assert!(!component.attrs.contains_key("poe_type"));
    }
    assert_eq!(components[2].attrs.get("mgmt_only"), Some(&json!(false)));
}

#[tokio::test]
async fn test_component_order_preserved() {
    let (inventory, importer, _tmp) = setup().await;
    inventory.create_or_get_manufacturer("Arista").await.unwrap();

    // Deliberately not alphabetical; persisted order must follow the list
    let names = ["zeta", "alpha", "mid"];
    let spec = spec_from(json!({
        "manufacturer": "Arista",
        "model": "DCS-7050SX3",
        "interfaces": names.iter().map(|n| json!({"name": n, "type": "10gbase-x-sfpp"})).collect::<Vec<_>>(),
    }));

    let record = importer.import(&spec, None, None).await.unwrap();
    let components = inventory.get_component_templates(&record.id).await.unwrap();

    for (index, component) in components.iter().enumerate() {
        assert_eq!(component.position, index as i64);
        assert_eq!(component.name, names[index]);
    }
}

#[tokio::test]
async fn test_validation_failure_keeps_prior_kinds() {
    let (inventory, importer, _tmp) = setup().await;
    inventory.create_or_get_manufacturer("Palo Alto").await.unwrap();

    // console-ports materialize before interfaces; the bad interface item
    // aborts the rest of the import but rolls nothing back.
    let spec = spec_from(json!({
        "manufacturer": "Palo Alto",
        "model": "PA-850",
        "console-ports": [
            {"name": "console", "type": "rj-45"},
        ],
        "interfaces": [
            {"type": "1000base-t"},
        ],
    }));

    let err = importer.import(&spec, None, None).await.unwrap_err();
    assert!(matches!(err, ImportError::Validation(_)));

    let manufacturer = inventory
        .find_manufacturer("Palo Alto")
        .await
        .unwrap()
        .unwrap();
    let record = inventory
        .get_device_type(&manufacturer.id, "PA-850")
        .await
        .unwrap()
        .expect("base record stays persisted");

    let components = inventory.get_component_templates(&record.id).await.unwrap();
    assert_eq!(components.len(), 1);
    assert_eq!(components[0].kind, ComponentKind::ConsolePorts);
}

#[tokio::test]
async fn test_create_or_get_manufacturer_is_idempotent() {
    let (inventory, _importer, _tmp) = setup().await;

    let (first, created) = inventory.create_or_get_manufacturer("Palo Alto").await.unwrap();
    assert!(created);

    let (second, created) = inventory.create_or_get_manufacturer("Palo Alto").await.unwrap();
    assert!(!created);
    assert_eq!(first.id, second.id);

    assert_eq!(inventory.get_manufacturers().await.unwrap().len(), 1);
}
