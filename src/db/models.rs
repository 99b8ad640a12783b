use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::Type;
use uuid::Uuid;

/// Database models for the rackbase inventory store
///
/// Device types are reusable hardware templates:
/// - A manufacturer owns zero or more device types
/// - A device type owns its component templates (ports, bays)
/// - Elevation images are copied into the record as raw bytes
/// - Open-ended extensions live in the `custom_fields` JSON store
///
/// The fixed categories of physical sub-elements a device type can declare.
///
/// Encodes to TEXT in the database using the same kebab-case keys the
/// device-type description uses for its component lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "TEXT", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    ConsolePorts,
    ConsoleServerPorts,
    PowerPorts,
    PowerOutlets,
    Interfaces,
    RearPorts,
    FrontPorts,
    DeviceBays,
    ModuleBays,
}

impl ComponentKind {
    /// All kinds, in the order the importer processes them.
    pub const ALL: [ComponentKind; 9] = [
        ComponentKind::ConsolePorts,
        ComponentKind::ConsoleServerPorts,
        ComponentKind::PowerPorts,
        ComponentKind::PowerOutlets,
        ComponentKind::Interfaces,
        ComponentKind::RearPorts,
        ComponentKind::FrontPorts,
        ComponentKind::DeviceBays,
        ComponentKind::ModuleBays,
    ];

    /// The key this kind uses in device-type descriptions and in the `kind`
    /// column (keep in sync with the sqlx/serde renames above).
    pub fn key(&self) -> &'static str {
        match self {
            ComponentKind::ConsolePorts => "console-ports",
            ComponentKind::ConsoleServerPorts => "console-server-ports",
            ComponentKind::PowerPorts => "power-ports",
            ComponentKind::PowerOutlets => "power-outlets",
            ComponentKind::Interfaces => "interfaces",
            ComponentKind::RearPorts => "rear-ports",
            ComponentKind::FrontPorts => "front-ports",
            ComponentKind::DeviceBays => "device-bays",
            ComponentKind::ModuleBays => "module-bays",
        }
    }
}

/// Which face of the device an elevation image shows.
///
/// The literal strings appear in asset filenames (`<slug>.front.png`), so
/// they are part of the external naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageOrientation {
    Front,
    Rear,
}

impl ImageOrientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageOrientation::Front => "front",
            ImageOrientation::Rear => "rear",
        }
    }
}

/// Hardware manufacturer, shared across device types
///
/// Looked up by exact name. Created idempotently by
/// `InventoryManager::create_or_get_manufacturer`; the importer itself only
/// ever reads manufacturers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DbManufacturer {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbManufacturer {
    pub fn new(name: &str) -> Self {
        let now = Utc::now();
        DbManufacturer {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Device type - a reusable template for a hardware model
///
/// Uniquely identified by (manufacturer_id, model); the table carries a
/// UNIQUE constraint on the pair, which is the authoritative duplicate
/// guard for concurrent imports.
///
/// Elevation images use copy-in-place semantics: the bytes live in the
/// record, not behind a path reference into the asset tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DbDeviceType {
    pub id: String,
    pub manufacturer_id: String,
    pub model: String,
    pub part_number: Option<String>,
    /// Rack height in U; fractional heights (0.5U) exist.
    pub u_height: Option<f64>,
    pub is_full_depth: Option<bool>,
    pub comments: Option<String>,
    /// Extensible-attribute store, persisted as a JSON object.
    pub custom_fields: Map<String, Value>,
    pub front_image_name: Option<String>,
    pub front_image: Option<Vec<u8>>,
    pub rear_image_name: Option<String>,
    pub rear_image: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbDeviceType {
    pub fn new(manufacturer_id: &str, model: &str) -> Self {
        let now = Utc::now();
        DbDeviceType {
            id: Uuid::new_v4().to_string(),
            manufacturer_id: manufacturer_id.to_string(),
            model: model.to_string(),
            part_number: None,
            u_height: None,
            is_full_depth: None,
            comments: None,
            custom_fields: Map::new(),
            front_image_name: None,
            front_image: None,
            rear_image_name: None,
            rear_image: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Component template - one declared port or bay on a device type
///
/// Owned exclusively by its device type (cascade delete) and only ever
/// bulk-created, never individually mutated. `position` preserves the
/// item's order within its kind's list in the source description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DbComponentTemplate {
    pub id: String,
    pub device_type_id: String,
    pub kind: ComponentKind,
    pub name: String,
    pub label: Option<String>,
    /// Port/outlet type string (e.g. "1000base-t", "iec-60320-c14").
    pub port_type: Option<String>,
    pub position: i64,
    /// Remaining description fields after denylist stripping.
    pub attrs: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl DbComponentTemplate {
    pub fn new(
        device_type_id: &str,
        kind: ComponentKind,
        name: &str,
        label: Option<String>,
        port_type: Option<String>,
        position: i64,
        attrs: Map<String, Value>,
    ) -> Self {
        DbComponentTemplate {
            id: Uuid::new_v4().to_string(),
            device_type_id: device_type_id.to_string(),
            kind,
            name: name.to_string(),
            label,
            port_type,
            position,
            attrs,
            created_at: Utc::now(),
        }
    }
}
