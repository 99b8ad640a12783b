//! Parsed device-type descriptions.
//!
//! A description is typically authored as YAML in a device-type library;
//! this crate only sees the already-parsed mapping and is agnostic to the
//! document format.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::db::{ComponentKind, ImageOrientation};

/// A parsed device-type description, ready for import.
///
/// Only the identity pair is typed; everything else stays in an open field
/// map so optional scalars keep their presence information and unrecognized
/// fields pass through untouched. Component lists live in the map under the
/// kind keys (`interfaces`, `power-ports`, ...), each a sequence of
/// field-name to value mappings.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceTypeSpec {
    pub manufacturer: String,
    pub model: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl DeviceTypeSpec {
    /// Build a minimal description (tests and programmatic callers)
    pub fn new(manufacturer: &str, model: &str) -> Self {
        DeviceTypeSpec {
            manufacturer: manufacturer.to_string(),
            model: model.to_string(),
            fields: Map::new(),
        }
    }

    /// A top-level field beyond manufacturer/model, if present
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// A top-level string field, if present and a string
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Whether the description asks for an elevation image of this face
    pub fn wants_image(&self, orientation: ImageOrientation) -> bool {
        let flag = match orientation {
            ImageOrientation::Front => "front_image",
            ImageOrientation::Rear => "rear_image",
        };
        matches!(self.field(flag), Some(Value::Bool(true)))
    }

    /// The raw component list for a kind, if the description declares one
    pub fn components(&self, kind: ComponentKind) -> Option<&Vec<Value>> {
        self.field(kind.key()).and_then(Value::as_array)
    }
}
