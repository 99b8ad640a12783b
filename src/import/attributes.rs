use std::collections::HashSet;

use serde_json::Map;

use crate::db::DbDeviceType;
use crate::inventory::InventoryManager;
use crate::joblog::Reporter;
use crate::spec::DeviceTypeSpec;

/// Fixed projection from extensible-attribute key to description field.
///
/// A static ordered table keeps the projection auditable and total: only the
/// fields listed here are ever copied into the custom-field store.
const CUSTOM_FIELD_MAP: &[(&str, &str)] = &[
    ("cf_slug", "slug"),
    ("cf_weight", "weight"),
    ("cf_weight_unit", "weight_unit"),
    ("cf_airflow", "airflow"),
    ("cf_front_image", "front_image"),
    ("cf_rear_image", "rear_image"),
];

/// Service responsible for back-filling a device type's custom-field store
/// from the optional scalar fields of its description.
pub struct AttributeBackfiller<'a> {
    inventory: &'a InventoryManager,
}

impl<'a> AttributeBackfiller<'a> {
    pub fn new(inventory: &'a InventoryManager) -> Self {
        AttributeBackfiller { inventory }
    }

    /// Project present description fields into the record's custom fields.
    ///
    /// Staged values are applied in one update. Best effort: any failure is
    /// logged as a warning and swallowed, leaving the record in its
    /// pre-backfill state. Returns the set of attribute keys applied.
    pub async fn backfill(
        &self,
        record: &mut DbDeviceType,
        spec: &DeviceTypeSpec,
        report: &Reporter<'_>,
    ) -> HashSet<String> {
        let mut staged = Map::new();
        for (attr_key, field) in CUSTOM_FIELD_MAP {
            if let Some(value) = spec.field(field) {
                staged.insert((*attr_key).to_string(), value.clone());
            }
        }

        if staged.is_empty() {
            return HashSet::new();
        }

        let applied: HashSet<String> = staged.keys().cloned().collect();
        let names = staged.keys().cloned().collect::<Vec<_>>().join(", ");

        let mut custom_fields = record.custom_fields.clone();
        custom_fields.extend(staged);

        match self
            .inventory
            .set_custom_fields(&record.id, &custom_fields)
            .await
        {
            Ok(()) => {
                record.custom_fields = custom_fields;
                report.info(&format!("Set custom fields: {}", names), Some(&record.id));
                applied
            }
            Err(e) => {
                report.warning(
                    &format!("Failed to set custom fields: {}", e),
                    Some(&record.id),
                );
                HashSet::new()
            }
        }
    }
}
