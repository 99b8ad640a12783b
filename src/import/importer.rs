// # Device-Type Importer - Orchestrator
//
// Thin orchestrator over the focused pipeline services:
// - ComponentMaterializer: per-kind component template creation
// - find_elevation_image: convention-based asset lookup
// - AttributeBackfiller: custom-field projection after creation
//
// The pipeline is strictly linear and single-pass: duplicate check, base
// record creation, component materialization, image attachment, attribute
// backfill. Image and attribute failures never abort an import; structural
// failures do, and leave whatever was already persisted in place.

use std::path::Path;

use serde_json::Value;

use crate::db::{ComponentKind, DbDeviceType, DbManufacturer, ImageOrientation};
use crate::import::attributes::AttributeBackfiller;
use crate::import::components::ComponentMaterializer;
use crate::import::elevation::find_elevation_image;
use crate::import::error::ImportError;
use crate::inventory::InventoryManager;
use crate::joblog::{JobLog, Reporter};
use crate::spec::DeviceTypeSpec;

pub struct DeviceTypeImporter {
    inventory: InventoryManager,
}

impl DeviceTypeImporter {
    pub fn new(inventory: InventoryManager) -> Self {
        DeviceTypeImporter { inventory }
    }

    /// Import one device-type description into the inventory.
    ///
    /// The manufacturer must already exist (callers provision it with
    /// `InventoryManager::create_or_get_manufacturer`). When
    /// `asset_repo_root` is given and the description flags elevation
    /// images, matching assets are copied into the record. Progress and
    /// warnings go to `log` when one is provided.
    pub async fn import(
        &self,
        spec: &DeviceTypeSpec,
        asset_repo_root: Option<&Path>,
        log: Option<&dyn JobLog>,
    ) -> Result<DbDeviceType, ImportError> {
        let report = Reporter::new(log);

        let manufacturer = self
            .inventory
            .find_manufacturer(&spec.manufacturer)
            .await?
            .ok_or_else(|| ImportError::UnknownManufacturer(spec.manufacturer.clone()))?;

        // Fast duplicate short-circuit; the UNIQUE(manufacturer_id, model)
        // constraint on the insert below is the authoritative guard.
        if self
            .inventory
            .get_device_type(&manufacturer.id, &spec.model)
            .await?
            .is_some()
        {
            return Err(ImportError::DuplicateDeviceType {
                manufacturer: manufacturer.name.clone(),
                model: spec.model.clone(),
            });
        }

        let mut record = base_record(spec, &manufacturer)?;
        self.inventory
            .add_device_type(&record)
            .await
            .map_err(|e| ImportError::from_record_create(e, &manufacturer.name, &spec.model))?;
        report.info(
            &format!("Created device type: {} {}", manufacturer.name, record.model),
            Some(&record.id),
        );

        for kind in ComponentKind::ALL {
            let Some(items) = spec.components(kind) else {
                continue;
            };
            let count = ComponentMaterializer::new(&self.inventory)
                .materialize(kind, items, &record.id)
                .await?;
            report.info(
                &format!("Created {} {} for {}", count, kind.key(), record.model),
                Some(&record.id),
            );
        }

        if let Some(repo_root) = asset_repo_root {
            for orientation in [ImageOrientation::Front, ImageOrientation::Rear] {
                if spec.wants_image(orientation) {
                    self.attach_image(&mut record, spec, repo_root, orientation, &report)
                        .await;
                }
            }
        }

        AttributeBackfiller::new(&self.inventory)
            .backfill(&mut record, spec, &report)
            .await;

        report.info(
            &format!("Imported device type {} with all components", record.model),
            Some(&record.id),
        );

        Ok(record)
    }

    /// Attach one elevation image to an already-created record.
    ///
    /// Best effort: a missing or unreadable asset logs a warning and leaves
    /// the record as created.
    async fn attach_image(
        &self,
        record: &mut DbDeviceType,
        spec: &DeviceTypeSpec,
        repo_root: &Path,
        orientation: ImageOrientation,
        report: &Reporter<'_>,
    ) {
        let Some(path) =
            find_elevation_image(repo_root, &spec.manufacturer, &spec.model, orientation)
        else {
            report.warning(
                &format!(
                    "{} image flagged but not found for {} {}",
                    orientation.as_str(),
                    spec.manufacturer,
                    spec.model
                ),
                Some(&record.id),
            );
            return;
        };

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                report.warning(
                    &format!("Failed to import {} image: {}", orientation.as_str(), e),
                    Some(&record.id),
                );
                return;
            }
        };

        match self
            .inventory
            .attach_image(&record.id, orientation, &filename, &bytes)
            .await
        {
            Ok(()) => {
                match orientation {
                    ImageOrientation::Front => {
                        record.front_image_name = Some(filename.clone());
                        record.front_image = Some(bytes);
                    }
                    ImageOrientation::Rear => {
                        record.rear_image_name = Some(filename.clone());
                        record.rear_image = Some(bytes);
                    }
                }
                report.info(
                    &format!("Imported {} image: {}", orientation.as_str(), filename),
                    Some(&record.id),
                );
            }
            Err(e) => {
                report.warning(
                    &format!("Failed to import {} image: {}", orientation.as_str(), e),
                    Some(&record.id),
                );
            }
        }
    }
}

/// Map the description's recognized scalar fields onto a new base record.
fn base_record(
    spec: &DeviceTypeSpec,
    manufacturer: &DbManufacturer,
) -> Result<DbDeviceType, ImportError> {
    let mut record = DbDeviceType::new(&manufacturer.id, &spec.model);
    record.part_number = scalar_string(spec, "part_number")?;
    record.u_height = scalar_number(spec, "u_height")?;
    record.is_full_depth = scalar_bool(spec, "is_full_depth")?;
    record.comments = scalar_string(spec, "comments")?;
    Ok(record)
}

fn scalar_string(spec: &DeviceTypeSpec, field: &str) -> Result<Option<String>, ImportError> {
    match spec.field(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(type_mismatch(field, "a string", other)),
    }
}

fn scalar_number(spec: &DeviceTypeSpec, field: &str) -> Result<Option<f64>, ImportError> {
    match spec.field(field) {
        None => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(other) => Err(type_mismatch(field, "a number", other)),
    }
}

fn scalar_bool(spec: &DeviceTypeSpec, field: &str) -> Result<Option<bool>, ImportError> {
    match spec.field(field) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(type_mismatch(field, "a boolean", other)),
    }
}

fn type_mismatch(field: &str, expected: &str, got: &Value) -> ImportError {
    ImportError::Validation(format!("field `{}` must be {}, got {}", field, expected, got))
}
