use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::db::{
    Database, DbComponentTemplate, DbDeviceType, DbManufacturer, ImageOrientation,
};

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// The main inventory manager for database operations and record persistence
///
/// Handles:
/// - Manufacturer lookup and idempotent creation
/// - Device-type and component-template persistence
/// - Query methods for inventory browsing
#[derive(Debug, Clone)]
pub struct InventoryManager {
    database: Database,
}

impl InventoryManager {
    /// Create a new inventory manager
    pub fn new(database: Database) -> Self {
        InventoryManager { database }
    }

    /// Look up a manufacturer by exact name
    pub async fn find_manufacturer(
        &self,
        name: &str,
    ) -> Result<Option<DbManufacturer>, InventoryError> {
        Ok(self.database.get_manufacturer_by_name(name).await?)
    }

    /// Create a manufacturer, or update the existing one with this name.
    ///
    /// Idempotent; callers run this before invoking the importer. The bool is
    /// true when a new record was created.
    pub async fn create_or_get_manufacturer(
        &self,
        name: &str,
    ) -> Result<(DbManufacturer, bool), InventoryError> {
        if let Some(existing) = self.database.get_manufacturer_by_name(name).await? {
            self.database.touch_manufacturer(&existing.id).await?;
            debug!("Updated manufacturer: {}", existing.name);
            return Ok((existing, false));
        }

        let manufacturer = DbManufacturer::new(name);
        self.database.insert_manufacturer(&manufacturer).await?;
        debug!("Created manufacturer: {}", manufacturer.name);
        Ok((manufacturer, true))
    }

    /// Get all manufacturers
    pub async fn get_manufacturers(&self) -> Result<Vec<DbManufacturer>, InventoryError> {
        Ok(self.database.get_manufacturers().await?)
    }

    /// Persist a new device type record
    pub async fn add_device_type(&self, device_type: &DbDeviceType) -> Result<(), InventoryError> {
        self.database.insert_device_type(device_type).await?;
        Ok(())
    }

    /// Look up a device type by its (manufacturer, model) identity
    pub async fn get_device_type(
        &self,
        manufacturer_id: &str,
        model: &str,
    ) -> Result<Option<DbDeviceType>, InventoryError> {
        Ok(self.database.get_device_type(manufacturer_id, model).await?)
    }

    /// Count all device types in the inventory
    pub async fn count_device_types(&self) -> Result<i64, InventoryError> {
        Ok(self.database.count_device_types().await?)
    }

    /// Bulk-persist the component templates for one kind
    pub async fn add_component_templates(
        &self,
        templates: &[DbComponentTemplate],
    ) -> Result<(), InventoryError> {
        self.database.insert_component_templates(templates).await?;
        Ok(())
    }

    /// Get all component templates owned by a device type
    pub async fn get_component_templates(
        &self,
        device_type_id: &str,
    ) -> Result<Vec<DbComponentTemplate>, InventoryError> {
        Ok(self.database.get_component_templates(device_type_id).await?)
    }

    /// Copy elevation image bytes into a device type record
    pub async fn attach_image(
        &self,
        device_type_id: &str,
        orientation: ImageOrientation,
        filename: &str,
        bytes: &[u8],
    ) -> Result<(), InventoryError> {
        self.database
            .set_device_type_image(device_type_id, orientation, filename, bytes)
            .await?;
        Ok(())
    }

    /// Replace a device type's custom-field store
    pub async fn set_custom_fields(
        &self,
        device_type_id: &str,
        custom_fields: &Map<String, Value>,
    ) -> Result<(), InventoryError> {
        self.database
            .update_custom_fields(device_type_id, custom_fields)
            .await?;
        Ok(())
    }
}
