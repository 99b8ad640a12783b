use thiserror::Error;

use crate::inventory::InventoryError;

/// Failures surfaced by the import pipeline.
///
/// Structural failures (unknown manufacturer, duplicate, validation) abort
/// the import and must reach the invoking job. Best-effort enrichment
/// failures (images, custom fields) never appear here; they are demoted to
/// warnings inside the pipeline.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Unknown manufacturer: {0}")]
    UnknownManufacturer(String),
    #[error(
        "A device type with this model ({model}) and manufacturer ({manufacturer}) already exists"
    )]
    DuplicateDeviceType { manufacturer: String, model: String },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImportError {
    /// Map the error from a base-record insert.
    ///
    /// A unique-constraint violation means another import won the
    /// check-then-create race; the schema constraint is the authoritative
    /// duplicate guard, so report it as a duplicate rather than a database
    /// failure.
    pub(crate) fn from_record_create(
        err: InventoryError,
        manufacturer: &str,
        model: &str,
    ) -> ImportError {
        if let InventoryError::Database(sqlx::Error::Database(db_err)) = &err {
            if db_err.is_unique_violation() {
                return ImportError::DuplicateDeviceType {
                    manufacturer: manufacturer.to_string(),
                    model: model.to_string(),
                };
            }
        }
        ImportError::Inventory(err)
    }
}
