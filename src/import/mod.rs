// # Import Module
//
// Device-type import pipeline with focused, testable components:
//
// - **device_slug**: filename slug matching the asset-repo convention
// - **find_elevation_image**: convention-based elevation image lookup
// - **ComponentMaterializer**: per-kind component template creation
// - **AttributeBackfiller**: custom-field projection after creation
// - **DeviceTypeImporter**: orchestrates the import workflow
//
// Public API:
// - `DeviceTypeImporter`: run one import against an `InventoryManager`
// - `ImportError`: structural failures surfaced to the invoking job

mod attributes;
mod components;
mod elevation;
mod error;
mod importer;
mod slug;

// Public API exports
pub use attributes::AttributeBackfiller;
pub use components::ComponentMaterializer;
pub use elevation::{find_elevation_image, ELEVATION_IMAGE_DIR};
pub use error::ImportError;
pub use importer::DeviceTypeImporter;
pub use slug::device_slug;
