// Library exports for integration tests and reusable components

pub mod db;
pub mod import;
pub mod inventory;
pub mod joblog;
pub mod spec;

// Test support (mock collaborators for unit and integration tests)
pub mod test_support;

// Re-export the import entry points at the crate root for easier access
pub use import::{DeviceTypeImporter, ImportError};
pub use spec::DeviceTypeSpec;
