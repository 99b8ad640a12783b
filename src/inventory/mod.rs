mod manager;

pub use manager::{InventoryError, InventoryManager};
