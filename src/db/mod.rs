mod client;
mod models;

pub use client::Database;
pub use models::{
    ComponentKind, DbComponentTemplate, DbDeviceType, DbManufacturer, ImageOrientation,
};
