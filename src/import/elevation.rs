//! Convention-based elevation image lookup in the asset repository.
//!
//! The asset tree stores device illustrations as
//! `elevation-images/<Manufacturer Name>/<slug>.<front|rear>.<ext>`.
//! The directory segment is the raw manufacturer name as it appears in the
//! data, original casing and spacing included; only the filename uses the
//! slug.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::db::ImageOrientation;
use crate::import::slug::device_slug;

/// Subdirectory of the asset repository that holds elevation images.
pub const ELEVATION_IMAGE_DIR: &str = "elevation-images";

// Probe order doubles as preference order
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "svg"];

/// Locate the elevation image for a device, if the asset tree has one.
///
/// Read-only and side-effect free. Returns the first candidate that exists,
/// probing extensions in preference order, or None when the manufacturer
/// directory is missing or no candidate matches.
pub fn find_elevation_image(
    repo_root: &Path,
    manufacturer: &str,
    model: &str,
    orientation: ImageOrientation,
) -> Option<PathBuf> {
    let slug = device_slug(manufacturer, model);
    let elevation_dir = repo_root.join(ELEVATION_IMAGE_DIR).join(manufacturer);

    if !elevation_dir.exists() {
        debug!("No elevation directory for {}: {:?}", manufacturer, elevation_dir);
        return None;
    }

    for ext in IMAGE_EXTENSIONS {
        let candidate = elevation_dir.join(format!("{}.{}.{}", slug, orientation.as_str(), ext));
        if candidate.exists() {
            debug!("Found elevation image: {:?}", candidate);
            return Some(candidate);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn asset_tree(manufacturer: &str, filenames: &[&str]) -> TempDir {
        let root = TempDir::new().unwrap();
        let dir = root.path().join(ELEVATION_IMAGE_DIR).join(manufacturer);
        fs::create_dir_all(&dir).unwrap();
        for name in filenames {
            fs::write(dir.join(name), b"image-bytes").unwrap();
        }
        root
    }

    #[test]
    fn test_missing_manufacturer_directory() {
        let root = TempDir::new().unwrap();
        let found =
            find_elevation_image(root.path(), "Palo Alto", "PA-850", ImageOrientation::Front);
        assert!(found.is_none());
    }

    #[test]
    fn test_no_matching_file() {
        let root = asset_tree("Palo Alto", &["palo-alto-pa-220.front.png"]);
        let found =
            find_elevation_image(root.path(), "Palo Alto", "PA-850", ImageOrientation::Front);
        assert!(found.is_none());
    }

    #[test]
    fn test_extension_priority_prefers_png() {
        let root = asset_tree(
            "Palo Alto",
            &["palo-alto-pa-850.front.jpg", "palo-alto-pa-850.front.png"],
        );
        let found =
            find_elevation_image(root.path(), "Palo Alto", "PA-850", ImageOrientation::Front)
                .unwrap();
        assert_eq!(
            found.file_name().unwrap().to_str().unwrap(),
            "palo-alto-pa-850.front.png"
        );
    }

    #[test]
    fn test_falls_through_to_later_extensions() {
        let root = asset_tree("Palo Alto", &["palo-alto-pa-850.rear.svg"]);
        let found =
            find_elevation_image(root.path(), "Palo Alto", "PA-850", ImageOrientation::Rear)
                .unwrap();
        assert!(found.ends_with("palo-alto-pa-850.rear.svg"));

        // Orientations don't cross-match
        assert!(
            find_elevation_image(root.path(), "Palo Alto", "PA-850", ImageOrientation::Front)
                .is_none()
        );
    }

    #[test]
    fn test_directory_uses_raw_manufacturer_name() {
        // The directory keeps the manufacturer's casing and spacing; only the
        // filename is slugged.
        let root = asset_tree("Palo Alto", &["palo-alto-pa-850.front.png"]);
        let slugged_dir = root.path().join(ELEVATION_IMAGE_DIR).join("palo-alto");
        assert!(!slugged_dir.exists());

        let found =
            find_elevation_image(root.path(), "Palo Alto", "PA-850", ImageOrientation::Front)
                .unwrap();
        assert!(found.parent().unwrap().ends_with("Palo Alto"));
    }
}
