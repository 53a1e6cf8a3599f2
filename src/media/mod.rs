// SPDX-License-Identifier: MPL-2.0
//! Photo metadata handling.
//!
//! This module extracts capture metadata from raw image bytes and knows which
//! file extensions carry EXIF data worth fetching in the first place.

pub mod metadata;

pub use metadata::{extract_photo_metadata, Geodata, PhotoMetadata};

/// Image file extensions with EXIF-capable containers.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "tiff", "tif", "heic", "heif",
];

/// Checks whether a listed file name looks like a supported image.
///
/// Listings may include arbitrary files; anything else is excluded before the
/// fetch stage rather than fetched and rejected by the parser.
#[must_use]
pub fn is_supported_image(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}
