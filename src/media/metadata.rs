// SPDX-License-Identifier: MPL-2.0
//! Capture metadata extraction from raw image bytes.
//!
//! Extracts the EXIF timestamp and GPS coordinates a photo was captured with.
//! Absent tags are a normal state (not every photo is geotagged); only a byte
//! buffer that cannot be read as an image container at all is an error.

use crate::error::{Error, Result};
use std::io::Cursor;

/// GPS state of a photo, validated at construction time.
///
/// A feature can only be built from a complete coordinate pair; a lone
/// latitude or longitude tag, or a tag whose value cannot be converted to
/// degrees, is `Malformed` rather than a partial pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Geodata {
    /// Both coordinate tags present and convertible to decimal degrees.
    ///
    /// Values are the raw EXIF magnitudes; hemisphere reference tags are not
    /// consulted (see [`crate::geojson::build_feature`] for the sign
    /// convention applied downstream).
    Complete { latitude: f64, longitude: f64 },
    /// Neither coordinate tag present: a non-geotagged photo.
    Absent,
    /// Coordinate tags present but unusable.
    Malformed,
}

/// Capture metadata extracted from one photo.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoMetadata {
    /// Raw EXIF timestamp text, `"YYYY:MM:DD HH:MM:SS"` when well-formed.
    pub date_taken: Option<String>,
    pub geodata: Geodata,
}

impl PhotoMetadata {
    fn empty() -> Self {
        Self {
            date_taken: None,
            geodata: Geodata::Absent,
        }
    }
}

/// Extract capture metadata from raw image bytes.
///
/// Missing or malformed EXIF tags never error; they yield absent fields. An
/// image container without an EXIF block yields an empty record.
///
/// # Errors
///
/// Returns an error only if the bytes cannot be read as an image container
/// at all (corrupt or truncated input, unknown format).
pub fn extract_photo_metadata(bytes: &[u8]) -> Result<PhotoMetadata> {
    let mut cursor = Cursor::new(bytes);

    let exif = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif,
        // A recognized container without an EXIF block is a normal state.
        Err(exif::Error::NotFound(_)) => return Ok(PhotoMetadata::empty()),
        Err(err) => return Err(Error::Image(err.to_string())),
    };

    let date_taken = ascii_tag(&exif, exif::Tag::DateTimeOriginal)
        .or_else(|| ascii_tag(&exif, exif::Tag::DateTime));

    Ok(PhotoMetadata {
        date_taken,
        geodata: extract_geodata(&exif),
    })
}

/// Read an ASCII tag's raw text, without tag-specific display formatting.
fn ascii_tag(exif: &exif::Exif, tag: exif::Tag) -> Option<String> {
    let field = exif.get_field(tag, exif::In::PRIMARY)?;
    match &field.value {
        exif::Value::Ascii(components) => components.first().and_then(|raw| {
            let text = std::str::from_utf8(raw).ok()?;
            let text = text.trim_matches(char::from(0)).trim();
            (!text.is_empty()).then(|| text.to_string())
        }),
        _ => None,
    }
}

fn extract_geodata(exif: &exif::Exif) -> Geodata {
    let lat_field = exif.get_field(exif::Tag::GPSLatitude, exif::In::PRIMARY);
    let lon_field = exif.get_field(exif::Tag::GPSLongitude, exif::In::PRIMARY);

    match (lat_field, lon_field) {
        (None, None) => Geodata::Absent,
        (Some(lat), Some(lon)) => {
            match (
                parse_gps_coordinate(&lat.value),
                parse_gps_coordinate(&lon.value),
            ) {
                (Some(latitude), Some(longitude)) => Geodata::Complete {
                    latitude,
                    longitude,
                },
                _ => Geodata::Malformed,
            }
        }
        _ => Geodata::Malformed,
    }
}

/// Parse a GPS coordinate from EXIF rational values (degrees, minutes, seconds).
fn parse_gps_coordinate(value: &exif::Value) -> Option<f64> {
    match value {
        exif::Value::Rational(rationals) if rationals.len() >= 3 => {
            let degrees = rationals[0].to_f64();
            let minutes = rationals[1].to_f64();
            let seconds = rationals[2].to_f64();
            Some(degrees + minutes / 60.0 + seconds / 3600.0)
        }
        _ => None,
    }
}
