// SPDX-License-Identifier: MPL-2.0
//! GeoJSON point features and the builder that derives them from photo
//! metadata.
//!
//! The serialized shape is the compatibility contract with the map-rendering
//! consumer: `{ "type": "FeatureCollection", "features": [...] }` where each
//! feature carries a `Point` geometry and `{ image, date }` properties.

use crate::media::metadata::{Geodata, PhotoMetadata};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Display string used whenever the capture timestamp is missing or
/// malformed.
pub const DATE_NOT_AVAILABLE: &str = "Date not available";

/// EXIF timestamp layout, `"2020:05:14 10:30:00"`.
const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// en-US locale display layout, `"5/14/2020, 10:30:00 AM"`.
const DISPLAY_DATETIME_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<PointFeature>,
}

impl FeatureCollection {
    #[must_use]
    pub fn new(features: Vec<PointFeature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: PointGeometry,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`, GeoJSON axis order.
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    /// Displayable URL of the photo, used by the popup.
    pub image: String,
    /// Locale-formatted capture date, or [`DATE_NOT_AVAILABLE`].
    pub date: String,
}

/// Build a point feature from a photo's metadata, or skip the photo.
///
/// A photo without a usable coordinate pair is a normal case, not a defect:
/// it returns `None` and the skip is logged with the image name and a
/// best-effort formatted date.
///
/// Longitude is stored negated. The deployment this tool was built for is in
/// the Western hemisphere and raw EXIF longitudes arrive as unsigned
/// magnitudes; the hemisphere reference tags are not consulted, so the sign
/// convention does not generalize to other regions.
#[must_use]
pub fn build_feature(
    metadata: &PhotoMetadata,
    name: &str,
    display_url: &str,
) -> Option<PointFeature> {
    let date = format_display_date(metadata.date_taken.as_deref());

    let (latitude, longitude) = match metadata.geodata {
        Geodata::Complete {
            latitude,
            longitude,
        } => (latitude, longitude),
        Geodata::Absent | Geodata::Malformed => {
            eprintln!("No geodata: {name} ({date})");
            return None;
        }
    };

    let coordinates = [-longitude, latitude];
    if !coordinates_in_range(coordinates) {
        eprintln!(
            "Out-of-range coordinates for {name}: [{}, {}]",
            coordinates[0], coordinates[1]
        );
        return None;
    }

    Some(PointFeature {
        kind: "Feature".to_string(),
        geometry: PointGeometry {
            kind: "Point".to_string(),
            coordinates,
        },
        properties: FeatureProperties {
            image: display_url.to_string(),
            date,
        },
    })
}

/// Format a raw EXIF timestamp for display.
///
/// Any deviation from the expected `"YYYY:MM:DD HH:MM:SS"` layout falls back
/// to [`DATE_NOT_AVAILABLE`] rather than failing.
#[must_use]
pub fn format_display_date(raw: Option<&str>) -> String {
    raw.and_then(|text| NaiveDateTime::parse_from_str(text.trim(), EXIF_DATETIME_FORMAT).ok())
        .map(|taken| taken.format(DISPLAY_DATETIME_FORMAT).to_string())
        .unwrap_or_else(|| DATE_NOT_AVAILABLE.to_string())
}

fn coordinates_in_range([longitude, latitude]: [f64; 2]) -> bool {
    longitude.is_finite()
        && latitude.is_finite()
        && (-180.0..=180.0).contains(&longitude)
        && (-90.0..=90.0).contains(&latitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(latitude: f64, longitude: f64) -> PhotoMetadata {
        PhotoMetadata {
            date_taken: Some("2020:05:14 10:30:00".to_string()),
            geodata: Geodata::Complete {
                latitude,
                longitude,
            },
        }
    }

    #[test]
    fn longitude_is_negated_and_latitude_kept_exactly() {
        let feature = build_feature(
            &complete(39.0639, 105.3272),
            "trail.jpg",
            "https://host/trail.jpg",
        )
        .expect("feature");
        assert_eq!(feature.geometry.coordinates, [-105.3272, 39.0639]);
    }

    #[test]
    fn valid_timestamp_renders_locale_string() {
        let feature = build_feature(
            &complete(39.0639, 105.3272),
            "trail.jpg",
            "https://host/trail.jpg",
        )
        .expect("feature");
        assert_eq!(feature.properties.date, "5/14/2020, 10:30:00 AM");
        assert_eq!(feature.properties.image, "https://host/trail.jpg");
    }

    #[test]
    fn afternoon_timestamp_uses_pm() {
        assert_eq!(
            format_display_date(Some("2020:12:01 17:05:09")),
            "12/1/2020, 5:05:09 PM"
        );
    }

    #[test]
    fn absent_geodata_is_skipped() {
        let metadata = PhotoMetadata {
            date_taken: None,
            geodata: Geodata::Absent,
        };
        assert!(build_feature(&metadata, "indoor.jpg", "url").is_none());
    }

    #[test]
    fn malformed_geodata_is_skipped() {
        let metadata = PhotoMetadata {
            date_taken: Some("2020:05:14 10:30:00".to_string()),
            geodata: Geodata::Malformed,
        };
        assert!(build_feature(&metadata, "broken.jpg", "url").is_none());
    }

    #[test]
    fn origin_reading_is_a_real_feature_not_a_default() {
        let feature = build_feature(&complete(0.0, 0.0), "gulf.jpg", "url").expect("feature");
        assert_eq!(feature.geometry.coordinates[1], 0.0);
        assert_eq!(feature.geometry.coordinates[0], 0.0);
    }

    #[test]
    fn out_of_range_latitude_is_skipped() {
        assert!(build_feature(&complete(95.0, 105.0), "bad.jpg", "url").is_none());
    }

    #[test]
    fn out_of_range_longitude_is_skipped() {
        assert!(build_feature(&complete(39.0, 500.0), "bad.jpg", "url").is_none());
    }

    #[test]
    fn missing_timestamp_falls_back() {
        assert_eq!(format_display_date(None), DATE_NOT_AVAILABLE);
    }

    #[test]
    fn malformed_timestamps_fall_back() {
        assert_eq!(format_display_date(Some("2020:05:14")), DATE_NOT_AVAILABLE);
        assert_eq!(
            format_display_date(Some("not a date at all")),
            DATE_NOT_AVAILABLE
        );
        assert_eq!(
            format_display_date(Some("2020:13:99 10:30:00")),
            DATE_NOT_AVAILABLE
        );
        assert_eq!(
            format_display_date(Some("2020-05-14 10:30:00")),
            DATE_NOT_AVAILABLE
        );
    }

    #[test]
    fn serializes_to_the_wire_contract() {
        let feature = build_feature(
            &complete(39.0639, 105.3272),
            "trail.jpg",
            "https://host/trail.jpg",
        )
        .expect("feature");
        let collection = FeatureCollection::new(vec![feature]);

        let value = serde_json::to_value(&collection).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [-105.3272, 39.0639],
                    },
                    "properties": {
                        "image": "https://host/trail.jpg",
                        "date": "5/14/2020, 10:30:00 AM",
                    },
                }],
            })
        );
    }

    #[test]
    fn empty_collection_serializes() {
        let collection = FeatureCollection::new(Vec::new());
        let json = serde_json::to_string(&collection).expect("serialize");
        assert_eq!(json, r#"{"type":"FeatureCollection","features":[]}"#);
    }
}
