// SPDX-License-Identifier: MPL-2.0
//! `photomap` turns a hosted photo collection into a GeoJSON feature set.
//!
//! It fetches an image listing from an external host, retrieves each image's
//! raw bytes concurrently, extracts embedded capture metadata (timestamp and
//! GPS coordinates), and assembles the results into a feature collection
//! suitable for rendering as map markers with popups.

#![doc(html_root_url = "https://docs.rs/photomap/0.1.0")]

pub mod config;
pub mod error;
pub mod geojson;
pub mod host;
pub mod media;
pub mod pipeline;
