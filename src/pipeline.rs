// SPDX-License-Identifier: MPL-2.0
//! Pipeline orchestration: listing, concurrent byte fetches, metadata
//! extraction, and feature-collection publication.
//!
//! Byte fetches run concurrently, bounded by `max_in_flight`, but results are
//! gathered and processed in the original listing order so that repeated runs
//! over unchanged input produce identical output ordering.

use crate::error::Result;
use crate::geojson::{build_feature, FeatureCollection};
use crate::host::ImageHost;
use crate::media::metadata::extract_photo_metadata;
use futures_util::{stream, StreamExt};

/// Drives one image host and holds the last published feature collection.
///
/// A refresh either publishes a new collection wholesale or, on a listing
/// failure, leaves the previously published collection untouched. Individual
/// image failures never abort a run; the affected image is logged and
/// excluded.
#[derive(Debug)]
pub struct Pipeline<H: ImageHost> {
    host: H,
    max_in_flight: usize,
    published: Option<FeatureCollection>,
}

impl<H: ImageHost> Pipeline<H> {
    #[must_use]
    pub fn new(host: H, max_in_flight: usize) -> Self {
        Self {
            host,
            max_in_flight: max_in_flight.max(1),
            published: None,
        }
    }

    /// Mutable access to the underlying host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The last successfully published collection, if any run has completed.
    #[must_use]
    pub fn published(&self) -> Option<&FeatureCollection> {
        self.published.as_ref()
    }

    /// Run the pipeline once and publish the resulting collection.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Listing`] if the image listing cannot
    /// be fetched or decoded; no collection is published in that case.
    pub async fn refresh(&mut self) -> Result<&FeatureCollection> {
        let listing = self.host.fetch_listing().await?;

        let host = &self.host;
        let fetched: Vec<Result<Vec<u8>>> = stream::iter(
            listing
                .iter()
                .map(|image| host.fetch_bytes(&image.download_url)),
        )
        .buffered(self.max_in_flight)
        .collect()
        .await;

        let mut features = Vec::new();
        for (image, result) in listing.iter().zip(fetched) {
            let bytes = match result {
                Ok(bytes) => bytes,
                Err(err) => {
                    eprintln!("Failed to fetch {}: {err}", image.name);
                    continue;
                }
            };

            let metadata = match extract_photo_metadata(&bytes) {
                Ok(metadata) => metadata,
                Err(err) => {
                    eprintln!("Unreadable image {}: {err}", image.name);
                    continue;
                }
            };

            if let Some(feature) = build_feature(&metadata, &image.name, &image.download_url) {
                features.push(feature);
            }
        }

        Ok(self.published.insert(FeatureCollection::new(features)))
    }
}
