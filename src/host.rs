// SPDX-License-Identifier: MPL-2.0
//! Image host client: fetches the image listing and raw image bytes.
//!
//! The listing endpoint is expected to answer with a JSON array of file
//! descriptors carrying at least a `name` and a `download_url`, the shape the
//! GitHub contents API uses. A non-array response is a listing failure,
//! distinct from a valid empty list.

use crate::error::{Error, Result};
use crate::media;
use async_trait::async_trait;
use serde::Deserialize;

/// One listed image: a display name and the address its bytes live at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub name: String,
    pub download_url: String,
}

/// Raw listing entry as the host reports it. Directories have no
/// `download_url`.
#[derive(Debug, Deserialize)]
struct ListingEntry {
    name: String,
    download_url: Option<String>,
}

/// Source of an image listing and per-image bytes.
///
/// The seam between the pipeline and the outside world; tests substitute a
/// stub implementation.
#[async_trait]
pub trait ImageHost {
    /// Fetch the listing of available images.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Listing`] if the listing cannot be fetched or is not
    /// a well-formed array of descriptors.
    async fn fetch_listing(&self) -> Result<Vec<ImageRef>>;

    /// Fetch one image's raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] on network errors or non-success statuses.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// Decode a listing response body into image references.
///
/// Entries without a `download_url` (directories) and files that are not
/// supported image formats are excluded.
///
/// # Errors
///
/// Returns [`Error::Listing`] if the body is not valid JSON, not an array,
/// or contains entries without a `name`.
pub fn decode_listing(body: &str) -> Result<Vec<ImageRef>> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| Error::Listing(format!("listing is not valid JSON: {e}")))?;

    if !value.is_array() {
        return Err(Error::Listing(format!(
            "listing is not an array (got {})",
            json_type_name(&value)
        )));
    }

    let entries: Vec<ListingEntry> = serde_json::from_value(value)
        .map_err(|e| Error::Listing(format!("malformed listing entry: {e}")))?;

    Ok(entries
        .into_iter()
        .filter_map(|entry| {
            let download_url = entry.download_url?;
            Some(ImageRef {
                name: entry.name,
                download_url,
            })
        })
        .filter(|image| media::is_supported_image(&image.name))
        .collect())
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// HTTP-backed image host.
#[derive(Debug, Clone)]
pub struct HttpImageHost {
    client: reqwest::Client,
    listing_url: String,
}

impl HttpImageHost {
    /// Create a client for the given listing endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(listing_url: impl Into<String>) -> Result<Self> {
        // Explicit redirect policy and user agent; the GitHub API rejects
        // anonymous-agent requests.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(concat!("PhotoMap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        Ok(Self {
            client,
            listing_url: listing_url.into(),
        })
    }
}

#[async_trait]
impl ImageHost for HttpImageHost {
    async fn fetch_listing(&self) -> Result<Vec<ImageRef>> {
        let response = self
            .client
            .get(&self.listing_url)
            .send()
            .await
            .map_err(|e| Error::Listing(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Listing(format!(
                "listing request returned HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Listing(e.to_string()))?;

        decode_listing(&body)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Fetch(format!("HTTP {}", response.status())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}
