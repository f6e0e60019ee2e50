//! Catalog record types

use serde::{Deserialize, Serialize};

/// A single validated book entry.
///
/// Records are only ever built by [`validate_volume`](super::validate_volume),
/// so anything held in a cache or returned to a caller has passed schema
/// validation. A record is never mutated; a fresh fetch replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    /// Provider-assigned identifier, unique per provider.
    pub id: String,
    pub title: String,
    /// Author names; empty when the provider lists none.
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Publication date as reported upstream (`"2021"`, `"2021-05"`, `"2021-05-04"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Average rating in `0.0..=5.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings_count: Option<u32>,
    /// ISO 639-1 language code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_links: Option<ImageLinks>,
    /// Canonical "more info" link for the volume.
    pub info_link: String,
}

impl CatalogRecord {
    /// Whether the record declares exactly the given language.
    pub fn is_language(&self, language: &str) -> bool {
        self.language.as_deref() == Some(language)
    }

    /// Best available cover image, largest first.
    pub fn cover(&self) -> Option<&str> {
        self.image_links.as_ref().and_then(ImageLinks::largest)
    }
}

/// Cover image URLs at the resolutions the provider offers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small_thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_large: Option<String>,
}

impl ImageLinks {
    /// Whether no resolution is present.
    pub fn is_empty(&self) -> bool {
        self.largest().is_none()
    }

    /// Largest available image URL.
    pub fn largest(&self) -> Option<&str> {
        [
            &self.extra_large,
            &self.large,
            &self.medium,
            &self.small,
            &self.thumbnail,
            &self.small_thumbnail,
        ]
        .into_iter()
        .find_map(|link| link.as_deref())
    }
}
