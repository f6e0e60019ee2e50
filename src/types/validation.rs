//! Schema validation of raw provider payloads.
//!
//! Every item the provider returns passes through [`validate_volume`] before
//! it becomes a [`CatalogRecord`]. List responses drop items that fail;
//! single-volume lookups turn the failure into an upstream error.

use reqwest::Url;
use serde::Deserialize;

use super::{CatalogRecord, ImageLinks};

/// Link used when the provider supplies no usable info link.
const FALLBACK_INFO_LINK: &str = "https://books.google.com/books?id=";

/// Why a raw item was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaViolation {
    /// The item does not have the expected JSON shape.
    #[error("malformed volume: {0}")]
    Malformed(String),

    /// A required field is absent or blank.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// A numeric field is outside its valid range.
    #[error("field '{field}' out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVolume {
    id: Option<String>,
    volume_info: Option<RawVolumeInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
    publisher: Option<String>,
    published_date: Option<String>,
    description: Option<String>,
    page_count: Option<u32>,
    categories: Option<Vec<String>>,
    average_rating: Option<f32>,
    ratings_count: Option<u32>,
    language: Option<String>,
    image_links: Option<ImageLinks>,
    info_link: Option<String>,
    canonical_volume_link: Option<String>,
}

/// Validate one raw provider item into a [`CatalogRecord`].
///
/// Required: a non-blank `id` and `volumeInfo.title`. Optional links that
/// are not valid URLs are dropped rather than failing the record; a rating
/// outside `0.0..=5.0` fails it.
pub fn validate_volume(raw: serde_json::Value) -> Result<CatalogRecord, SchemaViolation> {
    let volume: RawVolume =
        serde_json::from_value(raw).map_err(|e| SchemaViolation::Malformed(e.to_string()))?;

    let id = non_blank(volume.id).ok_or(SchemaViolation::MissingField("id"))?;
    let info = volume
        .volume_info
        .ok_or(SchemaViolation::MissingField("volumeInfo"))?;
    let title = non_blank(info.title).ok_or(SchemaViolation::MissingField("title"))?;

    if let Some(rating) = info.average_rating {
        if !(0.0..=5.0).contains(&rating) {
            return Err(SchemaViolation::OutOfRange {
                field: "averageRating",
                value: f64::from(rating),
            });
        }
    }

    let info_link = [info.canonical_volume_link, info.info_link]
        .into_iter()
        .flatten()
        .find(|link| is_url(link))
        .unwrap_or_else(|| format!("{FALLBACK_INFO_LINK}{id}"));

    let image_links = info
        .image_links
        .map(clean_image_links)
        .filter(|links| !links.is_empty());

    Ok(CatalogRecord {
        id,
        title,
        authors: info.authors.unwrap_or_default(),
        publisher: non_blank(info.publisher),
        published_date: non_blank(info.published_date),
        description: non_blank(info.description),
        page_count: info.page_count,
        categories: info.categories.unwrap_or_default(),
        average_rating: info.average_rating,
        ratings_count: info.ratings_count,
        language: non_blank(info.language).map(|l| l.to_lowercase()),
        image_links,
        info_link,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn is_url(candidate: &str) -> bool {
    Url::parse(candidate).is_ok()
}

fn clean_image_links(links: ImageLinks) -> ImageLinks {
    let keep = |link: Option<String>| link.filter(|l| is_url(l));
    ImageLinks {
        small_thumbnail: keep(links.small_thumbnail),
        thumbnail: keep(links.thumbnail),
        small: keep(links.small),
        medium: keep(links.medium),
        large: keep(links.large),
        extra_large: keep(links.extra_large),
    }
}
