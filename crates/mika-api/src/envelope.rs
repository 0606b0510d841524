//! Upstream response envelopes, resolved once into core models.
//!
//! List-shaped endpoints answer in one of two layouts:
//!
//! * flat: `{status, items, pagination, pathImage, titlePage}`, used by the
//!   "latest" endpoints (legacy and versioned);
//! * nested: `{status, msg, data: {items, params: {pagination}, titlePage,
//!   APP_DOMAIN_CDN_IMAGE}}`, used by search and the `/v1/api/*` lists.
//!
//! Every list operation accepts either layout, so callers never branch on
//! upstream version. The layout is picked from the presence of a `data`
//! object, and items are decoded one by one so a single malformed entry
//! costs only that entry.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use mika_core::models::{MovieDetail, MovieList, Taxonomy};

use crate::image::ImageResolver;
use crate::types::{
    lenient_list, lenient_list_opt, non_blank, ApiMovie, ApiPagination, ApiServer, ApiTaxonomy,
    Status,
};

// ── List envelopes ──────────────────────────────────────────────

#[derive(Debug)]
pub enum ListEnvelope {
    Nested(NestedListEnvelope),
    Flat(FlatListEnvelope),
}

impl<'de> Deserialize<'de> for ListEnvelope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let envelope = if value.get("data").is_some_and(Value::is_object) {
            serde_json::from_value(value).map(Self::Nested)
        } else {
            serde_json::from_value(value).map(Self::Flat)
        };
        envelope.map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Deserialize)]
pub struct NestedListEnvelope {
    pub status: Option<Status>,
    pub data: NestedListData,
}

#[derive(Debug, Deserialize)]
pub struct NestedListData {
    #[serde(default, deserialize_with = "lenient_list")]
    pub items: Vec<ApiMovie>,
    pub params: Option<NestedParams>,
    #[serde(rename = "titlePage")]
    pub title_page: Option<String>,
    #[serde(rename = "APP_DOMAIN_CDN_IMAGE")]
    pub cdn_image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NestedParams {
    pub pagination: Option<ApiPagination>,
}

#[derive(Debug, Deserialize)]
pub struct FlatListEnvelope {
    pub status: Option<Status>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub items: Vec<ApiMovie>,
    pub pagination: Option<ApiPagination>,
    #[serde(rename = "titlePage")]
    pub title_page: Option<String>,
}

impl ListEnvelope {
    /// Normalize into a [`MovieList`].
    ///
    /// A non-success status yields an empty list; a missing pagination
    /// fragment yields the single-page default for `requested_page`.
    pub fn into_movie_list(self, requested_page: u32, images: &ImageResolver) -> MovieList {
        let (status, items, pagination, title, images) = match self {
            Self::Nested(envelope) => {
                let data = envelope.data;
                (
                    envelope.status,
                    data.items,
                    data.params.and_then(|p| p.pagination),
                    data.title_page,
                    images.with_cdn(data.cdn_image.as_deref()),
                )
            }
            Self::Flat(envelope) => (
                envelope.status,
                envelope.items,
                envelope.pagination,
                envelope.title_page,
                images.clone(),
            ),
        };

        // A missing flag on a decodable body counts as success.
        if !status.map_or(true, |s| s.is_success()) {
            tracing::debug!("upstream reported a non-success list envelope");
            return MovieList::empty(requested_page);
        }

        MovieList {
            items: items
                .into_iter()
                .map(|item| item.into_movie(&images))
                .collect(),
            pagination: pagination
                .unwrap_or_default()
                .into_pagination(requested_page),
            title: non_blank(title),
            succeeded: true,
        }
    }
}

// ── Detail envelope ─────────────────────────────────────────────

/// `{status, msg, movie, episodes}` from `/phim/{slug}` and `/tmdb/...`.
#[derive(Debug, Deserialize)]
pub struct DetailEnvelope {
    pub status: Option<Status>,
    pub movie: Option<ApiMovie>,
    #[serde(default, deserialize_with = "lenient_list_opt")]
    pub episodes: Option<Vec<ApiServer>>,
}

impl DetailEnvelope {
    /// `None` when the success flag is falsy or absent, or the movie object
    /// is missing.
    pub fn into_detail(self, requested_slug: &str, images: &ImageResolver) -> Option<MovieDetail> {
        if !self.status.is_some_and(|s| s.is_success()) {
            return None;
        }
        let mut detail = self.movie?.into_detail(self.episodes, images);
        if detail.movie.slug.is_empty() {
            detail.movie.slug = requested_slug.to_string();
        }
        Some(detail)
    }
}

// ── Taxonomy lists ──────────────────────────────────────────────

/// `/the-loai` and `/quoc-gia`: a bare array, or an object wrapping one.
#[derive(Debug)]
pub enum TaxonomyEnvelope {
    List(Vec<ApiTaxonomy>),
    Wrapped { data: Vec<ApiTaxonomy> },
}

#[derive(Deserialize)]
struct WrappedTaxonomies {
    #[serde(alias = "items", deserialize_with = "lenient_list")]
    data: Vec<ApiTaxonomy>,
}

impl<'de> Deserialize<'de> for TaxonomyEnvelope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let envelope = if value.is_array() {
            lenient_list(value).map(Self::List)
        } else {
            serde_json::from_value::<WrappedTaxonomies>(value).map(|w| Self::Wrapped { data: w.data })
        };
        envelope.map_err(serde::de::Error::custom)
    }
}

impl TaxonomyEnvelope {
    pub fn into_taxonomies(self) -> Vec<Taxonomy> {
        let tags = match self {
            Self::List(tags) | Self::Wrapped { data: tags } => tags,
        };
        tags.into_iter()
            .filter(|t| !t.slug.is_empty())
            .map(ApiTaxonomy::into_taxonomy)
            .collect()
    }
}
