use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use mika_core::models::{Episode, EpisodeGroup, Movie, MovieDetail, Pagination, Taxonomy};
use mika_core::models::pagination::DEFAULT_ITEMS_PER_PAGE;

use crate::image::ImageResolver;

// ── Shared fragments ────────────────────────────────────────────

/// Envelope success flag: a boolean on most endpoints, `"success"` on the
/// nested ones.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Status {
    Flag(bool),
    Text(String),
}

impl Status {
    pub fn is_success(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Text(text) => text.eq_ignore_ascii_case("success") || text == "true",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPagination {
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_items: Option<u64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_items_per_page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub current_page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ApiTaxonomy {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiModified {
    pub time: Option<String>,
}

// ── Movie ───────────────────────────────────────────────────────

/// A movie object as found in list items and detail envelopes.
///
/// Legacy list items only carry the identity and artwork fields; versioned
/// list items add tags and episode counters; detail objects add everything
/// else.
#[derive(Debug, Default, Deserialize)]
pub struct ApiMovie {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub slug: String,
    pub origin_name: Option<String>,
    pub poster_url: Option<String>,
    pub thumb_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub year: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub episode_current: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub episode_total: Option<String>,
    #[serde(default, deserialize_with = "lenient_list_opt")]
    pub category: Option<Vec<ApiTaxonomy>>,
    #[serde(default, deserialize_with = "lenient_list_opt")]
    pub country: Option<Vec<ApiTaxonomy>>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub modified: Option<ApiModified>,
    pub content: Option<String>,
    pub time: Option<String>,
    pub quality: Option<String>,
    pub lang: Option<String>,
    #[serde(default, deserialize_with = "lenient_list_opt")]
    pub actor: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_list_opt")]
    pub director: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_list_opt")]
    pub episodes: Option<Vec<ApiServer>>,
    #[serde(
        default,
        rename = "episodesSub",
        deserialize_with = "lenient_list_opt"
    )]
    pub episodes_sub: Option<Vec<ApiServer>>,
    #[serde(
        default,
        rename = "episodesVo",
        deserialize_with = "lenient_list_opt"
    )]
    pub episodes_vo: Option<Vec<ApiServer>>,
}

#[derive(Debug, Deserialize)]
pub struct ApiServer {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub server_name: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub server_data: Vec<ApiEpisode>,
}

#[derive(Debug, Deserialize)]
pub struct ApiEpisode {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub slug: String,
    pub filename: Option<String>,
    pub link_embed: Option<String>,
    pub link_m3u8: Option<String>,
}

// ── Conversions to core models ──────────────────────────────────

impl ApiPagination {
    /// Fill missing fields from the single-page default.
    pub fn into_pagination(self, requested_page: u32) -> Pagination {
        let fallback = Pagination::fallback(requested_page);
        Pagination {
            total_items: self.total_items.unwrap_or(fallback.total_items),
            items_per_page: self
                .total_items_per_page
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_ITEMS_PER_PAGE),
            current_page: self
                .current_page
                .filter(|p| *p > 0)
                .unwrap_or(fallback.current_page),
            total_pages: self.total_pages.unwrap_or(fallback.total_pages),
        }
    }
}

impl ApiTaxonomy {
    pub fn into_taxonomy(self) -> Taxonomy {
        Taxonomy {
            id: non_blank(self.id),
            name: self.name,
            slug: self.slug,
        }
    }
}

impl ApiEpisode {
    pub fn into_episode(self) -> Episode {
        Episode {
            name: self.name,
            slug: self.slug,
            filename: non_blank(self.filename),
            link_m3u8: non_blank(self.link_m3u8),
            link_embed: non_blank(self.link_embed),
        }
    }
}

/// Convert server groups, keeping only the first group of each name.
pub fn into_episode_groups(servers: Vec<ApiServer>) -> Vec<EpisodeGroup> {
    let mut groups: Vec<EpisodeGroup> = Vec::with_capacity(servers.len());
    for server in servers {
        if groups.iter().any(|g| g.server_name == server.server_name) {
            tracing::debug!(server = %server.server_name, "dropping duplicate server group");
            continue;
        }
        groups.push(EpisodeGroup {
            server_name: server.server_name,
            episodes: server
                .server_data
                .into_iter()
                .map(ApiEpisode::into_episode)
                .collect(),
        });
    }
    groups
}

fn taxonomies(tags: Option<Vec<ApiTaxonomy>>) -> Vec<Taxonomy> {
    tags.unwrap_or_default()
        .into_iter()
        .map(ApiTaxonomy::into_taxonomy)
        .collect()
}

fn parse_time(modified: Option<ApiModified>) -> Option<DateTime<Utc>> {
    let time = modified?.time?;
    DateTime::parse_from_rfc3339(&time)
        .map(|t| t.with_timezone(&Utc))
        .ok()
}

impl ApiMovie {
    pub fn into_movie(self, images: &ImageResolver) -> Movie {
        self.split(images).0
    }

    /// Build a detail record. `envelope_episodes` is the sibling `episodes`
    /// array of the detail envelope and takes precedence over any episode
    /// list embedded in the movie object.
    pub fn into_detail(
        self,
        envelope_episodes: Option<Vec<ApiServer>>,
        images: &ImageResolver,
    ) -> MovieDetail {
        let (movie, rest) = self.split(images);
        let servers = envelope_episodes
            .or(rest.episodes)
            .or(rest.episodes_sub)
            .or(rest.episodes_vo)
            .unwrap_or_default();

        MovieDetail {
            movie,
            content: non_blank(rest.content),
            time: non_blank(rest.time),
            quality: non_blank(rest.quality),
            lang: non_blank(rest.lang),
            actors: names(rest.actor),
            directors: names(rest.director),
            servers: into_episode_groups(servers),
        }
    }

    fn split(self, images: &ImageResolver) -> (Movie, DetailFields) {
        let movie = Movie {
            slug: self.slug,
            name: self.name,
            origin_name: non_blank(self.origin_name),
            poster_url: images.resolve(self.poster_url),
            thumb_url: images.resolve(self.thumb_url),
            year: self.year.filter(|y| *y > 0),
            episode_current: non_blank(self.episode_current),
            episode_total: non_blank(self.episode_total),
            categories: taxonomies(self.category),
            countries: taxonomies(self.country),
            kind: non_blank(self.kind),
            updated_at: parse_time(self.modified),
        };
        let rest = DetailFields {
            content: self.content,
            time: self.time,
            quality: self.quality,
            lang: self.lang,
            actor: self.actor,
            director: self.director,
            episodes: self.episodes,
            episodes_sub: self.episodes_sub,
            episodes_vo: self.episodes_vo,
        };
        (movie, rest)
    }
}

struct DetailFields {
    content: Option<String>,
    time: Option<String>,
    quality: Option<String>,
    lang: Option<String>,
    actor: Option<Vec<String>>,
    director: Option<Vec<String>>,
    episodes: Option<Vec<ApiServer>>,
    episodes_sub: Option<Vec<ApiServer>>,
    episodes_vo: Option<Vec<ApiServer>>,
}

/// Actor/director lists sometimes contain blank placeholders.
fn names(list: Option<Vec<String>>) -> Vec<String> {
    list.unwrap_or_default()
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

/// Upstream uses empty strings for "absent".
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ── Lenient field decoding ──────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Unsigned(u64),
    Float(f64),
    Text(String),
}

/// Accept a number, a numeric string, or null.
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64> + std::str::FromStr,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Unsigned(n)) => T::try_from(n).ok(),
        Some(Scalar::Float(f)) if f.is_finite() && f >= 0.0 => T::try_from(f as u64).ok(),
        Some(Scalar::Text(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Accept a string or a number rendered as a string.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Unsigned(n)) => Some(n.to_string()),
        Some(Scalar::Float(f)) => Some(f.to_string()),
        Some(Scalar::Text(s)) => Some(s),
        None => None,
    })
}

/// A string where `null` means empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode an array entry by entry, skipping entries that do not fit `T`.
/// A missing, null or non-array value yields `None`.
pub(crate) fn lenient_list_opt<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(entries)) => Some(decode_each(entries)),
        None | Some(Value::Null) => None,
        Some(other) => {
            tracing::warn!(value = %other, "expected an array, ignoring field");
            None
        }
    })
}

/// Like [`lenient_list_opt`], with absence read as an empty list.
pub(crate) fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(lenient_list_opt(deserializer)?.unwrap_or_default())
}

fn decode_each<T: DeserializeOwned>(entries: Vec<Value>) -> Vec<T> {
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(
                    entry = std::any::type_name::<T>(),
                    error = %e,
                    "skipping malformed entry"
                );
                None
            }
        })
        .collect()
}
