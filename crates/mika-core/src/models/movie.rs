use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pagination::Pagination;

/// A category or country tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub id: Option<String>,
    pub name: String,
    pub slug: String,
}

/// Movie summary as shown in lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Unique; the only stable lookup key.
    pub slug: String,
    pub name: String,
    pub origin_name: Option<String>,
    pub poster_url: Option<String>,
    pub thumb_url: Option<String>,
    pub year: Option<u32>,
    pub episode_current: Option<String>,
    pub episode_total: Option<String>,
    pub categories: Vec<Taxonomy>,
    pub countries: Vec<Taxonomy>,
    /// Upstream list kind (`series`, `single`, `hoathinh`, `tvshows`).
    pub kind: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Movie {
    /// Original-language name, only when it differs from the display name.
    pub fn distinct_origin_name(&self) -> Option<&str> {
        self.origin_name
            .as_deref()
            .filter(|origin| *origin != self.name)
    }

    /// Best artwork for a wide banner: thumbnail first, then poster.
    pub fn banner_url(&self) -> Option<&str> {
        self.thumb_url.as_deref().or(self.poster_url.as_deref())
    }

    /// Best artwork for a card: poster first, then thumbnail.
    pub fn card_url(&self) -> Option<&str> {
        self.poster_url.as_deref().or(self.thumb_url.as_deref())
    }

    /// "current / total" episode label, e.g. `Tập 5 / 12`.
    pub fn episode_label(&self) -> Option<String> {
        let current = self.episode_current.as_deref()?;
        Some(match self.episode_total.as_deref() {
            Some(total) => format!("{current} / {total}"),
            None => current.to_string(),
        })
    }
}

/// A playable unit inside a server group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub name: String,
    pub slug: String,
    pub filename: Option<String>,
    pub link_m3u8: Option<String>,
    pub link_embed: Option<String>,
}

/// How an episode can be played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackSource {
    /// Streaming playlist consumed by a native player.
    Manifest(String),
    /// URL loaded inside an embedding surface.
    Embed(String),
    /// Neither link is present.
    Unavailable,
}

impl Episode {
    /// Resolve the playback link: manifest, else embed, else nothing.
    pub fn playback(&self) -> PlaybackSource {
        if let Some(url) = &self.link_m3u8 {
            PlaybackSource::Manifest(url.clone())
        } else if let Some(url) = &self.link_embed {
            PlaybackSource::Embed(url.clone())
        } else {
            PlaybackSource::Unavailable
        }
    }

    pub fn is_playable(&self) -> bool {
        self.link_m3u8.is_some() || self.link_embed.is_some()
    }
}

/// A named delivery variant ("server") with its episodes in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeGroup {
    pub server_name: String,
    pub episodes: Vec<Episode>,
}

impl EpisodeGroup {
    pub fn episode(&self, slug: &str) -> Option<&Episode> {
        self.episodes.iter().find(|ep| ep.slug == slug)
    }
}

/// Full movie record for the detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub movie: Movie,
    pub content: Option<String>,
    pub time: Option<String>,
    pub quality: Option<String>,
    pub lang: Option<String>,
    pub actors: Vec<String>,
    pub directors: Vec<String>,
    /// Server names are unique.
    pub servers: Vec<EpisodeGroup>,
}

impl MovieDetail {
    pub fn server(&self, name: &str) -> Option<&EpisodeGroup> {
        self.servers.iter().find(|group| group.server_name == name)
    }

    /// Whether any episode on any server has a link.
    pub fn has_playable_episode(&self) -> bool {
        self.servers
            .iter()
            .flat_map(|group| &group.episodes)
            .any(Episode::is_playable)
    }
}

/// A page of movie summaries, from a list or search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieList {
    pub items: Vec<Movie>,
    pub pagination: Pagination,
    pub title: Option<String>,
    /// `false` when upstream answered with a non-success envelope or the
    /// request failed and the list was degraded to empty.
    pub succeeded: bool,
}

impl MovieList {
    /// Empty result with default pagination for `requested_page`.
    pub fn empty(requested_page: u32) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::fallback(requested_page),
            title: None,
            succeeded: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for MovieList {
    fn default() -> Self {
        Self::empty(1)
    }
}
