//! Server/episode selection state of the detail page.
//!
//! Three variables drive the page: the selected server name, the selected
//! episode, and whether the player is visible. Loading a detail picks the
//! first server that has episodes and its first episode, with the player
//! hidden. Switching servers keeps the player visibility as it was. Activating
//! an episode always shows the player.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Episode, EpisodeGroup, MovieDetail, PlaybackSource};

/// Coarse state derived from the selection variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionState {
    NoSelection,
    ServerSelected,
    EpisodePlaying,
}

/// The raw selection variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeSelection {
    pub server: Option<String>,
    /// Slug of the selected episode within `server`.
    pub episode: Option<String>,
    pub player_visible: bool,
}

/// What the player panel should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerView {
    /// No episode has been activated yet.
    Hidden,
    Visible(PlaybackSource),
}

/// A loaded movie detail together with its selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    detail: MovieDetail,
    selection: EpisodeSelection,
}

impl DetailView {
    /// Wrap a freshly loaded detail and auto-select its first episode.
    ///
    /// The pick is the first group that has episodes, not strictly the first
    /// group: an empty leading group is skipped instead of leaving the page
    /// without a selection.
    pub fn new(detail: MovieDetail) -> Self {
        let selection = detail
            .servers
            .iter()
            .find(|group| !group.episodes.is_empty())
            .map(|group| EpisodeSelection {
                server: Some(group.server_name.clone()),
                episode: group.episodes.first().map(|ep| ep.slug.clone()),
                player_visible: false,
            })
            .unwrap_or_default();

        debug!(
            slug = %detail.movie.slug,
            server = ?selection.server,
            episode = ?selection.episode,
            "detail loaded"
        );

        Self { detail, selection }
    }

    pub fn detail(&self) -> &MovieDetail {
        &self.detail
    }

    pub fn selection(&self) -> &EpisodeSelection {
        &self.selection
    }

    pub fn state(&self) -> SelectionState {
        match (&self.selection.server, &self.selection.episode) {
            (None, _) => SelectionState::NoSelection,
            (Some(_), Some(_)) if self.selection.player_visible => SelectionState::EpisodePlaying,
            (Some(_), _) => SelectionState::ServerSelected,
        }
    }

    pub fn selected_server(&self) -> Option<&EpisodeGroup> {
        self.selection
            .server
            .as_deref()
            .and_then(|name| self.detail.server(name))
    }

    pub fn selected_episode(&self) -> Option<&Episode> {
        let slug = self.selection.episode.as_deref()?;
        self.selected_server()?.episode(slug)
    }

    /// Switch to another server and select its first episode.
    ///
    /// Player visibility is left untouched. Returns `false` for an unknown
    /// server name, in which case nothing changes.
    pub fn select_server(&mut self, name: &str) -> bool {
        let Some(group) = self.detail.server(name) else {
            debug!(server = name, "ignoring unknown server");
            return false;
        };

        self.selection.server = Some(group.server_name.clone());
        self.selection.episode = group.episodes.first().map(|ep| ep.slug.clone());
        true
    }

    /// Activate an episode of the selected server and show the player.
    ///
    /// Returns `false` when no server is selected or the slug is not part of
    /// it.
    pub fn play_episode(&mut self, slug: &str) -> bool {
        let found = self
            .selected_server()
            .and_then(|group| group.episode(slug))
            .is_some();
        if !found {
            debug!(episode = slug, "ignoring unknown episode");
            return false;
        }

        self.selection.episode = Some(slug.to_string());
        self.selection.player_visible = true;
        true
    }

    /// Player panel content for the current selection.
    pub fn player(&self) -> PlayerView {
        if !self.selection.player_visible {
            return PlayerView::Hidden;
        }
        match self.selected_episode() {
            Some(episode) => PlayerView::Visible(episode.playback()),
            None => PlayerView::Visible(PlaybackSource::Unavailable),
        }
    }
}
