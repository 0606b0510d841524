use chrono::{DateTime, Utc};

use mika_core::filters::{ListFilters, ListScope, SearchFilters};
use mika_core::models::{Movie, MovieList, Taxonomy};
use mika_core::selection::DetailView;

/// Which list endpoint the browse slice last asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseRequest {
    pub scope: ListScope,
    pub filters: ListFilters,
}

/// One list-shaped slice of the store.
///
/// `request` describes the fetch the slice currently reflects (or is
/// loading). `generation` increments each time a fetch starts; a response is
/// only applied if it carries the current value.
#[derive(Debug, Clone)]
pub struct ListSlice<R> {
    pub request: Option<R>,
    pub list: MovieList,
    pub loading: bool,
    pub error: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub(crate) generation: u64,
}

impl<R> Default for ListSlice<R> {
    fn default() -> Self {
        Self {
            request: None,
            list: MovieList::default(),
            loading: false,
            error: None,
            fetched_at: None,
            generation: 0,
        }
    }
}

impl<R> ListSlice<R> {
    pub(crate) fn begin(&mut self, request: R) -> u64 {
        self.generation += 1;
        self.request = Some(request);
        self.loading = true;
        self.error = None;
        self.generation
    }

    /// Apply a response. A failure leaves an empty page for `requested_page`.
    pub(crate) fn finish(&mut self, result: Result<MovieList, String>, requested_page: u32) {
        self.loading = false;
        match result {
            Ok(list) => {
                self.list = list;
                self.fetched_at = Some(Utc::now());
            }
            Err(message) => {
                self.list = MovieList::empty(requested_page);
                self.error = Some(message);
            }
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Default)]
pub struct DetailSlice {
    /// Slug (or TMDB key) of the movie being shown or loaded.
    pub key: Option<String>,
    pub view: Option<DetailView>,
    pub loading: bool,
    pub error: Option<String>,
    pub(crate) generation: u64,
}

impl DetailSlice {
    pub(crate) fn begin(&mut self, key: String) -> u64 {
        self.generation += 1;
        self.key = Some(key);
        self.view = None;
        self.loading = true;
        self.error = None;
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Everything the front-end renders from.
#[derive(Debug, Clone, Default)]
pub struct CatalogueState {
    /// Recently updated movies; drives the home page.
    pub latest: ListSlice<u32>,
    pub browse: ListSlice<BrowseRequest>,
    pub search: ListSlice<SearchFilters>,
    pub detail: DetailSlice,
    pub categories: Vec<Taxonomy>,
    pub countries: Vec<Taxonomy>,
}

impl CatalogueState {
    /// The movie shown in the home page hero.
    pub fn featured(&self) -> Option<&Movie> {
        self.latest.list.items.first()
    }

    pub fn is_loading(&self) -> bool {
        self.latest.loading || self.browse.loading || self.search.loading || self.detail.loading
    }
}
