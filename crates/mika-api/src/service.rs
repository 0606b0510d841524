use serde::de::DeserializeOwned;

use mika_core::config::{ApiConfig, ApiVersion};
use mika_core::filters::{ListFilters, ListKind, ListScope, SearchFilters, TmdbKind};
use mika_core::models::{MovieDetail, MovieList, Taxonomy};

use crate::envelope::{DetailEnvelope, ListEnvelope, TaxonomyEnvelope};
use crate::error::ApiError;
use crate::image::{ImageProxy, ImageResolver};
use crate::transport::Transport;

/// Builds requests for every endpoint family and normalizes the responses.
///
/// Error policy:
/// * list-shaped operations never fail on upstream trouble; they log and
///   return an empty page with default pagination;
/// * detail lookups fail with [`ApiError::NotFound`];
/// * search propagates transport errors.
///
/// Invalid input (page 0, year 0, empty slug, blank keyword) is rejected
/// before any request.
pub struct MovieService<T> {
    transport: T,
    images: ImageResolver,
    proxy: ImageProxy,
}

impl<T: Transport> MovieService<T> {
    pub fn new(transport: T, config: &ApiConfig) -> Self {
        Self {
            transport,
            images: ImageResolver::new(config.image_cdn.clone()),
            proxy: ImageProxy::from_config(config),
        }
    }

    // ── Path builders ───────────────────────────────────────────

    pub fn latest_path(page: u32, version: ApiVersion) -> String {
        match version {
            ApiVersion::V1 => format!("/danh-sach/phim-moi-cap-nhat?page={page}"),
            other => format!("/danh-sach/phim-moi-cap-nhat-{}?page={page}", other.as_str()),
        }
    }

    /// Path and query for a list endpoint; absent filters are omitted.
    pub fn build_list_query(scope: &ListScope, filters: &ListFilters) -> String {
        scope.request_path(filters)
    }

    // ── Lists ───────────────────────────────────────────────────

    /// Recently updated movies.
    pub async fn latest(&self, page: u32, version: ApiVersion) -> Result<MovieList, ApiError> {
        validate_page(page)?;
        Ok(self
            .fetch_list(&Self::latest_path(page, version), page)
            .await)
    }

    /// Any list endpoint family.
    pub async fn browse(
        &self,
        scope: &ListScope,
        filters: &ListFilters,
    ) -> Result<MovieList, ApiError> {
        if let Some(page) = filters.page {
            validate_page(page)?;
        }
        match scope {
            ListScope::Category(slug) | ListScope::Country(slug) if slug.trim().is_empty() => {
                return Err(ApiError::EmptySlug);
            }
            ListScope::Year(0) => return Err(ApiError::InvalidYear(0)),
            _ => {}
        }
        let path = Self::build_list_query(scope, filters);
        Ok(self.fetch_list(&path, filters.requested_page()).await)
    }

    pub async fn list(&self, kind: ListKind, filters: &ListFilters) -> Result<MovieList, ApiError> {
        self.browse(&ListScope::Kind(kind), filters).await
    }

    pub async fn by_category(
        &self,
        slug: &str,
        filters: &ListFilters,
    ) -> Result<MovieList, ApiError> {
        self.browse(&ListScope::Category(slug.to_string()), filters)
            .await
    }

    pub async fn by_country(
        &self,
        slug: &str,
        filters: &ListFilters,
    ) -> Result<MovieList, ApiError> {
        self.browse(&ListScope::Country(slug.to_string()), filters)
            .await
    }

    pub async fn by_year(&self, year: u32, filters: &ListFilters) -> Result<MovieList, ApiError> {
        self.browse(&ListScope::Year(year), filters).await
    }

    /// Keyword search. Unlike the list operations, transport failures are
    /// returned to the caller.
    pub async fn search(&self, search: &SearchFilters) -> Result<MovieList, ApiError> {
        if search.keyword.trim().is_empty() {
            return Err(ApiError::EmptyKeyword);
        }
        if let Some(page) = search.filters.page {
            validate_page(page)?;
        }
        let requested_page = search.filters.requested_page();
        let path = search.request_path();

        match self.fetch::<ListEnvelope>(&path).await {
            Ok(envelope) => Ok(envelope.into_movie_list(requested_page, &self.images)),
            Err(e) => {
                tracing::error!(keyword = %search.keyword, error = %e, "search failed");
                Err(e)
            }
        }
    }

    // ── Details ─────────────────────────────────────────────────

    /// A single movie with its server groups.
    pub async fn detail(&self, slug: &str) -> Result<MovieDetail, ApiError> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(ApiError::EmptySlug);
        }
        let path = format!("/phim/{}", urlencoding::encode(slug));
        self.fetch_detail(&path, slug).await
    }

    /// A movie looked up by its TMDB id.
    pub async fn by_tmdb(&self, kind: TmdbKind, id: u64) -> Result<MovieDetail, ApiError> {
        let path = format!("/tmdb/{}/{id}", kind.as_str());
        self.fetch_detail(&path, &format!("tmdb:{kind}:{id}")).await
    }

    // ── Taxonomies ──────────────────────────────────────────────

    pub async fn categories(&self) -> Vec<Taxonomy> {
        self.fetch_taxonomies("/the-loai").await
    }

    pub async fn countries(&self) -> Vec<Taxonomy> {
        self.fetch_taxonomies("/quoc-gia").await
    }

    // ── Images ──────────────────────────────────────────────────

    /// Wrap an image URL in the upstream conversion endpoint. No request is
    /// made.
    pub fn image_variant(&self, url: &str) -> String {
        self.proxy.variant(url)
    }

    // ── Internals ───────────────────────────────────────────────

    async fn fetch<D: DeserializeOwned>(&self, path: &str) -> Result<D, ApiError> {
        let value = self.transport.get_json(path).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn fetch_list(&self, path: &str, requested_page: u32) -> MovieList {
        match self.fetch::<ListEnvelope>(path).await {
            Ok(envelope) => envelope.into_movie_list(requested_page, &self.images),
            Err(e) => {
                tracing::warn!(path, error = %e, "list request failed, returning empty page");
                MovieList::empty(requested_page)
            }
        }
    }

    async fn fetch_detail(&self, path: &str, key: &str) -> Result<MovieDetail, ApiError> {
        let envelope = match self.fetch::<DetailEnvelope>(path).await {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(path, error = %e, "detail request failed");
                return Err(ApiError::NotFound(key.to_string()));
            }
        };
        envelope
            .into_detail(key, &self.images)
            .ok_or_else(|| ApiError::NotFound(key.to_string()))
    }

    async fn fetch_taxonomies(&self, path: &str) -> Vec<Taxonomy> {
        match self.fetch::<TaxonomyEnvelope>(path).await {
            Ok(envelope) => envelope.into_taxonomies(),
            Err(e) => {
                tracing::warn!(path, error = %e, "taxonomy request failed");
                Vec::new()
            }
        }
    }
}

fn validate_page(page: u32) -> Result<(), ApiError> {
    if page == 0 {
        Err(ApiError::InvalidPage(page))
    } else {
        Ok(())
    }
}
