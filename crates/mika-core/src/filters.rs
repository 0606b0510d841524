//! Filter objects for the list and search endpoints, and the query-string
//! builder shared by all of them.
//!
//! Every filter field is optional. Only present fields are serialized, always
//! in the same key order, so the same set of fields yields the same query
//! string no matter how the filter was assembled.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::form_urlencoded;

#[derive(Debug, Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseFilterError {
    kind: &'static str,
    value: String,
}

// ── Typed filter values ───────────────────────────────────────────

/// Upstream field a list is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    ModifiedTime,
    Id,
    Year,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ModifiedTime => "modified.time",
            Self::Id => "_id",
            Self::Year => "year",
        }
    }
}

impl FromStr for SortField {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "modified.time" | "modified" => Ok(Self::ModifiedTime),
            "_id" | "id" => Ok(Self::Id),
            "year" => Ok(Self::Year),
            _ => Err(ParseFilterError {
                kind: "sort field",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ParseFilterError {
                kind: "sort order",
                value: s.to_string(),
            }),
        }
    }
}

/// Audio/subtitle language variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortLang {
    Vietsub,
    ThuyetMinh,
    LongTieng,
}

impl SortLang {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vietsub => "vietsub",
            Self::ThuyetMinh => "thuyet-minh",
            Self::LongTieng => "long-tieng",
        }
    }
}

impl FromStr for SortLang {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vietsub" => Ok(Self::Vietsub),
            "thuyet-minh" => Ok(Self::ThuyetMinh),
            "long-tieng" => Ok(Self::LongTieng),
            _ => Err(ParseFilterError {
                kind: "language",
                value: s.to_string(),
            }),
        }
    }
}

/// Media type accepted by the TMDB lookup endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TmdbKind {
    Tv,
    Movie,
}

impl TmdbKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tv => "tv",
            Self::Movie => "movie",
        }
    }
}

impl FromStr for TmdbKind {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tv" => Ok(Self::Tv),
            "movie" => Ok(Self::Movie),
            _ => Err(ParseFilterError {
                kind: "TMDB type",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TmdbKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalogue sections served by the generic list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListKind {
    Series,
    Single,
    TvShows,
    Animation,
    Vietsub,
    ThuyetMinh,
    LongTieng,
}

impl ListKind {
    pub const ALL: &[ListKind] = &[
        Self::Series,
        Self::Single,
        Self::TvShows,
        Self::Animation,
        Self::Vietsub,
        Self::ThuyetMinh,
        Self::LongTieng,
    ];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Series => "phim-bo",
            Self::Single => "phim-le",
            Self::TvShows => "tv-shows",
            Self::Animation => "hoat-hinh",
            Self::Vietsub => "phim-vietsub",
            Self::ThuyetMinh => "phim-thuyet-minh",
            Self::LongTieng => "phim-long-tieng",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Series => "Phim bộ",
            Self::Single => "Phim lẻ",
            Self::TvShows => "TV Shows",
            Self::Animation => "Hoạt hình",
            Self::Vietsub => "Phim Vietsub",
            Self::ThuyetMinh => "Phim thuyết minh",
            Self::LongTieng => "Phim lồng tiếng",
        }
    }
}

impl FromStr for ListKind {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_slug() == s)
            .ok_or_else(|| ParseFilterError {
                kind: "list kind",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Filter object ─────────────────────────────────────────────────

/// Query keys, in serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    Page,
    SortField,
    SortType,
    SortLang,
    Category,
    Country,
    Year,
    Limit,
}

impl FilterKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::SortField => "sort_field",
            Self::SortType => "sort_type",
            Self::SortLang => "sort_lang",
            Self::Category => "category",
            Self::Country => "country",
            Self::Year => "year",
            Self::Limit => "limit",
        }
    }
}

/// Optional filters accepted by every list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilters {
    pub page: Option<u32>,
    pub sort_field: Option<SortField>,
    pub sort_type: Option<SortOrder>,
    pub sort_lang: Option<SortLang>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub year: Option<u32>,
    pub limit: Option<u32>,
}

impl ListFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn sort_field(mut self, field: SortField) -> Self {
        self.sort_field = Some(field);
        self
    }

    pub fn sort_type(mut self, order: SortOrder) -> Self {
        self.sort_type = Some(order);
        self
    }

    pub fn sort_lang(mut self, lang: SortLang) -> Self {
        self.sort_lang = Some(lang);
        self
    }

    pub fn category(mut self, slug: impl Into<String>) -> Self {
        self.category = non_empty(slug.into());
        self
    }

    pub fn country(mut self, slug: impl Into<String>) -> Self {
        self.country = non_empty(slug.into());
        self
    }

    pub fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Page the caller asked for, 1 when unset.
    pub fn requested_page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    /// Present fields as key/value pairs in serialization order.
    ///
    /// Empty strings and zero years/limits count as absent.
    pub fn pairs(&self) -> Vec<(FilterKey, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push((FilterKey::Page, page.to_string()));
        }
        if let Some(field) = self.sort_field {
            pairs.push((FilterKey::SortField, field.as_str().to_string()));
        }
        if let Some(order) = self.sort_type {
            pairs.push((FilterKey::SortType, order.as_str().to_string()));
        }
        if let Some(lang) = self.sort_lang {
            pairs.push((FilterKey::SortLang, lang.as_str().to_string()));
        }
        if let Some(category) = self.category.as_deref().filter(|s| !s.is_empty()) {
            pairs.push((FilterKey::Category, category.to_string()));
        }
        if let Some(country) = self.country.as_deref().filter(|s| !s.is_empty()) {
            pairs.push((FilterKey::Country, country.to_string()));
        }
        if let Some(year) = self.year.filter(|y| *y > 0) {
            pairs.push((FilterKey::Year, year.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push((FilterKey::Limit, limit.to_string()));
        }
        pairs
    }

    /// Serialize all present fields.
    pub fn to_query(&self) -> String {
        self.to_query_without(None)
    }

    /// Serialize all present fields except `skip`.
    pub fn to_query_without(&self, skip: Option<FilterKey>) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.pairs() {
            if Some(key) != skip {
                serializer.append_pair(key.as_str(), &value);
            }
        }
        serializer.finish()
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

// ── Endpoint scopes ───────────────────────────────────────────────

/// Which list endpoint family a request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    Kind(ListKind),
    Category(String),
    Country(String),
    Year(u32),
}

impl ListScope {
    /// Path of the endpoint, without query string.
    pub fn path(&self) -> String {
        match self {
            Self::Kind(kind) => format!("/v1/api/danh-sach/{}", kind.as_slug()),
            Self::Category(slug) => format!("/v1/api/the-loai/{}", urlencoding::encode(slug)),
            Self::Country(slug) => format!("/v1/api/quoc-gia/{}", urlencoding::encode(slug)),
            Self::Year(year) => format!("/v1/api/nam/{year}"),
        }
    }

    /// The filter key already carried by the path.
    fn bound_key(&self) -> Option<FilterKey> {
        match self {
            Self::Kind(_) => None,
            Self::Category(_) => Some(FilterKey::Category),
            Self::Country(_) => Some(FilterKey::Country),
            Self::Year(_) => Some(FilterKey::Year),
        }
    }

    /// Path plus query string; `?` is only added when a field is present.
    pub fn request_path(&self, filters: &ListFilters) -> String {
        let query = filters.to_query_without(self.bound_key());
        let path = self.path();
        if query.is_empty() {
            path
        } else {
            format!("{path}?{query}")
        }
    }
}

/// Keyword search plus the list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub keyword: String,
    pub filters: ListFilters,
}

impl SearchFilters {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            filters: ListFilters::default(),
        }
    }

    pub fn with_filters(mut self, filters: ListFilters) -> Self {
        self.filters = filters;
        self
    }

    /// `keyword` first, then the list keys in their usual order.
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if !self.keyword.is_empty() {
            serializer.append_pair("keyword", &self.keyword);
        }
        for (key, value) in self.filters.pairs() {
            serializer.append_pair(key.as_str(), &value);
        }
        serializer.finish()
    }

    /// Path plus query string; `?` is only added when a field is present.
    pub fn request_path(&self) -> String {
        let query = self.to_query();
        if query.is_empty() {
            "/v1/api/tim-kiem".to_string()
        } else {
            format!("/v1/api/tim-kiem?{query}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters_serialize_to_nothing() {
        assert_eq!(ListFilters::new().to_query(), "");
        assert_eq!(
            ListScope::Kind(ListKind::Series).request_path(&ListFilters::new()),
            "/v1/api/danh-sach/phim-bo"
        );
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let filters = ListFilters::new().page(2).year(2024);
        let query = filters.to_query();
        assert_eq!(query, "page=2&year=2024");
        assert!(!query.contains("category"));
        assert!(!query.contains("sort_field"));
    }

    #[test]
    fn test_order_independent_of_assembly() {
        let a = ListFilters::new()
            .limit(10)
            .country("han-quoc")
            .sort_type(SortOrder::Desc)
            .page(3)
            .sort_field(SortField::ModifiedTime);
        let b = ListFilters::new()
            .sort_field(SortField::ModifiedTime)
            .page(3)
            .sort_type(SortOrder::Desc)
            .country("han-quoc")
            .limit(10);
        assert_eq!(a.to_query(), b.to_query());
        assert_eq!(
            a.to_query(),
            "page=3&sort_field=modified.time&sort_type=desc&country=han-quoc&limit=10"
        );
    }

    #[test]
    fn test_empty_strings_and_zero_counts_are_absent() {
        let filters = ListFilters {
            category: Some(String::new()),
            year: Some(0),
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(filters.to_query(), "");
        assert_eq!(ListFilters::new().category("").category, None);
    }

    #[test]
    fn test_scope_drops_path_bound_key() {
        let filters = ListFilters::new()
            .page(1)
            .category("hanh-dong")
            .country("trung-quoc")
            .year(2023);

        assert_eq!(
            ListScope::Category("hanh-dong".into()).request_path(&filters),
            "/v1/api/the-loai/hanh-dong?page=1&country=trung-quoc&year=2023"
        );
        assert_eq!(
            ListScope::Country("trung-quoc".into()).request_path(&filters),
            "/v1/api/quoc-gia/trung-quoc?page=1&category=hanh-dong&year=2023"
        );
        assert_eq!(
            ListScope::Year(2023).request_path(&filters),
            "/v1/api/nam/2023?page=1&category=hanh-dong&country=trung-quoc"
        );
        assert_eq!(
            ListScope::Kind(ListKind::Animation).request_path(&filters),
            "/v1/api/danh-sach/hoat-hinh?page=1&category=hanh-dong&country=trung-quoc&year=2023"
        );
    }

    #[test]
    fn test_search_query_puts_keyword_first() {
        let search = SearchFilters::new("one piece")
            .with_filters(ListFilters::new().limit(20).page(1).sort_lang(SortLang::Vietsub));
        assert_eq!(
            search.request_path(),
            "/v1/api/tim-kiem?keyword=one+piece&page=1&sort_lang=vietsub&limit=20"
        );
    }

    #[test]
    fn test_typed_values_parse() {
        assert_eq!("modified.time".parse::<SortField>().unwrap(), SortField::ModifiedTime);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert_eq!("thuyet-minh".parse::<SortLang>().unwrap(), SortLang::ThuyetMinh);
        assert_eq!("hoat-hinh".parse::<ListKind>().unwrap(), ListKind::Animation);
        assert!("sideways".parse::<SortOrder>().is_err());
        assert_eq!("tv".parse::<TmdbKind>().unwrap(), TmdbKind::Tv);
        assert_eq!(
            "anime".parse::<TmdbKind>().unwrap_err().to_string(),
            "unknown TMDB type value: anime"
        );
    }

    #[test]
    fn test_search_without_fields_has_no_query() {
        assert_eq!(SearchFilters::new("").request_path(), "/v1/api/tim-kiem");
        assert_eq!(
            SearchFilters::new("")
                .with_filters(ListFilters::new().page(2))
                .request_path(),
            "/v1/api/tim-kiem?page=2"
        );
    }
}
