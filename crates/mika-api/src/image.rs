//! Image URL helpers: resolving relative artwork paths and wrapping URLs in
//! the upstream image-conversion endpoint.

use mika_core::config::ApiConfig;

/// Resolves poster/thumbnail references against the image CDN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResolver {
    cdn: String,
}

impl ImageResolver {
    pub fn new(cdn: impl Into<String>) -> Self {
        Self {
            cdn: cdn.into().trim_end_matches('/').to_string(),
        }
    }

    /// A resolver using `cdn` instead, when an envelope names its own host.
    pub fn with_cdn(&self, cdn: Option<&str>) -> Self {
        match cdn.map(str::trim).filter(|c| !c.is_empty()) {
            Some(cdn) => Self::new(cdn),
            None => self.clone(),
        }
    }

    /// Absolute URLs pass through; relative paths are joined to the CDN;
    /// blank references become `None`.
    pub fn resolve(&self, reference: Option<String>) -> Option<String> {
        let reference = reference?;
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Some(reference.to_string());
        }
        if let Some(rest) = reference.strip_prefix("//") {
            return Some(format!("https://{rest}"));
        }
        Some(format!("{}/{}", self.cdn, reference.trim_start_matches('/')))
    }
}

/// The upstream image-conversion endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageProxy {
    endpoint: String,
}

impl ImageProxy {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.image_proxy.clone())
    }

    /// `{endpoint}?url={percent-encoded url}`.
    ///
    /// A URL that already points at this endpoint is returned unchanged, so
    /// applying the variant twice does not wrap twice.
    pub fn variant(&self, url: &str) -> String {
        if self.is_proxied(url) {
            return url.to_string();
        }
        format!("{}?url={}", self.endpoint, urlencoding::encode(url))
    }

    fn is_proxied(&self, url: &str) -> bool {
        url.strip_prefix(self.endpoint.as_str())
            .is_some_and(|rest| rest.starts_with("?url="))
    }
}
