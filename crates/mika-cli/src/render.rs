//! Plain-text renderers over store state. Every function returns the text to
//! print; nothing here touches the network or the store.

pub mod detail;
pub mod hero;
pub mod home;
pub mod movie_list;
pub mod pagination;

pub use detail::detail;
pub use hero::hero;
pub use home::home;
pub use movie_list::{movie_list, search_results};
pub use pagination::pagination;

use mika_core::models::Taxonomy;

/// Category/country listing: one `slug  name` row per tag.
pub fn taxonomies(title: &str, tags: &[Taxonomy]) -> String {
    if tags.is_empty() {
        return format!("{title}\n  (trống)\n");
    }
    let width = tags.iter().map(|t| t.slug.chars().count()).max().unwrap_or(0);
    let mut lines = vec![title.to_string()];
    lines.extend(
        tags.iter()
            .map(|t| format!("  {:<width$}  {}", t.slug, t.name)),
    );
    lines.join("\n") + "\n"
}

/// Format a UTC timestamp as a relative time string.
pub fn relative_time(dt: &chrono::DateTime<chrono::Utc>) -> String {
    let secs = (chrono::Utc::now() - *dt).num_seconds().max(0);

    if secs < 60 {
        "vừa xong".into()
    } else if secs < 3600 {
        format!("{} phút trước", secs / 60)
    } else if secs < 86400 {
        format!("{} giờ trước", secs / 3600)
    } else {
        format!("{} ngày trước", secs / 86400)
    }
}

/// Synopsis HTML as a single line of plain text.
pub fn strip_html(html: &str) -> String {
    nanohtml2text::html2text(html)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cut `s` to at most `max` characters, marking the cut with `…`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
