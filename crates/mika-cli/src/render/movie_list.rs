use mika_core::models::{Movie, MovieList};

use super::{pagination, relative_time, truncate};

const NAME_WIDTH: usize = 48;

/// A titled, numbered list of movie rows. Empty input renders nothing.
pub fn movie_list(title: &str, movies: &[Movie]) -> String {
    if movies.is_empty() {
        return String::new();
    }
    let mut lines = vec![format!("── {title} ──")];
    lines.extend(
        movies
            .iter()
            .enumerate()
            .map(|(i, movie)| format!("{:>3}. {}", i + 1, row(movie))),
    );
    lines.join("\n") + "\n"
}

/// A full result page: list, empty-state message and pager.
pub fn search_results(heading: &str, list: &MovieList) -> String {
    let title = list.title.as_deref().unwrap_or(heading);
    let mut out = if list.is_empty() {
        format!("── {title} ──\nKhông tìm thấy phim nào.\n")
    } else {
        movie_list(title, &list.items)
    };
    if let Some(pager) = pagination(&list.pagination) {
        out.push_str(&pager);
        out.push('\n');
    }
    out
}

fn row(movie: &Movie) -> String {
    let mut parts = vec![truncate(&movie.name, NAME_WIDTH)];
    if let Some(origin) = movie.distinct_origin_name() {
        parts[0] = format!("{} ({})", parts[0], truncate(origin, NAME_WIDTH));
    }
    if let Some(year) = movie.year {
        parts.push(year.to_string());
    }
    if let Some(episodes) = movie.episode_label() {
        parts.push(episodes);
    }
    if let Some(updated) = &movie.updated_at {
        parts.push(relative_time(updated));
    }
    parts.push(format!("[{}]", movie.slug));
    parts.join(" · ")
}

#[cfg(test)]
mod tests {
    use mika_core::models::Pagination;

    use super::*;

    fn movie(slug: &str, name: &str, year: Option<u32>) -> Movie {
        Movie {
            slug: slug.into(),
            name: name.into(),
            origin_name: None,
            poster_url: None,
            thumb_url: None,
            year,
            episode_current: Some("Full".into()),
            episode_total: None,
            categories: vec![],
            countries: vec![],
            kind: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_rows_are_numbered() {
        let out = movie_list(
            "Phim lẻ",
            &[movie("a", "Alpha", Some(2024)), movie("b", "Beta", None)],
        );
        assert_eq!(
            out,
            "── Phim lẻ ──\n  1. Alpha · 2024 · Full · [a]\n  2. Beta · Full · [b]\n"
        );
    }

    #[test]
    fn test_empty_list_renders_nothing() {
        assert_eq!(movie_list("Xu hướng", &[]), "");
    }

    #[test]
    fn test_empty_results_message() {
        let out = search_results("Tìm kiếm: zzz", &MovieList::empty(1));
        assert_eq!(out, "── Tìm kiếm: zzz ──\nKhông tìm thấy phim nào.\n");
    }

    #[test]
    fn test_results_prefer_upstream_title_and_show_pager() {
        let list = MovieList {
            items: vec![movie("a", "Alpha", None)],
            pagination: Pagination {
                total_items: 30,
                items_per_page: 10,
                current_page: 1,
                total_pages: 3,
            },
            title: Some("Phim Hàn Quốc".into()),
            succeeded: true,
        };
        let out = search_results("Quốc gia: han-quoc", &list);
        assert!(out.starts_with("── Phim Hàn Quốc ──\n"));
        assert!(out.ends_with("Trang 1 / 3 | Sau (--page 2) »\n"));
    }
}
