use std::ops::Range;

use mika_core::models::Movie;
use mika_runtime::CatalogueState;

use super::{hero, movie_list, pagination};

/// Home page sections carved out of the latest-updates list.
const SECTIONS: &[(&str, Range<usize>)] = &[
    ("Xu hướng", 1..11),
    ("Mới cập nhật", 11..21),
    ("Phổ biến", 21..31),
];

pub fn home(state: &CatalogueState) -> String {
    let latest = &state.latest.list;
    if latest.is_empty() {
        return "Chưa có phim mới.\n".to_string();
    }

    let mut blocks = Vec::new();
    if let Some(featured) = state.featured() {
        blocks.push(hero(featured));
    }
    for (title, range) in SECTIONS {
        let movies = section(&latest.items, range.clone());
        if !movies.is_empty() {
            blocks.push(movie_list(title, movies));
        }
    }
    blocks.push(movie_list("Tất cả phim mới", &latest.items));

    let mut out = blocks.join("\n");
    if let Some(pager) = pagination(&latest.pagination) {
        out.push_str(&pager);
        out.push('\n');
    }
    out
}

fn section(items: &[Movie], range: Range<usize>) -> &[Movie] {
    let start = range.start.min(items.len());
    let end = range.end.min(items.len());
    &items[start..end]
}
