use mika_core::models::Movie;

/// Featured movie banner: title, tags, artwork and the command to open it.
pub fn hero(movie: &Movie) -> String {
    let mut lines = vec![format!("★ {}", movie.name)];
    if let Some(origin) = movie.distinct_origin_name() {
        lines.push(format!("  {origin}"));
    }

    let mut tags: Vec<String> = movie
        .categories
        .iter()
        .take(3)
        .map(|c| c.name.clone())
        .collect();
    if let Some(year) = movie.year {
        tags.push(year.to_string());
    }
    if let Some(episodes) = movie.episode_label() {
        tags.push(format!("Tập {episodes}"));
    }
    if !tags.is_empty() {
        lines.push(format!("  {}", tags.join(" · ")));
    }

    if let Some(url) = movie.banner_url() {
        lines.push(format!("  Ảnh: {url}"));
    }
    lines.push(format!("  ▶ Phát ngay: mika detail {}", movie.slug));
    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use mika_core::models::Taxonomy;

    use super::*;

    fn tag(name: &str) -> Taxonomy {
        Taxonomy {
            id: None,
            name: name.into(),
            slug: name.to_lowercase(),
        }
    }

    #[test]
    fn test_hero_shows_three_categories_and_episode_label() {
        let movie = Movie {
            slug: "ngoi-truong-xac-song".into(),
            name: "Ngôi Trường Xác Sống".into(),
            origin_name: Some("All of Us Are Dead".into()),
            poster_url: Some("https://img/p.jpg".into()),
            thumb_url: Some("https://img/t.jpg".into()),
            year: Some(2022),
            episode_current: Some("12".into()),
            episode_total: Some("12".into()),
            categories: vec![tag("Kinh Dị"), tag("Hành Động"), tag("Học Đường"), tag("Tâm Lý")],
            countries: vec![],
            kind: None,
            updated_at: None,
        };

        assert_eq!(
            hero(&movie),
            "★ Ngôi Trường Xác Sống\n\
             \x20 All of Us Are Dead\n\
             \x20 Kinh Dị · Hành Động · Học Đường · 2022 · Tập 12 / 12\n\
             \x20 Ảnh: https://img/t.jpg\n\
             \x20 ▶ Phát ngay: mika detail ngoi-truong-xac-song\n"
        );
    }

    #[test]
    fn test_hero_hides_identical_origin_name() {
        let movie = Movie {
            slug: "a".into(),
            name: "Parasite".into(),
            origin_name: Some("Parasite".into()),
            poster_url: None,
            thumb_url: None,
            year: None,
            episode_current: None,
            episode_total: None,
            categories: vec![],
            countries: vec![],
            kind: None,
            updated_at: None,
        };
        assert_eq!(hero(&movie), "★ Parasite\n  ▶ Phát ngay: mika detail a\n");
    }
}
