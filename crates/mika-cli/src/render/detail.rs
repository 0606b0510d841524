use mika_core::models::PlaybackSource;
use mika_core::selection::{DetailView, PlayerView, SelectionState};

use super::strip_html;

/// Detail page: metadata, server picker, episode picker and player panel.
pub fn detail(view: &DetailView) -> String {
    let detail = view.detail();
    let movie = &detail.movie;

    let mut lines = vec![movie.name.clone()];
    if let Some(origin) = movie.distinct_origin_name() {
        lines.push(origin.to_string());
    }
    if let Some(url) = movie.card_url() {
        lines.push(format!("Ảnh: {url}"));
    }
    lines.push(String::new());

    let facts = [
        ("Năm", movie.year.map(|y| y.to_string())),
        ("Thời lượng", detail.time.clone()),
        ("Chất lượng", detail.quality.clone()),
        ("Ngôn ngữ", detail.lang.clone()),
        ("Tập hiện tại", movie.episode_current.clone()),
    ];
    for (label, value) in facts {
        if let Some(value) = value {
            lines.push(format!("{label}: {value}"));
        }
    }
    if !movie.categories.is_empty() {
        let names: Vec<&str> = movie.categories.iter().map(|c| c.name.as_str()).collect();
        lines.push(format!("Thể loại: {}", names.join(", ")));
    }
    if !movie.countries.is_empty() {
        let names: Vec<&str> = movie.countries.iter().map(|c| c.name.as_str()).collect();
        lines.push(format!("Quốc gia: {}", names.join(", ")));
    }
    if !detail.directors.is_empty() {
        lines.push(format!("Đạo diễn: {}", detail.directors.join(", ")));
    }
    if !detail.actors.is_empty() {
        lines.push(format!("Diễn viên: {}", detail.actors.join(", ")));
    }
    if let Some(content) = detail.content.as_deref().map(strip_html) {
        if !content.is_empty() {
            lines.push(String::new());
            lines.push(content);
        }
    }

    lines.push(String::new());
    lines.extend(pickers(view));
    lines.push(String::new());
    lines.push(player(view));

    lines.join("\n") + "\n"
}

fn pickers(view: &DetailView) -> Vec<String> {
    let detail = view.detail();
    let selection = view.selection();
    let mut lines = Vec::new();

    if detail.servers.is_empty() {
        return lines;
    }

    lines.push("Server:".to_string());
    for group in &detail.servers {
        let marker = marker(selection.server.as_deref() == Some(group.server_name.as_str()));
        lines.push(format!(
            " {marker} {} ({} tập)",
            group.server_name,
            group.episodes.len()
        ));
    }

    if let Some(group) = view.selected_server() {
        if !group.episodes.is_empty() {
            lines.push("Tập:".to_string());
            let episodes: Vec<String> = group
                .episodes
                .iter()
                .map(|ep| {
                    let marker = marker(selection.episode.as_deref() == Some(ep.slug.as_str()));
                    format!("{marker}{}", ep.name)
                })
                .collect();
            for chunk in episodes.chunks(10) {
                lines.push(format!("  {}", chunk.join("  ")));
            }
        }
    }
    lines
}

fn player(view: &DetailView) -> String {
    if view.state() == SelectionState::NoSelection || !view.detail().has_playable_episode() {
        return "Không có link phát".to_string();
    }
    match view.player() {
        PlayerView::Hidden => match view.selected_episode() {
            Some(ep) => format!("Chọn tập để phát: --episode {}", ep.slug),
            None => "Không có link phát".to_string(),
        },
        PlayerView::Visible(PlaybackSource::Manifest(url)) => format!("▶ m3u8: {url}"),
        PlayerView::Visible(PlaybackSource::Embed(url)) => format!("▶ embed: {url}"),
        PlayerView::Visible(PlaybackSource::Unavailable) => "Không có link phát".to_string(),
    }
}

fn marker(selected: bool) -> &'static str {
    if selected {
        "●"
    } else {
        "○"
    }
}

#[cfg(test)]
mod tests {
    use mika_core::models::{Episode, EpisodeGroup, Movie, MovieDetail};

    use super::*;

    fn episode(slug: &str, m3u8: Option<&str>, embed: Option<&str>) -> Episode {
        Episode {
            name: slug.trim_start_matches("tap-").to_string(),
            slug: slug.into(),
            filename: None,
            link_m3u8: m3u8.map(Into::into),
            link_embed: embed.map(Into::into),
        }
    }

    fn sample(servers: Vec<EpisodeGroup>) -> MovieDetail {
        MovieDetail {
            movie: Movie {
                slug: "a".into(),
                name: "Alpha".into(),
                origin_name: None,
                poster_url: None,
                thumb_url: None,
                year: Some(2024),
                episode_current: Some("Tập 2".into()),
                episode_total: None,
                categories: vec![],
                countries: vec![],
                kind: None,
                updated_at: None,
            },
            content: Some("<p>Nội dung</p>".into()),
            time: Some("45 phút/tập".into()),
            quality: Some("HD".into()),
            lang: None,
            actors: vec![],
            directors: vec![],
            servers,
        }
    }

    fn two_servers() -> MovieDetail {
        sample(vec![
            EpisodeGroup {
                server_name: "Vietsub".into(),
                episodes: vec![
                    episode("tap-01", Some("https://s/1.m3u8"), None),
                    episode("tap-02", None, Some("https://e/2")),
                ],
            },
            EpisodeGroup {
                server_name: "Dub".into(),
                episodes: vec![episode("tap-01", None, None)],
            },
        ])
    }

    #[test]
    fn test_detail_page_layout() {
        let view = DetailView::new(two_servers());
        assert_eq!(
            detail(&view),
            "Alpha\n\
             \n\
             Năm: 2024\n\
             Thời lượng: 45 phút/tập\n\
             Chất lượng: HD\n\
             Tập hiện tại: Tập 2\n\
             \n\
             Nội dung\n\
             \n\
             Server:\n\
             \x20● Vietsub (2 tập)\n\
             \x20○ Dub (1 tập)\n\
             Tập:\n\
             \x20 ●01  ○02\n\
             \n\
             Chọn tập để phát: --episode tap-01\n"
        );
    }

    #[test]
    fn test_player_prefers_manifest_then_embed() {
        let mut view = DetailView::new(two_servers());
        view.play_episode("tap-01");
        assert_eq!(player(&view), "▶ m3u8: https://s/1.m3u8");
        view.play_episode("tap-02");
        assert_eq!(player(&view), "▶ embed: https://e/2");
    }

    #[test]
    fn test_no_link_affordance() {
        let view = DetailView::new(sample(vec![]));
        assert!(detail(&view).ends_with("\nKhông có link phát\n"));

        let view = DetailView::new(sample(vec![EpisodeGroup {
            server_name: "Trailer".into(),
            episodes: vec![episode("tap-01", None, None)],
        }]));
        assert_eq!(player(&view), "Không có link phát");

        let mut view = DetailView::new(two_servers());
        view.play_episode("tap-01");
        view.select_server("Dub");
        assert_eq!(player(&view), "Không có link phát");
    }
}
