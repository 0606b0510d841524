use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use mika_api::TmdbKind;
use mika_core::config::ApiVersion;
use mika_core::filters::{ListFilters, ListKind, SearchFilters, SortField, SortLang, SortOrder};

#[derive(Debug, Parser)]
#[command(name = "mika", version, about = "Browse the phimapi movie catalogue")]
pub struct Cli {
    /// Read configuration from this file instead of the user config.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace). Overrides RUST_LOG.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Featured movie and the latest updates.
    Home {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Endpoint family for the latest list (v1, v2, v3).
        #[arg(long = "api-version")]
        api_version: Option<ApiVersion>,
    },
    /// A catalogue section (phim-bo, phim-le, tv-shows, hoat-hinh, ...).
    List {
        kind: ListKind,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Movies in a category.
    Category {
        slug: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Movies from a country.
    Country {
        slug: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Movies released in a year.
    Year {
        #[arg(value_name = "YEAR")]
        release_year: u32,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Keyword search.
    Search {
        keyword: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// A movie with its servers and episodes.
    Detail {
        slug: String,
        #[command(flatten)]
        pick: EpisodeArgs,
    },
    /// A movie looked up by TMDB id.
    Tmdb {
        kind: TmdbKind,
        id: u64,
        #[command(flatten)]
        pick: EpisodeArgs,
    },
    /// All categories.
    Categories,
    /// All countries.
    Countries,
    /// Print the converted-image URL for an image.
    Image { url: String },
    /// Show the effective configuration.
    Config {
        /// Write it to the user config file (fails if one exists).
        #[arg(long)]
        init: bool,
    },
}

#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    #[arg(long)]
    pub page: Option<u32>,
    /// modified.time, _id or year.
    #[arg(long)]
    pub sort_field: Option<SortField>,
    /// asc or desc.
    #[arg(long)]
    pub sort_type: Option<SortOrder>,
    /// vietsub, thuyet-minh or long-tieng.
    #[arg(long)]
    pub sort_lang: Option<SortLang>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub year: Option<u32>,
    #[arg(long)]
    pub limit: Option<u32>,
}

impl FilterArgs {
    pub fn into_filters(self) -> ListFilters {
        ListFilters {
            page: self.page,
            sort_field: self.sort_field,
            sort_type: self.sort_type,
            sort_lang: self.sort_lang,
            category: self.category.filter(|s| !s.is_empty()),
            country: self.country.filter(|s| !s.is_empty()),
            year: self.year,
            limit: self.limit,
        }
    }

    pub fn into_search(self, keyword: String) -> SearchFilters {
        SearchFilters::new(keyword).with_filters(self.into_filters())
    }
}

/// Server/episode to pick on the detail page.
#[derive(Debug, Default, Args)]
pub struct EpisodeArgs {
    /// Switch to this server.
    #[arg(long)]
    pub server: Option<String>,
    /// Play this episode (slug) of the selected server.
    #[arg(long)]
    pub episode: Option<String>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_with_filters() {
        let cli = Cli::try_parse_from([
            "mika",
            "list",
            "hoat-hinh",
            "--page",
            "2",
            "--sort-type",
            "asc",
            "--sort-lang",
            "thuyet-minh",
        ])
        .unwrap();

        let Command::List { kind, filters } = cli.command else {
            panic!("expected list");
        };
        assert_eq!(kind, ListKind::Animation);
        let filters = filters.into_filters();
        assert_eq!(filters.to_query(), "page=2&sort_type=asc&sort_lang=thuyet-minh");
    }

    #[test]
    fn test_parse_year_keeps_positional_and_filters_apart() {
        let cli = Cli::try_parse_from(["mika", "year", "2024", "--country", "han-quoc"]).unwrap();
        let Command::Year {
            release_year,
            filters,
        } = cli.command
        else {
            panic!("expected year");
        };
        assert_eq!(release_year, 2024);
        assert_eq!(filters.country.as_deref(), Some("han-quoc"));
    }

    #[test]
    fn test_rejects_unknown_values() {
        assert!(Cli::try_parse_from(["mika", "list", "phim-xyz"]).is_err());
        assert!(Cli::try_parse_from(["mika", "tmdb", "anime", "1"]).is_err());
        assert!(Cli::try_parse_from(["mika", "home", "--api-version", "v9"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["mika", "detail", "a", "-vv", "--config", "/tmp/m.toml"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/m.toml")));
    }
}
