mod cli;
mod error;
mod render;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mika_api::{HttpTransport, Transport};
use mika_core::config::AppConfig;
use mika_core::filters::ListScope;
use mika_runtime::{ListSlice, Store};

use crate::cli::{Cli, Command, EpisodeArgs};
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.logging.filter, cli.verbose);

    match run(cli.command, &config).await {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig, CliError> {
    let config = match path {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    Ok(config)
}

/// Print the effective configuration, or write it as the user config.
fn show_config(config: &AppConfig, init: bool) -> Result<String, CliError> {
    let path = AppConfig::config_path();
    if init {
        if path.exists() {
            return Err(CliError::ConfigExists(path));
        }
        config.save()?;
        tracing::info!(path = %path.display(), "wrote config");
        return Ok(format!("wrote {}\n", path.display()));
    }
    Ok(format!("# {}\n{}", path.display(), config.to_toml()?))
}

/// `-v` wins over `RUST_LOG`, which wins over the config file.
fn init_tracing(config_filter: &str, verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_filter)),
        1 => EnvFilter::new("mika=debug"),
        _ => EnvFilter::new("mika=trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Command, config: &AppConfig) -> Result<String, CliError> {
    let mut api = config.api.clone();
    if let Command::Home {
        api_version: Some(version),
        ..
    } = &command
    {
        api.latest_version = *version;
    }
    let store = Store::new(HttpTransport::from_config(&api)?, &api);

    match command {
        Command::Home { page, .. } => {
            store.fetch_latest(page).await;
            let state = store.snapshot().await;
            check(&state.latest)?;
            Ok(render::home(&state))
        }
        Command::List { kind, filters } => {
            browse(&store, ListScope::Kind(kind), filters, kind.label()).await
        }
        Command::Category { slug, filters } => {
            let heading = format!("Thể loại: {slug}");
            browse(&store, ListScope::Category(slug), filters, &heading).await
        }
        Command::Country { slug, filters } => {
            let heading = format!("Quốc gia: {slug}");
            browse(&store, ListScope::Country(slug), filters, &heading).await
        }
        Command::Year {
            release_year,
            filters,
        } => {
            let heading = format!("Năm {release_year}");
            browse(&store, ListScope::Year(release_year), filters, &heading).await
        }
        Command::Search { keyword, filters } => {
            let heading = format!("Tìm kiếm: {keyword}");
            store.search(filters.into_search(keyword)).await;
            let state = store.snapshot().await;
            check(&state.search)?;
            Ok(render::search_results(&heading, &state.search.list))
        }
        Command::Detail { slug, pick } => {
            store.fetch_detail(&slug).await;
            show_detail(&store, pick).await
        }
        Command::Tmdb { kind, id, pick } => {
            store.fetch_tmdb(kind, id).await;
            show_detail(&store, pick).await
        }
        Command::Categories => {
            store.load_taxonomies().await;
            Ok(render::taxonomies("Thể loại", &store.snapshot().await.categories))
        }
        Command::Countries => {
            store.load_taxonomies().await;
            Ok(render::taxonomies("Quốc gia", &store.snapshot().await.countries))
        }
        Command::Image { url } => Ok(format!("{}\n", store.service().image_variant(&url))),
        Command::Config { init } => show_config(config, init),
    }
}

async fn browse<T: Transport>(
    store: &Store<T>,
    scope: ListScope,
    filters: cli::FilterArgs,
    heading: &str,
) -> Result<String, CliError> {
    store.fetch_browse(scope, filters.into_filters()).await;
    let state = store.snapshot().await;
    check(&state.browse)?;
    Ok(render::search_results(heading, &state.browse.list))
}

async fn show_detail<T: Transport>(store: &Store<T>, pick: EpisodeArgs) -> Result<String, CliError> {
    if let Some(error) = store.snapshot().await.detail.error {
        return Err(CliError::Request(error));
    }
    if let Some(server) = pick.server {
        if !store.select_server(&server).await {
            return Err(CliError::UnknownServer(server));
        }
    }
    if let Some(episode) = pick.episode {
        if !store.play_episode(&episode).await {
            return Err(CliError::UnknownEpisode(episode));
        }
    }

    match store.snapshot().await.detail.view {
        Some(view) => Ok(render::detail(&view)),
        None => Err(CliError::Request("detail not loaded".into())),
    }
}

fn check<R>(slice: &ListSlice<R>) -> Result<(), CliError> {
    match &slice.error {
        Some(error) => Err(CliError::Request(error.clone())),
        None => Ok(()),
    }
}
