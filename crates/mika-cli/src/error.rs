use std::path::PathBuf;

use thiserror::Error;

use mika_api::ApiError;
use mika_core::error::CoreError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// A fetch failed; the message is the one recorded in the store.
    #[error("{0}")]
    Request(String),

    #[error("no server named {0:?}")]
    UnknownServer(String),

    #[error("no episode {0:?} on the selected server")]
    UnknownEpisode(String),

    #[error("config file already exists: {}", .0.display())]
    ConfigExists(PathBuf),
}
