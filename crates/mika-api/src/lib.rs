//! Client for the upstream movie catalogue API.
//!
//! [`MovieService`] is the single entry point: it builds request paths,
//! sends them through a [`Transport`], and normalizes every upstream
//! envelope shape into the models of `mika_core`.

pub mod envelope;
pub mod error;
pub mod image;
pub mod service;
pub mod transport;
pub mod types;

pub use error::ApiError;
pub use image::{ImageProxy, ImageResolver};
pub use mika_core::filters::TmdbKind;
pub use service::MovieService;
pub use transport::{HttpTransport, Transport};
