pub mod config;
pub mod error;
pub mod filters;
pub mod models;
pub mod selection;
