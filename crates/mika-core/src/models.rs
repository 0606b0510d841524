pub mod movie;
pub mod pagination;

pub use movie::{Episode, EpisodeGroup, Movie, MovieDetail, MovieList, PlaybackSource, Taxonomy};
pub use pagination::Pagination;
