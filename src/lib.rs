pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod iterator;
pub mod nested;
pub mod pagination;
pub mod params;
pub mod session;
pub mod session_persistence;
pub mod signer;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::album::AlbumSelector;
pub use api::artist::ArtistSelector;
pub use api::track::{NowPlaying, TrackSelector};
pub use api::user::Period;
pub use auth::AuthMethod;
pub use client::{LastFm, PagedQuery, PagedResponse, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use config::ClientConfig;
pub use error::LastFmError;
pub use iterator::{AsyncPaginatedIterator, PageFetcher, PaginatedIterator};
pub use pagination::{PageAttributes, PaginationStyle};
pub use params::Params;
pub use session::{ApiInfo, DEFAULT_URL};
pub use session_persistence::SessionPersistence;
pub use signer::Signer;
pub use types::{
    Album, AlbumRef, Artist, ArtistRef, Image, Scrobble, ScrobbleDate, Tag, TopTag, Track, User,
};

#[cfg(feature = "mock")]
pub use iterator::MockAsyncPaginatedIterator;

pub type Result<T> = std::result::Result<T, LastFmError>;
