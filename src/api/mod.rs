//! Endpoint resources: thin typed glue over the client's request and
//! pagination machinery, one module per endpoint family.

pub mod album;
pub mod artist;
pub mod auth;
pub mod chart;
pub mod geo;
pub mod library;
pub mod tag;
pub mod track;
pub mod user;

pub use album::AlbumApi;
pub use artist::ArtistApi;
pub use auth::AuthApi;
pub use chart::ChartApi;
pub use geo::GeoApi;
pub use library::LibraryApi;
pub use tag::TagApi;
pub use track::TrackApi;
pub use user::UserApi;

use crate::{LastFmError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Build a model from one envelope item.
pub(crate) fn model<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| LastFmError::Parse(e.to_string()))
}

/// Page size for the bounded listings (searches, top charts): the service
/// caps these at 30 per page, and a smaller caller limit shrinks the page
/// to match.
pub(crate) fn bounded_perpage(limit: Option<u64>) -> Option<u32> {
    Some(match limit {
        Some(limit) if limit > 0 => limit.min(30) as u32,
        _ => 30,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_perpage() {
        assert_eq!(bounded_perpage(None), Some(30));
        assert_eq!(bounded_perpage(Some(0)), Some(30));
        assert_eq!(bounded_perpage(Some(10)), Some(10));
        assert_eq!(bounded_perpage(Some(500)), Some(30));
    }
}
