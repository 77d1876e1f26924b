use crate::api::{bounded_perpage, model};
use crate::client::{LastFm, PagedQuery};
use crate::iterator::PaginatedIterator;
use crate::params::Params;
use crate::types::{Artist, Track};
use crate::Result;
use http_types::Method;

/// `geo.*` endpoints. Countries are ISO 3166-1 names, as the service
/// expects (e.g. `"Spain"`).
pub struct GeoApi {
    client: LastFm,
}

impl GeoApi {
    pub(crate) fn new(client: LastFm) -> Self {
        Self { client }
    }

    /// Get the most popular artists on Last.fm by country.
    ///
    /// <https://www.last.fm/api/show/geo.getTopArtists>
    pub async fn get_top_artists(
        &self,
        country: &str,
        limit: Option<u64>,
    ) -> Result<PaginatedIterator<Artist>> {
        let resp = self
            .client
            .paginate_request(
                Method::Post,
                PagedQuery::new("geo.getTopArtists", "artist")
                    .unwrap_key("topartists")
                    .perpage(bounded_perpage(limit))
                    .limit(limit),
                Params::new().put("country", country),
            )
            .await?;
        Ok(resp.items.try_map(model))
    }

    /// Get the most popular tracks on Last.fm by country.
    ///
    /// <https://www.last.fm/api/show/geo.getTopTracks>
    pub async fn get_top_tracks(
        &self,
        country: &str,
        limit: Option<u64>,
    ) -> Result<PaginatedIterator<Track>> {
        let resp = self
            .client
            .paginate_request(
                Method::Post,
                PagedQuery::new("geo.getTopTracks", "track")
                    .unwrap_key("tracks")
                    .perpage(bounded_perpage(limit))
                    .limit(limit),
                Params::new().put("country", country),
            )
            .await?;
        Ok(resp.items.try_map(model))
    }
}
