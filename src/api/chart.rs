use crate::api::{bounded_perpage, model};
use crate::client::{LastFm, PagedQuery};
use crate::iterator::PaginatedIterator;
use crate::params::Params;
use crate::types::{Artist, TopTag, Track};
use crate::Result;
use http_types::Method;

/// `chart.*` endpoints.
pub struct ChartApi {
    client: LastFm,
}

impl ChartApi {
    pub(crate) fn new(client: LastFm) -> Self {
        Self { client }
    }

    /// Get the top artists chart.
    ///
    /// <https://www.last.fm/api/show/chart.getTopArtists>
    pub async fn get_top_artists(&self, limit: Option<u64>) -> Result<PaginatedIterator<Artist>> {
        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("chart.getTopArtists", "artist")
                    .unwrap_key("artists")
                    .perpage(bounded_perpage(limit))
                    .limit(limit),
                Params::new(),
            )
            .await?;
        Ok(resp.items.try_map(model))
    }

    /// Get the top tags chart.
    ///
    /// <https://www.last.fm/api/show/chart.getTopTags>
    pub async fn get_top_tags(&self) -> Result<PaginatedIterator<TopTag>> {
        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("chart.getTopTags", "tag").unwrap_key("tags"),
                Params::new(),
            )
            .await?;
        Ok(resp.items.try_map(model))
    }

    /// Get the top tracks chart.
    ///
    /// <https://www.last.fm/api/show/chart.getTopTracks>
    pub async fn get_top_tracks(&self, limit: Option<u64>) -> Result<PaginatedIterator<Track>> {
        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("chart.getTopTracks", "track")
                    .unwrap_key("tracks")
                    .perpage(bounded_perpage(limit))
                    .limit(limit),
                Params::new(),
            )
            .await?;
        Ok(resp.items.try_map(model))
    }
}
