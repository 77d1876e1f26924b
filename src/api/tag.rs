use crate::api::{bounded_perpage, model};
use crate::client::{ensure_list, LastFm, PagedQuery};
use crate::iterator::PaginatedIterator;
use crate::nested;
use crate::params::Params;
use crate::types::{Album, Artist, TopTag, Track};
use crate::Result;
use http_types::Method;

/// `tag.*` endpoints.
pub struct TagApi {
    client: LastFm,
}

impl TagApi {
    pub(crate) fn new(client: LastFm) -> Self {
        Self { client }
    }

    /// Get the top albums tagged by this tag, ordered by tag count.
    ///
    /// <https://www.last.fm/api/show/tag.getTopAlbums>
    pub async fn get_top_albums(
        &self,
        tag: &str,
        limit: Option<u64>,
    ) -> Result<PaginatedIterator<Album>> {
        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("tag.getTopAlbums", "album")
                    .unwrap_key("albums")
                    .perpage(bounded_perpage(limit))
                    .limit(limit),
                Params::new().put("tag", tag),
            )
            .await?;
        Ok(resp.items.try_map(model))
    }

    /// Get the top artists tagged by this tag, ordered by tag count.
    ///
    /// <https://www.last.fm/api/show/tag.getTopArtists>
    pub async fn get_top_artists(
        &self,
        tag: &str,
        limit: Option<u64>,
    ) -> Result<PaginatedIterator<Artist>> {
        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("tag.getTopArtists", "artist")
                    .unwrap_key("topartists")
                    .perpage(bounded_perpage(limit))
                    .limit(limit),
                Params::new().put("tag", tag),
            )
            .await?;
        Ok(resp.items.try_map(model))
    }

    /// Get the top tracks tagged by this tag, ordered by tag count.
    ///
    /// <https://www.last.fm/api/show/tag.getTopTracks>
    pub async fn get_top_tracks(
        &self,
        tag: &str,
        limit: Option<u64>,
    ) -> Result<PaginatedIterator<Track>> {
        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("tag.getTopTracks", "track")
                    .unwrap_key("tracks")
                    .perpage(bounded_perpage(limit))
                    .limit(limit),
                Params::new().put("tag", tag),
            )
            .await?;
        Ok(resp.items.try_map(model))
    }

    /// Get the overall top tags on Last.fm. The service does not rank
    /// these itself, so the rank is synthesized from list position.
    ///
    /// <https://www.last.fm/api/show/tag.getTopTags>
    pub async fn get_top_tags(&self) -> Result<Vec<TopTag>> {
        let mut resp = self
            .client
            .request(Method::Get, "tag.getTopTags", Params::new(), Some("toptags"))
            .await?;

        ensure_list(nested::take(&mut resp, &["tag"])?)
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let mut tag: TopTag = model(item)?;
                tag.rank = Some(i as u64 + 1);
                Ok(tag)
            })
            .collect()
    }
}
