use crate::api::{bounded_perpage, model};
use crate::client::{ensure_list, LastFm, PagedQuery};
use crate::iterator::PaginatedIterator;
use crate::nested;
use crate::pagination::PaginationStyle;
use crate::params::Params;
use crate::types::{Album, Tag, TopTag};
use crate::Result;
use http_types::Method;

/// Identifies an album for the lookup endpoints: either by artist/album
/// name or by MusicBrainz id.
#[derive(Debug, Clone, Copy)]
pub enum AlbumSelector<'a> {
    ByName { artist: &'a str, album: &'a str },
    ByMbid(&'a str),
}

impl<'a> AlbumSelector<'a> {
    pub fn name(artist: &'a str, album: &'a str) -> Self {
        AlbumSelector::ByName { artist, album }
    }

    pub fn mbid(mbid: &'a str) -> Self {
        AlbumSelector::ByMbid(mbid)
    }

    fn apply(self, params: Params) -> Params {
        match self {
            AlbumSelector::ByName { artist, album } => {
                params.put("artist", artist).put("album", album)
            }
            AlbumSelector::ByMbid(mbid) => params.put("mbid", mbid),
        }
    }
}

/// `album.*` endpoints.
pub struct AlbumApi {
    client: LastFm,
}

impl AlbumApi {
    pub(crate) fn new(client: LastFm) -> Self {
        Self { client }
    }

    /// Search for an album by name. Returns matches sorted by relevance.
    ///
    /// <https://www.last.fm/api/show/album.search>
    pub async fn search(&self, album: &str, limit: Option<u64>) -> Result<PaginatedIterator<Album>> {
        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("album.search", "albummatches.album")
                    .unwrap_key("results")
                    .style(PaginationStyle::Search)
                    .perpage(bounded_perpage(limit))
                    .limit(limit),
                Params::new().put("album", album),
            )
            .await?;
        Ok(resp.items.try_map(model))
    }

    /// Get the metadata and tracklist for an album.
    ///
    /// <https://www.last.fm/api/show/album.getInfo>
    pub async fn get_info(
        &self,
        selector: AlbumSelector<'_>,
        username: Option<&str>,
        autocorrect: bool,
        language: Option<&str>,
    ) -> Result<Album> {
        let params = selector.apply(
            Params::new()
                .put("autocorrect", i32::from(autocorrect))
                .opt("user", username.or_else(|| self.client.username()))
                .opt("lang", language),
        );
        let resp = self
            .client
            .request(Method::Get, "album.getInfo", params, Some("album"))
            .await?;
        model(resp)
    }

    /// Get the tags applied by an individual user to an album.
    ///
    /// <https://www.last.fm/api/show/album.getTags>
    pub async fn get_tags(
        &self,
        selector: AlbumSelector<'_>,
        username: Option<&str>,
        autocorrect: bool,
    ) -> Result<Vec<Tag>> {
        let params = selector.apply(
            Params::new()
                .put("autocorrect", i32::from(autocorrect))
                .opt("user", username.or_else(|| self.client.username())),
        );
        let mut resp = self
            .client
            .request(Method::Get, "album.getTags", params, Some("tags"))
            .await?;
        // An untagged album has no "tag" key at all
        match nested::take(&mut resp, &["tag"]) {
            Ok(value) => ensure_list(value).into_iter().map(model).collect(),
            Err(_) => Ok(Vec::new()),
        }
    }

    /// Get the top tags for an album, ordered by popularity.
    ///
    /// <https://www.last.fm/api/show/album.getTopTags>
    pub async fn get_top_tags(
        &self,
        selector: AlbumSelector<'_>,
        autocorrect: bool,
    ) -> Result<Vec<TopTag>> {
        let params = selector.apply(Params::new().put("autocorrect", i32::from(autocorrect)));
        let mut resp = self
            .client
            .request(Method::Get, "album.getTopTags", params, Some("toptags"))
            .await?;
        ensure_list(nested::take(&mut resp, &["tag"])?)
            .into_iter()
            .map(model)
            .collect()
    }

    /// Tag an album with user-supplied tags.
    ///
    /// <https://www.last.fm/api/show/album.addTags>
    pub async fn add_tags(&self, artist: &str, album: &str, tags: &[&str]) -> Result<()> {
        self.client
            .request(
                Method::Post,
                "album.addTags",
                Params::new()
                    .put("artist", artist)
                    .put("album", album)
                    .put("tags", tags.join(",")),
                None,
            )
            .await?;
        Ok(())
    }

    /// Remove the authenticated user's tag from an album.
    ///
    /// <https://www.last.fm/api/show/album.removeTag>
    pub async fn remove_tag(&self, artist: &str, album: &str, tag: &str) -> Result<()> {
        self.client
            .request(
                Method::Post,
                "album.removeTag",
                Params::new()
                    .put("artist", artist)
                    .put("album", album)
                    .put("tag", tag),
                None,
            )
            .await?;
        Ok(())
    }
}
