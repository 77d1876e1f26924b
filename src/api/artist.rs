use crate::api::{bounded_perpage, model};
use crate::client::{ensure_list, LastFm, PagedQuery};
use crate::iterator::PaginatedIterator;
use crate::nested;
use crate::pagination::PaginationStyle;
use crate::params::Params;
use crate::types::{Album, Artist, Tag, Track};
use crate::Result;
use http_types::Method;

/// Identifies an artist for the lookup endpoints: either by name or by
/// MusicBrainz id.
#[derive(Debug, Clone, Copy)]
pub enum ArtistSelector<'a> {
    ByName(&'a str),
    ByMbid(&'a str),
}

impl<'a> ArtistSelector<'a> {
    pub fn name(artist: &'a str) -> Self {
        ArtistSelector::ByName(artist)
    }

    pub fn mbid(mbid: &'a str) -> Self {
        ArtistSelector::ByMbid(mbid)
    }

    fn apply(self, params: Params) -> Params {
        match self {
            ArtistSelector::ByName(artist) => params.put("artist", artist),
            ArtistSelector::ByMbid(mbid) => params.put("mbid", mbid),
        }
    }
}

/// `artist.*` endpoints.
pub struct ArtistApi {
    client: LastFm,
}

impl ArtistApi {
    pub(crate) fn new(client: LastFm) -> Self {
        Self { client }
    }

    /// Search for an artist by name. Returns matches sorted by relevance.
    ///
    /// <https://www.last.fm/api/show/artist.search>
    pub async fn search(
        &self,
        artist: &str,
        limit: Option<u64>,
    ) -> Result<PaginatedIterator<Artist>> {
        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("artist.search", "artistmatches.artist")
                    .unwrap_key("results")
                    .style(PaginationStyle::Search)
                    .perpage(bounded_perpage(limit))
                    .limit(limit),
                Params::new().put("artist", artist),
            )
            .await?;
        Ok(resp.items.try_map(model))
    }

    /// Get the metadata for an artist, including a truncated biography.
    ///
    /// <https://www.last.fm/api/show/artist.getInfo>
    pub async fn get_info(
        &self,
        selector: ArtistSelector<'_>,
        username: Option<&str>,
        autocorrect: bool,
        language: Option<&str>,
    ) -> Result<Artist> {
        let params = selector.apply(
            Params::new()
                .put("autocorrect", i32::from(autocorrect))
                .opt("username", username.or_else(|| self.client.username()))
                .opt("lang", language),
        );
        let resp = self
            .client
            .request(Method::Get, "artist.getInfo", params, Some("artist"))
            .await?;
        model(resp)
    }

    /// Check whether the supplied artist has a correction to a canonical
    /// artist.
    ///
    /// The service occasionally returns a bare whitespace string instead of
    /// a corrections object; that case yields an empty list.
    ///
    /// <https://www.last.fm/api/show/artist.getCorrection>
    pub async fn get_correction(&self, artist: &str) -> Result<Vec<Artist>> {
        let mut resp = self
            .client
            .request(
                Method::Get,
                "artist.getCorrection",
                Params::new().put("artist", artist),
                Some("corrections"),
            )
            .await?;

        if resp.is_string() {
            return Ok(Vec::new());
        }

        ensure_list(nested::take(&mut resp, &["correction"])?)
            .into_iter()
            .map(|correction| model(nested::get(&correction, &["artist"])?.clone()))
            .collect()
    }

    /// Get all the artists similar to this artist.
    ///
    /// <https://www.last.fm/api/show/artist.getSimilar>
    pub async fn get_similar(
        &self,
        selector: ArtistSelector<'_>,
        autocorrect: bool,
    ) -> Result<Vec<Artist>> {
        let params = selector.apply(Params::new().put("autocorrect", i32::from(autocorrect)));
        let mut resp = self
            .client
            .request(
                Method::Get,
                "artist.getSimilar",
                params,
                Some("similarartists"),
            )
            .await?;
        ensure_list(nested::take(&mut resp, &["artist"])?)
            .into_iter()
            .map(model)
            .collect()
    }

    /// Get the tags applied by an individual user to an artist.
    ///
    /// <https://www.last.fm/api/show/artist.getTags>
    pub async fn get_tags(
        &self,
        selector: ArtistSelector<'_>,
        username: Option<&str>,
        autocorrect: bool,
    ) -> Result<Vec<Tag>> {
        let params = selector.apply(
            Params::new()
                .put("autocorrect", i32::from(autocorrect))
                .opt("username", username.or_else(|| self.client.username())),
        );
        let mut resp = self
            .client
            .request(Method::Get, "artist.getTags", params, Some("tags"))
            .await?;
        match nested::take(&mut resp, &["tag"]) {
            Ok(value) => ensure_list(value).into_iter().map(model).collect(),
            Err(_) => Ok(Vec::new()),
        }
    }

    /// Get the top albums for an artist, ordered by popularity.
    ///
    /// <https://www.last.fm/api/show/artist.getTopAlbums>
    pub async fn get_top_albums(
        &self,
        selector: ArtistSelector<'_>,
        autocorrect: bool,
        limit: Option<u64>,
    ) -> Result<PaginatedIterator<Album>> {
        let params = selector.apply(Params::new().put("autocorrect", i32::from(autocorrect)));
        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("artist.getTopAlbums", "album")
                    .unwrap_key("topalbums")
                    .perpage(bounded_perpage(limit))
                    .limit(limit),
                params,
            )
            .await?;
        Ok(resp.items.try_map(model))
    }

    /// Get the top tracks by an artist, ordered by popularity.
    ///
    /// <https://www.last.fm/api/show/artist.getTopTracks>
    pub async fn get_top_tracks(
        &self,
        selector: ArtistSelector<'_>,
        autocorrect: bool,
        limit: Option<u64>,
    ) -> Result<PaginatedIterator<Track>> {
        let params = selector.apply(Params::new().put("autocorrect", i32::from(autocorrect)));
        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("artist.getTopTracks", "track")
                    .unwrap_key("toptracks")
                    .perpage(bounded_perpage(limit))
                    .limit(limit),
                params,
            )
            .await?;
        Ok(resp.items.try_map(model))
    }

    /// Get the top tags for an artist, ordered by popularity.
    ///
    /// <https://www.last.fm/api/show/artist.getTopTags>
    pub async fn get_top_tags(
        &self,
        selector: ArtistSelector<'_>,
        autocorrect: bool,
    ) -> Result<Vec<Tag>> {
        let params = selector.apply(Params::new().put("autocorrect", i32::from(autocorrect)));
        let mut resp = self
            .client
            .request(Method::Get, "artist.getTopTags", params, Some("toptags"))
            .await?;
        ensure_list(nested::take(&mut resp, &["tag"])?)
            .into_iter()
            .map(model)
            .collect()
    }

    /// Tag an artist with user-supplied tags.
    ///
    /// <https://www.last.fm/api/show/artist.addTags>
    pub async fn add_tags(&self, artist: &str, tags: &[&str]) -> Result<()> {
        self.client
            .request(
                Method::Post,
                "artist.addTags",
                Params::new()
                    .put("artist", artist)
                    .put("tags", tags.join(",")),
                None,
            )
            .await?;
        Ok(())
    }

    /// Remove the authenticated user's tag from an artist.
    ///
    /// <https://www.last.fm/api/show/artist.removeTag>
    pub async fn remove_tag(&self, artist: &str, tag: &str) -> Result<()> {
        self.client
            .request(
                Method::Post,
                "artist.removeTag",
                Params::new().put("artist", artist).put("tag", tag),
                None,
            )
            .await?;
        Ok(())
    }
}
