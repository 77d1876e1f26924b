use crate::api::{bounded_perpage, model};
use crate::client::{ensure_list, LastFm, PagedQuery};
use crate::iterator::PaginatedIterator;
use crate::nested;
use crate::pagination::PaginationStyle;
use crate::params::Params;
use crate::types::{Scrobble, Tag, TopTag, Track};
use crate::Result;
use http_types::Method;

/// Identifies a track for the lookup endpoints: either by artist/track
/// name or by MusicBrainz id.
#[derive(Debug, Clone, Copy)]
pub enum TrackSelector<'a> {
    ByName { artist: &'a str, track: &'a str },
    ByMbid(&'a str),
}

impl<'a> TrackSelector<'a> {
    pub fn name(artist: &'a str, track: &'a str) -> Self {
        TrackSelector::ByName { artist, track }
    }

    pub fn mbid(mbid: &'a str) -> Self {
        TrackSelector::ByMbid(mbid)
    }

    fn apply(self, params: Params) -> Params {
        match self {
            TrackSelector::ByName { artist, track } => {
                params.put("artist", artist).put("track", track)
            }
            TrackSelector::ByMbid(mbid) => params.put("mbid", mbid),
        }
    }
}

/// Extra metadata for [`TrackApi::update_now_playing`].
#[derive(Debug, Clone, Default)]
pub struct NowPlaying {
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub track_number: Option<u32>,
    pub duration: Option<u32>,
    pub mbid: Option<String>,
    pub context: Option<String>,
}

/// Marshal each scrobble into the indexed `key[i]` form fields the batch
/// endpoint expects.
fn marshal_scrobbles(scrobbles: &[Scrobble]) -> Params {
    let mut params = Params::new();
    for (i, s) in scrobbles.iter().enumerate() {
        params.set(&format!("artist[{i}]"), &s.artist);
        params.set(&format!("track[{i}]"), &s.track);
        params.set(&format!("timestamp[{i}]"), s.timestamp);
        if let Some(album) = &s.album {
            params.set(&format!("album[{i}]"), album);
        }
        if let Some(album_artist) = &s.album_artist {
            params.set(&format!("albumArtist[{i}]"), album_artist);
        }
        if let Some(track_number) = s.track_number {
            params.set(&format!("trackNumber[{i}]"), track_number);
        }
        if let Some(duration) = s.duration {
            params.set(&format!("duration[{i}]"), duration);
        }
        if let Some(mbid) = &s.mbid {
            params.set(&format!("mbid[{i}]"), mbid);
        }
        if let Some(chosen) = s.chosen_by_user {
            params.set(&format!("chosenByUser[{i}]"), i32::from(chosen));
        }
    }
    params
}

/// `track.*` endpoints.
pub struct TrackApi {
    client: LastFm,
}

impl TrackApi {
    pub(crate) fn new(client: LastFm) -> Self {
        Self { client }
    }

    /// Search for a track by name, optionally narrowed by artist. Returns
    /// matches sorted by relevance.
    ///
    /// <https://www.last.fm/api/show/track.search>
    pub async fn search(
        &self,
        track: &str,
        artist: Option<&str>,
        limit: Option<u64>,
    ) -> Result<PaginatedIterator<Track>> {
        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("track.search", "trackmatches.track")
                    .unwrap_key("results")
                    .style(PaginationStyle::Search)
                    .perpage(bounded_perpage(limit))
                    .limit(limit),
                Params::new().put("track", track).opt("artist", artist),
            )
            .await?;
        Ok(resp.items.try_map(model))
    }

    /// Get the metadata for a track.
    ///
    /// <https://www.last.fm/api/show/track.getInfo>
    pub async fn get_info(
        &self,
        selector: TrackSelector<'_>,
        username: Option<&str>,
        autocorrect: bool,
    ) -> Result<Track> {
        let params = selector.apply(
            Params::new()
                .put("autocorrect", i32::from(autocorrect))
                .opt("username", username.or_else(|| self.client.username())),
        );
        let resp = self
            .client
            .request(Method::Get, "track.getInfo", params, Some("track"))
            .await?;
        model(resp)
    }

    /// Check whether the supplied track has a correction to a canonical
    /// track.
    ///
    /// <https://www.last.fm/api/show/track.getCorrection>
    pub async fn get_correction(&self, artist: &str, track: &str) -> Result<Track> {
        let resp = self
            .client
            .request(
                Method::Get,
                "track.getCorrection",
                Params::new().put("artist", artist).put("track", track),
                Some("corrections"),
            )
            .await?;
        model(nested::get(&resp, &["correction", "track"])?.clone())
    }

    /// Get similar tracks, based on listening data.
    ///
    /// <https://www.last.fm/api/show/track.getSimilar>
    pub async fn get_similar(
        &self,
        selector: TrackSelector<'_>,
        autocorrect: bool,
        limit: Option<u32>,
    ) -> Result<Vec<Track>> {
        let params = selector.apply(
            Params::new()
                .put("autocorrect", i32::from(autocorrect))
                .opt("limit", limit),
        );
        let mut resp = self
            .client
            .request(Method::Get, "track.getSimilar", params, Some("similartracks"))
            .await?;
        ensure_list(nested::take(&mut resp, &["track"])?)
            .into_iter()
            .map(model)
            .collect()
    }

    /// Get the tags applied by an individual user to a track.
    ///
    /// <https://www.last.fm/api/show/track.getTags>
    pub async fn get_tags(
        &self,
        selector: TrackSelector<'_>,
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
            .request(Method::Get, "track.getTags", params, Some("tags"))
            .await?;
        match nested::take(&mut resp, &["tag"]) {
            Ok(value) => ensure_list(value).into_iter().map(model).collect(),
            Err(_) => Ok(Vec::new()),
        }
    }

    /// Get the top tags for a track, ordered by tag count.
    ///
    /// <https://www.last.fm/api/show/track.getTopTags>
    pub async fn get_top_tags(
        &self,
        selector: TrackSelector<'_>,
        autocorrect: bool,
    ) -> Result<Vec<TopTag>> {
        let params = selector.apply(Params::new().put("autocorrect", i32::from(autocorrect)));
        let mut resp = self
            .client
            .request(Method::Get, "track.getTopTags", params, Some("toptags"))
            .await?;
        ensure_list(nested::take(&mut resp, &["tag"])?)
            .into_iter()
            .map(model)
            .collect()
    }

    /// Love a track for the authenticated user.
    ///
    /// <https://www.last.fm/api/show/track.love>
    pub async fn love(&self, artist: &str, track: &str) -> Result<()> {
        self.client
            .request(
                Method::Post,
                "track.love",
                Params::new().put("artist", artist).put("track", track),
                None,
            )
            .await?;
        Ok(())
    }

    /// Remove a loved track for the authenticated user.
    ///
    /// <https://www.last.fm/api/show/track.unlove>
    pub async fn unlove(&self, artist: &str, track: &str) -> Result<()> {
        self.client
            .request(
                Method::Post,
                "track.unlove",
                Params::new().put("artist", artist).put("track", track),
                None,
            )
            .await?;
        Ok(())
    }

    /// Tag a track with up to 10 user-supplied tags; extras are dropped.
    ///
    /// <https://www.last.fm/api/show/track.addTags>
    pub async fn add_tags(&self, artist: &str, track: &str, tags: &[&str]) -> Result<()> {
        let tags = tags.iter().take(10).copied().collect::<Vec<_>>().join(",");
        self.client
            .request(
                Method::Post,
                "track.addTags",
                Params::new()
                    .put("artist", artist)
                    .put("track", track)
                    .put("tags", tags),
                None,
            )
            .await?;
        Ok(())
    }

    /// Remove the authenticated user's tag from a track.
    ///
    /// <https://www.last.fm/api/show/track.removeTag>
    pub async fn remove_tag(&self, artist: &str, track: &str, tag: &str) -> Result<()> {
        self.client
            .request(
                Method::Post,
                "track.removeTag",
                Params::new()
                    .put("artist", artist)
                    .put("track", track)
                    .put("tag", tag),
                None,
            )
            .await?;
        Ok(())
    }

    /// Submit one or more scrobbles in a single batch.
    ///
    /// <https://www.last.fm/api/show/track.scrobble>
    pub async fn scrobble(&self, scrobbles: &[Scrobble]) -> Result<()> {
        self.client
            .request(
                Method::Post,
                "track.scrobble",
                marshal_scrobbles(scrobbles),
                None,
            )
            .await?;
        Ok(())
    }

    /// Notify the service of the currently playing track.
    ///
    /// <https://www.last.fm/api/show/track.updateNowPlaying>
    pub async fn update_now_playing(
        &self,
        artist: &str,
        track: &str,
        extra: NowPlaying,
    ) -> Result<()> {
        self.client
            .request(
                Method::Post,
                "track.updateNowPlaying",
                Params::new()
                    .put("artist", artist)
                    .put("track", track)
                    .opt("album", extra.album)
                    .opt("albumArtist", extra.album_artist)
                    .opt("trackNumber", extra.track_number)
                    .opt("duration", extra.duration)
                    .opt("mbid", extra.mbid)
                    .opt("context", extra.context),
                None,
            )
            .await?;
        Ok(())
    }
}
