use crate::api::{bounded_perpage, model};
use crate::client::{LastFm, PagedQuery};
use crate::iterator::PaginatedIterator;
use crate::nested;
use crate::params::{query_date, Params};
use crate::types::{Album, Artist, Tag, Track, User};
use crate::{LastFmError, Result};
use chrono::{DateTime, Utc};
use http_types::Method;
use serde_json::Value;

/// Time period for the `user.getTop*` listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Overall,
    SevenDay,
    OneMonth,
    ThreeMonth,
    SixMonth,
    TwelveMonth,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Overall => "overall",
            Period::SevenDay => "7day",
            Period::OneMonth => "1month",
            Period::ThreeMonth => "3month",
            Period::SixMonth => "6month",
            Period::TwelveMonth => "12month",
        }
    }
}

/// `user.*` endpoints.
pub struct UserApi {
    client: LastFm,
}

impl UserApi {
    pub(crate) fn new(client: LastFm) -> Self {
        Self { client }
    }

    /// The username to query when the caller did not name one.
    fn default_username(&self, username: Option<&str>) -> Result<String> {
        username
            .map(str::to_string)
            .or_else(|| self.client.username().map(str::to_string))
            .ok_or_else(|| LastFmError::InvalidArgument("no username given or configured".into()))
    }

    /// Get information about a user profile.
    ///
    /// <https://www.last.fm/api/show/user.getInfo>
    pub async fn get_info(&self, username: Option<&str>) -> Result<User> {
        let user = self.default_username(username)?;
        let resp = self
            .client
            .request(
                Method::Get,
                "user.getInfo",
                Params::new().put("user", user),
                Some("user"),
            )
            .await?;
        model(resp)
    }

    /// Get a list of the user's friends on Last.fm.
    ///
    /// <https://www.last.fm/api/show/user.getFriends>
    pub async fn get_friends(
        &self,
        username: &str,
        recent_tracks: bool,
    ) -> Result<PaginatedIterator<User>> {
        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("user.getFriends", "user").unwrap_key("friends"),
                Params::new()
                    .put("user", username)
                    .put("recenttracks", i32::from(recent_tracks)),
            )
            .await?;
        Ok(resp.items.try_map(model))
    }

    /// Get tracks loved by the user.
    ///
    /// <https://www.last.fm/api/show/user.getLovedTracks>
    pub async fn get_loved_tracks(&self, username: &str) -> Result<PaginatedIterator<Track>> {
        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("user.getLovedTracks", "track").unwrap_key("lovedtracks"),
                Params::new().put("user", username),
            )
            .await?;
        Ok(resp.items.try_map(model))
    }

    /// Get tracks recently played by the user. Always requests extended
    /// data.
    ///
    /// <https://www.last.fm/api/show/user.getRecentTracks>
    pub async fn get_recent_tracks(
        &self,
        username: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<PaginatedIterator<Track>> {
        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("user.getRecentTracks", "track").unwrap_key("recenttracks"),
                Params::new()
                    .put("user", username)
                    .put("extended", 1)
                    .opt("from", query_date(start))
                    .opt("to", query_date(end)),
            )
            .await?;
        Ok(resp.items.try_map(model))
    }

    /// Get artist tracks scrobbled by the user.
    ///
    /// <https://www.last.fm/api/show/user.getArtistTracks>
    pub async fn get_artist_tracks(
        &self,
        username: &str,
        artist: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<PaginatedIterator<Track>> {
        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("user.getArtistTracks", "track").unwrap_key("artisttracks"),
                Params::new()
                    .put("user", username)
                    .put("artist", artist)
                    .opt("start", query_date(start))
                    .opt("end", query_date(end)),
            )
            .await?;
        Ok(resp.items.try_map(model))
    }

    /// Get the top albums listened to by a user.
    ///
    /// <https://www.last.fm/api/show/user.getTopAlbums>
    pub async fn get_top_albums(
        &self,
        username: Option<&str>,
        period: Option<Period>,
        limit: Option<u64>,
    ) -> Result<PaginatedIterator<Album>> {
        let user = self.default_username(username)?;
        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("user.getTopAlbums", "album")
                    .unwrap_key("topalbums")
                    .perpage(bounded_perpage(limit))
                    .limit(limit),
                Params::new()
                    .put("user", user)
                    .opt("period", period.map(Period::as_str)),
            )
            .await?;
        Ok(resp.items.try_map(model))
    }

    /// Get the top artists listened to by a user.
    ///
    /// <https://www.last.fm/api/show/user.getTopArtists>
    pub async fn get_top_artists(
        &self,
        username: Option<&str>,
        period: Option<Period>,
        limit: Option<u64>,
    ) -> Result<PaginatedIterator<Artist>> {
        let user = self.default_username(username)?;
        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("user.getTopArtists", "artist")
                    .unwrap_key("topartists")
                    .perpage(bounded_perpage(limit))
                    .limit(limit),
                Params::new()
                    .put("user", user)
                    .opt("period", period.map(Period::as_str)),
            )
            .await?;
        Ok(resp.items.try_map(model))
    }

    /// Get the top tracks listened to by a user.
    ///
    /// <https://www.last.fm/api/show/user.getTopTracks>
    pub async fn get_top_tracks(
        &self,
        username: Option<&str>,
        period: Option<Period>,
        limit: Option<u64>,
    ) -> Result<PaginatedIterator<Track>> {
        let user = self.default_username(username)?;
        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("user.getTopTracks", "track")
                    .unwrap_key("toptracks")
                    .perpage(bounded_perpage(limit))
                    .limit(limit),
                Params::new()
                    .put("user", user)
                    .opt("period", period.map(Period::as_str)),
            )
            .await?;
        Ok(resp.items.try_map(model))
    }

    /// Get the top tags used by this user.
    ///
    /// <https://www.last.fm/api/show/user.getTopTags>
    pub async fn get_top_tags(&self, username: Option<&str>) -> Result<Vec<Tag>> {
        let user = self.default_username(username)?;
        let mut resp = self
            .client
            .request(
                Method::Get,
                "user.getTopTags",
                Params::new().put("user", user),
                Some("toptags"),
            )
            .await?;
        crate::client::ensure_list(nested::take(&mut resp, &["tag"])?)
            .into_iter()
            .map(model)
            .collect()
    }

    /// Get the user's personal tags for one tag type. The collection lives
    /// at `<type>s.<type>` inside the `taggings` envelope.
    ///
    /// Fails before any request when `tag_type` is not one of `artist`,
    /// `album`, or `track`.
    ///
    /// <https://www.last.fm/api/show/user.getPersonalTags>
    pub async fn get_personal_tags(
        &self,
        username: &str,
        tag: &str,
        tag_type: &str,
    ) -> Result<PaginatedIterator<Value>> {
        if !matches!(tag_type, "artist" | "album" | "track") {
            return Err(LastFmError::InvalidArgument(format!(
                "invalid tag type: {tag_type}"
            )));
        }

        let collection = format!("{tag_type}s.{tag_type}");
        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("user.getPersonalTags", &collection).unwrap_key("taggings"),
                Params::new()
                    .put("user", username)
                    .put("tag", tag)
                    .put("taggingtype", tag_type),
            )
            .await?;
        Ok(resp.items)
    }

    /// Get the user's personal artist tags.
    pub async fn get_artist_tags(
        &self,
        username: &str,
        tag: &str,
    ) -> Result<PaginatedIterator<Artist>> {
        let items = self.get_personal_tags(username, tag, "artist").await?;
        Ok(items.try_map(model))
    }

    /// Get the user's personal album tags.
    pub async fn get_album_tags(
        &self,
        username: &str,
        tag: &str,
    ) -> Result<PaginatedIterator<Album>> {
        let items = self.get_personal_tags(username, tag, "album").await?;
        Ok(items.try_map(model))
    }

    /// Get the user's personal track tags.
    pub async fn get_track_tags(
        &self,
        username: &str,
        tag: &str,
    ) -> Result<PaginatedIterator<Track>> {
        let items = self.get_personal_tags(username, tag, "track").await?;
        Ok(items.try_map(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::client_with_responses;

    #[tokio::test]
    async fn test_invalid_tag_type_fails_before_any_request() {
        // No responses queued: a request would panic the mock transport
        let client = client_with_responses(vec![]);
        let err = client
            .user()
            .get_personal_tags("rj", "rock", "genre")
            .await
            .unwrap_err();
        assert!(matches!(err, LastFmError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_missing_username_fails_fast() {
        let client = client_with_responses(vec![]);
        let err = client.user().get_info(None).await.unwrap_err();
        assert!(matches!(err, LastFmError::InvalidArgument(_)));
    }

    #[test]
    fn test_period_strings() {
        assert_eq!(Period::Overall.as_str(), "overall");
        assert_eq!(Period::SevenDay.as_str(), "7day");
        assert_eq!(Period::TwelveMonth.as_str(), "12month");
    }
}
