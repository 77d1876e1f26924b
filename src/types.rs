//! Data types for Last.fm API responses.
//!
//! The service renders every count as a numeric string, wraps plain text in
//! `"#text"` fields, and switches between a bare name string and a full
//! object for referenced artists depending on the endpoint. The models here
//! absorb those quirks with lenient deserializers so endpoint code can map
//! envelope items straight into typed values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Deserialize an optional integer that the API may render as a string,
/// a number, or an empty string.
pub(crate) fn opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s.parse().ok(),
        Some(Value::Number(n)) => n.as_u64(),
        _ => None,
    })
}

/// An image in one of the service's fixed sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub size: String,
    #[serde(rename = "#text", default)]
    pub url: String,
}

/// Per-item metadata block (`@attr`), carrying the item's rank in ranked
/// listings and the now-playing marker in recent-track listings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemAttr {
    #[serde(default, deserialize_with = "opt_u64")]
    pub rank: Option<u64>,
    #[serde(default)]
    pub nowplaying: Option<String>,
}

/// A referenced artist, which the API renders either as a bare name
/// string, a `{"#text": ...}` wrapper, or a full object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArtistRef {
    Name(String),
    Text {
        #[serde(rename = "#text")]
        text: String,
        #[serde(default)]
        mbid: Option<String>,
    },
    Info {
        name: String,
        #[serde(default)]
        mbid: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl ArtistRef {
    /// The artist's name, whichever shape the reference came in.
    pub fn name(&self) -> &str {
        match self {
            ArtistRef::Name(name) => name,
            ArtistRef::Text { text, .. } => text,
            ArtistRef::Info { name, .. } => name,
        }
    }
}

/// A referenced album: a `{"#text": ...}` wrapper in scrobble listings, a
/// named object elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlbumRef {
    Text {
        #[serde(rename = "#text")]
        text: String,
        #[serde(default)]
        mbid: Option<String>,
    },
    Named {
        #[serde(alias = "title")]
        name: String,
    },
}

impl AlbumRef {
    pub fn name(&self) -> &str {
        match self {
            AlbumRef::Text { text, .. } => text,
            AlbumRef::Named { name } => name,
        }
    }
}

/// Scrobble timestamp, carried as a Unix `uts` plus a display string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrobbleDate {
    #[serde(default, deserialize_with = "opt_u64")]
    pub uts: Option<u64>,
    #[serde(rename = "#text", default)]
    pub text: Option<String>,
}

impl ScrobbleDate {
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        self.uts
            .and_then(|uts| DateTime::from_timestamp(i64::try_from(uts).ok()?, 0))
    }
}

/// A track as it appears in listings, searches, and scrobble history.
///
/// # Examples
///
/// ```rust
/// use lastfm_api::Track;
///
/// let track: Track = serde_json::from_str(
///     r##"{"name": "Everything's Not Lost",
///          "artist": {"#text": "Coldplay", "mbid": ""},
///          "date": {"uts": "1640995200", "#text": "01 Jan 2022, 00:00"}}"##,
/// ).unwrap();
///
/// assert_eq!(track.artist_name(), Some("Coldplay"));
/// assert!(track.scrobbled_at().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    #[serde(default)]
    pub mbid: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub artist: Option<ArtistRef>,
    #[serde(default)]
    pub album: Option<AlbumRef>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub playcount: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub listeners: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub duration: Option<u64>,
    #[serde(default)]
    pub date: Option<ScrobbleDate>,
    #[serde(rename = "image", default)]
    pub images: Vec<Image>,
    #[serde(rename = "@attr", default)]
    pub attr: Option<ItemAttr>,
}

impl Track {
    pub fn artist_name(&self) -> Option<&str> {
        self.artist.as_ref().map(ArtistRef::name)
    }

    pub fn album_name(&self) -> Option<&str> {
        self.album.as_ref().map(AlbumRef::name)
    }

    /// When this scrobble happened, if the listing carries timestamps.
    pub fn scrobbled_at(&self) -> Option<DateTime<Utc>> {
        self.date.as_ref().and_then(ScrobbleDate::datetime)
    }

    /// Whether this entry is the currently playing (not yet scrobbled)
    /// track in a recent-tracks listing.
    pub fn is_now_playing(&self) -> bool {
        self.attr
            .as_ref()
            .and_then(|attr| attr.nowplaying.as_deref())
            == Some("true")
    }
}

/// Statistics block embedded in `artist.getInfo` responses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArtistStats {
    #[serde(default, deserialize_with = "opt_u64")]
    pub listeners: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub playcount: Option<u64>,
}

/// An artist as it appears in listings, searches, and `artist.getInfo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    #[serde(default)]
    pub mbid: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub playcount: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub listeners: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub tagcount: Option<u64>,
    #[serde(default)]
    pub stats: Option<ArtistStats>,
    #[serde(rename = "image", default)]
    pub images: Vec<Image>,
    #[serde(rename = "@attr", default)]
    pub attr: Option<ItemAttr>,
}

/// An album as it appears in listings, searches, and `album.getInfo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default)]
    pub mbid: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub artist: Option<ArtistRef>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub playcount: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub listeners: Option<u64>,
    #[serde(rename = "image", default)]
    pub images: Vec<Image>,
    #[serde(rename = "@attr", default)]
    pub attr: Option<ItemAttr>,
}

impl Album {
    pub fn artist_name(&self) -> Option<&str> {
        self.artist.as_ref().map(ArtistRef::name)
    }
}

/// A tag applied by a user to an artist, album, or track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub count: Option<u64>,
}

/// A tag in a ranked top-tags chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopTag {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub count: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub reach: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub rank: Option<u64>,
}

/// Registration date block in `user.getInfo` responses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Registered {
    #[serde(default, deserialize_with = "opt_u64")]
    pub unixtime: Option<u64>,
}

/// A user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    #[serde(default)]
    pub realname: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub age: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub playcount: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub playlists: Option<u64>,
    #[serde(default)]
    pub registered: Option<Registered>,
    #[serde(rename = "image", default)]
    pub images: Vec<Image>,
}

/// One play to submit through `track.scrobble`.
///
/// # Examples
///
/// ```rust
/// use lastfm_api::Scrobble;
///
/// let scrobble = Scrobble::new("Low", "Lazy", 1640995200)
///     .with_album("The Curtain Hits the Cast")
///     .with_track_number(4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scrobble {
    /// The artist name.
    pub artist: String,
    /// The track name.
    pub track: String,
    /// When the track started playing (Unix timestamp).
    pub timestamp: i64,
    /// The album name.
    pub album: Option<String>,
    /// The album artist, if it differs from the track artist.
    pub album_artist: Option<String>,
    /// The track number of the track on the album.
    pub track_number: Option<u32>,
    /// The length of the track in seconds.
    pub duration: Option<u32>,
    /// The MusicBrainz track ID.
    pub mbid: Option<String>,
    /// Whether the user chose the song, as opposed to a radio station or
    /// recommendation service.
    pub chosen_by_user: Option<bool>,
}

impl Scrobble {
    pub fn new(artist: &str, track: &str, timestamp: i64) -> Self {
        Self {
            artist: artist.to_string(),
            track: track.to_string(),
            timestamp,
            album: None,
            album_artist: None,
            track_number: None,
            duration: None,
            mbid: None,
            chosen_by_user: None,
        }
    }

    pub fn with_album(mut self, album: &str) -> Self {
        self.album = Some(album.to_string());
        self
    }

    pub fn with_album_artist(mut self, album_artist: &str) -> Self {
        self.album_artist = Some(album_artist.to_string());
        self
    }

    pub fn with_track_number(mut self, track_number: u32) -> Self {
        self.track_number = Some(track_number);
        self
    }

    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_mbid(mut self, mbid: &str) -> Self {
        self.mbid = Some(mbid.to_string());
        self
    }

    pub fn with_chosen_by_user(mut self, chosen: bool) -> Self {
        self.chosen_by_user = Some(chosen);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recent_track() {
        let json = r##"{
            "name": "Test Track",
            "artist": {"#text": "Test Artist", "mbid": ""},
            "album": {"#text": "Test Album", "mbid": ""},
            "url": "https://www.last.fm/music/Test+Artist/_/Test+Track",
            "date": {"uts": "1700000000", "#text": "14 Nov 2023, 22:13"},
            "image": [{"size": "small", "#text": "https://img/34s.png"}]
        }"##;

        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.name, "Test Track");
        assert_eq!(track.artist_name(), Some("Test Artist"));
        assert_eq!(track.album_name(), Some("Test Album"));
        assert_eq!(track.date.as_ref().unwrap().uts, Some(1700000000));
        assert!(!track.is_now_playing());
        assert_eq!(track.images.len(), 1);
    }

    #[test]
    fn test_parse_now_playing_track() {
        let json = r##"{
            "name": "Now Playing",
            "artist": {"#text": "Some Artist"},
            "@attr": {"nowplaying": "true"}
        }"##;

        let track: Track = serde_json::from_str(json).unwrap();
        assert!(track.is_now_playing());
        assert_eq!(track.scrobbled_at(), None);
    }

    #[test]
    fn test_parse_search_track_with_string_artist() {
        // Search results render the artist as a bare name string
        let json = r#"{
            "name": "Karma Police",
            "artist": "Radiohead",
            "listeners": "1287147"
        }"#;

        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.artist_name(), Some("Radiohead"));
        assert_eq!(track.listeners, Some(1287147));
    }

    #[test]
    fn test_parse_artist_with_ranked_attr() {
        let json = r##"{
            "name": "Radiohead",
            "playcount": "12943",
            "@attr": {"rank": "2"}
        }"##;

        let artist: Artist = serde_json::from_str(json).unwrap();
        assert_eq!(artist.playcount, Some(12943));
        assert_eq!(artist.attr.unwrap().rank, Some(2));
    }

    #[test]
    fn test_parse_artist_info_stats() {
        let json = r#"{
            "name": "Cher",
            "stats": {"listeners": "1082589", "playcount": "13620166"}
        }"#;

        let artist: Artist = serde_json::from_str(json).unwrap();
        assert_eq!(artist.stats.unwrap().playcount, Some(13620166));
    }

    #[test]
    fn test_parse_album_with_object_artist() {
        let json = r#"{
            "name": "OK Computer",
            "artist": {"name": "Radiohead", "url": "https://www.last.fm/music/Radiohead"},
            "playcount": "156"
        }"#;

        let album: Album = serde_json::from_str(json).unwrap();
        assert_eq!(album.artist_name(), Some("Radiohead"));
        assert_eq!(album.playcount, Some(156));
    }

    #[test]
    fn test_parse_user() {
        let json = r#"{
            "name": "rj",
            "realname": "Richard Jones",
            "playcount": "54189",
            "registered": {"unixtime": "1037793040"}
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.playcount, Some(54189));
        assert_eq!(user.registered.unwrap().unixtime, Some(1037793040));
    }

    #[test]
    fn test_empty_numeric_string_is_none() {
        let json = r#"{"name": "x", "playcount": ""}"#;
        let artist: Artist = serde_json::from_str(json).unwrap();
        assert_eq!(artist.playcount, None);
    }
}
