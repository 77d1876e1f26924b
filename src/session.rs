use serde::{Deserialize, Serialize};

/// Default endpoint for the Last.fm web service.
pub const DEFAULT_URL: &str = "https://ws.audioscrobbler.com/2.0/";

/// Immutable API credentials and session context.
///
/// Holds the API key/secret pair, the service URL, and (once authenticated)
/// the session key. The record is never mutated in place: acquiring a
/// session key produces a new value via [`ApiInfo::with_session_key`], and
/// the client swaps its current record for the new one.
///
/// # Examples
///
/// ```rust
/// use lastfm_api::ApiInfo;
///
/// let info = ApiInfo::new("key", "secret");
/// assert!(!info.authenticated());
///
/// let info = info.with_session_key("sessionkey");
/// assert!(info.authenticated());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
    api_key: String,
    api_secret: String,
    base_url: String,
    session_key: Option<String>,
}

impl ApiInfo {
    /// Create credentials for the default service URL.
    pub fn new(api_key: &str, api_secret: &str) -> Self {
        Self::with_base_url(api_key, api_secret, DEFAULT_URL)
    }

    /// Create credentials for a custom service URL (useful for testing).
    pub fn with_base_url(api_key: &str, api_secret: &str, base_url: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            base_url: base_url.to_string(),
            session_key: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.api_key
    }

    pub fn secret(&self) -> &str {
        &self.api_secret
    }

    pub fn url(&self) -> &str {
        &self.base_url
    }

    pub fn session_key(&self) -> Option<&str> {
        self.session_key.as_deref()
    }

    /// Whether a session key is present.
    pub fn authenticated(&self) -> bool {
        self.session_key.is_some()
    }

    /// Return a copy of this record with the session key set.
    pub fn with_session_key(&self, session_key: &str) -> Self {
        Self {
            session_key: Some(session_key.to_string()),
            ..self.clone()
        }
    }

    /// Serialize to JSON for persistence.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from persisted JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
