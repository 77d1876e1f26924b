use crate::auth::AuthMethod;
use crate::{LastFmError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Client settings: API credentials plus optional account and session
/// information.
///
/// Loadable from a JSON file, e.g.
/// `~/.config/lastfm-api/config.json`:
///
/// ```json
/// {
///     "api_key": "myapikey",
///     "api_secret": "myapisecret",
///     "username": "thesquelched",
///     "password": "plaintext_password",
///     "auth_method": "password"
/// }
/// ```
///
/// `auth_method` can be `password`, `hashed_password`, `session_key`, or
/// `session_key_file`; when omitted the client infers it from the other
/// settings (see [`AuthMethod`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Last.fm API key
    pub api_key: String,
    /// Last.fm API secret
    pub api_secret: String,
    /// Account username
    #[serde(default)]
    pub username: Option<String>,
    /// Account password, plaintext or MD5-hashed depending on `auth_method`
    #[serde(default)]
    pub password: Option<String>,
    /// Session key, or a path to a file holding one
    #[serde(default)]
    pub session_key: Option<String>,
    /// Authentication method override
    #[serde(default)]
    pub auth_method: Option<AuthMethod>,
    /// Service URL override (useful for testing)
    #[serde(default)]
    pub url: Option<String>,
}

impl ClientConfig {
    /// Settings with only the API credentials; everything else defaults.
    pub fn new(api_key: &str, api_secret: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            username: None,
            password: None,
            session_key: None,
            auth_method: None,
            url: None,
        }
    }

    pub fn with_username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    pub fn with_session_key(mut self, session_key: &str) -> Self {
        self.session_key = Some(session_key.to_string());
        self
    }

    pub fn with_auth_method(mut self, auth_method: AuthMethod) -> Self {
        self.auth_method = Some(auth_method);
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    /// Load settings from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&contents).map_err(|e| {
            LastFmError::Parse(format!(
                "invalid config file {}: {e}",
                path.as_ref().display()
            ))
        })
    }

    /// The conventional config location:
    /// `<config dir>/lastfm-api/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lastfm-api").join("config.json"))
    }

    /// Load settings from [`default_path`](Self::default_path).
    pub fn load() -> Result<Self> {
        let path = Self::default_path().ok_or_else(|| {
            LastFmError::InvalidArgument("cannot determine config directory".to_string())
        })?;
        Self::from_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_round_trip() {
        let config = ClientConfig::new("key", "secret")
            .with_username("user")
            .with_auth_method(AuthMethod::HashedPassword);

        let path = std::env::temp_dir().join(format!(
            "lastfm-api-config-test-{}.json",
            std::process::id()
        ));
        fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

        let loaded = ClientConfig::from_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_from_file_missing() {
        let err = ClientConfig::from_file("/nonexistent/config.json").unwrap_err();
        assert!(matches!(err, LastFmError::Io(_)));
    }

    #[test]
    fn test_partial_config_parses() {
        let loaded: ClientConfig =
            serde_json::from_str(r#"{"api_key": "k", "api_secret": "s"}"#).unwrap();
        assert_eq!(loaded.username, None);
        assert_eq!(loaded.auth_method, None);
    }

    #[test]
    fn test_auth_method_snake_case() {
        let loaded: ClientConfig = serde_json::from_str(
            r#"{"api_key": "k", "api_secret": "s", "auth_method": "session_key_file"}"#,
        )
        .unwrap();
        assert_eq!(loaded.auth_method, Some(AuthMethod::SessionKeyFile));
    }

    #[test]
    fn test_default_path() {
        if let Some(path) = ClientConfig::default_path() {
            assert!(path.to_string_lossy().contains("lastfm-api"));
        }
    }
}
