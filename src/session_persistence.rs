use crate::session::ApiInfo;
use crate::{LastFmError, Result};
use std::fs;
use std::path::PathBuf;

/// Session persistence utilities for keeping session keys across runs.
///
/// Credentials records are stored per-user following the XDG Base Directory
/// Specification, in the format:
/// `~/.local/share/lastfm-api/users/{username}/session.json`
///
/// A restored record is fed back into the client with
/// [`LastFm::restore_api_info`](crate::LastFm::restore_api_info), skipping
/// the authentication round-trip entirely.
pub struct SessionPersistence;

impl SessionPersistence {
    /// Get the session file path for a given username using XDG directories.
    pub fn session_path(username: &str) -> Result<PathBuf> {
        let data_dir = dirs::data_dir().ok_or_else(|| {
            LastFmError::InvalidArgument("cannot determine XDG data directory".to_string())
        })?;

        let session_dir = data_dir.join("lastfm-api").join("users").join(username);
        Ok(session_dir.join("session.json"))
    }

    /// Save a credentials record (session key included) for `username`.
    pub fn save(username: &str, api_info: &ApiInfo) -> Result<()> {
        let path = Self::session_path(username)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = api_info
            .to_json()
            .map_err(|e| LastFmError::Parse(format!("failed to serialize session: {e}")))?;
        fs::write(&path, json)?;

        log::debug!("Session saved to: {}", path.display());
        Ok(())
    }

    /// Load a previously saved credentials record for `username`.
    pub fn load(username: &str) -> Result<ApiInfo> {
        let path = Self::session_path(username)?;
        let json = fs::read_to_string(&path)?;
        let api_info = ApiInfo::from_json(&json)
            .map_err(|e| LastFmError::Parse(format!("failed to parse session file: {e}")))?;

        log::debug!("Session loaded from: {}", path.display());
        Ok(api_info)
    }

    /// Whether a saved session exists for the given username.
    pub fn exists(username: &str) -> bool {
        Self::session_path(username)
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Remove a saved session for the given username.
    pub fn remove(username: &str) -> Result<()> {
        let path = Self::session_path(username)?;
        if path.exists() {
            fs::remove_file(&path)?;
            log::debug!("Session removed from: {}", path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_path() {
        let path = SessionPersistence::session_path("testuser").unwrap();
        assert!(path
            .to_string_lossy()
            .contains("lastfm-api/users/testuser/session.json"));
    }

    #[test]
    fn test_exists_nonexistent() {
        let fake_username = format!("nonexistent_user_{}", std::process::id());
        assert!(!SessionPersistence::exists(&fake_username));
    }
}
