use crate::client::LastFm;
use crate::config::ClientConfig;
use crate::nested;
use crate::params::Params;
use crate::signer::Signer;
use crate::{LastFmError, Result};
use http_types::Method;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// How the client obtains a session key.
///
/// When no method is configured the client picks one from the other
/// settings: a session key naming an existing file means
/// [`SessionKeyFile`](AuthMethod::SessionKeyFile), any other session key is
/// used [literally](AuthMethod::SessionKey), and otherwise the plaintext
/// [`Password`](AuthMethod::Password) flow is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// POST the plaintext password to `auth.getMobileSession`.
    Password,
    /// Authenticate with `authToken = md5(username + md5(password))`,
    /// accepting an already-hashed password.
    HashedPassword,
    /// Use a session key supplied up front.
    SessionKey,
    /// Read the session key from a file.
    SessionKeyFile,
}

pub(crate) fn md5_hex(input: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Map request/remote failures during an auth exchange onto
/// [`LastFmError::Auth`]. Parse failures keep their own type; everything
/// the service rejects surfaces with the remote message.
fn auth_error(err: LastFmError) -> LastFmError {
    match err {
        LastFmError::Api { message, .. } => LastFmError::Auth(message),
        parse @ LastFmError::Parse(_) => parse,
        missing @ LastFmError::MissingKey { .. } => missing,
        _ => LastFmError::Auth("unable to get session".to_string()),
    }
}

fn session_key_from(data: &Value) -> Result<String> {
    Ok(nested::get(data, &["session", "key"])?
        .as_str()
        .ok_or_else(|| LastFmError::Parse("session key is not a string".to_string()))?
        .to_string())
}

/// The configured authentication strategy.
#[derive(Debug)]
pub(crate) enum Authenticator {
    Password {
        username: Option<String>,
        password: Option<String>,
    },
    HashedPassword {
        username: Option<String>,
        password: Option<String>,
        /// `Some` when the caller told us whether the password is hashed;
        /// `None` means guess.
        hashed: Option<bool>,
    },
    SessionKey {
        key: String,
    },
    SessionKeyFile {
        path: PathBuf,
    },
}

impl Authenticator {
    pub(crate) fn from_config(config: &ClientConfig) -> Self {
        let method = config.auth_method.unwrap_or_else(|| {
            match config.session_key.as_deref() {
                None => AuthMethod::Password,
                Some(key) if Path::new(key).is_file() => AuthMethod::SessionKeyFile,
                Some(_) => AuthMethod::SessionKey,
            }
        });

        match method {
            AuthMethod::Password => Authenticator::Password {
                username: config.username.clone(),
                password: config.password.clone(),
            },
            AuthMethod::HashedPassword => Authenticator::HashedPassword {
                username: config.username.clone(),
                password: config.password.clone(),
                hashed: None,
            },
            AuthMethod::SessionKey => Authenticator::SessionKey {
                key: config.session_key.clone().unwrap_or_default(),
            },
            AuthMethod::SessionKeyFile => Authenticator::SessionKeyFile {
                path: PathBuf::from(config.session_key.clone().unwrap_or_default()),
            },
        }
    }

    /// Obtain a session key.
    pub(crate) async fn session_key(&self, client: &LastFm) -> Result<String> {
        match self {
            Authenticator::Password { username, password } => {
                let (username, password) = credentials(username, password)?;
                password_session_key(client, &username, &password).await
            }
            Authenticator::HashedPassword {
                username,
                password,
                hashed,
            } => {
                let (username, password) = credentials(username, password)?;
                auth_token_session_key(client, &username, &password, *hashed).await
            }
            Authenticator::SessionKey { key } => Ok(key.clone()),
            Authenticator::SessionKeyFile { path } => {
                let contents = std::fs::read_to_string(path).map_err(|_| {
                    LastFmError::Auth(format!(
                        "invalid/missing session key file: {}",
                        path.display()
                    ))
                })?;
                Ok(contents.trim().to_string())
            }
        }
    }
}

fn credentials(username: &Option<String>, password: &Option<String>) -> Result<(String, String)> {
    match (username, password) {
        (Some(u), Some(p)) => Ok((u.clone(), p.clone())),
        _ => Err(LastFmError::Auth(
            "username and password are required".to_string(),
        )),
    }
}

/// Plaintext password flow: one signed `auth.getMobileSession` POST.
async fn password_session_key(client: &LastFm, username: &str, password: &str) -> Result<String> {
    let info = client.api_info();
    let params = Params::new()
        .put("method", "auth.getMobileSession")
        .put("username", username)
        .put("password", password)
        .put("api_key", info.key())
        .put("format", "json");
    let signed = Signer::new(&info).signed(&params);

    let data = client
        .send(Method::Post, &signed)
        .await
        .map_err(auth_error)?;
    session_key_from(&data)
}

/// Return `true` when the password looks like an MD5 hex digest.
fn looks_hashed(password: &str) -> bool {
    password.len() == 32
        && (password.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
            || password.chars().all(|c| matches!(c, '0'..='9' | 'A'..='F')))
}

/// Auth-token flow. When the caller did not say whether the password is
/// already hashed, guess from its shape and try the guess first, then the
/// complement; the second failure propagates. Exactly two attempts, never
/// more.
async fn auth_token_session_key(
    client: &LastFm,
    username: &str,
    password: &str,
    hashed: Option<bool>,
) -> Result<String> {
    let tries: Vec<bool> = match hashed {
        Some(hashed) => vec![hashed],
        None => {
            let guess = looks_hashed(password);
            vec![guess, !guess]
        }
    };

    let last = tries.len() - 1;
    for (attempt, &hashed) in tries.iter().enumerate() {
        match authenticate_maybe_hashed(client, username, password, hashed).await {
            Ok(key) => return Ok(key),
            Err(err @ LastFmError::Auth(_)) => {
                log::debug!(
                    "Could not authenticate assuming password {} hashed: {}",
                    if hashed { "was" } else { "was not" },
                    err
                );
                if attempt == last {
                    return Err(err);
                }
            }
            Err(other) => return Err(other),
        }
    }

    unreachable!("auth attempt list is never empty")
}

async fn authenticate_maybe_hashed(
    client: &LastFm,
    username: &str,
    password: &str,
    hashed: bool,
) -> Result<String> {
    let pwhash = if hashed {
        password.to_string()
    } else {
        md5_hex(password)
    };
    let auth_token = md5_hex(&format!("{username}{pwhash}"));

    let info = client.api_info();
    let params = Params::new()
        .put("method", "auth.getMobileSession")
        .put("username", username)
        .put("authToken", auth_token)
        .put("api_key", info.key())
        .put("format", "json");
    let signed = Signer::new(&info).signed(&params);

    let data = client
        .send(Method::Post, &signed)
        .await
        .map_err(auth_error)?;
    session_key_from(&data)
}
