use crate::client::LastFm;
use crate::nested;
use crate::params::Params;
use crate::signer::Signer;
use crate::{LastFmError, Result};
use http_types::Method;

/// `auth.*` endpoints for the web authorization flow.
///
/// The desktop/mobile flow ([`LastFm::authenticate`]) does not need these;
/// they exist for applications that send the user to the Last.fm
/// authorization page.
pub struct AuthApi {
    client: LastFm,
}

impl AuthApi {
    pub(crate) fn new(client: LastFm) -> Self {
        Self { client }
    }

    /// Fetch an unauthorized request token.
    ///
    /// <https://www.last.fm/api/show/auth.getToken>
    pub async fn get_token(&self) -> Result<String> {
        let info = self.client.api_info();
        let params = Params::new()
            .put("method", "auth.getToken")
            .put("api_key", info.key())
            .put("format", "json");
        let signed = Signer::new(&info).signed(&params);

        let resp = self.client.send(Method::Get, &signed).await?;
        Ok(resp
            .get("token")
            .and_then(|t| t.as_str())
            .ok_or_else(|| LastFmError::MissingKey {
                key: "token".to_string(),
            })?
            .to_string())
    }

    /// Fetch a session key for a user, typically after the user authorized
    /// the token from [`get_token`](Self::get_token).
    ///
    /// <https://www.last.fm/api/show/auth.getSession>
    pub async fn get_session(&self, token: &str) -> Result<String> {
        let info = self.client.api_info();
        let params = Params::new()
            .put("method", "auth.getSession")
            .put("token", token)
            .put("api_key", info.key())
            .put("format", "json");
        let signed = Signer::new(&info).signed(&params);

        let resp = self.client.send(Method::Get, &signed).await?;
        Ok(nested::get(&resp, &["session", "key"])?
            .as_str()
            .ok_or_else(|| LastFmError::Parse("session key is not a string".to_string()))?
            .to_string())
    }
}
