use crate::params::Params;
use crate::session::ApiInfo;
use md5::{Digest, Md5};

/// Parameter key carrying the session key.
pub const SESSION_KEY_PARAM: &str = "sk";

/// Parameter key carrying the signature itself.
pub const SIGNATURE_PARAM: &str = "api_sig";

/// Keys excluded from the signature material regardless of presence.
const NO_SIGN: [&str; 2] = [SIGNATURE_PARAM, "format"];

/// Deterministic request-signature computation.
///
/// Produces the `api_sig` value required by authenticated Last.fm methods:
/// every parameter except `api_sig` and `format` is concatenated as
/// `key + value` in ascending key order, the shared secret is appended,
/// and the MD5 digest of the result is rendered as lowercase hex.
///
/// The signature is a pure function of the parameter set and the
/// credentials; parameter insertion order never affects it.
pub struct Signer<'a> {
    api_info: &'a ApiInfo,
}

impl<'a> Signer<'a> {
    pub fn new(api_info: &'a ApiInfo) -> Self {
        Self { api_info }
    }

    /// Return the signature for the given parameters.
    ///
    /// When the session has a key, it is injected under `sk` before
    /// signing, so the session key is part of the hashed material.
    pub fn sign(&self, params: &Params) -> String {
        let mut signed = params.clone();
        if let Some(session_key) = self.api_info.session_key() {
            signed.set(SESSION_KEY_PARAM, session_key);
        }

        let mut material = String::new();
        for (key, value) in signed.iter() {
            if NO_SIGN.contains(&key) {
                continue;
            }
            material.push_str(key);
            material.push_str(value);
        }
        material.push_str(self.api_info.secret());

        let mut hasher = Md5::new();
        hasher.update(material.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Return a signed copy of the parameters.
    ///
    /// The copy has `api_sig` set to [`sign`](Self::sign)'s result and,
    /// when a session exists, the session key injected under `sk`.
    pub fn signed(&self, params: &Params) -> Params {
        let mut signed = params.clone();
        signed.set(SIGNATURE_PARAM, self.sign(params));
        if let Some(session_key) = self.api_info.session_key() {
            signed.set(SESSION_KEY_PARAM, session_key);
        }
        signed
    }
}
