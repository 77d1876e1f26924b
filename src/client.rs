use crate::auth::Authenticator;
use crate::config::ClientConfig;
use crate::iterator::{PageFetcher, PaginatedIterator};
use crate::nested;
use crate::pagination::{ceildiv, PaginationStyle};
use crate::params::Params;
use crate::session::{ApiInfo, DEFAULT_URL};
use crate::signer::Signer;
use crate::{LastFmError, Result};
use http_client::{HttpClient, Request};
use http_types::{Method, Url};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 200;

/// Hard ceiling on the page size; the service rejects anything larger.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Remote methods that require a session key and therefore a signed request.
fn requires_session(method: &str) -> bool {
    matches!(
        method,
        "user.getRecentStations"
            | "user.getRecommendedArtists"
            | "user.getRecommendedEvents"
            | "user.shout"
            | "track.addTags"
            | "track.ban"
            | "track.love"
            | "track.removeTag"
            | "track.scrobble"
            | "track.share"
            | "track.unban"
            | "track.unlove"
            | "track.updateNowPlaying"
    )
}

/// If `value` is not already a JSON array, wrap it as a one-element array.
///
/// The service returns a bare object instead of a one-element list when
/// exactly one result exists on a page; every extracted collection goes
/// through this so callers always see a list.
pub(crate) fn ensure_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Description of a paginated request: the remote method, where the
/// collection lives inside the envelope, and how it paginates.
///
/// # Examples
///
/// ```rust
/// use lastfm_api::{PagedQuery, PaginationStyle};
///
/// let query = PagedQuery::new("album.search", "albummatches.album")
///     .unwrap_key("results")
///     .style(PaginationStyle::Search)
///     .limit(Some(50));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PagedQuery<'a> {
    /// Remote method name, e.g. `user.getTopAlbums`.
    pub method: &'a str,
    /// Dotted path to the collection inside the (unwrapped) envelope.
    pub collection: &'a str,
    /// Conventional top-level key to unwrap from the raw response.
    pub unwrap: Option<&'a str>,
    /// Which pagination metadata shape the envelope carries.
    pub style: PaginationStyle,
    /// Items per page; defaults to [`DEFAULT_PAGE_SIZE`], capped at
    /// [`MAX_PAGE_SIZE`].
    pub perpage: Option<u32>,
    /// Caller-supplied cap on the number of items to fetch.
    pub limit: Option<u64>,
}

impl<'a> PagedQuery<'a> {
    pub fn new(method: &'a str, collection: &'a str) -> Self {
        Self {
            method,
            collection,
            unwrap: None,
            style: PaginationStyle::Indexed,
            perpage: None,
            limit: None,
        }
    }

    pub fn unwrap_key(mut self, key: &'a str) -> Self {
        self.unwrap = Some(key);
        self
    }

    pub fn style(mut self, style: PaginationStyle) -> Self {
        self.style = style;
        self
    }

    pub fn perpage(mut self, perpage: Option<u32>) -> Self {
        self.perpage = perpage;
        self
    }

    pub fn limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }
}

/// Result of a paginated request: the response envelope with the collection
/// moved out into a lazy [`PaginatedIterator`].
///
/// A JSON value cannot own an iterator, so the collection slot in the
/// envelope is left `null` and the sequence is returned beside it. The rest
/// of the envelope (pagination attributes included) is untouched.
pub struct PagedResponse {
    /// The (unwrapped) first-page envelope, collection slot nulled.
    pub envelope: Value,
    /// Lazy sequence over the collection across all pages.
    pub items: PaginatedIterator<Value>,
}

impl std::fmt::Debug for PagedResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedResponse")
            .field("envelope", &self.envelope)
            .field("items.len", &self.items.len())
            .field("items.pages", &self.items.pages())
            .finish()
    }
}

/// Client for the Last.fm web service API.
///
/// Translates typed method calls into signed HTTP requests, unwraps the
/// nested JSON envelopes, and stitches multi-page result sets into lazy
/// [`PaginatedIterator`]s.
///
/// The client is cheap to clone; clones share the HTTP transport and the
/// credentials record, so a session key acquired through any clone is
/// visible to all of them.
///
/// # Examples
///
/// ```rust,no_run
/// use lastfm_api::{AsyncPaginatedIterator, ClientConfig, LastFm, Result};
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let http = http_client::native::NativeClient::new();
///     let client = LastFm::new(
///         Box::new(http),
///         ClientConfig::new("api_key", "api_secret"),
///     );
///
///     let mut albums = client.album().search("Seamonsters", Some(10)).await?;
///     while let Some(album) = albums.next().await? {
///         println!("{}", album.name);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct LastFm {
    http: Arc<dyn HttpClient + Send + Sync>,
    api_info: Arc<RwLock<ApiInfo>>,
    authenticator: Arc<Authenticator>,
    username: Option<String>,
}

impl LastFm {
    /// Create a client from explicit settings.
    pub fn new(http: Box<dyn HttpClient + Send + Sync>, config: ClientConfig) -> Self {
        let api_info = ApiInfo::with_base_url(
            &config.api_key,
            &config.api_secret,
            config.url.as_deref().unwrap_or(DEFAULT_URL),
        );
        let authenticator = Authenticator::from_config(&config);

        Self {
            http: Arc::from(http),
            api_info: Arc::new(RwLock::new(api_info)),
            authenticator: Arc::new(authenticator),
            username: config.username,
        }
    }

    /// Create a client from a JSON config file (see [`ClientConfig`]).
    pub fn from_config_file(
        http: Box<dyn HttpClient + Send + Sync>,
        path: impl AsRef<Path>,
    ) -> Result<Self> {
        Ok(Self::new(http, ClientConfig::from_file(path)?))
    }

    /// The username configured for this client, if any.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// A snapshot of the current credentials record.
    pub fn api_info(&self) -> ApiInfo {
        self.api_info.read().expect("api info lock poisoned").clone()
    }

    /// Restore a previously persisted credentials record (including its
    /// session key), replacing the current one.
    pub fn restore_api_info(&self, api_info: ApiInfo) {
        *self.api_info.write().expect("api info lock poisoned") = api_info;
    }

    /// Whether a session key has been acquired.
    pub fn authenticated(&self) -> bool {
        self.api_info().authenticated()
    }

    /// Acquire a session key using the configured authentication method.
    ///
    /// On success the credentials record is replaced by a copy carrying the
    /// session key; the record itself is never mutated in place.
    pub async fn authenticate(&self) -> Result<()> {
        let session_key = self.authenticator.session_key(self).await?;
        let updated = self.api_info().with_session_key(&session_key);
        *self.api_info.write().expect("api info lock poisoned") = updated;
        log::debug!("Session established");
        Ok(())
    }

    /// Sign `params` for a session-required method, authenticating first if
    /// no session key is present yet.
    async fn sign(&self, params: &Params) -> Result<Params> {
        if !self.authenticated() {
            self.authenticate().await?;
        }
        let info = self.api_info();
        Ok(Signer::new(&info).signed(params))
    }

    /// Issue one API request and return the parsed JSON envelope.
    ///
    /// The standard request keys (`api_key`, `method`, `format=json`) are
    /// always added; session-required methods are signed. GET parameters go
    /// in the query string, POST parameters in the form body. When `unwrap`
    /// is given, the envelope under that top-level key is returned instead
    /// of the whole response.
    pub async fn request(
        &self,
        verb: Method,
        method: &str,
        params: Params,
        unwrap: Option<&str>,
    ) -> Result<Value> {
        let info = self.api_info();
        let mut params = params;
        params.set("api_key", info.key());
        params.set("method", method);
        params.set("format", "json");

        let params = if requires_session(method) {
            self.sign(&params).await?
        } else {
            params
        };

        let data = self.send(verb, &params).await?;
        match unwrap {
            Some(key) => match data {
                Value::Object(mut map) => map.remove(key).ok_or_else(|| LastFmError::MissingKey {
                    key: key.to_string(),
                }),
                _ => Err(LastFmError::MissingKey {
                    key: key.to_string(),
                }),
            },
            None => Ok(data),
        }
    }

    /// Send an already-assembled parameter set and parse the response.
    ///
    /// Used by [`request`](Self::request) and by the auth flows, which sign
    /// their own parameters.
    pub(crate) async fn send(&self, verb: Method, params: &Params) -> Result<Value> {
        let info = self.api_info();
        let query = params.query_string();

        let url_str = if verb == Method::Get {
            format!("{}?{}", info.url(), query)
        } else {
            info.url().to_string()
        };
        let url = url_str
            .parse::<Url>()
            .map_err(|e| LastFmError::Http(format!("invalid request URL '{url_str}': {e}")))?;

        let mut request = Request::new(verb, url);
        if verb == Method::Post {
            request.insert_header("Content-Type", "application/x-www-form-urlencoded");
            request.set_body(query);
        }

        log::debug!(
            "{} {} method={}",
            verb,
            info.url(),
            params.get("method").unwrap_or("?")
        );

        let mut response = self
            .http
            .send(request)
            .await
            .map_err(|e| LastFmError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LastFmError::Status {
                code: status.into(),
                reason: status.canonical_reason().to_string(),
            });
        }

        let body = response
            .body_string()
            .await
            .map_err(|e| LastFmError::Http(e.to_string()))?;
        let data: Value =
            serde_json::from_str(&body).map_err(|e| LastFmError::Parse(e.to_string()))?;

        if let Some(error) = data.get("error") {
            let code = error
                .as_i64()
                .or_else(|| error.as_str().and_then(|s| s.parse().ok()))
                .unwrap_or(0);
            let message = data
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(LastFmError::Api { code, message });
        }

        Ok(data)
    }

    /// Issue a paginated request and return the envelope plus a lazy
    /// sequence over the full collection.
    ///
    /// The first page is fetched eagerly so the totals are known up front;
    /// pages `2..=N` are fetched on demand as the sequence is consumed.
    /// When `query.limit` is smaller than the server-reported total, only
    /// `ceil(limit / perpage)` pages are ever requested; the reported
    /// totals still reflect the server's counts.
    pub async fn paginate_request(
        &self,
        verb: Method,
        query: PagedQuery<'_>,
        params: Params,
    ) -> Result<PagedResponse> {
        let perpage = query
            .perpage
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let mut params = params;
        params.set("limit", perpage);

        let mut envelope = self
            .request(verb, query.method, params.clone(), query.unwrap)
            .await?;

        let keys = nested::split_path(query.collection);

        // When a collection is empty the service may omit the key entirely,
        // reporting only total == "0".
        if !nested::contains(&envelope, &keys)
            && envelope.get("total").and_then(Value::as_str) == Some("0")
        {
            log::debug!("{}: empty collection, key absent", query.method);
            return Ok(PagedResponse {
                envelope,
                items: PaginatedIterator::empty(),
            });
        }

        let attrs = query.style.parse(&envelope)?;

        // A zero limit means no limit
        let last_page = match query.limit {
            Some(limit) if limit > 0 && limit < attrs.total => attrs
                .total_pages
                .min(ceildiv(limit, u64::from(perpage)) as u32),
            _ => attrs.total_pages,
        };

        let first_page = ensure_list(nested::take(&mut envelope, &keys)?);
        let fetch = self.page_fetcher(verb, &query, &params);

        Ok(PagedResponse {
            envelope,
            items: PaginatedIterator::new(attrs.total_pages, attrs.total, first_page, last_page, fetch),
        })
    }

    /// Build the fetch callback for pages 2..=N. The closure owns a client
    /// clone and the frozen request parameters, re-issuing the same request
    /// with only `page` varying and extracting the same collection path.
    fn page_fetcher(
        &self,
        verb: Method,
        query: &PagedQuery<'_>,
        params: &Params,
    ) -> PageFetcher<Value> {
        let client = self.clone();
        let method = query.method.to_string();
        let unwrap = query.unwrap.map(str::to_string);
        let collection = query.collection.to_string();
        let params = params.clone();

        Box::new(move |page| {
            let client = client.clone();
            let method = method.clone();
            let unwrap = unwrap.clone();
            let collection = collection.clone();
            let mut params = params.clone();

            Box::pin(async move {
                params.set("page", page);
                let mut envelope = client
                    .request(verb, &method, params, unwrap.as_deref())
                    .await?;
                let keys = nested::split_path(&collection);
                Ok(ensure_list(nested::take(&mut envelope, &keys)?))
            })
        })
    }

    // Resource handles, one per endpoint family.

    pub fn album(&self) -> crate::api::AlbumApi {
        crate::api::AlbumApi::new(self.clone())
    }

    pub fn artist(&self) -> crate::api::ArtistApi {
        crate::api::ArtistApi::new(self.clone())
    }

    pub fn auth(&self) -> crate::api::AuthApi {
        crate::api::AuthApi::new(self.clone())
    }

    pub fn chart(&self) -> crate::api::ChartApi {
        crate::api::ChartApi::new(self.clone())
    }

    pub fn geo(&self) -> crate::api::GeoApi {
        crate::api::GeoApi::new(self.clone())
    }

    pub fn library(&self) -> crate::api::LibraryApi {
        crate::api::LibraryApi::new(self.clone())
    }

    pub fn tag(&self) -> crate::api::TagApi {
        crate::api::TagApi::new(self.clone())
    }

    pub fn track(&self) -> crate::api::TrackApi {
        crate::api::TrackApi::new(self.clone())
    }

    pub fn user(&self) -> crate::api::UserApi {
        crate::api::UserApi::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_session() {
        assert!(requires_session("track.scrobble"));
        assert!(requires_session("track.love"));
        assert!(requires_session("user.shout"));
        assert!(!requires_session("user.getTopAlbums"));
        assert!(!requires_session("album.search"));
    }

    #[test]
    fn test_ensure_list_wraps_bare_values() {
        let bare = serde_json::json!({"name": "only result"});
        assert_eq!(ensure_list(bare.clone()), vec![bare]);

        let list = serde_json::json!([1, 2]);
        assert_eq!(
            ensure_list(list),
            vec![serde_json::json!(1), serde_json::json!(2)]
        );
    }
}
