use chrono::{DateTime, Utc};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Request parameters for a Last.fm API call.
///
/// An unordered mapping from string keys to scalar values. Keys are unique;
/// inserting a key twice keeps the last value. Iteration is always in
/// ascending key order, which is what the signature algorithm requires.
///
/// Optional values are handled at the insertion boundary: [`Params::opt`]
/// drops `None` outright, so a "null" parameter can never reach the
/// signature material or the wire.
///
/// # Examples
///
/// ```rust
/// use lastfm_api::Params;
///
/// let params = Params::new()
///     .put("artist", "Radiohead")
///     .put("limit", 50)
///     .opt("mbid", None::<String>);
///
/// assert!(params.contains("artist"));
/// assert!(!params.contains("mbid"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key/value pair, consuming and returning `self` for chaining.
    pub fn put(mut self, key: &str, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Insert a key/value pair only when the value is present.
    pub fn opt(mut self, key: &str, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.set(key, value);
        }
        self
    }

    /// Insert a key/value pair in place.
    pub fn set(&mut self, key: &str, value: impl ToString) {
        self.0.insert(key.to_string(), value.to_string());
    }

    /// Remove a key, returning its previous value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as an `application/x-www-form-urlencoded` string, suitable for
    /// a GET query string or a POST body.
    pub fn query_string(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Convert an optional datetime to the Unix-timestamp string the API
/// expects for `from`/`to`/`start`/`end` parameters.
pub fn query_date(date: Option<DateTime<Utc>>) -> Option<i64> {
    date.map(|d| d.timestamp())
}
