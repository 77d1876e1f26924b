//! Dotted-path access into nested JSON envelopes.
//!
//! Last.fm buries the interesting collection 1-3 levels deep inside each
//! response envelope (e.g. `albummatches.album` inside `results`). These
//! helpers treat a dotted path as a key sequence and get/set/check values
//! at that location. Intermediate containers are never created implicitly:
//! an absent key is a [`LastFmError::MissingKey`], because an envelope with
//! an unexpected shape is a defect rather than a recoverable condition.

use crate::{LastFmError, Result};
use serde_json::Value;

/// Split a dotted path into its key sequence.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('.').collect()
}

fn missing(keys: &[&str], depth: usize) -> LastFmError {
    LastFmError::MissingKey {
        key: keys[..=depth].join("."),
    }
}

/// Descend into `data` key by key and return a reference to the value at
/// the end of the path.
///
/// Fails with [`LastFmError::MissingKey`] when a key is absent at any
/// depth, or when an intermediate value is not an object. Callers that
/// want a default use `get(..).ok()` and `unwrap_or` at the call site.
pub fn get<'a>(data: &'a Value, keys: &[&str]) -> Result<&'a Value> {
    let mut current = data;
    for (depth, key) in keys.iter().enumerate() {
        current = current
            .as_object()
            .and_then(|map| map.get(*key))
            .ok_or_else(|| missing(keys, depth))?;
    }
    Ok(current)
}

/// Assign `value` at the end of the path.
///
/// Descends to the second-to-last key, which must already exist and be an
/// object; intermediate containers are not auto-created. The final key is
/// inserted or overwritten. An empty path is an
/// [`LastFmError::InvalidArgument`].
pub fn set(data: &mut Value, keys: &[&str], value: Value) -> Result<()> {
    let (last, parents) = keys
        .split_last()
        .ok_or_else(|| LastFmError::InvalidArgument("empty key path".to_string()))?;

    let mut current = data;
    for (depth, key) in parents.iter().enumerate() {
        current = current
            .as_object_mut()
            .and_then(|map| map.get_mut(*key))
            .ok_or_else(|| missing(keys, depth))?;
    }

    current
        .as_object_mut()
        .ok_or_else(|| missing(keys, keys.len() - 1))?
        .insert((*last).to_string(), value);
    Ok(())
}

/// Move the value at the end of the path out of `data`, leaving `null`
/// behind.
///
/// Same descent and failure behavior as [`get`]; the rest of the structure
/// is untouched.
pub fn take(data: &mut Value, keys: &[&str]) -> Result<Value> {
    let mut current = data;
    for (depth, key) in keys.iter().enumerate() {
        current = current
            .as_object_mut()
            .and_then(|map| map.get_mut(*key))
            .ok_or_else(|| missing(keys, depth))?;
    }
    Ok(current.take())
}

/// Whether the full path resolves. Never fails; any missing key or
/// non-object intermediate yields `false`.
pub fn contains(data: &Value, keys: &[&str]) -> bool {
    get(data, keys).is_ok()
}
