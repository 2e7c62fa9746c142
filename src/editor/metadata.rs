//! The metadata mapping and the pure operations on it.
//!
//! Parquet stores footer metadata as a list of byte-string pairs. The Arrow
//! reader exposes it as the schema's `HashMap<String, String>`; this module
//! converts to and from a sorted map so tabs keep a stable order between frames
//! and between runs.

use crate::error::{EditorError, Result};
use std::collections::{BTreeMap, HashMap};

/// Footer key holding the serialized Arrow schema. Written by the Arrow writer
/// itself, so it is never offered for editing.
pub const ARROW_SCHEMA_KEY: &str = "ARROW:schema";

/// Flat string-to-string metadata, iterated in key order.
pub type MetadataMap = BTreeMap<String, String>;

/// Builds a [`MetadataMap`] from Arrow schema metadata, dropping reserved keys.
pub fn from_schema_metadata(schema_metadata: &HashMap<String, String>) -> MetadataMap {
    schema_metadata
        .iter()
        .filter(|(key, _)| !is_reserved(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Converts a [`MetadataMap`] back to the shape Arrow schemas carry.
pub fn to_schema_metadata(metadata: &MetadataMap) -> HashMap<String, String> {
    metadata
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

pub fn is_reserved(key: &str) -> bool {
    key == ARROW_SCHEMA_KEY
}

pub fn get<'a>(metadata: &'a MetadataMap, key: &str) -> Option<&'a str> {
    metadata.get(key).map(String::as_str)
}

/// Inserts or overwrites `key`. Returns the previous value, if any.
pub fn put(
    metadata: &mut MetadataMap,
    key: impl Into<String>,
    value: impl Into<String>,
) -> Option<String> {
    metadata.insert(key.into(), value.into())
}

/// Inserts `key` only when absent. Returns whether the map changed.
pub fn add_key(metadata: &mut MetadataMap, key: &str, value: impl Into<String>) -> bool {
    if metadata.contains_key(key) {
        return false;
    }
    metadata.insert(key.to_owned(), value.into());
    true
}

/// Removes `key`, returning its value if it was present.
pub fn remove_key(metadata: &mut MetadataMap, key: &str) -> Option<String> {
    metadata.remove(key)
}

/// Checks a key typed by the user before it is added.
///
/// Surrounding whitespace is trimmed and the trimmed key is returned.
///
/// # Errors
///
/// `InvalidKey` for empty or reserved keys, `DuplicateKey` if the key exists.
pub fn validate_new_key(metadata: &MetadataMap, key: &str) -> Result<String> {
    let key = key.trim();
    if key.is_empty() {
        return Err(EditorError::InvalidKey("key must not be empty".to_owned()));
    }
    if is_reserved(key) {
        return Err(EditorError::InvalidKey(format!(
            "'{key}' is reserved by the Parquet writer"
        )));
    }
    if metadata.contains_key(key) {
        return Err(EditorError::DuplicateKey(key.to_owned()));
    }
    Ok(key.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MetadataMap {
        let mut m = MetadataMap::new();
        put(&mut m, "author", "ada");
        put(&mut m, "source", "sensor-7");
        m
    }

    #[test]
    fn test_put_overwrites_existing_key() {
        let mut m = sample();
        let previous = put(&mut m, "author", "grace");
        assert_eq!(previous.as_deref(), Some("ada"));
        assert_eq!(get(&m, "author"), Some("grace"));
        assert_eq!(m.len(), 2, "overwrite must not add an entry");
    }

    #[test]
    fn test_add_key_keeps_existing_value() {
        let mut m = sample();
        assert!(!add_key(&mut m, "author", ""));
        assert_eq!(get(&m, "author"), Some("ada"));

        assert!(add_key(&mut m, "license", ""));
        assert_eq!(get(&m, "license"), Some(""));
    }

    #[test]
    fn test_remove_key() {
        let mut m = sample();
        assert_eq!(remove_key(&mut m, "source").as_deref(), Some("sensor-7"));
        assert_eq!(remove_key(&mut m, "source"), None);
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_iteration_order_is_sorted() {
        let mut m = MetadataMap::new();
        put(&mut m, "zeta", "1");
        put(&mut m, "alpha", "2");
        put(&mut m, "mid", "3");
        let keys: Vec<&str> = m.keys().map(String::as_str).collect();
        assert_eq!(keys, ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_schema_conversion_drops_arrow_schema() {
        let mut raw = HashMap::new();
        raw.insert(ARROW_SCHEMA_KEY.to_owned(), "base64...".to_owned());
        raw.insert("pandas".to_owned(), "{}".to_owned());

        let m = from_schema_metadata(&raw);
        assert_eq!(m.len(), 1);
        assert_eq!(get(&m, "pandas"), Some("{}"));

        let back = to_schema_metadata(&m);
        assert!(!back.contains_key(ARROW_SCHEMA_KEY));
    }

    #[test]
    fn test_validate_new_key() {
        let m = sample();
        assert_eq!(validate_new_key(&m, "  owner ").ok().as_deref(), Some("owner"));
        assert!(matches!(
            validate_new_key(&m, "author"),
            Err(EditorError::DuplicateKey(_))
        ));
        assert!(matches!(
            validate_new_key(&m, "   "),
            Err(EditorError::InvalidKey(_))
        ));
        assert!(matches!(
            validate_new_key(&m, ARROW_SCHEMA_KEY),
            Err(EditorError::InvalidKey(_))
        ));
    }
}
