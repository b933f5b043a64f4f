//! Record types for the catalog.
//!
//! Three persisted records: [`User`], [`MediaEntry`] and [`MediaComment`].
//! Each has a strict creation document (`New*`) that rejects unknown
//! fields, and a constructor that validates it and fills every declared
//! default, so a freshly created record is complete before it ever
//! reaches the database.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod comment;
pub mod files;
pub mod media;
pub mod user;

pub use comment::{MediaComment, NewMediaComment};
pub use files::{FilePath, MediaFileMap, DISPLAY_FETCH_ORDER};
pub use media::{
    AudioData, ImageData, MediaData, MediaEntry, MediaType, NewMediaEntry, ProcessingState,
    VideoData,
};
pub use user::{AccountStatus, NewUser, User};

/// Open extension data: string keys mapping to arbitrary JSON values.
///
/// Plugins and media-type pipelines park their state here without schema
/// changes. Values round-trip untouched; this layer never interprets them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionMap(BTreeMap<String, serde_json::Value>);

impl ExtensionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.0.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.0.remove(key)
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

    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extension_map_round_trips_arbitrary_values() {
        let mut ext = ExtensionMap::new();
        ext.set("exif", json!({"Model": "Holga", "ISO": 400}));
        ext.set("gps", json!([52.5, 13.4]));

        let encoded = serde_json::to_value(&ext).expect("should serialize");
        assert_eq!(encoded, json!({"exif": {"Model": "Holga", "ISO": 400}, "gps": [52.5, 13.4]}));

        let decoded: ExtensionMap = serde_json::from_value(encoded).expect("should deserialize");
        assert_eq!(decoded, ext);
    }

    #[test]
    fn test_extension_map_serializes_as_plain_object() {
        // Transparent wrapper: an empty map is `{}`, not a wrapped struct.
        let encoded = serde_json::to_string(&ExtensionMap::new()).expect("should serialize");
        assert_eq!(encoded, "{}");
    }

    #[test]
    fn test_extension_map_accessors() {
        let mut ext = ExtensionMap::new();
        assert!(ext.is_empty());

        ext.set("k", json!(1));
        assert!(ext.contains("k"));
        assert_eq!(ext.get("k"), Some(&json!(1)));
        assert_eq!(ext.len(), 1);

        assert_eq!(ext.remove("k"), Some(json!(1)));
        assert!(ext.is_empty());
    }

    #[test]
    fn test_extension_map_iterates_in_key_order() {
        // Sorted keys keep the serialized form stable across runs.
        let mut ext = ExtensionMap::new();
        ext.set("zebra", json!(1));
        ext.set("alpha", json!(2));

        let keys: Vec<&str> = ext.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["alpha", "zebra"]);
    }
}
