//! File records: logical storage paths for the files behind an entry.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Size labels tried, in order, when picking a file to display.
pub const DISPLAY_FETCH_ORDER: &[&str] = &["medium", "original", "thumb"];

/// A storage path, kept as the segment sequence the file store understands.
///
/// Segments are joined by the storage backend, not here; `Display` joins
/// with `/` for logs only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilePath(Vec<String>);

impl FilePath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilePath(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

/// Mapping from size label ("original", "thumb", ...) to the stored file
/// for that size. Labels are open-ended; the processing pipeline decides
/// what it writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaFileMap(BTreeMap<String, FilePath>);

impl MediaFileMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, size: impl Into<String>, path: FilePath) {
        self.0.insert(size.into(), path);
    }

    pub fn get(&self, size: &str) -> Option<&FilePath> {
        self.0.get(size)
    }

    pub fn contains(&self, size: &str) -> bool {
        self.0.contains_key(size)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Picks the file to display for this map.
    ///
    /// Walks `fetch_order` and returns the first (size label, path) pair
    /// present. The order given is the priority order, so there are no
    /// ties; an empty order or a map with none of the labels yields
    /// `None`.
    pub fn pick_display<S>(&self, fetch_order: &[S]) -> Option<(&str, &FilePath)>
    where
        S: AsRef<str>,
    {
        for size in fetch_order {
            if let Some((label, path)) = self.0.get_key_value(size.as_ref()) {
                return Some((label.as_str(), path));
            }
        }
        None
    }
}
