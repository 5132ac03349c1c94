use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const FIELD_TITLE: &str = "title";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_LIKES: &str = "likes";
pub const FIELD_COMMENTS: &str = "comments";

/// Raw observable fields of a candidate, keyed like [`ReferenceProfile`].
///
/// Counts stay string-encoded exactly as extracted (`"1,204"`); parsing is
/// the scorer's business.
///
/// [`ReferenceProfile`]: crate::domain::profile::ReferenceProfile
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservedItem(BTreeMap<String, String>);

impl ObservedItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: impl Into<String>) {
        self.0.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ObservedItem {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// One extracted video post handed to the matching engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Duration in seconds when the page exposed one.
    #[serde(default)]
    pub duration: Option<u32>,
    pub fields: ObservedItem,
    /// Thumbnail location, an URL or a local path depending on the source.
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}
