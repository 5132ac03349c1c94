use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::crawlers::{CandidateSource, CrawlerError, CrawlerResult};
use crate::domain::item::Candidate;
use crate::processing::visual::VisualSample;

/// Candidates recorded in a JSON file, thumbnails stored next to it.
///
/// The file holds an array of candidate objects; an entry that does not
/// describe a candidate fails on its own.
pub struct FixtureSource {
    path: PathBuf,
}

impl FixtureSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn resolve(&self, location: &str) -> PathBuf {
        match self.path.parent() {
            Some(dir) => dir.join(location),
            None => PathBuf::from(location),
        }
    }
}

#[async_trait]
impl CandidateSource for FixtureSource {
    async fn get_candidates(&self) -> Vec<CrawlerResult<Candidate>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("Failed to read fixture {}: {e}", self.path.display());
                return vec![];
            }
        };
        let entries: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                log::error!("Fixture {} is not a JSON array: {e}", self.path.display());
                return vec![];
            }
        };

        entries
            .into_iter()
            .map(|entry| {
                serde_json::from_value(entry).map_err(|e| CrawlerError::Parse(e.to_string()))
            })
            .collect()
    }

    async fn get_thumbnail(&self, location: &str) -> Option<VisualSample> {
        let path = self.resolve(location);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Failed to read thumbnail {}: {e}", path.display());
                return None;
            }
        };
        VisualSample::from_image_bytes(&bytes)
            .map_err(|e| log::warn!("Failed to decode thumbnail {}: {e}", path.display()))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::domain::item::FIELD_TITLE;

    #[tokio::test]
    async fn reads_candidates_and_isolates_broken_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("feed.json");
        fs::write(
            &path,
            r#"[
                {"duration": 12, "fields": {"title": "cute cat", "likes": "150"}},
                {"duration": "long"},
                {"fields": {"title": "second"}, "thumbnail": "missing.png"}
            ]"#,
        )
        .expect("write fixture");
        let source = FixtureSource::new(&path);

        let candidates = source.get_candidates().await;

        assert_eq!(candidates.len(), 3);
        let first = candidates[0].as_ref().expect("first entry parses");
        assert_eq!(first.duration, Some(12));
        assert_eq!(first.fields.get(FIELD_TITLE), Some("cute cat"));
        assert!(matches!(candidates[1], Err(CrawlerError::Parse(_))));
        assert!(candidates[2].is_ok());
        assert!(source.get_thumbnail("missing.png").await.is_none());
    }

    #[tokio::test]
    async fn missing_fixture_yields_no_candidates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = FixtureSource::new(dir.path().join("absent.json"));

        assert!(source.get_candidates().await.is_empty());
    }
}
