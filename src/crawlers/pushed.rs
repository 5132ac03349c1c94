use std::time::Duration;

use async_trait::async_trait;

use crate::crawlers::{CandidateSource, CrawlerResult, build_reqwest_client, download_thumbnail};
use crate::domain::item::Candidate;
use crate::processing::visual::VisualSample;

/// Candidates extracted elsewhere and pushed to the service as-is.
///
/// Thumbnail locations are fetched over HTTP.
pub struct PushedSource {
    candidates: Vec<Candidate>,
    client: reqwest::Client,
}

impl PushedSource {
    pub fn new(candidates: Vec<Candidate>, timeout: Duration) -> CrawlerResult<Self> {
        Ok(Self {
            candidates,
            client: build_reqwest_client(timeout)?,
        })
    }
}

#[async_trait]
impl CandidateSource for PushedSource {
    async fn get_candidates(&self) -> Vec<CrawlerResult<Candidate>> {
        self.candidates.iter().cloned().map(Ok).collect()
    }

    async fn get_thumbnail(&self, location: &str) -> Option<VisualSample> {
        download_thumbnail(&self.client, location).await
    }
}
