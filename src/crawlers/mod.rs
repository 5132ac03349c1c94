use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::item::Candidate;
use crate::processing::visual::VisualSample;

pub mod feed;
pub mod fixture;
pub mod pushed;

#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("failed to build crawler: {0}")]
    Build(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("malformed candidate: {0}")]
    Parse(String),
    #[error("missing field `{0}`")]
    MissingField(&'static str),
}

pub type CrawlerResult<T> = Result<T, CrawlerError>;

/// An extraction backend producing plain [`Candidate`] records.
///
/// Each candidate is extracted independently so that a broken item only
/// fails itself.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Extracts every candidate the source currently exposes.
    async fn get_candidates(&self) -> Vec<CrawlerResult<Candidate>>;

    /// Loads and preprocesses the thumbnail at `location`.
    ///
    /// Any failure yields `None`, which the engine treats as "no visual
    /// score".
    async fn get_thumbnail(&self, location: &str) -> Option<VisualSample>;
}

pub fn build_reqwest_client(timeout: Duration) -> CrawlerResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)")
        .timeout(timeout)
        .build()
        .map_err(|e| CrawlerError::Build(e.to_string()))
}

/// Downloads and preprocesses a thumbnail; failures are logged and yield
/// `None`.
pub async fn download_thumbnail(client: &reqwest::Client, url: &str) -> Option<VisualSample> {
    let res = match client.get(url).send().await.and_then(|res| res.error_for_status()) {
        Ok(res) => res,
        Err(e) => {
            log::warn!("Failed to get thumbnail {url}: {e}");
            return None;
        }
    };
    let bytes = match res.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("Failed to read thumbnail {url}: {e}");
            return None;
        }
    };
    VisualSample::from_image_bytes(&bytes)
        .map_err(|e| log::warn!("Failed to decode thumbnail {url}: {e}"))
        .ok()
}

/// Parses a displayed duration, either `m:ss` or plain seconds.
pub fn parse_duration(text: &str) -> Option<u32> {
    let text = text.trim();
    match text.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: u32 = minutes.trim().parse().ok()?;
            let seconds: u32 = seconds.trim().parse().ok()?;
            minutes.checked_mul(60)?.checked_add(seconds)
        }
        None => text.parse().ok(),
    }
}
