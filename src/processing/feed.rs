use std::time::Duration;

use crate::crawlers::feed::FeedPageCrawler;
use crate::crawlers::fixture::FixtureSource;
use crate::crawlers::pushed::PushedSource;
use crate::crawlers::{CandidateSource, CrawlerResult};
use crate::domain::decision::Decision;
use crate::domain::item::Candidate;
use crate::processing::ZMQMessage;
use crate::processing::fusion::MatchContext;

/// Counters of one processed batch.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub evaluated: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub too_long: usize,
    pub extraction_failed: usize,
    pub visual_scored: usize,
}

impl FeedStats {
    fn record(&mut self, decision: &Decision) {
        self.evaluated += 1;
        match decision {
            Decision::Accepted { .. } => self.accepted += 1,
            Decision::Rejected { .. } => self.rejected += 1,
            Decision::TooLong { .. } => self.too_long += 1,
            Decision::ExtractionFailed(_) => self.extraction_failed += 1,
        }
    }
}

/// Evaluates every candidate of `source` one after another.
///
/// Thumbnails are only fetched for candidates whose decision they can
/// change. Retained candidates are logged with their video URL.
pub async fn process_candidates<S>(source: &S, context: &MatchContext) -> FeedStats
where
    S: CandidateSource + ?Sized,
{
    let mut stats = FeedStats::default();

    for extracted in source.get_candidates().await {
        let decision = evaluate_extracted(extracted, source, context, &mut stats).await;
        stats.record(&decision);
    }

    stats
}

async fn evaluate_extracted<S>(
    extracted: CrawlerResult<Candidate>,
    source: &S,
    context: &MatchContext,
    stats: &mut FeedStats,
) -> Decision
where
    S: CandidateSource + ?Sized,
{
    let candidate = match extracted {
        Ok(candidate) => candidate,
        Err(e) => {
            log::warn!("Failed to extract candidate: {e}");
            return Decision::ExtractionFailed(e.to_string());
        }
    };

    let sample = match &candidate.thumbnail {
        Some(location) if context.wants_thumbnail(&candidate) => {
            source.get_thumbnail(location).await
        }
        _ => None,
    };
    if sample.is_some() {
        stats.visual_scored += 1;
    }

    let decision = context.evaluate(&candidate, sample.as_ref());
    let video = candidate.video_url.as_deref().unwrap_or("<unknown>");
    if decision.is_accepted() {
        log::info!("Retaining video {video}: {decision}");
    } else {
        log::debug!("Skipping video {video}: {decision}");
    }
    decision
}

/// Handles one service message and logs a summary of the batch.
pub async fn process_feed_message(
    msg: ZMQMessage,
    context: &MatchContext,
    concurrency: usize,
    timeout: Duration,
) {
    log::info!("Received feed message: {msg}");

    let stats = match msg {
        ZMQMessage::Feed(pages) => match FeedPageCrawler::new(&pages, concurrency, timeout) {
            Ok(crawler) => process_candidates(&crawler, context).await,
            Err(e) => {
                log::error!("Failed to build feed crawler: {e}");
                return;
            }
        },
        ZMQMessage::Fixture(path) => process_candidates(&FixtureSource::new(path), context).await,
        ZMQMessage::Candidates(candidates) => match PushedSource::new(candidates, timeout) {
            Ok(source) => process_candidates(&source, context).await,
            Err(e) => {
                log::error!("Failed to build thumbnail client: {e}");
                return;
            }
        },
    };

    log::info!(
        "Finished feed message: evaluated={}, accepted={}, rejected={}, too_long={}, extraction_failed={}, visual_scored={}",
        stats.evaluated,
        stats.accepted,
        stats.rejected,
        stats.too_long,
        stats.extraction_failed,
        stats.visual_scored
    );
}
