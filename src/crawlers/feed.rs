use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tokio::sync::Semaphore;
use url::Url;

use crate::crawlers::{
    CandidateSource, CrawlerError, CrawlerResult, build_reqwest_client, download_thumbnail,
    parse_duration,
};
use crate::domain::item::{
    Candidate, FIELD_COMMENTS, FIELD_DESCRIPTION, FIELD_LIKES, FIELD_TITLE, ObservedItem,
};
use crate::processing::visual::VisualSample;

/// CSS selectors describing the markup of a video feed page.
struct FeedSelectors {
    item: Selector,
    duration: Selector,
    title: Selector,
    description: Selector,
    likes: Selector,
    comments: Selector,
    thumbnail: Selector,
    video: Selector,
}

impl FeedSelectors {
    fn new() -> CrawlerResult<Self> {
        let parse = |css: &str| {
            Selector::parse(css).map_err(|e| CrawlerError::Build(format!("selector {css}: {e}")))
        };
        Ok(Self {
            item: parse(".video-item")?,
            duration: parse(".video-duration")?,
            title: parse(".video-title")?,
            description: parse(".video-desc")?,
            likes: parse(".like-count")?,
            comments: parse(".comment-count")?,
            thumbnail: parse(".video-thumbnail")?,
            video: parse("video")?,
        })
    }
}

/// Crawler for server-rendered video feed pages which limits concurrent HTTP
/// requests using a [`Semaphore`].
pub struct FeedPageCrawler {
    pages: Vec<Url>,
    client: reqwest::Client,
    semaphore: Arc<Semaphore>,
    selectors: FeedSelectors,
}

impl FeedPageCrawler {
    /// Creates a crawler over the given feed page URLs.
    ///
    /// `concurrency` controls how many HTTP requests may be in flight at the
    /// same time, `timeout` bounds every single request.
    pub fn new(pages: &[String], concurrency: usize, timeout: Duration) -> CrawlerResult<Self> {
        let pages = pages
            .iter()
            .map(|page| {
                Url::parse(page).map_err(|e| CrawlerError::Build(format!("{page}: {e}")))
            })
            .collect::<CrawlerResult<Vec<_>>>()?;
        Ok(Self {
            pages,
            client: build_reqwest_client(timeout)?,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
            selectors: FeedSelectors::new()?,
        })
    }

    /// Sends a GET request and fails on non-success statuses.
    ///
    /// A permit from the internal [`Semaphore`] is acquired before issuing
    /// the request, enforcing the configured concurrency limit.
    async fn fetch(&self, url: &Url) -> CrawlerResult<reqwest::Response> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| CrawlerError::Build(e.to_string()))?;
        let res = self.client.get(url.as_str()).send().await?;
        Ok(res.error_for_status()?)
    }

    async fn get_page(&self, url: &Url) -> Vec<CrawlerResult<Candidate>> {
        let text = match self.fetch(url).await {
            Ok(res) => res.text().await,
            Err(e) => {
                log::error!("Failed to get feed page {url}: {e}");
                return vec![];
            }
        };
        match text {
            Ok(text) => parse_feed(&text, url, &self.selectors),
            Err(e) => {
                log::error!("Failed to read feed page {url}: {e}");
                vec![]
            }
        }
    }
}

#[async_trait]
impl CandidateSource for FeedPageCrawler {
    /// Fetches all feed pages concurrently and keeps the first occurrence of
    /// every video.
    async fn get_candidates(&self) -> Vec<CrawlerResult<Candidate>> {
        let tasks = self.pages.iter().map(|page| self.get_page(page));
        let pages = futures::future::join_all(tasks).await;

        let mut seen_videos = HashSet::new();
        pages
            .into_iter()
            .flatten()
            .filter(|candidate| match candidate {
                Ok(Candidate {
                    video_url: Some(url),
                    ..
                }) => seen_videos.insert(url.clone()),
                _ => true,
            })
            .collect()
    }

    async fn get_thumbnail(&self, location: &str) -> Option<VisualSample> {
        let _permit = self.semaphore.acquire().await.ok()?;
        download_thumbnail(&self.client, location).await
    }
}

/// Extracts candidates from a feed page. Relative media URLs are resolved
/// against `base`.
fn parse_feed(html: &str, base: &Url, selectors: &FeedSelectors) -> Vec<CrawlerResult<Candidate>> {
    let document = Html::parse_document(html);
    document
        .select(&selectors.item)
        .map(|item| parse_item(item, base, selectors))
        .collect()
}

fn parse_item(item: ElementRef, base: &Url, selectors: &FeedSelectors) -> CrawlerResult<Candidate> {
    let duration = select_text(item, &selectors.duration).and_then(|text| {
        let parsed = parse_duration(&text);
        if parsed.is_none() {
            log::warn!("Unrecognized video duration {text:?}");
        }
        parsed
    });

    let mut fields = ObservedItem::new();
    for (field, selector) in [
        (FIELD_TITLE, &selectors.title),
        (FIELD_DESCRIPTION, &selectors.description),
        (FIELD_LIKES, &selectors.likes),
        (FIELD_COMMENTS, &selectors.comments),
    ] {
        let value = select_text(item, selector).ok_or(CrawlerError::MissingField(field))?;
        fields.insert(field, value);
    }

    Ok(Candidate {
        duration,
        fields,
        thumbnail: select_url(item, &selectors.thumbnail, base),
        video_url: select_url(item, &selectors.video, base),
    })
}

fn select_text(item: ElementRef, selector: &Selector) -> Option<String> {
    item.select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

fn select_url(item: ElementRef, selector: &Selector, base: &Url) -> Option<String> {
    let src = item.select(selector).next()?.value().attr("src")?;
    Some(base.join(src).ok()?.to_string())
}
