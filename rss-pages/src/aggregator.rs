use crate::config::PageConfig;
use crate::normalizer;
use crate::rss_utils::url::{favicon_url, is_valid_feed_url, normalize_feed_url};
use crate::traits::FeedSource;
use crate::types::{FeedRequest, SourceFeedResult};
use chrono::{DateTime, Utc};
use interfaces::FeedDocument;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const UNKNOWN_FEED_TITLE: &str = "Unknown Feed";

/// Every fetched feed of one build, keyed by trimmed URL.
///
/// Built once by [`FeedAggregator::fetch_all`] and read-only afterwards.
/// Iteration follows the order in which URLs were first requested.
#[derive(Debug, Default)]
pub struct FeedPool {
    entries: Vec<(String, Option<SourceFeedResult>)>,
    index: HashMap<String, usize>,
}

impl FeedPool {
    /// Successful result for a URL; `None` when it failed or was never requested.
    pub fn get(&self, url: &str) -> Option<&SourceFeedResult> {
        self.index
            .get(&normalize_feed_url(url))
            .and_then(|&i| self.entries[i].1.as_ref())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(&normalize_feed_url(url))
    }

    /// Successfully fetched sources, in request order.
    pub fn sources(&self) -> impl Iterator<Item = &SourceFeedResult> {
        self.entries.iter().filter_map(|(_, result)| result.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fetched_count(&self) -> usize {
        self.sources().count()
    }

    pub fn failed_count(&self) -> usize {
        self.len() - self.fetched_count()
    }

    fn insert(&mut self, url: String, result: Option<SourceFeedResult>) {
        if self.index.contains_key(&url) {
            return;
        }
        self.index.insert(url.clone(), self.entries.len());
        self.entries.push((url, result));
    }
}

/// Feed URLs referenced by the given pages, trimmed and deduplicated in
/// first-seen order. The first non-empty title override for a URL wins.
pub fn collect_requests(pages: &[PageConfig]) -> Vec<FeedRequest> {
    let mut requests: Vec<FeedRequest> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for feed in pages.iter().flat_map(|page| page.feeds.iter()) {
        let url = normalize_feed_url(&feed.url);
        if url.is_empty() {
            warn!("Skipping feed with empty URL");
            continue;
        }
        let title_override = feed
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        match positions.get(&url) {
            Some(&i) => {
                if requests[i].title_override.is_none() {
                    requests[i].title_override = title_override;
                }
            }
            None => {
                if !is_valid_feed_url(&url) {
                    warn!("Feed URL {} is not http(s); fetching it will fail", url);
                }
                positions.insert(url.clone(), requests.len());
                requests.push(FeedRequest { url, title_override });
            }
        }
    }

    requests
}

/// Fetches each requested feed exactly once and normalizes its entries.
pub struct FeedAggregator {
    source: Arc<dyn FeedSource>,
    max_entries: usize,
}

impl FeedAggregator {
    pub fn new(source: Arc<dyn FeedSource>, max_entries: usize) -> Self {
        Self {
            source,
            max_entries,
        }
    }

    /// Fetch sequentially. A failing URL is logged and recorded as `None`;
    /// it never stops the others.
    pub async fn fetch_all(&self, requests: &[FeedRequest], now: DateTime<Utc>) -> FeedPool {
        let mut pool = FeedPool::default();

        for request in requests {
            let url = normalize_feed_url(&request.url);
            if url.is_empty() || pool.contains(&url) {
                continue;
            }

            info!("Fetching: {}", url);
            let result = match self.source.fetch(&url).await {
                Ok(document) => {
                    if let Some(soft_error) = &document.soft_error {
                        warn!("Feed {} parsed with recoverable errors: {}", url, soft_error);
                    }
                    Some(self.build_source(&url, request.title_override.as_deref(), document, now))
                }
                Err(e) => {
                    error!("Error fetching {}: {}", url, e);
                    None
                }
            };
            pool.insert(url, result);
        }

        info!(
            "Fetched {} feeds ({} failed)",
            pool.fetched_count(),
            pool.failed_count()
        );
        pool
    }

    fn build_source(
        &self,
        url: &str,
        title_override: Option<&str>,
        document: FeedDocument,
        now: DateTime<Utc>,
    ) -> SourceFeedResult {
        let title = resolve_title(title_override, document.title.as_deref());
        let favicon = favicon_url(document.link.as_deref(), url);

        let articles = document
            .entries
            .iter()
            .take(self.max_entries)
            .map(|entry| normalizer::normalize(entry, &title, now))
            .collect();

        SourceFeedResult {
            feed_url: url.to_string(),
            title,
            site_link: document.link,
            favicon_url: favicon,
            articles,
        }
    }
}

/// Override, then the document's own title, then a fallback literal.
pub fn resolve_title(title_override: Option<&str>, document_title: Option<&str>) -> String {
    [title_override, document_title]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .unwrap_or(UNKNOWN_FEED_TITLE)
        .to_string()
}
