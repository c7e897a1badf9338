use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    /// Entries kept per feed, in document order.
    pub max_entries: usize,
    pub max_feed_size_mb: usize,
    pub follow_redirects: bool,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!(
                "Mozilla/5.0 (compatible; rss-pages/",
                env!("CARGO_PKG_VERSION"),
                "; +static feed reader)"
            )
            .to_string(),
            timeout_seconds: 15,
            max_entries: 10,
            max_feed_size_mb: 10,
            follow_redirects: true,
            max_redirects: 5,
        }
    }
}

/// One normalized feed entry, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleRecord {
    pub title: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
    pub is_new: bool,
    pub relative_time: String,
    pub body: String,
    pub thumbnail: Option<String>,
    pub source_title: String,
    /// Epoch seconds of `published_at`, 0 when undated.
    pub sort_key: i64,
}

/// One fetched and normalized feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFeedResult {
    pub feed_url: String,
    pub title: String,
    pub site_link: Option<String>,
    pub favicon_url: String,
    pub articles: Vec<ArticleRecord>,
}

/// What a template sees for one source block or one watch keyword.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageViewModel {
    pub title: String,
    pub favicon_url: String,
    pub has_new: bool,
    pub total_count: usize,
    pub new_count: usize,
    pub articles: Vec<ArticleRecord>,
}

impl PageViewModel {
    pub fn new(title: String, favicon_url: String, articles: Vec<ArticleRecord>) -> Self {
        let new_count = articles.iter().filter(|a| a.is_new).count();
        Self {
            title,
            favicon_url,
            has_new: new_count > 0,
            total_count: articles.len(),
            new_count,
            articles,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Page,
    Watch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub page_title: String,
    pub filename: String,
    pub kind: PageKind,
}

/// A feed URL to fetch, with the first title override seen for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub url: String,
    pub title_override: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub pages_written: usize,
    pub feeds_fetched: usize,
    pub feeds_failed: usize,
}
