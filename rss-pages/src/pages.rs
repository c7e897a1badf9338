use crate::aggregator::FeedPool;
use crate::config::PageConfig;
use crate::filter;
use crate::types::PageViewModel;
use tracing::debug;

/// One view-model per listed source that was fetched, in config order.
///
/// Sources missing from the pool (failed or never requested) are skipped.
/// A source whose articles are all filtered out still appears, empty.
pub fn build_page(page: &PageConfig, pool: &FeedPool) -> Vec<PageViewModel> {
    page.feeds
        .iter()
        .filter_map(|feed| {
            let source = pool.get(&feed.url);
            if source.is_none() {
                debug!("{}: no data for {}", page.filename, feed.url.trim());
            }
            source
        })
        .map(|source| {
            let articles = filter::retain_allowed(&source.articles, &page.ng_keywords);
            PageViewModel::new(source.title.clone(), source.favicon_url.clone(), articles)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{collect_requests, FeedAggregator};
    use crate::config::FeedConfig;
    use crate::error::FetchError;
    use crate::traits::FeedSource;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use interfaces::{FeedDocument, FeedEntry};
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap()
    }

    struct OneEntrySource;

    #[async_trait]
    impl FeedSource for OneEntrySource {
        async fn fetch(&self, url: &str) -> Result<FeedDocument, FetchError> {
            if url.contains("broken") {
                return Err(FetchError::Status { status: 500 });
            }
            Ok(FeedDocument {
                title: Some("Only Feed".to_string()),
                link: None,
                entries: vec![
                    FeedEntry {
                        title: Some("Fresh post".to_string()),
                        published: Some(now() - Duration::hours(2)),
                        ..Default::default()
                    },
                    FeedEntry {
                        title: Some("Old sponsored post".to_string()),
                        published: Some(now() - Duration::days(3)),
                        ..Default::default()
                    },
                ],
                soft_error: None,
            })
        }
    }

    fn page_config(urls: &[&str], ng: &[&str]) -> PageConfig {
        PageConfig {
            page_title: "Page".to_string(),
            filename: "index.html".to_string(),
            feeds: urls
                .iter()
                .map(|u| FeedConfig {
                    url: u.to_string(),
                    title: None,
                })
                .collect(),
            ng_keywords: ng.iter().map(|k| k.to_string()).collect(),
        }
    }

    async fn pool_for(page: &PageConfig) -> FeedPool {
        let aggregator = FeedAggregator::new(Arc::new(OneEntrySource), 10);
        aggregator
            .fetch_all(&collect_requests(std::slice::from_ref(page)), now())
            .await
    }

    #[tokio::test]
    async fn test_counts_and_order() {
        let page = page_config(&["https://a.example.com/feed"], &[]);
        let pool = pool_for(&page).await;

        let models = build_page(&page, &pool);

        assert_eq!(models.len(), 1);
        let model = &models[0];
        assert_eq!(model.title, "Only Feed");
        assert_eq!(model.total_count, 2);
        assert_eq!(model.new_count, 1);
        assert!(model.has_new);
        assert_eq!(model.articles[0].title, "Fresh post");
        assert_eq!(model.articles[0].relative_time, "2 hours ago");
    }

    #[tokio::test]
    async fn test_ng_keywords_and_missing_sources() {
        let page = page_config(
            &["https://broken.example.com/feed", " https://a.example.com/feed "],
            &["SPONSORED"],
        );
        let pool = pool_for(&page).await;

        let models = build_page(&page, &pool);

        assert_eq!(models.len(), 1);
        assert_eq!(models[0].total_count, 1);
        assert_eq!(models[0].articles[0].title, "Fresh post");
    }

    #[tokio::test]
    async fn test_fully_filtered_source_stays_empty() {
        let page = page_config(&["https://a.example.com/feed"], &["post"]);
        let pool = pool_for(&page).await;

        let models = build_page(&page, &pool);

        assert_eq!(models.len(), 1);
        assert_eq!(models[0].total_count, 0);
        assert_eq!(models[0].new_count, 0);
        assert!(!models[0].has_new);
    }
}
