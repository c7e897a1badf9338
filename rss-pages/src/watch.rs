use crate::aggregator::FeedPool;
use crate::config::WatchConfig;
use crate::filter;
use crate::types::{ArticleRecord, PageViewModel};
use tracing::debug;

/// One view-model per keyword that matched anything, in keyword order.
pub fn build_watch(watch: &WatchConfig, pool: &FeedPool) -> Vec<PageViewModel> {
    watch
        .keywords
        .iter()
        .map(|keyword| keyword.trim())
        .filter(|keyword| !keyword.is_empty())
        .filter_map(|keyword| {
            let matches = collect_matches(keyword, &watch.ng_keywords, pool);
            if matches.is_empty() {
                debug!("{}: no matches for {:?}", watch.filename, keyword);
                return None;
            }
            Some(PageViewModel::new(keyword.to_string(), String::new(), matches))
        })
        .collect()
}

/// Every non-banned article in the pool mentioning `keyword` in title or
/// body, newest first. Undated articles go last; ties keep pool order.
pub fn collect_matches<S: AsRef<str>>(
    keyword: &str,
    ng_keywords: &[S],
    pool: &FeedPool,
) -> Vec<ArticleRecord> {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<ArticleRecord> = pool
        .sources()
        .flat_map(|source| source.articles.iter())
        .filter(|article| !filter::is_banned(article, ng_keywords))
        .filter(|article| filter::searchable_text(article).contains(&needle))
        .cloned()
        .collect();

    matches.sort_by(|a, b| {
        (b.published_at.is_some(), b.sort_key).cmp(&(a.published_at.is_some(), a.sort_key))
    });
    matches
}
