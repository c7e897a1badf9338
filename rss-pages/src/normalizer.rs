use crate::rss_utils::time;
use crate::types::ArticleRecord;
use chrono::{DateTime, Utc};
use interfaces::FeedEntry;
use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_TITLE: &str = "No Title";
pub const DEFAULT_LINK: &str = "#";

static INLINE_IMG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*?\ssrc\s*=\s*(?:"([^"]+)"|'([^']+)')"#).expect("inline image pattern")
});

/// Turn one raw entry into a display record.
///
/// Never fails: every missing field falls back to a default. `now` must be
/// the build time shared by the whole run so that `is_new` and
/// `relative_time` agree across pages.
pub fn normalize(entry: &FeedEntry, source_title: &str, now: DateTime<Utc>) -> ArticleRecord {
    let published_at = resolve_published(entry);

    let (is_new, relative_time, sort_key) = match published_at {
        Some(published) => (
            time::is_within_novelty_window(published, now),
            time::relative_label(now.signed_duration_since(published)),
            published.timestamp(),
        ),
        None => (false, String::new(), 0),
    };

    ArticleRecord {
        title: non_blank(entry.title.as_deref()).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        link: non_blank(entry.link.as_deref()).unwrap_or_else(|| DEFAULT_LINK.to_string()),
        published_at,
        is_new,
        relative_time,
        body: select_body(entry).to_string(),
        thumbnail: extract_thumbnail(entry),
        source_title: source_title.to_string(),
        sort_key,
    }
}

/// Structured published, then structured updated, then the raw strings.
pub fn resolve_published(entry: &FeedEntry) -> Option<DateTime<Utc>> {
    entry
        .published
        .or(entry.updated)
        .or_else(|| entry.published_raw.as_deref().and_then(time::parse_feed_date))
        .or_else(|| entry.updated_raw.as_deref().and_then(time::parse_feed_date))
}

fn summary_text(entry: &FeedEntry) -> &str {
    entry
        .summary
        .as_deref()
        .or(entry.description.as_deref())
        .unwrap_or("")
}

fn content_text(entry: &FeedEntry) -> &str {
    entry.content.first().map(|c| c.value.as_str()).unwrap_or("")
}

/// The longer of content and summary, counted in characters. This is a
/// length heuristic only; a markup-heavy content block beats a clean but
/// shorter summary.
pub fn select_body(entry: &FeedEntry) -> &str {
    let summary = summary_text(entry);
    let content = content_text(entry);

    if content.chars().count() > summary.chars().count() {
        content
    } else {
        summary
    }
}

/// First image found, in order: image media content, media thumbnail,
/// image enclosure link, inline `<img>` in summary + content.
pub fn extract_thumbnail(entry: &FeedEntry) -> Option<String> {
    media_content_image(entry)
        .or_else(|| media_thumbnail(entry))
        .or_else(|| enclosure_image(entry))
        .or_else(|| inline_image(entry))
}

fn media_content_image(entry: &FeedEntry) -> Option<String> {
    entry
        .media_content
        .iter()
        .filter(|media| {
            let typed_image = media
                .content_type
                .as_deref()
                .is_some_and(|t| t.contains("image"));
            let medium_image = media.medium.as_deref() == Some("image");
            typed_image || medium_image
        })
        .find_map(|media| non_blank(media.url.as_deref()))
}

fn media_thumbnail(entry: &FeedEntry) -> Option<String> {
    entry
        .media_thumbnail
        .first()
        .and_then(|thumb| non_blank(thumb.url.as_deref()))
}

fn enclosure_image(entry: &FeedEntry) -> Option<String> {
    entry
        .links
        .iter()
        .filter(|link| {
            link.rel.as_deref() == Some("enclosure")
                && link
                    .content_type
                    .as_deref()
                    .is_some_and(|t| t.contains("image"))
        })
        .find_map(|link| non_blank(link.href.as_deref()))
}

fn inline_image(entry: &FeedEntry) -> Option<String> {
    let haystack = format!("{}{}", summary_text(entry), content_text(entry));
    INLINE_IMG.captures(&haystack).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .and_then(|m| non_blank(Some(m.as_str())))
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
