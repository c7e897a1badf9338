use crate::error::FetchError;
use feed_rs::model::{Entry, Feed, Link};
use feed_rs::parser;
use interfaces::{EntryContent, EntryLink, FeedDocument, FeedEntry, MediaContent, MediaThumbnail};
use tracing::{debug, warn};

/// Converts raw feed bytes into the `interfaces` document model.
pub struct FeedParser;

impl FeedParser {
    /// Parse a feed body. A body cut off after complete items is repaired
    /// and comes back as `Ok` with `soft_error` set; anything else unreadable
    /// is a hard `Parse` error.
    pub fn parse_document(content: &[u8]) -> Result<FeedDocument, FetchError> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let first_error = match parser::parse(content) {
            Ok(feed) => return Ok(Self::convert_feed(feed, None)),
            Err(e) => e.to_string(),
        };

        if let Some(repaired) = Self::close_after_last_item(content) {
            if let Ok(feed) = parser::parse(repaired.as_bytes()) {
                warn!("Recovered feed after parse error: {}", first_error);
                return Ok(Self::convert_feed(feed, Some(first_error)));
            }
        }

        let hint = if Self::is_valid_feed_content(&String::from_utf8_lossy(content)) {
            ""
        } else {
            " (body does not look like RSS/Atom)"
        };
        Err(FetchError::Parse(format!("{}{}", first_error, hint)))
    }

    /// Cut the body after its last complete `</item>` or `</entry>` and close
    /// the root element again. `None` when there is no complete entry or no
    /// recognizable root.
    pub fn close_after_last_item(content: &[u8]) -> Option<String> {
        let text = String::from_utf8_lossy(content);
        // ASCII lowercasing keeps byte offsets aligned with `text`.
        let lower = text.to_ascii_lowercase();

        let end = ["</item>", "</entry>"]
            .iter()
            .filter_map(|tag| lower.rfind(tag).map(|pos| pos + tag.len()))
            .max()?;

        let closing = [
            ("<rss", "</channel></rss>"),
            ("<rdf:rdf", "</rdf:RDF>"),
            ("<feed", "</feed>"),
        ]
        .iter()
        .filter_map(|(open, close)| lower.find(open).map(|pos| (pos, *close)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, close)| close)?;

        Some(format!("{}{}", &text[..end], closing))
    }

    pub fn is_valid_feed_content(content: &str) -> bool {
        let content_lower = content.to_lowercase();

        content_lower.contains("<rss")
            || content_lower.contains("<feed")
            || content_lower.contains("<rdf:rdf")
            || content_lower.contains("<channel")
    }

    fn convert_feed(feed: Feed, soft_error: Option<String>) -> FeedDocument {
        let link = Self::primary_link(&feed.links);
        let entries = feed.entries.into_iter().map(Self::convert_entry).collect();

        FeedDocument {
            title: feed.title.map(|t| t.content),
            link,
            entries,
            soft_error,
        }
    }

    fn convert_entry(entry: Entry) -> FeedEntry {
        let link = Self::primary_link(&entry.links);

        let content = entry
            .content
            .and_then(|c| c.body)
            .map(|value| vec![EntryContent { value }])
            .unwrap_or_default();

        let mut media_content = Vec::new();
        let mut media_thumbnail = Vec::new();
        for object in entry.media {
            media_content.extend(object.content.into_iter().map(|c| MediaContent {
                url: c.url.map(|u| u.to_string()),
                content_type: c.content_type.map(|m| m.to_string()),
                medium: None,
            }));
            media_thumbnail.extend(object.thumbnails.into_iter().map(|t| MediaThumbnail {
                url: Some(t.image.uri),
            }));
        }

        let links = entry
            .links
            .into_iter()
            .map(|l| EntryLink {
                rel: l.rel,
                content_type: l.media_type,
                href: Some(l.href),
            })
            .collect();

        FeedEntry {
            title: entry.title.map(|t| t.content),
            link,
            published: entry.published,
            updated: entry.updated,
            published_raw: None,
            updated_raw: None,
            summary: entry.summary.map(|s| s.content),
            description: None,
            content,
            media_content,
            media_thumbnail,
            links,
        }
    }

    /// The alternate (or unlabelled) link, else the first non-self link.
    fn primary_link(links: &[Link]) -> Option<String> {
        links
            .iter()
            .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
            .or_else(|| links.iter().find(|l| l.rel.as_deref() != Some("self")))
            .map(|l| l.href.clone())
    }
}
