use chrono::{DateTime, Utc};

/// A parsed RSS/Atom document as handed over by a feed fetcher.
#[derive(Debug, Clone, Default)]
pub struct FeedDocument {
    pub title: Option<String>,
    /// Site link declared by the feed (the HTML page, not the feed itself).
    pub link: Option<String>,
    pub entries: Vec<FeedEntry>,
    /// Set when the document was only readable after recovering from a
    /// parse problem. Entries are still usable.
    pub soft_error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub published_raw: Option<String>,
    pub updated_raw: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub content: Vec<EntryContent>,
    pub media_content: Vec<MediaContent>,
    pub media_thumbnail: Vec<MediaThumbnail>,
    pub links: Vec<EntryLink>,
}

#[derive(Debug, Clone, Default)]
pub struct EntryContent {
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct MediaContent {
    pub url: Option<String>,
    pub content_type: Option<String>,
    pub medium: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MediaThumbnail {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EntryLink {
    pub rel: Option<String>,
    pub content_type: Option<String>,
    pub href: Option<String>,
}

// Object style note:
// Every field is optional: fetchers fill in what the source document
// declares and leave the rest empty. Consumers apply their own defaults and
// never assume presence.
