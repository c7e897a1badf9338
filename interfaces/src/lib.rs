pub mod defs;

pub use defs::{EntryContent, EntryLink, FeedDocument, FeedEntry, MediaContent, MediaThumbnail};
