use crate::error::{FetchError, RenderError};
use crate::types::{NavEntry, PageKind, PageViewModel};
use async_trait::async_trait;
use interfaces::FeedDocument;
use serde::Serialize;

/// Resolves a feed URL to a parsed document.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch and parse one feed. Recoverable parse problems come back as
    /// `Ok` with `soft_error` set; transport, timeout and unreadable bodies
    /// are `Err`.
    async fn fetch(&self, url: &str) -> Result<FeedDocument, FetchError>;
}

/// The page being rendered, as seen by templates.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentPage {
    pub page_title: String,
    pub filename: String,
    pub kind: PageKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderContext<'a> {
    pub navigation: &'a [NavEntry],
    pub current_page: CurrentPage,
    pub feeds_data: &'a [PageViewModel],
    pub last_updated: &'a str,
}

/// Turns a page's view-models into markup.
pub trait PageRenderer {
    fn render(&self, context: &RenderContext<'_>) -> Result<String, RenderError>;
}
