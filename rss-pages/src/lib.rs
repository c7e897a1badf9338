pub mod aggregator;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod normalizer;
pub mod pages;
pub mod parser;
pub mod render;
pub mod rss_utils;
pub mod site;
pub mod traits;
pub mod types;
pub mod watch;

pub use aggregator::{collect_requests, FeedAggregator, FeedPool};
pub use config::{FeedConfig, PageConfig, SiteConfig, WatchConfig};
pub use error::{BuildError, ConfigError, FetchError, RenderError};
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use render::HandlebarsRenderer;
pub use site::{run, BuildSettings, SiteBuilder};
pub use traits::{CurrentPage, FeedSource, PageRenderer, RenderContext};
pub use types::*;
