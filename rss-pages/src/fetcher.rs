use crate::error::FetchError;
use crate::parser::FeedParser;
use crate::traits::FeedSource;
use crate::types::FetchConfig;
use async_trait::async_trait;
use interfaces::FeedDocument;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

/// HTTP feed fetcher: one GET per call, bounded by the configured timeout,
/// no retries.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let redirect = if config.follow_redirects {
            reqwest::redirect::Policy::limited(config.max_redirects)
        } else {
            reqwest::redirect::Policy::none()
        };

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(redirect)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub async fn fetch_feed(&self, url: &str) -> Result<FeedDocument, FetchError> {
        let start_time = Instant::now();
        let parsed_url = Url::parse(url)?;

        debug!("Fetching feed: {}", url);

        let response = self
            .client
            .get(parsed_url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        if let Some(content_length) = response.content_length() {
            self.check_size(content_length as usize)?;
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        self.check_size(body.len())?;

        let document = FeedParser::parse_document(&body)?;
        info!(
            "Fetched feed: {} ({} bytes, {} entries, {}ms)",
            url,
            body.len(),
            document.entries.len(),
            start_time.elapsed().as_millis()
        );
        Ok(document)
    }

    fn check_size(&self, bytes: usize) -> Result<(), FetchError> {
        let size_mb = bytes / (1024 * 1024);
        if size_mb > self.config.max_feed_size_mb {
            return Err(FetchError::TooLarge { size_mb });
        }
        Ok(())
    }

    fn classify(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                seconds: self.config.timeout_seconds,
            }
        } else {
            FetchError::Http(error)
        }
    }
}

#[async_trait]
impl FeedSource for Fetcher {
    async fn fetch(&self, url: &str) -> Result<FeedDocument, FetchError> {
        self.fetch_feed(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Mock Feed</title><link>https://mock.example.com/</link>
<item><title>Hello</title><link>https://mock.example.com/hello</link></item>
</channel></rss>"#;

    fn test_config() -> FetchConfig {
        FetchConfig {
            user_agent: "rss-pages-test/1.0".to_string(),
            timeout_seconds: 5,
            ..FetchConfig::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent_and_parses() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/feed.xml")
            .match_header("user-agent", "rss-pages-test/1.0")
            .with_status(200)
            .with_header("content-type", "application/rss+xml")
            .with_body(BODY)
            .create_async()
            .await;

        let fetcher = Fetcher::new(test_config()).unwrap();
        let doc = fetcher
            .fetch(&format!("{}/feed.xml", server.url()))
            .await
            .unwrap();

        assert_eq!(doc.title.as_deref(), Some("Mock Feed"));
        assert_eq!(doc.entries.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_error_status_is_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing.xml")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = Fetcher::new(test_config()).unwrap();
        let result = fetcher
            .fetch(&format!("{}/missing.xml", server.url()))
            .await;

        assert!(matches!(result, Err(FetchError::Status { status: 404 })));
    }

    #[tokio::test]
    async fn test_html_page_is_parse_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/index.html")
            .with_status(200)
            .with_body("<html><body>Not a feed</body></html>")
            .create_async()
            .await;

        let fetcher = Fetcher::new(test_config()).unwrap();
        let result = fetcher.fetch(&format!("{}/index.html", server.url())).await;

        assert!(matches!(result, Err(FetchError::Parse(_))));
    }

    #[tokio::test]
    async fn test_truncated_body_is_soft_error() {
        let mut server = mockito::Server::new_async().await;
        let cut = BODY.find("</item>").unwrap() + "</item>".len();
        let _mock = server
            .mock("GET", "/cut.xml")
            .with_status(200)
            .with_header("content-type", "application/rss+xml")
            .with_body(&BODY[..cut])
            .create_async()
            .await;

        let fetcher = Fetcher::new(test_config()).unwrap();
        let doc = fetcher
            .fetch(&format!("{}/cut.xml", server.url()))
            .await
            .unwrap();

        assert!(doc.soft_error.is_some());
        assert_eq!(doc.title.as_deref(), Some("Mock Feed"));
        assert_eq!(doc.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_url_is_failure() {
        let fetcher = Fetcher::new(test_config()).unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }
}
