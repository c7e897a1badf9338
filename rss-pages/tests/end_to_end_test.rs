use rss_pages::{run, BuildError, BuildSettings, ConfigError, FetchConfig};
use std::path::Path;
use std::sync::Once;
use tracing::info;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .try_init()
            .ok();
    });
}

const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
<channel>
  <title>Mock News</title>
  <link>https://mock.example.com/</link>
  <item>
    <title>Rust in production</title>
    <link>https://mock.example.com/rust</link>
    <description>&lt;p&gt;A long look at &lt;b&gt;Rust&lt;/b&gt;.&lt;/p&gt;</description>
    <media:thumbnail url="https://mock.example.com/rust.jpg"/>
  </item>
  <item>
    <title>Gardening tips</title>
    <link>https://mock.example.com/garden</link>
    <description>Tomatoes.</description>
  </item>
</channel>
</rss>"#;

fn settings(dir: &Path, config: &str) -> BuildSettings {
    let config_path = dir.join("feeds.json");
    std::fs::write(&config_path, config).unwrap();
    BuildSettings {
        config_path,
        output_dir: dir.join("public"),
        fetch: FetchConfig {
            user_agent: "rss-pages-e2e/1.0".to_string(),
            timeout_seconds: 5,
            ..FetchConfig::default()
        },
        ..BuildSettings::default()
    }
}

#[tokio::test]
async fn test_run_fetches_over_http_and_writes_pages() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let feed = server
        .mock("GET", "/news.xml")
        .match_header("user-agent", "rss-pages-e2e/1.0")
        .with_status(200)
        .with_header("content-type", "application/rss+xml")
        .with_body(RSS)
        .expect(1)
        .create_async()
        .await;
    let broken = server
        .mock("GET", "/broken.xml")
        .with_status(500)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = format!(
        r#"{{
          "pages": [
            {{"page_title": "News", "filename": "index.html",
              "feeds": [{{"url": "{base}/news.xml"}}, {{"url": "{base}/broken.xml"}}]}},
            {{"page_title": "Again", "filename": "again.html",
              "feeds": [{{"url": "{base}/news.xml"}}], "ng_keywords": ["tomato"]}}
          ],
          "watches": [
            {{"page_title": "Watch", "filename": "watch.html", "keywords": ["rust"]}}
          ]
        }}"#,
        base = server.url()
    );
    let settings = settings(dir.path(), &config);

    let report = run(&settings).await.unwrap();
    info!("Report: {:?}", report);

    assert_eq!(report.pages_written, 3);
    assert_eq!(report.feeds_fetched, 1);
    assert_eq!(report.feeds_failed, 1);
    feed.assert_async().await;
    broken.assert_async().await;

    let index = std::fs::read_to_string(settings.output_dir.join("index.html")).unwrap();
    assert!(index.contains("Mock News"));
    assert!(index.contains("Rust in production"));
    assert!(index.contains("Gardening tips"));
    assert!(index.contains("https://mock.example.com/rust.jpg"));
    // Handlebars escapes `=` and `&` inside attributes.
    assert!(index.contains("https://www.google.com/s2/favicons?domain"));

    let again = std::fs::read_to_string(settings.output_dir.join("again.html")).unwrap();
    assert!(!again.contains("Gardening tips"));

    let watch = std::fs::read_to_string(settings.output_dir.join("watch.html")).unwrap();
    assert!(watch.contains("Rust in production"));
    assert!(!watch.contains("Gardening tips"));
}

#[tokio::test]
async fn test_invalid_config_aborts_before_fetching() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let feed = server
        .mock("GET", "/news.xml")
        .with_status(200)
        .with_body(RSS)
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = format!(
        r#"{{"pages": [{{"page_title": "News", "filename": "../escape.html",
             "feeds": [{{"url": "{}/news.xml"}}]}}]}}"#,
        server.url()
    );
    let settings = settings(dir.path(), &config);

    let result = run(&settings).await;

    assert!(matches!(
        result,
        Err(BuildError::Config(ConfigError::Invalid(_)))
    ));
    assert!(!settings.output_dir.exists());
    feed.assert_async().await;
}

#[tokio::test]
async fn test_missing_config_file_is_reported() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let settings = BuildSettings {
        config_path: dir.path().join("nope.json"),
        output_dir: dir.path().join("public"),
        ..BuildSettings::default()
    };

    let result = run(&settings).await;

    assert!(matches!(result, Err(BuildError::Config(ConfigError::Io { .. }))));
}

#[tokio::test]
async fn test_broken_template_file_is_fatal() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("page.hbs");
    std::fs::write(&template, "{{#each feeds_data}}").unwrap();

    let mut settings = settings(
        dir.path(),
        r#"[{"page_title": "Empty", "filename": "index.html", "feeds": []}]"#,
    );
    settings.template_path = Some(template);

    let result = run(&settings).await;

    assert!(matches!(result, Err(BuildError::Render(_))));
    assert!(!settings.output_dir.join("index.html").exists());
}
