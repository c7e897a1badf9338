use anyhow::Context;
use clap::Parser;
use rss_pages::{run, BuildSettings, FetchConfig};
use std::path::PathBuf;
use tracing::{error, info};

/// Build static HTML pages from the feeds listed in a JSON config.
#[derive(Debug, Parser)]
#[command(name = "rss-pages", version, about)]
struct Args {
    /// Site config listing pages and watches
    #[arg(long, env = "RSS_PAGES_CONFIG", default_value = "feeds.json")]
    config: PathBuf,

    /// Directory the pages are written to
    #[arg(long, env = "RSS_PAGES_OUTPUT_DIR", default_value = "public")]
    output_dir: PathBuf,

    /// Handlebars template replacing the bundled one
    #[arg(long, env = "RSS_PAGES_TEMPLATE")]
    template: Option<PathBuf>,

    /// Per-feed request timeout in seconds
    #[arg(long, default_value_t = 15)]
    timeout: u64,

    /// Articles kept per feed
    #[arg(long, default_value_t = 10)]
    max_entries: usize,

    #[arg(long)]
    user_agent: Option<String>,

    /// Offset of the "last updated" clock from UTC, in minutes
    #[arg(long, default_value_t = 540, allow_hyphen_values = true)]
    tz_offset_minutes: i32,

    #[arg(long, default_value = "JST")]
    tz_label: String,

    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_settings(self) -> BuildSettings {
        let mut fetch = FetchConfig {
            timeout_seconds: self.timeout,
            max_entries: self.max_entries,
            ..FetchConfig::default()
        };
        if let Some(user_agent) = self.user_agent {
            fetch.user_agent = user_agent;
        }

        BuildSettings {
            config_path: self.config,
            output_dir: self.output_dir,
            template_path: self.template,
            tz_offset_minutes: self.tz_offset_minutes,
            tz_label: self.tz_label,
            fetch,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let settings = args.into_settings();
    info!(
        "Building site from {} into {}",
        settings.config_path.display(),
        settings.output_dir.display()
    );

    let report = run(&settings)
        .await
        .inspect_err(|e| error!("Build failed: {}", e))
        .context("site build failed")?;

    info!(
        "Done: {} pages, {} feeds fetched, {} failed",
        report.pages_written, report.feeds_fetched, report.feeds_failed
    );
    Ok(())
}
