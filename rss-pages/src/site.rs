use crate::aggregator::{collect_requests, FeedAggregator};
use crate::config::SiteConfig;
use crate::error::{RenderError, Result};
use crate::fetcher::Fetcher;
use crate::pages::build_page;
use crate::render::HandlebarsRenderer;
use crate::rss_utils::time;
use crate::traits::{CurrentPage, FeedSource, PageRenderer, RenderContext};
use crate::types::{BuildReport, FetchConfig, NavEntry, PageKind, PageViewModel};
use crate::watch::build_watch;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Everything a run needs besides the config document itself.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
    pub template_path: Option<PathBuf>,
    /// Offset of the "last updated" clock from UTC.
    pub tz_offset_minutes: i32,
    pub tz_label: String,
    pub fetch: FetchConfig,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("feeds.json"),
            output_dir: PathBuf::from("public"),
            template_path: None,
            tz_offset_minutes: 9 * 60,
            tz_label: "JST".to_string(),
            fetch: FetchConfig::default(),
        }
    }
}

/// Load the config, fetch every feed and write all pages.
pub async fn run(settings: &BuildSettings) -> Result<BuildReport> {
    let config = SiteConfig::load(&settings.config_path)?;

    let renderer = match &settings.template_path {
        Some(path) => HandlebarsRenderer::from_template_file(path)?,
        None => HandlebarsRenderer::new()?,
    };
    let fetcher = Fetcher::new(settings.fetch.clone())?;

    let builder = SiteBuilder::new(&config, Arc::new(fetcher), &renderer, settings);
    builder.build().await
}

/// Turns one config into one set of output files.
pub struct SiteBuilder<'a> {
    config: &'a SiteConfig,
    aggregator: FeedAggregator,
    renderer: &'a dyn PageRenderer,
    output_dir: PathBuf,
    tz_offset_minutes: i32,
    tz_label: String,
}

impl<'a> SiteBuilder<'a> {
    pub fn new(
        config: &'a SiteConfig,
        source: Arc<dyn FeedSource>,
        renderer: &'a dyn PageRenderer,
        settings: &BuildSettings,
    ) -> Self {
        Self {
            config,
            aggregator: FeedAggregator::new(source, settings.fetch.max_entries),
            renderer,
            output_dir: settings.output_dir.clone(),
            tz_offset_minutes: settings.tz_offset_minutes,
            tz_label: settings.tz_label.clone(),
        }
    }

    pub async fn build(&self) -> Result<BuildReport> {
        self.build_at(Utc::now()).await
    }

    /// Build with a fixed clock. `now` drives novelty, relative labels and
    /// the "last updated" stamp for every page of the run.
    pub async fn build_at(&self, now: DateTime<Utc>) -> Result<BuildReport> {
        let requests = collect_requests(&self.config.pages);
        let pool = self.aggregator.fetch_all(&requests, now).await;

        let navigation = self.config.navigation();
        let last_updated = time::format_last_updated(now, self.tz_offset_minutes, &self.tz_label);

        std::fs::create_dir_all(&self.output_dir).map_err(|source| RenderError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let mut report = BuildReport {
            pages_written: 0,
            feeds_fetched: pool.fetched_count(),
            feeds_failed: pool.failed_count(),
        };

        for watch in &self.config.watches {
            info!("Building watch: {} ({})", watch.filename, watch.page_title);
            let models = build_watch(watch, &pool);
            let current = CurrentPage {
                page_title: watch.page_title.clone(),
                filename: watch.filename.clone(),
                kind: PageKind::Watch,
            };
            self.write_page(current, &models, &navigation, &last_updated)?;
            report.pages_written += 1;
        }

        for page in &self.config.pages {
            info!("Building page: {} ({})", page.filename, page.page_title);
            let models = build_page(page, &pool);
            let current = CurrentPage {
                page_title: page.page_title.clone(),
                filename: page.filename.clone(),
                kind: PageKind::Page,
            };
            self.write_page(current, &models, &navigation, &last_updated)?;
            report.pages_written += 1;
        }

        info!(
            "Wrote {} pages to {} ({} feeds fetched, {} failed)",
            report.pages_written,
            self.output_dir.display(),
            report.feeds_fetched,
            report.feeds_failed
        );
        Ok(report)
    }

    fn write_page(
        &self,
        current_page: CurrentPage,
        models: &[PageViewModel],
        navigation: &[NavEntry],
        last_updated: &str,
    ) -> Result<()> {
        let path = self.output_dir.join(&current_page.filename);
        let context = RenderContext {
            navigation,
            current_page,
            feeds_data: models,
            last_updated,
        };

        let html = self.renderer.render(&context).inspect_err(|e| {
            error!("Error rendering {}: {}", context.current_page.filename, e);
        })?;
        write_output(&path, &html).inspect_err(|e| {
            error!("Error writing {}: {}", path.display(), e);
        })?;
        Ok(())
    }
}

fn write_output(path: &Path, html: &str) -> std::result::Result<(), RenderError> {
    std::fs::write(path, html).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })
}
