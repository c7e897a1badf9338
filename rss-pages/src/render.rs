use crate::error::RenderError;
use crate::rss_utils::feed;
use crate::traits::{PageRenderer, RenderContext};
use handlebars::{handlebars_helper, Handlebars};
use std::path::Path;
use tracing::debug;

const PAGE_TEMPLATE: &str = "page";
const DEFAULT_TEMPLATE: &str = include_str!("../templates/page.hbs");

// {{plain body 160}}: tag-free excerpt of at most N characters.
handlebars_helper!(plain: |html: str, limit: u64| {
    feed::truncate_chars(&feed::extract_text_from_html(html), limit as usize)
});

/// Handlebars renderer with a single page template.
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Renderer using the bundled template.
    pub fn new() -> Result<Self, RenderError> {
        Self::from_template_str(DEFAULT_TEMPLATE)
    }

    pub fn from_template_str(template: &str) -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry.register_helper("plain", Box::new(plain));
        registry
            .register_template_string(PAGE_TEMPLATE, template)
            .map_err(|e| RenderError::Template(e.to_string()))?;

        Ok(Self { registry })
    }

    pub fn from_template_file(path: &Path) -> Result<Self, RenderError> {
        debug!("Loading template {}", path.display());
        let template = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_template_str(&template)
    }
}

impl PageRenderer for HandlebarsRenderer {
    fn render(&self, context: &RenderContext<'_>) -> Result<String, RenderError> {
        self.registry
            .render(PAGE_TEMPLATE, context)
            .map_err(|e| RenderError::Render {
                filename: context.current_page.filename.clone(),
                message: e.to_string(),
            })
    }
}
