use crate::error::ConfigError;
use crate::types::{NavEntry, PageKind};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedConfig {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageConfig {
    pub page_title: String,
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub feeds: Vec<FeedConfig>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ng_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WatchConfig {
    pub page_title: String,
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ng_keywords: Vec<String>,
}

/// The whole site: topic pages and keyword watches. Loaded once, never
/// mutated.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SiteConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pages: Vec<PageConfig>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub watches: Vec<WatchConfig>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl SiteConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&raw)?;
        info!(
            "Loaded config {}: {} pages, {} watches",
            path.display(),
            config.pages.len(),
            config.watches.len()
        );
        Ok(config)
    }

    /// Parse and validate. Accepts a leading byte-order mark, and the older
    /// layout where the document is a bare array of pages.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        let value: serde_json::Value = serde_json::from_str(raw)?;

        let config = if value.is_array() {
            debug!("Config is a bare page list");
            SiteConfig {
                pages: serde_json::from_value(value)?,
                watches: Vec::new(),
            }
        } else {
            serde_json::from_value(value)?
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pages.is_empty() && self.watches.is_empty() {
            return Err(ConfigError::Invalid("no pages or watches defined".to_string()));
        }

        let mut filenames = HashSet::new();
        let titled = self
            .pages
            .iter()
            .map(|p| (&p.page_title, &p.filename))
            .chain(self.watches.iter().map(|w| (&w.page_title, &w.filename)));

        for (title, filename) in titled {
            if title.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("page {:?} has an empty page_title", filename)));
            }
            validate_filename(filename)?;
            if !filenames.insert(filename.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate filename {:?}", filename)));
            }
        }
        Ok(())
    }

    /// Navigation shared by every page: watches first, then pages.
    pub fn navigation(&self) -> Vec<NavEntry> {
        let watches = self.watches.iter().map(|w| NavEntry {
            page_title: w.page_title.clone(),
            filename: w.filename.clone(),
            kind: PageKind::Watch,
        });
        let pages = self.pages.iter().map(|p| NavEntry {
            page_title: p.page_title.clone(),
            filename: p.filename.clone(),
            kind: PageKind::Page,
        });
        watches.chain(pages).collect()
    }
}

/// Output names are written verbatim into the output directory, so they
/// must stay plain file names.
fn validate_filename(filename: &str) -> Result<(), ConfigError> {
    let invalid = filename.trim().is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains('/')
        || filename.contains('\\');
    if invalid {
        return Err(ConfigError::Invalid(format!("invalid filename {:?}", filename)));
    }
    Ok(())
}
