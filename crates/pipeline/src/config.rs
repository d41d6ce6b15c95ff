//! Pipeline configuration.

use serde::Deserialize;
use svpage_core::{ConverterOptions, ExternalLinks, LazyImages, ParseOptions};
use thiserror::Error;

/// Default number of pages kept by the page cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration text was not valid JSON for [`PageConfig`].
    #[error("Invalid page configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// User-facing options; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PageConfig {
    /// Maximum number of converted pages kept in memory.
    pub cache_capacity: Option<usize>,
    /// Enables GitHub Flavored Markdown constructs.
    pub gfm: Option<bool>,
    /// Enables `$math$` constructs.
    pub math: Option<bool>,
    /// Adds `loading="lazy"` to rendered images.
    pub lazy_images: Option<bool>,
    /// Opens absolute links in a new tab.
    pub external_links: Option<bool>,
}

impl PageConfig {
    /// Parses configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedConfig {
    pub(crate) cache_capacity: usize,
    pub(crate) gfm: bool,
    pub(crate) math: bool,
    pub(crate) lazy_images: bool,
    pub(crate) external_links: bool,
}

impl ResolvedConfig {
    pub(crate) fn new(config: PageConfig) -> Self {
        Self {
            cache_capacity: config
                .cache_capacity
                .unwrap_or(DEFAULT_CACHE_CAPACITY)
                .max(1),
            gfm: config.gfm.unwrap_or(true),
            math: config.math.unwrap_or(false),
            lazy_images: config.lazy_images.unwrap_or(false),
            external_links: config.external_links.unwrap_or(false),
        }
    }

    /// Converter options implied by this configuration.
    pub(crate) fn converter_options(&self) -> ConverterOptions {
        let mut options = ConverterOptions {
            parse: ParseOptions {
                gfm: self.gfm,
                math: self.math,
                ..ParseOptions::markdown()
            },
            ..ConverterOptions::default()
        };
        if self.lazy_images {
            options.add_rehype_plugin(LazyImages);
        }
        if self.external_links {
            options.add_rehype_plugin(ExternalLinks);
        }
        options
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self::new(PageConfig::default())
    }
}
