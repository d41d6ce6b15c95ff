//! The page pipeline: routing, conversion, metadata merge, assembly and caching.

use crate::cache::PageCache;
use crate::config::{PageConfig, ResolvedConfig};
use crate::last_update::{FileMtime, LastUpdateLookup};
use crate::types::{CacheKey, PageOutput, PageRequest};
use once_cell::sync::Lazy;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use svpage_core::{
    ContentConverter, ConverterOptions, Frontmatter, Highlighter, MarkdownConverter, PageError,
    extract_template_frontmatter,
};
use svpage_svelte::{DocumentKind, assemble};

static DEFAULT_WRAPPER: Lazy<PageWrapper> =
    Lazy::new(|| PageWrapper::builder().cache(PageCache::global()).build());

/// Converts documents into layout-wrapped components, memoizing the result.
///
/// The wrapper is `Send + Sync`; calls for different documents are
/// independent and calls for the same document share one conversion.
pub struct PageWrapper {
    config: ResolvedConfig,
    converter: Arc<dyn ContentConverter>,
    converter_options: ConverterOptions,
    last_update: Arc<dyn LastUpdateLookup>,
    cache: Arc<PageCache>,
}

impl PageWrapper {
    /// Starts configuring a wrapper.
    pub fn builder() -> PageWrapperBuilder {
        PageWrapperBuilder::default()
    }

    /// Converts and optionally wraps a single document.
    ///
    /// Converter failures degrade to an empty page. Only a frontmatter or site
    /// configuration that cannot be serialized into the assembled component
    /// is returned as an error.
    pub fn wrap_page(&self, request: &PageRequest) -> Result<Arc<PageOutput>, PageError> {
        let key = CacheKey::from(request);
        let mut missed = false;
        let output = self.cache.get_or_try_insert_with(key, || {
            missed = true;
            log::debug!("page cache miss: {}", request.id);
            self.render(request)
        })?;
        if !missed {
            log::debug!("page cache hit: {}", request.id);
        }
        Ok(output)
    }

    /// The cache backing this wrapper.
    pub fn cache(&self) -> &Arc<PageCache> {
        &self.cache
    }

    /// Options handed to the content converter.
    pub fn converter_options(&self) -> &ConverterOptions {
        &self.converter_options
    }

    fn render(&self, request: &PageRequest) -> Result<PageOutput, PageError> {
        let last_update = self
            .last_update
            .last_update(&request.id)
            .map_or(JsonValue::Null, JsonValue::from);

        let kind = DocumentKind::of(&request.id);
        let (markup, frontmatter) = match kind {
            DocumentKind::Markdown => self.render_markdown(request, last_update),
            DocumentKind::PageTemplate => {
                let mut fm = extract_template_frontmatter(&request.content);
                fm.insert("pageType".to_string(), JsonValue::from(kind.page_type()));
                fm.insert("lastUpdate".to_string(), last_update);
                (request.content.clone(), fm)
            }
            DocumentKind::LayoutTemplate => (request.content.clone(), Frontmatter::new()),
            DocumentKind::Other => (String::new(), Frontmatter::new()),
        };

        let markup = match &request.layout {
            Some(layout) => assemble(&markup, &frontmatter, &request.site_config, layout)?,
            None => markup,
        };

        Ok(PageOutput {
            markup,
            frontmatter,
        })
    }

    fn render_markdown(&self, request: &PageRequest, last_update: JsonValue) -> (String, Frontmatter) {
        let converted = match self
            .converter
            .convert(&request.content, &request.id, &self.converter_options)
        {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                log::warn!("converter produced no output for {}", request.id);
                Default::default()
            }
            Err(err) => {
                log::warn!("rendering {} as an empty page: {err}", request.id);
                Default::default()
            }
        };

        // Converter metadata is merged last and may override the derived keys.
        let mut fm = Frontmatter::new();
        fm.insert(
            "pageType".to_string(),
            JsonValue::from(DocumentKind::Markdown.page_type()),
        );
        fm.insert("lastUpdate".to_string(), last_update);
        fm.extend(converted.frontmatter);
        fm.extend(converted.extra);

        (converted.markup, fm)
    }
}

impl std::fmt::Debug for PageWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageWrapper")
            .field("config", &self.config)
            .field("converter_options", &self.converter_options)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Builder for [`PageWrapper`].
#[derive(Default)]
pub struct PageWrapperBuilder {
    config: PageConfig,
    converter: Option<Arc<dyn ContentConverter>>,
    converter_options: Option<ConverterOptions>,
    highlighter: Option<Arc<dyn Highlighter>>,
    last_update: Option<Arc<dyn LastUpdateLookup>>,
    cache: Option<Arc<PageCache>>,
}

impl PageWrapperBuilder {
    /// Applies user configuration.
    pub fn config(mut self, config: PageConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the markdown converter.
    pub fn converter<C: ContentConverter + 'static>(mut self, converter: C) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }

    /// Replaces the converter options derived from the configuration.
    pub fn converter_options(mut self, options: ConverterOptions) -> Self {
        self.converter_options = Some(options);
        self
    }

    /// Sets the code block highlighter.
    pub fn highlighter<H: Highlighter + 'static>(mut self, highlighter: H) -> Self {
        self.highlighter = Some(Arc::new(highlighter));
        self
    }

    /// Replaces the last-update lookup (filesystem mtime by default).
    pub fn last_update<L: LastUpdateLookup + 'static>(mut self, lookup: L) -> Self {
        self.last_update = Some(Arc::new(lookup));
        self
    }

    /// Uses `cache` instead of a private cache sized from the configuration.
    pub fn cache(mut self, cache: Arc<PageCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Builds the wrapper.
    pub fn build(self) -> PageWrapper {
        let config = ResolvedConfig::new(self.config);
        let mut converter_options = self
            .converter_options
            .unwrap_or_else(|| config.converter_options());
        if let Some(highlighter) = self.highlighter {
            converter_options.highlighter = Some(highlighter);
        }

        PageWrapper {
            converter: self
                .converter
                .unwrap_or_else(|| Arc::new(MarkdownConverter)),
            converter_options,
            last_update: self.last_update.unwrap_or_else(|| Arc::new(FileMtime)),
            cache: self
                .cache
                .unwrap_or_else(|| Arc::new(PageCache::new(config.cache_capacity))),
            config,
        }
    }
}

/// Wraps a page with the default wrapper and the process-wide cache.
pub fn wrap_page(request: &PageRequest) -> Result<Arc<PageOutput>, PageError> {
    DEFAULT_WRAPPER.wrap_page(request)
}
