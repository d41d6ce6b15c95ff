#![deny(missing_docs)]
//! svpage: turns markdown and Svelte pages into layout-wrapped components.
//!
//! ```no_run
//! use serde_json::json;
//! use svpage::{PageRequest, PageWrapper};
//!
//! let wrapper = PageWrapper::builder().build();
//! let request = PageRequest::new("docs/intro.md", "# Intro")
//!     .with_site_config(json!({ "title": "Docs" }))
//!     .with_layout("/src/lib/Layout.svelte");
//! let page = wrapper.wrap_page(&request)?;
//! println!("{}", page.markup);
//! # Ok::<(), svpage::PageError>(())
//! ```

/// Bounded page cache.
pub mod cache;
/// Pipeline configuration.
pub mod config;
/// Last-update timestamp lookups.
pub mod last_update;
/// Request and result types.
pub mod types;
/// The page pipeline.
pub mod wrapper;

pub use cache::PageCache;
pub use config::{ConfigError, DEFAULT_CACHE_CAPACITY, PageConfig};
pub use last_update::{FileMtime, FixedLastUpdate, LastUpdateLookup};
pub use svpage_core::{
    ContentConverter, ConvertedDocument, ConverterOptions, Frontmatter, Highlighter,
    MarkdownConverter, PageError,
};
pub use types::{CacheKey, PageOutput, PageRequest};
pub use wrapper::{PageWrapper, PageWrapperBuilder, wrap_page};
