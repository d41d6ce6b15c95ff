//! Request and result types for the page pipeline.

use serde::Serialize;
use serde_json::Value as JsonValue;
use svpage_core::{Frontmatter, PageError};

/// A single document handed to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// Document identity (typically its path).
    pub id: String,
    /// Full markdown or Svelte source.
    pub content: String,
    /// Site-wide configuration passed to the layout.
    pub site_config: JsonValue,
    /// Layout component import path; no wrapping when absent.
    pub layout: Option<String>,
}

impl PageRequest {
    /// Request for `id` with `content`, no site configuration and no layout.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            site_config: JsonValue::Object(Default::default()),
            layout: None,
        }
    }

    /// Sets the site configuration.
    pub fn with_site_config(mut self, site_config: JsonValue) -> Self {
        self.site_config = site_config;
        self
    }

    /// Sets the layout component import path.
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }
}

/// The converted page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageOutput {
    /// Final component markup.
    #[serde(rename = "wrappedCode")]
    pub markup: String,
    /// Merged page metadata.
    #[serde(rename = "fm")]
    pub frontmatter: Frontmatter,
}

impl PageOutput {
    /// Serializes the output as `{ "wrappedCode": ..., "fm": ... }`.
    pub fn to_json(&self) -> Result<String, PageError> {
        serde_json::to_string(self).map_err(|err| PageError::serialize("page output", err))
    }
}

/// Cache identity of a document: its id and raw content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

#[derive(Serialize)]
struct KeyParts<'a> {
    id: &'a str,
    #[serde(rename = "mdOrSvelteCode")]
    content: &'a str,
}

impl CacheKey {
    /// Deterministic key for `(id, content)`.
    pub fn new(id: &str, content: &str) -> Self {
        let parts = KeyParts { id, content };
        // Serializing two strings cannot fail.
        let key = serde_json::to_string(&parts).unwrap_or_else(|_| format!("{id}\u{0}{content}"));
        Self(key)
    }

    /// The serialized key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&PageRequest> for CacheKey {
    fn from(request: &PageRequest) -> Self {
        CacheKey::new(&request.id, &request.content)
    }
}
