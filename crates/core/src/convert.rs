//! Markdown to component markup conversion.

use crate::frontmatter::{Frontmatter, FrontmatterExtraction, extract_frontmatter};
use crate::highlight::{Highlighter, SvelteSafeHighlighter, escape_inline_code, highlight_code_blocks};
use crate::parse::{ParseOptions, TextTransform, apply_text_transforms, render_html};
use crate::protect::{Protected, protect_blocks, restore_blocks};
use crate::rehype::HtmlTransform;
use crate::{PageError, SourceLocation};
use std::fmt;
use std::sync::Arc;

/// Output of a successful conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertedDocument {
    /// Generated component markup.
    pub markup: String,
    /// Frontmatter declared in the document header.
    pub frontmatter: Frontmatter,
    /// Any other metadata the converter produced.
    pub extra: Frontmatter,
}

/// Options handed to a [`ContentConverter`] for every document.
#[derive(Clone, Default)]
pub struct ConverterOptions {
    /// Markdown parsing options.
    pub parse: ParseOptions,
    /// Code block highlighter. Falls back to [`SvelteSafeHighlighter`].
    pub highlighter: Option<Arc<dyn Highlighter>>,
    /// Transforms run on the markdown text before parsing.
    pub remark_plugins: Vec<Arc<dyn TextTransform>>,
    /// Transforms run on the generated markup.
    pub rehype_plugins: Vec<Arc<dyn HtmlTransform>>,
}

impl ConverterOptions {
    /// Set the code block highlighter.
    pub fn with_highlighter<H: Highlighter + 'static>(mut self, highlighter: H) -> Self {
        self.highlighter = Some(Arc::new(highlighter));
        self
    }

    /// Add a markdown text transform.
    pub fn add_remark_plugin<T: TextTransform + 'static>(&mut self, transform: T) {
        self.remark_plugins.push(Arc::new(transform));
    }

    /// Add a markup transform.
    pub fn add_rehype_plugin<T: HtmlTransform + 'static>(&mut self, transform: T) {
        self.rehype_plugins.push(Arc::new(transform));
    }
}

impl fmt::Debug for ConverterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterOptions")
            .field("parse", &self.parse)
            .field("highlighter", &self.highlighter.is_some())
            .field("remark_plugins", &self.remark_plugins.len())
            .field("rehype_plugins", &self.rehype_plugins.len())
            .finish()
    }
}

/// Converts markdown text into component markup plus metadata.
///
/// Implementations must be deterministic for identical inputs. `Ok(None)`
/// means the converter produced no result for this document.
pub trait ContentConverter: Send + Sync {
    /// Convert `markdown` read from `filename`.
    fn convert(
        &self,
        markdown: &str,
        filename: &str,
        options: &ConverterOptions,
    ) -> Result<Option<ConvertedDocument>, PageError>;
}

/// Default converter backed by markdown-rs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownConverter;

impl ContentConverter for MarkdownConverter {
    fn convert(
        &self,
        markdown: &str,
        filename: &str,
        options: &ConverterOptions,
    ) -> Result<Option<ConvertedDocument>, PageError> {
        let FrontmatterExtraction { value, body_start } = extract_frontmatter(markdown)?;
        let body = apply_text_transforms(&markdown[body_start..], &options.remark_plugins);

        // Placeholders are comments, which only survive when raw HTML is allowed.
        let protected = if options.parse.raw_html {
            protect_blocks(&body)
        } else {
            Protected::verbatim(body.into_owned())
        };

        let html = render_html(&protected.text, &options.parse)
            .map_err(|err| with_file(err, filename))?;

        let html = match &options.highlighter {
            Some(highlighter) => highlight_code_blocks(&html, highlighter.as_ref()),
            None => highlight_code_blocks(&html, &SvelteSafeHighlighter),
        };
        let mut markup = escape_inline_code(&html);
        restore_blocks(&mut markup, &protected);

        for transform in &options.rehype_plugins {
            markup = transform.transform(&markup)?;
        }

        Ok(Some(ConvertedDocument {
            markup,
            frontmatter: value,
            extra: Frontmatter::new(),
        }))
    }
}

fn with_file(err: PageError, path: &str) -> PageError {
    match err {
        PageError::Convert { message, location } => PageError::Convert {
            message,
            location: SourceLocation::with_file(path.to_string(), location.line, location.column),
        },
        other => other,
    }
}
