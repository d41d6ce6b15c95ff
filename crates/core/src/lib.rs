#![deny(missing_docs)]
//! svpage core: frontmatter extraction, tag hoisting, and markdown conversion.

/// Fenced code block tracking.
pub mod code_fence;
/// Markdown to component markup conversion.
pub mod convert;
/// Core error types.
pub mod error;
/// YAML frontmatter extraction helpers.
pub mod frontmatter;
/// Code block highlighting.
pub mod highlight;
/// Pattern-based tag block extraction.
pub mod hoist;
/// Markdown parsing options and text transforms.
pub mod parse;
/// Placeholder protection for component blocks.
pub mod protect;
/// Element rewrites for generated markup.
pub mod rehype;

pub use convert::{ContentConverter, ConvertedDocument, ConverterOptions, MarkdownConverter};
pub use error::{PageError, SourceLocation};
pub use frontmatter::{
    Frontmatter, FrontmatterError, FrontmatterExtraction, extract_frontmatter,
    extract_template_frontmatter,
};
pub use highlight::{Highlighter, SvelteSafeHighlighter};
pub use hoist::{Hoisted, first_match, hoist};
pub use parse::{ParseOptions, TextTransform, render_html};
pub use protect::{Protected, protect_blocks, restore_blocks};
pub use rehype::{ExternalLinks, HtmlTransform, LazyImages};
