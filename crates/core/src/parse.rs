//! Markdown parsing options and text preprocessing hooks.

use crate::{PageError, SourceLocation};
use markdown::message::{Message, Place};
use std::borrow::Cow;

/// Parser options for building markdown-rs options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Enable GitHub Flavored Markdown constructs.
    pub gfm: bool,
    /// Enable indented code blocks.
    pub code_indented: bool,
    /// Pass raw HTML (script, style and svelte blocks) through untouched.
    pub raw_html: bool,
    /// Enable math constructs ($inline$ and $$block$$).
    pub math: bool,
}

impl ParseOptions {
    /// Defaults for markdown destined to become a Svelte component.
    pub const fn markdown() -> Self {
        Self {
            gfm: true,
            code_indented: true,
            raw_html: true,
            math: false,
        }
    }

    /// Convert to markdown-rs `Options`.
    pub fn to_markdown(self) -> markdown::Options {
        let mut constructs = markdown::Constructs {
            // Frontmatter is stripped before the body reaches the parser.
            frontmatter: false,
            code_indented: self.code_indented,
            html_flow: self.raw_html,
            html_text: self.raw_html,
            ..Default::default()
        };

        if self.gfm {
            constructs.gfm_autolink_literal = true;
            constructs.gfm_footnote_definition = true;
            constructs.gfm_label_start_footnote = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        if self.math {
            constructs.math_flow = true;
            constructs.math_text = true;
        }

        markdown::Options {
            parse: markdown::ParseOptions {
                constructs,
                math_text_single_dollar: self.math,
                ..markdown::ParseOptions::default()
            },
            compile: markdown::CompileOptions {
                allow_dangerous_html: self.raw_html,
                allow_dangerous_protocol: self.raw_html,
                ..markdown::CompileOptions::default()
            },
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::markdown()
    }
}

/// Trait for preprocessing raw markdown text before parsing.
pub trait TextTransform: Send + Sync {
    /// Transform the input markdown text, returning an owned or borrowed string.
    fn transform<'a>(&self, input: &'a str) -> Cow<'a, str>;
}

impl<F> TextTransform for F
where
    F: for<'a> Fn(&'a str) -> Cow<'a, str> + Send + Sync,
{
    fn transform<'a>(&self, input: &'a str) -> Cow<'a, str> {
        (self)(input)
    }
}

/// Runs each transform over the text in order.
pub fn apply_text_transforms<'a, T>(input: &'a str, transforms: &[T]) -> Cow<'a, str>
where
    T: AsRef<dyn TextTransform>,
{
    let mut current = Cow::Borrowed(input);
    for transform in transforms {
        let next = transform.as_ref().transform(current.as_ref());
        current = Cow::Owned(next.into_owned());
    }
    current
}

/// Render markdown into HTML markup.
pub fn render_html(input: &str, options: &ParseOptions) -> Result<String, PageError> {
    markdown::to_html_with_options(input, &options.to_markdown()).map_err(|err| {
        PageError::Convert {
            message: err.reason.clone(),
            location: message_location(&err),
        }
    })
}

fn message_location(message: &Message) -> SourceLocation {
    match &message.place {
        Some(place) => match place.as_ref() {
            Place::Point(point) => SourceLocation::new(point.line, point.column),
            Place::Position(position) => {
                SourceLocation::new(position.start.line, position.start.column)
            }
        },
        None => SourceLocation::new(1, 1),
    }
}
