//! Code block highlighting for generated markup.
//!
//! The markdown renderer emits fenced code as `<pre><code class="language-x">`.
//! Each such block is decoded and handed to a [`Highlighter`], whose output
//! replaces the whole `<pre>` element.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static CODE_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<pre><code(?: class="language-([^"]*)")?>([\s\S]*?)</code></pre>"#)
        .expect("code block pattern is valid")
});

static INLINE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<code>([\s\S]*?)</code>").expect("inline code pattern is valid"));

/// Turns a code block into markup.
pub trait Highlighter: Send + Sync {
    /// Highlight `code` written in `lang` (when the fence declared one).
    fn highlight(&self, code: &str, lang: Option<&str>) -> String;
}

impl<F> Highlighter for F
where
    F: Fn(&str, Option<&str>) -> String + Send + Sync,
{
    fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        (self)(code, lang)
    }
}

/// Plain highlighter that emits escaped code safe to embed in a Svelte component.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvelteSafeHighlighter;

impl Highlighter for SvelteSafeHighlighter {
    fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let escaped = escape_svelte(&html_escape::encode_text(code));
        match lang {
            Some(lang) => {
                let class = html_escape::encode_double_quoted_attribute(lang);
                format!(
                    "<pre class=\"language-{class}\"><code class=\"language-{class}\">{escaped}</code></pre>"
                )
            }
            None => format!("<pre><code>{escaped}</code></pre>"),
        }
    }
}

/// Escapes Svelte's expression delimiters so text renders literally.
///
/// # Examples
///
/// ```
/// use svpage_core::highlight::escape_svelte;
///
/// assert_eq!(escape_svelte("{count}"), "&#123;count&#125;");
/// ```
pub fn escape_svelte(text: &str) -> String {
    text.replace('{', "&#123;").replace('}', "&#125;")
}

/// Replaces every fenced code block in `html` with highlighter output.
pub fn highlight_code_blocks(html: &str, highlighter: &dyn Highlighter) -> String {
    CODE_BLOCK_RE
        .replace_all(html, |caps: &Captures<'_>| {
            let lang = caps
                .get(1)
                .map(|m| m.as_str())
                .filter(|lang| !lang.is_empty());
            let code = html_escape::decode_html_entities(&caps[2]);
            highlighter.highlight(&code, lang)
        })
        .into_owned()
}

/// Escapes Svelte braces inside inline `<code>` spans.
pub fn escape_inline_code(html: &str) -> String {
    INLINE_CODE_RE
        .replace_all(html, |caps: &Captures<'_>| {
            format!("<code>{}</code>", escape_svelte(&caps[1]))
        })
        .into_owned()
}
