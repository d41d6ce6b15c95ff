//! Element-level rewrites applied to generated markup.

use crate::PageError;
use lol_html::{ElementContentHandlers, RewriteStrSettings, Selector, element, rewrite_str};
use std::borrow::Cow;

type Handler = (Cow<'static, Selector>, ElementContentHandlers<'static>);

/// Trait for rewriting markup after markdown has been rendered.
pub trait HtmlTransform: Send + Sync {
    /// Rewrite `html`, returning the new markup.
    fn transform(&self, html: &str) -> Result<String, PageError>;
}

impl<F> HtmlTransform for F
where
    F: Fn(&str) -> Result<String, PageError> + Send + Sync,
{
    fn transform(&self, html: &str) -> Result<String, PageError> {
        (self)(html)
    }
}

/// Adds `loading="lazy"` to images that do not choose a loading mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct LazyImages;

impl HtmlTransform for LazyImages {
    fn transform(&self, html: &str) -> Result<String, PageError> {
        rewrite(html, vec![lazy_image_handler()])
    }
}

/// Opens absolute `http(s)` links in a new tab.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalLinks;

impl HtmlTransform for ExternalLinks {
    fn transform(&self, html: &str) -> Result<String, PageError> {
        rewrite(html, vec![external_link_handler()])
    }
}

fn rewrite(html: &str, handlers: Vec<Handler>) -> Result<String, PageError> {
    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: handlers,
            ..RewriteStrSettings::new()
        },
    )
    .map_err(|err| PageError::Rewrite(err.to_string()))
}

fn lazy_image_handler() -> Handler {
    element!("img", |el| {
        if !el.has_attribute("loading") {
            el.set_attribute("loading", "lazy")?;
        }
        Ok(())
    })
}

fn external_link_handler() -> Handler {
    element!("a[href]", |el| {
        let href = el.get_attribute("href").unwrap_or_default();
        if href.starts_with("http://") || href.starts_with("https://") {
            if !el.has_attribute("target") {
                el.set_attribute("target", "_blank")?;
            }
            el.set_attribute("rel", "noopener noreferrer")?;
        }
        Ok(())
    })
}
