//! Tag patterns recognized by the page assembler.
//!
//! Any two blocks matching the same pattern are treated identically,
//! regardless of attributes. Every pattern consumes at least one character.

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid tag pattern {pattern}: {err}"))
}

/// A `<script>` block, any attributes.
pub static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"<script\b[^>]*>[\s\S]*?</script\b[^>]*>"));

/// The opening tag of a `<script>` block.
pub static SCRIPT_OPEN_RE: Lazy<Regex> = Lazy::new(|| compile(r"<script\b[^>]*>"));

/// A `<style>` block, any attributes.
pub static STYLE_RE: Lazy<Regex> = Lazy::new(|| compile(r"<style\b[^>]*>[\s\S]*?</style\b[^>]*>"));

/// A `<svelte:head>` block.
pub static HEAD_RE: Lazy<Regex> = Lazy::new(|| compile(r"<svelte:head>[\s\S]*?</svelte:head>"));

/// A `<svelte:body>` block, or any self-closing `<svelte... />` element.
pub static BODY_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r"(<svelte:body\b[^>]*>[\s\S]*?</svelte:body>)|(<svelte\b[^>]*/>)")
});

/// A `<svelte:window>` block, or a self-closing `<window ... />` element.
pub static WINDOW_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r"(<svelte:window\b[^>]*>[\s\S]*?</svelte:window>)|(<window\b[^>]*/>)")
});

/// Declaration blocks that must live at the top level of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTag {
    /// `<svelte:head>`
    Head,
    /// `<svelte:body>` and self-closing `<svelte ... />`
    Body,
    /// `<svelte:window>` and self-closing `<window ... />`
    Window,
}

impl BuiltinTag {
    /// Hoisting order; the assembled output lists blocks in this order.
    pub const ORDER: [BuiltinTag; 3] = [BuiltinTag::Head, BuiltinTag::Body, BuiltinTag::Window];

    /// Pattern recognizing this block kind.
    pub fn pattern(self) -> &'static Regex {
        match self {
            BuiltinTag::Head => &*HEAD_RE,
            BuiltinTag::Body => &*BODY_RE,
            BuiltinTag::Window => &*WINDOW_RE,
        }
    }
}
