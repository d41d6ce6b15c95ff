//! Shields component blocks from the markdown renderer.
//!
//! `<svelte:head>` and friends are not valid HTML tag names, so CommonMark
//! escapes them as text. Before rendering, every script, style and
//! `<svelte:*>` block outside code is swapped for an HTML comment
//! placeholder, which passes through verbatim; afterwards the placeholders
//! are swapped back. Fenced code, indented code and backtick code spans are
//! left as written.

use crate::code_fence::{leading_whitespace_info, split_fenced};
use crate::highlight::escape_svelte;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"<svelte:[a-z]+\b[^>]*/>",
        r"|<svelte:head\b[^>]*>[\s\S]*?</svelte:head\s*>",
        r"|<svelte:body\b[^>]*>[\s\S]*?</svelte:body\s*>",
        r"|<svelte:window\b[^>]*>[\s\S]*?</svelte:window\s*>",
        r"|<svelte:fragment\b[^>]*>[\s\S]*?</svelte:fragment\s*>",
        r"|<script\b[^>]*>[\s\S]*?</script\s*>",
        r"|<style\b[^>]*>[\s\S]*?</style\s*>",
    ))
    .expect("block pattern is valid")
});

/// Markdown with component blocks replaced by placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Protected {
    /// Text to hand to the renderer.
    pub text: String,
    /// Original blocks, indexed by placeholder number.
    pub blocks: Vec<String>,
    /// Placeholder namespace; never occurs in the source text.
    nonce: usize,
}

impl Protected {
    /// Wraps text that is rendered without protection.
    pub fn verbatim(text: String) -> Self {
        Self {
            text,
            ..Self::default()
        }
    }

    fn marker(&self, index: usize) -> String {
        format!("<!-- svpage-block-{}:{index} -->", self.nonce)
    }
}

/// Replaces component blocks outside code with placeholders.
pub fn protect_blocks(markdown: &str) -> Protected {
    let mut protected = Protected {
        text: String::with_capacity(markdown.len()),
        blocks: Vec::new(),
        nonce: free_nonce(markdown),
    };

    for (fenced, run) in split_fenced(markdown) {
        if fenced {
            protected.text.push_str(run);
        } else {
            protect_run(run, &mut protected);
        }
    }
    protected
}

/// Puts the original blocks back in place of their placeholders.
///
/// A placeholder the renderer treated as code text comes back escaped, and
/// is replaced by the escaped block. Placeholders the renderer dropped are
/// ignored.
pub fn restore_blocks(html: &mut String, protected: &Protected) {
    for (index, block) in protected.blocks.iter().enumerate() {
        let marker = protected.marker(index);
        if let Some(pos) = html.find(&marker) {
            html.replace_range(pos..pos + marker.len(), block);
            continue;
        }
        let escaped_marker = html_escape::encode_text(&marker);
        match html.find(&*escaped_marker) {
            Some(pos) => {
                let escaped_block = escape_svelte(&html_escape::encode_text(block));
                html.replace_range(pos..pos + escaped_marker.len(), &escaped_block);
            }
            None => log::trace!("placeholder {index} was not rendered"),
        }
    }
}

fn free_nonce(markdown: &str) -> usize {
    (0usize..)
        .find(|nonce| !markdown.contains(&format!("svpage-block-{nonce}:")))
        .unwrap_or_default()
}

/// Protects the blocks of one unfenced run, scanning left to right so that
/// whichever of a block or a code span starts first wins.
fn protect_run(run: &str, protected: &mut Protected) {
    let literal = indented_code_ranges(run);
    let mut copied = 0;
    let mut pos = 0;

    while pos < run.len() {
        if let Some(range) = literal.iter().find(|range| range.contains(&pos)) {
            pos = range.end;
            continue;
        }
        let next_literal = literal
            .iter()
            .map(|range| range.start)
            .find(|&start| start > pos)
            .unwrap_or(run.len());
        let next_tick = run[pos..next_literal].find('`').map(|at| pos + at);
        let next_block = BLOCK_RE
            .find_at(run, pos)
            .filter(|found| found.start() < next_literal);

        match (next_block, next_tick) {
            (Some(found), tick) if tick.is_none_or(|tick| found.start() < tick) => {
                let marker = protected.marker(protected.blocks.len());
                protected.text.push_str(&run[copied..found.start()]);
                protected.text.push_str(&marker);
                protected.blocks.push(found.as_str().to_string());
                copied = found.end();
                pos = found.end();
            }
            (_, Some(tick)) => pos = skip_code_span(run, tick),
            (None, None) => pos = next_literal,
            // The first arm's guard always holds when there is no tick.
            (Some(_), None) => unreachable!(),
        }
    }
    protected.text.push_str(&run[copied..]);
}

/// Lines of indented code: 4+ columns of indentation, opened after a blank
/// line (or at the start) since indented code cannot interrupt a paragraph.
fn indented_code_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = Vec::new();
    let mut offset = 0;
    let mut after_blank = true;
    let mut in_code = false;

    for line in text.split_inclusive('\n') {
        let end = offset + line.len();
        if line.trim().is_empty() {
            after_blank = true;
        } else if leading_whitespace_info(line).0 >= 4 && (after_blank || in_code) {
            match ranges.last_mut() {
                Some(last) if in_code => last.end = end,
                _ => ranges.push(offset..end),
            }
            in_code = true;
        } else {
            after_blank = false;
            in_code = false;
        }
        offset = end;
    }
    ranges
}

/// Offset just past the code span opened by the backtick run at `start`.
///
/// An escaped backtick skips one character; an unclosed run is literal text.
/// Spans end at the paragraph, so the closer is only searched up to the next
/// blank line.
fn skip_code_span(text: &str, start: usize) -> usize {
    let bytes = text.as_bytes();
    if start > 0 && bytes[start - 1] == b'\\' {
        return start + 1;
    }
    let open_len = bytes[start..].iter().take_while(|&&b| b == b'`').count();
    let after_open = start + open_len;
    let limit = paragraph_end(text, after_open);

    let mut pos = after_open;
    while let Some(found) = text[pos..limit].find('`') {
        let run_start = pos + found;
        let run_len = bytes[run_start..limit]
            .iter()
            .take_while(|&&b| b == b'`')
            .count();
        if run_len == open_len {
            return run_start + run_len;
        }
        pos = run_start + run_len;
    }
    after_open
}

fn paragraph_end(text: &str, from: usize) -> usize {
    let mut offset = from;
    for line in text[from..].split_inclusive('\n') {
        if offset > from && line.trim().is_empty() {
            return offset;
        }
        offset += line.len();
    }
    text.len()
}
