//! Wraps component markup in a layout.
//!
//! Top-level blocks (`<svelte:head>`, `<svelte:body>`, `<svelte:window>`,
//! `<script>` and `<style>`) cannot sit inside a component's children, so
//! they are hoisted out, the remaining markup is nested inside the layout, and
//! the hoisted blocks are re-emitted around it:
//!
//! ```text
//! <script>            (first script + injected declarations, then the rest)
//! <svelte:head>...    (head, body and window blocks, in that order)
//! <PageLayout {fm} {siteConfig}>...</PageLayout>
//! <style>...          (first style block only)
//! ```

use crate::codegen::declarations;
use crate::tags::{BuiltinTag, SCRIPT_OPEN_RE, SCRIPT_RE, STYLE_RE};
use serde::Serialize;
use svpage_core::{Frontmatter, PageError, hoist};

/// Assembles `markup` into a component nested in the `layout` component.
///
/// Only the first `<style>` block survives; later ones are dropped.
pub fn assemble<S: Serialize + ?Sized>(
    markup: &str,
    frontmatter: &Frontmatter,
    site_config: &S,
    layout: &str,
) -> Result<String, PageError> {
    let injected = declarations(layout, frontmatter, site_config)?;

    let mut body = markup.to_string();
    let mut builtin_tags = Vec::new();
    for tag in BuiltinTag::ORDER {
        let hoisted = hoist(tag.pattern(), &body);
        builtin_tags.extend(hoisted.matches);
        body = hoisted.remainder;
    }

    let hoisted_scripts = hoist(&SCRIPT_RE, &body);
    let script_count = hoisted_scripts.matches.len();
    let mut scripts = hoisted_scripts.matches;
    match scripts.first_mut() {
        Some(first) => *first = inject_after_open_tag(first, &injected),
        None => scripts.extend(["<script>".to_string(), injected, "</script>".to_string()]),
    }

    // Styles are taken before scripts are stripped, so a style inside a
    // script body is found and removed too.
    let hoisted_styles = hoist(&STYLE_RE, &body);
    if hoisted_styles.matches.len() > 1 {
        log::trace!(
            "dropping {} extra style block(s)",
            hoisted_styles.matches.len() - 1
        );
    }
    let style = hoisted_styles.matches.into_iter().next().unwrap_or_default();
    body = hoist(&SCRIPT_RE, &hoisted_styles.remainder).remainder;

    log::debug!(
        "assembled page: {} builtin block(s), {} script block(s)",
        builtin_tags.len(),
        script_count
    );

    Ok(format!(
        "{}\n{}\n<PageLayout {{fm}} {{siteConfig}}>{}</PageLayout>\n{}\n",
        scripts.join("\n"),
        builtin_tags.join("\n"),
        body,
        style
    ))
}

fn inject_after_open_tag(script: &str, injected: &str) -> String {
    match SCRIPT_OPEN_RE.find(script) {
        Some(open) => {
            let mut merged = String::with_capacity(script.len() + injected.len() + 1);
            merged.push_str(&script[..open.end()]);
            merged.push('\n');
            merged.push_str(injected);
            merged.push_str(&script[open.end()..]);
            merged
        }
        None => script.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use serde_json::json;

    fn fm() -> Frontmatter {
        let mut fm = Frontmatter::new();
        fm.insert("title".to_string(), json!("Hello"));
        fm
    }

    fn assemble_default(markup: &str) -> String {
        assemble(markup, &fm(), &json!({ "name": "docs" }), "/Layout.svelte").unwrap()
    }

    #[test]
    fn synthesizes_script_when_missing() {
        let out = assemble_default("<h1>Hello</h1>");
        assert_snapshot!(out.trim_end(), @r#"
        <script>
        import PageLayout from '/Layout.svelte'
        const fm = {"title":"Hello"}
        const siteConfig = {"name":"docs"}
        </script>

        <PageLayout {fm} {siteConfig}><h1>Hello</h1></PageLayout>
        "#);
        assert_eq!(SCRIPT_RE.find_iter(&out).count(), 1);
    }

    #[test]
    fn merges_into_existing_script() {
        let out = assemble_default("<script lang=\"ts\">\n  let x = 1\n</script>\n<p>{x}</p>");
        assert_snapshot!(out.trim_end(), @r#"
        <script lang="ts">
        import PageLayout from '/Layout.svelte'
        const fm = {"title":"Hello"}
        const siteConfig = {"name":"docs"}
          let x = 1
        </script>

        <PageLayout {fm} {siteConfig}>
        <p>{x}</p></PageLayout>
        "#);
    }

    #[test]
    fn injected_bindings_precede_original_content() {
        let out = assemble_default("<script>let x = 1</script>");
        let import_at = out.find("import PageLayout").unwrap();
        let original_at = out.find("let x = 1").unwrap();
        assert!(import_at < original_at);
        assert!(out.starts_with("<script>\nimport PageLayout"));
        assert_eq!(SCRIPT_RE.find_iter(&out).count(), 1);
    }

    #[test]
    fn only_first_script_receives_declarations() {
        let out = assemble_default(
            "<script context=\"module\">export const a = 1</script><script>let b = 2</script><p/>",
        );
        assert_eq!(out.matches("import PageLayout").count(), 1);
        assert!(out.starts_with(
            "<script context=\"module\">\nimport PageLayout from '/Layout.svelte'"
        ));
        assert!(out.contains("</script>\n<script>let b = 2</script>\n"));
        assert!(out.contains("<PageLayout {fm} {siteConfig}><p/></PageLayout>"));
    }

    #[test]
    fn builtin_blocks_are_hoisted_in_fixed_order() {
        let markup = "<window on:resize={r} />\
            <p>a</p>\
            <svelte:body on:click={c}></svelte:body>\
            <svelte:head><title>T</title></svelte:head>\
            <svelte:head><meta name=\"x\"></svelte:head>";
        let out = assemble_default(markup);
        let builtin = out
            .split("</script>\n")
            .nth(1)
            .and_then(|rest| rest.split("\n<PageLayout").next())
            .unwrap();
        assert_eq!(
            builtin,
            "<svelte:head><title>T</title></svelte:head>\n\
             <svelte:head><meta name=\"x\"></svelte:head>\n\
             <svelte:body on:click={c}></svelte:body>\n\
             <window on:resize={r} />"
        );
        assert!(out.contains("<PageLayout {fm} {siteConfig}><p>a</p></PageLayout>"));
    }

    #[test]
    fn keeps_only_first_style_block() {
        let out = assemble_default("<style>h1 { color: red }</style><h1>x</h1><style>p { margin: 0 }</style>");
        assert!(out.ends_with("</PageLayout>\n<style>h1 { color: red }</style>\n"));
        assert!(!out.contains("margin"));
        assert_eq!(STYLE_RE.find_iter(&out).count(), 1);
    }

    #[test]
    fn style_is_taken_before_scripts_are_stripped() {
        let out = assemble_default(
            "<script>const css = \"<style>b{}</style>\"</script><p>x</p>",
        );
        assert!(out.starts_with("<script>\nimport PageLayout"), "{out}");
        assert!(out.contains("const css = \"<style>b{}</style>\"</script>"), "{out}");
        assert!(out.contains("<PageLayout {fm} {siteConfig}><p>x</p></PageLayout>"), "{out}");
        assert!(out.ends_with("</PageLayout>\n<style>b{}</style>\n"), "{out}");
    }

    #[test]
    fn body_has_no_leftover_blocks() {
        let out = assemble_default(
            "<div><script>inner()</script><style>a{}</style><svelte:head></svelte:head></div>",
        );
        let body = out
            .split("<PageLayout {fm} {siteConfig}>")
            .nth(1)
            .and_then(|rest| rest.split("</PageLayout>").next())
            .unwrap();
        assert_eq!(body, "<div></div>");
    }

    #[test]
    fn empty_markup_still_gets_layout() {
        let out = assemble_default("");
        assert!(out.contains("<PageLayout {fm} {siteConfig}></PageLayout>"));
        assert!(out.ends_with("</PageLayout>\n\n"));
    }

    #[test]
    fn serialization_failure_propagates() {
        let mut config = std::collections::HashMap::new();
        config.insert(vec![1u8], true);
        let err = assemble("<p/>", &fm(), &config, "/Layout.svelte").unwrap_err();
        assert!(err.is_fatal());
    }
}
