//! Code generation for the declarations injected into a page's script block.

use serde::Serialize;
use svpage_core::{Frontmatter, PageError};

/// Local name the layout component is imported under.
pub const LAYOUT_SYMBOL: &str = "PageLayout";

/// Serializes `value` as a JSON literal safe to embed inside `<script>`.
///
/// `</` is written as `<\/`, which is the same JSON value but cannot close
/// the surrounding script element.
///
/// # Examples
///
/// ```
/// use svpage_svelte::codegen::json_literal;
///
/// assert_eq!(json_literal(&"hi", "value").unwrap(), "\"hi\"");
/// assert_eq!(json_literal(&"</script>", "value").unwrap(), "\"<\\/script>\"");
/// ```
pub fn json_literal<T: Serialize + ?Sized>(
    value: &T,
    what: &'static str,
) -> Result<String, PageError> {
    let json = serde_json::to_string(value).map_err(|err| PageError::serialize(what, err))?;
    Ok(json.replace("</", "<\\/"))
}

/// Builds the three injected declarations: the layout import, the
/// frontmatter binding and the site configuration binding.
pub fn declarations<S: Serialize + ?Sized>(
    layout: &str,
    frontmatter: &Frontmatter,
    site_config: &S,
) -> Result<String, PageError> {
    let fm = json_literal(frontmatter, "frontmatter")?;
    let config = json_literal(site_config, "site configuration")?;
    Ok([
        format!("import {LAYOUT_SYMBOL} from '{layout}'"),
        format!("const fm = {fm}"),
        format!("const siteConfig = {config}"),
    ]
    .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn frontmatter(value: serde_json::Value) -> Frontmatter {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn emits_three_declarations() {
        let fm = frontmatter(json!({ "title": "Hello", "pageType": "md" }));
        let out = declarations("/src/Layout.svelte", &fm, &json!({ "title": "Site" })).unwrap();
        assert_eq!(
            out,
            "import PageLayout from '/src/Layout.svelte'\n\
             const fm = {\"title\":\"Hello\",\"pageType\":\"md\"}\n\
             const siteConfig = {\"title\":\"Site\"}"
        );
    }

    #[test]
    fn closing_script_tags_are_neutralized() {
        let fm = frontmatter(json!({ "note": "</script><script>alert(1)</script>" }));
        let out = declarations("L.svelte", &fm, &json!(null)).unwrap();
        assert!(!out.contains("</script>"), "{out}");
        let literal = out
            .lines()
            .nth(1)
            .and_then(|line| line.strip_prefix("const fm = "))
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(literal).unwrap();
        assert_eq!(parsed["note"], "</script><script>alert(1)</script>");
    }

    #[test]
    fn unserializable_site_config_is_fatal() {
        let mut config = BTreeMap::new();
        config.insert((1, 2), "tuple keys are not JSON");
        let err = declarations("L.svelte", &Frontmatter::new(), &config).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, PageError::Serialize { what: "site configuration", .. }));
    }
}
