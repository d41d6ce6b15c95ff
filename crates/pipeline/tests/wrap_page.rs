use insta::assert_snapshot;
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use svpage::{
    ContentConverter, ConvertedDocument, ConverterOptions, FixedLastUpdate, MarkdownConverter,
    PageCache, PageError, PageRequest, PageWrapper,
};

/// Markdown converter that counts how often it runs.
#[derive(Clone, Default)]
struct Counting {
    calls: Arc<AtomicUsize>,
}

impl Counting {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ContentConverter for Counting {
    fn convert(
        &self,
        markdown: &str,
        filename: &str,
        options: &ConverterOptions,
    ) -> Result<Option<ConvertedDocument>, PageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        MarkdownConverter.convert(markdown, filename, options)
    }
}

struct Failing;

impl ContentConverter for Failing {
    fn convert(
        &self,
        _markdown: &str,
        filename: &str,
        _options: &ConverterOptions,
    ) -> Result<Option<ConvertedDocument>, PageError> {
        Err(PageError::convert("unsupported syntax", filename, 1, 1))
    }
}

struct Silent;

impl ContentConverter for Silent {
    fn convert(
        &self,
        _markdown: &str,
        _filename: &str,
        _options: &ConverterOptions,
    ) -> Result<Option<ConvertedDocument>, PageError> {
        Ok(None)
    }
}

fn wrapper(converter: impl ContentConverter + 'static) -> PageWrapper {
    PageWrapper::builder()
        .converter(converter)
        .last_update(FixedLastUpdate(Some(1_700_000_000_000)))
        .build()
}

#[test]
fn markdown_without_layout_is_converter_output() {
    let out = wrapper(Counting::default())
        .wrap_page(&PageRequest::new("a.md", "# Hi"))
        .unwrap();
    assert_eq!(out.markup, "<h1>Hi</h1>");
    assert_eq!(
        JsonValue::Object(out.frontmatter.clone()),
        json!({ "pageType": "md", "lastUpdate": 1_700_000_000_000u64 })
    );
}

#[test]
fn markdown_frontmatter_is_merged_after_derived_keys() {
    let out = wrapper(Counting::default())
        .wrap_page(&PageRequest::new("guide.md", "---\ntitle: Guide\n---\n# Guide"))
        .unwrap();
    let keys: Vec<&str> = out.frontmatter.keys().map(String::as_str).collect();
    assert_eq!(keys, ["pageType", "lastUpdate", "title"]);
    assert_eq!(out.frontmatter["title"], "Guide");
}

#[test]
fn page_template_header_becomes_metadata() {
    let content = "---\ntitle: Hello\n---\n<h1>Hello</h1>";
    let out = wrapper(Counting::default())
        .wrap_page(&PageRequest::new("b/page.svelte", content))
        .unwrap();
    assert_eq!(
        JsonValue::Object(out.frontmatter.clone()),
        json!({ "title": "Hello", "pageType": "svelte", "lastUpdate": 1_700_000_000_000u64 })
    );
    assert_eq!(out.markup, content);
}

#[test]
fn repeated_requests_hit_the_cache() {
    let converter = Counting::default();
    let wrapper = wrapper(converter.clone());
    let request = PageRequest::new("a.md", "# Hi").with_layout("/Layout.svelte");

    let first = wrapper.wrap_page(&request).unwrap();
    let second = wrapper.wrap_page(&request).unwrap();

    assert_eq!(first, second);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(converter.calls(), 1);
}

#[test]
fn edited_content_misses_the_cache() {
    let converter = Counting::default();
    let wrapper = wrapper(converter.clone());

    let before = wrapper.wrap_page(&PageRequest::new("a.md", "# Hi")).unwrap();
    let after = wrapper.wrap_page(&PageRequest::new("a.md", "# Ho")).unwrap();

    assert_eq!(before.markup, "<h1>Hi</h1>");
    assert_eq!(after.markup, "<h1>Ho</h1>");
    assert_eq!(converter.calls(), 2);
}

#[test]
fn cache_evicts_least_recently_used_page() {
    let converter = Counting::default();
    let wrapper = PageWrapper::builder()
        .converter(converter.clone())
        .last_update(FixedLastUpdate(None))
        .cache(Arc::new(PageCache::new(2)))
        .build();
    let a = PageRequest::new("a.md", "a");
    let b = PageRequest::new("b.md", "b");
    let c = PageRequest::new("c.md", "c");

    wrapper.wrap_page(&a).unwrap();
    wrapper.wrap_page(&b).unwrap();
    wrapper.wrap_page(&a).unwrap();
    wrapper.wrap_page(&c).unwrap();
    assert_eq!(converter.calls(), 3);

    // `a` survived, `b` was evicted.
    wrapper.wrap_page(&a).unwrap();
    assert_eq!(converter.calls(), 3);
    wrapper.wrap_page(&b).unwrap();
    assert_eq!(converter.calls(), 4);
}

#[test]
fn shared_cache_spans_wrappers() {
    let cache = Arc::new(PageCache::new(8));
    let converter = Counting::default();
    let build = || {
        PageWrapper::builder()
            .converter(converter.clone())
            .last_update(FixedLastUpdate(None))
            .cache(Arc::clone(&cache))
            .build()
    };
    let request = PageRequest::new("a.md", "# Hi");
    build().wrap_page(&request).unwrap();
    build().wrap_page(&request).unwrap();
    assert_eq!(converter.calls(), 1);
}

#[test]
fn concurrent_requests_convert_once() {
    let converter = Counting::default();
    let wrapper = wrapper(converter.clone());
    let request = PageRequest::new("a.md", "# Hi");

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| wrapper.wrap_page(&request).unwrap());
        }
    });

    assert_eq!(converter.calls(), 1);
}

#[test]
fn converter_failure_yields_empty_page() {
    let out = wrapper(Failing)
        .wrap_page(&PageRequest::new("broken.md", "# Hi"))
        .unwrap();
    assert_eq!(out.markup, "");
    assert_eq!(
        JsonValue::Object(out.frontmatter.clone()),
        json!({ "pageType": "md", "lastUpdate": 1_700_000_000_000u64 })
    );
}

#[test]
fn missing_converter_result_yields_empty_page() {
    let out = wrapper(Silent)
        .wrap_page(&PageRequest::new("a.md", "# Hi").with_layout("/Layout.svelte"))
        .unwrap();
    assert!(out.markup.contains("<PageLayout {fm} {siteConfig}></PageLayout>"));
}

#[test]
fn markdown_page_is_wrapped_in_layout() {
    let content = "---\ntitle: Counter\n---\n\
<script>\n  let count = 0\n</script>\n\n\
<svelte:head>\n<title>Counter</title>\n</svelte:head>\n\n\
# Count: {count}\n\n\
<style>\n  h1 { color: red }\n</style>\n";
    let request = PageRequest::new("counter.md", content)
        .with_site_config(json!({ "title": "Site" }))
        .with_layout("/src/Layout.svelte");
    let out = PageWrapper::builder()
        .last_update(FixedLastUpdate(None))
        .build()
        .wrap_page(&request)
        .unwrap();

    assert_snapshot!(out.markup.trim_end(), @r#"
    <script>
    import PageLayout from '/src/Layout.svelte'
    const fm = {"pageType":"md","lastUpdate":null,"title":"Counter"}
    const siteConfig = {"title":"Site"}
      let count = 0
    </script>
    <svelte:head>
    <title>Counter</title>
    </svelte:head>
    <PageLayout {fm} {siteConfig}>

    <h1>Count: {count}</h1>

    </PageLayout>
    <style>
      h1 { color: red }
    </style>
    "#);
}

#[test]
fn page_template_is_wrapped_in_layout() {
    let content = "<!--\n---\ntitle: About\n---\n-->\n<script>\n  let x = 1\n</script>\n<p>{x}</p>";
    let request = PageRequest::new("about/+page.svelte", content).with_layout("/Layout.svelte");
    let out = wrapper(Counting::default()).wrap_page(&request).unwrap();

    assert_eq!(out.frontmatter["title"], "About");
    assert!(out.markup.starts_with("<script>\nimport PageLayout from '/Layout.svelte'\n"));
    assert!(out.markup.contains("  let x = 1\n</script>"));
    assert!(out
        .markup
        .contains("<PageLayout {fm} {siteConfig}><!--\n---\ntitle: About\n---\n-->\n\n<p>{x}</p></PageLayout>"));
}

#[test]
fn output_serializes_for_the_bundler() {
    let out = wrapper(Counting::default())
        .wrap_page(&PageRequest::new("a.md", "# Hi"))
        .unwrap();
    assert_eq!(
        out.to_json().unwrap(),
        r#"{"wrappedCode":"<h1>Hi</h1>","fm":{"pageType":"md","lastUpdate":1700000000000}}"#
    );
}
