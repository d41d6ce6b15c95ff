//! Routing of documents by their identity.

/// What a document is, judged from its identity string alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// A markdown page (`*.md`).
    Markdown,
    /// A Svelte page template (`*page.svelte`).
    PageTemplate,
    /// A Svelte layout template (`*layout.svelte`).
    LayoutTemplate,
    /// Anything else.
    Other,
}

impl DocumentKind {
    /// Classify a document identity by suffix.
    ///
    /// # Examples
    ///
    /// ```
    /// use svpage_svelte::DocumentKind;
    ///
    /// assert_eq!(DocumentKind::of("docs/intro.md"), DocumentKind::Markdown);
    /// assert_eq!(DocumentKind::of("src/routes/+page.svelte"), DocumentKind::PageTemplate);
    /// assert_eq!(DocumentKind::of("src/routes/+layout.svelte"), DocumentKind::LayoutTemplate);
    /// assert_eq!(DocumentKind::of("src/lib/Button.svelte"), DocumentKind::Other);
    /// ```
    pub fn of(identity: &str) -> Self {
        if identity.ends_with(".md") {
            DocumentKind::Markdown
        } else if identity.ends_with("page.svelte") {
            DocumentKind::PageTemplate
        } else if identity.ends_with("layout.svelte") {
            DocumentKind::LayoutTemplate
        } else {
            DocumentKind::Other
        }
    }

    /// The `pageType` tag recorded in frontmatter for this kind.
    pub fn page_type(self) -> Option<&'static str> {
        match self {
            DocumentKind::Markdown => Some("md"),
            DocumentKind::PageTemplate => Some("svelte"),
            DocumentKind::LayoutTemplate | DocumentKind::Other => None,
        }
    }
}
