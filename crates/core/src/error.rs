use crate::frontmatter::FrontmatterError;
use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Optional file path
    pub file: Option<String>,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }

    /// Create a source location with file information
    pub fn with_file(file: String, line: usize, column: usize) -> Self {
        Self {
            file: Some(file),
            line,
            column,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:{}:{}", file, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Errors that can occur while converting or assembling a page.
#[derive(Debug, Error)]
pub enum PageError {
    /// A frontmatter or site configuration value could not be serialized
    /// into the generated component source.
    #[error("Failed to serialize {what}: {source}")]
    Serialize {
        /// Which value failed (`frontmatter`, `site configuration`, ...).
        what: &'static str,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },
    /// The content converter rejected the document.
    #[error("Conversion error at {location}: {message}")]
    Convert {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// The leading metadata header could not be read.
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
    /// An HTML element transform failed while rewriting generated markup.
    #[error("Rewrite error: {0}")]
    Rewrite(String),
}

impl PageError {
    /// Create a serialization error for the named value.
    pub fn serialize(what: &'static str, source: serde_json::Error) -> Self {
        Self::Serialize { what, source }
    }

    /// Create a conversion error pointing into `file`.
    pub fn convert(
        message: impl Into<String>,
        file: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::Convert {
            message: message.into(),
            location: SourceLocation::with_file(file.into(), line, column),
        }
    }

    /// Whether this error must be reported by the build step instead of
    /// being recovered as an empty page.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Serialize { .. })
    }
}
