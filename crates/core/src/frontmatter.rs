use serde_json::Value as JsonValue;
use thiserror::Error;

/// Page-level metadata, kept in insertion order.
pub type Frontmatter = serde_json::Map<String, JsonValue>;

/// Result returned after extracting frontmatter from a document.
#[derive(Debug)]
pub struct FrontmatterExtraction {
    /// Parsed frontmatter as a JSON object.
    pub value: Frontmatter,
    /// Byte offset inside the original document where the body begins.
    pub body_start: usize,
}

impl FrontmatterExtraction {
    fn empty() -> Self {
        Self {
            value: Frontmatter::new(),
            body_start: 0,
        }
    }
}

/// Errors emitted while parsing or extracting frontmatter.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// Unclosed YAML fence (e.g., missing terminating `---`).
    #[error("Unterminated YAML frontmatter block: expected closing '---'")]
    Unterminated,
    /// YAML failed to parse.
    #[error("Frontmatter parse error: {0}")]
    Parse(String),
    /// Top-level YAML node was not a mapping.
    #[error("Frontmatter must be a YAML mapping at the top level")]
    InvalidRootType,
}

/// Extracts a leading YAML frontmatter block from a document.
pub fn extract_frontmatter(input: &str) -> Result<FrontmatterExtraction, FrontmatterError> {
    match find_yaml_block(input)? {
        Some((block, body_start)) => {
            let value = parse_yaml_block(&block)?;
            Ok(FrontmatterExtraction { value, body_start })
        }
        None => Ok(FrontmatterExtraction::empty()),
    }
}

/// Reads the metadata header of a Svelte page template.
///
/// The header is either a leading `---` YAML fence or a leading HTML comment
/// wrapping one (`<!--\n---\ntitle: x\n---\n-->`), which keeps the template
/// valid Svelte. A missing or malformed header yields an empty map.
pub fn extract_template_frontmatter(template: &str) -> Frontmatter {
    let (without_bom, _) = strip_bom(template);
    let trimmed = without_bom.trim_start();

    let header = match trimmed.strip_prefix("<!--") {
        Some(rest) => match rest.find("-->") {
            Some(end) => &rest[..end],
            None => return Frontmatter::new(),
        },
        None => trimmed,
    };

    match extract_frontmatter(header) {
        Ok(extraction) => extraction.value,
        Err(err) => {
            log::warn!("ignoring malformed template frontmatter: {err}");
            Frontmatter::new()
        }
    }
}

fn parse_yaml_block(block: &str) -> Result<Frontmatter, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(Frontmatter::new());
    }

    let yaml_value: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|err| FrontmatterError::Parse(err.to_string()))?;
    let json_value =
        serde_json::to_value(yaml_value).map_err(|err| FrontmatterError::Parse(err.to_string()))?;

    match json_value {
        JsonValue::Null => Ok(Frontmatter::new()),
        JsonValue::Object(map) => Ok(map),
        _ => Err(FrontmatterError::InvalidRootType),
    }
}

fn find_yaml_block(input: &str) -> Result<Option<(String, usize)>, FrontmatterError> {
    let (without_bom, bom_len) = strip_bom(input);
    let mut cursor = 0usize;

    loop {
        match next_line(without_bom, cursor) {
            Some((line, next_cursor)) => {
                if line.trim().is_empty() {
                    cursor = next_cursor;
                    continue;
                }

                if !is_yaml_fence(line) {
                    return Ok(None);
                }

                let block_start = next_cursor;
                let mut scan_cursor = next_cursor;

                loop {
                    match next_line(without_bom, scan_cursor) {
                        Some((block_line, next_line_cursor)) => {
                            if is_yaml_fence(block_line) {
                                let raw_block = &without_bom[block_start..scan_cursor];
                                let trimmed = raw_block.trim_end_matches(['\r', '\n']);
                                let body_index = bom_len + next_line_cursor;
                                return Ok(Some((trimmed.to_string(), body_index)));
                            }
                            scan_cursor = next_line_cursor;
                        }
                        None => return Err(FrontmatterError::Unterminated),
                    }
                }
            }
            None => return Ok(None),
        }
    }
}

fn strip_bom(input: &str) -> (&str, usize) {
    if let Some(stripped) = input.strip_prefix('\u{feff}') {
        (stripped, '\u{feff}'.len_utf8())
    } else {
        (input, 0)
    }
}

fn next_line(input: &str, start: usize) -> Option<(&str, usize)> {
    if start >= input.len() {
        return None;
    }

    let bytes = &input.as_bytes()[start..];
    if let Some(pos) = bytes.iter().position(|b| *b == b'\n') {
        let line_end = start + pos;
        let line = &input[start..line_end];
        Some((line, line_end + 1))
    } else {
        Some((&input[start..], input.len()))
    }
}

fn is_yaml_fence(line: &str) -> bool {
    // Header fences may be indented when nested in an HTML comment.
    line.trim() == "---"
}
