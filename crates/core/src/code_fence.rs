//! Fenced code block tracking.
//!
//! Markup inside fenced code is literal text, so rewrites that act on raw
//! markdown must leave those lines alone.

/// Fence parsing phases tracked across lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FencePhase {
    /// Not currently inside a fence.
    #[default]
    Outside,
    /// Within fence contents.
    InsideFence,
}

/// Current fence state (phase, marker, and opener length).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FenceState {
    /// Current fence phase.
    pub phase: FencePhase,
    /// Fence marker character (``` or ~~~).
    pub marker: Option<char>,
    /// Length of the opening fence (number of ` or ~ characters).
    pub length: usize,
}

/// Advance fence state over one line.
///
/// Returns the state for the next line and whether this line belongs to a
/// fence (its opener and closer included).
pub fn advance_fence_state(line: &str, state: FenceState) -> (FenceState, bool) {
    let (visual_indent, byte_offset) = leading_whitespace_info(line);
    let after_indent = line[byte_offset..].trim_end_matches(['\r', '\n']);

    match state.phase {
        // CommonMark: 4+ columns of indentation is an indented code block.
        FencePhase::Outside if visual_indent <= 3 => {
            match detect_fence_marker_with_length(after_indent) {
                Some((marker, length)) => (
                    FenceState {
                        phase: FencePhase::InsideFence,
                        marker: Some(marker),
                        length,
                    },
                    true,
                ),
                None => (state, false),
            }
        }
        FencePhase::Outside => (state, false),
        FencePhase::InsideFence => {
            let closes = visual_indent <= 3
                && is_closing_fence(after_indent)
                && detect_fence_marker_with_length(after_indent).is_some_and(
                    |(marker, length)| Some(marker) == state.marker && length >= state.length,
                );
            if closes {
                (FenceState::default(), true)
            } else {
                (state, true)
            }
        }
    }
}

/// Splits `text` into runs of lines, flagging the runs that sit inside
/// fenced code. Concatenating the runs yields `text` again.
pub fn split_fenced(text: &str) -> Vec<(bool, &str)> {
    let mut runs: Vec<(bool, &str)> = Vec::new();
    let mut state = FenceState::default();
    let mut run_start = 0;
    let mut run_fenced = false;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let (next_state, fenced) = advance_fence_state(line, state);
        if fenced != run_fenced && offset > run_start {
            runs.push((run_fenced, &text[run_start..offset]));
            run_start = offset;
        }
        run_fenced = fenced;
        state = next_state;
        offset += line.len();
    }
    if offset > run_start {
        runs.push((run_fenced, &text[run_start..offset]));
    }
    runs
}

/// Returns (visual_columns, byte_offset) for leading whitespace.
/// Visual columns expand tabs to 4-column boundaries per CommonMark.
pub(crate) fn leading_whitespace_info(line: &str) -> (usize, usize) {
    let mut col = 0;
    let mut bytes = 0;
    for b in line.bytes() {
        match b {
            b' ' => {
                col += 1;
                bytes += 1;
            }
            b'\t' => {
                col += 4 - (col % 4);
                bytes += 1;
            }
            _ => break,
        }
    }
    (col, bytes)
}

fn detect_fence_marker_with_length(after_indent: &str) -> Option<(char, usize)> {
    let mut chars = after_indent.chars();
    let first = chars.next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let run_len = 1 + chars.take_while(|c| *c == first).count();
    (run_len >= 3).then_some((first, run_len))
}

/// A closing fence has only fence markers followed by optional whitespace.
fn is_closing_fence(after_indent: &str) -> bool {
    let mut chars = after_indent.chars();
    let first = match chars.next() {
        Some(c) if c == '`' || c == '~' => c,
        _ => return false,
    };
    let mut count = 1;
    for c in chars.by_ref() {
        if c == first {
            count += 1;
        } else {
            return count >= 3 && c.is_whitespace() && chars.all(|c| c.is_whitespace());
        }
    }
    count >= 3
}
