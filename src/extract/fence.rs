//! Fence Scanner
//!
//! Locates triple-backtick code regions in free-form model output.
//! Structured signals beat heuristics: the sanitizer always consults this
//! scanner before falling back to line-based code detection.

const FENCE: &str = "```";

/// Return the contents of every complete fenced block in `text`, in order
/// of appearance.
///
/// The info string after the opening fence (e.g. ```` ```python ````) is
/// skipped regardless of language tag. Matching is non-overlapping and
/// non-nested: the first closing fence terminates a block. A dangling
/// opening fence with no closer yields nothing.
pub fn fenced_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    while let Some(open) = text[pos..].find(FENCE) {
        let after_open = pos + open + FENCE.len();

        // Content begins after the info-string line.
        let content_start = match text[after_open..].find('\n') {
            Some(newline) => after_open + newline + 1,
            None => break,
        };

        let Some(close) = text[content_start..].find(FENCE) else {
            break;
        };

        blocks.push(text[content_start..content_start + close].trim());
        pos = content_start + close + FENCE.len();
    }

    blocks
}
