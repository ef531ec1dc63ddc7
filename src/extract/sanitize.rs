//! Response Sanitizer
//!
//! Isolates the intended code from one raw model response. Model output is
//! noisy - reasoning traces, prose, several fenced fragments, partial
//! syntax, or no code at all - so extraction runs a strict fallback
//! ladder:
//!
//! 1. Remove `<think>`-style reasoning regions, contents included
//! 2. Remove whole-line reasoning/analysis preamble labels
//! 3. Prefer fenced blocks; pick the longest (first occurrence on ties)
//! 4. Otherwise take from the first recognizable code-start marker and
//!    truncate at the first prose section header
//! 5. Otherwise report the explicit empty result - raw prose is never
//!    passed through as code
//!
//! The single-retry policy on an empty result belongs to the caller (see
//! `pipeline`); the sanitizer itself is a pure function of its input.

use std::sync::LazyLock;

use regex::Regex;

use super::fence::fenced_blocks;
use crate::types::ExtractedCode;

/// Paired reasoning-region markers, contents discarded entirely.
static THINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<think(?:ing)?>.*?</think(?:ing)?>").expect("valid regex")
});

/// Whole-line reasoning preamble: a label and colon at line start.
static PREAMBLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:reasoning|thinking|analysis|thoughts?)\s*:").expect("valid regex")
});

/// Prose section header that ends a heuristically-selected code region.
static PROSE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:explanations?|notes?|outputs?|results?|examples?|usage)\s*:")
        .expect("valid regex")
});

/// Explicit end-of-code marker comment.
static END_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#\s*end\b").expect("valid regex"));

/// Bare call expression, the last-resort code signal for responses that
/// inline code mid-sentence ("the answer: print(42").
static CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*\(").expect("valid regex"));

/// Line-start markers that begin a plausible code region.
const CODE_START_MARKERS: [&str; 7] = [
    "def ",
    "async def ",
    "class ",
    "import ",
    "from ",
    "@",
    "if __name__",
];

/// Extract the best-effort code string from one raw model response.
pub fn extract(raw: &str) -> ExtractedCode {
    // Step 1: reasoning regions must never leak into extracted code.
    let stripped = THINK_RE.replace_all(raw, "");

    // Step 2: drop whole-line preamble declarations.
    let cleaned: String = stripped
        .lines()
        .filter(|line| !PREAMBLE_RE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n");

    // Step 3: fenced blocks win. Longest by character count; ties go to
    // the first occurrence - models often emit short illustrative
    // fragments around the real answer.
    let blocks = fenced_blocks(&cleaned);
    if !blocks.is_empty() {
        let mut best = blocks[0];
        for &block in &blocks[1..] {
            if block.chars().count() > best.chars().count() {
                best = block;
            }
        }
        return ExtractedCode::from_candidate(best);
    }

    // Step 4: heuristic code-start detection.
    if let Some(start) = find_code_start(&cleaned) {
        let candidate = truncate_at_prose(&cleaned[start..]);
        return ExtractedCode::from_candidate(candidate);
    }

    // Step 5: nothing code-like found.
    ExtractedCode::Empty
}

/// Byte offset of the first recognizable code-start signal, if any.
///
/// Line-start definition/import/decorator/entry-point markers take
/// precedence; a bare call expression anywhere is accepted as a last
/// resort.
fn find_code_start(text: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();
        if CODE_START_MARKERS.iter().any(|m| trimmed.starts_with(m)) {
            return Some(offset + indent);
        }
        offset += line.len();
    }

    CALL_RE.find(text).map(|m| m.start())
}

/// Cut a heuristically-selected region at the first subsequent line that
/// reads as a prose section header or an explicit end marker.
fn truncate_at_prose(text: &str) -> &str {
    let mut offset = 0;
    for (idx, line) in text.split_inclusive('\n').enumerate() {
        if idx > 0 {
            let trimmed = line.trim_start();
            if PROSE_HEADER_RE.is_match(trimmed) || END_MARKER_RE.is_match(trimmed) {
                return &text[..offset];
            }
        }
        offset += line.len();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasoning_region_never_leaks() {
        let raw = "<think>ignore this entirely</think>\n```python\ndef add(a, b):\n    return a + b\n```";
        let code = extract(raw);
        let code = code.as_code().unwrap();
        assert_eq!(code, "def add(a, b):\n    return a + b");
        assert!(!code.contains("ignore"));
    }

    #[test]
    fn test_thinking_tag_variant() {
        let raw = "<thinking>secret</thinking>\n```\nx = 1\n```";
        assert_eq!(
            extract(raw),
            ExtractedCode::Code("x = 1".to_string())
        );
    }

    #[test]
    fn test_preamble_lines_dropped() {
        let raw = "Reasoning: first I will think\nanalysis: more thinking\n```\ny = 2\n```";
        assert_eq!(extract(raw), ExtractedCode::Code("y = 2".to_string()));
    }

    #[test]
    fn test_longest_block_wins() {
        let raw = "```\nx\n```\ntext\n```\nxx\n```";
        assert_eq!(extract(raw), ExtractedCode::Code("xx".to_string()));

        let raw = "```\nxx\n```\ntext\n```\nx\n```";
        assert_eq!(extract(raw), ExtractedCode::Code("xx".to_string()));
    }

    #[test]
    fn test_equal_length_first_occurrence_wins() {
        let raw = "```\nimport os\n```\n```\nimport sys\n```";
        assert_eq!(extract(raw), ExtractedCode::Code("import os".to_string()));
    }

    #[test]
    fn test_heuristic_code_start_def() {
        let raw = "Here is the solution:\ndef f(x):\n    return x\nHope that helps!";
        let code = extract(raw);
        assert!(code.as_code().unwrap().starts_with("def f(x):"));
    }

    #[test]
    fn test_heuristic_call_expression() {
        let raw = "Sure! Here's the answer: print(42";
        assert_eq!(extract(raw), ExtractedCode::Code("print(42".to_string()));
    }

    #[test]
    fn test_truncates_at_prose_header() {
        let raw = "import os\nprint(os.name)\nExplanation: this prints the OS name\nmore prose";
        assert_eq!(
            extract(raw),
            ExtractedCode::Code("import os\nprint(os.name)".to_string())
        );
    }

    #[test]
    fn test_truncates_at_end_marker() {
        let raw = "def f():\n    pass\n# end of solution\nafterword";
        assert_eq!(
            extract(raw),
            ExtractedCode::Code("def f():\n    pass".to_string())
        );
    }

    #[test]
    fn test_pure_prose_is_empty() {
        assert_eq!(extract("I'm sorry, I can't write that."), ExtractedCode::Empty);
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert_eq!(extract("   \n\t\n"), ExtractedCode::Empty);
    }

    #[test]
    fn test_empty_fence_falls_back_to_empty() {
        // A fence with nothing in it must not fabricate code.
        assert_eq!(extract("```python\n\n```"), ExtractedCode::Empty);
    }
}
