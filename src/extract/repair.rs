//! Code Repairer
//!
//! Bounded heuristic fixes for superficial syntax artifacts in extracted
//! code, applied before structural parsing. No semantic correction is
//! attempted.
//!
//! The routine is idempotent: running it on its own output changes
//! nothing, and it never introduces new unbalanced symbols. Excess
//! closing brackets are trimmed from the right; missing closers are
//! never inserted - guessing insertion points is higher-risk than
//! leaving under-closed code to surface as a parse error.

use std::sync::LazyLock;

use regex::Regex;

/// Double-quoted or single-quoted single-line f-string literal.
static FSTRING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"f("[^"\n]*"|'[^'\n]*')"#).expect("valid regex")
});

/// A trailing comma directly before a closing parenthesis, guarded so a
/// run of commas is left alone (only a single comma is ever removed).
static TRAILING_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^,]),\s*\)").expect("valid regex"));

/// Apply all repair passes in order and trim surrounding whitespace.
pub fn repair(code: &str) -> String {
    let stripped = strip_comments(code);
    let trimmed = trim_excess_closers(&stripped);
    let escaped = escape_fstring_braces(&trimmed);
    let decommaed = remove_trailing_comma(&escaped);
    decommaed.trim().to_string()
}

/// Drop blank and comment-only lines; cut inline comments.
///
/// The `#` detection tracks single/double quote state per line, so a
/// marker inside a one-line string literal survives. Markers inside
/// triple-quoted strings will be mis-stripped - an accepted limitation
/// of the line-oriented heuristic, not something to silently fix here.
fn strip_comments(code: &str) -> String {
    let mut kept = Vec::new();

    for line in code.lines() {
        let cut = cut_inline_comment(line);
        let trimmed_end = cut.trim_end();
        if trimmed_end.trim().is_empty() {
            continue;
        }
        kept.push(trimmed_end.to_string());
    }

    kept.join("\n")
}

fn cut_inline_comment(line: &str) -> &str {
    let mut in_single = false;
    let mut in_double = false;
    let mut escape = false;

    for (idx, ch) in line.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' if in_single || in_double => escape = true,
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '#' if !in_single && !in_double => return &line[..idx],
            _ => {}
        }
    }

    line
}

/// For each bracket kind independently, delete rightmost closers until
/// counts balance. Never touches an excess of openers.
fn trim_excess_closers(code: &str) -> String {
    let mut result = code.to_string();

    for (open, close) in [('(', ')'), ('[', ']'), ('{', '}')] {
        let opens = result.chars().filter(|&c| c == open).count();
        let mut closes = result.chars().filter(|&c| c == close).count();

        while closes > opens {
            match result.rfind(close) {
                Some(idx) => {
                    result.remove(idx);
                    closes -= 1;
                }
                None => break,
            }
        }
    }

    result
}

/// Escape brace pairs inside f-string literals whose braces are balanced,
/// so template syntax cannot derail the parser. Already-doubled braces
/// pass through untouched, which keeps the rewrite a fixpoint.
fn escape_fstring_braces(code: &str) -> String {
    FSTRING_RE
        .replace_all(code, |caps: &regex::Captures<'_>| {
            let literal = &caps[0];
            let opens = literal.chars().filter(|&c| c == '{').count();
            let closes = literal.chars().filter(|&c| c == '}').count();
            if opens == 0 || opens != closes {
                return literal.to_string();
            }
            double_braces(literal)
        })
        .into_owned()
}

fn double_braces(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len() + 8);
    let mut chars = literal.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' | '}' => {
                if chars.peek() == Some(&ch) {
                    chars.next();
                }
                out.push(ch);
                out.push(ch);
            }
            other => out.push(other),
        }
    }

    out
}

/// Remove a single trailing comma before `)`. Iterated to a fixpoint so
/// the pass composes into an idempotent `repair`.
fn remove_trailing_comma(code: &str) -> String {
    let mut current = code.to_string();
    loop {
        let next = TRAILING_COMMA_RE
            .replace_all(&current, "${1})")
            .into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn count(s: &str, c: char) -> usize {
        s.chars().filter(|&x| x == c).count()
    }

    #[test]
    fn test_balanced_code_unchanged() {
        let code = "def add(a, b):\n    return a + b";
        assert_eq!(repair(code), code);
    }

    #[test]
    fn test_strips_comment_lines_and_inline_comments() {
        let code = "# header\nx = 1  # set x\n\ny = 2";
        assert_eq!(repair(code), "x = 1\ny = 2");
    }

    #[test]
    fn test_hash_in_string_literal_kept() {
        let code = "x = \"a#b\"";
        assert_eq!(repair(code), "x = \"a#b\"");
    }

    #[test]
    fn test_trims_excess_closing_parens_from_right() {
        assert_eq!(repair("print(42))"), "print(42)");
        assert_eq!(repair("f(g(x)))))"), "f(g(x))");
    }

    #[test]
    fn test_never_inserts_missing_closers() {
        // Under-closed code is left as-is and will surface as a parse error.
        assert_eq!(repair("print(42"), "print(42");
        assert_eq!(repair("xs = [1, 2"), "xs = [1, 2");
    }

    #[test]
    fn test_trims_each_bracket_kind_independently() {
        assert_eq!(repair("d = {1: 2}}"), "d = {1: 2}");
        assert_eq!(repair("xs = [1]]"), "xs = [1]");
    }

    #[test]
    fn test_fstring_braces_escaped() {
        assert_eq!(repair("s = f\"{x}\""), "s = f\"{{x}}\"");
    }

    #[test]
    fn test_fstring_unbalanced_braces_left_alone() {
        assert_eq!(repair("s = f\"{x\""), "s = f\"{x\"");
    }

    #[test]
    fn test_fstring_escape_is_fixpoint() {
        let once = repair("s = f\"{x}\"");
        assert_eq!(repair(&once), once);
    }

    #[test]
    fn test_trailing_comma_removed() {
        assert_eq!(repair("f(a, b,)"), "f(a, b)");
        assert_eq!(repair("f(a, )"), "f(a)");
    }

    #[test]
    fn test_double_trailing_comma_left_alone() {
        // Only a single comma qualifies; a run of commas is a real syntax
        // error the parser should see.
        assert_eq!(repair("f(a,,)"), "f(a,,)");
    }

    #[test]
    fn test_scenario_unclosed_call_untouched() {
        // opens=1, closes=0: closers never exceed openers, nothing to trim
        let repaired = repair("print(42");
        assert_eq!(repaired, "print(42");
    }

    proptest! {
        #[test]
        fn prop_repair_is_idempotent(code in "[a-z(){}\\[\\],#'\"=\n f0-9]{0,120}") {
            let once = repair(&code);
            let twice = repair(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_no_excess_closers_in_output(code in "[a-z(){}\\[\\],#'\"=\n f0-9]{0,120}") {
            // Trimming equalizes, escaping adds balanced pairs, nothing
            // else touches brackets: closers never outnumber openers.
            let out = repair(&code);
            for (open, close) in [('(', ')'), ('[', ']'), ('{', '}')] {
                prop_assert!(count(&out, close) <= count(&out, open));
            }
        }
    }
}
