//! Post-processing: deterministic cleanup of LLM-generated table text.
//!
//! Even with explicit instructions, models wrap the table in code fences,
//! answer with CRLF line endings, or sprinkle zero-width characters. Each of
//! these would shift or pollute the fields the parser sees, so they are
//! removed here, before parsing.
//!
//! Rules never add, drop, or reorder lines: the parser's two-line header
//! window must see exactly what the model produced. Rule order matters: line
//! endings are normalised before fence detection so CRLF output is handled.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to the raw model output.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF/CR → LF)
/// 2. Strip an outer code fence (```` ``` ```` or ```` ```text ````)
/// 3. Remove invisible Unicode (zero-width spaces, BOM, soft hyphens)
pub fn clean_raw_table(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = strip_code_fences(&s);
    remove_invisible_chars(&s)
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Strip outer code fences ──────────────────────────────────────────

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[A-Za-z]*\n(.*)\n```\s*$").unwrap());

fn strip_code_fences(input: &str) -> String {
    if let Some(caps) = RE_OUTER_FENCES.captures(input.trim()) {
        caps[1].to_string()
    } else {
        input.to_string()
    }
}

// ── Rule 3: Remove invisible Unicode characters ──────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input
        .chars()
        .filter(|c| {
            !matches!(
                c,
                '\u{200B}' // zero-width space
                    | '\u{200C}' // zero-width non-joiner
                    | '\u{200D}' // zero-width joiner
                    | '\u{2060}' // word joiner
                    | '\u{FEFF}' // BOM
                    | '\u{00AD}' // soft hyphen
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fences_with_lang() {
        let input = "```text\nH1\nH2\n```";
        assert_eq!(strip_code_fences(input), "H1\nH2");
    }

    #[test]
    fn test_strip_fences_no_lang() {
        let input = "```\nH1\nH2\n```\n";
        assert_eq!(strip_code_fences(input), "H1\nH2");
    }

    #[test]
    fn test_no_fences_passthrough() {
        assert_eq!(strip_code_fences("H1\nH2"), "H1\nH2");
    }

    #[test]
    fn test_normalise_line_endings() {
        assert_eq!(normalise_line_endings("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_remove_invisible() {
        let input = "nice\u{200B}|\u{FEFF}반갑습니다|so\u{00AD}on";
        assert_eq!(remove_invisible_chars(input), "nice|반갑습니다|soon");
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let input = "H1\n\nrow|a|b\n";
        assert_eq!(clean_raw_table(input), input);
    }

    #[test]
    fn test_empty_field_rows_are_kept() {
        assert_eq!(clean_raw_table("H1\nH2\n||"), "H1\nH2\n||");
    }

    #[test]
    fn test_plain_output_unchanged() {
        let input = "H1\nH2\nIt is ___ to meet you.|당신을 만나서 반갑습니다.|nice";
        assert_eq!(clean_raw_table(input), input);
    }

    #[test]
    fn test_clean_full_pipeline() {
        let input = "```text\r\nExercise|Korean Translation|Answer\r\n---|---|---\r\nI ___ apples.\u{200B}|나는 사과를 좋아한다.|like\r\n```";
        assert_eq!(
            clean_raw_table(input),
            "Exercise|Korean Translation|Answer\n---|---|---\nI ___ apples.|나는 사과를 좋아한다.|like"
        );
    }
}
