//! Best-effort textual repair of model output before strict JSON parsing.
//!
//! Each step is a whole-text transformation that leaves clean input untouched.
//! None of them is grammar-aware: the goal is only to raise the odds that
//! `serde_json` accepts the result. A repaired text that still fails to parse
//! is an expected outcome handled by the caller.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Known key-name mistakes observed in model output, applied in this order.
/// Matching includes the surrounding quotes so only whole string tokens change.
const KEY_TYPOS: &[(&str, &str)] = &[
    ("Estructure", "structure"),
    ("Technical_depth", "technical_depth"),
    ("Impact", "impact"),
    ("Cliquarity", "clarity"),
    ("ATS_relevance", "ats"),
    ("sory", "summary"),
];

lazy_static! {
    static ref FENCE_OPEN: Regex = Regex::new(r"(?i)^```(?:json)?[ \t]*").expect("Invalid regex");

    static ref TRAILING_COMMA: Regex = Regex::new(r",(\s*[}\]])").expect("Invalid regex");

    /// One alternation over the typo table so a single left-to-right pass
    /// never rescans text it has already replaced.
    static ref KEY_TYPO_PATTERN: Regex = {
        let alternation = KEY_TYPOS
            .iter()
            .map(|(from, _)| regex::escape(from))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!("\"({alternation})\"")).expect("Invalid regex")
    };

    /// A line whose first non-blank token is a bullet glyph, or a dash followed by a space.
    static ref BULLET_LINE: Regex =
        Regex::new(r"(?m)^[ \t]*(?:•[ \t]*|[-–—][ \t]+)(.+?)[ \t]*\r?$").expect("Invalid regex");
}

/// Runs every repair step over raw model output. Never fails.
pub fn repair(raw: &str) -> String {
    let text = raw.trim();
    let text = strip_fences(text);
    let text = remove_trailing_commas(text);
    let text = fix_key_typos(&text);
    let text = balance_closers(&text);
    let text = quote_bullet_lines(&text);
    // Rewritten bullets end in a comma; the last one may now sit before a closer.
    remove_trailing_commas(&text)
}

/// Removes a leading ```` ``` ```` / ```` ```json ```` marker and a trailing ```` ``` ````.
pub fn strip_fences(text: &str) -> &str {
    let mut text = text;
    if let Some(m) = FENCE_OPEN.find(text) {
        text = &text[m.end()..];
    }
    if let Some(stripped) = text.trim_end().strip_suffix("```") {
        text = stripped;
    }
    text.trim()
}

/// Drops a comma that directly precedes `}` or `]`, across any whitespace.
pub fn remove_trailing_commas(text: &str) -> String {
    TRAILING_COMMA.replace_all(text, "$1").into_owned()
}

pub fn fix_key_typos(text: &str) -> String {
    KEY_TYPO_PATTERN
        .replace_all(text, |caps: &Captures| {
            let found = &caps[1];
            let fixed = KEY_TYPOS
                .iter()
                .find(|(from, _)| *from == found)
                .map(|(_, to)| *to)
                .unwrap_or(found);
            format!("\"{fixed}\"")
        })
        .into_owned()
}

/// Appends missing `}` / `]` at the end of the text.
///
/// Assumes the only imbalance is truncation at the tail. The number of closers
/// appended equals the raw count deficit for each kind, so counts always balance
/// afterwards. Closers for openers still open outside string literals are
/// emitted innermost first; any remaining deficit follows, braces before brackets.
pub fn balance_closers(text: &str) -> String {
    let count = |c: char| text.chars().filter(|&ch| ch == c).count();
    let mut missing_braces = count('{').saturating_sub(count('}'));
    let mut missing_brackets = count('[').saturating_sub(count(']'));

    if missing_braces == 0 && missing_brackets == 0 {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + missing_braces + missing_brackets);
    out.push_str(text);

    for open in unclosed_openers(text).into_iter().rev() {
        match open {
            '{' if missing_braces > 0 => {
                out.push('}');
                missing_braces -= 1;
            }
            '[' if missing_brackets > 0 => {
                out.push(']');
                missing_brackets -= 1;
            }
            _ => {}
        }
    }

    out.extend(std::iter::repeat('}').take(missing_braces));
    out.extend(std::iter::repeat(']').take(missing_brackets));
    out
}

/// Openers outside string literals that are never closed, outermost first.
fn unclosed_openers(text: &str) -> Vec<char> {
    let mut stack = Vec::new();
    let mut in_str = false;
    let mut esc = false;

    for ch in text.chars() {
        if in_str {
            if esc {
                esc = false;
            } else if ch == '\\' {
                esc = true;
            } else if ch == '"' {
                in_str = false;
            }
            continue;
        }

        match ch {
            '"' => in_str = true,
            '{' | '[' => stack.push(ch),
            '}' | ']' => {
                let expected = if ch == '}' { '{' } else { '[' };
                if stack.last() == Some(&expected) {
                    stack.pop();
                }
            }
            _ => {}
        }
    }

    stack
}

/// Rewrites informal bullet lines into quoted, comma-terminated string elements.
pub fn quote_bullet_lines(text: &str) -> String {
    BULLET_LINE
        .replace_all(text, |caps: &Captures| {
            let (item, closers) = split_bullet(&caps[1]);
            let content = item.replace('\\', "\\\\").replace('"', "\\\"");
            format!("    \"{content}\",{closers}")
        })
        .into_owned()
}

/// Separates a bullet's text from the comma and closers ending its line.
///
/// A trailing `]` or `}` is peeled off only while the text holds more of that
/// closer than of its opener, so `Portfolio [GitHub]` stays whole.
fn split_bullet(line: &str) -> (&str, String) {
    let mut item = line;
    let mut closers = String::new();

    loop {
        item = item.trim_end_matches(|c: char| c == ',' || c == ' ' || c == '\t');
        let Some(last) = item.chars().last() else {
            break;
        };
        let opener = match last {
            ']' => '[',
            '}' => '{',
            _ => break,
        };
        let count = |c: char| item.chars().filter(|&ch| ch == c).count();
        if count(last) <= count(opener) {
            break;
        }
        closers.insert(0, last);
        item = &item[..item.len() - 1];
    }

    (item, closers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balanced(text: &str) -> bool {
        let count = |c: char| text.chars().filter(|&ch| ch == c).count();
        count('{') == count('}') && count('[') == count(']')
    }

    #[test]
    fn test_strip_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_fences_uppercase_tag() {
        let input = "```JSON\n{\"key\": 1}\n```";
        assert_eq!(strip_fences(input), "{\"key\": 1}");
    }

    #[test]
    fn test_strip_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_fences(input), input);
    }

    #[test]
    fn test_trailing_comma_before_brace_and_bracket() {
        let input = "{\"a\": [1, 2,\n  ],\n}";
        assert_eq!(remove_trailing_commas(input), "{\"a\": [1, 2\n  ]\n}");
    }

    #[test]
    fn test_key_typos_fixed() {
        let input = r#"{"Estructure": 10, "Technical_depth": 20, "Cliquarity": 5, "ATS_relevance": 4, "sory": "ok"}"#;
        assert_eq!(
            fix_key_typos(input),
            r#"{"structure": 10, "technical_depth": 20, "clarity": 5, "ats": 4, "summary": "ok"}"#
        );
    }

    #[test]
    fn test_key_typos_leave_reasoning_alone() {
        let input = r#"{"summary": "a", "reasoning": "b"}"#;
        assert_eq!(fix_key_typos(input), input);
    }

    #[test]
    fn test_key_typos_require_whole_token() {
        let input = r#"{"Impactful": 1, "impact": 2}"#;
        assert_eq!(fix_key_typos(input), input);
    }

    #[test]
    fn test_balance_appends_missing_brace() {
        let input = r#"{"summary": "ok", "strengths": ["fast"]"#;
        let out = balance_closers(input);
        assert_eq!(out, r#"{"summary": "ok", "strengths": ["fast"]}"#);
        assert!(serde_json::from_str::<serde_json::Value>(&out).is_ok());
    }

    #[test]
    fn test_balance_closes_innermost_first() {
        let input = r#"{"issues": ["a", "b""#;
        let out = balance_closers(input);
        assert_eq!(out, r#"{"issues": ["a", "b"]}"#);
    }

    #[test]
    fn test_balance_ignores_braces_inside_strings_for_ordering() {
        let input = r#"{"summary": "uses {braces", "issues": ["x""#;
        let out = balance_closers(input);
        assert!(balanced(&out), "unbalanced: {out}");
        assert!(out.starts_with(input));
    }

    #[test]
    fn test_balance_leaves_extra_closers() {
        let input = r#"{"a": 1}}"#;
        assert_eq!(balance_closers(input), input);
    }

    #[test]
    fn test_bullet_lines_quoted() {
        let input = "{\"strengths\": [\n  - Strong use of metrics\n  • Led \"Apollo\" migration\n]}";
        let out = quote_bullet_lines(input);
        assert!(out.contains("    \"Strong use of metrics\","));
        assert!(out.contains("    \"Led \\\"Apollo\\\" migration\","));
    }

    #[test]
    fn test_bullet_line_keeps_trailing_closers_outside_item() {
        let input = "[\n - last item,]}";
        assert_eq!(quote_bullet_lines(input), "[\n    \"last item\",]}");
    }

    #[test]
    fn test_bullet_line_keeps_bracketed_text_inside_item() {
        let input = "[\n  - Linked portfolio [GitHub]\n  - Rust {async} work}";
        assert_eq!(
            quote_bullet_lines(input),
            "[\n    \"Linked portfolio [GitHub]\",\n    \"Rust {async} work\",}"
        );
    }

    #[test]
    fn test_negative_number_line_not_treated_as_bullet() {
        let input = "[\n  -5,\n  3\n]";
        assert_eq!(quote_bullet_lines(input), input);
    }

    #[test]
    fn test_repair_bullet_array_parses() {
        let input = "{\"strengths\": [\n  - Strong use of metrics\n  - Clear layout\n]}";
        let out = repair(input);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            value["strengths"],
            serde_json::json!(["Strong use of metrics", "Clear layout"])
        );
    }

    #[test]
    fn test_repair_bullet_ending_in_bracket_mid_array() {
        let input = "{\"strengths\": [\n  - Linked portfolio [GitHub]\n  - Clear layout\n]}";
        let out = repair(input);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            value["strengths"],
            serde_json::json!(["Linked portfolio [GitHub]", "Clear layout"])
        );
    }

    #[test]
    fn test_repair_truncated_bullet_ending_in_bracket() {
        let out = repair("{\"issues\": [\n - see [notes]\n - second");
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["issues"], serde_json::json!(["see [notes]", "second"]));
    }

    #[test]
    fn test_repair_is_noop_on_clean_json() {
        let input = r#"{
  "overall_score": 70,
  "subscores": {"structure": 15, "impact": 20},
  "strengths": ["Clear - concise", "Uses metrics"],
  "summary": "Solid resume"
}"#;
        assert_eq!(repair(input), input);
        assert_eq!(repair(&format!("\n  {input}  \n")), input);
    }

    #[test]
    fn test_repair_fenced_trailing_comma_payload() {
        let input = "```json\n{\"scores\": {\"structure\": 20}, \"issues\": [{\"text\": \"too long\"}],}\n```";
        let out = repair(input);
        assert_eq!(
            out,
            "{\"scores\": {\"structure\": 20}, \"issues\": [{\"text\": \"too long\"}]}"
        );
    }

    #[test]
    fn test_repair_truncated_after_trailing_comma() {
        let out = repair(r#"{"issues": ["a","#);
        assert_eq!(out, r#"{"issues": ["a"]}"#);
    }

    #[test]
    fn test_repair_truncated_bullet_list_parses() {
        let out = repair("{\"issues\": [\n - first\n - second");
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["issues"], serde_json::json!(["first", "second"]));
    }

    #[test]
    fn test_repair_always_balances_truncated_input() {
        let samples = [
            r#"{"a": {"b": [1, 2"#,
            r#"{"a": [{"b": "c"}, {"d": ["e""#,
            r#"[[[{"#,
            r#"{"summary": "unterminated"#,
            "{\"issues\": [\n - first\n - second",
            "",
        ];
        for sample in samples {
            let out = repair(sample);
            assert!(balanced(&out), "unbalanced after repair: {out}");
        }
    }
}
