//! Lenient readers for chat answers.
//!
//! Nothing here tries to understand language: answers are matched by prefix
//! or substring, so "y", "yes" and "Yeah" all count as agreement.

use crate::dialog::flow::Intent;

/// Answer starts with `y`, ignoring case and leading whitespace.
pub fn is_yes(input: &str) -> bool {
    starts_with_ignore_case(input, 'y')
}

/// Answer starts with `n`, ignoring case and leading whitespace.
pub fn is_no(input: &str) -> bool {
    starts_with_ignore_case(input, 'n')
}

fn starts_with_ignore_case(input: &str, c: char) -> bool {
    input
        .trim_start()
        .chars()
        .next()
        .is_some_and(|first| first.eq_ignore_ascii_case(&c))
}

/// Read a task number such as `#2` or `2`.
///
/// The number must lead the answer; anything after the digits is ignored.
/// Returns the 1-based position as typed, without range checking.
pub fn parse_index(input: &str) -> Option<usize> {
    let s = input.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Keyword groups in precedence order; the first group with a hit wins.
const INTENT_KEYWORDS: [(Intent, &[&str]); 4] = [
    (Intent::Add, &["add"]),
    (Intent::Update, &["update"]),
    (Intent::Delete, &["delete", "remove"]),
    (Intent::View, &["view", "show", "list"]),
];

/// Pick the dialog a free-text request asks for.
pub fn detect_intent(input: &str) -> Option<Intent> {
    let lowered = input.to_lowercase();
    INTENT_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lowered.contains(w)))
        .map(|(intent, _)| *intent)
}
