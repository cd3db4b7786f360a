//! Deposit form validation
//!
//! A submission is free text. Each line may carry one labelled field
//! (`TAG ...: value`). The form is accepted once enough lines carry a
//! non-empty value for one of the required tags.

use regex::Regex;
use std::sync::LazyLock;

/// Field tags the deposit form asks for
pub const FIELDS: [&str; 7] = [
    "LINK",
    "DEPOSITANTES",
    "META",
    "MÉDIA",
    "MONTANTE",
    "VALOR ENVIADO",
    "PRAZO",
];

/// Minimum number of filled lines for a submission to be accepted
pub const MIN_FILLED_FIELDS: usize = 6;

// Tag anywhere in the line, then anything up to the first colon, then the value.
static FIELD_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    FIELDS
        .iter()
        .map(|field| {
            Regex::new(&format!(r"(?i){}[^:]*:\s*(.+)", regex::escape(field)))
                .expect("field pattern is a valid regex")
        })
        .collect()
});

/// Count the lines of `text` that carry a filled-in form field.
///
/// A line counts at most once, no matter how many tags it mentions.
pub fn count_filled_fields(text: &str) -> usize {
    text.split('\n')
        .filter(|line| FIELD_PATTERNS.iter().any(|re| line_has_value(re, line)))
        .count()
}

fn line_has_value(re: &Regex, line: &str) -> bool {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .is_some_and(|value| !value.as_str().trim().is_empty())
}

/// Whether `text` is an acceptable deposit form submission
pub fn validate(text: &str) -> bool {
    count_filled_fields(text) >= MIN_FILLED_FIELDS
}
