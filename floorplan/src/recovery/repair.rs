//! Textual repairs that make near-valid JSON parseable.
//!
//! The repairs run in a fixed order, each on the output of the previous one:
//!
//! 1. [`remove_comments`] strips `//` line comments and `/* */` block comments
//! 2. [`remove_trailing_commas`] drops commas directly before `}` or `]`
//! 3. [`normalize_key_values`] re-emits `type`/`location`/`size` string pairs
//!
//! Nothing else is repaired. Missing key quotes, single-quoted strings and
//! missing commas are left for the parser to reject.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a quoted string value of one of the closed-set keys.
static KEY_VALUE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(type|location|size)":\s*"(.*?)""#).expect("Invalid key-value regex pattern")
});

/// A repair step that changed the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repair {
    /// Removed line or block comments.
    Comments,
    /// Removed trailing commas.
    TrailingCommas,
    /// Rewrote closed-set key/value pairs into canonical spacing.
    KeyValuePairs,
}

impl Repair {
    /// Short name used in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Comments => "comments",
            Self::TrailingCommas => "trailing_commas",
            Self::KeyValuePairs => "key_value_pairs",
        }
    }
}

impl fmt::Display for Repair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output of [`repair`]: the rewritten text and the steps that changed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repaired {
    pub text: String,
    pub applied: Vec<Repair>,
}

/// Applies all repair steps in order.
///
/// # Examples
///
/// ```
/// use floorplan::recovery::{repair, Repair};
///
/// let repaired = repair("{\"size\": \"M\", // medium\n}");
/// assert_eq!(repaired.text, "{\"size\": \"M\" \n}");
/// assert_eq!(repaired.applied, vec![Repair::Comments, Repair::TrailingCommas]);
/// ```
pub fn repair(input: &str) -> Repaired {
    let mut applied = Vec::new();

    let steps: [(fn(&str) -> String, Repair); 3] = [
        (remove_comments, Repair::Comments),
        (remove_trailing_commas, Repair::TrailingCommas),
        (normalize_key_values, Repair::KeyValuePairs),
    ];

    let mut text = input.to_string();
    for (step, kind) in steps {
        let next = step(&text);
        if next != text {
            applied.push(kind);
            text = next;
        }
    }

    Repaired { text, applied }
}

/// Strips `//` line comments and `/* */` block comments.
///
/// A line comment runs to the end of the line; the newline itself is kept.
/// A block comment may span lines and ends at the first `*/`; text after it
/// on the same line is kept. An unterminated block comment is left alone.
/// Comment markers inside double-quoted strings are not comments.
pub fn remove_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escape_next = false;
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        let after = &rest[c.len_utf8()..];

        if escape_next {
            escape_next = false;
        } else if in_string && c == '\\' {
            escape_next = true;
        } else if c == '"' {
            in_string = !in_string;
        } else if !in_string && rest.starts_with("//") {
            rest = match rest.find('\n') {
                Some(newline) => &rest[newline..],
                None => "",
            };
            continue;
        } else if !in_string && rest.starts_with("/*") {
            if let Some(close) = rest[2..].find("*/") {
                rest = &rest[2 + close + 2..];
                continue;
            }
        }

        result.push(c);
        rest = after;
    }

    result
}

/// Removes commas followed, after optional whitespace, by `}` or `]`.
///
/// Runs of commas before a closer are removed together, so the result
/// never needs a second pass. Whitespace is kept, as are commas inside
/// double-quoted strings.
///
/// Converts: `{"a": 1,}` → `{"a": 1}`
pub fn remove_trailing_commas(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escape_next = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if escape_next {
            escape_next = false;
            result.push(c);
            continue;
        }

        match c {
            '\\' if in_string => {
                escape_next = true;
                result.push(c);
            }
            '"' => {
                in_string = !in_string;
                result.push(c);
            }
            ',' if !in_string => {
                let mut lookahead = chars.clone();
                let closer = loop {
                    match lookahead.next() {
                        Some(next) if next.is_whitespace() || next == ',' => continue,
                        Some('}') | Some(']') => break true,
                        _ => break false,
                    }
                };

                if !closer {
                    result.push(c);
                }
            }
            _ => result.push(c),
        }
    }

    result
}

/// Re-emits `"type"`, `"location"` and `"size"` pairs with string values.
///
/// Values are copied through unchanged; only the spacing after the colon is
/// canonicalized to a single space. Non-string values are left for the
/// parser to reject.
///
/// Converts: `{"size":"M"}` → `{"size": "M"}`
pub fn normalize_key_values(input: &str) -> String {
    KEY_VALUE_PATTERN
        .replace_all(input, r#""${1}": "${2}""#)
        .into_owned()
}
