//! Isolates the first balanced `{...}` region in a completion.

use std::ops::Range;

use crate::error::ExtractionError;

/// Returns the first balanced `{...}` region of `text`, braces included.
///
/// Scanning starts at the first `{`. Every `{` and `}` counts towards the
/// depth, wherever it appears; the region is not interpreted as JSON.
/// Anything after the region (including further objects) is ignored.
///
/// # Errors
///
/// [`ExtractionError::NoOpeningBrace`] if `text` has no `{`, and
/// [`ExtractionError::Unbalanced`] if it ends before the region closes.
///
/// # Examples
///
/// ```
/// use floorplan::recovery::extract_object;
///
/// let reply = r#"Sure! Here it is: {"rooms": []} Anything else?"#;
/// assert_eq!(extract_object(reply).unwrap(), r#"{"rooms": []}"#);
/// ```
pub fn extract_object(text: &str) -> Result<&str, ExtractionError> {
    let span = find_object_span(text)?;
    Ok(&text[span])
}

/// Byte range of the region [`extract_object`] would return.
pub fn find_object_span(text: &str) -> Result<Range<usize>, ExtractionError> {
    let start = text.find('{').ok_or(ExtractionError::NoOpeningBrace)?;

    let mut depth = 0usize;

    // Delimiters are ASCII, so byte offsets are always char boundaries.
    for (offset, &byte) in text.as_bytes()[start..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + 1;
                    return Ok(start..end);
                }
            }
            _ => {}
        }
    }

    Err(ExtractionError::Unbalanced { start, depth })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surrounding_prose() {
        let input = r#"Here is the JSON: {"name": "Kitchen"} hope that helps!"#;
        assert_eq!(extract_object(input).unwrap(), r#"{"name": "Kitchen"}"#);
    }

    #[test]
    fn test_nested_objects_kept() {
        let input = r#"x {"a": {"b": {"c": 1}}, "d": 2} y"#;
        assert_eq!(
            extract_object(input).unwrap(),
            r#"{"a": {"b": {"c": 1}}, "d": 2}"#
        );
    }

    #[test]
    fn test_first_of_many() {
        let input = r#"First: {"a": 1} and second: {"b": 2}"#;
        assert_eq!(extract_object(input).unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_no_opening_brace() {
        assert_eq!(
            extract_object("I could not find any rooms."),
            Err(ExtractionError::NoOpeningBrace)
        );
        assert_eq!(extract_object(""), Err(ExtractionError::NoOpeningBrace));
    }

    #[test]
    fn test_unbalanced() {
        let input = r#"Result: {"rooms": [{"name": "Kitchen"}"#;
        assert_eq!(
            extract_object(input),
            Err(ExtractionError::Unbalanced { start: 8, depth: 1 })
        );
    }

    #[test]
    fn test_closing_before_opening_is_ignored() {
        let input = r#"} stray {"a": 1}"#;
        assert_eq!(extract_object(input).unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_braces_inside_strings_count() {
        let input = r#"{"name": "odd } name {", "link": []} tail"#;
        assert_eq!(extract_object(input).unwrap(), r#"{"name": "odd }"#);
    }

    #[test]
    fn test_quotes_do_not_hide_braces() {
        assert_eq!(extract_object("{\"} tail").unwrap(), "{\"}");

        let input = r#"note {say "hi} then {"rooms": []}"#;
        assert_eq!(extract_object(input).unwrap(), r#"{say "hi}"#);
    }

    #[test]
    fn test_unmatched_brace_inside_string_unbalances() {
        let input = r#"{"name": "open { only"}"#;
        assert_eq!(
            extract_object(input),
            Err(ExtractionError::Unbalanced { start: 0, depth: 1 })
        );
    }

    #[test]
    fn test_multibyte_prose() {
        let input = "这是结果：{\"rooms\": []}。";
        let span = find_object_span(input).unwrap();
        assert_eq!(&input[span], "{\"rooms\": []}");
    }

    #[test]
    fn test_markdown_fence() {
        let input = "```json\n{\"rooms\": []}\n```";
        assert_eq!(extract_object(input).unwrap(), "{\"rooms\": []}");
    }
}
