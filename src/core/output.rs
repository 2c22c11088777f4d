//! Diagnostic rendering helpers.
//!
//! Block reasons are single stderr lines consumed by the host, so values
//! quoted from arbitrary artifacts must stay bounded and newline-free.

use serde_json::Value as JsonValue;

const MAX_QUOTED_CHARS: usize = 48;

/// Render an optional JSON value for inline quoting in a diagnostic:
/// whitespace collapsed, length bounded, `absent` for a missing field.
pub fn quote_value(value: Option<&JsonValue>) -> String {
    let Some(value) = value else {
        return "absent".to_string();
    };
    let collapsed = value
        .to_string()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let mut chars = collapsed.chars();
    let preview: String = chars.by_ref().take(MAX_QUOTED_CHARS).collect();
    if chars.next().is_some() {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_value_reads_as_absent() {
        assert_eq!(quote_value(None), "absent");
    }

    #[test]
    fn strings_keep_their_quotes() {
        assert_eq!(quote_value(Some(&json!("later"))), "\"later\"");
        assert_eq!(quote_value(Some(&json!(5))), "5");
    }

    #[test]
    fn long_values_are_bounded() {
        let value = json!("x".repeat(200));
        let rendered = quote_value(Some(&value));
        assert!(rendered.len() <= MAX_QUOTED_CHARS + 3);
        assert!(rendered.ends_with("..."));
    }

    #[test]
    fn newlines_are_collapsed() {
        let value = json!({ "a": "first\nsecond" });
        assert!(!quote_value(Some(&value)).contains('\n'));
    }
}
