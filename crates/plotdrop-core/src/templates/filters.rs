//! Custom Tera filters for inlining data into documents.

use std::collections::HashMap;

use tera::{Filter, Result, Value};

/// Name the script-literal filter is registered under.
pub(crate) const JSON_SCRIPT: &str = "json_script";

/// Serializes any value to a JavaScript literal for a `<script>` block.
///
/// The output is marked safe so auto-escaping leaves it alone; instead `<`, `>`,
/// `&`, U+2028 and U+2029 are written as `\uXXXX` escapes, which keeps the
/// literal valid JSON while making `</script>` and `<!--` impossible.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct JsonScript;

impl Filter for JsonScript {
    fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
        let json = serde_json::to_string(value)
            .map_err(|e| tera::Error::chain("json_script filter could not serialize value", e))?;
        Ok(Value::String(escape_for_script(&json)))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

fn escape_for_script(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(value: Value) -> String {
        JsonScript
            .filter(&value, &HashMap::new())
            .unwrap()
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_serializes_structures() {
        let out = apply(serde_json::json!({ "id": "a", "tags": [1, 2] }));
        assert_eq!(out, r#"{"id":"a","tags":[1,2]}"#);
    }

    #[test]
    fn test_escapes_script_terminators() {
        let out = apply(Value::String("</script><!-- a & b".into()));
        assert!(!out.contains('<'));
        assert!(!out.contains('>'));
        assert!(!out.contains('&'));
        assert_eq!(out, r#""\u003c/script\u003e\u003c!-- a \u0026 b""#);
    }

    #[test]
    fn test_output_is_still_valid_json() {
        let original = serde_json::json!({ "html": "<b>x</b>", "sep": "\u{2028}" });
        let out = apply(original.clone());
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_quotes_are_not_html_escaped() {
        let out = apply(Value::String("say \"hi\"".into()));
        assert_eq!(out, r#""say \"hi\"""#);
        assert!(!out.contains("&quot;"));
    }

    #[test]
    fn test_filter_is_safe() {
        assert!(JsonScript.is_safe());
    }
}
