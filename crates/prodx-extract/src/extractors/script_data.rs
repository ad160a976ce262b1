//! `javascript_data`: page-state objects assigned by inline scripts.
//!
//! Each known global is looked up in script order; the first script that
//! assigns it wins. Values that are not valid JSON (JS object literals with
//! bare keys, trailing commas, ...) are kept as their raw source text.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::document::Page;
use crate::error::ExtractError;
use crate::sink::FieldSink;

/// Output key and assignment prefix for every recognized global.
const GLOBALS: [(&str, &str); 4] = [
    ("runParams", r"window\.runParams\s*=\s*"),
    ("DCData", r"window\._d_c_\.DCData\s*=\s*"),
    ("productData", r"window\.productData\s*=\s*"),
    ("pageData", r"window\.pageData\s*=\s*"),
];

static ASSIGNMENTS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    GLOBALS
        .iter()
        .map(|(name, pattern)| (*name, Regex::new(pattern).expect("valid regex")))
        .collect()
});

/// Shortest `{...};` prefix, for literals the brace scanner cannot close.
static LAZY_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(\{.*?\});").expect("valid regex"));

pub(super) fn extract(page: &Page<'_>, sink: &mut FieldSink) {
    for script in page.doc.scripts() {
        for (name, assignment) in ASSIGNMENTS.iter() {
            if sink.contains(name) {
                continue;
            }
            // Guards like `window.x = window.x || {};` precede the real literal.
            let Some(raw) = assignment
                .find_iter(&script)
                .find_map(|found| assigned_object(&script[found.end()..]))
            else {
                continue;
            };
            match serde_json::from_str::<Value>(raw) {
                Ok(value) => {
                    sink.value(name, value);
                }
                Err(err) => {
                    tracing::debug!(name, error = %err, "embedded object is not JSON, keeping raw text");
                    sink.fault(ExtractError::ScriptJson {
                        field: (*name).to_string(),
                        reason: err.to_string(),
                    });
                    sink.value(name, Value::String(raw.to_string()));
                }
            }
        }
    }
}

/// The object literal at the start of `s`.
fn assigned_object(s: &str) -> Option<&str> {
    let s = s.trim_start();
    if !s.starts_with('{') {
        return None;
    }
    extract_balanced_object(s).or_else(|| {
        LAZY_OBJECT
            .captures(s)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    })
}

/// Returns the `{...}` prefix of `s` with balanced brackets, skipping over
/// brackets inside single- or double-quoted strings.
pub(crate) fn extract_balanced_object(s: &str) -> Option<&str> {
    if !s.starts_with('{') {
        return None;
    }
    let mut depth: i32 = 0;
    let mut quote: Option<char> = None;
    let mut escape = false;
    for (i, c) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if let Some(q) = quote {
            match c {
                '\\' => escape = true,
                c if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '[' | '{' => depth += 1,
            ']' => depth -= 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use prodx_core::Section;
    use serde_json::json;

    use super::*;
    use crate::extractors::test_support::run;

    #[test]
    fn balanced_object_skips_quoted_braces() {
        let s = r#"{"a": "}", 'b': ['{'], "c": {"d": 1}}; window.x = 2;"#;
        assert_eq!(
            extract_balanced_object(s),
            Some(r#"{"a": "}", 'b': ['{'], "c": {"d": 1}}"#)
        );
    }

    #[test]
    fn balanced_object_handles_escapes() {
        let s = r#"{"a": "say \"}\""} tail"#;
        assert_eq!(extract_balanced_object(s), Some(r#"{"a": "say \"}\""}"#));
    }

    #[test]
    fn unterminated_object_is_none() {
        assert_eq!(extract_balanced_object(r#"{"a": {"b": 1}"#), None);
        assert_eq!(extract_balanced_object("[1, 2]"), None);
    }

    #[test]
    fn run_params_parsed_as_json() {
        let html = r#"<script>window.runParams = {"foo":1};</script>"#;
        let (group, report) = run(Section::JavascriptData, html);
        assert_eq!(group.get("runParams"), Some(&json!({"foo": 1})));
        assert!(report.is_clean());
    }

    #[test]
    fn nested_objects_survive_lazy_terminators() {
        let html = r#"<script>
            window.runParams = {"data": {"priceModule": {"formatedPrice": "$9.99"}}, "csrf": "x};y"};
        </script>"#;
        let (group, _) = run(Section::JavascriptData, html);
        assert_eq!(
            group.get("runParams"),
            Some(&json!({"data": {"priceModule": {"formatedPrice": "$9.99"}}, "csrf": "x};y"}))
        );
    }

    #[test]
    fn malformed_object_kept_as_raw_text() {
        let html = "<script>window.pageData = {pageType: 'item', ids: [1,2,],};</script>";
        let (group, report) = run(Section::JavascriptData, html);
        assert_eq!(
            group.get_str("pageData"),
            Some("{pageType: 'item', ids: [1,2,],}")
        );
        assert!(matches!(
            report.faults.as_slice(),
            [ExtractError::ScriptJson { field, .. }] if field == "pageData"
        ));
    }

    #[test]
    fn first_assigning_script_wins() {
        let html = r#"
            <script>window._d_c_ = {}; window._d_c_.DCData = {"first": true};</script>
            <script>window._d_c_.DCData = {"first": false};</script>
            <script>window.productData = {"id": 7};</script>"#;
        let (group, _) = run(Section::JavascriptData, html);
        assert_eq!(group.get("DCData"), Some(&json!({"first": true})));
        assert_eq!(group.get("productData"), Some(&json!({"id": 7})));
        assert!(!group.contains("runParams"));
    }

    #[test]
    fn guard_assignment_is_skipped_for_the_literal() {
        let html = r#"<script>window.runParams = window.runParams || {}; window.runParams = {"a": 1};</script>"#;
        let (group, report) = run(Section::JavascriptData, html);
        assert_eq!(group.get("runParams"), Some(&json!({"a": 1})));
        assert!(report.is_clean());
    }

    #[test]
    fn non_object_assignment_is_ignored() {
        let html = "<script>window.runParams = null;</script>";
        let (group, _) = run(Section::JavascriptData, html);
        assert!(group.is_empty());
    }
}
