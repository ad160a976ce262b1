//! `specifications`: free-form key/value pairs.
//!
//! Sources in priority order: specification tables, property lists, then
//! `Key: value` / `Key - value` lines mined from the description. The
//! first source to define a key owns it.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;

use crate::document::{multiline_text_of, text_of, Page};
use crate::locator::{css_cascade, Locator};
use crate::sink::FieldSink;

/// Pairs taken from the description per pattern.
pub const MAX_DESCRIPTION_PAIRS: usize = 10;
const MAX_KEY_CHARS: usize = 50;
const MAX_VALUE_CHARS: usize = 200;

static TABLES: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".product-specs table, .specifications table, .product-props table")
        .expect("valid selector")
});

static ROWS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));

static CELLS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td, th").expect("valid selector"));

static PROPERTIES: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[class*="specification--prop"]"#).expect("valid selector")
});

static PROPERTY_TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[class*="specification--title"]"#).expect("valid selector")
});

static PROPERTY_VALUE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[class*="specification--desc"]"#).expect("valid selector")
});

static DESCRIPTION: LazyLock<Vec<Locator>> =
    LazyLock::new(|| css_cascade(&[".product-description", ".item-description"]));

static DESCRIPTION_PAIRS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"([A-Za-z\s]+):\s*([^\n\r]+)").expect("valid regex"),
        Regex::new(r"([A-Za-z\s]+)\s*-\s*([^\n\r]+)").expect("valid regex"),
    ]
});

pub(super) fn extract(page: &Page<'_>, sink: &mut FieldSink) {
    let doc = page.doc;

    for table in doc.query_all(&TABLES) {
        for row in table.select(&ROWS) {
            let cells: Vec<String> = row.select(&CELLS).map(text_of).collect();
            if let [key, value, ..] = cells.as_slice() {
                add_pair(sink, key, value);
            }
        }
    }

    for prop in doc.query_all(&PROPERTIES) {
        let key = prop.select(&PROPERTY_TITLE).next().map(text_of);
        let value = prop.select(&PROPERTY_VALUE).next().map(text_of);
        if let (Some(key), Some(value)) = (key, value) {
            add_pair(sink, &key, &value);
        }
    }

    let description = doc
        .query_first(&DESCRIPTION)
        .and_then(|hit| hit.node())
        .map(multiline_text_of);
    if let Some(description) = description {
        for pattern in DESCRIPTION_PAIRS.iter() {
            for caps in pattern.captures_iter(&description).take(MAX_DESCRIPTION_PAIRS) {
                let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) else {
                    continue;
                };
                let key = key.as_str().trim();
                let value = value.as_str().trim();
                if key.chars().count() < MAX_KEY_CHARS && value.chars().count() < MAX_VALUE_CHARS {
                    add_pair(sink, key, value);
                }
            }
        }
    }
}

fn add_pair(sink: &mut FieldSink, key: &str, value: &str) {
    let key = key.trim().trim_end_matches(':').trim();
    if key.is_empty() {
        return;
    }
    sink.text_if_absent(key, Some(value));
}
