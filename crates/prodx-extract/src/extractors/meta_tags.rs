//! `meta_tags`: Open Graph properties, App Links, and the standard
//! description/keywords/author tags.

use std::sync::LazyLock;

use prodx_core::FieldGroup;
use scraper::Selector;

use crate::document::{attr_of, Page};
use crate::locator::{css_cascade, Locator};
use crate::sink::FieldSink;

static OPEN_GRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property^="og:"]"#).expect("valid selector"));

static APP_LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property^="al:"]"#).expect("valid selector"));

static NAMED: LazyLock<[(&'static str, Vec<Locator>); 3]> = LazyLock::new(|| {
    [
        ("description", css_cascade(&[r#"meta[name="description"]"#])),
        ("keywords", css_cascade(&[r#"meta[name="keywords"]"#])),
        ("author", css_cascade(&[r#"meta[name="author"]"#])),
    ]
});

pub(super) fn extract(page: &Page<'_>, sink: &mut FieldSink) {
    let doc = page.doc;

    // og:image:width → og_image_width
    for meta in doc.query_all(&OPEN_GRAPH) {
        let Some(property) = attr_of(meta, "property") else {
            continue;
        };
        let Some(name) = property.strip_prefix("og:").filter(|name| !name.is_empty()) else {
            continue;
        };
        let key = format!("og_{}", name.replace(':', "_"));
        sink.text_if_absent(&key, attr_of(meta, "content"));
    }

    let mut app_links = FieldGroup::new();
    for meta in doc.query_all(&APP_LINKS) {
        let (Some(property), Some(content)) = (attr_of(meta, "property"), attr_of(meta, "content"))
        else {
            continue;
        };
        if !app_links.contains(&property) {
            app_links.insert_text(&property, &content);
        }
    }
    sink.group("app_links", app_links);

    for (field, locators) in NAMED.iter() {
        sink.text(
            field,
            doc.query_first(locators).and_then(|hit| hit.attr("content")),
        );
    }
}
