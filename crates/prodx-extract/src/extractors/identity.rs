//! `basic_info`: title, product id, category, brand.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;

use crate::document::{attr_of, text_of, Page};
use crate::locator::{css_cascade, Locator};
use crate::sink::FieldSink;

static TITLE: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    css_cascade(&[
        r#"h1[data-pl="product-title"]"#,
        ".title--wrap--UUHae_g h1",
        ".product-title",
        "h1",
    ])
});

static CANONICAL_URL: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    css_cascade(&[r#"meta[property="og:url"]"#, r#"link[rel="canonical"]"#])
});

static PRODUCT_ID_SCRIPT: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    Locator::script(r#"productId["']?\s*:\s*["']?(\d+)"#)
        .into_iter()
        .collect()
});

static ITEM_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/item/(\d+)\.html").expect("valid regex"));

static BREADCRUMBS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".breadcrumb a, .nav-breadcrumb a").expect("valid selector")
});

static CATEGORY_META: LazyLock<Vec<Locator>> =
    LazyLock::new(|| css_cascade(&[r#"meta[name="category"]"#]));

static BRAND: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    css_cascade(&[".product-brand", ".brand-name", "[data-brand]", ".manufacturer"])
});

/// Breadcrumb labels that name the site root rather than a category.
const HOME_CRUMBS: [&str; 3] = ["home", "accueil", "startseite"];

pub(super) fn extract(page: &Page<'_>, sink: &mut FieldSink) {
    let doc = page.doc;

    sink.text("title", doc.query_first(&TITLE).map(|hit| hit.text()));
    sink.text("product_id", product_id(page));
    sink.text("category", category(page));

    let brand = doc.query_first_valid(&BRAND, |hit| {
        hit.non_empty_text().or_else(|| hit.attr("data-brand"))
    });
    sink.text("brand", brand);
}

/// Item id from the canonical URL, then the page URL, then page scripts.
fn product_id(page: &Page<'_>) -> Option<String> {
    page.doc
        .query_first_valid(&CANONICAL_URL, |hit| {
            let url = hit.attr("content").or_else(|| hit.attr("href"))?;
            item_id(&url)
        })
        .or_else(|| item_id(page.url))
        .or_else(|| page.doc.query_first(&PRODUCT_ID_SCRIPT).map(|hit| hit.text()))
}

fn item_id(url: &str) -> Option<String> {
    ITEM_URL
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// The deepest breadcrumb that is not a home link, then the category meta
/// tag. A lone crumb is not a trail and is ignored.
fn category(page: &Page<'_>) -> Option<String> {
    let crumbs: Vec<String> = page
        .doc
        .query_all(&BREADCRUMBS)
        .into_iter()
        .map(text_of)
        .collect();

    if crumbs.len() > 1 {
        let deepest = crumbs.into_iter().rev().find(|crumb| {
            !crumb.is_empty() && !HOME_CRUMBS.contains(&crumb.to_lowercase().as_str())
        });
        if deepest.is_some() {
            return deepest;
        }
    }

    page.doc
        .query_first(&CATEGORY_META)
        .and_then(|hit| hit.node())
        .and_then(|meta| attr_of(meta, "content"))
}
