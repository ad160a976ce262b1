//! `images`: main image, gallery and thumbnails, Open Graph image, video.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;
use serde_json::Value;

use crate::document::{attr_of, Page};
use crate::error::ExtractError;
use crate::locator::{css_cascade, Hit, Locator};
use crate::sink::FieldSink;

pub const MAX_GALLERY_IMAGES: usize = 50;

static MAIN_IMAGE: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    css_cascade(&[
        ".magnifier--image--EYYoSlr",
        ".product-main-image img",
        ".main-image img",
    ])
});

static GALLERY_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"imagePathList"\s*:\s*(\[.*?\])"#).expect("valid regex")
});

static THUMBNAIL_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"summImagePathList"\s*:\s*(\[.*?\])"#).expect("valid regex")
});

static GALLERY_IMAGES: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".image-gallery img, .product-images img").expect("valid selector")
});

static OG_IMAGE: LazyLock<Vec<Locator>> =
    LazyLock::new(|| css_cascade(&[r#"meta[property="og:image"]"#]));

static VIDEO: LazyLock<Vec<Locator>> =
    LazyLock::new(|| css_cascade(&["video source", ".product-video"]));

pub(super) fn extract(page: &Page<'_>, sink: &mut FieldSink) {
    let doc = page.doc;

    sink.text(
        "main_image",
        doc.query_first_valid(&MAIN_IMAGE, |hit| hit.attr("src")),
    );

    let mut gallery = script_image_list(page, sink, "gallery_images", &GALLERY_SCRIPT);
    if gallery.is_empty() {
        for img in doc.query_all(&GALLERY_IMAGES) {
            let Some(src) = attr_of(img, "src").or_else(|| attr_of(img, "data-src")) else {
                continue;
            };
            if !gallery.contains(&src) {
                gallery.push(src);
            }
        }
    }
    gallery.truncate(MAX_GALLERY_IMAGES);
    sink.list("gallery_images", gallery);

    let thumbnails = script_image_list(page, sink, "thumbnail_images", &THUMBNAIL_SCRIPT);
    sink.list("thumbnail_images", thumbnails);

    sink.text(
        "og_image",
        doc.query_first(&OG_IMAGE).and_then(|hit| hit.attr("content")),
    );
    sink.text("product_video", doc.query_first_valid(&VIDEO, media_src));
}

/// Decodes the first JSON array of image URLs that `pattern` captures in a
/// script, in script order. Each malformed array is recorded as a fault and
/// the search moves on to later scripts.
fn script_image_list(
    page: &Page<'_>,
    sink: &mut FieldSink,
    field: &str,
    pattern: &Regex,
) -> Vec<String> {
    for script in page.doc.scripts() {
        let Some(raw) = pattern.captures(&script).and_then(|caps| caps.get(1)) else {
            continue;
        };
        match serde_json::from_str::<Vec<Value>>(raw.as_str()) {
            Ok(items) => {
                return items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(url) => Some(url),
                        _ => None,
                    })
                    .collect();
            }
            Err(err) => sink.fault(ExtractError::ScriptJson {
                field: field.to_string(),
                reason: err.to_string(),
            }),
        }
    }
    Vec::new()
}

fn media_src(hit: Hit<'_>) -> Option<String> {
    hit.attr("src").or_else(|| hit.attr("data-src"))
}
