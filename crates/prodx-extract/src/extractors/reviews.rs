//! `reviews_and_ratings`: aggregate rating, counts, and a bounded sample of
//! individual reviews.

use std::sync::LazyLock;

use prodx_core::FieldGroup;
use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::coerce::first_decimal;
use crate::document::{attr_of, multiline_text_of, query_first_in, text_of, Page};
use crate::locator::{css_cascade, Hit, Locator};
use crate::sink::FieldSink;

pub const MAX_REVIEWS: usize = 10;
pub const MAX_REVIEW_IMAGES: usize = 10;

static RATING: LazyLock<Vec<Locator>> =
    LazyLock::new(|| Locator::text_in("strong", r"\d+\.\d+").into_iter().collect());

static REVIEW_COUNT: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    css_cascade(&[
        r#"a[href*="review"]"#,
        ".reviewer--reviews--cx7Zs_V",
        ".review-count",
    ])
});

static SOLD_COUNT: LazyLock<Vec<Locator>> =
    LazyLock::new(|| css_cascade(&[".reviewer--sold--ytPeoEy", ".product-sold-count"]));

/// Any element with "sold" in a class name. Also matches sold-out variation
/// options, so hits must read like a sales counter.
static SOLD_ANYWHERE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[class*="sold"]"#).expect("valid selector"));

static SOLD_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)sold|sprzedan").expect("valid regex"));

static REVIEW_BLOCKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".list--itemDesc--JcxNPy5, .review-item, .feedback-item")
        .expect("valid selector")
});

static REVIEWER_INFO: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    [
        Locator::css(".reviewer-info"),
        Locator::css(".review-author"),
        Locator::text(r"\w+\s+\|\s+\d+"),
    ]
    .into_iter()
    .flatten()
    .collect()
});

static REVIEW_TEXT: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    css_cascade(&[
        ".review-text",
        ".review-content",
        ".list--itemReview--d9Z9Z5Z",
    ])
});

static REVIEW_RATING: LazyLock<Vec<Locator>> =
    LazyLock::new(|| css_cascade(&[".rating", ".stars"]));

static REVIEW_SKU: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    css_cascade(&[".sku-info", ".variant-info", ".list--itemSku--idEQSGC"])
});

static REVIEW_IMAGES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".review-image img").expect("valid selector"));

pub(super) fn extract(page: &Page<'_>, sink: &mut FieldSink) {
    let doc = page.doc;

    sink.float("rating", doc.query_first(&RATING).map(|hit| hit.text()));
    sink.integer("review_count", doc.query_first_valid(&REVIEW_COUNT, with_digits));
    let sold = doc.query_first_valid(&SOLD_COUNT, with_digits).or_else(|| {
        doc.query_all(&SOLD_ANYWHERE)
            .into_iter()
            .map(text_of)
            .find(|text| SOLD_KEYWORD.is_match(text) && text.chars().any(|c| c.is_ascii_digit()))
    });
    sink.integer("sold_count", sold);

    let reviews: Vec<FieldGroup> = doc
        .query_all(&REVIEW_BLOCKS)
        .into_iter()
        .take(MAX_REVIEWS)
        .map(parse_review)
        .collect();
    sink.groups("individual_reviews", reviews);
}

/// Accepts a hit only when its text contains a digit.
fn with_digits(hit: Hit<'_>) -> Option<String> {
    let text = hit.text();
    text.chars().any(|c| c.is_ascii_digit()).then_some(text)
}

fn parse_review(block: ElementRef<'_>) -> FieldGroup {
    let mut review = FieldGroup::new();

    if let Some(info) = query_first_in(block, &REVIEWER_INFO) {
        review.insert_text("reviewer_info", &info.text());
    }
    if let Some(el) = query_first_in(block, &REVIEW_TEXT).and_then(|hit| hit.node()) {
        review.insert_text("review_text", &multiline_text_of(el));
    }
    // Star widgets encode the score in a class name such as "star-4.5".
    let rating = query_first_in(block, &REVIEW_RATING)
        .and_then(|hit| hit.node())
        .and_then(|el| el.value().classes().find_map(first_decimal));
    if let Some(rating) = rating {
        review.insert_float("rating", rating);
    }
    if let Some(sku) = query_first_in(block, &REVIEW_SKU) {
        review.insert_text("sku", &sku.text());
    }

    let images: Vec<String> = block
        .select(&REVIEW_IMAGES)
        .filter_map(|img| attr_of(img, "src").or_else(|| attr_of(img, "data-src")))
        .take(MAX_REVIEW_IMAGES)
        .collect();
    review.insert_list("images", images);

    review
}

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use prodx_core::Section;
    use serde_json::json;

    use super::*;
    use crate::extractors::test_support::run;

    #[test]
    fn rating_from_decimal_strong() {
        let html = "<strong>Top seller</strong><strong>4.8</strong>";
        let (group, _) = run(Section::ReviewsAndRatings, html);
        assert_eq!(group.get_f64("rating"), Some(4.8));
    }

    #[test]
    fn counts_are_coerced() {
        let html = r#"<a class="reviewer--reviews--cx7Zs_V">1,234 Reviews</a>
            <span class="reviewer--sold--ytPeoEy">12.3k sold</span>"#;
        let (group, report) = run(Section::ReviewsAndRatings, html);
        assert_eq!(group.get_i64("review_count"), Some(1234));
        assert_eq!(group.get_i64("sold_count"), Some(12_300));
        assert!(report.is_clean());
    }

    #[test]
    fn count_hit_without_digits_falls_through() {
        let html = r#"<a href="/reviews">See all reviews</a><span class="review-count">87</span>"#;
        let (group, _) = run(Section::ReviewsAndRatings, html);
        assert_eq!(group.get_i64("review_count"), Some(87));
    }

    #[test]
    fn counts_without_any_digits_are_absent() {
        let html = r#"<span class="product-sold-count">many</span>"#;
        let (group, _) = run(Section::ReviewsAndRatings, html);
        assert!(!group.contains("sold_count"));
    }

    #[test]
    fn sold_out_option_is_not_a_sales_counter() {
        let html = r#"<div class="variation-option sku-item--soldOut--YJfuCGq">42</div>"#;
        let (group, report) = run(Section::ReviewsAndRatings, html);
        assert!(!group.contains("sold_count"));
        assert!(report.is_clean());
    }

    #[test]
    fn generic_sold_class_needs_sales_wording() {
        let html = r#"<div class="sku-item--soldOut--YJfuCGq">42</div>
            <span class="pdp-sold-info">1 200 sprzedanych</span>"#;
        let (group, _) = run(Section::ReviewsAndRatings, html);
        assert_eq!(group.get_i64("sold_count"), Some(1200));
    }

    #[test]
    fn review_descriptor_fields() {
        let html = r#"<div class="feedback-item">
            <span>A***k | 12 Jul 2025</span>
            <div class="review-content">Works well.<br>Quiet clicks.</div>
            <div class="stars star-4.5"></div>
            <div class="sku-info">Color: Black</div>
            <div class="review-image"><img src="a.jpg"><img data-src="b.jpg"><img></div>
        </div>"#;
        let (group, _) = run(Section::ReviewsAndRatings, html);
        assert_eq!(
            group.get("individual_reviews"),
            Some(&json!([{
                "reviewer_info": "A***k | 12 Jul 2025",
                "review_text": "Works well.\nQuiet clicks.",
                "rating": 4.5,
                "sku": "Color: Black",
                "images": ["a.jpg", "b.jpg"],
            }]))
        );
    }

    #[test]
    fn empty_review_blocks_are_dropped() {
        let html = r#"<div class="review-item"></div><div class="review-item"><div class="review-text">ok</div></div>"#;
        let (group, _) = run(Section::ReviewsAndRatings, html);
        assert_eq!(group.list_len("individual_reviews"), 1);
    }

    #[test]
    fn review_list_is_bounded() {
        let mut html = String::new();
        for i in 0..25 {
            write!(html, r#"<div class="review-item"><div class="review-text">review {i}</div></div>"#)
                .unwrap();
        }
        let (group, _) = run(Section::ReviewsAndRatings, &html);
        assert_eq!(group.list_len("individual_reviews"), MAX_REVIEWS);
        let first = &group.get("individual_reviews").unwrap()[0];
        assert_eq!(first["review_text"], json!("review 0"));
    }

    #[test]
    fn review_images_are_bounded() {
        let imgs: String = (0..15).map(|i| format!(r#"<img src="{i}.jpg">"#)).collect();
        let html = format!(r#"<div class="review-item"><div class="review-image">{imgs}</div></div>"#);
        let (group, _) = run(Section::ReviewsAndRatings, &html);
        let review = &group.get("individual_reviews").unwrap()[0];
        assert_eq!(review["images"].as_array().unwrap().len(), MAX_REVIEW_IMAGES);
    }
}
