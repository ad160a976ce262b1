//! `pricing`: display prices kept verbatim, plus currency and tax notes.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::{text_of, Page};
use crate::locator::{css_cascade, Locator};
use crate::sink::FieldSink;

static CURRENT_PRICE: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    css_cascade(&[
        "span.product-price-value",
        ".price--currentPriceText--V8_y_b5",
        ".pdp-comp-price-current",
        r#"[data-pl="product-price"] .price--current--I3Zeidd span"#,
    ])
});

static ORIGINAL_PRICE: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    css_cascade(&[
        ".price--originalPrice",
        ".product-price-original",
        ".price--lineThrough",
    ])
});

static BULK_PRICE: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    [
        Locator::css(r##"span[style*="#D3031C"]"##),
        Locator::text(BULK_HINT_PATTERN),
    ]
    .into_iter()
    .flatten()
    .collect()
});

static DISCOUNT: LazyLock<Vec<Locator>> =
    LazyLock::new(|| css_cascade(&[".discount-percent", ".sale-percent"]));

static TAX_INFO: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    Locator::text(r"(?i)bez podatku|tax|VAT")
        .into_iter()
        .collect()
});

const BULK_HINT_PATTERN: &str = r"za szt|per piece|pieces?";

static BULK_HINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(BULK_HINT_PATTERN).expect("valid regex"));

static CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{3}|[€$£¥₹₽])").expect("valid regex"));

pub(super) fn extract(page: &Page<'_>, sink: &mut FieldSink) {
    let doc = page.doc;

    sink.text("current_price", doc.query_first(&CURRENT_PRICE).map(|hit| hit.text()));
    sink.text("original_price", doc.query_first(&ORIGINAL_PRICE).map(|hit| hit.text()));

    // The red span only counts when it carries a per-piece hint. A bare
    // text hit stands for the element that owns it.
    let bulk = doc.query_first_valid(&BULK_PRICE, |hit| {
        if !BULK_HINT.is_match(&hit.text()) {
            return None;
        }
        match hit.node() {
            Some(el) => Some(text_of(el)),
            None => doc
                .find_text_node(&BULK_HINT, None)
                .map(text_of)
                .or_else(|| hit.non_empty_text()),
        }
    });
    sink.text("bulk_price", bulk);

    sink.text("discount", doc.query_first(&DISCOUNT).map(|hit| hit.text()));

    let currency = sink
        .get_str("current_price")
        .and_then(|price| CURRENCY.captures(price))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());
    sink.text("currency", currency);

    sink.text("tax_info", doc.query_first(&TAX_INFO).map(|hit| hit.text()));
}

#[cfg(test)]
mod tests {
    use prodx_core::Section;

    use crate::extractors::test_support::run;

    #[test]
    fn current_price_is_verbatim_text() {
        let html = r#"<span class="product-price-value">  US $12.34 </span>"#;
        let (group, _) = run(Section::Pricing, html);
        assert_eq!(group.get_str("current_price"), Some("US $12.34"));
    }

    #[test]
    fn current_price_from_later_rule() {
        let html = r#"<div data-pl="product-price"><div class="price--current--I3Zeidd"><span>€7,50</span></div></div>"#;
        let (group, _) = run(Section::Pricing, html);
        assert_eq!(group.get_str("current_price"), Some("€7,50"));
        assert_eq!(group.get_str("currency"), Some("€"));
    }

    #[test]
    fn missing_price_is_absent_not_empty() {
        let (group, report) = run(Section::Pricing, "<h1>Widget</h1>");
        assert!(!group.contains("current_price"));
        assert!(!group.contains("currency"));
        assert!(report.attempted.iter().any(|f| f == "current_price"));
    }

    #[test]
    fn currency_code_prefix() {
        let html = r#"<span class="pdp-comp-price-current">PLN 45,99</span>"#;
        let (group, _) = run(Section::Pricing, html);
        assert_eq!(group.get_str("currency"), Some("PLN"));
    }

    #[test]
    fn currency_absent_for_lowercase_prefix() {
        let html = r#"<span class="pdp-comp-price-current">zł 45,99</span>"#;
        let (group, _) = run(Section::Pricing, html);
        assert!(!group.contains("currency"));
    }

    #[test]
    fn bulk_price_from_red_span() {
        let html = r#"<span style="color: #D3031C">12,50 zł za szt.</span>"#;
        let (group, _) = run(Section::Pricing, html);
        assert_eq!(group.get_str("bulk_price"), Some("12,50 zł za szt."));
    }

    #[test]
    fn bulk_price_red_span_without_hint_falls_back_to_text() {
        let html = r#"<span style="color: #D3031C">Sale</span>
            <div class="tier">$3.10 <em>per piece</em></div>"#;
        let (group, _) = run(Section::Pricing, html);
        assert_eq!(group.get_str("bulk_price"), Some("per piece"));
    }

    #[test]
    fn original_price_and_discount() {
        let html = r#"<span class="price--originalPrice">$19.99</span><span class="sale-percent">-50%</span>"#;
        let (group, _) = run(Section::Pricing, html);
        assert_eq!(group.get_str("original_price"), Some("$19.99"));
        assert_eq!(group.get_str("discount"), Some("-50%"));
    }

    #[test]
    fn tax_info_is_case_insensitive() {
        let html = r"<p>Price includes vat</p>";
        let (group, _) = run(Section::Pricing, html);
        assert_eq!(group.get_str("tax_info"), Some("Price includes vat"));
    }
}
