//! `seller_info`: store link and name, plus store statistics.

use std::sync::LazyLock;

use crate::document::{attr_of, nearest_ancestor_with_class, query_first_in, text_of, Page};
use crate::locator::{css_cascade, Locator};
use crate::sink::FieldSink;

/// Class of the store card link on current item pages.
const STORE_LINK_CLASS: &str = "store-detail--wrap--IhR4e1j";

static STORE_LINK: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    css_cascade(&[
        "a.store-detail--wrap--IhR4e1j",
        r#"a[href*="/store/"]"#,
        ".store-link",
        ".seller-link",
    ])
});

static STORE_NAME: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    css_cascade(&[
        ".store-detail--storeName--hpOD8R8",
        ".store-name",
        ".seller-name",
    ])
});

static STORE_RATING: LazyLock<Vec<Locator>> =
    LazyLock::new(|| css_cascade(&[".store-rating", ".seller-rating"]));

static FOLLOWERS: LazyLock<Vec<Locator>> =
    LazyLock::new(|| css_cascade(&[".store-followers", ".follower-count"]));

static YEARS: LazyLock<Vec<Locator>> =
    LazyLock::new(|| css_cascade(&[".store-years", ".years-in-business"]));

pub(super) fn extract(page: &Page<'_>, sink: &mut FieldSink) {
    let doc = page.doc;

    if let Some(link) = doc.query_first(&STORE_LINK).and_then(|hit| hit.node()) {
        sink.text("store_url", attr_of(link, "href"));
        let name = query_first_in(link, &STORE_NAME)
            .and_then(|hit| hit.non_empty_text())
            .or_else(|| Some(text_of(link)));
        sink.text("store_name", name);
    }

    // Pages that render the store name outside any recognized link still
    // nest it in the store card; climb to it for the URL.
    if !sink.contains("store_name") {
        if let Some(name_el) = doc.query_first(&STORE_NAME).and_then(|hit| hit.node()) {
            sink.text("store_name", Some(text_of(name_el)));
            if !sink.contains("store_url") {
                let href = nearest_ancestor_with_class(name_el, STORE_LINK_CLASS)
                    .and_then(|card| attr_of(card, "href"));
                sink.text("store_url", href);
            }
        }
    }

    sink.float("store_rating", doc.query_first(&STORE_RATING).map(|hit| hit.text()));
    sink.integer("followers", doc.query_first(&FOLLOWERS).map(|hit| hit.text()));
    sink.integer(
        "years_in_business",
        doc.query_first(&YEARS).map(|hit| hit.text()),
    );
}

#[cfg(test)]
mod tests {
    use prodx_core::Section;

    use crate::extractors::test_support::run;

    #[test]
    fn store_card_link_and_name() {
        let html = r#"<a class="store-detail--wrap--IhR4e1j" href="https://www.aliexpress.com/store/1101">
            <span class="store-detail--storeName--hpOD8R8">Acme Official Store</span>
            <span>97.5% positive</span>
        </a>"#;
        let (group, _) = run(Section::SellerInfo, html);
        assert_eq!(
            group.get_str("store_url"),
            Some("https://www.aliexpress.com/store/1101")
        );
        assert_eq!(group.get_str("store_name"), Some("Acme Official Store"));
    }

    #[test]
    fn link_text_stands_in_for_missing_name() {
        let html = r#"<a href="/store/42">Gadget Hub</a>"#;
        let (group, _) = run(Section::SellerInfo, html);
        assert_eq!(group.get_str("store_url"), Some("/store/42"));
        assert_eq!(group.get_str("store_name"), Some("Gadget Hub"));
    }

    #[test]
    fn name_outside_link_climbs_to_card() {
        let html = r#"<div class="store-detail--wrap--IhR4e1j" href="/store/7">
            <div><span class="store-name">Nested Store</span></div>
        </div>"#;
        let (group, _) = run(Section::SellerInfo, html);
        assert_eq!(group.get_str("store_name"), Some("Nested Store"));
        assert_eq!(group.get_str("store_url"), Some("/store/7"));
    }

    #[test]
    fn statistics_are_coerced() {
        let html = r#"<span class="store-rating">96.4% positive</span>
            <span class="follower-count">12.5k Followers</span>
            <span class="store-years">5 yrs</span>"#;
        let (group, _) = run(Section::SellerInfo, html);
        assert_eq!(group.get_f64("store_rating"), Some(96.4));
        assert_eq!(group.get_i64("followers"), Some(12_500));
        assert_eq!(group.get_i64("years_in_business"), Some(5));
    }
}
