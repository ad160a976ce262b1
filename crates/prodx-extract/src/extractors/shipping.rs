//! `shipping_info`: free-shipping notes, delivery window and destination,
//! cost, available methods, and policy blocks.

use std::sync::LazyLock;

use prodx_core::FieldGroup;
use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::document::{text_of, Page};
use crate::locator::{css_cascade, Locator};
use crate::sink::FieldSink;

pub const MAX_SHIPPING_METHODS: usize = 20;

static FREE_SHIPPING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Free shipping|Darmowa dostawa|免费").expect("valid regex")
});

static DELIVERY_TIME: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    [
        // "Jul 18 - Aug 04"
        r"\b\w{3}\s+\d+\s*-\s*\w{3}\s+\d+\b",
        // "7-15 days"
        r"\d+\s*-\s*\d+\s*days?",
        // "12 dni"
        r"\d+\s*dni\b",
    ]
    .into_iter()
    .filter_map(Locator::text)
    .collect()
});

static DELIVERY_TO: LazyLock<Vec<Locator>> =
    LazyLock::new(|| css_cascade(&[".delivery-v2--to--Mtweg7y", ".delivery-location"]));

static SHIPPING_COST: LazyLock<Vec<Locator>> =
    LazyLock::new(|| css_cascade(&[".shipping-cost", ".delivery-cost"]));

static SHIPPING_METHODS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".shipping-method, .delivery-option").expect("valid selector")
});

static POLICY_ITEMS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".shipping--item--F04J6q9").expect("valid selector"));

static POLICY_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".shipping--title--sZAnuQw").expect("valid selector"));

static POLICY_DESCRIPTIONS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".shipping--descText--UVpscND").expect("valid selector"));

pub(super) fn extract(page: &Page<'_>, sink: &mut FieldSink) {
    let doc = page.doc;

    sink.text(
        "free_shipping_info",
        doc.find_text_node(&FREE_SHIPPING, None).map(text_of),
    );
    sink.text(
        "delivery_time",
        doc.query_first(&DELIVERY_TIME).map(|hit| hit.text()),
    );
    sink.text("delivery_to", doc.query_first(&DELIVERY_TO).map(|hit| hit.text()));
    sink.text(
        "shipping_cost",
        doc.query_first(&SHIPPING_COST).map(|hit| hit.text()),
    );

    let methods: Vec<String> = doc
        .query_all(&SHIPPING_METHODS)
        .into_iter()
        .map(text_of)
        .filter(|text| !text.is_empty())
        .take(MAX_SHIPPING_METHODS)
        .collect();
    sink.list("shipping_methods", methods);

    let policies: Vec<FieldGroup> = doc
        .query_all(&POLICY_ITEMS)
        .into_iter()
        .filter_map(parse_policy)
        .collect();
    sink.groups("policies", policies);
}

/// A policy needs a title; descriptions are optional.
fn parse_policy(item: ElementRef<'_>) -> Option<FieldGroup> {
    let title = item.select(&POLICY_TITLE).next().map(text_of)?;
    let mut policy = FieldGroup::new();
    if !policy.insert_text("title", &title) {
        return None;
    }
    let descriptions: Vec<String> = item.select(&POLICY_DESCRIPTIONS).map(text_of).collect();
    policy.insert_list("descriptions", descriptions);
    Some(policy)
}
