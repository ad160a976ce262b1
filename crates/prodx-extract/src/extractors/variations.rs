//! `product_variations`: one list of option descriptors per SKU axis
//! ("Color", "Size", ...), plus the current selection and quantity limit.

use std::sync::LazyLock;

use prodx_core::FieldGroup;
use scraper::{ElementRef, Selector};

use crate::document::{attr_of, has_class_containing, query_first_in, text_of, Page};
use crate::locator::{css_cascade, Locator};
use crate::sink::FieldSink;

static SKU_WRAPPER: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    css_cascade(&[".sku--wrap--xgoW06M", ".product-sku", ".sku-wrap"])
});

static AXES: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".sku-item--wrap--t9Qszzx, .sku-item").expect("valid selector")
});

static AXIS_TITLE: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    css_cascade(&[".sku-item--title--Z0HLO87", ".variation-title"])
});

static OPTIONS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[data-sku-col], .variation-option").expect("valid selector")
});

static IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("valid selector"));

static CURRENT_SELECTION: LazyLock<Vec<Locator>> =
    LazyLock::new(|| css_cascade(&[".sku--menuTitle--UIEMJcG", ".current-sku"]));

static MAX_QUANTITY: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    css_cascade(&[
        r#"input[name*="quantity"][max]"#,
        ".quantity-selector input[max]",
    ])
});

/// Keys that are not variation axes.
pub const RESERVED_KEYS: [&str; 2] = ["current_selection", "max_quantity"];

pub(super) fn extract(page: &Page<'_>, sink: &mut FieldSink) {
    let doc = page.doc;

    if let Some(wrapper) = doc.query_first(&SKU_WRAPPER).and_then(|hit| hit.node()) {
        for axis in wrapper.select(&AXES) {
            let Some(name) = axis_name(axis) else {
                continue;
            };
            if RESERVED_KEYS.contains(&name.as_str()) || sink.contains(&name) {
                continue;
            }
            let options: Vec<FieldGroup> = axis.select(&OPTIONS).filter_map(parse_option).collect();
            sink.groups(&name, options);
        }
    }

    sink.text(
        "current_selection",
        doc.query_first(&CURRENT_SELECTION).map(|hit| hit.text()),
    );
    sink.integer(
        "max_quantity",
        doc.query_first(&MAX_QUANTITY).and_then(|hit| hit.attr("max")),
    );
}

/// Axis title with every `:` removed, e.g. `"Color:"` → `"Color"`.
fn axis_name(axis: ElementRef<'_>) -> Option<String> {
    let title = query_first_in(axis, &AXIS_TITLE)?.text().replace(':', "");
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Builds an option descriptor. Options that carry nothing but text are
/// not retained.
fn parse_option(option: ElementRef<'_>) -> Option<FieldGroup> {
    let mut descriptor = FieldGroup::new();

    if let Some(img) = option.select(&IMG).next() {
        let src = attr_of(img, "src").or_else(|| attr_of(img, "data-src"));
        if let Some(src) = src {
            descriptor.insert_text("image", &src);
        }
        if let Some(alt) = attr_of(img, "alt") {
            descriptor.insert_text("alt_text", &alt);
        }
    }
    descriptor.insert_flag("selected", has_class_containing(option, "selected"));
    descriptor.insert_flag(
        "sold_out",
        has_class_containing(option, "soldOut") || has_class_containing(option, "sold-out"),
    );

    if descriptor.is_empty() {
        return None;
    }
    descriptor.insert_text("text", &text_of(option));
    Some(descriptor)
}
