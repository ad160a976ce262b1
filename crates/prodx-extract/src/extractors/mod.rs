//! Field extractors, one per record section.
//!
//! Every extractor has the same shape: it reads the page through the
//! document adapter and writes whatever it finds into its own
//! [`FieldSink`]. Extractors never see each other's output.

mod identity;
mod locale;
mod media;
mod meta_tags;
mod pricing;
mod reviews;
mod script_data;
mod seller;
mod shipping;
mod specifications;
mod variations;

use prodx_core::Section;

use crate::document::Page;
use crate::sink::FieldSink;

pub use locale::{guess_language, FALLBACK_LANGUAGE, LANGUAGE_FIELD};
pub use variations::RESERVED_KEYS as VARIATION_RESERVED_KEYS;

pub type ExtractFn = fn(&Page<'_>, &mut FieldSink);

/// Every extractor, in record order.
pub const EXTRACTORS: [(Section, ExtractFn); 11] = [
    (Section::BasicInfo, identity::extract),
    (Section::Pricing, pricing::extract),
    (Section::ReviewsAndRatings, reviews::extract),
    (Section::ProductVariations, variations::extract),
    (Section::Images, media::extract),
    (Section::ShippingInfo, shipping::extract),
    (Section::Specifications, specifications::extract),
    (Section::SellerInfo, seller::extract),
    (Section::JavascriptData, script_data::extract),
    (Section::MetaTags, meta_tags::extract),
    (Section::PageLanguage, locale::extract),
];

/// Looks up the extractor for `section`.
#[must_use]
pub fn extractor_for(section: Section) -> ExtractFn {
    match section {
        Section::BasicInfo => identity::extract,
        Section::Pricing => pricing::extract,
        Section::ReviewsAndRatings => reviews::extract,
        Section::ProductVariations => variations::extract,
        Section::Images => media::extract,
        Section::ShippingInfo => shipping::extract,
        Section::Specifications => specifications::extract,
        Section::SellerInfo => seller::extract,
        Section::JavascriptData => script_data::extract,
        Section::MetaTags => meta_tags::extract,
        Section::PageLanguage => locale::extract,
    }
}
