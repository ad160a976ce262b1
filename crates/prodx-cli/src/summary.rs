use std::fmt;

use prodx_core::ExtractedRecord;
use prodx_extract::extractors::VARIATION_RESERVED_KEYS;

const TITLE_DISPLAY_CHARS: usize = 100;
const MISSING: &str = "N/A";

/// Human-readable digest of one extracted record.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProductSummary {
    url: String,
    product_id: Option<String>,
    title: Option<String>,
    category: Option<String>,
    brand: Option<String>,
    current_price: Option<String>,
    original_price: Option<String>,
    discount: Option<String>,
    currency: Option<String>,
    rating: Option<f64>,
    review_count: Option<i64>,
    sold_count: Option<i64>,
    gallery_images: usize,
    thumbnail_images: usize,
    has_video: bool,
    free_shipping: Option<String>,
    delivery_time: Option<String>,
    store_name: Option<String>,
    variation_axes: usize,
    specifications: usize,
}

impl ProductSummary {
    pub(crate) fn from_record(record: &ExtractedRecord) -> Self {
        let owned = |value: Option<&str>| value.map(str::to_string);
        let basic = &record.basic_info;
        let pricing = &record.pricing;
        let reviews = &record.reviews_and_ratings;
        let images = &record.images;

        Self {
            url: record.url.clone(),
            product_id: owned(record.product_id()),
            title: basic.get_str("title").map(truncate_title),
            category: owned(basic.get_str("category")),
            brand: owned(basic.get_str("brand")),
            current_price: owned(pricing.get_str("current_price")),
            original_price: owned(pricing.get_str("original_price")),
            discount: owned(pricing.get_str("discount")),
            currency: owned(pricing.get_str("currency")),
            rating: reviews.get_f64("rating"),
            review_count: reviews.get_i64("review_count"),
            sold_count: reviews.get_i64("sold_count"),
            gallery_images: images.list_len("gallery_images"),
            thumbnail_images: images.list_len("thumbnail_images"),
            has_video: images.contains("product_video"),
            free_shipping: owned(record.shipping_info.get_str("free_shipping_info")),
            delivery_time: owned(record.shipping_info.get_str("delivery_time")),
            store_name: owned(record.seller_info.get_str("store_name")),
            variation_axes: record
                .product_variations
                .keys()
                .filter(|key| !VARIATION_RESERVED_KEYS.contains(key))
                .count(),
            specifications: record.specifications.len(),
        }
    }
}

fn truncate_title(title: &str) -> String {
    if title.chars().count() > TITLE_DISPLAY_CHARS {
        format!(
            "{}...",
            title.chars().take(TITLE_DISPLAY_CHARS).collect::<String>()
        )
    } else {
        title.to_string()
    }
}

fn or_missing(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING)
}

impl fmt::Display for ProductSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "URL:            {}", self.url)?;
        writeln!(f, "Product ID:     {}", or_missing(self.product_id.as_deref()))?;
        writeln!(f, "Title:          {}", or_missing(self.title.as_deref()))?;
        writeln!(f, "Category:       {}", or_missing(self.category.as_deref()))?;
        writeln!(f, "Brand:          {}", or_missing(self.brand.as_deref()))?;
        writeln!(f, "Price:          {}", or_missing(self.current_price.as_deref()))?;
        writeln!(f, "Original price: {}", or_missing(self.original_price.as_deref()))?;
        writeln!(f, "Discount:       {}", or_missing(self.discount.as_deref()))?;
        writeln!(f, "Currency:       {}", or_missing(self.currency.as_deref()))?;
        match self.rating {
            Some(rating) => writeln!(f, "Rating:         {rating}")?,
            None => writeln!(f, "Rating:         {MISSING}")?,
        }
        match self.review_count {
            Some(count) => writeln!(f, "Reviews:        {count}")?,
            None => writeln!(f, "Reviews:        {MISSING}")?,
        }
        match self.sold_count {
            Some(count) => writeln!(f, "Sold:           {count}")?,
            None => writeln!(f, "Sold:           {MISSING}")?,
        }
        writeln!(f, "Gallery images: {}", self.gallery_images)?;
        writeln!(f, "Thumbnails:     {}", self.thumbnail_images)?;
        writeln!(f, "Video:          {}", if self.has_video { "yes" } else { "no" })?;
        writeln!(f, "Free shipping:  {}", or_missing(self.free_shipping.as_deref()))?;
        writeln!(f, "Delivery:       {}", or_missing(self.delivery_time.as_deref()))?;
        writeln!(f, "Store:          {}", or_missing(self.store_name.as_deref()))?;
        writeln!(f, "Variation axes: {}", self.variation_axes)?;
        write!(f, "Specifications: {}", self.specifications)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use prodx_core::FieldGroup;

    use super::*;

    fn record() -> ExtractedRecord {
        let at = Utc.with_ymd_and_hms(2025, 7, 18, 9, 30, 0).unwrap();
        ExtractedRecord::new("https://www.aliexpress.com/item/1.html", at)
    }

    #[test]
    fn empty_record_reports_missing_fields() {
        let summary = ProductSummary::from_record(&record());
        let text = summary.to_string();

        assert!(text.contains("Title:          N/A"));
        assert!(text.contains("Rating:         N/A"));
        assert!(text.contains("Video:          no"));
        assert!(text.ends_with("Specifications: 0"));
    }

    #[test]
    fn counts_axes_without_reserved_keys() {
        let mut rec = record();
        let mut option = FieldGroup::new();
        option.insert_text("text", "Black");
        rec.product_variations.insert_groups("Color", vec![option]);
        rec.product_variations.insert_text("current_selection", "Color: Black");
        rec.product_variations.insert_int("max_quantity", 199);
        rec.specifications.insert_text("Brand Name", "Logi");
        rec.specifications.insert_text("Connection", "Wireless");

        let summary = ProductSummary::from_record(&rec);
        assert_eq!(summary.variation_axes, 1);
        assert_eq!(summary.specifications, 2);
    }

    #[test]
    fn long_titles_are_truncated() {
        let mut rec = record();
        rec.basic_info.insert_text("title", &"x".repeat(150));

        let summary = ProductSummary::from_record(&rec);
        let title = summary.title.unwrap();
        assert_eq!(title.chars().count(), TITLE_DISPLAY_CHARS + 3);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn populated_fields_are_displayed() {
        let mut rec = record();
        rec.basic_info.insert_text("title", "Wireless Mouse");
        rec.pricing.insert_text("current_price", "$9.99");
        rec.reviews_and_ratings.insert_float("rating", 4.8);
        rec.reviews_and_ratings.insert_int("review_count", 1234);
        rec.images.insert_text("product_video", "https://video.example/v.mp4");

        let text = ProductSummary::from_record(&rec).to_string();
        assert!(text.contains("Title:          Wireless Mouse"));
        assert!(text.contains("Price:          $9.99"));
        assert!(text.contains("Rating:         4.8"));
        assert!(text.contains("Reviews:        1234"));
        assert!(text.contains("Video:          yes"));
    }
}
