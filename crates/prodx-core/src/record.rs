//! Output schema for one extracted product page.
//!
//! The top-level key set of [`ExtractedRecord`] is a contract with
//! downstream consumers (batch runners, analyzers): renaming or
//! restructuring a key is a breaking change. Field groups are open
//! mappings so extractors can add fields without schema churn, but every
//! value goes through one of the typed `insert_*` methods on
//! [`FieldGroup`], which reject empty strings, empty lists and
//! non-finite numbers. Unresolved fields are simply absent.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level sections of an [`ExtractedRecord`], in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    BasicInfo,
    Pricing,
    ReviewsAndRatings,
    ProductVariations,
    Images,
    ShippingInfo,
    Specifications,
    SellerInfo,
    JavascriptData,
    MetaTags,
    PageLanguage,
}

impl Section {
    pub const ALL: [Section; 11] = [
        Section::BasicInfo,
        Section::Pricing,
        Section::ReviewsAndRatings,
        Section::ProductVariations,
        Section::Images,
        Section::ShippingInfo,
        Section::Specifications,
        Section::SellerInfo,
        Section::JavascriptData,
        Section::MetaTags,
        Section::PageLanguage,
    ];

    /// The JSON key this section is serialized under.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Section::BasicInfo => "basic_info",
            Section::Pricing => "pricing",
            Section::ReviewsAndRatings => "reviews_and_ratings",
            Section::ProductVariations => "product_variations",
            Section::Images => "images",
            Section::ShippingInfo => "shipping_info",
            Section::Specifications => "specifications",
            Section::SellerInfo => "seller_info",
            Section::JavascriptData => "javascript_data",
            Section::MetaTags => "meta_tags",
            Section::PageLanguage => "page_language",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A mapping of field name to value for one section of a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldGroup(Map<String, Value>);

impl FieldGroup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    #[must_use]
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    #[must_use]
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// Number of elements in an array-valued field; `0` when absent.
    #[must_use]
    pub fn list_len(&self, key: &str) -> usize {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Inserts a trimmed string. Empty strings are rejected.
    pub fn insert_text(&mut self, key: &str, value: &str) -> bool {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.0
            .insert(key.to_string(), Value::String(trimmed.to_string()));
        true
    }

    /// Inserts a float. `NaN` and infinities are rejected.
    pub fn insert_float(&mut self, key: &str, value: f64) -> bool {
        match serde_json::Number::from_f64(value) {
            Some(n) => {
                self.0.insert(key.to_string(), Value::Number(n));
                true
            }
            None => false,
        }
    }

    pub fn insert_int(&mut self, key: &str, value: i64) -> bool {
        self.0.insert(key.to_string(), Value::from(value));
        true
    }

    /// Inserts `true`. A `false` flag is never stored: absence means "not set".
    pub fn insert_flag(&mut self, key: &str, value: bool) -> bool {
        if !value {
            return false;
        }
        self.0.insert(key.to_string(), Value::Bool(true));
        true
    }

    /// Inserts an ordered list of strings. Blank entries are dropped and an
    /// empty list is rejected.
    pub fn insert_list(&mut self, key: &str, values: Vec<String>) -> bool {
        let items: Vec<Value> = values
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(Value::String)
            .collect();
        if items.is_empty() {
            return false;
        }
        self.0.insert(key.to_string(), Value::Array(items));
        true
    }

    /// Inserts a nested mapping. Empty groups are rejected.
    pub fn insert_group(&mut self, key: &str, group: FieldGroup) -> bool {
        if group.is_empty() {
            return false;
        }
        self.0.insert(key.to_string(), Value::Object(group.0));
        true
    }

    /// Inserts a list of nested mappings, dropping empty ones. An empty
    /// result is rejected.
    pub fn insert_groups(&mut self, key: &str, groups: Vec<FieldGroup>) -> bool {
        let items: Vec<Value> = groups
            .into_iter()
            .filter(|g| !g.is_empty())
            .map(|g| Value::Object(g.0))
            .collect();
        if items.is_empty() {
            return false;
        }
        self.0.insert(key.to_string(), Value::Array(items));
        true
    }

    /// Inserts arbitrary structured data. Only `null` is rejected.
    pub fn insert_value(&mut self, key: &str, value: Value) -> bool {
        if value.is_null() {
            return false;
        }
        self.0.insert(key.to_string(), value);
        true
    }

    /// Removes a field, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }
}

/// The structured output for one product page.
///
/// Empty sections are omitted when serialized, so a page where nothing
/// matched serializes to only `url` and `scraping_timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// The URL the markup was fetched from. Provenance, not page content.
    pub url: String,
    #[serde(default, skip_serializing_if = "FieldGroup::is_empty")]
    pub basic_info: FieldGroup,
    #[serde(default, skip_serializing_if = "FieldGroup::is_empty")]
    pub pricing: FieldGroup,
    #[serde(default, skip_serializing_if = "FieldGroup::is_empty")]
    pub reviews_and_ratings: FieldGroup,
    #[serde(default, skip_serializing_if = "FieldGroup::is_empty")]
    pub product_variations: FieldGroup,
    #[serde(default, skip_serializing_if = "FieldGroup::is_empty")]
    pub images: FieldGroup,
    #[serde(default, skip_serializing_if = "FieldGroup::is_empty")]
    pub shipping_info: FieldGroup,
    #[serde(default, skip_serializing_if = "FieldGroup::is_empty")]
    pub specifications: FieldGroup,
    #[serde(default, skip_serializing_if = "FieldGroup::is_empty")]
    pub seller_info: FieldGroup,
    #[serde(default, skip_serializing_if = "FieldGroup::is_empty")]
    pub javascript_data: FieldGroup,
    #[serde(default, skip_serializing_if = "FieldGroup::is_empty")]
    pub meta_tags: FieldGroup,
    /// RFC 3339 extraction time in UTC.
    pub scraping_timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_language: Option<String>,
}

impl ExtractedRecord {
    /// An empty record carrying only provenance.
    #[must_use]
    pub fn new(url: &str, extracted_at: DateTime<Utc>) -> Self {
        Self {
            url: url.to_string(),
            basic_info: FieldGroup::new(),
            pricing: FieldGroup::new(),
            reviews_and_ratings: FieldGroup::new(),
            product_variations: FieldGroup::new(),
            images: FieldGroup::new(),
            shipping_info: FieldGroup::new(),
            specifications: FieldGroup::new(),
            seller_info: FieldGroup::new(),
            javascript_data: FieldGroup::new(),
            meta_tags: FieldGroup::new(),
            scraping_timestamp: extracted_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            page_language: None,
        }
    }

    /// The mapping for a section. `PageLanguage` is a plain string and
    /// has no mapping.
    #[must_use]
    pub fn group(&self, section: Section) -> Option<&FieldGroup> {
        match section {
            Section::BasicInfo => Some(&self.basic_info),
            Section::Pricing => Some(&self.pricing),
            Section::ReviewsAndRatings => Some(&self.reviews_and_ratings),
            Section::ProductVariations => Some(&self.product_variations),
            Section::Images => Some(&self.images),
            Section::ShippingInfo => Some(&self.shipping_info),
            Section::Specifications => Some(&self.specifications),
            Section::SellerInfo => Some(&self.seller_info),
            Section::JavascriptData => Some(&self.javascript_data),
            Section::MetaTags => Some(&self.meta_tags),
            Section::PageLanguage => None,
        }
    }

    /// Mutable access to a section's mapping; `None` for `PageLanguage`.
    pub fn group_mut(&mut self, section: Section) -> Option<&mut FieldGroup> {
        match section {
            Section::BasicInfo => Some(&mut self.basic_info),
            Section::Pricing => Some(&mut self.pricing),
            Section::ReviewsAndRatings => Some(&mut self.reviews_and_ratings),
            Section::ProductVariations => Some(&mut self.product_variations),
            Section::Images => Some(&mut self.images),
            Section::ShippingInfo => Some(&mut self.shipping_info),
            Section::Specifications => Some(&mut self.specifications),
            Section::SellerInfo => Some(&mut self.seller_info),
            Section::JavascriptData => Some(&mut self.javascript_data),
            Section::MetaTags => Some(&mut self.meta_tags),
            Section::PageLanguage => None,
        }
    }

    #[must_use]
    pub fn product_id(&self) -> Option<&str> {
        self.basic_info.get_str("product_id")
    }

    /// Sections that carry at least one value.
    ///
    /// Callers judge extraction quality by which sections are present; a
    /// record with few populated sections usually means the page template
    /// changed or the content was missing.
    #[must_use]
    pub fn populated_sections(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|&section| match self.group(section) {
                Some(group) => !group.is_empty(),
                None => self.page_language.is_some(),
            })
            .collect()
    }
}
