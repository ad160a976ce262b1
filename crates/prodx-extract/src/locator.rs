//! Locators: where a field's value may live.
//!
//! A field is described by a cascade (`Vec<Locator>`) ordered from the most
//! template-specific rule to the most generic one. Cascades are built once
//! into `LazyLock` statics and evaluated by [`crate::Document::query_first`]
//! or [`crate::Document::query_first_valid`].

use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::coerce::normalize_whitespace;
use crate::document::{attr_of, find_text_in, find_text_node_in, text_of, Document};

/// One rule for finding a value.
#[derive(Debug)]
pub enum Locator {
    /// First element matching a CSS selector.
    Css(Selector),
    /// Visible text matching a pattern. Scoped: the first element matching
    /// `scope` whose text matches. Unscoped: the matching text itself.
    Text {
        scope: Option<Selector>,
        pattern: Regex,
    },
    /// Capture group 1 (or the whole match) of a pattern applied to raw
    /// `<script>` contents.
    Script(Regex),
}

impl Locator {
    /// A CSS locator. Invalid selectors are logged and skipped.
    #[must_use]
    pub fn css(selector: &str) -> Option<Self> {
        parse_selector(selector).map(Self::Css)
    }

    #[must_use]
    pub fn text(pattern: &str) -> Option<Self> {
        Some(Self::Text {
            scope: None,
            pattern: parse_pattern(pattern)?,
        })
    }

    #[must_use]
    pub fn text_in(scope: &str, pattern: &str) -> Option<Self> {
        Some(Self::Text {
            scope: Some(parse_selector(scope)?),
            pattern: parse_pattern(pattern)?,
        })
    }

    #[must_use]
    pub fn script(pattern: &str) -> Option<Self> {
        parse_pattern(pattern).map(Self::Script)
    }

    /// Evaluates this rule against the whole document.
    #[must_use]
    pub fn attempt<'a>(&self, doc: &'a Document) -> Option<Hit<'a>> {
        match self {
            Self::Css(selector) => doc.select_first(selector).map(Hit::Node),
            Self::Text {
                scope: Some(scope),
                pattern,
            } => doc.find_text_node(pattern, Some(scope)).map(Hit::Node),
            Self::Text {
                scope: None,
                pattern,
            } => doc.find_text(pattern).map(Hit::Captured),
            Self::Script(pattern) => doc.find_script_data(pattern).map(Hit::Captured),
        }
    }

    /// Evaluates this rule against the subtree under `el`. Script rules
    /// only apply to whole documents and never match here.
    #[must_use]
    pub fn attempt_within<'a>(&self, el: ElementRef<'a>) -> Option<Hit<'a>> {
        match self {
            Self::Css(selector) => el.select(selector).next().map(Hit::Node),
            Self::Text {
                scope: Some(scope),
                pattern,
            } => find_text_node_in(el, pattern, Some(scope)).map(Hit::Node),
            Self::Text {
                scope: None,
                pattern,
            } => find_text_in(el, pattern).map(Hit::Captured),
            Self::Script(_) => None,
        }
    }
}

/// Builds a cascade of CSS locators, skipping any selector that fails to
/// parse.
#[must_use]
pub fn css_cascade(selectors: &[&str]) -> Vec<Locator> {
    selectors.iter().copied().filter_map(Locator::css).collect()
}

/// Parses a selector for a static rule table, logging and dropping invalid
/// ones.
#[must_use]
pub fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            tracing::warn!(selector, error = %err, "skipping invalid selector");
            None
        }
    }
}

fn parse_pattern(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            tracing::warn!(pattern, error = %err, "skipping invalid pattern");
            None
        }
    }
}

/// What a locator found.
#[derive(Debug, Clone)]
pub enum Hit<'a> {
    Node(ElementRef<'a>),
    Captured(String),
}

impl<'a> Hit<'a> {
    /// Normalized text of the hit.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Node(el) => text_of(*el),
            Self::Captured(text) => normalize_whitespace(text),
        }
    }

    #[must_use]
    pub fn node(&self) -> Option<ElementRef<'a>> {
        match self {
            Self::Node(el) => Some(*el),
            Self::Captured(_) => None,
        }
    }

    /// Attribute of a node hit; `None` for captured text.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<String> {
        self.node().and_then(|el| attr_of(el, name))
    }

    /// Normalized text when it is non-empty.
    #[must_use]
    pub fn non_empty_text(&self) -> Option<String> {
        let text = self.text();
        (!text.is_empty()).then_some(text)
    }
}
