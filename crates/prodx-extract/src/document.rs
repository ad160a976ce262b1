//! Read-only adapter over a parsed product page.
//!
//! Everything here returns `Option`/empty collections on a miss. Nothing
//! panics on a missing path, and the parsed tree is never mutated.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::coerce::{normalize_multiline, normalize_whitespace};
use crate::locator::{Hit, Locator};

/// Elements whose text content is never rendered.
const HIDDEN_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Elements that start a new line in [`multiline_text_of`].
const BLOCK_TAGS: [&str; 12] = [
    "br", "p", "div", "li", "tr", "h1", "h2", "h3", "h4", "h5", "h6", "section",
];

/// A parsed product page.
pub struct Document {
    html: Html,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").finish_non_exhaustive()
    }
}

impl Document {
    /// Parses markup with the HTML5 algorithm. Never fails; malformed
    /// markup is repaired the way a browser would.
    #[must_use]
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    #[must_use]
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// Evaluates `locators` in order and returns the first hit.
    #[must_use]
    pub fn query_first(&self, locators: &[Locator]) -> Option<Hit<'_>> {
        locators.iter().find_map(|locator| locator.attempt(self))
    }

    /// Like [`Document::query_first`], but a locator's hit only counts when
    /// `accept` turns it into a value. A rejected hit moves evaluation on to
    /// the next locator.
    pub fn query_first_valid<'a, T>(
        &'a self,
        locators: &[Locator],
        mut accept: impl FnMut(Hit<'a>) -> Option<T>,
    ) -> Option<T> {
        locators
            .iter()
            .find_map(|locator| locator.attempt(self).and_then(&mut accept))
    }

    /// All elements matching `selector`, in document order.
    #[must_use]
    pub fn query_all(&self, selector: &Selector) -> Vec<ElementRef<'_>> {
        self.html.select(selector).collect()
    }

    #[must_use]
    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    /// Normalized text of the first visible text node matching `pattern`.
    #[must_use]
    pub fn find_text(&self, pattern: &Regex) -> Option<String> {
        find_text_in(self.root(), pattern)
    }

    /// The element owning the first visible text node matching `pattern`.
    ///
    /// With a `scope`, only elements matching that selector are considered
    /// and the match is tested against each element's whole text.
    #[must_use]
    pub fn find_text_node(&self, pattern: &Regex, scope: Option<&Selector>) -> Option<ElementRef<'_>> {
        find_text_node_in(self.root(), pattern, scope)
    }

    /// Scans raw `<script>` contents in document order. Returns capture
    /// group 1 of the first match, or the whole match when the pattern has
    /// no groups.
    #[must_use]
    pub fn find_script_data(&self, pattern: &Regex) -> Option<String> {
        self.scripts().find_map(|content| {
            let caps = pattern.captures(&content)?;
            let matched = caps.get(1).or_else(|| caps.get(0))?;
            let trimmed = matched.as_str().trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
    }

    /// Raw contents of every `<script>` element, in document order.
    pub fn scripts(&self) -> impl Iterator<Item = String> + '_ {
        self.html
            .select(&SCRIPT)
            .map(|el| el.text().collect::<String>())
    }

    /// Up to `max_chars` characters of visible page text, space-joined.
    #[must_use]
    pub fn visible_text_sample(&self, max_chars: usize) -> String {
        let mut sample = String::new();
        for (_, text) in visible_text_nodes(self.root()) {
            if sample.chars().count() >= max_chars {
                break;
            }
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            if !sample.is_empty() {
                sample.push(' ');
            }
            sample.push_str(text);
        }
        sample.chars().take(max_chars).collect()
    }
}

static SCRIPT: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| Selector::parse("script").expect("valid selector"));

/// A document together with the URL it was fetched from.
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    pub doc: &'a Document,
    pub url: &'a str,
}

impl<'a> Page<'a> {
    #[must_use]
    pub fn new(doc: &'a Document, url: &'a str) -> Self {
        Self { doc, url }
    }
}

// ---------------------------------------------------------------------------
// Element helpers
// ---------------------------------------------------------------------------

/// Visible text of `el`, whitespace-collapsed and trimmed.
#[must_use]
pub fn text_of(el: ElementRef<'_>) -> String {
    let raw: String = visible_text_nodes(el).map(|(_, text)| text).collect();
    normalize_whitespace(&raw)
}

/// Visible text of `el` with line structure kept: block elements and `<br>`
/// start new lines, each line is collapsed, and blank lines are dropped.
#[must_use]
pub fn multiline_text_of(el: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in el.descendants() {
        if let Some(text) = node.value().as_text() {
            if !is_hidden(node.ancestors().filter_map(ElementRef::wrap)) {
                raw.push_str(text);
            }
        } else if let Some(element) = node.value().as_element() {
            if BLOCK_TAGS.contains(&element.name()) {
                raw.push('\n');
            }
        }
    }
    normalize_multiline(&raw)
}

/// Trimmed attribute value; empty values are treated as missing.
#[must_use]
pub fn attr_of(el: ElementRef<'_>, name: &str) -> Option<String> {
    let value = el.value().attr(name)?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// The closest ancestor of `el` (excluding `el`) carrying `class` as one of
/// its class tokens.
#[must_use]
pub fn nearest_ancestor_with_class<'a>(el: ElementRef<'a>, class: &str) -> Option<ElementRef<'a>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().classes().any(|c| c == class))
}

/// True when any class token of `el` contains `needle`.
#[must_use]
pub fn has_class_containing(el: ElementRef<'_>, needle: &str) -> bool {
    el.value().classes().any(|c| c.contains(needle))
}

/// Element-scoped [`Document::query_first`].
#[must_use]
pub fn query_first_in<'a>(el: ElementRef<'a>, locators: &[Locator]) -> Option<Hit<'a>> {
    locators.iter().find_map(|locator| locator.attempt_within(el))
}

/// Element-scoped [`Document::query_first_valid`].
pub fn query_first_valid_in<'a, T>(
    el: ElementRef<'a>,
    locators: &[Locator],
    mut accept: impl FnMut(Hit<'a>) -> Option<T>,
) -> Option<T> {
    locators
        .iter()
        .find_map(|locator| locator.attempt_within(el).and_then(&mut accept))
}

/// Normalized text of the first visible text node under `el` matching
/// `pattern`.
#[must_use]
pub fn find_text_in(el: ElementRef<'_>, pattern: &Regex) -> Option<String> {
    visible_text_nodes(el).find_map(|(_, text)| {
        let normalized = normalize_whitespace(text);
        pattern.is_match(&normalized).then_some(normalized)
    })
}

/// Element-scoped [`Document::find_text_node`].
#[must_use]
pub fn find_text_node_in<'a>(
    el: ElementRef<'a>,
    pattern: &Regex,
    scope: Option<&Selector>,
) -> Option<ElementRef<'a>> {
    match scope {
        Some(scope) => el
            .select(scope)
            .find(|candidate| pattern.is_match(&text_of(*candidate))),
        None => visible_text_nodes(el).find_map(|(owner, text)| {
            pattern
                .is_match(&normalize_whitespace(text))
                .then_some(owner)
        }),
    }
}

/// Text nodes under `el` that are not inside a hidden element, paired with
/// the element that owns each one.
fn visible_text_nodes<'a>(el: ElementRef<'a>) -> impl Iterator<Item = (ElementRef<'a>, &'a str)> {
    el.descendants().filter_map(|node| {
        let text = node.value().as_text()?;
        let owner = node.parent().and_then(ElementRef::wrap)?;
        if is_hidden(node.ancestors().filter_map(ElementRef::wrap)) {
            return None;
        }
        Some((owner, &**text))
    })
}

fn is_hidden<'a>(mut ancestors: impl Iterator<Item = ElementRef<'a>>) -> bool {
    ancestors.any(|ancestor| HIDDEN_TAGS.contains(&ancestor.value().name()))
}
