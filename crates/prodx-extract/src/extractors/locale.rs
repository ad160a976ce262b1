//! Page language detection.
//!
//! Declared languages win over guesses: `<html lang>`, then language meta
//! tags, then a character-set heuristic over a sample of visible text. The
//! result is always populated; `en` is the fallback.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::Page;
use crate::locator::{css_cascade, Hit, Locator};
use crate::sink::FieldSink;

/// Sink field the assembler lifts into `ExtractedRecord::page_language`.
pub const LANGUAGE_FIELD: &str = "language";

pub const FALLBACK_LANGUAGE: &str = "en";

const SAMPLE_CHARS: usize = 1000;

static DECLARED: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    css_cascade(&[
        "html[lang]",
        r#"meta[name="language"]"#,
        r#"meta[http-equiv="content-language"]"#,
        r#"meta[http-equiv="Content-Language"]"#,
    ])
});

/// Checked in order; the first script found in the sample decides.
static SCRIPTS: LazyLock<[(&'static str, Regex); 3]> = LazyLock::new(|| {
    [
        ("pl", Regex::new("[ąćęłńóśźż]").expect("valid regex")),
        (
            "fr",
            Regex::new("[àáâãäåæçèéêëìíîïñòóôõöøùúûüý]").expect("valid regex"),
        ),
        ("de", Regex::new("[äöüß]").expect("valid regex")),
    ]
});

pub(super) fn extract(page: &Page<'_>, sink: &mut FieldSink) {
    let declared = page.doc.query_first_valid(&DECLARED, declared_language);
    let language = declared.unwrap_or_else(|| {
        let sample = page.doc.visible_text_sample(SAMPLE_CHARS);
        guess_language(&sample).to_string()
    });
    sink.text(LANGUAGE_FIELD, Some(language));
}

fn declared_language(hit: Hit<'_>) -> Option<String> {
    hit.attr("lang").or_else(|| hit.attr("content"))
}

/// Guesses a language from accented characters; `en` when none are found.
#[must_use]
pub fn guess_language(sample: &str) -> &'static str {
    SCRIPTS
        .iter()
        .find(|(_, pattern)| pattern.is_match(sample))
        .map_or(FALLBACK_LANGUAGE, |(code, _)| *code)
}

#[cfg(test)]
mod tests {
    use prodx_core::Section;

    use super::*;
    use crate::extractors::test_support::run;

    fn language(html: &str) -> Option<String> {
        let (group, _) = run(Section::PageLanguage, html);
        group.get_str(LANGUAGE_FIELD).map(str::to_string)
    }

    #[test]
    fn html_lang_attribute_wins() {
        let html = r#"<html lang="pl-PL"><head><meta name="language" content="de"></head><body>café</body></html>"#;
        assert_eq!(language(html).as_deref(), Some("pl-PL"));
    }

    #[test]
    fn meta_language_when_no_lang_attribute() {
        let html = r#"<html><head><meta http-equiv="Content-Language" content="fr"></head></html>"#;
        assert_eq!(language(html).as_deref(), Some("fr"));
    }

    #[test]
    fn blank_lang_attribute_falls_through() {
        let html = r#"<html lang=" "><head><meta name="language" content="es"></head></html>"#;
        assert_eq!(language(html).as_deref(), Some("es"));
    }

    #[test]
    fn heuristic_detects_polish() {
        assert_eq!(language("<p>Darmowa dostawa już dziś</p>").as_deref(), Some("pl"));
    }

    #[test]
    fn heuristic_detects_french() {
        assert_eq!(language("<p>Livraison très rapide</p>").as_deref(), Some("fr"));
    }

    #[test]
    fn german_umlauts_match_french_set_first() {
        assert_eq!(guess_language("Größe"), "fr");
        assert_eq!(guess_language("Straße"), "de");
    }

    #[test]
    fn plain_ascii_defaults_to_english() {
        assert_eq!(language("<p>Fast shipping</p>").as_deref(), Some("en"));
        assert_eq!(language("").as_deref(), Some("en"));
    }

    #[test]
    fn script_text_is_not_sampled() {
        let html = "<script>var s = 'żółć';</script><p>Plain</p>";
        assert_eq!(language(html).as_deref(), Some("en"));
    }
}
