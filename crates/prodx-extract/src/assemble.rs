//! Record assembly: run every extractor behind its own failure boundary and
//! merge the partial sections into one record.

use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use prodx_core::{ExtractedRecord, FieldGroup, Section};

use crate::document::{Document, Page};
use crate::error::ExtractError;
use crate::extractors::{ExtractFn, EXTRACTORS, LANGUAGE_FIELD};
use crate::sink::{ExtractorReport, FieldSink};

/// A record plus what each extractor did to build it.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub record: ExtractedRecord,
    /// One report per extractor, in record order.
    pub reports: Vec<ExtractorReport>,
}

impl Assembly {
    #[must_use]
    pub fn report(&self, section: Section) -> Option<&ExtractorReport> {
        self.reports.iter().find(|report| report.section == section)
    }

    /// Total faults across all extractors.
    #[must_use]
    pub fn fault_count(&self) -> usize {
        self.reports.iter().map(|report| report.faults.len()).sum()
    }
}

/// Extracts a record from a parsed page, stamped with the current time.
#[must_use]
pub fn assemble(doc: &Document, source_url: &str) -> ExtractedRecord {
    assemble_at(doc, source_url, Utc::now()).record
}

/// Extracts a record with an explicit extraction time.
///
/// Never fails. An extractor that panics loses only the fields it had not
/// yet written; the fault is logged and reported.
#[must_use]
pub fn assemble_at(doc: &Document, source_url: &str, extracted_at: DateTime<Utc>) -> Assembly {
    let page = Page::new(doc, source_url);
    let mut record = ExtractedRecord::new(source_url, extracted_at);
    let mut reports = Vec::with_capacity(EXTRACTORS.len());

    for (section, extract) in EXTRACTORS {
        let (mut group, report) = run_guarded(section, extract, &page);

        match record.group_mut(section) {
            Some(slot) => *slot = group,
            None => {
                record.page_language = group
                    .remove(LANGUAGE_FIELD)
                    .and_then(|value| value.as_str().map(str::to_string));
            }
        }

        tracing::debug!(
            section = %section,
            resolved = report.resolved.len(),
            faults = report.faults.len(),
            "extractor finished"
        );
        reports.push(report);
    }

    tracing::debug!(
        url = source_url,
        sections = record.populated_sections().len(),
        "record assembled"
    );
    Assembly { record, reports }
}

/// Parses `markup` and extracts a record from it.
#[must_use]
pub fn extract_product(markup: &str, source_url: &str) -> ExtractedRecord {
    let doc = Document::parse(markup);
    assemble(&doc, source_url)
}

fn run_guarded(
    section: Section,
    extract: ExtractFn,
    page: &Page<'_>,
) -> (FieldGroup, ExtractorReport) {
    let mut sink = FieldSink::new(section);
    let outcome = catch_unwind(AssertUnwindSafe(|| extract(page, &mut sink)));
    if let Err(payload) = outcome {
        let message = panic_message(payload.as_ref());
        tracing::warn!(section = %section, error = %message, "extractor panicked, keeping partial fields");
        sink.fault(ExtractError::Panicked { section, message });
    }
    sink.finish()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 18, 9, 30, 0).unwrap()
    }

    fn panicking(_: &Page<'_>, sink: &mut FieldSink) {
        sink.text("title", Some("partial"));
        panic!("selector blew up");
    }

    #[test]
    fn panic_keeps_partial_fields_and_reports() {
        let doc = Document::parse("<h1>x</h1>");
        let page = Page::new(&doc, "u");
        let (group, report) = run_guarded(Section::BasicInfo, panicking, &page);
        assert_eq!(group.get_str("title"), Some("partial"));
        assert!(report.panicked());
        assert_eq!(
            report.faults,
            vec![ExtractError::Panicked {
                section: Section::BasicInfo,
                message: "selector blew up".to_string(),
            }]
        );
    }

    #[test]
    fn empty_markup_yields_provenance_and_language_only() {
        let doc = Document::parse("");
        let assembly = assemble_at(&doc, "https://example.com/p", fixed_time());
        let value = serde_json::to_value(&assembly.record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "url": "https://example.com/p",
                "scraping_timestamp": "2025-07-18T09:30:00.000000Z",
                "page_language": "en",
            })
        );
        assert_eq!(assembly.reports.len(), Section::ALL.len());
        assert_eq!(assembly.fault_count(), 0);
    }

    #[test]
    fn reports_are_in_record_order() {
        let doc = Document::parse("<h1>Widget</h1>");
        let assembly = assemble_at(&doc, "u", fixed_time());
        let sections: Vec<Section> = assembly.reports.iter().map(|r| r.section).collect();
        assert_eq!(sections, Section::ALL.to_vec());
        let basic = assembly.report(Section::BasicInfo).unwrap();
        assert!(basic.resolved.iter().any(|f| f == "title"));
    }

    #[test]
    fn language_is_lifted_out_of_its_section() {
        let record = assemble_at(
            &Document::parse(r#"<html lang="de"><body></body></html>"#),
            "u",
            fixed_time(),
        )
        .record;
        assert_eq!(record.page_language.as_deref(), Some("de"));
    }
}
