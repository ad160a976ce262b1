//! Per-extractor output buffer.
//!
//! Each extractor writes into its own [`FieldSink`]. The sink applies the
//! typed insertion rules of [`FieldGroup`], runs numeric coercion, and keeps
//! a record of which fields were attempted and which faults occurred. The
//! assembler turns a finished sink into a section of the record plus an
//! [`ExtractorReport`].

use prodx_core::{FieldGroup, Section};
use serde_json::Value;

use crate::coerce::{coerce_float, coerce_int};
use crate::error::ExtractError;

/// What one extractor did for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorReport {
    pub section: Section,
    /// Fields the extractor looked for, in the order it looked.
    pub attempted: Vec<String>,
    /// Fields present in the finished section.
    pub resolved: Vec<String>,
    pub faults: Vec<ExtractError>,
}

impl ExtractorReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }

    #[must_use]
    pub fn panicked(&self) -> bool {
        self.faults
            .iter()
            .any(|fault| matches!(fault, ExtractError::Panicked { .. }))
    }
}

#[derive(Debug)]
pub struct FieldSink {
    section: Section,
    group: FieldGroup,
    attempted: Vec<String>,
    faults: Vec<ExtractError>,
}

impl FieldSink {
    #[must_use]
    pub fn new(section: Section) -> Self {
        Self {
            section,
            group: FieldGroup::new(),
            attempted: Vec::new(),
            faults: Vec::new(),
        }
    }

    #[must_use]
    pub fn section(&self) -> Section {
        self.section
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.group.contains(field)
    }

    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.group.get_str(field)
    }

    /// Stores normalized text. Blank text counts as a miss.
    pub fn text(&mut self, field: &str, value: Option<impl AsRef<str>>) -> bool {
        self.attempt(field);
        let stored = value.is_some_and(|v| self.group.insert_text(field, v.as_ref()));
        self.log_miss(field, stored)
    }

    /// Like [`FieldSink::text`], but an existing value is kept.
    pub fn text_if_absent(&mut self, field: &str, value: Option<impl AsRef<str>>) -> bool {
        if self.group.contains(field) {
            return false;
        }
        self.text(field, value)
    }

    /// Coerces `raw` to a float. Text that does not parse is dropped and
    /// recorded as a coercion fault.
    pub fn float(&mut self, field: &str, raw: Option<impl AsRef<str>>) -> bool {
        self.attempt(field);
        let Some(raw) = raw else {
            return self.log_miss(field, false);
        };
        let raw = raw.as_ref();
        match coerce_float(raw) {
            Some(value) => self.group.insert_float(field, value),
            None => {
                self.coercion_fault(field, raw);
                false
            }
        }
    }

    /// Coerces `raw` to an integer; see [`FieldSink::float`].
    pub fn integer(&mut self, field: &str, raw: Option<impl AsRef<str>>) -> bool {
        self.attempt(field);
        let Some(raw) = raw else {
            return self.log_miss(field, false);
        };
        let raw = raw.as_ref();
        match coerce_int(raw) {
            Some(value) => self.group.insert_int(field, value),
            None => {
                self.coercion_fault(field, raw);
                false
            }
        }
    }

    pub fn list(&mut self, field: &str, values: Vec<String>) -> bool {
        self.attempt(field);
        let stored = self.group.insert_list(field, values);
        self.log_miss(field, stored)
    }

    pub fn group(&mut self, field: &str, group: FieldGroup) -> bool {
        self.attempt(field);
        let stored = self.group.insert_group(field, group);
        self.log_miss(field, stored)
    }

    pub fn groups(&mut self, field: &str, groups: Vec<FieldGroup>) -> bool {
        self.attempt(field);
        let stored = self.group.insert_groups(field, groups);
        self.log_miss(field, stored)
    }

    /// Stores arbitrary structured data (embedded script values).
    pub fn value(&mut self, field: &str, value: Value) -> bool {
        self.attempt(field);
        let stored = self.group.insert_value(field, value);
        self.log_miss(field, stored)
    }

    pub fn fault(&mut self, fault: ExtractError) {
        tracing::debug!(section = %self.section, error = %fault, "extractor fault");
        self.faults.push(fault);
    }

    /// Consumes the sink, returning the section mapping and its report.
    #[must_use]
    pub fn finish(self) -> (FieldGroup, ExtractorReport) {
        let resolved = self.group.keys().map(str::to_string).collect();
        let report = ExtractorReport {
            section: self.section,
            attempted: self.attempted,
            resolved,
            faults: self.faults,
        };
        (self.group, report)
    }

    fn attempt(&mut self, field: &str) {
        if !self.attempted.iter().any(|f| f == field) {
            self.attempted.push(field.to_string());
        }
    }

    fn log_miss(&self, field: &str, stored: bool) -> bool {
        if !stored {
            tracing::trace!(section = %self.section, field, "field not found");
        }
        stored
    }

    fn coercion_fault(&mut self, field: &str, raw: &str) {
        tracing::debug!(section = %self.section, field, raw, "numeric coercion failed");
        self.faults.push(ExtractError::Coercion {
            field: field.to_string(),
            raw: raw.to_string(),
        });
    }
}
