//! Resilient product-page extraction engine.
//!
//! Given rendered product-page markup and its source URL, the engine runs
//! one extractor per record section. Each extractor walks declarative
//! locator cascades (most template-specific first, bare tags last), keeps
//! the first structurally valid match per field, and contains its own
//! failures. The assembler merges the partial sections into an
//! [`ExtractedRecord`] and never fails.

pub mod assemble;
pub mod coerce;
pub mod document;
pub mod error;
pub mod extractors;
pub mod locator;
pub mod persist;
pub mod sink;

pub use assemble::{assemble, assemble_at, extract_product, Assembly};
pub use document::{Document, Page};
pub use error::{ExtractError, PersistError};
pub use locator::{Hit, Locator};
pub use prodx_core::{ExtractedRecord, FieldGroup, Section};
pub use sink::{ExtractorReport, FieldSink};
