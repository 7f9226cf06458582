//! Zotero RDF export of a Scrapbook archive.
//!
//! Two independent depth-first walks over the resolved tree:
//!
//! - [`records`]: one `bib:Document` per saved page with its attachments,
//!   numbered by [`counter::Counter`] so `--exclude` can skip records that
//!   hang the importer;
//! - [`collections`]: the folder hierarchy as `z:Collection` entries.
//!
//! [`document`] stitches both into the final RDF document.

pub mod collections;
pub mod counter;
pub mod document;
pub mod error;
pub mod records;
pub mod report;

#[cfg(test)]
mod testutil;

pub use collections::export_collections;
pub use counter::Counter;
pub use document::{render, Conversion, FOOTER, HEADER};
pub use error::ExportError;
pub use records::{escape_ampersands, export_records, submission_time};
pub use report::{ExportReport, SkipReason, SkippedEntry};
