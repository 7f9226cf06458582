//! The output document: fixed header, record fragment, optional collection
//! fragment, fixed footer.

use crate::collections::export_collections;
use crate::error::ExportError;
use crate::records::export_records;
use crate::report::ExportReport;
use scrapzot_core::{open_scrapbook, ExportConfig, ScrapbookArchive};
use std::io::Write;

pub const HEADER: &str = r##"<rdf:RDF
xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
xmlns:z="http://www.zotero.org/namespaces/export#"
xmlns:dcterms="http://purl.org/dc/terms/"
xmlns:link="http://purl.org/rss/1.0/modules/link/"
xmlns:dc="http://purl.org/dc/elements/1.1/"
xmlns:bib="http://purl.org/net/biblio#">"##;

pub const FOOTER: &str = "\n</rdf:RDF>";

/// A fully rendered conversion, ready to be written to a sink.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub records: String,
    pub collections: Option<String>,
    pub report: ExportReport,
}

impl Conversion {
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), ExportError> {
        writer.write_all(HEADER.as_bytes())?;
        writer.write_all(self.records.as_bytes())?;
        if let Some(collections) = &self.collections {
            writer.write_all(collections.as_bytes())?;
        }
        writer.write_all(FOOTER.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    pub fn to_document(&self) -> String {
        let mut doc = String::with_capacity(
            HEADER.len() + self.records.len() + FOOTER.len(),
        );
        doc.push_str(HEADER);
        doc.push_str(&self.records);
        if let Some(collections) = &self.collections {
            doc.push_str(collections);
        }
        doc.push_str(FOOTER);
        doc
    }
}

/// Read the archive, build its tree and render both export passes.
///
/// Nothing is written here, so a fatal input error never leaves a truncated
/// output document behind.
pub fn render(archive: &ScrapbookArchive, config: &ExportConfig) -> Result<Conversion, ExportError> {
    let (mut tree, stats) = open_scrapbook(archive)?;
    let (records, mut report) = export_records(&mut tree, archive, config)?;
    report.build = stats;

    let collections = if config.collections {
        let (fragment, count) = export_collections(&tree);
        report.collections = count;
        Some(fragment)
    } else {
        None
    };

    Ok(Conversion {
        records,
        collections,
        report,
    })
}
