//! Record export: one `bib:Document` + payload attachment (+ PDF attachments)
//! per saved page, in depth-first tree order.

use crate::counter::Counter;
use crate::error::ExportError;
use crate::report::{ExportReport, SkipReason, SkippedEntry};
use chrono::NaiveDateTime;
use scrapzot_core::{
    normalize_path, Deduper, ExportConfig, NodeId, NodeKind, ScrapbookArchive, ScrapbookTree,
    TagChain,
};
use std::path::Path;

/// `&` is the only character the importer chokes on; nothing else is escaped.
pub fn escape_ampersands(text: &str) -> String {
    text.replace('&', "&amp;")
}

/// Item ids are creation times (`YYYYMMDDHHMMSS`); render one for
/// `dcterms:dateSubmitted`.
pub fn submission_time(id: &str) -> Result<String, ExportError> {
    let created = NaiveDateTime::parse_from_str(id, "%Y%m%d%H%M%S").map_err(|source| {
        ExportError::MalformedTimestamp {
            id: id.to_string(),
            source,
        }
    })?;
    Ok(created.format("%Y-%m-%d %H:%M:%S").to_string())
}

struct RecordExporter<'a> {
    archive: &'a ScrapbookArchive,
    config: &'a ExportConfig,
    counter: Counter,
    deduper: Deduper,
    report: ExportReport,
    out: String,
}

/// Export every saved page of `tree` as Zotero RDF records.
///
/// Back-filled sources and dedup suffixes are written onto the tree's nodes,
/// so a later collection pass links to the same values.
pub fn export_records(
    tree: &mut ScrapbookTree,
    archive: &ScrapbookArchive,
    config: &ExportConfig,
) -> Result<(String, ExportReport), ExportError> {
    if !config.exclude.is_empty() {
        tracing::debug!(exclude = ?config.exclude, "excluding entries");
    }
    let mut exporter = RecordExporter {
        archive,
        config,
        counter: Counter::new(),
        deduper: Deduper::new(config),
        report: ExportReport::default(),
        out: String::new(),
    };
    let root = tree.root();
    exporter.export_node(tree, root, &TagChain::root())?;
    Ok((exporter.out, exporter.report))
}

impl RecordExporter<'_> {
    fn export_node(
        &mut self,
        tree: &mut ScrapbookTree,
        id: NodeId,
        chain: &TagChain,
    ) -> Result<(), ExportError> {
        let node = tree.node(id);
        match node.kind.clone() {
            NodeKind::Folder => {
                tracing::debug!(folder = %node.id, "exporting folder");
                let chain = chain.extend(&node.title, self.config);
                for child in tree.children(id).to_vec() {
                    self.export_node(tree, child, &chain)?;
                }
                Ok(())
            }
            NodeKind::Note => {
                tracing::error!(
                    item = %node.id,
                    "'note' type is not implemented, can't process entry. Skipping."
                );
                self.report.skipped.push(SkippedEntry {
                    id: node.id.clone(),
                    ordinal: None,
                    reason: SkipReason::UnsupportedNote,
                });
                Ok(())
            }
            NodeKind::Separator => Ok(()),
            NodeKind::Page | NodeKind::Notex | NodeKind::Unknown(_) => {
                self.export_leaf(tree, id, chain)
            }
        }
    }

    fn export_leaf(
        &mut self,
        tree: &mut ScrapbookTree,
        id: NodeId,
        chain: &TagChain,
    ) -> Result<(), ExportError> {
        let ordinal = self.counter.ordinal();
        let node = tree.node(id);
        if self.config.is_excluded(ordinal) {
            tracing::debug!(ordinal, item = %node.id, "excluding node");
            self.counter.count(&node.source);
            self.report.excluded.push(ordinal);
            return Ok(());
        }

        tracing::debug!(item = %node.id, source = %node.source, "exporting item");
        self.counter.count(&node.source);
        let submitted = submission_time(&node.id)?;

        let Some(payload) = self.archive.payload_file(&node.id) else {
            tracing::error!(
                item = %node.id,
                ordinal,
                dir = %self.archive.item_dir(&node.id).display(),
                "failed to export entry, no index.html or default.html. Skipping. \
                 Inspect the directory and decide what to do with orphaned data."
            );
            self.report.skipped.push(SkippedEntry {
                id: node.id.clone(),
                ordinal: Some(ordinal),
                reason: SkipReason::MissingPayload,
            });
            return Ok(());
        };

        let node = tree.node_mut(id);
        if node.title.is_empty() {
            node.title = escape_ampersands(&node.source);
        }
        if node.source.is_empty() {
            node.source = node.id.clone();
        }
        let suffix = self.deduper.suffix(&node.title);
        node.title.push_str(&suffix);
        let node = tree.node(id);

        let item_dir = self.archive.item_dir(&node.id);
        let mut pdfs = String::new();
        let mut pdf_links = String::new();
        for (n, pdf_name) in self.archive.pdf_files(&node.id)?.iter().enumerate() {
            let resource = format!("{}0{}", node.id, n + 1);
            pdfs.push_str(&pdf_attachment(&resource, &item_dir.join(pdf_name), pdf_name));
            pdf_links.push_str(&format!(
                "\n        <link:link rdf:resource=\"#item_{resource}\"/>"
            ));
            self.report.pdf_attachments += 1;
            tracing::debug!(pdf = %pdf_name, item = %node.id, "pdf attachment added");
        }

        let source = escape_ampersands(&node.source);
        let title = escape_ampersands(&node.title);
        let subject = escape_ampersands(chain.as_subject());

        self.out.push_str(&format!(
            r##"
    <bib:Document rdf:about="{source}">
        <z:itemType>webpage</z:itemType>
        <dcterms:isPartOf>
           <z:Website></z:Website>
        </dcterms:isPartOf>
        <link:link rdf:resource="#item_{id}"/>{pdf_links}
        <dc:subject>{subject}</dc:subject>
        <dc:identifier>
            <dcterms:URI>
               <rdf:value>{source}</rdf:value>
            </dcterms:URI>
        </dc:identifier>
        <dcterms:dateSubmitted>{submitted}</dcterms:dateSubmitted>
        <dc:title>{title}</dc:title>
    </bib:Document>"##,
            id = node.id,
        ));
        self.out.push_str(&format!(
            r##"
    <z:Attachment rdf:about="#item_{id}">
        <z:itemType>attachment</z:itemType>
        <rdf:resource rdf:resource="{path}"/>
        <dc:identifier>
            <dcterms:URI>
               <rdf:value>{source}</rdf:value>
            </dcterms:URI>
        </dc:identifier>
        <dcterms:dateSubmitted>{submitted}</dcterms:dateSubmitted>
        <dc:title>{title}</dc:title>
        <z:linkMode>1</z:linkMode>
        <link:type>text/html</link:type>
    </z:Attachment>"##,
            id = node.id,
            path = normalize_path(&payload).display(),
        ));
        self.out.push_str(&pdfs);

        self.report.records += 1;
        self.report.attachments += 1;
        Ok(())
    }
}

fn pdf_attachment(resource: &str, path: &Path, name: &str) -> String {
    format!(
        r##"
    <z:Attachment rdf:about="#item_{resource}">
        <z:itemType>attachment</z:itemType>
        <rdf:resource rdf:resource="{path}"/>
        <dc:title>{name}</dc:title>
        <link:type>application/pdf</link:type>
    </z:Attachment>"##,
        path = normalize_path(path).display(),
    )
}
