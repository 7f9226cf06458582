//! Scratch archives for exporter tests.

use scrapzot_core::{build_tree, ScrapbookArchive, ScrapbookTree};
use scrapzot_ingest_rdf::{load_items, RdfStatement, RDF_NS, ROOT_ID, SCRAPBOOK_NS};
use std::collections::HashMap;
use tempfile::TempDir;

pub(crate) struct TestArchive {
    pub dir: TempDir,
    statements: Vec<RdfStatement>,
    child_counts: HashMap<String, usize>,
}

fn subject(id: &str) -> String {
    if id.is_empty() {
        ROOT_ID.to_string()
    } else {
        format!("urn:scrapbook:item{id}")
    }
}

impl TestArchive {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
            statements: Vec::new(),
            child_counts: HashMap::new(),
        }
    }

    pub fn archive(&self) -> ScrapbookArchive {
        ScrapbookArchive::new(self.dir.path())
    }

    fn prop(&mut self, id: &str, name: &str, value: &str) {
        self.statements.push(RdfStatement::new(
            subject(id),
            format!("{SCRAPBOOK_NS}{name}"),
            value,
        ));
    }

    /// Declare an item under `parent` ("" is the root).
    pub fn item(&mut self, parent: &str, id: &str, kind: &str, title: &str, source: &str) {
        let n = self.child_counts.entry(parent.to_string()).or_insert(0);
        *n += 1;
        let n = *n;
        self.statements.push(RdfStatement::new(
            subject(parent),
            format!("{RDF_NS}_{n}"),
            subject(id),
        ));
        self.prop(id, "type", kind);
        self.prop(id, "title", title);
        if !source.is_empty() {
            self.prop(id, "source", source);
        }
    }

    pub fn folder(&mut self, parent: &str, id: &str, title: &str) {
        self.item(parent, id, "folder", title, "");
    }

    /// A saved page with an `index.html` payload.
    pub fn page(&mut self, parent: &str, id: &str, title: &str, source: &str) {
        self.item(parent, id, "", title, source);
        self.file(id, "index.html");
    }

    pub fn file(&self, id: &str, name: &str) {
        let dir = self.archive().item_dir(id);
        std::fs::create_dir_all(&dir).expect("item dir");
        std::fs::write(dir.join(name), "<html></html>").expect("write file");
    }

    pub fn tree(&self) -> ScrapbookTree {
        let mut statements = self.statements.clone();
        // The root must exist even when nothing was added to it.
        statements.push(RdfStatement::new(
            ROOT_ID,
            format!("{RDF_NS}type"),
            format!("{RDF_NS}Seq"),
        ));
        let items = load_items(statements);
        let (tree, _) = build_tree(&items, &self.archive()).expect("build tree");
        tree
    }
}
