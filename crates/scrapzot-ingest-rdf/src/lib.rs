//! Scrapbook RDF ingestion (boundary adapter).
//!
//! This crate sits at the **interop boundary**:
//!
//! - It parses the archive's triple store (`scrapbook.rdf`, untrusted input).
//! - It folds the flat triple bag into one property bag per subject (`ItemMap`).
//! - It does *not* interpret folder structure; `scrapzot-core` does that.
//!
//! Parsing is delegated to **Sophia**:
//! - RDF/XML (`.rdf`, `.xml`), which is what the archiving extension writes
//! - N-Triples (`.nt`), handy for small hand-written fixtures

use anyhow::{anyhow, Context, Result};
use sophia::api::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

/// Namespace of the archiving extension's own properties (`NS1:` in its files).
pub const SCRAPBOOK_NS: &str = "http://amb.vis.ne.jp/mozilla/scrapbook-rdf#";
/// The RDF syntax namespace (`RDF:` in the extension's files).
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// Subject of the single root folder.
pub const ROOT_ID: &str = "urn:scrapbook:root";
/// Prefix of every saved item / folder subject; the remainder is a timestamp id.
pub const ITEM_PREFIX: &str = "urn:scrapbook:item";
/// Prefix of transient search-result subjects written by the extension UI.
pub const SEARCH_PREFIX: &str = "urn:scrapbook:search";

// ============================================================================
// Statement model
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum RdfTerm {
    Iri(String),
    BlankNode(String),
    Literal(String),
}

impl RdfTerm {
    fn into_value(self) -> String {
        match self {
            RdfTerm::Iri(iri) => iri,
            RdfTerm::BlankNode(bn) => format!("_:{bn}"),
            RdfTerm::Literal(lexical) => lexical,
        }
    }
}

/// One parsed triple, flattened to plain strings.
///
/// IRIs are kept verbatim, blank nodes are rendered as `_:label`, literals
/// keep only their lexical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RdfStatement {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl RdfStatement {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    NTriples,
    RdfXml,
}

impl RdfFormat {
    /// Guess the serialization from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "nt" | "ntriples" => Ok(RdfFormat::NTriples),
            "rdf" | "xml" => Ok(RdfFormat::RdfXml),
            other => Err(anyhow!("unsupported RDF format: .{other}")),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct RdfIngestSinkError {
    message: String,
}

impl From<anyhow::Error> for RdfIngestSinkError {
    fn from(value: anyhow::Error) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

// ============================================================================
// Term parsing (Sophia display form -> RdfTerm)
// ============================================================================

fn unescape_rdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn parse_term_display(term: &str) -> Result<RdfTerm> {
    let s = term.trim();

    if let Some(rest) = s.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return Ok(RdfTerm::Iri(rest.to_string()));
    }

    if let Some(rest) = s.strip_prefix("_:") {
        return Ok(RdfTerm::BlankNode(rest.to_string()));
    }

    if s.starts_with('"') {
        let mut end_quote = None;
        let mut prev_was_escape = false;
        for (i, ch) in s.char_indices().skip(1) {
            if ch == '"' && !prev_was_escape {
                end_quote = Some(i);
                break;
            }
            prev_was_escape = ch == '\\' && !prev_was_escape;
        }
        let Some(end) = end_quote else {
            return Err(anyhow!("invalid literal term (missing closing quote): {s}"));
        };
        // Language tags and datatypes carry nothing the archive relies on.
        return Ok(RdfTerm::Literal(unescape_rdf_string(&s[1..end])));
    }

    Err(anyhow!("unsupported RDF term form: {s}"))
}

fn statement_from_display(
    subject: &str,
    predicate: &str,
    object: &str,
) -> Result<Option<RdfStatement>> {
    let subject = match parse_term_display(subject)? {
        RdfTerm::Literal(lit) => return Err(anyhow!("literal in subject position: {lit}")),
        node => node.into_value(),
    };
    let RdfTerm::Iri(predicate) = parse_term_display(predicate)? else {
        return Ok(None);
    };
    let object = parse_term_display(object)?.into_value();
    Ok(Some(RdfStatement {
        subject,
        predicate,
        object,
    }))
}

/// Parse a serialized triple store into statements, in document order.
pub fn parse_statements(bytes: &[u8], format: RdfFormat) -> Result<Vec<RdfStatement>> {
    let cursor = std::io::Cursor::new(bytes);
    let reader = std::io::BufReader::new(cursor);

    let mut out: Vec<RdfStatement> = Vec::new();
    match format {
        RdfFormat::NTriples => {
            let mut parser = sophia::turtle::parser::nt::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> std::result::Result<(), RdfIngestSinkError> {
                    let stmt = statement_from_display(
                        &t.s().to_string(),
                        &t.p().to_string(),
                        &t.o().to_string(),
                    )?;
                    out.extend(stmt);
                    Ok(())
                })
                .map_err(|e| anyhow!("failed to parse N-Triples: {e}"))?;
        }
        RdfFormat::RdfXml => {
            let mut parser = sophia::xml::parser::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> std::result::Result<(), RdfIngestSinkError> {
                    let stmt = statement_from_display(
                        &t.s().to_string(),
                        &t.p().to_string(),
                        &t.o().to_string(),
                    )?;
                    out.extend(stmt);
                    Ok(())
                })
                .map_err(|e| anyhow!("failed to parse RDF/XML: {e}"))?;
        }
    }
    Ok(out)
}

// ============================================================================
// Item folding
// ============================================================================

/// Property bag of one subject, keyed by short property names (`NS1:title`,
/// `RDF:_1`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    properties: BTreeMap<String, String>,
}

impl Item {
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(property.into(), value.into());
    }

    /// `NS1:type`; absent means the empty type (a saved page).
    pub fn item_type(&self) -> &str {
        self.get("NS1:type").unwrap_or("")
    }

    pub fn title(&self) -> &str {
        self.get("NS1:title").unwrap_or("")
    }

    pub fn comment(&self) -> &str {
        self.get("NS1:comment").unwrap_or("")
    }

    pub fn source(&self) -> &str {
        self.get("NS1:source").unwrap_or("")
    }

    /// The `n`-th ordered child reference (`RDF:_n`, 1-based).
    pub fn child(&self, n: usize) -> Option<&str> {
        self.get(&format!("RDF:_{n}"))
    }
}

/// Items keyed by bare identifier. Ordered so every pass over it is stable.
pub type ItemMap = BTreeMap<String, Item>;

fn strip_item_prefix(value: &str) -> &str {
    value.strip_prefix(ITEM_PREFIX).unwrap_or(value)
}

fn short_property_name(predicate: &str) -> String {
    if let Some(local) = predicate.strip_prefix(SCRAPBOOK_NS) {
        format!("NS1:{local}")
    } else if let Some(local) = predicate.strip_prefix(RDF_NS) {
        format!("RDF:{local}")
    } else {
        predicate.to_string()
    }
}

/// Fold statements into per-subject property bags.
///
/// Search subjects are dropped, item subjects and item references are
/// reduced to their bare id. A later statement for the same
/// (subject, property) replaces an earlier one.
pub fn load_items<I>(statements: I) -> ItemMap
where
    I: IntoIterator<Item = RdfStatement>,
{
    let mut items = ItemMap::new();
    for stmt in statements {
        if stmt.subject.starts_with(SEARCH_PREFIX) {
            continue;
        }
        let item_id = strip_item_prefix(&stmt.subject).to_string();
        let property = short_property_name(&stmt.predicate);
        let value = strip_item_prefix(&stmt.object).to_string();

        tracing::debug!(item = %item_id, property = %property, "reading triple");
        items.entry(item_id).or_default().set(property, value);
    }
    items
}

/// Read, parse and fold a triple store file in one go.
pub fn load_rdf_file(path: &Path, format: RdfFormat) -> Result<ItemMap> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let statements = parse_statements(&bytes, format)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        statements = statements.len(),
        "parsed triple store"
    );
    Ok(load_items(statements))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RDF: &str = r#"<?xml version="1.0"?>
<RDF:RDF xmlns:NS1="http://amb.vis.ne.jp/mozilla/scrapbook-rdf#"
         xmlns:NC="http://home.netscape.com/NC-rdf#"
         xmlns:RDF="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <RDF:Seq RDF:about="urn:scrapbook:root">
    <RDF:li RDF:resource="urn:scrapbook:item20180101120000"/>
    <RDF:li RDF:resource="urn:scrapbook:item20180101120001"/>
  </RDF:Seq>
  <RDF:Description RDF:about="urn:scrapbook:item20180101120000"
                   NS1:id="20180101120000"
                   NS1:type=""
                   NS1:title="Tom &amp; Jerry"
                   NS1:source="http://example.com/?a=1&amp;b=2" />
  <RDF:Description RDF:about="urn:scrapbook:item20180101120001"
                   NS1:id="20180101120001"
                   NS1:type="separator"
                   NS1:title="" />
  <RDF:Description RDF:about="urn:scrapbook:search"
                   NS1:title="last search" />
</RDF:RDF>
"#;

    #[test]
    fn folds_rdf_xml_into_items() {
        let statements =
            parse_statements(SAMPLE_RDF.as_bytes(), RdfFormat::RdfXml).expect("parse rdf/xml");
        let items = load_items(statements);

        assert_eq!(items.len(), 3, "root + two items, search dropped");

        let root = items.get(ROOT_ID).expect("root item");
        assert_eq!(root.child(1), Some("20180101120000"));
        assert_eq!(root.child(2), Some("20180101120001"));
        assert_eq!(root.child(3), None);
        assert_eq!(root.get("RDF:type"), Some(&*format!("{RDF_NS}Seq")));

        let page = items.get("20180101120000").expect("page item");
        assert_eq!(page.title(), "Tom & Jerry");
        assert_eq!(page.source(), "http://example.com/?a=1&b=2");
        assert_eq!(page.item_type(), "");

        let sep = items.get("20180101120001").expect("separator item");
        assert_eq!(sep.item_type(), "separator");
    }

    #[test]
    fn strips_prefixes_and_rewrites_namespaces() {
        let items = load_items(vec![
            RdfStatement::new(
                "urn:scrapbook:item20180101120000",
                format!("{SCRAPBOOK_NS}title"),
                "Hello",
            ),
            RdfStatement::new(
                "urn:scrapbook:item20180101120000",
                "http://home.netscape.com/NC-rdf#chrome",
                "x",
            ),
            RdfStatement::new(
                "urn:scrapbook:item20180101120000",
                format!("{RDF_NS}_1"),
                "urn:scrapbook:item20180101120005",
            ),
            RdfStatement::new(
                "urn:scrapbook:search?q=a",
                format!("{SCRAPBOOK_NS}title"),
                "ignored",
            ),
        ]);

        assert_eq!(items.len(), 1);
        let item = &items["20180101120000"];
        assert_eq!(item.title(), "Hello");
        assert_eq!(item.get("http://home.netscape.com/NC-rdf#chrome"), Some("x"));
        assert_eq!(item.child(1), Some("20180101120005"));
    }

    #[test]
    fn later_triple_overwrites_earlier_one() {
        let items = load_items(vec![
            RdfStatement::new(ROOT_ID, format!("{SCRAPBOOK_NS}title"), "first"),
            RdfStatement::new(ROOT_ID, format!("{SCRAPBOOK_NS}title"), "second"),
        ]);
        assert_eq!(items[ROOT_ID].title(), "second");
    }

    #[test]
    fn parses_ntriples_literals_with_escapes() {
        let nt = format!(
            "<urn:scrapbook:item20180101120000> <{SCRAPBOOK_NS}title> \"say \\\"hi\\\"\" .\n\
             <urn:scrapbook:item20180101120000> <{SCRAPBOOK_NS}comment> \"hi\"@en .\n"
        );
        let items = load_items(parse_statements(nt.as_bytes(), RdfFormat::NTriples).unwrap());
        let item = &items["20180101120000"];
        assert_eq!(item.title(), "say \"hi\"");
        assert_eq!(item.comment(), "hi");
    }

    #[test]
    fn rejects_malformed_input() {
        let err = parse_statements(b"<urn:a> <urn:b> .\n", RdfFormat::NTriples).unwrap_err();
        assert!(err.to_string().contains("N-Triples"), "{err}");
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            RdfFormat::from_path(Path::new("scrapbook.rdf")).unwrap(),
            RdfFormat::RdfXml
        );
        assert_eq!(
            RdfFormat::from_path(Path::new("fixture.nt")).unwrap(),
            RdfFormat::NTriples
        );
        assert!(RdfFormat::from_path(Path::new("notes.ttl")).is_err());
    }
}
