use scrapzot_ingest_rdf::Item;
use serde::Serialize;

/// Index of a node inside its [`crate::ScrapbookTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Folder,
    /// A saved page (the extension writes an empty type for these).
    Page,
    /// Plain-text note. Not exportable.
    Note,
    /// Formatted note.
    Notex,
    Separator,
    /// Any other type (`file`, `bookmark`, `image`, ...), or none for
    /// repaired entries. Exported like a page.
    Unknown(String),
}

impl NodeKind {
    pub fn from_type(raw: &str) -> Self {
        match raw {
            "folder" => NodeKind::Folder,
            "" => NodeKind::Page,
            "note" => NodeKind::Note,
            "notex" => NodeKind::Notex,
            "separator" => NodeKind::Separator,
            other => NodeKind::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Folder => "folder",
            NodeKind::Page => "",
            NodeKind::Note => "note",
            NodeKind::Notex => "notex",
            NodeKind::Separator => "separator",
            NodeKind::Unknown(raw) => raw,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, NodeKind::Folder)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    /// Sanitized display name. Only the root has an empty one.
    pub title: String,
    pub comment: String,
    pub source: String,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn from_item(id: &str, kind: NodeKind, item: &Item) -> Self {
        Self {
            id: id.to_string(),
            kind,
            title: sanitize_title(item.title(), id),
            comment: item.comment().to_string(),
            source: item.source().to_string(),
            children: Vec::new(),
        }
    }

    /// A node for an entry with no metadata record: the id doubles as title.
    pub fn detached(id: &str, kind: NodeKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
            title: sanitize_title(id, id),
            comment: String::new(),
            source: String::new(),
            children: Vec::new(),
        }
    }
}

const RESERVED_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|', '='];

/// Make a title safe for file names and collection ids.
///
/// Drops `\ / : * ? " < > | =`, trims surrounding whitespace, then trailing
/// dots/spaces (folders ending in a dot break on Windows). Falls back to
/// `fallback` when nothing is left.
pub fn sanitize_title(title: &str, fallback: &str) -> String {
    let neutered: String = title.chars().filter(|c| !RESERVED_CHARS.contains(c)).collect();
    let name = neutered
        .trim()
        .trim_end_matches(['.', ' '])
        .trim_start_matches(' ');
    if name.is_empty() {
        fallback.to_string()
    } else {
        name.to_string()
    }
}
