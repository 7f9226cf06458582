//! Resolve the flat item map into a rooted, ordered tree.
//!
//! Folders list their children as ordinal properties (`RDF:_1`, `RDF:_2`, ...);
//! the builder follows them depth-first from the root. Two repair passes then
//! make sure nothing in the archive is lost:
//!
//! - **lost items**: items no folder reaches are attached under the root;
//! - **lost folders**: `data/<dir>` directories without any item become
//!   synthetic root-level entries.

use crate::archive::ScrapbookArchive;
use crate::error::TreeError;
use crate::node::{Node, NodeId, NodeKind};
use scrapzot_ingest_rdf::{Item, ItemMap, ROOT_ID};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Arena-backed tree. Every item key maps to exactly one node.
#[derive(Debug, Clone)]
pub struct ScrapbookTree {
    nodes: Vec<Node>,
    root: NodeId,
    index: HashMap<String, NodeId>,
}

impl ScrapbookTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Node resolved for an item key (`urn:scrapbook:root` for the root).
    pub fn lookup(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub items_loaded: usize,
    pub lost_items: usize,
    pub dangling_refs: usize,
    pub lost_folders: usize,
}

struct TreeBuilder<'a> {
    items: &'a ItemMap,
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
    in_progress: HashSet<String>,
    dangling: Vec<String>,
}

impl<'a> TreeBuilder<'a> {
    fn new(items: &'a ItemMap) -> Self {
        Self {
            items,
            nodes: Vec::new(),
            index: HashMap::new(),
            in_progress: HashSet::new(),
            dangling: Vec::new(),
        }
    }

    fn push(&mut self, key: &str, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.index.insert(key.to_string(), id);
        id
    }

    fn resolve(
        &mut self,
        key: &str,
        node_id: &str,
        item: &'a Item,
        kind: NodeKind,
    ) -> Result<NodeId, TreeError> {
        if let Some(&existing) = self.index.get(key) {
            return Ok(existing);
        }
        if !self.in_progress.insert(key.to_string()) {
            return Err(TreeError::CyclicFolder {
                id: node_id.to_string(),
            });
        }

        let items = self.items;
        let mut node = Node::from_item(node_id, kind, item);
        if node.kind.is_folder() {
            for n in 1.. {
                let Some(child_key) = item.child(n) else {
                    break;
                };
                match items.get(child_key) {
                    Some(child) => {
                        let child_kind = NodeKind::from_type(child.item_type());
                        let child_id = self.resolve(child_key, child_key, child, child_kind)?;
                        node.children.push(child_id);
                    }
                    None => {
                        tracing::debug!(
                            folder = %node_id,
                            child = %child_key,
                            "dangling child reference"
                        );
                        self.dangling.push(child_key.to_string());
                    }
                }
            }
        } else if item.child(1).is_some() {
            return Err(TreeError::ChildrenOnLeaf {
                id: node_id.to_string(),
                kind: node.kind.as_str().to_string(),
            });
        }

        self.in_progress.remove(key);
        Ok(self.push(key, node))
    }

    /// Attach every item the descent from the root never reached.
    ///
    /// Items referenced by another unreached folder are left for that folder
    /// to pick up, so a lost subtree lands under the root once, whole.
    fn attach_lost_items(&mut self, root: NodeId) -> Result<usize, TreeError> {
        let items = self.items;
        let lost: Vec<&'a String> = items
            .keys()
            .filter(|key| !self.index.contains_key(key.as_str()))
            .collect();
        let mut nested: HashSet<&'a str> = HashSet::new();
        for key in &lost {
            let item = &items[key.as_str()];
            if NodeKind::from_type(item.item_type()).is_folder() {
                nested.extend((1..).map_while(|n| item.child(n)));
            }
        }

        let mut attached = 0;
        // Second round catches lost folders that only reference each other.
        for skip_nested in [true, false] {
            for key in &lost {
                if self.index.contains_key(key.as_str()) {
                    continue;
                }
                if skip_nested && nested.contains(key.as_str()) {
                    continue;
                }
                tracing::debug!(item = %key, "found lost item");
                let item = &items[key.as_str()];
                let kind = NodeKind::from_type(item.item_type());
                let id = self.resolve(key, key, item, kind)?;
                self.nodes[root.0].children.push(id);
                attached += 1;
            }
        }
        Ok(attached)
    }

    /// Attach child references that point at no item, so they are not dropped.
    fn attach_dangling(
        &mut self,
        root: NodeId,
        archive: &ScrapbookArchive,
    ) -> Result<usize, TreeError> {
        let mut attached = 0;
        for key in std::mem::take(&mut self.dangling) {
            if self.index.contains_key(&key) {
                continue;
            }
            let kind = guess_detached_kind(archive, &key)?;
            let id = self.push(&key, Node::detached(&key, kind));
            self.nodes[root.0].children.push(id);
            attached += 1;
        }
        Ok(attached)
    }

    /// Attach data directories that have no item at all.
    fn attach_lost_folders(
        &mut self,
        root: NodeId,
        archive: &ScrapbookArchive,
    ) -> Result<usize, TreeError> {
        let mut attached = 0;
        for dir in archive.subdirs(&archive.data_dir())? {
            if self.items.contains_key(&dir) || self.index.contains_key(&dir) {
                continue;
            }
            let kind = guess_detached_kind(archive, &dir)?;
            tracing::debug!(folder = %dir, kind = %kind.as_str(), "found lost folder");
            let id = self.push(&dir, Node::detached(&dir, kind));
            self.nodes[root.0].children.push(id);
            attached += 1;
        }
        Ok(attached)
    }
}

/// A directory holding nothing but `index.html` looks like a saved note; it
/// is exported as a page. Anything else stays untyped.
fn guess_detached_kind(archive: &ScrapbookArchive, id: &str) -> Result<NodeKind, TreeError> {
    let files = archive.subfiles(&archive.item_dir(id))?;
    if files.len() == 1 && files[0].to_lowercase() == "index.html" {
        Ok(NodeKind::Page)
    } else {
        Ok(NodeKind::Unknown(String::new()))
    }
}

/// Build the tree for `items`, repairing orphans against `archive`'s data
/// directories.
pub fn build_tree(
    items: &ItemMap,
    archive: &ScrapbookArchive,
) -> Result<(ScrapbookTree, BuildStats), TreeError> {
    let root_item = items.get(ROOT_ID).ok_or(TreeError::MissingRoot)?;

    let mut builder = TreeBuilder::new(items);
    let root = builder.resolve(ROOT_ID, "", root_item, NodeKind::Folder)?;

    let lost_items = builder.attach_lost_items(root)?;
    if lost_items > 0 {
        tracing::debug!(count = lost_items, "lost items found");
    }
    let dangling_refs = builder.attach_dangling(root, archive)?;
    if dangling_refs > 0 {
        tracing::debug!(count = dangling_refs, "dangling references found");
    }
    let lost_folders = builder.attach_lost_folders(root, archive)?;
    if lost_folders > 0 {
        tracing::debug!(count = lost_folders, "lost folders found");
    }

    let stats = BuildStats {
        items_loaded: items.len(),
        lost_items,
        dangling_refs,
        lost_folders,
    };
    let tree = ScrapbookTree {
        nodes: builder.nodes,
        root,
        index: builder.index,
    };
    Ok((tree, stats))
}

/// Load `scrapbook.rdf` from the archive and build its tree.
pub fn open_scrapbook(archive: &ScrapbookArchive) -> Result<(ScrapbookTree, BuildStats), TreeError> {
    tracing::debug!(path = %archive.root().display(), "opening scrapbook");
    let items = archive.load_items()?;
    let (tree, stats) = build_tree(&items, archive)?;
    tracing::debug!(items = stats.items_loaded, "items loaded");
    Ok((tree, stats))
}
