//! Collection export: one `z:Collection` per folder, linking sub-folders and
//! exported items.

use crate::records::escape_ampersands;
use scrapzot_core::{NodeId, NodeKind, ScrapbookTree};

/// Render the collection fragment. The root folder (empty name) is left out,
/// its sub-collections are not.
pub fn export_collections(tree: &ScrapbookTree) -> (String, usize) {
    let mut out = String::new();
    let count = export_folder(tree, tree.root(), &mut out);
    (out, count)
}

fn export_folder(tree: &ScrapbookTree, id: NodeId, out: &mut String) -> usize {
    let node = tree.node(id);
    if !node.kind.is_folder() {
        return 0;
    }

    let mut collection = format!(
        "\n    <z:Collection rdf:about=\"#collection_{}\">\n        <dc:title>{}</dc:title>",
        node.id,
        escape_ampersands(&node.title)
    );
    let mut subcollections = String::new();
    let mut count = 0;
    for &child_id in tree.children(id) {
        let child = tree.node(child_id);
        match child.kind {
            NodeKind::Folder => {
                collection.push_str(&format!(
                    "\n        <dcterms:hasPart rdf:resource=\"#collection_{}\"/>",
                    child.id
                ));
                count += export_folder(tree, child_id, &mut subcollections);
            }
            NodeKind::Note | NodeKind::Separator => {}
            _ => {
                collection.push_str(&format!(
                    "\n        <dcterms:hasPart rdf:resource=\"{}\"/>",
                    escape_ampersands(&child.source)
                ));
            }
        }
    }
    collection.push_str("\n    </z:Collection>");

    if !node.title.is_empty() {
        out.push_str(&collection);
        count += 1;
    }
    out.push_str(&subcollections);
    count
}
