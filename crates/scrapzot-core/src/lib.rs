//! Core model for converting a Scrapbook archive.
//!
//! - [`archive`]: the on-disk archive layout (`scrapbook.rdf` + `data/<id>/`)
//! - [`node`]: typed tree nodes and title sanitizing
//! - [`tree`]: resolving the item map into a rooted tree, with orphan repair
//! - [`dedup`]: title dedup suffixes and tag chains used while exporting
//! - [`config`]: explicit export settings passed to every stage

pub mod archive;
pub mod config;
pub mod dedup;
pub mod error;
pub mod node;
pub mod tree;

pub use archive::{normalize_path, ScrapbookArchive};
pub use config::ExportConfig;
pub use dedup::{Deduper, TagChain};
pub use error::{ArchiveError, TreeError};
pub use node::{sanitize_title, Node, NodeId, NodeKind};
pub use tree::{build_tree, open_scrapbook, BuildStats, ScrapbookTree};
