use std::path::PathBuf;

/// Failures while listing or probing the archive's data directories.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("failed to list {}: {source}", path.display())]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Structural problems in the triple store. All of these abort the run.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("triple store has no root item (urn:scrapbook:root)")]
    MissingRoot,

    #[error("item '{id}' of type '{kind}' declares child items, only folders may")]
    ChildrenOnLeaf { id: String, kind: String },

    #[error("folder '{id}' contains itself")]
    CyclicFolder { id: String },

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Rdf(#[from] anyhow::Error),
}
