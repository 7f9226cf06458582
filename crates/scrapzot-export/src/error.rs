use scrapzot_core::{ArchiveError, TreeError};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Item ids double as creation timestamps; anything else cannot be dated.
    #[error("item id '{id}' is not a YYYYMMDDHHMMSS timestamp: {source}")]
    MalformedTimestamp {
        id: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("failed to write output document: {0}")]
    Write(#[from] std::io::Error),
}
