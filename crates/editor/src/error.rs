use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the document pipeline. Every variant is recoverable: the caller
/// reports it and the in-memory state stays as it was before the call.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The file could not be opened or read.
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The serialized document could not be written.
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The content is not text. Malformed markup is never an error.
    #[error("{} is not an HTML document: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },
    /// Overwrite was requested before any document was opened.
    #[error("no HTML file is loaded")]
    NoDocument,
}

pub type EditorResult<T> = Result<T, EditorError>;
