//! Error types for tree construction and path handling.

use std::path::PathBuf;

/// Errors produced while validating a filesystem path or a child name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path {path:?} is not absolute")]
    NotAbsolute { path: String },

    #[error("path {path:?} contains an empty segment")]
    EmptySegment { path: String },

    #[error("path {path:?} contains a '.' or '..' segment")]
    DotSegment { path: String },

    #[error("invalid entry name {name:?}: {message}")]
    InvalidName { name: String, message: String },
}

/// Lookup failures while walking the tree.
///
/// These are the only outcomes of resolving a well-formed path that does
/// not designate a node.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no such entry")]
    NotFound,

    #[error("not a directory")]
    NotADirectory,
}

/// Errors produced while building a tree or loading a tree definition.
#[derive(thiserror::Error, Debug)]
pub enum TreeError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("duplicate entry {name:?}")]
    DuplicateName { name: String },

    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("root of a tree definition must be a directory")]
    RootNotDirectory,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read tree definition {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
