//! Error types for reftable-core

use thiserror::Error;

use crate::model::NodeKey;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// A key no longer resolves to a document in the snapshot.
    #[error("no document for path {0}")]
    UnresolvedNode(NodeKey),

    #[error("invalid link direction {0:?}, expected front, back or both")]
    InvalidDirection(String),
}

pub type Result<T> = std::result::Result<T, TableError>;
