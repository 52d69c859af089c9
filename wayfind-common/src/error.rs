//! Error types for the wayfind toolkit
//!
//! Load and editor failures are reported through [`Error`]. Query-time
//! outcomes ("no route", bad endpoints) are not errors at this level; the
//! path engine models them as values.

use thiserror::Error;

/// Main error type for graph loading and editing
#[derive(Debug, Error)]
pub enum Error {
    /// Map data is malformed (missing field, bad number, unknown type, ...)
    #[error("Invalid map data: {0}")]
    InvalidData(String),

    /// A node with this id already exists
    #[error("Node '{0}' already exists")]
    DuplicateNode(String),

    /// No node with this id exists
    #[error("Node '{0}' not found")]
    UnknownNode(String),

    /// Edge rejected by the connection rules
    #[error("Cannot connect '{from}' and '{to}': {reason}")]
    InvalidLink {
        from: String,
        to: String,
        reason: &'static str,
    },

    /// No node lives on this floor
    #[error("Floor {0} does not exist")]
    UnknownFloor(u32),

    /// The building must keep at least one floor
    #[error("Cannot delete the last remaining floor")]
    LastFloor,

    /// File I/O error while reading a map document
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for [`Error::InvalidData`] built from anything printable
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidData(msg.into())
    }

    /// True for errors caused by the caller's input rather than the environment
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Error::Io(_))
    }
}

/// Convenience result type for wayfind operations
pub type Result<T> = std::result::Result<T, Error>;
