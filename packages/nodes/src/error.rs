//! Errors raised at the boundary between the host and the node types.
//!
//! None of these are caused by the text being relayed: a relay node accepts
//! every string. They signal that the host called a node in a way that does
//! not match its declared descriptor.

use thiserror::Error;

/// Errors returned when executing a node type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NodeError {
    #[error("unknown node type {0:?}")]
    UnknownNodeType(String),

    #[error("missing required input {0:?}")]
    MissingInput(String),

    #[error("input {name:?} must be a string, got {found}")]
    InvalidInputType { name: String, found: &'static str },
}

/// Errors returned when building a [`NodeRegistry`](crate::NodeRegistry).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("node type identifier must not be empty")]
    EmptyIdentifier,

    #[error("node type {0:?} is already registered")]
    DuplicateIdentifier(String),

    #[error("display name for node type {0:?} must not be empty")]
    EmptyDisplayName(String),
}
