use thiserror::Error;

use crate::model::{EntityKind, NodeKey};

pub type ModelResult<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("parent container not found: {0}")]
    ParentNotFound(NodeKey),
    #[error("entity not found: {0}")]
    NotFound(NodeKey),
    #[error("{0} cannot contain children")]
    NotAContainer(NodeKey),
    #[error("a {parent} cannot contain a {child}")]
    IllegalNesting { parent: EntityKind, child: EntityKind },
    #[error("no sort order left after {0}")]
    SortOrderOverflow(NodeKey),
}
