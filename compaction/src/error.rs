//! Errors that are reported when a drawing is read or validated. Problems
//! inside the compaction passes are invariant violations and panic instead.

use crate::core::base::OrthoDir;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{msg} (at offset {pos})")]
    Parse { pos: usize, msg: String },
    #[error("vertex `{0}` is defined more than once")]
    DuplicateVertex(String),
    #[error("unknown vertex `{0}`")]
    UnknownVertex(String),
    #[error("vertex `{0}` must have a positive width and height")]
    InvalidSize(String),
    #[error("vertices `{0}` and `{1}` overlap")]
    OverlappingVertices(String, String),
    #[error("edge {0} has fewer than two distinct points")]
    DegenerateEdge(String),
    #[error("edge {0} has a piece that is not horizontal or vertical, or turns back")]
    NotOrthogonal(String),
    #[error("edge {0} does not leave and enter its vertices through a side")]
    PortNotOnBorder(String),
    #[error("edge {0} touches vertex `{1}`")]
    EdgeThroughVertex(String, String),
    #[error("edges {0} and {1} overlap or touch")]
    OverlappingEdges(String, String),
    #[error("the drawing is not connected")]
    Disconnected,
    #[error("side {1} of vertex `{0}` is too small for its ports")]
    VertexTooSmall(String, OrthoDir),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
