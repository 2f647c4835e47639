//! Abstract data types: the graph carrier and its planar embedding.

pub mod embedding;
pub mod graph;

pub use embedding::{CombinatorialEmbedding, FaceHandle};
pub use graph::{AdjEntry, EdgeHandle, Graph, NodeHandle};
