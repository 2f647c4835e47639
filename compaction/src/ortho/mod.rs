//! The inputs of the compaction passes: the planarized drawing, its
//! orthogonal representation, the grid coordinates and the distance rules.

pub mod builder;
pub mod distances;
pub mod grid;
pub mod ortho_rep;
pub mod plan_rep;

pub use builder::{Drawing, EdgeSpec, OrthoDrawing, VertexSpec};
pub use distances::{EdgeDistances, MinimumEdgeDistances, RoutingChannel};
pub use grid::GridLayout;
pub use ortho_rep::OrthoRep;
pub use plan_rep::{Corner, EdgeKind, NodeKind, PlanRep};
