//! The compaction passes: the constraint graph of one axis, the flow based
//! solver and the driver that alternates between the axes.

pub mod constraint_graph;
pub mod flow_compaction;
pub mod trace;
pub mod verifier;
mod visibility;

pub use constraint_graph::{ArcKind, ConstraintGraph};
pub use flow_compaction::{CompactionOptions, FlowCompaction};
pub use trace::{CostLog, RoundObserver, SvgTrace};
