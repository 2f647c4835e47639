//! Minimum cost flow. The compaction passes describe their dual graphs as a
//! `FlowNetwork` and hand them to any `MinCostFlow` solver.

mod ssp;

pub use ssp::SuccessiveShortestPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowArc {
    pub from: usize,
    pub to: usize,
    pub lower: i64,
    pub upper: i64,
    pub cost: i64,
}

/// A directed network with bounds and costs on the arcs and a supply (or a
/// negative demand) on the nodes.
#[derive(Debug, Clone, Default)]
pub struct FlowNetwork {
    arcs: Vec<FlowArc>,
    supply: Vec<i64>,
}

impl FlowNetwork {
    pub fn new(num_nodes: usize) -> Self {
        FlowNetwork {
            arcs: Vec::new(),
            supply: vec![0; num_nodes],
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.supply.len()
    }

    /// Add an arc and \returns its index.
    pub fn add_arc(&mut self, from: usize, to: usize, lower: i64, upper: i64, cost: i64) -> usize {
        assert!(from < self.num_nodes() && to < self.num_nodes(), "Invalid arc");
        self.arcs.push(FlowArc {
            from,
            to,
            lower,
            upper,
            cost,
        });
        self.arcs.len() - 1
    }

    pub fn arcs(&self) -> &[FlowArc] {
        &self.arcs
    }

    pub fn set_supply(&mut self, v: usize, val: i64) {
        self.supply[v] = val;
    }

    pub fn supply(&self, v: usize) -> i64 {
        self.supply[v]
    }

    /// \returns the cost of the flow \p flow.
    pub fn cost_of(&self, flow: &[i64]) -> i64 {
        self.arcs
            .iter()
            .zip(flow.iter())
            .map(|(arc, f)| arc.cost * f)
            .sum()
    }

    /// \returns True if \p flow respects the bounds of every arc and the
    /// supply of every node.
    pub fn is_feasible(&self, flow: &[i64]) -> bool {
        if flow.len() != self.arcs.len() {
            return false;
        }
        let mut balance = self.supply.clone();
        for (arc, f) in self.arcs.iter().zip(flow.iter()) {
            if *f < arc.lower || *f > arc.upper {
                return false;
            }
            balance[arc.from] -= f;
            balance[arc.to] += f;
        }
        balance.iter().all(|b| *b == 0)
    }
}

/// A solver for the minimum cost flow problem.
pub trait MinCostFlow {
    /// \returns the value that stands for an unbounded capacity.
    fn infinity(&self) -> i64 {
        i64::MAX / 4
    }

    /// Find a feasible flow of minimum cost in \p network. \returns the flow
    /// on each arc, in the order of the arcs, or None if no feasible flow
    /// exists.
    fn call(&mut self, network: &FlowNetwork) -> Option<Vec<i64>>;
}
