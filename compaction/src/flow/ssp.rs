//! Minimum cost flow by successive shortest paths. The lower bounds are
//! saturated first. The imbalance that this creates is then routed along
//! shortest paths of the residual network, found with Dijkstra's algorithm
//! over reduced costs. All arc costs must be non-negative.

use super::{FlowNetwork, MinCostFlow};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

const UNREACHABLE: i64 = i64::MAX;

#[derive(Debug, Default)]
pub struct SuccessiveShortestPath {}

impl SuccessiveShortestPath {
    pub fn new() -> Self {
        SuccessiveShortestPath {}
    }
}

/// The residual network. Residual edge 2i is the forward copy of arc i and
/// 2i+1 is its backward copy.
struct Residual {
    head: Vec<usize>,
    cap: Vec<i64>,
    cost: Vec<i64>,
    out: Vec<Vec<usize>>,
}

impl Residual {
    fn new(network: &FlowNetwork, flow: &[i64], inf: i64) -> Self {
        let n = network.num_nodes();
        let m = network.arcs().len();
        let mut res = Residual {
            head: Vec::with_capacity(2 * m),
            cap: Vec::with_capacity(2 * m),
            cost: Vec::with_capacity(2 * m),
            out: vec![Vec::new(); n],
        };
        for (i, arc) in network.arcs().iter().enumerate() {
            let upper = arc.upper.min(inf);
            res.head.push(arc.to);
            res.cap.push(upper - flow[i]);
            res.cost.push(arc.cost);
            res.out[arc.from].push(2 * i);

            res.head.push(arc.from);
            res.cap.push(flow[i] - arc.lower);
            res.cost.push(-arc.cost);
            res.out[arc.to].push(2 * i + 1);
        }
        res
    }

    fn tail(&self, edge: usize) -> usize {
        self.head[edge ^ 1]
    }
}

impl MinCostFlow for SuccessiveShortestPath {
    fn call(&mut self, network: &FlowNetwork) -> Option<Vec<i64>> {
        let n = network.num_nodes();
        let inf = self.infinity();

        // Start with the lower bounds and record the imbalance they cause.
        let mut flow: Vec<i64> = Vec::with_capacity(network.arcs().len());
        let mut excess: Vec<i64> = (0..n).map(|v| network.supply(v)).collect();
        for arc in network.arcs() {
            assert!(arc.cost >= 0, "Negative arc costs are not supported");
            if arc.lower > arc.upper {
                return None;
            }
            flow.push(arc.lower);
            excess[arc.from] -= arc.lower;
            excess[arc.to] += arc.lower;
        }
        if excess.iter().sum::<i64>() != 0 {
            return None;
        }

        let mut res = Residual::new(network, &flow, inf);
        let mut potential = vec![0i64; n];
        let mut dist = vec![UNREACHABLE; n];
        let mut parent: Vec<Option<usize>> = vec![None; n];

        loop {
            if excess.iter().all(|e| *e <= 0) {
                break;
            }

            // Multi-source Dijkstra from every node with positive excess.
            dist.iter_mut().for_each(|d| *d = UNREACHABLE);
            parent.iter_mut().for_each(|p| *p = None);
            let mut heap = BinaryHeap::new();
            for v in 0..n {
                if excess[v] > 0 {
                    dist[v] = 0;
                    heap.push(Reverse((0, v)));
                }
            }
            while let Some(Reverse((d, u))) = heap.pop() {
                if d > dist[u] {
                    continue;
                }
                for &edge in res.out[u].iter() {
                    if res.cap[edge] <= 0 {
                        continue;
                    }
                    let v = res.head[edge];
                    let reduced = res.cost[edge] + potential[u] - potential[v];
                    debug_assert!(reduced >= 0, "Negative reduced cost");
                    let nd = d + reduced;
                    if nd < dist[v] {
                        dist[v] = nd;
                        parent[v] = Some(edge);
                        heap.push(Reverse((nd, v)));
                    }
                }
            }

            // Pick the closest node that still has a demand.
            let sink = (0..n)
                .filter(|v| excess[*v] < 0 && dist[*v] != UNREACHABLE)
                .min_by_key(|v| dist[*v]);
            let sink = match sink {
                Some(sink) => sink,
                None => return None,
            };
            let limit = dist[sink];
            for v in 0..n {
                potential[v] += dist[v].min(limit);
            }

            // Find the bottleneck of the path and push flow along it.
            let mut amount = -excess[sink];
            let mut v = sink;
            while let Some(edge) = parent[v] {
                amount = amount.min(res.cap[edge]);
                v = res.tail(edge);
            }
            let source = v;
            amount = amount.min(excess[source]);
            debug_assert!(amount > 0);

            let mut v = sink;
            while let Some(edge) = parent[v] {
                res.cap[edge] -= amount;
                res.cap[edge ^ 1] += amount;
                if edge % 2 == 0 {
                    flow[edge / 2] += amount;
                } else {
                    flow[edge / 2] -= amount;
                }
                v = res.tail(edge);
            }
            excess[source] -= amount;
            excess[sink] += amount;
        }

        Some(flow)
    }
}

#[test]
fn test_circulation_with_lower_bounds() {
    let mut net = FlowNetwork::new(2);
    let mut solver = SuccessiveShortestPath::new();
    let inf = solver.infinity();
    net.add_arc(0, 1, 2, 5, 1);
    net.add_arc(1, 0, 0, inf, 3);
    let flow = solver.call(&net).unwrap();
    assert_eq!(flow, vec![2, 2]);
    assert!(net.is_feasible(&flow));
    assert_eq!(net.cost_of(&flow), 8);
}

#[test]
fn test_cheapest_paths_first() {
    let mut net = FlowNetwork::new(3);
    let mut solver = SuccessiveShortestPath::new();
    let inf = solver.infinity();
    net.add_arc(0, 1, 0, 3, 1);
    net.add_arc(1, 2, 0, inf, 1);
    net.add_arc(0, 2, 0, inf, 5);
    net.set_supply(0, 4);
    net.set_supply(2, -4);
    let flow = solver.call(&net).unwrap();
    assert_eq!(flow, vec![3, 3, 1]);
    assert_eq!(net.cost_of(&flow), 11);
}

#[test]
fn test_rerouting_through_backward_arcs() {
    // The first path saturates 1->3 and the second path has to undo part
    // of it to reach the optimum.
    let mut net = FlowNetwork::new(4);
    let mut solver = SuccessiveShortestPath::new();
    net.add_arc(0, 1, 0, 1, 0);
    net.add_arc(0, 2, 0, 1, 2);
    net.add_arc(1, 3, 0, 1, 0);
    net.add_arc(1, 2, 0, 1, 0);
    net.add_arc(2, 3, 0, 1, 0);
    net.set_supply(0, 2);
    net.set_supply(3, -2);
    let flow = solver.call(&net).unwrap();
    assert!(net.is_feasible(&flow));
    assert_eq!(net.cost_of(&flow), 2);
}

#[test]
fn test_infeasible_networks() {
    let mut solver = SuccessiveShortestPath::new();

    // Flow has to leave node 0 but can't come back.
    let mut net = FlowNetwork::new(2);
    net.add_arc(0, 1, 1, 4, 1);
    assert_eq!(solver.call(&net), None);

    // Crossed bounds.
    let mut net = FlowNetwork::new(1);
    net.add_arc(0, 0, 3, 2, 0);
    assert_eq!(solver.call(&net), None);

    // A self loop stays at its lower bound.
    let mut net = FlowNetwork::new(1);
    net.add_arc(0, 0, 3, 9, 1);
    assert_eq!(solver.call(&net), Some(vec![3]));
}
