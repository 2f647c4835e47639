//! This module implements the directed multigraph that carries all of the
//! other data structures in the crate. Nodes and edges live in arenas and are
//! addressed by small index handles. Every edge owns two adjacency entries,
//! one at the source and one at the target, and every node keeps its entries
//! in a cyclic order. When the graph is embedded, the cyclic order is the
//! clockwise order of the edges around the node (in screen coordinates, where
//! y grows downwards).

macro_rules! handle {
    ($name:ident) => {
        #[derive(Copy, Clone, Default, PartialEq, PartialOrd, Eq, Ord, Hash, Debug)]
        pub struct $name {
            idx: usize,
        }

        impl $name {
            pub fn new(x: usize) -> Self {
                $name { idx: x }
            }
            pub fn get_index(&self) -> usize {
                self.idx
            }
        }

        impl From<usize> for $name {
            fn from(idx: usize) -> Self {
                $name { idx }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.idx)
            }
        }
    };
}

pub(crate) use handle;

handle!(NodeHandle);
handle!(EdgeHandle);
handle!(AdjEntry);

impl EdgeHandle {
    /// \returns the adjacency entry of the edge at its source node.
    pub fn src_adj(&self) -> AdjEntry {
        AdjEntry::new(self.idx * 2)
    }
    /// \returns the adjacency entry of the edge at its target node.
    pub fn tgt_adj(&self) -> AdjEntry {
        AdjEntry::new(self.idx * 2 + 1)
    }
}

impl AdjEntry {
    /// \returns the edge that owns this entry.
    pub fn edge(&self) -> EdgeHandle {
        EdgeHandle::new(self.idx / 2)
    }
    /// \returns the entry on the other end of the same edge.
    pub fn twin(&self) -> AdjEntry {
        AdjEntry::new(self.idx ^ 1)
    }
    /// \returns True if this entry sits at the source of its edge.
    pub fn is_source(&self) -> bool {
        self.idx % 2 == 0
    }
}

#[derive(Debug, Clone)]
struct Node {
    first: Option<AdjEntry>,
    degree: usize,
    alive: bool,
}

#[derive(Debug, Clone)]
struct Edge {
    source: NodeHandle,
    target: NodeHandle,
    alive: bool,
}

/// The graph. Deleted nodes and edges leave holes in the arenas, so handles
/// stay valid for the lifetime of the graph and arrays indexed by handles
/// can be sized with the `*_capacity` methods.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    // Per adjacency entry: the node that owns it and the rotation links.
    adj_node: Vec<NodeHandle>,
    adj_next: Vec<AdjEntry>,
    adj_prev: Vec<AdjEntry>,
    num_nodes: usize,
    num_edges: usize,
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn is_empty(&self) -> bool {
        self.num_nodes == 0
    }

    /// \returns the size of arrays that are indexed by node handles.
    pub fn node_capacity(&self) -> usize {
        self.nodes.len()
    }

    /// \returns the size of arrays that are indexed by edge handles.
    pub fn edge_capacity(&self) -> usize {
        self.edges.len()
    }

    /// \returns the size of arrays that are indexed by adjacency entries.
    pub fn adj_capacity(&self) -> usize {
        self.edges.len() * 2
    }

    pub fn is_node_alive(&self, v: NodeHandle) -> bool {
        v.idx < self.nodes.len() && self.nodes[v.idx].alive
    }

    pub fn is_edge_alive(&self, e: EdgeHandle) -> bool {
        e.idx < self.edges.len() && self.edges[e.idx].alive
    }

    /// Iterate over the live nodes, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.alive)
            .map(|(i, _)| NodeHandle::new(i))
    }

    /// Iterate over the live edges, in creation order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeHandle> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.alive)
            .map(|(i, _)| EdgeHandle::new(i))
    }

    pub fn source(&self, e: EdgeHandle) -> NodeHandle {
        self.edges[e.idx].source
    }

    pub fn target(&self, e: EdgeHandle) -> NodeHandle {
        self.edges[e.idx].target
    }

    /// \returns the endpoint of \p e that is not \p v.
    pub fn opposite(&self, e: EdgeHandle, v: NodeHandle) -> NodeHandle {
        let edge = &self.edges[e.idx];
        if edge.source == v {
            edge.target
        } else {
            assert_eq!(edge.target, v, "Node is not an endpoint of the edge");
            edge.source
        }
    }

    /// \returns the node that owns the adjacency entry \p adj.
    pub fn node_of(&self, adj: AdjEntry) -> NodeHandle {
        self.adj_node[adj.idx]
    }

    /// \returns the node on the other end of the adjacency entry \p adj.
    pub fn twin_node(&self, adj: AdjEntry) -> NodeHandle {
        self.adj_node[adj.twin().idx]
    }

    pub fn degree(&self, v: NodeHandle) -> usize {
        self.nodes[v.idx].degree
    }

    pub fn outdeg(&self, v: NodeHandle) -> usize {
        self.adj_entries(v).iter().filter(|a| a.is_source()).count()
    }

    pub fn indeg(&self, v: NodeHandle) -> usize {
        self.adj_entries(v).iter().filter(|a| !a.is_source()).count()
    }

    pub fn first_adj(&self, v: NodeHandle) -> Option<AdjEntry> {
        self.nodes[v.idx].first
    }

    /// \returns the entry that follows \p adj in the rotation of its node.
    pub fn cyclic_succ(&self, adj: AdjEntry) -> AdjEntry {
        self.adj_next[adj.idx]
    }

    /// \returns the entry that precedes \p adj in the rotation of its node.
    pub fn cyclic_pred(&self, adj: AdjEntry) -> AdjEntry {
        self.adj_prev[adj.idx]
    }

    /// \returns the rotation of \p v, starting at its first entry.
    pub fn adj_entries(&self, v: NodeHandle) -> Vec<AdjEntry> {
        let mut res = Vec::with_capacity(self.nodes[v.idx].degree);
        if let Some(first) = self.nodes[v.idx].first {
            let mut curr = first;
            loop {
                res.push(curr);
                curr = self.adj_next[curr.idx];
                if curr == first {
                    break;
                }
            }
        }
        res
    }

    /// Create a new node.
    pub fn new_node(&mut self) -> NodeHandle {
        self.nodes.push(Node {
            first: None,
            degree: 0,
            alive: true,
        });
        self.num_nodes += 1;
        NodeHandle::new(self.nodes.len() - 1)
    }

    /// Create \p n new nodes.
    pub fn new_nodes(&mut self, n: usize) -> Vec<NodeHandle> {
        (0..n).map(|_| self.new_node()).collect()
    }

    fn alloc_edge(&mut self, source: NodeHandle, target: NodeHandle) -> EdgeHandle {
        assert!(self.is_node_alive(source), "Invalid source node");
        assert!(self.is_node_alive(target), "Invalid target node");
        let e = EdgeHandle::new(self.edges.len());
        self.edges.push(Edge {
            source,
            target,
            alive: true,
        });
        self.adj_node.push(source);
        self.adj_node.push(target);
        self.adj_next.push(e.src_adj());
        self.adj_next.push(e.tgt_adj());
        self.adj_prev.push(e.src_adj());
        self.adj_prev.push(e.tgt_adj());
        self.num_edges += 1;
        e
    }

    /// Add an edge from \p from to \p to. The new entries are placed at the
    /// end of the rotations of both nodes.
    pub fn new_edge(&mut self, from: NodeHandle, to: NodeHandle) -> EdgeHandle {
        let e = self.alloc_edge(from, to);
        let last_src = self.nodes[from.idx].first.map(|f| self.adj_prev[f.idx]);
        self.link_after(from, e.src_adj(), last_src);
        let last_tgt = self.nodes[to.idx].first.map(|f| self.adj_prev[f.idx]);
        self.link_after(to, e.tgt_adj(), last_tgt);
        e
    }

    /// Add an edge from the node of \p adj_src to the node of \p adj_tgt. The
    /// new entries are placed right after \p adj_src and \p adj_tgt.
    pub fn new_edge_after(
        &mut self,
        adj_src: AdjEntry,
        adj_tgt: AdjEntry,
    ) -> EdgeHandle {
        let from = self.node_of(adj_src);
        let to = self.node_of(adj_tgt);
        let e = self.alloc_edge(from, to);
        self.link_after(from, e.src_adj(), Some(adj_src));
        self.link_after(to, e.tgt_adj(), Some(adj_tgt));
        e
    }

    /// Insert \p adj into the rotation of \p v after \p after, or as the only
    /// entry of an empty rotation.
    fn link_after(&mut self, v: NodeHandle, adj: AdjEntry, after: Option<AdjEntry>) {
        self.adj_node[adj.idx] = v;
        match after {
            None => {
                assert!(self.nodes[v.idx].first.is_none(), "Rotation is not empty");
                self.adj_next[adj.idx] = adj;
                self.adj_prev[adj.idx] = adj;
                self.nodes[v.idx].first = Some(adj);
            }
            Some(after) => {
                debug_assert_eq!(self.adj_node[after.idx], v);
                let next = self.adj_next[after.idx];
                self.adj_next[after.idx] = adj;
                self.adj_prev[next.idx] = adj;
                self.adj_prev[adj.idx] = after;
                self.adj_next[adj.idx] = next;
            }
        }
        self.nodes[v.idx].degree += 1;
    }

    /// Remove \p adj from the rotation of its node.
    fn unlink(&mut self, adj: AdjEntry) {
        let v = self.adj_node[adj.idx];
        let next = self.adj_next[adj.idx];
        let prev = self.adj_prev[adj.idx];
        if next == adj {
            self.nodes[v.idx].first = None;
        } else {
            self.adj_next[prev.idx] = next;
            self.adj_prev[next.idx] = prev;
            if self.nodes[v.idx].first == Some(adj) {
                self.nodes[v.idx].first = Some(next);
            }
        }
        self.adj_next[adj.idx] = adj;
        self.adj_prev[adj.idx] = adj;
        self.nodes[v.idx].degree -= 1;
    }

    /// Install \p order as the rotation of \p v. The list must be a
    /// permutation of the entries that are already attached to \p v, or of
    /// entries that are moved to \p v by the caller.
    pub fn set_rotation(&mut self, v: NodeHandle, order: &[AdjEntry]) {
        let n = order.len();
        for (i, adj) in order.iter().enumerate() {
            self.adj_node[adj.idx] = v;
            self.adj_next[adj.idx] = order[(i + 1) % n];
            self.adj_prev[adj.idx] = order[(i + n - 1) % n];
        }
        self.nodes[v.idx].first = order.first().copied();
        self.nodes[v.idx].degree = n;
    }

    /// Move \p adj so that it follows \p after in the rotation of the node
    /// of \p after. If the nodes differ, the edge of \p adj is reattached:
    /// its endpoint moves to the node of \p after.
    pub fn move_adj_after(&mut self, adj: AdjEntry, after: AdjEntry) {
        if adj == after {
            return;
        }
        let v = self.node_of(after);
        self.unlink(adj);
        self.link_after(v, adj, Some(after));
        let edge = &mut self.edges[adj.edge().idx];
        if adj.is_source() {
            edge.source = v;
        } else {
            edge.target = v;
        }
    }

    /// Delete the edge \p e.
    pub fn delete_edge(&mut self, e: EdgeHandle) {
        assert!(self.is_edge_alive(e), "Deleting a dead edge");
        self.unlink(e.src_adj());
        self.unlink(e.tgt_adj());
        self.edges[e.idx].alive = false;
        self.num_edges -= 1;
    }

    /// Delete the node \p v and all of its incident edges.
    pub fn delete_node(&mut self, v: NodeHandle) {
        assert!(self.is_node_alive(v), "Deleting a dead node");
        for adj in self.adj_entries(v) {
            if self.is_edge_alive(adj.edge()) {
                self.delete_edge(adj.edge());
            }
        }
        self.nodes[v.idx].alive = false;
        self.num_nodes -= 1;
    }

    /// Subdivide the edge \p e = (v, w) with a new node u. The edge \p e
    /// becomes (v, u) and the returned edge is (u, w). The new edge takes
    /// the place of \p e in the rotation of w.
    pub fn split(&mut self, e: EdgeHandle) -> EdgeHandle {
        let w = self.target(e);
        let u = self.new_node();
        let e2 = self.alloc_edge(u, w);

        // The target entry of e2 takes the slot of e's target entry at w.
        let old = e.tgt_adj();
        let new = e2.tgt_adj();
        let next = self.adj_next[old.idx];
        let prev = self.adj_prev[old.idx];
        if next == old {
            self.adj_next[new.idx] = new;
            self.adj_prev[new.idx] = new;
        } else {
            self.adj_next[prev.idx] = new;
            self.adj_prev[next.idx] = new;
            self.adj_next[new.idx] = next;
            self.adj_prev[new.idx] = prev;
        }
        if self.nodes[w.idx].first == Some(old) {
            self.nodes[w.idx].first = Some(new);
        }

        // The old target entry moves to u.
        self.edges[e.idx].target = u;
        self.set_rotation(u, &[old, e2.src_adj()]);
        e2
    }

    /// Contract the edge \p e = (v, w) into v. The entries of w replace the
    /// entry of \p e in the rotation of v, in their cyclic order starting
    /// after the entry of \p e at w. \returns v.
    pub fn contract(&mut self, e: EdgeHandle) -> NodeHandle {
        let v = self.source(e);
        let w = self.target(e);
        assert_ne!(v, w, "Can't contract a self loop");

        let rot_v = self.adj_entries(v);
        let rot_w = self.adj_entries(w);
        let at_v = position_in(&rot_v, e.src_adj());
        let at_w = position_in(&rot_w, e.tgt_adj());

        let mut order: Vec<AdjEntry> = Vec::new();
        order.extend_from_slice(&rot_v[..at_v]);
        for i in 1..rot_w.len() {
            order.push(rot_w[(at_w + i) % rot_w.len()]);
        }
        order.extend_from_slice(&rot_v[at_v + 1..]);

        for adj in order.iter() {
            let edge = &mut self.edges[adj.edge().idx];
            if adj.is_source() {
                edge.source = v;
            } else {
                edge.target = v;
            }
        }

        self.edges[e.idx].alive = false;
        self.num_edges -= 1;
        self.nodes[w.idx].first = None;
        self.nodes[w.idx].degree = 0;
        self.nodes[w.idx].alive = false;
        self.num_nodes -= 1;
        self.set_rotation(v, &order);
        v
    }

    /// Split the node v that owns \p adj_first and \p adj_last. The entries
    /// from \p adj_first to \p adj_last (clockwise, inclusive) move to a new
    /// node u, and a new edge (v, u) takes their place at v.
    /// \returns the new edge.
    pub fn split_node(&mut self, adj_first: AdjEntry, adj_last: AdjEntry) -> EdgeHandle {
        let v = self.node_of(adj_first);
        assert_eq!(v, self.node_of(adj_last), "Entries must share a node");
        let rot = self.adj_entries(v);
        let start = position_in(&rot, adj_first);
        let n = rot.len();

        let mut block = Vec::new();
        let mut rest = Vec::new();
        let mut in_block = true;
        for i in 0..n {
            let adj = rot[(start + i) % n];
            if in_block {
                block.push(adj);
                if adj == adj_last {
                    in_block = false;
                }
            } else {
                rest.push(adj);
            }
        }

        let u = self.new_node();
        let e = self.alloc_edge(v, u);
        for adj in block.iter() {
            let edge = &mut self.edges[adj.edge().idx];
            if adj.is_source() {
                edge.source = u;
            } else {
                edge.target = u;
            }
        }
        rest.push(e.src_adj());
        block.push(e.tgt_adj());
        self.set_rotation(v, &rest);
        self.set_rotation(u, &block);
        e
    }

    /// Flip the direction of \p e. Each node keeps the geometric position of
    /// the edge in its rotation.
    pub fn reverse_edge(&mut self, e: EdgeHandle) {
        let v = self.source(e);
        let w = self.target(e);
        let (a, b) = (e.src_adj(), e.tgt_adj());
        let swap = |x: AdjEntry| {
            if x == a {
                b
            } else if x == b {
                a
            } else {
                x
            }
        };
        let rot_v: Vec<AdjEntry> = self.adj_entries(v).into_iter().map(swap).collect();
        if v == w {
            self.set_rotation(v, &rot_v);
        } else {
            let rot_w: Vec<AdjEntry> =
                self.adj_entries(w).into_iter().map(swap).collect();
            self.set_rotation(v, &rot_v);
            self.set_rotation(w, &rot_w);
        }
        let edge = &mut self.edges[e.idx];
        std::mem::swap(&mut edge.source, &mut edge.target);
    }

    /// \returns True if all of the live nodes for which \p include returns
    /// True are in one connected component (ignoring edge directions).
    pub fn is_connected_by<F: Fn(NodeHandle) -> bool>(&self, include: F) -> bool {
        let mut visited = vec![false; self.nodes.len()];
        let start = match self.nodes().find(|v| include(*v)) {
            Some(v) => v,
            None => return true,
        };

        let mut worklist = vec![start];
        visited[start.idx] = true;
        while let Some(v) = worklist.pop() {
            for adj in self.adj_entries(v) {
                let w = self.twin_node(adj);
                if !visited[w.idx] {
                    visited[w.idx] = true;
                    worklist.push(w);
                }
            }
        }

        self.nodes().filter(|v| include(*v)).all(|v| visited[v.idx])
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected_by(|_| true)
    }

    /// Check the internal links of the graph.
    pub fn verify(&self) {
        for v in self.nodes() {
            let rot = self.adj_entries(v);
            assert_eq!(rot.len(), self.nodes[v.idx].degree, "Bad degree");
            for adj in rot {
                assert_eq!(self.adj_node[adj.idx], v, "Entry in the wrong node");
                assert!(self.is_edge_alive(adj.edge()), "Dead edge in rotation");
                assert_eq!(self.adj_prev[self.adj_next[adj.idx].idx], adj);
            }
        }
        for e in self.edges() {
            assert_eq!(self.node_of(e.src_adj()), self.source(e));
            assert_eq!(self.node_of(e.tgt_adj()), self.target(e));
        }
    }
}

/// \returns the index of \p adj in the rotation \p rot.
fn position_in(rot: &[AdjEntry], adj: AdjEntry) -> usize {
    match rot.iter().position(|a| *a == adj) {
        Some(i) => i,
        None => panic!("Entry {} is not in the rotation", adj.get_index()),
    }
}

#[test]
fn test_simple_construction() {
    let mut g = Graph::new();
    let v = g.new_nodes(3);
    let e0 = g.new_edge(v[0], v[1]);
    let e1 = g.new_edge(v[1], v[2]);
    let e2 = g.new_edge(v[0], v[2]);
    g.verify();

    assert_eq!(g.num_nodes(), 3);
    assert_eq!(g.num_edges(), 3);
    assert_eq!(g.degree(v[0]), 2);
    assert_eq!(g.outdeg(v[0]), 2);
    assert_eq!(g.indeg(v[2]), 2);
    assert_eq!(g.opposite(e1, v[2]), v[1]);
    assert_eq!(g.adj_entries(v[0]), vec![e0.src_adj(), e2.src_adj()]);
    assert_eq!(g.cyclic_succ(e2.src_adj()), e0.src_adj());
    assert!(g.is_connected());

    g.delete_edge(e1);
    g.verify();
    assert_eq!(g.num_edges(), 2);
    assert_eq!(g.degree(v[1]), 1);
}

#[test]
fn test_split_and_contract() {
    let mut g = Graph::new();
    let v = g.new_nodes(4);
    let e = g.new_edge(v[0], v[1]);
    let a = g.new_edge(v[1], v[2]);
    let b = g.new_edge(v[3], v[1]);
    g.verify();

    // The rotation at v1 is [e, a, b].
    let e2 = g.split(e);
    g.verify();
    let u = g.target(e);
    assert_eq!(g.source(e2), u);
    assert_eq!(g.target(e2), v[1]);
    assert_eq!(
        g.adj_entries(v[1]),
        vec![e2.tgt_adj(), a.src_adj(), b.tgt_adj()]
    );

    let survivor = g.contract(e2);
    g.verify();
    assert_eq!(survivor, u);
    assert!(!g.is_node_alive(v[1]));
    // The entries of v1 replaced the contracted edge, in order.
    assert_eq!(
        g.adj_entries(u),
        vec![e.tgt_adj(), a.src_adj(), b.tgt_adj()]
    );
    assert_eq!(g.source(a), u);
    assert_eq!(g.target(b), u);
}

#[test]
fn test_split_node_and_reverse() {
    let mut g = Graph::new();
    let v = g.new_nodes(5);
    let es: Vec<EdgeHandle> = (1..5).map(|i| g.new_edge(v[0], v[i])).collect();

    let e = g.split_node(es[1].src_adj(), es[2].src_adj());
    g.verify();
    let u = g.target(e);
    assert_eq!(
        g.adj_entries(v[0]),
        vec![es[3].src_adj(), es[0].src_adj(), e.src_adj()]
    );
    assert_eq!(
        g.adj_entries(u),
        vec![es[1].src_adj(), es[2].src_adj(), e.tgt_adj()]
    );

    g.reverse_edge(es[0]);
    g.verify();
    assert_eq!(g.source(es[0]), v[1]);
    assert_eq!(g.target(es[0]), v[0]);
    assert_eq!(
        g.adj_entries(v[0]),
        vec![es[3].src_adj(), es[0].tgt_adj(), e.src_adj()]
    );
}
