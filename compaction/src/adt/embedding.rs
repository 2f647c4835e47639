//! A combinatorial embedding: a graph whose rotation system defines a planar
//! embedding, plus the faces of that embedding. The face to the right of an
//! adjacency entry is the face that is traversed when walking along the
//! entry's edge away from the entry's node. The angle between an entry and
//! its clockwise successor belongs to the right face of the entry.

use super::graph::handle;
use super::graph::{AdjEntry, EdgeHandle, Graph, NodeHandle};

handle!(FaceHandle);

#[derive(Debug, Clone)]
struct Face {
    first: Option<AdjEntry>,
    size: usize,
    alive: bool,
}

#[derive(Debug, Clone)]
pub struct CombinatorialEmbedding {
    graph: Graph,
    faces: Vec<Face>,
    // Indexed by adjacency entry.
    adj_face: Vec<FaceHandle>,
    num_faces: usize,
    external: Option<FaceHandle>,
}

impl CombinatorialEmbedding {
    /// Take ownership of \p graph, whose rotations must describe a planar
    /// embedding, and compute its faces.
    pub fn new(graph: Graph) -> Self {
        let mut ce = CombinatorialEmbedding {
            graph,
            faces: Vec::new(),
            adj_face: Vec::new(),
            num_faces: 0,
            external: None,
        };
        ce.compute_faces();
        ce
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// \returns the entry that follows \p adj on the boundary of its right
    /// face.
    pub fn face_cycle_succ(&self, adj: AdjEntry) -> AdjEntry {
        self.graph.cyclic_pred(adj.twin())
    }

    /// \returns the entry that precedes \p adj on the boundary of its right
    /// face.
    pub fn face_cycle_pred(&self, adj: AdjEntry) -> AdjEntry {
        self.graph.cyclic_succ(adj).twin()
    }

    /// Walk the boundary of every face and rebuild the face table.
    pub fn compute_faces(&mut self) {
        self.faces.clear();
        self.num_faces = 0;
        self.external = None;
        let cap = self.graph.adj_capacity();
        let mut assigned = vec![false; cap];
        self.adj_face = vec![FaceHandle::default(); cap];

        let edges: Vec<EdgeHandle> = self.graph.edges().collect();
        for e in edges {
            for start in [e.src_adj(), e.tgt_adj()] {
                if assigned[start.get_index()] {
                    continue;
                }
                let f = self.new_face(Some(start));
                let mut adj = start;
                loop {
                    assigned[adj.get_index()] = true;
                    self.adj_face[adj.get_index()] = f;
                    self.faces[f.get_index()].size += 1;
                    adj = self.face_cycle_succ(adj);
                    if adj == start {
                        break;
                    }
                }
            }
        }

        // A graph without edges still has the unbounded face.
        if self.num_faces == 0 && !self.graph.is_empty() {
            self.new_face(None);
        }
    }

    fn new_face(&mut self, first: Option<AdjEntry>) -> FaceHandle {
        self.faces.push(Face {
            first,
            size: 0,
            alive: true,
        });
        self.num_faces += 1;
        FaceHandle::new(self.faces.len() - 1)
    }

    fn grow_adj_table(&mut self) {
        let cap = self.graph.adj_capacity();
        if self.adj_face.len() < cap {
            self.adj_face.resize(cap, FaceHandle::default());
        }
    }

    /// Iterate over the live faces.
    pub fn faces(&self) -> impl Iterator<Item = FaceHandle> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.alive)
            .map(|(i, _)| FaceHandle::new(i))
    }

    pub fn num_faces(&self) -> usize {
        self.num_faces
    }

    /// \returns the size of arrays that are indexed by face handles.
    pub fn face_capacity(&self) -> usize {
        self.faces.len()
    }

    /// \returns the number of adjacency entries on the boundary of \p f.
    pub fn size(&self, f: FaceHandle) -> usize {
        self.faces[f.get_index()].size
    }

    pub fn first_adj(&self, f: FaceHandle) -> Option<AdjEntry> {
        self.faces[f.get_index()].first
    }

    /// \returns the boundary of \p f, in face cycle order.
    pub fn face_entries(&self, f: FaceHandle) -> Vec<AdjEntry> {
        let mut res = Vec::with_capacity(self.size(f));
        if let Some(first) = self.first_adj(f) {
            let mut adj = first;
            loop {
                res.push(adj);
                adj = self.face_cycle_succ(adj);
                if adj == first {
                    break;
                }
            }
        }
        res
    }

    pub fn right_face(&self, adj: AdjEntry) -> FaceHandle {
        self.adj_face[adj.get_index()]
    }

    pub fn left_face(&self, adj: AdjEntry) -> FaceHandle {
        self.adj_face[adj.twin().get_index()]
    }

    pub fn set_external_face(&mut self, f: FaceHandle) {
        assert!(self.faces[f.get_index()].alive, "Dead face");
        self.external = Some(f);
    }

    pub fn external_face(&self) -> Option<FaceHandle> {
        self.external
    }

    /// Relabel the boundary walk that starts at \p start with \p f.
    /// \returns the number of entries that were relabeled.
    fn relabel_cycle(&mut self, start: AdjEntry, f: FaceHandle) -> usize {
        let mut adj = start;
        let mut count = 0;
        loop {
            self.adj_face[adj.get_index()] = f;
            count += 1;
            adj = self.face_cycle_succ(adj);
            if adj == start {
                break;
            }
        }
        count
    }

    /// Subdivide \p e with a new node. \returns the new edge, which
    /// continues \p e towards its old target.
    pub fn split(&mut self, e: EdgeHandle) -> EdgeHandle {
        let f_left = self.right_face(e.src_adj());
        let f_right = self.right_face(e.tgt_adj());
        let e2 = self.graph.split(e);
        self.grow_adj_table();
        self.adj_face[e2.src_adj().get_index()] = f_left;
        self.adj_face[e2.tgt_adj().get_index()] = f_right;
        self.faces[f_left.get_index()].size += 1;
        self.faces[f_right.get_index()].size += 1;
        e2
    }

    /// Split the node of \p adj_first and \p adj_last; see
    /// `Graph::split_node`. \returns the new edge.
    pub fn split_node(&mut self, adj_first: AdjEntry, adj_last: AdjEntry) -> EdgeHandle {
        let f_src = self.right_face(adj_last);
        let f_tgt = self.right_face(self.graph.cyclic_pred(adj_first));
        let e = self.graph.split_node(adj_first, adj_last);
        self.grow_adj_table();
        self.adj_face[e.src_adj().get_index()] = f_src;
        self.adj_face[e.tgt_adj().get_index()] = f_tgt;
        self.faces[f_src.get_index()].size += 1;
        self.faces[f_tgt.get_index()].size += 1;
        e
    }

    /// Pick a new first entry for \p f if its current one is \p a or \p b.
    /// Must be called before the entries are removed.
    fn refresh_first(&mut self, f: FaceHandle, a: AdjEntry, b: AdjEntry) {
        let first = match self.faces[f.get_index()].first {
            Some(first) => first,
            None => return,
        };
        if first != a && first != b {
            return;
        }
        let mut adj = first;
        let mut replacement = None;
        loop {
            if adj != a && adj != b {
                replacement = Some(adj);
                break;
            }
            adj = self.face_cycle_succ(adj);
            if adj == first {
                break;
            }
        }
        self.faces[f.get_index()].first = replacement;
    }

    /// Contract \p e into its source. \returns the surviving node.
    pub fn contract(&mut self, e: EdgeHandle) -> NodeHandle {
        let (a, b) = (e.src_adj(), e.tgt_adj());
        let f1 = self.right_face(a);
        let f2 = self.right_face(b);
        self.refresh_first(f1, a, b);
        self.refresh_first(f2, a, b);
        self.faces[f1.get_index()].size -= 1;
        self.faces[f2.get_index()].size -= 1;
        self.graph.contract(e)
    }

    /// Insert a new edge from the node of \p adj_src to the node of
    /// \p adj_tgt, splitting their common face in two. The new entries are
    /// placed after \p adj_src and \p adj_tgt. \returns the new edge.
    pub fn split_face(&mut self, adj_src: AdjEntry, adj_tgt: AdjEntry) -> EdgeHandle {
        let f = self.right_face(adj_src);
        assert_eq!(f, self.right_face(adj_tgt), "Entries are not in one face");
        let old_size = self.size(f);

        let e = self.graph.new_edge_after(adj_src, adj_tgt);
        self.grow_adj_table();

        let f_new = self.new_face(Some(e.src_adj()));
        let new_size = self.relabel_cycle(e.src_adj(), f_new);
        self.faces[f_new.get_index()].size = new_size;

        self.adj_face[e.tgt_adj().get_index()] = f;
        self.faces[f.get_index()].first = Some(e.tgt_adj());
        self.faces[f.get_index()].size = old_size + 2 - new_size;
        e
    }

    /// Delete \p e and merge the two faces on its sides. \returns the
    /// merged face.
    pub fn join_faces(&mut self, e: EdgeHandle) -> FaceHandle {
        let (a, b) = (e.src_adj(), e.tgt_adj());
        let f1 = self.right_face(a);
        let f2 = self.right_face(b);
        assert_ne!(f1, f2, "The edge is a bridge");

        let size = self.size(f1) + self.size(f2) - 2;
        let first = self.face_cycle_succ(a);
        self.relabel_cycle(b, f1);
        self.graph.delete_edge(e);

        self.faces[f1.get_index()].first = Some(first);
        self.faces[f1.get_index()].size = size;
        self.faces[f2.get_index()].alive = false;
        self.faces[f2.get_index()].first = None;
        self.num_faces -= 1;
        if self.external == Some(f2) {
            self.external = Some(f1);
        }
        f1
    }

    /// Flip the direction of \p e without changing the faces.
    pub fn reverse_edge(&mut self, e: EdgeHandle) {
        let (a, b) = (e.src_adj(), e.tgt_adj());
        self.graph.reverse_edge(e);
        self.adj_face.swap(a.get_index(), b.get_index());
        for face in self.faces.iter_mut() {
            if face.first == Some(a) {
                face.first = Some(b);
            } else if face.first == Some(b) {
                face.first = Some(a);
            }
        }
    }

    /// \p adj_bridge is an entry of a bridge whose both sides lie in one
    /// face. Reattach the bridge end opposite to \p adj_bridge to the node of
    /// \p adj_before, right after it, so that the component hanging from the
    /// node of \p adj_bridge moves into the right face of \p adj_before.
    pub fn move_bridge(&mut self, adj_bridge: AdjEntry, adj_before: AdjEntry) {
        let f_old = self.right_face(adj_bridge);
        let f_new = self.right_face(adj_before);
        assert_eq!(f_old, self.left_face(adj_bridge), "Not a bridge");
        assert_ne!(f_old, f_new, "The bridge is already in the face");

        let cand = self.face_cycle_succ(adj_bridge);
        let mut moved = 0;
        let mut adj = adj_bridge.twin();
        while adj != cand {
            if self.faces[f_old.get_index()].first == Some(adj) {
                self.faces[f_old.get_index()].first = Some(cand);
            }
            self.adj_face[adj.get_index()] = f_new;
            moved += 1;
            adj = self.face_cycle_succ(adj);
        }
        self.faces[f_old.get_index()].size -= moved;
        self.faces[f_new.get_index()].size += moved;

        self.graph.move_adj_after(adj_bridge.twin(), adj_before);
    }

    /// Delete the degree one node \p v together with its edge.
    pub fn remove_deg1(&mut self, v: NodeHandle) {
        assert_eq!(self.graph.degree(v), 1, "Expected a node of degree one");
        let adj = match self.graph.first_adj(v) {
            Some(adj) => adj,
            None => return,
        };
        let f = self.right_face(adj);
        self.refresh_first(f, adj, adj.twin());
        self.faces[f.get_index()].size -= 2;
        self.graph.delete_node(v);
    }

    /// Find a face that is incident to both \p v and \p w. The faces are
    /// taken to the left of the entries when \p left is set. \returns the
    /// entry at \p v that borders the common face, and the face.
    pub fn find_common_face(
        &self,
        v: NodeHandle,
        w: NodeHandle,
        left: bool,
    ) -> Option<(AdjEntry, FaceHandle)> {
        assert_ne!(v, w, "Expected two different nodes");
        let face_of = |adj: AdjEntry| {
            if left {
                self.left_face(adj)
            } else {
                self.right_face(adj)
            }
        };

        let mut at_v: Vec<Option<AdjEntry>> = vec![None; self.faces.len()];
        for adj in self.graph.adj_entries(v) {
            at_v[face_of(adj).get_index()] = Some(adj);
        }
        for adj in self.graph.adj_entries(w) {
            let f = face_of(adj);
            if let Some(adj_v) = at_v[f.get_index()] {
                return Some((adj_v, f));
            }
        }
        None
    }

    /// Check that the face table agrees with the rotation system.
    pub fn verify(&self) {
        self.graph.verify();
        let mut seen = vec![false; self.graph.adj_capacity()];
        let mut num_faces = 0;
        for f in self.faces() {
            num_faces += 1;
            let entries = self.face_entries(f);
            assert_eq!(entries.len(), self.size(f), "Wrong face size");
            for adj in entries {
                assert_eq!(self.right_face(adj), f, "Entry in the wrong face");
                assert!(!seen[adj.get_index()], "Entry in two faces");
                seen[adj.get_index()] = true;
            }
        }
        assert_eq!(num_faces, self.num_faces);
        for e in self.graph.edges() {
            assert!(seen[e.src_adj().get_index()], "Entry without a face");
            assert!(seen[e.tgt_adj().get_index()], "Entry without a face");
        }
        if let Some(ext) = self.external {
            assert!(self.faces[ext.get_index()].alive, "Dead external face");
        }
    }
}

#[cfg(test)]
fn rand(x: &mut u64) -> u64 {
    *x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    *x >> 33
}

/// Build a w x h grid with a random diagonal in some of the cells, and
/// order the rotations by angle.
#[cfg(test)]
fn make_grid(w: usize, h: usize, seed: &mut u64) -> Graph {
    let mut g = Graph::new();
    let nodes = g.new_nodes(w * h);
    let pos = |i: usize| ((i % w) as f64, (i / w) as f64);
    let at = |x: usize, y: usize| nodes[y * w + x];
    for y in 0..h {
        for x in 0..w {
            if x + 1 < w {
                g.new_edge(at(x, y), at(x + 1, y));
            }
            if y + 1 < h {
                g.new_edge(at(x, y), at(x, y + 1));
            }
            if x + 1 < w && y + 1 < h {
                match rand(seed) % 3 {
                    0 => {
                        g.new_edge(at(x, y), at(x + 1, y + 1));
                    }
                    1 => {
                        g.new_edge(at(x + 1, y), at(x, y + 1));
                    }
                    _ => {}
                }
            }
        }
    }
    for v in nodes.iter() {
        let (x0, y0) = pos(v.get_index());
        let mut rot = g.adj_entries(*v);
        rot.sort_by(|a, b| {
            let angle = |adj: &AdjEntry| {
                let (x1, y1) = pos(g.twin_node(*adj).get_index());
                (y1 - y0).atan2(x1 - x0)
            };
            angle(a).partial_cmp(&angle(b)).unwrap()
        });
        g.set_rotation(*v, &rot);
    }
    g
}

#[test]
fn test_euler_formula() {
    let mut seed = 7;
    for (w, h) in [(2, 2), (3, 5), (6, 4), (8, 8)] {
        let g = make_grid(w, h, &mut seed);
        let n = g.num_nodes();
        let m = g.num_edges();
        let ce = CombinatorialEmbedding::new(g);
        ce.verify();
        assert_eq!(ce.num_faces(), m + 2 - n);
    }
}

#[test]
fn test_faces_of_a_square() {
    let mut g = Graph::new();
    let v = g.new_nodes(4);
    let e: Vec<EdgeHandle> = (0..4).map(|i| g.new_edge(v[i], v[(i + 1) % 4])).collect();
    let ce = CombinatorialEmbedding::new(g);
    ce.verify();
    assert_eq!(ce.num_faces(), 2);
    let inner = ce.right_face(e[0].src_adj());
    let outer = ce.left_face(e[0].src_adj());
    assert_ne!(inner, outer);
    for edge in e.iter() {
        assert_eq!(ce.right_face(edge.src_adj()), inner);
        assert_eq!(ce.right_face(edge.tgt_adj()), outer);
    }
    assert_eq!(ce.size(inner), 4);
    let adj = e[1].src_adj();
    assert_eq!(ce.face_cycle_pred(ce.face_cycle_succ(adj)), adj);

    let mut ce = ce;
    assert_eq!(ce.external_face(), None);
    ce.set_external_face(outer);
    assert_eq!(ce.external_face(), Some(outer));
    // Recomputing the faces forgets the choice.
    ce.compute_faces();
    assert_eq!(ce.external_face(), None);

    assert!(ce.find_common_face(v[0], v[2], false).is_some());
    let (adj, f) = ce.find_common_face(v[0], v[2], true).unwrap();
    assert_eq!(ce.graph().node_of(adj), v[0]);
    assert!(f == inner || f == outer);
}

#[test]
fn test_incremental_updates() {
    let mut seed = 42;
    let g = make_grid(5, 4, &mut seed);
    let mut ce = CombinatorialEmbedding::new(g);
    ce.verify();

    let edges: Vec<EdgeHandle> = ce.graph().edges().collect();

    // Subdivide a few edges.
    for e in edges.iter().step_by(5) {
        ce.split(*e);
        ce.verify();
    }

    // Split faces along a chord between two nodes of the same face.
    let faces: Vec<FaceHandle> = ce.faces().collect();
    for f in faces {
        let entries = ce.face_entries(f);
        if entries.len() >= 4 {
            let faces_before = ce.num_faces();
            ce.split_face(entries[0], entries[2]);
            ce.verify();
            assert_eq!(ce.num_faces(), faces_before + 1);
        }
    }

    // Join them back.
    let edges: Vec<EdgeHandle> = ce.graph().edges().collect();
    for e in edges.iter().step_by(3) {
        if ce.right_face(e.src_adj()) != ce.left_face(e.src_adj()) {
            ce.join_faces(*e);
            ce.verify();
        }
    }

    // Reverse and contract some of the edges that are left.
    let edges: Vec<EdgeHandle> = ce.graph().edges().collect();
    for e in edges.iter().step_by(4) {
        ce.reverse_edge(*e);
        ce.verify();
    }
    let edges: Vec<EdgeHandle> = ce.graph().edges().collect();
    for e in edges.iter().step_by(7) {
        if ce.graph().is_edge_alive(*e) && ce.graph().source(*e) != ce.graph().target(*e)
        {
            ce.contract(*e);
            ce.verify();
        }
    }

    let n = ce.graph().num_nodes() as isize;
    let m = ce.graph().num_edges() as isize;
    assert_eq!(ce.num_faces() as isize, m - n + 2);
}

#[test]
fn test_split_node_and_pendant_edges() {
    let mut seed = 3;
    let g = make_grid(3, 3, &mut seed);
    let mut ce = CombinatorialEmbedding::new(g);

    // The center node has degree four or more.
    let center = NodeHandle::new(4);
    let rot = ce.graph().adj_entries(center);
    let faces = ce.num_faces();
    ce.split_node(rot[0], rot[1]);
    ce.verify();
    assert_eq!(ce.num_faces(), faces);

    // Hang a path of two edges inside a face and move it to another face.
    let mut g = ce.into_graph();
    let base = g.node_of(rot[2]);
    let a = g.new_node();
    let b = g.new_node();
    let bridge = g.new_edge(base, a);
    g.move_adj_after(bridge.src_adj(), rot[2]);
    let tail = g.new_edge(a, b);
    let mut ce = CombinatorialEmbedding::new(g);
    ce.verify();
    assert_eq!(ce.right_face(bridge.src_adj()), ce.right_face(bridge.tgt_adj()));

    let target = ce
        .graph()
        .adj_entries(NodeHandle::new(0))
        .into_iter()
        .find(|adj| ce.right_face(*adj) != ce.right_face(bridge.src_adj()))
        .unwrap();
    ce.move_bridge(bridge.tgt_adj(), target);
    ce.verify();
    assert_eq!(ce.graph().source(bridge), NodeHandle::new(0));
    assert_eq!(ce.right_face(tail.src_adj()), ce.right_face(target));

    let faces = ce.num_faces();
    ce.remove_deg1(b);
    ce.verify();
    assert_eq!(ce.num_faces(), faces);
}
