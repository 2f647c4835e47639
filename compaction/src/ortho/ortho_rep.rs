//! The orthogonal representation: the compass direction in which every
//! adjacency entry leaves its node. The directions are fixed when a drawing
//! is built and stay valid while compaction moves the nodes, even when an
//! edge shrinks to zero length.

use crate::adt::{AdjEntry, Graph};
use crate::core::base::OrthoDir;
use crate::ortho::grid::GridLayout;

#[derive(Debug, Clone)]
pub struct OrthoRep {
    dirs: Vec<Option<OrthoDir>>,
}

impl OrthoRep {
    /// Create a representation without directions for \p graph.
    pub fn new(graph: &Graph) -> Self {
        OrthoRep {
            dirs: vec![None; graph.adj_capacity()],
        }
    }

    /// Derive the directions from the coordinates in \p layout. Edges of
    /// length zero, and edges that are not axis parallel, get no direction.
    pub fn from_layout(graph: &Graph, layout: &GridLayout) -> Self {
        let mut rep = OrthoRep::new(graph);
        for e in graph.edges() {
            let from = layout.point(graph.source(e));
            let to = layout.point(graph.target(e));
            if let Some(dir) = from.dir_to(to) {
                rep.set_direction(e.src_adj(), dir);
            }
        }
        rep
    }

    /// Set the direction of \p adj, and the opposite direction for its
    /// twin.
    pub fn set_direction(&mut self, adj: AdjEntry, dir: OrthoDir) {
        self.dirs[adj.get_index()] = Some(dir);
        self.dirs[adj.twin().get_index()] = Some(dir.opposite());
    }

    pub fn direction(&self, adj: AdjEntry) -> OrthoDir {
        match self.dirs[adj.get_index()] {
            Some(dir) => dir,
            None => panic!("No direction for {}", adj),
        }
    }

    pub fn try_direction(&self, adj: AdjEntry) -> Option<OrthoDir> {
        self.dirs.get(adj.get_index()).copied().flatten()
    }

    /// \returns True if every entry of \p graph has a direction, the two
    /// entries of every edge point in opposite directions and the rotation
    /// of every node lists distinct directions in clockwise order.
    pub fn is_orientated(&self, graph: &Graph) -> bool {
        for e in graph.edges() {
            match (
                self.try_direction(e.src_adj()),
                self.try_direction(e.tgt_adj()),
            ) {
                (Some(a), Some(b)) if a.opposite() == b => {}
                _ => return false,
            }
        }

        for v in graph.nodes() {
            let ranks: Vec<usize> = graph
                .adj_entries(v)
                .iter()
                .map(|adj| self.direction(*adj).rank())
                .collect();
            if ranks.len() > 4 {
                return false;
            }
            // Clockwise order means at most one descent in the cyclic
            // sequence of ranks, and no repeats.
            let n = ranks.len();
            let mut descents = 0;
            for i in 0..n {
                let a = ranks[i];
                let b = ranks[(i + 1) % n];
                if a == b && n > 1 {
                    return false;
                }
                if b < a {
                    descents += 1;
                }
            }
            if n > 1 && descents != 1 {
                return false;
            }
        }
        true
    }
}

#[test]
fn test_orientation() {
    use crate::adt::NodeHandle;
    use crate::core::geometry::GridPoint;

    // A plus shape: the center has four neighbors.
    let mut g = Graph::new();
    let c = g.new_node();
    let arms = g.new_nodes(4);
    let mut layout = GridLayout::new(5);
    layout.set(c, GridPoint::new(0, 0));
    let pos = [(10, 0), (0, 10), (-10, 0), (0, -10)];
    for (v, p) in arms.iter().zip(pos.iter()) {
        layout.set(*v, GridPoint::new(p.0, p.1));
        g.new_edge(c, *v);
    }

    // E, S, W, N is clockwise.
    let rep = OrthoRep::from_layout(&g, &layout);
    assert!(rep.is_orientated(&g));
    let first = g.first_adj(c).unwrap();
    assert_eq!(rep.direction(first), OrthoDir::East);
    assert_eq!(rep.direction(first.twin()), OrthoDir::West);

    // Swapping two entries breaks the clockwise order.
    let rot = g.adj_entries(c);
    g.set_rotation(c, &[rot[1], rot[0], rot[2], rot[3]]);
    assert!(!rep.is_orientated(&g));

    // Starting the cycle elsewhere is fine.
    g.set_rotation(c, &[rot[2], rot[3], rot[0], rot[1]]);
    assert!(rep.is_orientated(&g));
    assert_eq!(g.degree(NodeHandle::new(0)), 4);
}
