//! Finds the pairs of segments that see each other along the compaction
//! direction. Ranges are closed intervals along the segments. All the
//! computations use doubled coordinates so that the middle of an interval is
//! always an integer.

/// A segment for the sweep: an id, the position along the compaction
/// direction and the range along the segment.
#[derive(Debug, Clone, Copy)]
pub struct SweepSegment<T> {
    pub id: T,
    pub pos: i64,
    pub range: (i64, i64),
}

/// Remove the closed interval \p cut from the sorted disjoint list of closed
/// intervals \p open.
fn subtract(open: &mut Vec<(i64, i64)>, cut: (i64, i64)) {
    let mut res = Vec::with_capacity(open.len() + 1);
    for (a, b) in open.iter().copied() {
        if cut.1 < a || cut.0 > b {
            res.push((a, b));
            continue;
        }
        if a < cut.0 {
            res.push((a, cut.0 - 1));
        }
        if cut.1 < b {
            res.push((cut.1 + 1, b));
        }
    }
    *open = res;
}

/// \returns the first part of \p open that overlaps \p range, clipped to
/// \p range.
fn first_overlap(open: &[(i64, i64)], range: (i64, i64)) -> Option<(i64, i64)> {
    open.iter()
        .map(|(a, b)| ((*a).max(range.0), (*b).min(range.1)))
        .find(|(a, b)| a <= b)
}

/// \returns the triples (s, t, key) such that the segment t lies in the
/// compaction direction from s and can be seen from s: some line along the
/// compaction direction that starts on s reaches t without touching any
/// segment in between. The key is the doubled coordinate of such a line.
pub fn visible_pairs<T: Copy>(segments: &[SweepSegment<T>]) -> Vec<(T, T, i64)> {
    let mut order: Vec<usize> = (0..segments.len()).collect();
    order.sort_by_key(|i| (segments[*i].pos, segments[*i].range.0));

    let mut res = Vec::new();
    for (oi, si) in order.iter().enumerate() {
        let s = &segments[*si];
        let mut open = vec![(2 * s.range.0, 2 * s.range.1)];
        for ti in order.iter().skip(oi + 1) {
            if open.is_empty() {
                break;
            }
            let t = &segments[*ti];
            if t.pos <= s.pos {
                continue;
            }
            let range = (2 * t.range.0, 2 * t.range.1);
            if let Some((a, b)) = first_overlap(&open, range) {
                res.push((s.id, t.id, (a + b) / 2));
                subtract(&mut open, range);
            }
        }
    }
    res
}

#[test]
fn test_subtract() {
    let mut open = vec![(0, 20)];
    subtract(&mut open, (4, 8));
    assert_eq!(open, vec![(0, 3), (9, 20)]);
    subtract(&mut open, (0, 10));
    assert_eq!(open, vec![(11, 20)]);
    subtract(&mut open, (11, 20));
    assert!(open.is_empty());
}

#[test]
fn test_visible_pairs() {
    // A tall segment on the left, two short ones in the middle and a tall
    // one on the right. The right one is only seen through the gap.
    let seg = |id, pos, lo, hi| SweepSegment {
        id,
        pos,
        range: (lo, hi),
    };
    let segments = vec![
        seg(0, 0, 0, 30),
        seg(1, 10, 0, 10),
        seg(2, 10, 20, 30),
        seg(3, 20, 0, 30),
    ];
    let pairs = visible_pairs(&segments);
    assert!(pairs.contains(&(0, 1, 10)));
    assert!(pairs.contains(&(0, 2, 50)));
    // Between 10 and 20 (doubled: 21..=39).
    assert!(pairs.contains(&(0, 3, 30)));
    assert!(pairs.contains(&(1, 3, 10)));
    assert!(pairs.contains(&(2, 3, 50)));
    assert_eq!(pairs.len(), 5);
}

#[test]
fn test_equal_positions_do_not_see_each_other() {
    let segments = vec![
        SweepSegment {
            id: 'a',
            pos: 5,
            range: (0, 10),
        },
        SweepSegment {
            id: 'b',
            pos: 5,
            range: (10, 20),
        },
    ];
    assert!(visible_pairs(&segments).is_empty());
}
