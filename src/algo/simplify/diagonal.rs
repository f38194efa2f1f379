//! Quad diagonals and their collapse order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use nalgebra::Point3;

use crate::maths::distance;
use crate::mesh::{FaceId, HalfEdgeMesh, MeshIndex, VertexId};

/// The shorter diagonal of a quad, as a collapse candidate.
///
/// Collapsing moves `v1` to the diagonal midpoint and merges `v2` into it.
#[derive(Debug, Clone, Copy)]
pub struct Diagonal<I: MeshIndex = u32> {
    /// The quad the diagonal crosses.
    pub face: FaceId<I>,
    /// Vertex that survives the collapse.
    pub v1: VertexId<I>,
    /// Vertex merged into `v1`.
    pub v2: VertexId<I>,
    /// Euclidean length of the diagonal.
    pub length: f64,
    /// Collapse order key: `length × face weight`. Smaller goes first.
    pub priority: f64,
}

impl<I: MeshIndex> Diagonal<I> {
    /// Scale the priority by a per-face weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.priority = self.length * weight;
        self
    }
}

// Reversed so that BinaryHeap pops the smallest priority first
impl<I: MeshIndex> PartialEq for Diagonal<I> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<I: MeshIndex> Eq for Diagonal<I> {}

impl<I: MeshIndex> PartialOrd for Diagonal<I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I: MeshIndex> Ord for Diagonal<I> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.face.cmp(&self.face))
    }
}

/// Pick the shorter diagonal of the quad `corners`.
///
/// Returns the local corner indices `(keep, remove)` and the length. Ties go
/// to the diagonal through corner 0.
pub(super) fn pick_diagonal(corners: [&Point3<f64>; 4]) -> (usize, usize, f64) {
    let d02 = distance(corners[0], corners[2]);
    let d13 = distance(corners[1], corners[3]);
    if d02 <= d13 {
        (0, 2, d02)
    } else {
        (1, 3, d13)
    }
}

/// The shorter diagonal of quad `f`, or `None` if `f` is not a quad.
///
/// The priority equals the length (weight 1); see [`Diagonal::with_weight`].
pub fn shortest_diagonal<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, f: FaceId<I>) -> Option<Diagonal<I>> {
    if !mesh.is_quad(f) {
        return None;
    }
    let quad = mesh.face_quad(f);
    let (a, b, length) = pick_diagonal(quad.map(|v| mesh.position(v)));
    Some(Diagonal {
        face: f,
        v1: quad[a],
        v2: quad[b],
        length,
        priority: length,
    })
}

/// Min-heap of the shortest diagonal of every quad.
///
/// `weights`, when given, scales each face's priority and must have one
/// entry per face. Non-quad faces are skipped.
pub fn diagonal_heap<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    weights: Option<&[f64]>,
) -> BinaryHeap<Diagonal<I>> {
    mesh.face_ids()
        .filter_map(|f| {
            let d = shortest_diagonal(mesh, f)?;
            let w = weights.and_then(|w| w.get(f.index())).copied().unwrap_or(1.0);
            Some(d.with_weight(w))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_quads;

    fn two_quads() -> HalfEdgeMesh {
        // A unit square and a long thin rectangle sharing edge 1-2
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(4.0, 1.0, 0.0),
        ];
        build_from_quads(&vertices, &[[0, 1, 2, 3], [1, 4, 5, 2]]).unwrap()
    }

    #[test]
    fn test_shortest_diagonal_of_rhombus() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, -0.5, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(2.0, 0.5, 0.0),
        ];
        let mesh: HalfEdgeMesh = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
        let d = shortest_diagonal(&mesh, FaceId::new(0)).unwrap();
        assert_eq!((d.v1, d.v2), (VertexId::new(1), VertexId::new(3)));
        assert!((d.length - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_heap_pops_smallest_priority() {
        let mesh = two_quads();
        let mut heap = diagonal_heap(&mesh, None);
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.pop().unwrap().face, FaceId::new(0));
        assert_eq!(heap.pop().unwrap().face, FaceId::new(1));
    }

    #[test]
    fn test_weights_reorder_heap() {
        let mesh = two_quads();
        let weights = [10.0, 0.1];
        let mut heap = diagonal_heap(&mesh, Some(&weights));
        let first = heap.pop().unwrap();
        assert_eq!(first.face, FaceId::new(1));
        assert!((first.priority - first.length * 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_non_quad_has_no_diagonal() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh: HalfEdgeMesh =
            crate::mesh::build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
        assert!(shortest_diagonal(&mesh, FaceId::new(0)).is_none());
    }
}
