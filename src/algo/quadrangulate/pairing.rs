//! Marking and removal of edges between triangle pairs.

use rayon::prelude::*;

use crate::maths::polygon_squareness;
use crate::mesh::{FaceId, HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId};

/// An edge chosen for removal, seen from the face that picked it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkedEdge<I: MeshIndex = u32> {
    /// Half-edge inside `left`.
    pub halfedge: HalfEdgeId<I>,
    /// The face that picked the edge.
    pub left: FaceId<I>,
    /// The face across the edge.
    pub right: FaceId<I>,
}

/// Vertex loop of the polygon left after deleting the edge under `he`.
///
/// Starts at the destination of `he`, walks the rest of the left face, then
/// the rest of the right face. Keeps the winding of both faces.
pub fn merged_loop<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, he: HalfEdgeId<I>) -> Vec<VertexId<I>> {
    let twin = mesh.twin(he);
    let mut out: Vec<VertexId<I>> = mesh
        .loop_halfedges(mesh.next(he))
        .take_while(|&h| h != he)
        .map(|h| mesh.origin(h))
        .collect();
    out.extend(
        mesh.loop_halfedges(mesh.next(twin))
            .take_while(|&h| h != twin)
            .map(|h| mesh.origin(h)),
    );
    out
}

/// Choose the edges to remove so that as many triangles as possible pair up.
///
/// Returns one entry per pair, in the order the left faces were visited.
pub fn mark_removable_edges<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Vec<MarkedEdge<I>> {
    mark_edges(mesh, true)
}

pub(super) fn mark_edges<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    parallel: bool,
) -> Vec<MarkedEdge<I>> {
    let num_faces = mesh.num_faces();

    // Scores depend only on geometry, so they can be computed up front
    let candidates: Vec<Vec<(HalfEdgeId<I>, f64)>> = if parallel {
        (0..num_faces)
            .into_par_iter()
            .map(|i| face_candidates(mesh, FaceId::new(i)))
            .collect()
    } else {
        (0..num_faces)
            .map(|i| face_candidates(mesh, FaceId::new(i)))
            .collect()
    };

    let mut marked_faces = vec![false; num_faces];
    let mut marked = Vec::new();

    for (i, options) in candidates.iter().enumerate() {
        if marked_faces[i] {
            continue;
        }

        let mut best: Option<(HalfEdgeId<I>, f64)> = None;
        for &(he, score) in options {
            if marked_faces[mesh.opposite_face(he).index()] {
                continue;
            }
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((he, score));
            }
        }

        if let Some((he, _)) = best {
            let right = mesh.opposite_face(he);
            marked_faces[i] = true;
            marked_faces[right.index()] = true;
            marked.push(MarkedEdge {
                halfedge: he,
                left: FaceId::new(i),
                right,
            });
        }
    }

    marked
}

/// Interior edges of a triangle that lead to another triangle, with the
/// squareness of the quad their removal would create.
fn face_candidates<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    f: FaceId<I>,
) -> Vec<(HalfEdgeId<I>, f64)> {
    if !mesh.is_triangle(f) {
        return Vec::new();
    }

    mesh.face_halfedges(f)
        .filter_map(|he| {
            let g = mesh.opposite_face(he);
            if !g.is_valid() || g == f || !mesh.is_triangle(g) {
                return None;
            }
            let quad = merged_loop(mesh, he);
            if !all_distinct(&quad) {
                return None;
            }
            let points: Vec<_> = quad.iter().map(|&v| *mesh.position(v)).collect();
            Some((he, polygon_squareness(&points)))
        })
        .collect()
}

fn all_distinct<T: PartialEq>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(k, a)| !items[..k].contains(a))
}

/// Face-vertex lists after removing every marked edge.
///
/// Each merged quad takes the slot of its left face; right faces are dropped.
pub(super) fn merge_marked<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    marked: &[MarkedEdge<I>],
) -> Vec<Vec<usize>> {
    let mut merged: Vec<Option<HalfEdgeId<I>>> = vec![None; mesh.num_faces()];
    let mut dropped = vec![false; mesh.num_faces()];
    for m in marked {
        merged[m.left.index()] = Some(m.halfedge);
        dropped[m.right.index()] = true;
    }

    mesh.face_ids()
        .filter(|f| !dropped[f.index()])
        .map(|f| match merged[f.index()] {
            Some(he) => merged_loop(mesh, he).iter().map(|v| v.index()).collect(),
            None => mesh.face_vertices(f).map(|v| v.index()).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;
    use nalgebra::Point3;

    fn square_pair() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap()
    }

    #[test]
    fn test_merged_loop_keeps_winding() {
        let mesh = square_pair();
        let he = mesh.find_halfedge(VertexId::new(2), VertexId::new(0)).unwrap();
        let quad: Vec<usize> = merged_loop(&mesh, he).iter().map(|v| v.index()).collect();
        assert_eq!(quad, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_mark_pairs_both_faces() {
        let mesh = square_pair();
        let marked = mark_removable_edges(&mesh);
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].left, FaceId::new(0));
        assert_eq!(marked[0].right, FaceId::new(1));
    }

    #[test]
    fn test_prefers_squarest_merge() {
        // Triangle 0 can pair with a square-making neighbour or a sliver one
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(3.0, 0.2, 0.0),
        ];
        let faces = vec![[0, 1, 2], [1, 4, 2], [0, 2, 3]];
        let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();

        let marked = mark_removable_edges(&mesh);
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].right, FaceId::new(2));
    }

    #[test]
    fn test_boundary_edges_are_not_candidates() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
        assert!(mark_removable_edges(&mesh).is_empty());
    }

    #[test]
    fn test_merge_marked_drops_right_faces() {
        let mesh = square_pair();
        let marked = mark_removable_edges(&mesh);
        let faces = merge_marked(&mesh, &marked);
        assert_eq!(faces, vec![vec![0, 1, 2, 3]]);
    }
}
