//! Mesh construction utilities.
//!
//! This module builds half-edge meshes from face-vertex lists as found in
//! mesh files, and converts them back. Faces may have any number of sides.

use std::collections::HashMap;

use nalgebra::Point3;

use super::halfedge::{Face, HalfEdge, HalfEdgeMesh};
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Build a half-edge mesh from vertices and polygon faces.
///
/// Each face lists its vertex indices counter-clockwise. Faces need at least
/// three distinct vertices, and every directed edge may be used by one face
/// only (consistent orientation, manifold edges).
///
/// # Example
/// ```
/// use quadmesh::mesh::{build_from_polygons, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(2.0, 0.5, 0.0),
/// ];
/// let faces = vec![vec![0, 1, 2, 3], vec![1, 4, 2]];
///
/// let mesh: HalfEdgeMesh = build_from_polygons(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_faces(), 2);
/// assert_eq!(mesh.count_quads(), 1);
/// ```
pub fn build_from_polygons<I, F>(vertices: &[Point3<f64>], faces: &[F]) -> Result<HalfEdgeMesh<I>>
where
    I: MeshIndex,
    F: AsRef<[usize]>,
{
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    let mut num_sides = 0usize;
    for (fi, face) in faces.iter().enumerate() {
        let face = face.as_ref();
        if face.len() < 3 {
            return Err(MeshError::DegenerateFace { face: fi });
        }
        for (k, &vi) in face.iter().enumerate() {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
            if face[..k].contains(&vi) {
                return Err(MeshError::DegenerateFace { face: fi });
            }
        }
        num_sides += face.len();
    }

    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), faces.len(), 2 * num_sides);

    let vertex_ids: Vec<VertexId<I>> = vertices
        .iter()
        .map(|&pos| mesh.add_vertex(pos))
        .collect();

    // Directed edge (v0, v1) -> half-edge
    let mut edge_map: HashMap<(usize, usize), HalfEdgeId<I>> = HashMap::with_capacity(num_sides);

    // First pass: face loops
    for face in faces {
        let face = face.as_ref();
        let n = face.len();
        let base = mesh.num_halfedges();
        let face_id = FaceId::<I>::new(mesh.num_faces());
        mesh.faces.push(Face::new(HalfEdgeId::new(base)));

        for k in 0..n {
            let v0 = face[k];
            let v1 = face[(k + 1) % n];
            let he = HalfEdgeId::<I>::new(base + k);

            if edge_map.insert((v0, v1), he).is_some() {
                return Err(MeshError::NonManifoldEdge { v0, v1 });
            }

            mesh.halfedges.push(HalfEdge {
                origin: vertex_ids[v0],
                twin: HalfEdgeId::invalid(),
                next: HalfEdgeId::new(base + (k + 1) % n),
                prev: HalfEdgeId::new(base + (k + n - 1) % n),
                face: face_id,
            });
            mesh.vertex_mut(vertex_ids[v0]).halfedge = he;
        }
    }

    // Second pass: twins, with boundary half-edges for unmatched sides.
    // Walk half-edges in index order so the result does not depend on
    // HashMap iteration order.
    let interior = mesh.num_halfedges();
    for i in 0..interior {
        let he = HalfEdgeId::<I>::new(i);
        if mesh.twin(he).is_valid() {
            continue;
        }
        let v0 = mesh.origin(he).index();
        let v1 = mesh.origin(mesh.next(he)).index();
        match edge_map.get(&(v1, v0)) {
            Some(&twin) => {
                mesh.halfedge_mut(he).twin = twin;
                mesh.halfedge_mut(twin).twin = he;
            }
            None => {
                let boundary_he = HalfEdgeId::<I>::new(mesh.num_halfedges());
                mesh.halfedges.push(HalfEdge {
                    origin: vertex_ids[v1],
                    twin: he,
                    ..HalfEdge::new()
                });
                mesh.halfedge_mut(he).twin = boundary_he;
            }
        }
    }

    link_boundary_loops(&mut mesh)?;
    fix_boundary_vertex_halfedges(&mut mesh);

    Ok(mesh)
}

/// Build a half-edge mesh from vertices and triangle faces.
///
/// # Example
/// ```
/// use quadmesh::mesh::{build_from_triangles, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh<I>> {
    build_from_polygons(vertices, faces)
}

/// Build a half-edge mesh from vertices and quad faces (counter-clockwise).
pub fn build_from_quads<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 4]],
) -> Result<HalfEdgeMesh<I>> {
    build_from_polygons(vertices, faces)
}

/// Link boundary half-edges into loops.
///
/// The successor of a boundary half-edge ending at `v` is found by turning
/// around `v` through interior half-edges until the next boundary half-edge
/// leaving `v`. This stays correct at vertices touching several boundary
/// loops, where a plain "outgoing boundary edge of v" table would not.
fn link_boundary_loops<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) -> Result<()> {
    let boundary_hes: Vec<HalfEdgeId<I>> = mesh
        .halfedge_ids()
        .filter(|&he| mesh.is_boundary_halfedge(he))
        .collect();

    for &he in &boundary_hes {
        // twin(he) is interior and leaves v = dest(he)
        let mut candidate = mesh.twin(he);
        let limit = mesh.num_halfedges();
        let mut steps = 0usize;
        loop {
            let incoming = mesh.prev(candidate);
            let outgoing = mesh.twin(incoming);
            if mesh.is_boundary_halfedge(outgoing) {
                mesh.halfedge_mut(he).next = outgoing;
                mesh.halfedge_mut(outgoing).prev = he;
                break;
            }
            candidate = outgoing;
            steps += 1;
            if steps > limit {
                return Err(MeshError::NonManifold {
                    details: format!("boundary at {} does not close", mesh.dest(he)),
                });
            }
        }
    }

    Ok(())
}

/// Ensure boundary vertices point to a boundary half-edge.
fn fix_boundary_vertex_halfedges<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) {
    for vid in mesh.vertex_ids().collect::<Vec<_>>() {
        let start_he = mesh.vertex(vid).halfedge;
        if !start_he.is_valid() {
            continue;
        }

        let found = mesh
            .vertex_halfedges(vid)
            .find(|&he| mesh.is_boundary_halfedge(he));
        if let Some(he) = found {
            mesh.vertex_mut(vid).halfedge = he;
        }
    }
}

/// Convert a half-edge mesh back to vertices and polygon faces.
pub fn to_face_vertex_polygons<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<Vec<usize>> = mesh
        .face_ids()
        .map(|f| mesh.face_vertices(f).map(|v| v.index()).collect())
        .collect();

    (vertices, faces)
}

/// Convert a triangle mesh back to a face-vertex representation.
///
/// Faces with more than three sides contribute their first three vertices;
/// use [`to_face_vertex_polygons`] for mixed meshes.
pub fn to_face_vertex<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<[usize; 3]> = mesh
        .face_ids()
        .map(|f| {
            let [v0, v1, v2] = mesh.face_triangle(f);
            [v0.index(), v1.index(), v2.index()]
        })
        .collect();

    (vertices, faces)
}

/// Convert a quad mesh back to a face-vertex representation.
pub fn to_face_vertex_quads<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
) -> (Vec<Point3<f64>>, Vec<[usize; 4]>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<[usize; 4]> = mesh
        .face_ids()
        .map(|f| {
            let [v0, v1, v2, v3] = mesh.face_quad(f);
            [v0.index(), v1.index(), v2.index(), v3.index()]
        })
        .collect();

    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2]];
        (vertices, faces)
    }

    fn two_triangles() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3]];
        (vertices, faces)
    }

    fn two_quads() -> (Vec<Point3<f64>>, Vec<[usize; 4]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2, 3], [1, 4, 5, 2]];
        (vertices, faces)
    }

    #[test]
    fn test_single_triangle() {
        let (vertices, faces) = single_triangle();
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_faces(), 1);
        // 3 interior half-edges + 3 boundary half-edges
        assert_eq!(mesh.num_halfedges(), 6);
        assert!(mesh.is_valid());

        for v in mesh.vertex_ids() {
            assert!(mesh.is_boundary_vertex(v));
        }
    }

    #[test]
    fn test_two_triangles() {
        let (vertices, faces) = two_triangles();
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 2);
        // 6 interior half-edges + 4 boundary half-edges
        assert_eq!(mesh.num_halfedges(), 10);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_boundary_loop_is_closed() {
        let (vertices, faces) = two_triangles();
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        let start = mesh
            .halfedge_ids()
            .find(|&he| mesh.is_boundary_halfedge(he))
            .unwrap();
        let boundary: Vec<_> = mesh.loop_halfedges(start).collect();
        assert_eq!(boundary.len(), 4);
        for he in boundary {
            assert!(mesh.is_boundary_halfedge(he));
            assert_eq!(mesh.dest(he), mesh.origin(mesh.next(he)));
        }
    }

    #[test]
    fn test_bowtie_vertex_boundary() {
        // Two triangles touching at vertex 0 only
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(-1.0, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 3, 4]];
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        for he in mesh.halfedge_ids() {
            if mesh.is_boundary_halfedge(he) {
                assert_eq!(mesh.dest(he), mesh.origin(mesh.next(he)));
                assert!(mesh.is_boundary_halfedge(mesh.next(he)));
            }
        }
    }

    #[test]
    fn test_mixed_polygons_roundtrip() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.5, 0.0),
        ];
        let faces = vec![vec![0, 1, 2, 3], vec![1, 4, 2]];
        let mesh: HalfEdgeMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        let (out_verts, out_faces) = to_face_vertex_polygons(&mesh);
        assert_eq!(out_verts.len(), 5);
        assert_eq!(out_faces, faces);
    }

    #[test]
    fn test_roundtrip_quads() {
        let (vertices, faces) = two_quads();
        let mesh: HalfEdgeMesh<u32> = build_from_quads(&vertices, &faces).unwrap();
        assert_eq!(mesh.num_halfedges(), 14);
        assert!(mesh.is_quad_mesh());

        let (out_verts, out_faces) = to_face_vertex_quads(&mesh);
        assert_eq!(vertices.len(), out_verts.len());
        assert_eq!(faces, out_faces);
    }

    #[test]
    fn test_roundtrip_triangles() {
        let (vertices, faces) = two_triangles();
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();
        let (_, out_faces) = to_face_vertex(&mesh);
        assert_eq!(faces, out_faces);
    }

    #[test]
    fn test_empty_input() {
        let faces: Vec<[usize; 3]> = Vec::new();
        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&[], &faces);
        assert!(matches!(result, Err(MeshError::EmptyMesh)));
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let faces = vec![[0, 1, 2]];

        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &faces);
        assert!(matches!(
            result,
            Err(MeshError::InvalidVertexIndex { face: 0, vertex: 1 })
        ));
    }

    #[test]
    fn test_degenerate_faces() {
        let (vertices, _) = two_quads();

        let repeated = vec![[0, 1, 0, 3]];
        let result: Result<HalfEdgeMesh<u32>> = build_from_quads(&vertices, &repeated);
        assert!(matches!(result, Err(MeshError::DegenerateFace { face: 0 })));

        let too_small = vec![vec![0, 1]];
        let result: Result<HalfEdgeMesh<u32>> = build_from_polygons(&vertices, &too_small);
        assert!(matches!(result, Err(MeshError::DegenerateFace { face: 0 })));
    }

    #[test]
    fn test_duplicate_directed_edge() {
        let (vertices, _) = two_triangles();
        // Both faces walk 0 -> 1
        let faces = vec![[0, 1, 2], [0, 1, 3]];
        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &faces);
        assert!(matches!(
            result,
            Err(MeshError::NonManifoldEdge { v0: 0, v1: 1 })
        ));
    }
}
