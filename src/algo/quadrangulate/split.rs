//! Splitting of arbitrary polygons into quads.

use std::collections::HashMap;

use nalgebra::Point3;

use crate::error::Result;
use crate::maths::{centroid, midpoint};
use crate::mesh::{build_from_quads, to_face_vertex_polygons, HalfEdgeMesh, MeshIndex};

/// Split every face into quads, in place.
///
/// A face with `n` corners becomes `n` quads, each made of one corner, the
/// midpoints of the two sides meeting there, and the face centroid. Shared
/// sides are split once, so neighbouring faces stay connected.
///
/// New vertices follow the old ones: edge midpoints first, in the order
/// their edges are met, then one centroid per face.
pub fn split_into_quads<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) -> Result<()> {
    let (mut vertices, faces) = to_face_vertex_polygons(mesh);

    let mut edge_points: HashMap<(usize, usize), usize> = HashMap::new();
    let mut face_edge_points: Vec<Vec<usize>> = Vec::with_capacity(faces.len());

    for face in &faces {
        let n = face.len();
        let mut mids = Vec::with_capacity(n);
        for k in 0..n {
            let (a, b) = (face[k], face[(k + 1) % n]);
            let key = if a < b { (a, b) } else { (b, a) };
            let next_index = vertices.len();
            let index = *edge_points.entry(key).or_insert(next_index);
            if index == next_index {
                vertices.push(midpoint(&vertices[a], &vertices[b]));
            }
            mids.push(index);
        }
        face_edge_points.push(mids);
    }

    let total_quads: usize = faces.iter().map(Vec::len).sum();
    let mut quads: Vec<[usize; 4]> = Vec::with_capacity(total_quads);

    for (face, mids) in faces.iter().zip(&face_edge_points) {
        let corners: Vec<Point3<f64>> = face.iter().map(|&v| vertices[v]).collect();
        let center = vertices.len();
        vertices.push(centroid(&corners).unwrap_or_else(Point3::origin));

        // mids[k] sits on side (k, k + 1)
        let n = face.len();
        for k in 0..n {
            quads.push([face[k], mids[k], center, mids[(k + n - 1) % n]]);
        }
    }

    log::debug!(
        "split {} faces into {} quads ({} new vertices)",
        faces.len(),
        quads.len(),
        vertices.len() - mesh.num_vertices()
    );

    *mesh = build_from_quads(&vertices, &quads)?;
    Ok(())
}
