//! Triangle to quad conversion.
//!
//! Conversion runs in up to three phases:
//!
//! 1. **Marking**: faces are visited in index order. Each unmarked triangle
//!    looks across its interior edges for unmarked triangles and picks the
//!    edge whose removal yields the squarest quad. The edge and both
//!    triangles are marked.
//! 2. **Removal**: every marked edge is deleted and its two triangles become
//!    one quad.
//! 3. **Splitting** (optional): if any triangle survived, every face is split
//!    into quads around its centroid. Each edge gets one midpoint shared by
//!    both neighbours, so an n-gon becomes n quads and the mesh stays
//!    conforming.
//!
//! # Example
//!
//! ```
//! use quadmesh::algo::quadrangulate::{tri_to_quad, QuadOptions};
//! use quadmesh::mesh::{build_from_triangles, HalfEdgeMesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2], [0, 2, 3]];
//! let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let report = tri_to_quad(&mut mesh, &QuadOptions::default()).unwrap();
//! assert_eq!(report.merged_pairs, 1);
//! assert!(mesh.is_quad_mesh());
//! ```

mod pairing;
mod split;

use std::fmt;

use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{build_from_polygons, to_face_vertex_polygons, HalfEdgeMesh, MeshIndex};

pub use pairing::{mark_removable_edges, merged_loop, MarkedEdge};
pub use split::split_into_quads;

/// Options for triangle to quad conversion.
#[derive(Debug, Clone)]
pub struct QuadOptions {
    /// Split every face when triangles are left after pairing, so the
    /// result has no triangles (default: true).
    pub pure_quads: bool,

    /// Whether to score candidate edges in parallel (default: true).
    pub parallel: bool,
}

impl Default for QuadOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl QuadOptions {
    /// Default options: pure quads, parallel scoring.
    pub fn new() -> Self {
        Self {
            pure_quads: true,
            parallel: true,
        }
    }

    /// Set whether leftover triangles trigger the splitting phase.
    pub fn with_pure_quads(mut self, pure_quads: bool) -> Self {
        self.pure_quads = pure_quads;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// What a conversion did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuadReport {
    /// Triangle pairs merged into quads.
    pub merged_pairs: usize,
    /// Triangles that found no partner.
    pub leftover_triangles: usize,
    /// Whether the splitting phase ran.
    pub split_applied: bool,
}

impl fmt::Display for QuadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pairs merged, {} triangles left over",
            self.merged_pairs, self.leftover_triangles
        )?;
        if self.split_applied {
            write!(f, ", split into pure quads")?;
        }
        Ok(())
    }
}

/// Convert a triangle mesh to a quad-dominant (or pure quad) mesh in place.
///
/// # Errors
///
/// - [`MeshError::EmptyMesh`] if the mesh has no faces
/// - [`MeshError::InvalidState`] if some face is not a triangle
pub fn tri_to_quad<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    options: &QuadOptions,
) -> Result<QuadReport> {
    tri_to_quad_with_progress(mesh, options, &Progress::none())
}

/// Triangle to quad conversion with progress reporting.
pub fn tri_to_quad_with_progress<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    options: &QuadOptions,
    progress: &Progress,
) -> Result<QuadReport> {
    if mesh.num_faces() == 0 {
        return Err(MeshError::EmptyMesh);
    }
    let non_triangles = mesh.num_faces() - mesh.count_triangles();
    if non_triangles > 0 {
        return Err(MeshError::InvalidState(format!(
            "triangle to quad conversion needs a triangle mesh, found {non_triangles} other faces"
        )));
    }

    const STEPS: usize = 3;
    let triangles = mesh.num_faces();

    progress.report(0, STEPS, "Marking removable edges");
    let marked = pairing::mark_edges(mesh, options.parallel);
    log::debug!("marked {} of {} edges for removal", marked.len(), mesh.num_edges());

    progress.report(1, STEPS, "Removing marked edges");
    let merged_pairs = marked.len();
    let faces = pairing::merge_marked(mesh, &marked);
    let (vertices, _) = to_face_vertex_polygons(mesh);
    *mesh = build_from_polygons(&vertices, &faces)?;

    let leftover_triangles = triangles - 2 * merged_pairs;
    log::info!(
        "paired {} of {} triangles, {} left over",
        2 * merged_pairs,
        triangles,
        leftover_triangles
    );

    let mut split_applied = false;
    if leftover_triangles > 0 && options.pure_quads {
        progress.report(2, STEPS, "Splitting into quads");
        split_into_quads(mesh)?;
        split_applied = true;
    }
    progress.report(STEPS, STEPS, "Done");

    debug_assert!(mesh.is_valid());

    Ok(QuadReport {
        merged_pairs,
        leftover_triangles,
        split_applied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_quads, build_from_triangles};
    use nalgebra::Point3;

    /// An `n` × `n` grid of unit squares, each cut along the same diagonal.
    pub(crate) fn triangulated_grid(n: usize) -> HalfEdgeMesh {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }

        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = j * (n + 1) + i + 1;
                let v01 = (j + 1) * (n + 1) + i;
                let v11 = (j + 1) * (n + 1) + i + 1;

                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }

        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn single_triangle() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap()
    }

    #[test]
    fn test_grid_pairs_every_triangle() {
        let mut mesh = triangulated_grid(3);
        let area = mesh.surface_area();

        let report = tri_to_quad(&mut mesh, &QuadOptions::default()).unwrap();

        assert_eq!(report.merged_pairs, 9);
        assert_eq!(report.leftover_triangles, 0);
        assert!(!report.split_applied);
        assert_eq!(mesh.num_faces(), 9);
        assert!(mesh.is_quad_mesh());
        assert!((mesh.surface_area() - area).abs() < 1e-9);
        mesh.check_correctness().unwrap();
    }

    #[test]
    fn test_merged_quads_are_unit_squares() {
        let mut mesh = triangulated_grid(2);
        tri_to_quad(&mut mesh, &QuadOptions::default()).unwrap();
        for f in mesh.face_ids() {
            assert!((mesh.face_area(f) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_leftover_triangle_is_split() {
        let mut mesh = single_triangle();
        let report = tri_to_quad(&mut mesh, &QuadOptions::default()).unwrap();

        assert_eq!(report.merged_pairs, 0);
        assert_eq!(report.leftover_triangles, 1);
        assert!(report.split_applied);
        assert_eq!(mesh.num_faces(), 3);
        assert_eq!(mesh.count_triangles(), 0);
        // 3 corners + 3 midpoints + 1 centroid
        assert_eq!(mesh.num_vertices(), 7);
        mesh.check_correctness().unwrap();
    }

    #[test]
    fn test_no_pure_keeps_leftovers() {
        let mut mesh = single_triangle();
        let options = QuadOptions::default().with_pure_quads(false);
        let report = tri_to_quad(&mut mesh, &options).unwrap();

        assert!(!report.split_applied);
        assert_eq!(mesh.count_triangles(), 1);
    }

    #[test]
    fn test_odd_strip_becomes_pure_quads() {
        // Three triangles in a fan: one must be left over
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, 0.5, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]];
        let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();

        let report = tri_to_quad(&mut mesh, &QuadOptions::default()).unwrap();
        assert_eq!(report.merged_pairs, 1);
        assert_eq!(report.leftover_triangles, 1);
        // one quad -> 4, one triangle -> 3
        assert_eq!(mesh.num_faces(), 7);
        assert!(mesh.is_quad_mesh());
        mesh.check_correctness().unwrap();
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut a = triangulated_grid(4);
        let mut b = a.clone();

        let ra = tri_to_quad(&mut a, &QuadOptions::default()).unwrap();
        let rb = tri_to_quad(&mut b, &QuadOptions::default().sequential()).unwrap();

        assert_eq!(ra, rb);
        assert_eq!(a.describe(), b.describe());
    }

    #[test]
    fn test_rejects_non_triangle_mesh() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mut mesh: HalfEdgeMesh = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
        let result = tri_to_quad(&mut mesh, &QuadOptions::default());
        assert!(matches!(result, Err(MeshError::InvalidState(_))));

        let mut empty = HalfEdgeMesh::<u32>::new();
        assert!(matches!(
            tri_to_quad(&mut empty, &QuadOptions::default()),
            Err(MeshError::EmptyMesh)
        ));
    }

    #[test]
    fn test_progress_is_reported() {
        use std::sync::{Arc, Mutex};

        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&messages);
        let progress = Progress::new(move |_, _, m| sink.lock().unwrap().push(m.to_string()));

        let mut mesh = single_triangle();
        tri_to_quad_with_progress(&mut mesh, &QuadOptions::default(), &progress).unwrap();

        let messages = messages.lock().unwrap();
        assert_eq!(messages.first().map(String::as_str), Some("Marking removable edges"));
        assert!(messages.iter().any(|m| m == "Splitting into quads"));
    }
}
