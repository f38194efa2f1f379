//! Quad mesh simplification by diagonal collapse.
//!
//! Every quad offers its shorter diagonal as a collapse candidate, ordered
//! by `length × face weight`. The cheapest valid diagonal is collapsed:
//! its two endpoints merge at the diagonal midpoint and the quad vanishes.
//! A collapse is refused when
//!
//! - either endpoint lies on the boundary
//! - the endpoints share a face other than the quad itself
//! - the merge would give a face a repeated corner or duplicate an edge
//!
//! After each collapse, **doublets** (interior vertices where only two quads
//! meet) are removed by merging their two quads. Stale heap entries are
//! skipped using per-face version counters.
//!
//! # Example
//!
//! ```no_run
//! use quadmesh::prelude::*;
//! use quadmesh::algo::simplify::{simplify_quads, SimplifyOptions};
//!
//! let mut mesh: HalfEdgeMesh = quadmesh::io::load("quads.obj").unwrap();
//!
//! // Reduce to 50% of original faces
//! let options = SimplifyOptions::with_target_ratio(0.5);
//! let report = simplify_quads(&mut mesh, &options).unwrap();
//! println!("{report}");
//! ```

mod collapse;
mod diagonal;

use std::fmt;

use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{FaceId, HalfEdgeMesh, MeshIndex, VertexId};

use collapse::QuadCollapser;

pub use diagonal::{diagonal_heap, shortest_diagonal, Diagonal};

/// Options for quad simplification.
#[derive(Debug, Clone)]
pub struct SimplifyOptions {
    /// Target number of faces after simplification.
    /// If None, uses target_ratio instead.
    pub target_faces: Option<usize>,

    /// Target ratio of faces to keep (0.0 to 1.0).
    /// Only used if target_faces is None.
    pub target_ratio: f64,

    /// Diagonals longer than this are never collapsed.
    pub max_diagonal: Option<f64>,

    /// Whether to compute the initial diagonals in parallel (default: true).
    pub parallel: bool,

    /// Per-face priority multipliers, one per input face (default: all 1).
    pub face_weights: Option<Vec<f64>>,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self::with_target_ratio(0.5)
    }
}

impl SimplifyOptions {
    /// Create options to reduce to a target number of faces.
    pub fn with_target_faces(target: usize) -> Self {
        Self {
            target_faces: Some(target),
            ..Self::with_target_ratio(0.5)
        }
    }

    /// Create options to reduce to a ratio of the original face count.
    pub fn with_target_ratio(ratio: f64) -> Self {
        Self {
            target_faces: None,
            target_ratio: ratio,
            max_diagonal: None,
            parallel: true,
            face_weights: None,
        }
    }

    /// Never collapse diagonals longer than `length`.
    pub fn with_max_diagonal(mut self, length: f64) -> Self {
        self.max_diagonal = Some(length);
        self
    }

    /// Scale each face's collapse priority.
    pub fn with_face_weights(mut self, weights: Vec<f64>) -> Self {
        self.face_weights = Some(weights);
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

    /// Compute the target number of faces given the original count.
    pub fn compute_target(&self, original_faces: usize) -> usize {
        if let Some(target) = self.target_faces {
            target.min(original_faces)
        } else {
            ((original_faces as f64) * self.target_ratio).round() as usize
        }
    }

    fn validate(&self, num_faces: usize) -> Result<()> {
        if self.target_faces.is_none() && !(0.0..=1.0).contains(&self.target_ratio) {
            return Err(MeshError::invalid_param(
                "target_ratio",
                self.target_ratio,
                "must be in [0, 1]",
            ));
        }
        if let Some(max) = self.max_diagonal {
            if !(max > 0.0) {
                return Err(MeshError::invalid_param("max_diagonal", max, "must be positive"));
            }
        }
        if let Some(weights) = &self.face_weights {
            if weights.len() != num_faces {
                return Err(MeshError::invalid_param(
                    "face_weights",
                    weights.len(),
                    "must have one weight per face",
                ));
            }
            if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
                return Err(MeshError::invalid_param(
                    "face_weights",
                    w,
                    "weights must be finite and non-negative",
                ));
            }
        }
        Ok(())
    }
}

/// What a simplification did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimplifyReport {
    /// Diagonals collapsed.
    pub collapses: usize,
    /// Doublet vertices removed.
    pub doublets_removed: usize,
    /// Face count before.
    pub faces_before: usize,
    /// Face count after.
    pub faces_after: usize,
}

impl fmt::Display for SimplifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} faces ({} collapses, {} doublets removed)",
            self.faces_before, self.faces_after, self.collapses, self.doublets_removed
        )
    }
}

/// Simplify a pure quad mesh in place.
///
/// Stops at the target face count or when no valid collapse is left.
/// Doublet removal can take the count slightly below the target.
///
/// # Errors
///
/// - [`MeshError::EmptyMesh`] if the mesh has no faces
/// - [`MeshError::InvalidState`] if some face is not a quad
/// - [`MeshError::InvalidParameter`] for out-of-range options
pub fn simplify_quads<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    options: &SimplifyOptions,
) -> Result<SimplifyReport> {
    simplify_quads_with_progress(mesh, options, &Progress::none())
}

/// Quad simplification with progress reporting.
pub fn simplify_quads_with_progress<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    options: &SimplifyOptions,
    progress: &Progress,
) -> Result<SimplifyReport> {
    let faces_before = mesh.num_faces();
    if faces_before == 0 {
        return Err(MeshError::EmptyMesh);
    }
    if !mesh.is_quad_mesh() {
        return Err(MeshError::InvalidState(format!(
            "quad simplification needs a pure quad mesh, found {} triangles and {} other faces",
            mesh.count_triangles(),
            faces_before - mesh.count_triangles() - mesh.count_quads()
        )));
    }
    options.validate(faces_before)?;

    let target = options.compute_target(faces_before);
    let wanted = faces_before - target;

    let mut state = QuadCollapser::new(
        mesh,
        options.face_weights.as_deref(),
        options.max_diagonal,
        options.parallel,
    );

    progress.report(0, 2, "Removing doublets");
    state.clean_all_doublets();

    while state.live_faces() > target {
        if !state.step() {
            log::debug!("no valid diagonal left at {} faces", state.live_faces());
            break;
        }
        progress.report_sub(faces_before - state.live_faces(), wanted, 1, 2, "Collapsing diagonals");
    }
    progress.report(2, 2, "Done");

    let report = SimplifyReport {
        collapses: state.collapses,
        doublets_removed: state.doublets_removed,
        faces_before,
        faces_after: state.live_faces(),
    };

    *mesh = state.finish()?;
    debug_assert!(mesh.is_valid());

    log::info!("simplified {report}");
    Ok(report)
}

/// Interior vertices where exactly two faces meet.
pub fn find_doublets<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Vec<VertexId<I>> {
    mesh.vertex_ids()
        .filter(|&v| !mesh.is_boundary_vertex(v) && mesh.valence(v) == 2)
        .collect()
}

/// Whether a face is a singlet (a triangle left in a quad mesh).
pub fn is_singlet<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, f: FaceId<I>) -> bool {
    mesh.is_triangle(f)
}
