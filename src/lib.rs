//! # quadmesh
//!
//! Turn triangle meshes into quad meshes and simplify them.
//!
//! quadmesh stores meshes as a half-edge structure whose faces may have any
//! number of sides, so the same type carries the triangle input, the mixed
//! meshes produced along the way and the final quad mesh.
//!
//! ## Features
//!
//! - **Half-edge data structure**: O(1) adjacency queries with type-safe indices,
//!   boundary loops and a full consistency check
//! - **Triangle to quad conversion**: greedy pairing of triangles across their
//!   squarest shared edge, with an optional split to a quad-only mesh
//! - **Quad simplification**: shortest-diagonal collapses with doublet cleanup
//! - **File formats**: polygon OBJ and PLY
//! - **Scene helpers**: a free-fly camera, GPU-ready vertex and index buffers,
//!   and a backend-agnostic shader registry
//!
//! ## Quick Start
//!
//! ```no_run
//! use quadmesh::prelude::*;
//! use quadmesh::algo::quadrangulate::{tri_to_quad, QuadOptions};
//!
//! let mut mesh: HalfEdgeMesh = quadmesh::io::load("bunny.obj").unwrap();
//! println!("{}", mesh.stats());
//!
//! let report = tri_to_quad(&mut mesh, &QuadOptions::default()).unwrap();
//! println!("{report}");
//!
//! quadmesh::io::save(&mesh, "bunny_quads.obj").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use quadmesh::prelude::*;
//! use nalgebra::Point3;
//!
//! // A unit square split along its diagonal
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2], [0, 2, 3]];
//!
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_faces(), 2);
//! assert_eq!(mesh.num_edges(), 5);
//! mesh.check_correctness().unwrap();
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use quadmesh::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(1.0, 1.0, 0.0),
//! #     Point3::new(0.0, 1.0, 0.0),
//! # ];
//! # let mesh: HalfEdgeMesh = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
//! // Corners of a face, in winding order
//! let f = FaceId::new(0);
//! let corners: Vec<VertexId> = mesh.face_vertices(f).collect();
//! assert_eq!(corners.len(), 4);
//!
//! // Neighbours of a vertex
//! for neighbor in mesh.vertex_neighbors(VertexId::new(0)) {
//!     println!("{neighbor}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod maths;
pub mod mesh;
pub mod render;
pub mod scene;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use quadmesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_polygons, build_from_quads, build_from_triangles, to_face_vertex_polygons,
        EdgeId, FaceId, HalfEdgeId, HalfEdgeMesh, MeshIndex, MeshStats, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
