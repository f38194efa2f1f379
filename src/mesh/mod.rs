//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation used for every
//! stage of the pipeline: triangle input, mixed triangle/quad meshes while
//! edges are being removed, and the final quad mesh.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`], a doubly-connected edge list with
//! O(1) adjacency queries. Faces can have any number of sides.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//! - [`EdgeId`] - Identifies a full edge
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! ```
//! use quadmesh::mesh::{HalfEdgeMesh, build_from_triangles};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert!(mesh.is_triangle_mesh());
//! mesh.check_correctness().unwrap();
//! ```

mod builder;
mod describe;
mod halfedge;
mod index;
mod validate;

pub use builder::{
    build_from_polygons, build_from_quads, build_from_triangles, to_face_vertex,
    to_face_vertex_polygons, to_face_vertex_quads,
};
pub use describe::MeshStats;
pub use halfedge::{
    Face, FaceHalfEdgeIter, HalfEdge, HalfEdgeMesh, Vertex, VertexHalfEdgeIter,
};
pub use index::{EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
