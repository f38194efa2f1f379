//! Mesh processing algorithms.
//!
//! - **Quadrangulation**: pair triangles across their best shared edge and
//!   optionally split the rest so the mesh becomes quad-only
//! - **Simplification**: collapse the shortest quad diagonals, cleaning up
//!   doublets as they appear
//!
//! Both work the same way: read the half-edge mesh into face-vertex lists,
//! edit those, then rebuild the half-edge mesh in place.

pub mod progress;
pub mod quadrangulate;
pub mod simplify;

pub use progress::Progress;
