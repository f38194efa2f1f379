//! Scene objects: a free-fly camera and displayable meshes.
//!
//! Everything here is windowing-agnostic. Matrices are `nalgebra`
//! [`Matrix4<f32>`](nalgebra::Matrix4) in column-major order, ready to hand to a
//! graphics API, and vertex data is `bytemuck`-castable.

pub mod camera;
pub mod object;

pub use camera::{Camera, CameraMovement, CameraSettings};
pub use object::{GpuVertex, Object, RotationAxis};
