//! Rendering resources that outlive a single frame.
//!
//! The graphics API stays behind [`ShaderBackend`]; this module only keeps
//! track of which programs exist and makes sure each is released once.

pub mod resources;

pub use resources::{ResourceManager, Shader, ShaderBackend, ShaderSource};
