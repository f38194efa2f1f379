//! A displayable mesh with GPU-ready buffers and a model transform.

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix4, Vector3};

use crate::algo::quadrangulate::{tri_to_quad, QuadOptions, QuadReport};
use crate::algo::simplify::{simplify_quads, SimplifyOptions, SimplifyReport};
use crate::error::Result;
use crate::io;
use crate::mesh::HalfEdgeMesh;

use super::camera::Camera;

/// Vertex layout shared with shaders: position then normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Area-weighted vertex normal.
    pub normal: [f32; 3],
}

/// Axis for [`Object::rotate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationAxis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis.
    Z,
}

impl RotationAxis {
    fn unit(self) -> nalgebra::Unit<Vector3<f32>> {
        match self {
            RotationAxis::X => Vector3::x_axis(),
            RotationAxis::Y => Vector3::y_axis(),
            RotationAxis::Z => Vector3::z_axis(),
        }
    }
}

/// A mesh in the scene.
///
/// Vertex and index lists mirror the mesh and are rebuilt after every
/// operation that changes it. Vertex `i` of [`vertices`](Self::vertices)
/// is vertex `i` of the mesh.
#[derive(Debug, Clone)]
pub struct Object {
    mesh: HalfEdgeMesh,
    vertices: Vec<GpuVertex>,
    polygon_indices: Vec<u32>,
    face_offsets: Vec<usize>,
    triangle_indices: Vec<u32>,
    line_indices: Vec<u32>,
    model: Matrix4<f32>,
}

impl Object {
    /// Load an object from an OBJ or PLY file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_mesh(io::load(path)?))
    }

    /// Wrap an existing mesh.
    pub fn from_mesh(mesh: HalfEdgeMesh) -> Self {
        let mut object = Self {
            mesh,
            vertices: Vec::new(),
            polygon_indices: Vec::new(),
            face_offsets: Vec::new(),
            triangle_indices: Vec::new(),
            line_indices: Vec::new(),
            model: Matrix4::identity(),
        };
        object.rebuild_lists();
        object
    }

    /// The underlying mesh.
    pub fn mesh(&self) -> &HalfEdgeMesh {
        &self.mesh
    }

    /// Give up the object and keep its mesh.
    pub fn into_mesh(self) -> HalfEdgeMesh {
        self.mesh
    }

    /// Per-vertex buffer data.
    pub fn vertices(&self) -> &[GpuVertex] {
        &self.vertices
    }

    /// The vertex buffer as raw bytes, ready for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Every face loop, flattened. Face `f` spans
    /// `face_offsets()[f]..face_offsets()[f + 1]`.
    pub fn polygon_indices(&self) -> &[u32] {
        &self.polygon_indices
    }

    /// Start of each face in [`polygon_indices`](Self::polygon_indices),
    /// followed by the total length.
    pub fn face_offsets(&self) -> &[usize] {
        &self.face_offsets
    }

    /// Fan triangulation of every face, for filled drawing.
    pub fn triangle_indices(&self) -> &[u32] {
        &self.triangle_indices
    }

    /// Each edge once, as index pairs, for wireframe drawing.
    pub fn line_indices(&self) -> &[u32] {
        &self.line_indices
    }

    /// Number of vertices in the buffer.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of polygon indices.
    pub fn index_count(&self) -> usize {
        self.polygon_indices.len()
    }

    /// Number of triangles in the fan triangulation.
    pub fn triangle_count(&self) -> usize {
        self.triangle_indices.len() / 3
    }

    /// Number of wireframe lines.
    pub fn line_count(&self) -> usize {
        self.line_indices.len() / 2
    }

    /// Convert the triangle mesh to quads.
    pub fn to_quad_mesh(&mut self, options: &QuadOptions) -> Result<QuadReport> {
        let report = tri_to_quad(&mut self.mesh, options)?;
        self.rebuild_lists();
        Ok(report)
    }

    /// Simplify the quad mesh.
    pub fn simplify(&mut self, options: &SimplifyOptions) -> Result<SimplifyReport> {
        let report = simplify_quads(&mut self.mesh, options)?;
        self.rebuild_lists();
        Ok(report)
    }

    /// Drop the CPU copies of the buffers, e.g. once they are uploaded.
    pub fn clean_lists(&mut self) {
        self.vertices = Vec::new();
        self.polygon_indices = Vec::new();
        self.face_offsets = Vec::new();
        self.triangle_indices = Vec::new();
        self.line_indices = Vec::new();
    }

    /// Recompute every buffer from the mesh.
    pub fn rebuild_lists(&mut self) {
        let mesh = &self.mesh;

        self.vertices = mesh
            .vertex_ids()
            .map(|v| GpuVertex {
                position: to_f32(mesh.position(v).coords),
                normal: to_f32(mesh.vertex_normal(v)),
            })
            .collect();

        self.polygon_indices.clear();
        self.face_offsets.clear();
        self.triangle_indices.clear();
        for f in mesh.face_ids() {
            self.face_offsets.push(self.polygon_indices.len());
            let start = self.polygon_indices.len();
            self.polygon_indices
                .extend(mesh.face_vertices(f).map(|v| v.index() as u32));

            let corners = &self.polygon_indices[start..];
            for k in 1..corners.len() - 1 {
                self.triangle_indices
                    .extend_from_slice(&[corners[0], corners[k], corners[k + 1]]);
            }
        }
        self.face_offsets.push(self.polygon_indices.len());

        self.line_indices = mesh
            .edge_halfedges()
            .flat_map(|he| [mesh.origin(he).index() as u32, mesh.dest(he).index() as u32])
            .collect();
    }

    /// Rotate by `degrees` around `axis`, after any previous rotation.
    pub fn rotate(&mut self, axis: RotationAxis, degrees: f32) {
        let rotation = Matrix4::from_axis_angle(&axis.unit(), degrees.to_radians());
        self.model *= rotation;
    }

    /// The object-to-world transform.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.model
    }

    /// Reset the model transform to identity.
    pub fn reset_transform(&mut self) {
        self.model = Matrix4::identity();
    }

    /// Write the mesh as OBJ.
    pub fn save_obj<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        io::obj::save(&self.mesh, path)
    }

    /// Point `camera` at the whole object.
    pub fn frame(&self, camera: &mut Camera) {
        if let Some((min, max)) = self.mesh.bounding_box() {
            camera.look_at_bounds(&min.cast::<f32>(), &max.cast::<f32>());
        }
    }
}

fn to_f32(v: Vector3<f64>) -> [f32; 3] {
    [v.x as f32, v.y as f32, v.z as f32]
}

impl From<HalfEdgeMesh> for Object {
    fn from(mesh: HalfEdgeMesh) -> Self {
        Self::from_mesh(mesh)
    }
}
