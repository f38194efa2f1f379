//! Human-readable summaries of a mesh.

use std::fmt;

use super::halfedge::HalfEdgeMesh;
use super::index::MeshIndex;

/// Element counts of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshStats {
    /// Number of vertices.
    pub vertices: usize,
    /// Number of faces.
    pub faces: usize,
    /// Number of undirected edges.
    pub edges: usize,
    /// Number of half-edges, boundary ones included.
    pub halfedges: usize,
    /// Faces with three sides.
    pub triangles: usize,
    /// Faces with four sides.
    pub quads: usize,
    /// Faces with five or more sides.
    pub other: usize,
    /// Vertices on a boundary loop.
    pub boundary_vertices: usize,
}

impl fmt::Display for MeshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Vertices:   {}", self.vertices)?;
        writeln!(f, "Faces:      {}", self.faces)?;
        writeln!(f, "  Triangles: {}", self.triangles)?;
        writeln!(f, "  Quads:     {}", self.quads)?;
        writeln!(f, "  Other:     {}", self.other)?;
        writeln!(f, "Edges:      {}", self.edges)?;
        writeln!(f, "Half-edges: {}", self.halfedges)?;
        write!(f, "Boundary vertices: {}", self.boundary_vertices)
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Count the elements of the mesh.
    pub fn stats(&self) -> MeshStats {
        let mut stats = MeshStats {
            vertices: self.num_vertices(),
            faces: self.num_faces(),
            edges: self.num_edges(),
            halfedges: self.num_halfedges(),
            ..MeshStats::default()
        };
        for f in self.face_ids() {
            match self.face_vertex_count(f) {
                3 => stats.triangles += 1,
                4 => stats.quads += 1,
                _ => stats.other += 1,
            }
        }
        stats.boundary_vertices = self
            .vertex_ids()
            .filter(|&v| self.is_boundary_vertex(v))
            .count();
        stats
    }

    /// One line per vertex, face and half-edge.
    ///
    /// ```text
    /// v3 -> he7
    /// f1 -> he4 [v0, v2, v5]
    /// he7 -> v3 v5 twin he8 next he9 prev he6 f1
    /// ```
    ///
    /// Boundary half-edges print `f-` as their face.
    pub fn describe(&self) -> Vec<String> {
        let mut lines =
            Vec::with_capacity(self.num_vertices() + self.num_faces() + self.num_halfedges());

        for (vid, v) in self.vertices() {
            lines.push(format!("{vid} -> {}", v.halfedge));
        }

        for (fid, f) in self.faces() {
            let verts: Vec<String> = self.face_vertices(fid).map(|v| v.to_string()).collect();
            lines.push(format!("{fid} -> {} [{}]", f.halfedge, verts.join(", ")));
        }

        for (heid, he) in self.halfedges() {
            lines.push(format!(
                "{heid} -> {} {} twin {} next {} prev {} {}",
                he.origin,
                self.dest(heid),
                he.twin,
                he.next,
                he.prev,
                he.face
            ));
        }

        lines
    }
}
