//! Half-edge mesh data structure for polygon meshes.
//!
//! # Structure
//!
//! - Each edge is split into two **half-edges** pointing in opposite directions
//! - Each half-edge knows its **twin**, the **next** and **prev** half-edges
//!   around its face, its **origin** vertex and its **face**
//! - Each vertex stores one outgoing half-edge
//! - Each face stores one half-edge of its loop
//!
//! Faces may have any number of sides, so the same structure holds the
//! triangle input, the mixed mesh produced while pairing triangles, and the
//! final quad mesh.
//!
//! # Winged-edge vocabulary
//!
//! For a half-edge `he` going from `a` to `b`, the *left* face is
//! `face_of(he)` and the *right* face is `face_of(twin(he))`. The CCW
//! neighbour on the left is `next(he)`, the CW one is `prev(he)`.
//!
//! # Boundary Handling
//!
//! Boundary half-edges have an invalid face ID and are linked into loops
//! through `next`/`prev`.

use nalgebra::{Point3, Vector3};

use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One outgoing half-edge from this vertex.
    /// For boundary vertices, this is a boundary half-edge.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new, unconnected vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::invalid(),
        }
    }

    /// Create a new vertex from coordinates.
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }
}

/// A half-edge in the mesh.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge originates from.
    pub origin: VertexId<I>,

    /// The opposite half-edge.
    pub twin: HalfEdgeId<I>,

    /// The next half-edge around the face (counter-clockwise).
    pub next: HalfEdgeId<I>,

    /// The previous half-edge around the face.
    pub prev: HalfEdgeId<I>,

    /// The face on the left. Invalid for boundary half-edges.
    pub face: FaceId<I>,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create a new unconnected half-edge.
    pub fn new() -> Self {
        Self {
            origin: VertexId::invalid(),
            twin: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
        }
    }

    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.face.is_valid()
    }
}

impl<I: MeshIndex> Default for HalfEdge<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// A face in the half-edge mesh.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// One half-edge of this face's loop.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Face<I> {
    /// Create a new face with the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self { halfedge }
    }
}

impl<I: MeshIndex> Default for Face<I> {
    fn default() -> Self {
        Self {
            halfedge: HalfEdgeId::invalid(),
        }
    }
}

/// A half-edge polygon mesh.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Vertex<I>>,
    pub(crate) halfedges: Vec<HalfEdge<I>>,
    pub(crate) faces: Vec<Face<I>>,
}

impl<I: MeshIndex> Default for HalfEdgeMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with room for the given number of elements.
    pub fn with_capacity(num_vertices: usize, num_faces: usize, num_halfedges: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_halfedges),
            faces: Vec::with_capacity(num_faces),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges, boundary half-edges included.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of full edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.halfedges.len() / 2
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by ID.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        &mut self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    /// Get a mutable half-edge by ID.
    #[inline]
    pub fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        &mut self.halfedges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) {
        self.vertex_mut(v).position = pos;
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).prev
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(self.twin(he))
    }

    /// Get the face of a half-edge (its left face).
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Get the face on the other side of a half-edge (its right face).
    #[inline]
    pub fn opposite_face(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.face_of(self.twin(he))
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Check if a vertex is on the boundary (or isolated).
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        if !self.vertex(v).halfedge.is_valid() {
            return true;
        }
        self.vertex_halfedges(v)
            .any(|he| self.is_boundary_halfedge(he))
    }

    /// Check if an edge (represented by one of its half-edges) is on the boundary.
    #[inline]
    pub fn is_boundary_edge(&self, he: HalfEdgeId<I>) -> bool {
        self.is_boundary_halfedge(he) || self.is_boundary_halfedge(self.twin(he))
    }

    /// Find the half-edge going from `from` to `to`, if the edge exists.
    pub fn find_halfedge(&self, from: VertexId<I>, to: VertexId<I>) -> Option<HalfEdgeId<I>> {
        self.vertex_halfedges(from).find(|&he| self.dest(he) == to)
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex<I>)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all half-edges with their IDs.
    pub fn halfedges(&self) -> impl Iterator<Item = (HalfEdgeId<I>, &HalfEdge<I>)> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .map(|(i, he)| (HalfEdgeId::new(i), he))
    }

    /// Iterate over one half-edge per full edge.
    ///
    /// The representative is the half-edge with the smaller index.
    pub fn edge_halfedges(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        self.halfedge_ids().filter(move |&he| he < self.twin(he))
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over all faces with their IDs.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId<I>, &Face<I>)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, f)| (FaceId::new(i), f))
    }

    /// Iterate over outgoing half-edges around a vertex.
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> VertexHalfEdgeIter<'_, I> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Iterate over vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| self.dest(he))
    }

    /// Iterate over faces adjacent to a vertex.
    pub fn vertex_faces(&self, v: VertexId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.vertex_halfedges(v).filter_map(|he| {
            let f = self.face_of(he);
            if f.is_valid() {
                Some(f)
            } else {
                None
            }
        })
    }

    /// Iterate over half-edges around a face.
    pub fn face_halfedges(&self, f: FaceId<I>) -> FaceHalfEdgeIter<'_, I> {
        FaceHalfEdgeIter::new(self, self.face(f).halfedge)
    }

    /// Iterate over half-edges of a loop starting at `start`.
    ///
    /// Works for face loops and boundary loops alike.
    pub fn loop_halfedges(&self, start: HalfEdgeId<I>) -> FaceHalfEdgeIter<'_, I> {
        FaceHalfEdgeIter::new(self, start)
    }

    /// Iterate over vertices of a face.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    /// Number of vertices (equivalently sides) of a face.
    pub fn face_vertex_count(&self, f: FaceId<I>) -> usize {
        self.face_halfedges(f).count()
    }

    /// Get the three vertices of a triangular face.
    ///
    /// Only meaningful for triangles; for larger faces the first three
    /// vertices of the loop are returned.
    pub fn face_triangle(&self, f: FaceId<I>) -> [VertexId<I>; 3] {
        let he0 = self.face(f).halfedge;
        let he1 = self.next(he0);
        let he2 = self.next(he1);
        [self.origin(he0), self.origin(he1), self.origin(he2)]
    }

    /// Get the four vertices of a quad face.
    pub fn face_quad(&self, f: FaceId<I>) -> [VertexId<I>; 4] {
        let he0 = self.face(f).halfedge;
        let he1 = self.next(he0);
        let he2 = self.next(he1);
        let he3 = self.next(he2);
        [
            self.origin(he0),
            self.origin(he1),
            self.origin(he2),
            self.origin(he3),
        ]
    }

    /// Positions of the vertices of a face, in loop order.
    pub fn face_positions(&self, f: FaceId<I>) -> Vec<Point3<f64>> {
        self.face_vertices(f).map(|v| *self.position(v)).collect()
    }

    // ==================== Face kinds ====================

    /// Whether a face is a triangle.
    pub fn is_triangle(&self, f: FaceId<I>) -> bool {
        self.face_vertex_count(f) == 3
    }

    /// Whether a face is a quad.
    pub fn is_quad(&self, f: FaceId<I>) -> bool {
        self.face_vertex_count(f) == 4
    }

    /// Whether every face is a triangle.
    pub fn is_triangle_mesh(&self) -> bool {
        self.num_faces() > 0 && self.face_ids().all(|f| self.is_triangle(f))
    }

    /// Whether every face is a quad.
    pub fn is_quad_mesh(&self) -> bool {
        self.num_faces() > 0 && self.face_ids().all(|f| self.is_quad(f))
    }

    /// Number of triangular faces.
    pub fn count_triangles(&self) -> usize {
        self.face_ids().filter(|&f| self.is_triangle(f)).count()
    }

    /// Number of quad faces.
    pub fn count_quads(&self) -> usize {
        self.face_ids().filter(|&f| self.is_quad(f)).count()
    }

    /// First triangle in index order, if any.
    pub fn first_triangle(&self) -> Option<FaceId<I>> {
        self.face_ids().find(|&f| self.is_triangle(f))
    }

    // ==================== Face adjacency ====================

    /// The half-edge of `f1` whose twin lies in `f2`, if the faces share an edge.
    pub fn edge_between(&self, f1: FaceId<I>, f2: FaceId<I>) -> Option<HalfEdgeId<I>> {
        self.face_halfedges(f1)
            .find(|&he| self.opposite_face(he) == f2)
    }

    /// All half-edges of `f1` whose twin lies in `f2`.
    pub fn shared_edges(&self, f1: FaceId<I>, f2: FaceId<I>) -> Vec<HalfEdgeId<I>> {
        self.face_halfedges(f1)
            .filter(|&he| self.opposite_face(he) == f2)
            .collect()
    }

    /// Vertices that belong to both faces, in the loop order of `f1`.
    pub fn common_vertices(&self, f1: FaceId<I>, f2: FaceId<I>) -> Vec<VertexId<I>> {
        let other: Vec<VertexId<I>> = self.face_vertices(f2).collect();
        self.face_vertices(f1)
            .filter(|v| other.contains(v))
            .collect()
    }

    /// Faces sharing an edge with `f`, without duplicates.
    pub fn face_neighbors(&self, f: FaceId<I>) -> Vec<FaceId<I>> {
        let mut out: Vec<FaceId<I>> = Vec::new();
        for he in self.face_halfedges(f) {
            let g = self.opposite_face(he);
            if g.is_valid() && g != f && !out.contains(&g) {
                out.push(g);
            }
        }
        out
    }

    /// Faces sharing at least one vertex with `f`, without duplicates.
    pub fn face_ring(&self, f: FaceId<I>) -> Vec<FaceId<I>> {
        let mut out: Vec<FaceId<I>> = Vec::new();
        for v in self.face_vertices(f) {
            for g in self.vertex_faces(v) {
                if g != f && !out.contains(&g) {
                    out.push(g);
                }
            }
        }
        out
    }

    /// The vertex across the quad from `v`, or `None` if `f` is not a quad
    /// or does not contain `v`.
    pub fn opposite_vertex(&self, f: FaceId<I>, v: VertexId<I>) -> Option<VertexId<I>> {
        if !self.is_quad(f) {
            return None;
        }
        let he = self.face_halfedges(f).find(|&he| self.origin(he) == v)?;
        Some(self.origin(self.next(self.next(he))))
    }

    // ==================== Geometry ====================

    /// Normal of a face using Newell's method (works for any planar-ish polygon).
    pub fn face_normal(&self, f: FaceId<I>) -> Vector3<f64> {
        let n = self.newell_vector(f);
        let len = n.norm();
        if len > f64::EPSILON {
            n / len
        } else {
            Vector3::zeros()
        }
    }

    /// Area of a face.
    pub fn face_area(&self, f: FaceId<I>) -> f64 {
        0.5 * self.newell_vector(f).norm()
    }

    fn newell_vector(&self, f: FaceId<I>) -> Vector3<f64> {
        let pts = self.face_positions(f);
        let n = pts.len();
        let mut normal = Vector3::zeros();
        for i in 0..n {
            let a = &pts[i];
            let b = &pts[(i + 1) % n];
            normal.x += (a.y - b.y) * (a.z + b.z);
            normal.y += (a.z - b.z) * (a.x + b.x);
            normal.z += (a.x - b.x) * (a.y + b.y);
        }
        normal
    }

    /// Centroid (vertex average) of a face.
    pub fn face_centroid(&self, f: FaceId<I>) -> Point3<f64> {
        let pts = self.face_positions(f);
        crate::maths::centroid(&pts).unwrap_or_else(Point3::origin)
    }

    /// Sum of the lengths of a face's sides.
    pub fn face_perimeter(&self, f: FaceId<I>) -> f64 {
        self.face_halfedges(f).map(|he| self.edge_length(he)).sum()
    }

    /// Area-weighted normal at a vertex.
    pub fn vertex_normal(&self, v: VertexId<I>) -> Vector3<f64> {
        let mut normal = Vector3::zeros();
        for f in self.vertex_faces(v) {
            normal += self.newell_vector(f);
        }
        let len = normal.norm();
        if len > f64::EPSILON {
            normal / len
        } else {
            Vector3::zeros()
        }
    }

    /// Length of an edge.
    pub fn edge_length(&self, he: HalfEdgeId<I>) -> f64 {
        crate::maths::distance(self.position(self.origin(he)), self.position(self.dest(he)))
    }

    /// Edge vector from origin to destination.
    pub fn edge_vector(&self, he: HalfEdgeId<I>) -> Vector3<f64> {
        self.position(self.dest(he)) - self.position(self.origin(he))
    }

    /// Midpoint of an edge.
    pub fn edge_midpoint(&self, he: HalfEdgeId<I>) -> Point3<f64> {
        crate::maths::midpoint(self.position(self.origin(he)), self.position(self.dest(he)))
    }

    /// Valence (number of incident edges) of a vertex.
    pub fn valence(&self, v: VertexId<I>) -> usize {
        self.vertex_halfedges(v).count()
    }

    /// Axis-aligned bounding box, or `None` for a mesh without vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?.position;
        let mut min = first;
        let mut max = first;
        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }
        Some((min, max))
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    /// Mean edge length, 0 for a mesh without edges.
    pub fn average_edge_length(&self) -> f64 {
        let (sum, count) = self
            .edge_halfedges()
            .fold((0.0, 0usize), |(s, c), he| (s + self.edge_length(he), c + 1));
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    // ==================== Construction ====================

    /// Add a new unconnected vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }
}

/// Iterator over outgoing half-edges around a vertex.
pub struct VertexHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> VertexHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, v: VertexId<I>) -> Self {
        let start = mesh.vertex(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for VertexHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        // he: v -> w, twin: w -> v, next(twin) leaves v again
        self.current = self.mesh.next(self.mesh.twin(self.current));

        if self.current == self.start || !self.current.is_valid() {
            self.done = true;
        }

        Some(result)
    }
}

/// Iterator over the half-edges of a loop (face or boundary).
pub struct FaceHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> FaceHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, start: HalfEdgeId<I>) -> Self {
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for FaceHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);

        if self.current == self.start || !self.current.is_valid() {
            self.done = true;
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_polygons, build_from_triangles};

    fn quad_and_triangle() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.5, 0.0),
        ];
        let faces = vec![vec![0, 1, 2, 3], vec![1, 4, 2]];
        build_from_polygons(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_vertex_creation() {
        let v = Vertex::<u32>::from_coords(1.0, 2.0, 3.0);
        assert_eq!(v.position, Point3::new(1.0, 2.0, 3.0));
        assert!(!v.halfedge.is_valid());
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = HalfEdgeMesh::<u32>::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_halfedges(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(!mesh.is_triangle_mesh());
        assert!(!mesh.is_quad_mesh());
        assert!(mesh.bounding_box().is_none());
    }

    #[test]
    fn test_face_kinds() {
        let mesh = quad_and_triangle();
        let quad = FaceId::new(0);
        let tri = FaceId::new(1);
        assert!(mesh.is_quad(quad));
        assert!(mesh.is_triangle(tri));
        assert_eq!(mesh.count_quads(), 1);
        assert_eq!(mesh.count_triangles(), 1);
        assert_eq!(mesh.first_triangle(), Some(tri));
        assert!(!mesh.is_quad_mesh());
    }

    #[test]
    fn test_face_adjacency() {
        let mesh = quad_and_triangle();
        let quad = FaceId::new(0);
        let tri = FaceId::new(1);

        let he = mesh.edge_between(quad, tri).unwrap();
        assert_eq!(mesh.origin(he), VertexId::new(1));
        assert_eq!(mesh.dest(he), VertexId::new(2));
        assert_eq!(mesh.shared_edges(quad, tri).len(), 1);
        assert_eq!(
            mesh.common_vertices(quad, tri),
            vec![VertexId::new(1), VertexId::new(2)]
        );
        assert_eq!(mesh.face_neighbors(quad), vec![tri]);
        assert_eq!(mesh.face_ring(tri), vec![quad]);
    }

    #[test]
    fn test_opposite_vertex() {
        let mesh = quad_and_triangle();
        let quad = FaceId::new(0);
        assert_eq!(
            mesh.opposite_vertex(quad, VertexId::new(0)),
            Some(VertexId::new(2))
        );
        assert_eq!(mesh.opposite_vertex(quad, VertexId::new(4)), None);
        assert_eq!(mesh.opposite_vertex(FaceId::new(1), VertexId::new(1)), None);
    }

    #[test]
    fn test_polygon_geometry() {
        let mesh = quad_and_triangle();
        let quad = FaceId::new(0);
        assert!((mesh.face_area(quad) - 1.0).abs() < 1e-12);
        assert!((mesh.face_normal(quad).z - 1.0).abs() < 1e-12);
        assert!((mesh.face_perimeter(quad) - 4.0).abs() < 1e-12);
        let c = mesh.face_centroid(quad);
        assert!((c - Point3::new(0.5, 0.5, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_edge_geometry() {
        let mut mesh = quad_and_triangle();
        let bottom = mesh.find_halfedge(VertexId::new(0), VertexId::new(1)).unwrap();
        let shared = mesh.find_halfedge(VertexId::new(1), VertexId::new(2)).unwrap();

        assert_eq!(mesh.edge_vector(bottom), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.edge_midpoint(shared), Point3::new(1.0, 0.5, 0.0));
        assert_eq!(mesh.edge_midpoint(mesh.twin(shared)), Point3::new(1.0, 0.5, 0.0));

        assert!(mesh.is_boundary_edge(bottom));
        assert!(mesh.is_boundary_edge(mesh.twin(bottom)));
        assert!(!mesh.is_boundary_edge(shared));

        let tip = mesh.find_halfedge(VertexId::new(1), VertexId::new(4)).unwrap();
        mesh.set_position(VertexId::new(4), Point3::new(1.0, -1.0, 0.0));
        assert_eq!(*mesh.position(VertexId::new(4)), Point3::new(1.0, -1.0, 0.0));
        assert_eq!(mesh.edge_vector(tip), Vector3::new(0.0, -1.0, 0.0));
        assert!((mesh.edge_length(tip) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_vertex_ring() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();

        for v in mesh.vertex_ids() {
            assert_eq!(mesh.valence(v), 3);
            assert_eq!(mesh.vertex_faces(v).count(), 3);
            assert!(!mesh.is_boundary_vertex(v));
        }
        assert_eq!(mesh.num_edges(), 6);
        assert_eq!(mesh.edge_halfedges().count(), 6);
        assert!(mesh.find_halfedge(VertexId::new(0), VertexId::new(3)).is_some());
    }
}
