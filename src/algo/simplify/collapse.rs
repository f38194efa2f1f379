//! Diagonal collapse and doublet removal on face-vertex quads.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use nalgebra::Point3;
use rayon::prelude::*;

use crate::error::Result;
use crate::maths::midpoint;
use crate::mesh::{build_from_quads, to_face_vertex_quads, HalfEdgeMesh, MeshIndex};

use super::diagonal::pick_diagonal;

/// A heap entry for one quad.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    face: usize,
    keep: usize,
    remove: usize,
    priority: f64,
    /// Face version at creation, to detect stale entries.
    version: usize,
}

// Implement ordering for min-heap (smallest priority first)
impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.face.cmp(&self.face))
            .then_with(|| other.version.cmp(&self.version))
    }
}

/// Working state of a simplification run.
pub(super) struct QuadCollapser {
    vertices: Vec<Point3<f64>>,
    faces: Vec<[usize; 4]>,
    face_alive: Vec<bool>,
    vertex_alive: Vec<bool>,
    boundary: Vec<bool>,
    vertex_faces: Vec<Vec<usize>>,
    face_version: Vec<usize>,
    weights: Vec<f64>,
    max_diagonal: Option<f64>,
    heap: BinaryHeap<Candidate>,
    live_faces: usize,
    pub(super) collapses: usize,
    pub(super) doublets_removed: usize,
}

impl QuadCollapser {
    pub(super) fn new<I: MeshIndex>(
        mesh: &HalfEdgeMesh<I>,
        weights: Option<&[f64]>,
        max_diagonal: Option<f64>,
        parallel: bool,
    ) -> Self {
        let (vertices, faces) = to_face_vertex_quads(mesh);
        let boundary: Vec<bool> = mesh
            .vertex_ids()
            .map(|v| mesh.is_boundary_vertex(v))
            .collect();

        let mut vertex_faces: Vec<Vec<usize>> = vec![Vec::new(); vertices.len()];
        for (fi, face) in faces.iter().enumerate() {
            for &v in face {
                vertex_faces[v].push(fi);
            }
        }

        let weights = match weights {
            Some(w) => w.to_vec(),
            None => vec![1.0; faces.len()],
        };

        let mut state = Self {
            vertex_alive: vec![true; vertices.len()],
            face_alive: vec![true; faces.len()],
            face_version: vec![0; faces.len()],
            live_faces: faces.len(),
            vertices,
            faces,
            boundary,
            vertex_faces,
            weights,
            max_diagonal,
            heap: BinaryHeap::new(),
            collapses: 0,
            doublets_removed: 0,
        };

        let initial: Vec<Candidate> = if parallel {
            (0..state.faces.len())
                .into_par_iter()
                .filter_map(|fi| state.candidate(fi))
                .collect()
        } else {
            (0..state.faces.len())
                .filter_map(|fi| state.candidate(fi))
                .collect()
        };
        state.heap = initial.into();

        state
    }

    pub(super) fn live_faces(&self) -> usize {
        self.live_faces
    }

    fn candidate(&self, fi: usize) -> Option<Candidate> {
        let face = &self.faces[fi];
        let (a, b, length) = pick_diagonal(face.map(|v| &self.vertices[v]));
        if self.max_diagonal.is_some_and(|max| length > max) {
            return None;
        }
        Some(Candidate {
            face: fi,
            keep: face[a],
            remove: face[b],
            priority: length * self.weights[fi],
            version: self.face_version[fi],
        })
    }

    fn touch(&mut self, fi: usize) {
        self.face_version[fi] += 1;
        if let Some(c) = self.candidate(fi) {
            self.heap.push(c);
        }
    }

    /// Remove every doublet currently in the mesh.
    pub(super) fn clean_all_doublets(&mut self) {
        let all: Vec<usize> = (0..self.vertices.len()).collect();
        self.clean_doublets(all);
    }

    /// Collapse the cheapest valid diagonal. Returns `false` once the heap
    /// is exhausted.
    pub(super) fn step(&mut self) -> bool {
        while let Some(c) = self.heap.pop() {
            if !self.face_alive[c.face] || c.version != self.face_version[c.face] {
                continue;
            }
            if self.try_collapse(&c) {
                return true;
            }
        }
        false
    }

    fn try_collapse(&mut self, c: &Candidate) -> bool {
        let (keep, remove, f) = (c.keep, c.remove, c.face);

        if self.boundary[keep] || self.boundary[remove] {
            return false;
        }

        // The endpoints may only meet in the collapsing quad
        if self.vertex_faces[keep]
            .iter()
            .any(|&g| g != f && self.faces[g].contains(&remove))
        {
            return false;
        }

        if !self.collapse_keeps_manifold(keep, remove, f) {
            return false;
        }

        let quad = self.faces[f];
        self.vertices[keep] = midpoint(&self.vertices[keep], &self.vertices[remove]);

        self.face_alive[f] = false;
        self.live_faces -= 1;
        for &v in &quad {
            self.vertex_faces[v].retain(|&g| g != f);
        }

        let moved = std::mem::take(&mut self.vertex_faces[remove]);
        for &g in &moved {
            for v in self.faces[g].iter_mut() {
                if *v == remove {
                    *v = keep;
                }
            }
        }
        self.vertex_faces[keep].extend(moved);
        self.vertex_alive[remove] = false;

        for g in self.vertex_faces[keep].clone() {
            self.touch(g);
        }
        self.collapses += 1;

        // The side corners lost a face and may now be doublets
        let worklist: Vec<usize> = quad.iter().copied().filter(|&v| v != remove).collect();
        self.clean_doublets(worklist);

        true
    }

    /// After merging `remove` into `keep`, every affected face must keep
    /// four distinct corners and no directed edge may appear twice.
    fn collapse_keeps_manifold(&self, keep: usize, remove: usize, f: usize) -> bool {
        let mut edges: HashSet<(usize, usize)> = HashSet::new();
        let affected = self.vertex_faces[keep]
            .iter()
            .chain(&self.vertex_faces[remove])
            .filter(|&&g| g != f);

        for &g in affected {
            let face = self.faces[g].map(|v| if v == remove { keep } else { v });
            for k in 0..4 {
                if face[..k].contains(&face[k]) {
                    return false;
                }
                if !edges.insert((face[k], face[(k + 1) % 4])) {
                    return false;
                }
            }
        }
        true
    }

    fn clean_doublets(&mut self, mut worklist: Vec<usize>) {
        while let Some(v) = worklist.pop() {
            if let Some((p, q)) = self.remove_doublet(v) {
                worklist.push(p);
                worklist.push(q);
            }
        }
    }

    /// Remove interior vertex `v` if exactly two quads meet there, merging
    /// them into one. Returns the two vertices that were `v`'s neighbours.
    fn remove_doublet(&mut self, v: usize) -> Option<(usize, usize)> {
        if !self.vertex_alive[v] || self.boundary[v] || self.vertex_faces[v].len() != 2 {
            return None;
        }
        let (g, h) = (self.vertex_faces[v][0], self.vertex_faces[v][1]);

        // g = [v, p, x, q], h = [v, q, y, p]
        let [_, p, x, q] = rotate_to(&self.faces[g], v)?;
        let [_, q2, y, p2] = rotate_to(&self.faces[h], v)?;
        if p != p2 || q != q2 || x == y {
            return None;
        }

        self.faces[g] = [p, x, q, y];
        self.face_alive[h] = false;
        self.live_faces -= 1;
        self.vertex_alive[v] = false;
        self.vertex_faces[v].clear();

        self.vertex_faces[p].retain(|&k| k != h);
        self.vertex_faces[q].retain(|&k| k != h);
        for k in self.vertex_faces[y].iter_mut() {
            if *k == h {
                *k = g;
            }
        }

        self.touch(g);
        self.doublets_removed += 1;
        Some((p, q))
    }

    /// Compact the surviving quads and rebuild the half-edge mesh.
    ///
    /// Surviving vertices keep their relative order.
    pub(super) fn finish<I: MeshIndex>(self) -> Result<HalfEdgeMesh<I>> {
        let live: Vec<&[usize; 4]> = self
            .faces
            .iter()
            .zip(&self.face_alive)
            .filter_map(|(face, &alive)| alive.then_some(face))
            .collect();

        let mut used = vec![false; self.vertices.len()];
        for face in &live {
            for &v in face.iter() {
                used[v] = true;
            }
        }

        let mut vertex_map: Vec<usize> = vec![usize::MAX; self.vertices.len()];
        let mut new_vertices: Vec<Point3<f64>> = Vec::new();
        for (v, _) in used.iter().enumerate().filter(|(_, &u)| u) {
            vertex_map[v] = new_vertices.len();
            new_vertices.push(self.vertices[v]);
        }

        let new_faces: Vec<[usize; 4]> = live
            .iter()
            .map(|face| face.map(|v| vertex_map[v]))
            .collect();

        build_from_quads(&new_vertices, &new_faces)
    }
}

/// `face` rotated so that it starts at `v`.
fn rotate_to(face: &[usize; 4], v: usize) -> Option<[usize; 4]> {
    let k = face.iter().position(|&u| u == v)?;
    Some([face[k], face[(k + 1) % 4], face[(k + 2) % 4], face[(k + 3) % 4]])
}
