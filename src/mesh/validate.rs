//! Structural consistency checks.
//!
//! [`HalfEdgeMesh::check_correctness`] walks every element and reports the
//! first broken link it finds. Algorithms call it in debug builds after
//! rebuilding a mesh; tests call it on every result.

use super::halfedge::HalfEdgeMesh;
use super::index::{HalfEdgeId, MeshIndex};
use crate::error::{MeshError, Result};

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Check the connectivity of the whole mesh.
    ///
    /// Verified for every element:
    /// - a vertex's half-edge originates at that vertex
    /// - `twin(twin(he)) == he` and twins have swapped endpoints
    /// - `next` and `prev` are mutual
    /// - every half-edge of a face loop points back to that face
    /// - face loops have at least three half-edges and chain head-to-tail
    pub fn check_correctness(&self) -> Result<()> {
        let nh = self.num_halfedges();
        let in_range = |he: HalfEdgeId<I>| he.is_valid() && he.index() < nh;

        for (vid, v) in self.vertices() {
            if !v.halfedge.is_valid() {
                continue;
            }
            if !in_range(v.halfedge) || self.origin(v.halfedge) != vid {
                return Err(broken(format!("{vid} -> {} does not leave {vid}", v.halfedge)));
            }
        }

        for he in self.halfedge_ids() {
            let h = self.halfedge(he);
            if !in_range(h.twin) || !in_range(h.next) || !in_range(h.prev) {
                return Err(broken(format!("{he} has a dangling link")));
            }
            if !self.check_halfedge(he) {
                return Err(broken(format!("{he} is inconsistent with its neighbours")));
            }
        }

        for (fid, f) in self.faces() {
            if !in_range(f.halfedge) {
                return Err(broken(format!("{fid} has no half-edge")));
            }
            let mut count = 0usize;
            let mut he = f.halfedge;
            loop {
                if self.face_of(he) != fid {
                    return Err(broken(format!("{he} in loop of {fid} points to {}", self.face_of(he))));
                }
                count += 1;
                if count > nh {
                    return Err(broken(format!("loop of {fid} does not close")));
                }
                he = self.next(he);
                if he == f.halfedge {
                    break;
                }
            }
            if count < 3 {
                return Err(broken(format!("{fid} has only {count} sides")));
            }
        }

        Ok(())
    }

    /// Check if the mesh connectivity is consistent.
    pub fn is_valid(&self) -> bool {
        self.check_correctness().is_ok()
    }

    /// Check one half-edge against its twin and loop neighbours.
    pub fn check_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        let get = |id: HalfEdgeId<I>| self.halfedges.get(id.index()).filter(|_| id.is_valid());
        let Some(h) = get(he) else {
            return false;
        };
        let (Some(twin), Some(next), Some(prev)) = (get(h.twin), get(h.next), get(h.prev)) else {
            return false;
        };
        let Some(twin_next) = get(twin.next) else {
            return false;
        };

        twin.twin == he
            && h.twin != he
            && twin_next.origin == h.origin
            && next.origin == twin.origin
            && next.prev == he
            && prev.next == he
            && next.face == h.face
    }
}

fn broken(details: String) -> MeshError {
    MeshError::InvalidState(details)
}
