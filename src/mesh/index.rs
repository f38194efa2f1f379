//! Typed indices for mesh elements.
//!
//! Vertices, half-edges, faces and full edges are addressed by distinct
//! newtypes so they cannot be mixed up. The storage integer is chosen by the
//! [`MeshIndex`] parameter: `u16` for small meshes, `u32` (default) for most,
//! `u64` when counts exceed four billion.

use std::fmt::{self, Debug, Display};
use std::hash::Hash;

/// Integer types usable as mesh indices.
pub trait MeshIndex:
    Copy + Clone + Eq + PartialEq + Ord + PartialOrd + Hash + Debug + Send + Sync + 'static
{
    /// The largest index that can be stored.
    const MAX: Self;

    /// Sentinel meaning "no element".
    const INVALID: Self;

    /// Convert from usize.
    ///
    /// # Panics
    /// Debug builds panic if the value does not fit.
    fn from_usize(v: usize) -> Self;

    /// Convert to usize.
    fn to_usize(self) -> usize;

    /// Whether this is a real index rather than the sentinel.
    fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

macro_rules! impl_mesh_index {
    ($ty:ty) => {
        impl MeshIndex for $ty {
            const MAX: Self = <$ty>::MAX - 1;
            const INVALID: Self = <$ty>::MAX;

            #[inline]
            fn from_usize(v: usize) -> Self {
                debug_assert!(
                    v <= Self::MAX as usize,
                    "index {} too large for {}",
                    v,
                    stringify!($ty)
                );
                v as $ty
            }

            #[inline]
            fn to_usize(self) -> usize {
                self as usize
            }
        }
    };
}

impl_mesh_index!(u16);
impl_mesh_index!(u32);
impl_mesh_index!(u64);

/// Index of a vertex.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId<I: MeshIndex = u32>(I);

/// Index of a half-edge.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId<I: MeshIndex = u32>(I);

/// Index of a face.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId<I: MeshIndex = u32>(I);

/// Index of a full edge (a pair of twin half-edges).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct EdgeId<I: MeshIndex = u32>(I);

macro_rules! impl_index_type {
    ($name:ident, $prefix:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Create an index from a raw position.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(I::from_usize(index))
            }

            /// The "no element" index.
            #[inline]
            pub fn invalid() -> Self {
                Self(I::INVALID)
            }

            /// Position in the owning array.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }

            /// The underlying integer.
            #[inline]
            pub fn raw(self) -> I {
                self.0
            }

            /// Whether this refers to an element.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0.is_valid()
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}{}", $prefix, self.index())
                } else {
                    write!(f, "{}-", $prefix)
                }
            }
        }

        impl<I: MeshIndex> Display for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                Debug::fmt(self, f)
            }
        }

        impl<I: MeshIndex> Default for $name<I> {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl<I: MeshIndex> From<usize> for $name<I> {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "v");
impl_index_type!(HalfEdgeId, "he");
impl_index_type!(FaceId, "f");
impl_index_type!(EdgeId, "e");
