//#![warn(missing_docs)]
//! # Subdivision Surface Patch Conversion
//!
//! Pure Rust conversion of the local topology around a face of a
//! [subdivision surface](https://en.wikipedia.org/wiki/Subdivision_surface)
//! into the control points of an equivalent parametric patch, in the manner
//! of [*Pixar’s OpenSubdiv*](https://graphics.pixar.com/opensubdiv/)
//! `Far::PatchBuilder`.
//!
//! The result of every conversion is a [`SparseMatrix`](far::SparseMatrix):
//! one row per patch control point, each row a short list of
//! `(source point, weight)` pairs. Applying the matrix to the positions (or
//! any other primvar) of the source points yields the patch control points.
//!
//! Supported conversions:
//!
//! | Scheme          | Patch type                                   | Rows |
//! |-----------------|----------------------------------------------|------|
//! | *Catmull-Clark* | [`GregoryBasis`](far::PatchType::GregoryBasis)       | 20   |
//! | *Catmull-Clark* | [`Regular`](far::PatchType::Regular) (B-spline)      | 16   |
//! | *Catmull-Clark* | [`Quads`](far::PatchType::Quads) (linear)            | 4    |
//! | *Loop*          | [`GregoryTriangle`](far::PatchType::GregoryTriangle) | 18   |
//! | *Loop*          | [`Loop`](far::PatchType::Loop) (Box-spline)          | 12   |
//! | *Loop*          | [`Triangles`](far::PatchType::Triangles) (linear)    | 3    |
//!
//! ```
//! use opensubdiv_patch::far::{
//!     PatchBuilder, PatchBuilderOptions, PatchType, SourcePatch, SourcePatchCorner, SparseMatrix,
//! };
//! use opensubdiv_patch::sdc::Scheme;
//!
//! // A regular interior quad: four corners of valence four.
//! let corner = SourcePatchCorner {
//!     num_faces: 4,
//!     ..Default::default()
//! };
//! let source = SourcePatch::new(&[corner; 4])?;
//! assert_eq!(source.point_count(), 16);
//!
//! let builder = PatchBuilder::new(Scheme::CatmullClark, PatchBuilderOptions::default())?;
//! let mut matrix = SparseMatrix::<f32>::default();
//! let rows = builder.convert_to_patch_type(&source, PatchType::Regular, &mut matrix)?;
//! assert_eq!(rows, 16);
//! # Ok::<(), opensubdiv_patch::Error>(())
//! ```
//!
//! ## Features
#![doc = document_features::document_features!()]
//!
//! ## API Changes From C++
//!
//! * Precondition asserts at the conversion entry points became [`Result`]s.
//!   Numerical preconditions of the limit masks remain debug assertions.
//! * Unsigned types (`usize`, [`Index`]) are used for anything that can only
//!   contain positive values.
//! * Options use the [init struct pattern](https://xaeroxe.github.io/init-struct-pattern/).

#[macro_use]
extern crate derive_more;

pub mod error;
pub mod far;
pub mod real;
pub mod sdc;

pub use error::{Error, Result};
pub use real::Real;

/// A source point index in a [`SparseMatrix`](far::SparseMatrix) row.
///
/// # Examples
///
/// ```
/// use opensubdiv_patch::Index;
///
/// // Create an index from a u32
/// let idx = Index::from(42u32);
/// assert_eq!(idx.0, 42);
///
/// // Create from usize
/// let idx = Index::from(100usize);
/// let as_usize: usize = idx.into();
/// assert_eq!(as_usize, 100);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, bytemuck::Pod, bytemuck::Zeroable,
)]
#[repr(transparent)]
pub struct Index(pub u32);

impl From<u32> for Index {
    #[inline]
    fn from(value: u32) -> Self {
        Index(value)
    }
}

impl From<Index> for u32 {
    #[inline]
    fn from(index: Index) -> Self {
        index.0
    }
}

impl From<usize> for Index {
    #[inline]
    fn from(value: usize) -> Self {
        Index(value as u32)
    }
}

impl From<Index> for usize {
    #[inline]
    fn from(index: Index) -> Self {
        index.0 as usize
    }
}
