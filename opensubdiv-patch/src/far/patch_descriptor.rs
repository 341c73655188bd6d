//! Patch types and bases.
use num_enum::TryFromPrimitive;

/// The type of a parametric patch.
#[repr(u32)]
#[derive(TryFromPrimitive, Display, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PatchType {
    /// Undefined patch type.
    NonPatch = 0,
    /// Points (for per-vertex data).
    Points,
    /// Lines (for per-edge data).
    Lines,
    /// Bilinear quads.
    Quads,
    /// Linear triangles.
    Triangles,
    /// Quartic triangular Box-spline patch, the regular *Loop* patch.
    Loop,
    /// Bicubic B-spline patch, the regular *Catmull-Clark* patch.
    Regular,
    /// Legacy Gregory patch.
    Gregory,
    /// Legacy Gregory boundary patch.
    GregoryBoundary,
    /// Bicubic Gregory patch with 20 control points.
    GregoryBasis,
    /// Quartic triangular Gregory patch with 18 control points.
    GregoryTriangle,
}

impl PatchType {
    /// Returns the number of control vertices of a patch of this type.
    #[inline]
    pub fn control_vertex_count(&self) -> usize {
        match self {
            PatchType::NonPatch => 0,
            PatchType::Points => 1,
            PatchType::Lines => 2,
            PatchType::Quads => 4,
            PatchType::Triangles => 3,
            PatchType::Loop => 12,
            PatchType::Regular => 16,
            PatchType::Gregory | PatchType::GregoryBoundary => 4,
            PatchType::GregoryBasis => 20,
            PatchType::GregoryTriangle => 18,
        }
    }

    /// Returns `true` if the type is a regular patch of either scheme.
    #[inline]
    pub fn is_regular(&self) -> bool {
        matches!(self, PatchType::Regular | PatchType::Loop)
    }

    /// Returns `true` if the type is any kind of Gregory patch.
    #[inline]
    pub fn is_gregory(&self) -> bool {
        matches!(
            self,
            PatchType::Gregory
                | PatchType::GregoryBoundary
                | PatchType::GregoryBasis
                | PatchType::GregoryTriangle
        )
    }

    /// Returns `true` if the type is defined over a triangle.
    #[inline]
    pub fn is_triangular(&self) -> bool {
        matches!(
            self,
            PatchType::Triangles | PatchType::Loop | PatchType::GregoryTriangle
        )
    }
}

/// The basis of the patches a [`PatchBuilder`](super::PatchBuilder) produces.
///
/// The patch type for a basis depends on the subdivision scheme, see
/// [`PatchBuilder::patch_type_from_basis()`](super::PatchBuilder::patch_type_from_basis).
#[repr(u32)]
#[derive(TryFromPrimitive, Display, Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BasisType {
    /// No basis given. For irregular patches this means: same as regular.
    #[default]
    Unspecified = 0,
    /// The regular basis of the scheme (B-spline, Box-spline).
    Regular,
    /// Gregory basis.
    Gregory,
    /// Linear basis (bilinear quads, linear triangles).
    Linear,
    /// Bezier basis.
    Bezier,
}
