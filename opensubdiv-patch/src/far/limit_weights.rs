//! Limit position and tangent masks at a patch corner.
//!
//! Each subdivision scheme provides, for a vertex of given valence, the
//! weights of the vertex and its 1-ring that evaluate its limit position `P`.
//! The same functions optionally produce the edge points `Ep` and `Em` that
//! lie a third of the way along the limit tangents toward the leading and
//! trailing edges of the patch face.
//!
//! Weight vectors are ordered like
//! [`SourcePatch::corner_ring_points()`](super::SourcePatch::corner_ring_points)
//! with the corner vertex itself prepended at index 0.
use crate::Real;

/// Limit masks of a subdivision scheme.
pub trait LimitWeights {
    /// Returns the length of the weight vectors for an interior vertex.
    fn interior_ring_width(valence: usize) -> usize;

    /// Returns the length of the weight vectors for a boundary vertex.
    fn boundary_ring_width(valence: usize) -> usize;

    /// Computes the limit masks of an interior vertex.
    ///
    /// * `valence` – Number of incident edges, `> 0`.
    /// * `face_in_ring` – Position of the patch face in the ring,
    ///   `< valence`.
    /// * `p` – Receives the position mask.
    /// * `edge_points` – Receives the `Ep` and `Em` masks. Pass `None` if only
    ///   the limit position is wanted.
    ///
    /// All slices must hold at least
    /// [`interior_ring_width(valence)`](Self::interior_ring_width) weights.
    fn interior_point_weights<R: Real>(
        valence: usize,
        face_in_ring: usize,
        p: &mut [R],
        edge_points: Option<(&mut [R], &mut [R])>,
    );

    /// Computes the limit masks of a smooth boundary vertex.
    ///
    /// `valence` counts both boundary edges, so a boundary vertex with `n`
    /// faces has valence `n + 1`. All slices must hold at least
    /// [`boundary_ring_width(valence)`](Self::boundary_ring_width) weights.
    fn boundary_point_weights<R: Real>(
        valence: usize,
        face_in_ring: usize,
        p: &mut [R],
        edge_points: Option<(&mut [R], &mut [R])>,
    );
}
