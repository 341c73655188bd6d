//! Classification of the corners of a source patch.
//!
//! Caches per-corner information of a [`SourcePatch`] that the Gregory
//! conversions use repeatedly: regularity, which edge and face points lie on a
//! boundary or are copied from a neighbor, the face angle and the corner's
//! ring.
use std::f64::consts::PI;

use super::SourcePatch;
use crate::Real;

#[derive(Clone, Debug)]
pub(crate) struct CornerTopology<R> {
    pub is_boundary: bool,
    pub is_sharp: bool,
    pub is_regular: bool,
    /// A single face: a smooth corner of the mesh.
    pub is_corner: bool,

    pub ep_on_boundary: bool,
    pub em_on_boundary: bool,

    pub fp_is_regular: bool,
    pub fm_is_regular: bool,
    pub fp_is_copied: bool,
    pub fm_is_copied: bool,

    pub valence: usize,
    pub num_faces: usize,
    pub face_in_ring: usize,

    pub cos_face_angle: R,

    pub ring_points: Vec<usize>,
}

/// Classification of a whole patch.
#[derive(Clone, Debug)]
pub(crate) struct PatchTopology<R> {
    pub corners: Vec<CornerTopology<R>>,
    pub point_count: usize,
    pub max_valence: usize,
    /// The only irregular corner, if it is an interior, non-sharp corner of
    /// valence 3 or more and no other corner is on a boundary.
    pub isolated_corner: Option<usize>,
    pub has_val2_interior: bool,
}

impl<R: Real> PatchTopology<R> {
    /// Classifies the corners of `patch`.
    pub fn new(patch: &SourcePatch) -> Self {
        let n = patch.corner_count();
        let regular_valence = if 4 == n { 4 } else { 6 };
        // cos of the regular face angle, π/2 for quads and π/3 for triangles.
        let regular_cos = if 4 == n { R::ZERO } else { R::from_f64(0.5) };

        let mut boundary_count = 0;
        let mut irregular_count = 0;
        let mut irregular_corner = 0;
        let mut irregular_valence = 0;
        let mut sharp_count = 0;
        let mut has_val2_interior = false;

        let mut corners: Vec<CornerTopology<R>> = patch
            .corners()
            .iter()
            .enumerate()
            .map(|(c, src)| {
                let valence = src.valence();
                let is_regular =
                    (src.num_faces << src.boundary as usize) == regular_valence && !src.sharp;

                let cos_face_angle = if is_regular {
                    regular_cos
                } else {
                    let span = if src.boundary { PI } else { 2.0 * PI };
                    (R::from_f64(span) / R::from_usize(src.num_faces)).cos()
                };

                boundary_count += src.boundary as usize;
                if !is_regular {
                    irregular_count += 1;
                    irregular_corner = c;
                    irregular_valence = valence;
                }
                sharp_count += src.sharp as usize;
                has_val2_interior |= src.val2_interior;

                CornerTopology {
                    is_boundary: src.boundary,
                    is_sharp: src.sharp,
                    is_regular,
                    is_corner: 1 == src.num_faces,
                    ep_on_boundary: false,
                    em_on_boundary: false,
                    fp_is_regular: false,
                    fm_is_regular: false,
                    fp_is_copied: false,
                    fm_is_copied: false,
                    valence,
                    num_faces: src.num_faces,
                    face_in_ring: src.patch_face,
                    cos_face_angle,
                    ring_points: patch.corner_ring(c),
                }
            })
            .collect();

        // Tags that depend on the adjacent corners.
        for c in 0..n {
            let next_regular = corners[(c + 1) % n].is_regular;
            let prev_regular = corners[(c + n - 1) % n].is_regular;

            let corner = &mut corners[c];
            corner.fp_is_regular = corner.is_regular && next_regular;
            corner.fm_is_regular = corner.is_regular && prev_regular;

            if corner.is_boundary {
                corner.ep_on_boundary = 0 == corner.face_in_ring;
                corner.em_on_boundary = corner.face_in_ring + 1 == corner.num_faces;

                // Both face points coincide when one of the corner's edges is
                // a boundary: one is copied from the other unless regular.
                if corner.num_faces > 1 {
                    if corner.ep_on_boundary {
                        corner.fp_is_regular = corner.fm_is_regular;
                        corner.fp_is_copied = !corner.fp_is_regular;
                    }
                    if corner.em_on_boundary {
                        corner.fm_is_regular = corner.fp_is_regular;
                        corner.fm_is_copied = !corner.fm_is_regular;
                    }
                } else {
                    corner.fp_is_regular = true;
                    corner.fm_is_regular = true;
                }
            }
        }

        let isolated = 1 == irregular_count
            && 0 == boundary_count
            && irregular_valence > 2
            && 0 == sharp_count;

        PatchTopology {
            corners,
            point_count: patch.point_count(),
            max_valence: patch.max_valence(),
            isolated_corner: isolated.then_some(irregular_corner),
            has_val2_interior,
        }
    }
}
