//! Patch conversions for *Catmull-Clark* surfaces.
//!
//! [`GregoryConverter`] computes the change-of-basis matrix from the source
//! points of a quad to the 20 control points of a Gregory patch.
//! [`BSplineConverter`] maps the same source points to the 16 control points
//! of a bicubic B-spline patch, either directly (a single isolated irregular
//! interior corner) or through the Gregory patch.
//!
//! Control points are labeled as in *"Approximating Subdivision Surfaces with
//! Gregory Patches for Hardware Tessellation"* (Loop, Schaefer, Ni, Castaño;
//! ACM ToG Siggraph Asia 2009):
//!
//! ```text
//!  P3         e3-      e2+         P2
//!     x--------x--------x--------x
//!     |        |        |        |
//!     |        |        |        |
//!     |        | f3-    | f2+    |
//!     |        x        x        |
//! e3+ x------x            x------x e2-
//!     |     f3+          f2-     |
//!     |                          |
//!     |                          |
//!     |     f0-          f1+     |
//! e0- x------x            x------x e1+
//!     |        x        x        |
//!     |        | f0+    | f1-    |
//!     |        |        |        |
//!     |        |        |        |
//!     x--------x--------x--------x
//!  P0         e0+      e1-         P1
//! ```
//!
//! Row `5 * c + k` of the Gregory matrix holds, for corner `c`, the point
//! `P` (`k = 0`), `Ep`, `Em`, `Fp` and `Fm` (`k = 4`).
use super::corner_topology::PatchTopology;
use super::sparse_matrix::{combine_rows_in_full, DenseRow};
use super::{CatmarkLimits, LimitWeights, SourcePatch, SparseMatrix};
use crate::Real;

/// Number of control points of a Gregory patch.
pub const GREGORY_POINT_COUNT: usize = 20;
/// Number of control points of a bicubic B-spline patch.
pub const BSPLINE_POINT_COUNT: usize = 16;

#[inline]
fn w<R: Real>(value: f64) -> R {
    R::from_f64(value)
}

/// Converts a quad [`SourcePatch`] to a Gregory patch.
#[derive(Clone, Debug)]
pub struct GregoryConverter<R> {
    topology: PatchTopology<R>,
}

impl<R: Real> GregoryConverter<R> {
    /// Classifies the corners of `source`.
    pub fn new(source: &SourcePatch) -> Self {
        debug_assert_eq!(source.corner_count(), 4);
        Self {
            topology: PatchTopology::new(source),
        }
    }

    /// Returns `true` if exactly one corner is irregular, and that corner is
    /// an interior, non-sharp corner of valence three or more.
    #[inline]
    pub fn is_isolated_interior_patch(&self) -> bool {
        self.topology.isolated_corner.is_some()
    }

    /// Returns the irregular corner of an isolated interior patch.
    #[inline]
    pub fn isolated_interior_corner(&self) -> Option<usize> {
        self.topology.isolated_corner
    }

    #[inline]
    pub fn has_val2_interior_corner(&self) -> bool {
        self.topology.has_val2_interior
    }

    /// Fills `matrix` with the 20 rows of the Gregory patch.
    pub fn convert(&self, matrix: &mut SparseMatrix<R>) {
        match self.topology.isolated_corner {
            Some(corner) => {
                log::trace!("gregory: isolated irregular corner {corner}");
                self.resize_matrix_isolated_irregular(matrix, corner);
            }
            None => self.resize_matrix_unisolated(matrix),
        }

        // Corner and edge points first: face points depend on the edge
        // points of two adjacent corners.
        let max_width = 1 + 2 * self.topology.max_valence;
        let mut weights = vec![R::ZERO; 3 * max_width];

        for c in 0..4 {
            if self.topology.corners[c].is_regular {
                self.assign_regular_edge_points(c, matrix);
            } else {
                self.compute_irregular_edge_points(c, matrix, &mut weights);
            }
        }

        let mut accumulator = DenseRow::new(self.topology.point_count);
        for c in 0..4 {
            let corner = &self.topology.corners[c];
            if corner.fp_is_regular || corner.fm_is_regular {
                self.assign_regular_face_points(c, matrix);
            }
            if !corner.fp_is_regular || !corner.fm_is_regular {
                self.compute_irregular_face_points(c, matrix, &mut accumulator);
            }
        }

        if self.topology.has_val2_interior {
            log::trace!("gregory: merging valence-2 duplicates");
            matrix.remove_valence2_duplicates(4);
        }
    }

    fn resize_matrix_isolated_irregular(&self, matrix: &mut SparseMatrix<R>, corner: usize) {
        let ring = 1 + 2 * self.topology.corners[corner].valence;

        let mut row_sizes = [0; GREGORY_POINT_COUNT];
        row_sizes[5 * corner..5 * corner + 5].copy_from_slice(&[ring; 5]);

        let plus = 5 * ((corner + 1) & 3);
        row_sizes[plus..plus + 5].copy_from_slice(&[9, 6, 6, 4, 3 + ring]);

        let opposite = 5 * ((corner + 2) & 3);
        row_sizes[opposite..opposite + 5].copy_from_slice(&[9, 6, 6, 4, 4]);

        let minus = 5 * ((corner + 3) & 3);
        row_sizes[minus..minus + 5].copy_from_slice(&[9, 6, 6, 3 + ring, 4]);

        matrix.resize_with_row_sizes(self.topology.point_count, &row_sizes);
        debug_assert_eq!(matrix.element_count(), 7 * ring + 85);
    }

    fn resize_matrix_unisolated(&self, matrix: &mut SparseMatrix<R>) {
        let mut row_sizes = [0; GREGORY_POINT_COUNT];

        for (c, corner) in self.topology.corners.iter().enumerate() {
            let sizes = &mut row_sizes[5 * c..5 * c + 5];

            let (p, ep, em) = if corner.is_regular {
                if !corner.is_boundary {
                    (9, 6, 6)
                } else {
                    (
                        3,
                        if corner.ep_on_boundary { 2 } else { 6 },
                        if corner.em_on_boundary { 2 } else { 6 },
                    )
                }
            } else if corner.is_sharp {
                (1, 2, 2)
            } else if !corner.is_boundary {
                let ring = 1 + 2 * corner.valence;
                (ring, ring, ring)
            } else if corner.num_faces > 1 {
                let ring = 1 + corner.valence + corner.num_faces;
                (
                    3,
                    if corner.ep_on_boundary { 2 } else { ring },
                    if corner.em_on_boundary { 2 } else { ring },
                )
            } else {
                (3, 2, 2)
            };
            sizes[..3].copy_from_slice(&[p, ep, em]);

            let c_next = (c + 1) & 3;
            let c_prev = (c + 3) & 3;
            sizes[3] = if corner.fp_is_regular {
                4
            } else {
                self.irregular_face_point_size(c, if corner.fp_is_copied { c_prev } else { c_next })
            };
            sizes[4] = if corner.fm_is_regular {
                4
            } else {
                self.irregular_face_point_size(c, if corner.fm_is_copied { c_next } else { c_prev })
            };
        }

        matrix.resize_with_row_sizes(self.topology.point_count, &row_sizes);
    }

    fn assign_regular_edge_points(&self, c: usize, matrix: &mut SparseMatrix<R>) {
        let corner = &self.topology.corners[c];
        let ring = &corner.ring_points;

        if !corner.is_boundary {
            let mut p = matrix.row_mut(5 * c);
            p.assign(0, c, w(4.0 / 9.0));
            p.assign(1, ring[0], w(1.0 / 9.0));
            p.assign(2, ring[2], w(1.0 / 9.0));
            p.assign(3, ring[4], w(1.0 / 9.0));
            p.assign(4, ring[6], w(1.0 / 9.0));
            p.assign(5, ring[1], w(1.0 / 36.0));
            p.assign(6, ring[3], w(1.0 / 36.0));
            p.assign(7, ring[5], w(1.0 / 36.0));
            p.assign(8, ring[7], w(1.0 / 36.0));

            // The edges along Ep and Em and those opposite them.
            let i_ep = 2 * corner.face_in_ring;
            let i_em = 2 * ((corner.face_in_ring + 1) & 3);
            let i_op = 2 * ((corner.face_in_ring + 2) & 3);
            let i_om = 2 * ((corner.face_in_ring + 3) & 3);

            let mut ep = matrix.row_mut(5 * c + 1);
            ep.assign(0, c, w(4.0 / 9.0));
            ep.assign(1, ring[i_ep], w(2.0 / 9.0));
            ep.assign(2, ring[i_em], w(1.0 / 9.0));
            ep.assign(3, ring[i_om], w(1.0 / 9.0));
            ep.assign(4, ring[i_ep + 1], w(1.0 / 18.0));
            ep.assign(5, ring[i_om + 1], w(1.0 / 18.0));

            let mut em = matrix.row_mut(5 * c + 2);
            em.assign(0, c, w(4.0 / 9.0));
            em.assign(1, ring[i_em], w(2.0 / 9.0));
            em.assign(2, ring[i_ep], w(1.0 / 9.0));
            em.assign(3, ring[i_op], w(1.0 / 9.0));
            em.assign(4, ring[i_ep + 1], w(1.0 / 18.0));
            em.assign(5, ring[i_em + 1], w(1.0 / 18.0));
        } else {
            let mut p = matrix.row_mut(5 * c);
            p.assign(0, c, w(2.0 / 3.0));
            p.assign(1, ring[0], w(1.0 / 6.0));
            p.assign(2, ring[4], w(1.0 / 6.0));

            // Which edge point is along the boundary and which across it.
            let (boundary_row, interior_row, i_boundary) = if corner.ep_on_boundary {
                (5 * c + 1, 5 * c + 2, 0)
            } else {
                (5 * c + 2, 5 * c + 1, 4)
            };

            let mut e = matrix.row_mut(boundary_row);
            e.assign(0, c, w(2.0 / 3.0));
            e.assign(1, ring[i_boundary], w(1.0 / 3.0));

            let mut e = matrix.row_mut(interior_row);
            e.assign(0, c, w(4.0 / 9.0));
            e.assign(1, ring[2], w(2.0 / 9.0));
            e.assign(2, ring[0], w(1.0 / 9.0));
            e.assign(3, ring[4], w(1.0 / 9.0));
            e.assign(4, ring[1], w(1.0 / 18.0));
            e.assign(5, ring[3], w(1.0 / 18.0));
        }
    }

    fn compute_irregular_edge_points(
        &self,
        c: usize,
        matrix: &mut SparseMatrix<R>,
        weights: &mut [R],
    ) {
        let corner = &self.topology.corners[c];
        let c_next = (c + 1) & 3;
        let c_prev = (c + 3) & 3;

        if corner.is_sharp {
            matrix.row_mut(5 * c).assign(0, c, R::ONE);

            // Approximating these for now, pending future investigation.
            let mut ep = matrix.row_mut(5 * c + 1);
            ep.assign(0, c, w(2.0 / 3.0));
            ep.assign(1, c_next, w(1.0 / 3.0));

            let mut em = matrix.row_mut(5 * c + 2);
            em.assign(0, c, w(2.0 / 3.0));
            em.assign(1, c_prev, w(1.0 / 3.0));
        } else if !corner.is_boundary {
            self.compute_irregular_interior_edge_points(c, matrix, weights);
        } else if corner.num_faces > 1 {
            self.compute_irregular_boundary_edge_points(c, matrix, weights);
        } else {
            // Smooth corner of the mesh.
            let mut p = matrix.row_mut(5 * c);
            p.assign(0, c, w(4.0 / 6.0));
            p.assign(1, c_next, w(1.0 / 6.0));
            p.assign(2, c_prev, w(1.0 / 6.0));

            let mut ep = matrix.row_mut(5 * c + 1);
            ep.assign(0, c, w(2.0 / 3.0));
            ep.assign(1, c_next, w(1.0 / 3.0));

            let mut em = matrix.row_mut(5 * c + 2);
            em.assign(0, c, w(2.0 / 3.0));
            em.assign(1, c_prev, w(1.0 / 3.0));
        }
    }

    fn compute_irregular_interior_edge_points(
        &self,
        c: usize,
        matrix: &mut SparseMatrix<R>,
        weights: &mut [R],
    ) {
        let corner = &self.topology.corners[c];
        let width = CatmarkLimits::interior_ring_width(corner.valence);

        let (p_weights, rest) = weights.split_at_mut(width);
        let (ep_weights, rest) = rest.split_at_mut(width);
        let em_weights = &mut rest[..width];

        CatmarkLimits::interior_point_weights(
            corner.valence,
            corner.face_in_ring,
            p_weights,
            Some((&mut *ep_weights, &mut *em_weights)),
        );

        // The position mask involves the whole ring and the edge points
        // depend on it, so no weight is expected to be zero.
        for (row, weights) in [p_weights, ep_weights, em_weights].into_iter().enumerate() {
            let mut point = matrix.row_mut(5 * c + row);
            point.assign(0, c, weights[0]);
            for i in 1..width {
                point.assign(i, corner.ring_points[i - 1], weights[i]);
            }
        }
    }

    fn compute_irregular_boundary_edge_points(
        &self,
        c: usize,
        matrix: &mut SparseMatrix<R>,
        weights: &mut [R],
    ) {
        let corner = &self.topology.corners[c];
        let valence = corner.valence;
        let width = CatmarkLimits::boundary_ring_width(valence);

        let (p_weights, rest) = weights.split_at_mut(width);
        let (ep_weights, rest) = rest.split_at_mut(width);
        let em_weights = &mut rest[..width];

        CatmarkLimits::boundary_point_weights(
            valence,
            corner.face_in_ring,
            p_weights,
            Some((&mut *ep_weights, &mut *em_weights)),
        );

        // Only the two boundary edges carry position weights.
        let n = width - 1;
        let p0 = c;
        let p1 = corner.ring_points[0];
        let pn = corner.ring_points[2 * (valence - 1)];

        let mut p = matrix.row_mut(5 * c);
        p.assign(0, p0, p_weights[0]);
        p.assign(1, p1, p_weights[1]);
        p.assign(2, pn, p_weights[n]);

        // An edge point on a boundary edge has two weights along that edge.
        let mut ep = matrix.row_mut(5 * c + 1);
        ep.assign(0, p0, ep_weights[0]);
        if corner.ep_on_boundary {
            ep.assign(1, p1, ep_weights[1]);
        } else {
            for i in 1..width {
                ep.assign(i, corner.ring_points[i - 1], ep_weights[i]);
            }
        }

        let mut em = matrix.row_mut(5 * c + 2);
        em.assign(0, p0, em_weights[0]);
        if corner.em_on_boundary {
            em.assign(1, pn, em_weights[n]);
        } else {
            for i in 1..width {
                em.assign(i, corner.ring_points[i - 1], em_weights[i]);
            }
        }
    }

    fn irregular_face_point_size(&self, c_near: usize, c_far: usize) -> usize {
        let near = &self.topology.corners[c_near];
        let far = &self.topology.corners[c_far];

        if near.is_sharp && far.is_sharp {
            return 2;
        }

        // The far corner adds its ring beyond the points shared with the
        // near one. Small rings remove points.
        let near_size = if near.is_sharp {
            6
        } else {
            1 + near.ring_points.len() as isize
        };
        let far_size = if far.is_regular || far.is_sharp {
            0
        } else {
            1 + far.ring_points.len() as isize - 6
        };

        (near_size + far_size).max(0) as usize
    }

    fn assign_regular_face_points(&self, c: usize, matrix: &mut SparseMatrix<R>) {
        let corner = &self.topology.corners[c];
        let c_next = (c + 1) & 3;
        let c_opp = (c + 2) & 3;
        let c_prev = (c + 3) & 3;

        for (row, is_regular) in [
            (5 * c + 3, corner.fp_is_regular),
            (5 * c + 4, corner.fm_is_regular),
        ] {
            if is_regular {
                let mut f = matrix.row_mut(row);
                f.assign(0, c, w(4.0 / 9.0));
                f.assign(1, c_prev, w(2.0 / 9.0));
                f.assign(2, c_next, w(2.0 / 9.0));
                f.assign(3, c_opp, w(1.0 / 9.0));
            }
        }
    }

    fn compute_irregular_face_points(
        &self,
        c: usize,
        matrix: &mut SparseMatrix<R>,
        accumulator: &mut DenseRow<R>,
    ) {
        let corner = &self.topology.corners[c];
        let c_next = (c + 1) & 3;
        let c_prev = (c + 3) & 3;

        // Fp and Fm from the corner and edge points computed before.
        if !corner.fp_is_regular && !corner.fp_is_copied {
            let edge = corner.face_in_ring;
            self.compute_irregular_face_point(
                FacePoint {
                    near: c,
                    edge_in_near_ring: edge,
                    far: c_next,
                    rows: [5 * c, 5 * c + 1, 5 * c_next + 2],
                    row: 5 * c + 3,
                    sign: R::ONE,
                },
                matrix,
                accumulator,
            );
        }
        if !corner.fm_is_regular && !corner.fm_is_copied {
            let edge = (corner.face_in_ring + 1) % corner.valence;
            self.compute_irregular_face_point(
                FacePoint {
                    near: c,
                    edge_in_near_ring: edge,
                    far: c_prev,
                    rows: [5 * c, 5 * c + 2, 5 * c_prev + 1],
                    row: 5 * c + 4,
                    sign: -R::ONE,
                },
                matrix,
                accumulator,
            );
        }

        if corner.fp_is_copied {
            matrix.copy_row(5 * c + 3, 5 * c + 4);
        }
        if corner.fm_is_copied {
            matrix.copy_row(5 * c + 4, 5 * c + 3);
        }
    }

    fn compute_irregular_face_point(
        &self,
        face_point: FacePoint<R>,
        matrix: &mut SparseMatrix<R>,
        accumulator: &mut DenseRow<R>,
    ) {
        let near = &self.topology.corners[face_point.near];
        let far = &self.topology.corners[face_point.far];
        let valence = near.valence;

        let three = w::<R>(3.0);
        let two = w::<R>(2.0);
        let p_coeff = far.cos_face_angle / three;
        let e_near_coeff = (three - two * near.cos_face_angle - far.cos_face_angle) / three;
        let e_far_coeff = two * near.cos_face_angle / three;

        let [p, e_near, e_far] = face_point.rows;
        accumulator.clear();
        accumulator.add_sparse_point(matrix.row(p), p_coeff);
        accumulator.add_sparse_point(matrix.row(e_near), e_near_coeff);
        accumulator.add_sparse_point(matrix.row(e_far), e_far_coeff);

        // R is computed about an interior edge from the two pairs of points
        // opposite that edge.
        let i_interior = face_point.edge_in_near_ring;
        let i_prev = (i_interior + valence - 1) % valence;
        let i_next = (i_interior + 1) % valence;
        let ring = &near.ring_points;
        let sign = face_point.sign;

        accumulator.add_unmasked(ring[2 * i_prev], -sign / w(9.0));
        accumulator.add_unmasked(ring[2 * i_prev + 1], -sign / w(18.0));
        accumulator.add_unmasked(ring[2 * i_interior + 1], sign / w(18.0));
        accumulator.add_unmasked(ring[2 * i_next], sign / w(9.0));

        let mut f = matrix.row_mut(face_point.row);
        let mut count = accumulator.compact_into(&mut f);

        // Complete the row when valence-2 interior corners induce duplicates.
        if self.topology.has_val2_interior {
            while count < f.len() {
                f.assign(count, face_point.near, R::ZERO);
                count += 1;
            }
        }
        debug_assert_eq!(count, f.len());
    }
}

/// Rows and orientation of one irregular face point.
struct FacePoint<R> {
    near: usize,
    edge_in_near_ring: usize,
    far: usize,
    /// Rows of P, E near and E far.
    rows: [usize; 3],
    row: usize,
    /// `1` for Fp, `-1` for Fm.
    sign: R,
}

/// Converts a quad [`SourcePatch`] to a bicubic B-spline patch.
///
/// The B-spline is fit to the limit position and tangent plane of the
/// corners. A patch with a single isolated irregular interior corner is
/// converted directly and keeps the source points that are not affected by
/// that corner. All other patches are first converted to Gregory, and none
/// of their B-spline points coincide with source points.
#[derive(Clone, Debug)]
pub struct BSplineConverter<'a, R> {
    source: &'a SourcePatch,
    gregory: GregoryConverter<R>,
}

// Change of basis from Gregory/Bezier to B-spline. Three sets of weights for
// corner, boundary and interior points:
const W_CORNER: [f64; 9] = [49.0, -42.0, -42.0, 36.0, -14.0, -14.0, 12.0, 12.0, 4.0];
const W_BOUNDARY: [f64; 6] = [-14.0, 12.0, 7.0, -6.0, 4.0, -2.0];
const W_INTERIOR: [f64; 4] = [4.0, -2.0, -2.0, 1.0];

// Points of the B-spline and Gregory matrices correlate as
//
//     B = { 12, 13, 14, 15 }     G = { 15, 17, 11, 10 }
//         {  8,  9, 10, 11 }         { 16, 18, 13, 12 }
//         {  4,  5,  6,  7 }         {  2,  3,  8,  6 }
//         {  0,  1,  2,  3 }         {  0,  1,  7,  5 }
//
// Each quadrant depends on these Gregory rows.
const P_INDICES: [[usize; 9]; 4] = [
    [3, 1, 2, 0, 8, 18, 7, 16, 13],
    [8, 6, 7, 5, 3, 13, 12, 1, 18],
    [13, 11, 12, 10, 18, 8, 17, 6, 3],
    [18, 16, 17, 15, 13, 3, 2, 11, 8],
];
const EP_INDICES: [[usize; 6]; 4] = [
    [3, 1, 8, 7, 18, 13],
    [8, 6, 13, 12, 3, 18],
    [13, 11, 18, 17, 8, 3],
    [18, 16, 3, 2, 13, 8],
];
const EM_INDICES: [[usize; 6]; 4] = [
    [3, 2, 18, 16, 8, 13],
    [8, 7, 3, 1, 13, 18],
    [13, 12, 8, 6, 18, 3],
    [18, 17, 13, 11, 3, 8],
];
const F_INDICES: [[usize; 4]; 4] = [
    [3, 8, 18, 13],
    [8, 13, 3, 18],
    [13, 18, 8, 3],
    [18, 3, 13, 8],
];

// Rows of the derived points X0..X6 per irregular corner.
const X_ROWS: [[usize; 7]; 4] = [
    [0, 1, 4, 2, 8, 3, 12],
    [3, 7, 2, 11, 1, 15, 0],
    [15, 14, 11, 13, 7, 12, 3],
    [12, 8, 13, 4, 14, 0, 15],
];

// Rows of the exterior source points P9..P13 per irregular corner.
const EXT_POINT_ROWS: [[usize; 5]; 4] = [
    [7, 11, 15, 14, 13],
    [14, 13, 12, 8, 4],
    [8, 4, 0, 1, 2],
    [1, 2, 3, 7, 11],
];

impl<'a, R: Real> BSplineConverter<'a, R> {
    pub fn new(source: &'a SourcePatch) -> Self {
        Self {
            source,
            gregory: GregoryConverter::new(source),
        }
    }

    /// Fills `matrix` with the 16 rows of the B-spline patch.
    pub fn convert(&self, matrix: &mut SparseMatrix<R>) {
        match self.gregory.isolated_interior_corner() {
            Some(corner) => self.convert_irregular_corner(corner, matrix),
            None => self.convert_via_gregory(matrix),
        }
    }

    /// Like [`convert()`](Self::convert) but always takes the path through
    /// the Gregory patch. The result is a dense matrix.
    pub fn convert_via_gregory(&self, matrix: &mut SparseMatrix<R>) {
        let mut gregory = SparseMatrix::new();
        self.gregory.convert(&mut gregory);
        Self::convert_from_gregory(&gregory, matrix);
    }

    fn convert_from_gregory(g: &SparseMatrix<R>, b: &mut SparseMatrix<R>) {
        let corner = W_CORNER.map(w::<R>);
        let boundary = W_BOUNDARY.map(w::<R>);
        let interior = W_INTERIOR.map(w::<R>);

        // The matrix is not very sparse; build it full.
        b.resize_full(BSPLINE_POINT_COUNT, g.column_count());

        let rows: [(&[usize], &[R]); BSPLINE_POINT_COUNT] = [
            (&P_INDICES[0], &corner),
            (&EP_INDICES[0], &boundary),
            (&EM_INDICES[1], &boundary),
            (&P_INDICES[1], &corner),
            (&EM_INDICES[0], &boundary),
            (&F_INDICES[0], &interior),
            (&F_INDICES[1], &interior),
            (&EP_INDICES[1], &boundary),
            (&EP_INDICES[3], &boundary),
            (&F_INDICES[3], &interior),
            (&F_INDICES[2], &interior),
            (&EM_INDICES[2], &boundary),
            (&P_INDICES[3], &corner),
            (&EM_INDICES[3], &boundary),
            (&EP_INDICES[2], &boundary),
            (&P_INDICES[2], &corner),
        ];
        for (row, (indices, weights)) in rows.into_iter().enumerate() {
            combine_rows_in_full(b, row, g, indices, weights);
        }
    }

    // Source points P[] and derived points X[], with P0 the irregular corner.
    // P5 is a placeholder for the rest of the exterior ring around P0:
    //
    //       ...
    //   (P5)   P4----P15---P14          X0----X2----X4----X6
    //  .        |     |     |            |     |     |     |
    //  .        |     |     |            |     |     |     |
    //    P6----P0*---P3----P13          X1----P0*---P3----P13
    //     |     |P' Em|     |    --->    |     |     |     |
    //     |     |Ep   |     |            |     |     |     |
    //    P7----P1----P2----P12          X3----P1----P2----P12
    //     |     |     |     |            |     |     |     |
    //     |     |     |     |            |     |     |     |
    //    P8----P9----P10---P11          X5----P9----P10---P11
    //
    //     X1 = 1/3 * ( 36Ep - 16P0 - 8P1 - 2P2 - 4P3 - P6 - 2P7)
    //     X2 = 1/3 * ( 36Em - 16P0 - 4P1 - 2P2 - 8P3 - P4 - 2P15)
    //     X3 = 1/3 * (-18Ep + 8P0 + 4P1 + P2 + 2P3 + 4P7  + 2P6)
    //     X4 = 1/3 * (-18Em + 8P0 + 2P1 + P2 + 4P3 + 4P15 + 2P4)
    //     X5 = X1 + (P8  - P6)
    //     X6 = X2 + (P14 - P4)
    //     X0 = 36P' - 16P0 - 4(P1 + P3 + X2 + X1) - (P2 + X3 + X4)
    //
    // All terms but P8 and P14 are in the 1-ring of P0, so the X[] are
    // combined as weights of that ring (with P0 first).
    fn convert_irregular_corner(&self, irregular: usize, matrix: &mut SparseMatrix<R>) {
        log::trace!("b-spline: isolated irregular corner {irregular}");

        let corner = self.source.corner(irregular);
        let valence = corner.num_faces;
        let face_in_ring = corner.patch_face;
        debug_assert!(valence > 2);

        let ring_width = 1 + 2 * valence;
        let mut w_p = vec![R::ZERO; ring_width];
        let mut w_ep = vec![R::ZERO; ring_width];
        let mut w_em = vec![R::ZERO; ring_width];
        CatmarkLimits::interior_point_weights(
            valence,
            face_in_ring,
            &mut w_p,
            Some((&mut w_ep[..], &mut w_em[..])),
        );

        // Locations of the contributing source points in the ring.
        let plus1 = (face_in_ring + 1) % valence;
        let plus2 = (face_in_ring + 2) % valence;
        let minus1 = (face_in_ring + valence - 1) % valence;

        let p0 = 0;
        let p1 = 1 + 2 * face_in_ring;
        let p2 = 2 + 2 * face_in_ring;
        let p3 = 1 + 2 * plus1;
        let p15 = 2 + 2 * plus1;
        let p4 = 1 + 2 * plus2;
        let p6 = 1 + 2 * minus1;
        let p7 = 2 + 2 * minus1;
        let p8 = ring_width;
        let p14 = ring_width;

        // X5 and X6 have one extra entry past the ring.
        let mut x: [Vec<R>; 7] = std::array::from_fn(|i| {
            vec![R::ZERO; if i < 5 { ring_width } else { ring_width + 1 }]
        });

        // Contributions of the source points P[] first.
        for (i, weight) in [(p0, 16.0), (p1, 8.0), (p2, 2.0), (p3, 4.0), (p6, 1.0), (p7, 2.0)] {
            x[1][i] = w(weight);
        }
        for (i, weight) in [(p0, 16.0), (p3, 8.0), (p2, 2.0), (p1, 4.0), (p4, 1.0), (p15, 2.0)] {
            x[2][i] = w(weight);
        }
        for (i, weight) in [(p0, 8.0), (p1, 4.0), (p2, 1.0), (p3, 2.0), (p6, 2.0), (p7, 4.0)] {
            x[3][i] = w(weight);
        }
        for (i, weight) in [(p0, 8.0), (p3, 4.0), (p2, 1.0), (p1, 2.0), (p4, 2.0), (p15, 4.0)] {
            x[4][i] = w(weight);
        }
        x[5][p6] = -R::ONE;
        x[5][p8] = R::ONE;
        x[6][p4] = -R::ONE;
        x[6][p14] = R::ONE;
        for (i, weight) in [(p0, 16.0), (p1, 4.0), (p2, 1.0), (p3, 4.0)] {
            x[0][i] = w(weight);
        }

        // Then the limit points and dependent X[], in one pass over the ring.
        let one_third = w::<R>(1.0 / 3.0);
        let four = w::<R>(4.0);
        let six = w::<R>(6.0);
        let thirty_six = w::<R>(36.0);
        for i in 0..ring_width {
            x[1][i] = (thirty_six * w_ep[i] - x[1][i]) * one_third;
            x[2][i] = (thirty_six * w_em[i] - x[2][i]) * one_third;

            x[3][i] = -w_ep[i] * six + x[3][i] * one_third;
            x[4][i] = -w_em[i] * six + x[4][i] * one_third;

            let x1 = x[1][i];
            x[5][i] += x1;
            let x2 = x[2][i];
            x[6][i] += x2;

            x[0][i] = w_p[i] * thirty_six - x[0][i] - (x[2][i] + x[1][i]) * four - (x[3][i] + x[4][i]);
        }

        // Indices: the ring for all X[] plus P8 and P14 for X5 and X6. The
        // exterior points follow the four corners counter-clockwise, so
        // P8..P14 follow P7.
        let point_count = self.source.point_count();
        let mut ring = vec![0; ring_width];
        ring[0] = irregular;
        self.source.corner_ring_points(irregular, &mut ring[1..]);

        let mut p_points = [0; 16];
        let mut next = ring[p7] + 1;
        for point in &mut p_points[8..] {
            *point = if next < point_count {
                next
            } else {
                next - point_count + 4
            };
            next += 1;
        }

        let x_rows = &X_ROWS[irregular];
        let mut row_sizes = [1; BSPLINE_POINT_COUNT];
        for (&row, x) in x_rows.iter().zip(x.iter()) {
            row_sizes[row] = x.len();
        }
        matrix.resize_with_row_sizes(point_count, &row_sizes);
        debug_assert_eq!(matrix.element_count(), 7 * ring_width + 11);

        for (i, (&row, weights)) in x_rows.iter().zip(x.iter()).enumerate() {
            let mut point = matrix.row_mut(row);
            for (slot, (&column, &weight)) in ring.iter().zip(weights.iter()).enumerate() {
                point.assign(slot, column, weight);
            }
            match i {
                5 => point.assign(ring_width, p_points[8], weights[ring_width]),
                6 => point.assign(ring_width, p_points[14], weights[ring_width]),
                _ => {}
            }
        }

        // Identity rows: the four interior points precede the exterior ones.
        let ext_rows = &EXT_POINT_ROWS[irregular];
        let identity = [(5, 0), (6, 1), (9, 3), (10, 2)]
            .into_iter()
            .chain(ext_rows.iter().copied().zip(p_points[9..14].iter().copied()));
        for (row, column) in identity {
            matrix.row_mut(row).assign(0, column, R::ONE);
        }
    }
}
