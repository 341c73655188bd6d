//! Patch conversions for *Loop* surfaces.
//!
//! [`GregoryTriConverter`] computes the change-of-basis matrix from the
//! source points of a triangle to the 18 control points of a quartic Gregory
//! triangle: the 15 points of the cubic Gregory triangle (P, Ep, Em, Fp and
//! Fm per corner, with the edge points promoted to quartic) followed by the
//! three quartic mid-edge points.
//!
//! [`convert_to_box_spline()`] fits the 12 control points of the regular
//! quartic Box-spline patch to that Gregory triangle.
use super::corner_topology::{CornerTopology, PatchTopology};
use super::sparse_matrix::{combine_rows_in_full, DenseRow};
use super::{LimitWeights, LoopLimits, SourcePatch, SparseMatrix};
use crate::Real;

/// Number of control points of a quartic Gregory triangle.
pub const GREGORY_TRIANGLE_POINT_COUNT: usize = 18;
/// Number of control points of a quartic Box-spline triangle.
pub const BOX_SPLINE_POINT_COUNT: usize = 12;

#[inline]
fn w<R: Real>(value: f64) -> R {
    R::from_f64(value)
}

/// Converts a triangle [`SourcePatch`] to a quartic Gregory triangle.
#[derive(Clone, Debug)]
pub struct GregoryTriConverter<R> {
    topology: PatchTopology<R>,
}

impl<R: Real> GregoryTriConverter<R> {
    /// Classifies the corners of `source`.
    pub fn new(source: &SourcePatch) -> Self {
        debug_assert_eq!(source.corner_count(), 3);
        Self {
            topology: PatchTopology::new(source),
        }
    }

    #[inline]
    pub fn is_isolated_interior_patch(&self) -> bool {
        self.topology.isolated_corner.is_some()
    }

    #[inline]
    pub fn has_val2_interior_corner(&self) -> bool {
        self.topology.has_val2_interior
    }

    /// Fills `matrix` with the 18 rows of the Gregory triangle.
    pub fn convert(&self, matrix: &mut SparseMatrix<R>) {
        match self.topology.isolated_corner {
            Some(corner) => {
                log::trace!("gregory triangle: isolated irregular corner {corner}");
                self.resize_matrix_isolated_irregular(matrix, corner);
            }
            None => self.resize_matrix_unisolated(matrix),
        }

        let max_width = 1 + self.topology.max_valence;
        let mut weights = vec![R::ZERO; 3 * max_width];

        for c in 0..3 {
            if self.topology.corners[c].is_regular {
                self.assign_regular_edge_points(c, matrix);
            } else {
                self.compute_irregular_edge_points(c, matrix, &mut weights);
            }
        }

        let mut accumulator = DenseRow::new(self.topology.point_count);
        for c in 0..3 {
            let corner = &self.topology.corners[c];
            if corner.fp_is_regular || corner.fm_is_regular {
                self.assign_regular_face_points(c, matrix);
            }
            if !corner.fp_is_regular || !corner.fm_is_regular {
                self.compute_irregular_face_points(c, matrix, &mut accumulator);
            }
        }

        for e in 0..3 {
            if self.mid_edge_is_regular(e) {
                self.assign_regular_mid_edge_point(e, matrix);
            } else {
                // Midway between the cubic edge points of both ends.
                let c1 = (e + 1) % 3;
                accumulator.clear();
                accumulator.add_sparse_point(matrix.row(5 * e + 1), w(0.5));
                accumulator.add_sparse_point(matrix.row(5 * c1 + 2), w(0.5));
                write_padded(&accumulator, matrix, 15 + e);
            }
        }

        self.promote_cubic_edge_points_to_quartic(matrix, &mut accumulator);

        if self.topology.has_val2_interior {
            log::trace!("gregory triangle: merging valence-2 duplicates");
            matrix.remove_valence2_duplicates(3);
        }
    }

    fn mid_edge_is_regular(&self, e: usize) -> bool {
        let c0 = &self.topology.corners[e];
        let c1 = &self.topology.corners[(e + 1) % 3];

        let is_boundary_edge = c0.ep_on_boundary && c1.em_on_boundary;
        let is_dart_edge = c0.ep_on_boundary != c1.em_on_boundary;
        is_boundary_edge || (c0.is_regular && c1.is_regular && !is_dart_edge)
    }

    fn resize_matrix_isolated_irregular(&self, matrix: &mut SparseMatrix<R>, corner: usize) {
        let ring = 1 + self.topology.corners[corner].valence;
        let plus = (corner + 1) % 3;
        let minus = (corner + 2) % 3;

        let mut row_sizes = [0; GREGORY_TRIANGLE_POINT_COUNT];
        row_sizes[5 * corner..5 * corner + 5].copy_from_slice(&[ring, ring, ring, 3 + ring, 3 + ring]);
        row_sizes[5 * plus..5 * plus + 5].copy_from_slice(&[7, 7, 7, 5, 3 + ring]);
        row_sizes[5 * minus..5 * minus + 5].copy_from_slice(&[7, 7, 7, 3 + ring, 5]);

        // The quartic mid-edge points are not grouped with the corners.
        row_sizes[15 + corner] = 3 + ring;
        row_sizes[15 + plus] = 4;
        row_sizes[15 + minus] = 3 + ring;

        matrix.resize_with_row_sizes(self.topology.point_count, &row_sizes);
        debug_assert_eq!(matrix.element_count(), 9 * ring + 74);
    }

    fn resize_matrix_unisolated(&self, matrix: &mut SparseMatrix<R>) {
        let mut row_sizes = [0; GREGORY_TRIANGLE_POINT_COUNT];

        for (c, corner) in self.topology.corners.iter().enumerate() {
            let sizes = &mut row_sizes[5 * c..5 * c + 5];

            let (p, ep, em) = if corner.is_regular {
                if !corner.is_boundary {
                    (7, 7, 7)
                } else {
                    (
                        3,
                        if corner.ep_on_boundary { 3 } else { 5 },
                        if corner.em_on_boundary { 3 } else { 5 },
                    )
                }
            } else if corner.is_sharp {
                (1, 2, 2)
            } else if !corner.is_boundary {
                let ring = 1 + corner.valence;
                (ring, ring, ring)
            } else if corner.num_faces > 1 {
                let ring = 1 + corner.valence;
                (
                    3,
                    if corner.ep_on_boundary { 3 } else { ring },
                    if corner.em_on_boundary { 3 } else { ring },
                )
            } else {
                (3, 3, 3)
            };
            sizes[..3].copy_from_slice(&[p, ep, em]);

            let c_next = (c + 1) % 3;
            let c_prev = (c + 2) % 3;
            let regular_face_size =
                5 - corner.ep_on_boundary as usize - corner.em_on_boundary as usize;
            sizes[3] = if corner.fp_is_regular {
                regular_face_size
            } else {
                self.irregular_face_point_size(c, if corner.fp_is_copied { c_prev } else { c_next })
            };
            sizes[4] = if corner.fm_is_regular {
                regular_face_size
            } else {
                self.irregular_face_point_size(c, if corner.fm_is_copied { c_next } else { c_prev })
            };

            // The quartic mid-edge point of the edge following the corner.
            let next = &self.topology.corners[c_next];
            row_sizes[15 + c] = if corner.ep_on_boundary && next.em_on_boundary {
                2
            } else if corner.is_regular
                && next.is_regular
                && corner.ep_on_boundary == next.em_on_boundary
            {
                4
            } else {
                self.irregular_face_point_size(c, c_next)
            };
        }

        matrix.resize_with_row_sizes(self.topology.point_count, &row_sizes);
    }

    fn assign_regular_edge_points(&self, c: usize, matrix: &mut SparseMatrix<R>) {
        let corner = &self.topology.corners[c];
        let ring = &corner.ring_points;

        if !corner.is_boundary {
            let p_scale = w::<R>(1.0 / 12.0);
            let mut p = matrix.row_mut(5 * c);
            p.assign(0, c, w(0.5));
            for (i, &point) in ring[..6].iter().enumerate() {
                p.assign(1 + i, point, p_scale);
            }

            let e_weights = [7.0, 5.0, 1.0, -1.0, 1.0, 5.0];
            let e_scale = w::<R>(1.0 / 36.0);

            let i_ep = corner.face_in_ring;
            let i_em = (corner.face_in_ring + 1) % 6;

            for (row, i_edge) in [(5 * c + 1, i_ep), (5 * c + 2, i_em)] {
                let mut e = matrix.row_mut(row);
                e.assign(0, c, w(0.5));
                for (k, &weight) in e_weights.iter().enumerate() {
                    e.assign(1 + k, ring[(i_edge + k) % 6], e_scale * w(weight));
                }
            }
        } else {
            let one_third = w::<R>(1.0 / 3.0);
            let two_thirds = w::<R>(2.0 / 3.0);
            let one_sixth = w::<R>(1.0 / 6.0);

            let mut p = matrix.row_mut(5 * c);
            p.assign(0, c, two_thirds);
            p.assign(1, ring[0], one_sixth);
            p.assign(2, ring[3], one_sixth);

            // Three triangles: the edge points lie on two of four edges. The
            // interior ones account for phantom points, {1/2, 1/6, 1/6, 1/6}.
            let mut ep = matrix.row_mut(5 * c + 1);
            if corner.ep_on_boundary {
                ep.assign(0, c, two_thirds);
                ep.assign(1, ring[0], one_third);
                ep.assign(2, ring[3], R::ZERO);
            } else {
                let (outer, zero) = if corner.em_on_boundary { (3, 0) } else { (0, 3) };
                ep.assign(0, c, w(0.5));
                ep.assign(1, ring[1], one_sixth);
                ep.assign(2, ring[2], one_sixth);
                ep.assign(3, ring[outer], one_sixth);
                ep.assign(4, ring[zero], R::ZERO);
            }

            let mut em = matrix.row_mut(5 * c + 2);
            if corner.em_on_boundary {
                em.assign(0, c, two_thirds);
                em.assign(1, ring[3], one_third);
                em.assign(2, ring[0], R::ZERO);
            } else {
                let (outer, zero) = if corner.ep_on_boundary { (0, 3) } else { (3, 0) };
                em.assign(0, c, w(0.5));
                em.assign(1, ring[1], one_sixth);
                em.assign(2, ring[2], one_sixth);
                em.assign(3, ring[outer], one_sixth);
                em.assign(4, ring[zero], R::ZERO);
            }
        }
    }

    fn compute_irregular_edge_points(
        &self,
        c: usize,
        matrix: &mut SparseMatrix<R>,
        weights: &mut [R],
    ) {
        let corner = &self.topology.corners[c];
        let c_next = (c + 1) % 3;
        let c_prev = (c + 2) % 3;

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
            ep.assign(2, c_prev, R::ZERO);

            let mut em = matrix.row_mut(5 * c + 2);
            em.assign(0, c, w(2.0 / 3.0));
            em.assign(1, c_prev, w(1.0 / 3.0));
            em.assign(2, c_next, R::ZERO);
        }
    }

    fn compute_irregular_interior_edge_points(
        &self,
        c: usize,
        matrix: &mut SparseMatrix<R>,
        weights: &mut [R],
    ) {
        let corner = &self.topology.corners[c];
        let width = LoopLimits::interior_ring_width(corner.valence);

        let (p_weights, rest) = weights.split_at_mut(width);
        let (ep_weights, rest) = rest.split_at_mut(width);
        let em_weights = &mut rest[..width];

        LoopLimits::interior_point_weights(
            corner.valence,
            corner.face_in_ring,
            p_weights,
            Some((&mut *ep_weights, &mut *em_weights)),
        );

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
        let width = LoopLimits::boundary_ring_width(valence);

        let (p_weights, rest) = weights.split_at_mut(width);
        let (ep_weights, rest) = rest.split_at_mut(width);
        let em_weights = &mut rest[..width];

        LoopLimits::boundary_point_weights(
            valence,
            corner.face_in_ring,
            p_weights,
            Some((&mut *ep_weights, &mut *em_weights)),
        );

        // Only the two boundary edges carry position weights.
        let n = width - 1;
        let p0 = c;
        let p1 = corner.ring_points[0];
        let pn = corner.ring_points[valence - 1];

        let mut p = matrix.row_mut(5 * c);
        p.assign(0, p0, p_weights[0]);
        p.assign(1, p1, p_weights[1]);
        p.assign(2, pn, p_weights[n]);

        let mut ep = matrix.row_mut(5 * c + 1);
        ep.assign(0, p0, ep_weights[0]);
        if corner.ep_on_boundary {
            ep.assign(1, p1, ep_weights[1]);
            ep.assign(2, pn, R::ZERO);
        } else {
            for i in 1..width {
                ep.assign(i, corner.ring_points[i - 1], ep_weights[i]);
            }
        }

        let mut em = matrix.row_mut(5 * c + 2);
        em.assign(0, p0, em_weights[0]);
        if corner.em_on_boundary {
            em.assign(1, pn, em_weights[n]);
            em.assign(2, p1, R::ZERO);
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

        let extra = |corner: &CornerTopology<R>| {
            if corner.is_sharp {
                0
            } else {
                corner.ring_points.len().saturating_sub(3)
            }
        };
        4 + extra(near) + extra(far)
    }

    fn assign_regular_face_points(&self, c: usize, matrix: &mut SparseMatrix<R>) {
        let corner = &self.topology.corners[c];
        let ring = &corner.ring_points;
        let c_next = (c + 1) % 3;
        let c_prev = (c + 2) % 3;

        // Both face points of a corner are the same when regular.
        for (row, is_regular) in [
            (5 * c + 3, corner.fp_is_regular),
            (5 * c + 4, corner.fm_is_regular),
        ] {
            if !is_regular {
                continue;
            }

            let mut f = matrix.row_mut(row);
            if corner.is_corner {
                f.assign(0, c, w(0.5));
                f.assign(1, c_next, w(0.25));
                f.assign(2, c_prev, w(0.25));
            } else if corner.ep_on_boundary {
                // Leading face of the boundary ring.
                f.assign(0, c, w(11.0 / 24.0));
                f.assign(1, ring[0], w(7.0 / 24.0));
                f.assign(2, ring[1], w(5.0 / 24.0));
                f.assign(3, ring[2], w(1.0 / 24.0));
            } else if corner.em_on_boundary {
                // Trailing face of the boundary ring.
                f.assign(0, c, w(11.0 / 24.0));
                f.assign(1, ring[3], w(7.0 / 24.0));
                f.assign(2, ring[2], w(5.0 / 24.0));
                f.assign(3, ring[1], w(1.0 / 24.0));
            } else {
                // Interior, or the middle face of a boundary ring.
                let (e_next, e_prev) = if corner.is_boundary {
                    (0, 3)
                } else {
                    ((corner.face_in_ring + 5) % 6, (corner.face_in_ring + 2) % 6)
                };

                f.assign(0, c, w(10.0 / 24.0));
                f.assign(1, c_prev, w(0.25));
                f.assign(2, c_next, w(0.25));
                f.assign(3, ring[e_prev], w(1.0 / 24.0));
                f.assign(4, ring[e_next], w(1.0 / 24.0));
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
        let c_next = (c + 1) % 3;
        let c_prev = (c + 2) % 3;

        if !corner.fp_is_regular && !corner.fp_is_copied {
            self.compute_irregular_face_point(
                [c, corner.face_in_ring, c_next],
                [5 * c, 5 * c + 1, 5 * c_next + 2],
                5 * c + 3,
                R::ONE,
                matrix,
                accumulator,
            );
        }
        if !corner.fm_is_regular && !corner.fm_is_copied {
            self.compute_irregular_face_point(
                [c, (corner.face_in_ring + 1) % corner.valence, c_prev],
                [5 * c, 5 * c + 2, 5 * c_prev + 1],
                5 * c + 4,
                -R::ONE,
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

    // F = (1/4) * (c0 P0 + (4 - 2 c0 - c1) E0 + 2 c1 E1 + R), where R
    // involves the two points opposite the interior edge.
    fn compute_irregular_face_point(
        &self,
        [c_near, edge_in_near_ring, c_far]: [usize; 3],
        [p, e_near, e_far]: [usize; 3],
        row: usize,
        sign: R,
        matrix: &mut SparseMatrix<R>,
        accumulator: &mut DenseRow<R>,
    ) {
        let near = &self.topology.corners[c_near];
        let far = &self.topology.corners[c_far];
        let valence = near.valence;

        let four = w::<R>(4.0);
        let two = w::<R>(2.0);
        let p_coeff = far.cos_face_angle / four;
        let e_near_coeff = (four - two * near.cos_face_angle - far.cos_face_angle) / four;
        let e_far_coeff = two * near.cos_face_angle / four;

        accumulator.clear();
        accumulator.add_sparse_point(matrix.row(p), p_coeff);
        accumulator.add_sparse_point(matrix.row(e_near), e_near_coeff);
        accumulator.add_sparse_point(matrix.row(e_far), e_far_coeff);

        let i_prev = (edge_in_near_ring + valence - 1) % valence;
        let i_next = (edge_in_near_ring + 1) % valence;
        let r_scale = w::<R>(0.25 * (7.0 / 18.0));

        accumulator.add_unmasked(near.ring_points[i_prev], -sign * r_scale);
        accumulator.add_unmasked(near.ring_points[i_next], sign * r_scale);

        let mut f = matrix.row_mut(row);
        let mut count = accumulator.compact_into(&mut f);

        // Complete the row when valence-2 corners induce duplicates.
        if self.topology.has_val2_interior {
            while count < f.len() {
                f.assign(count, c_near, R::ZERO);
                count += 1;
            }
        }
        debug_assert_eq!(count, f.len());
    }

    fn assign_regular_mid_edge_point(&self, e: usize, matrix: &mut SparseMatrix<R>) {
        let corner = &self.topology.corners[e];
        let mut m = matrix.row_mut(15 + e);

        if corner.ep_on_boundary {
            // Midway between the two corners of a boundary edge.
            m.assign(0, e, w(0.5));
            m.assign(1, (e + 1) % 3, w(0.5));
        } else {
            // Two corners and the two points opposite the edge.
            let opposite_in_ring = if corner.is_boundary {
                corner.face_in_ring - 1
            } else {
                (corner.face_in_ring + 5) % 6
            };

            m.assign(0, e, w(1.0 / 3.0));
            m.assign(1, (e + 1) % 3, w(1.0 / 3.0));
            m.assign(2, (e + 2) % 3, w(1.0 / 6.0));
            m.assign(3, corner.ring_points[opposite_in_ring], w(1.0 / 6.0));
        }
    }

    // Regular edge points are reassigned quartic weights. Only irregular ones
    // are combined as E' = P/4 + 3E/4.
    fn promote_cubic_edge_points_to_quartic(
        &self,
        matrix: &mut SparseMatrix<R>,
        accumulator: &mut DenseRow<R>,
    ) {
        const ON_BOUNDARY: [f64; 3] = [16.0, 7.0, 1.0];
        const REGULAR_BOUNDARY: [f64; 5] = [13.0, 3.0, 3.0, 4.0, 1.0];
        const REGULAR_INTERIOR: [f64; 7] = [12.0, 4.0, 3.0, 1.0, 0.0, 1.0, 3.0];

        let one_over_24 = w::<R>(1.0 / 24.0);

        for (c, corner) in self.topology.corners.iter().enumerate() {
            for (row, on_boundary) in [
                (5 * c + 1, corner.ep_on_boundary),
                (5 * c + 2, corner.em_on_boundary),
            ] {
                let reassign: Option<&[f64]> = if on_boundary && !corner.is_sharp {
                    Some(&ON_BOUNDARY[..])
                } else if corner.is_regular {
                    Some(if corner.is_boundary {
                        &REGULAR_BOUNDARY[..]
                    } else {
                        &REGULAR_INTERIOR[..]
                    })
                } else {
                    None
                };

                match reassign {
                    Some(weights) => {
                        let mut e = matrix.row_mut(row);
                        debug_assert_eq!(e.len(), weights.len());
                        for (slot, &weight) in weights.iter().enumerate() {
                            e.set_weight(slot, w::<R>(weight) * one_over_24);
                        }
                    }
                    None => {
                        accumulator.clear();
                        accumulator.add_sparse_point(matrix.row(5 * c), w(0.25));
                        accumulator.add_sparse_point(matrix.row(row), w(0.75));
                        write_padded(accumulator, matrix, row);
                    }
                }
            }
        }
    }
}

/// Writes the accumulated row to `row`, padding unused entries with zero
/// weights of point 0.
fn write_padded<R: Real>(accumulator: &DenseRow<R>, matrix: &mut SparseMatrix<R>, row: usize) {
    let mut dst = matrix.row_mut(row);
    let count = accumulator.compact_into(&mut dst);
    for slot in count..dst.len() {
        dst.assign(slot, 0, R::ZERO);
    }
}

// Fit of the Box-spline to the 15 points of the quartic Bezier triangle, from
// the pseudo-inverse of 12 boundary constraints plus one on the midpoint of
// the patch. Bezier points correlate with Gregory points as
//
//     Q0  Q1  Q2  Q3  Q4  Q5  Q6   Q7  Q8  Q9  Q10   Q11  Q12  Q13  Q14
//     G0  G1 G15  G7  G5  G2 G3,4 G8,9 G6 G17 G13,14 G16  G11  G12  G10
//
// where one of each pair of face points stands in for the Bezier point.
#[rustfmt::skip]
const GREGORY_TO_BOX_SPLINE: [[f64; 15]; BOX_SPLINE_POINT_COUNT] = [
    [  8.214411,  7.571190, -7.690082,  2.237840, -1.118922,-16.428828,  0.666666,  0.666666,
                  2.237835,  6.309870,  0.666666, -1.690100, -0.428812, -0.428805,  0.214407 ],
    [ -0.304687,  0.609374,  6.752593,  0.609374, -0.304687,  0.609378, -3.333333, -3.333333,
                  0.609378, -1.247389, -3.333333, -1.247389,  3.276037,  3.276037, -1.638020 ],
    [ -1.118922,  2.237840, -7.690082,  7.571190,  8.214411,  2.237835,  0.666666,  0.666666,
                -16.428828, -1.690100,  0.666666,  6.309870, -0.428805, -0.428812,  0.214407 ],
    [  8.214411,-16.428828,  6.309870, -0.428812,  0.214407,  7.571190,  0.666666,  0.666666,
                 -0.428805, -7.690082,  0.666666, -1.690100,  2.237840,  2.237835, -1.118922 ],
    [ -0.813368,  1.626735, -0.773435, -1.039929,  0.519965,  1.626735,  0.666666,  0.666666,
                 -1.039930, -0.773435,  0.666666,  1.226558, -1.039929, -1.039930,  0.519965 ],
    [  0.519965, -1.039929, -0.773435,  1.626735, -0.813368, -1.039930,  0.666666,  0.666666,
                  1.626735,  1.226558,  0.666666, -0.773435, -1.039930, -1.039929,  0.519965 ],
    [  0.214407, -0.428812,  6.309870,-16.428828,  8.214411, -0.428805,  0.666666,  0.666666,
                  7.571190, -1.690100,  0.666666, -7.690082,  2.237835,  2.237840, -1.118922 ],
    [ -0.304687,  0.609378, -1.247389,  3.276037, -1.638020,  0.609374, -3.333333, -3.333333,
                  3.276037,  6.752593, -3.333333, -1.247389,  0.609374,  0.609378, -0.304687 ],
    [  0.519965, -1.039930,  1.226558, -1.039930,  0.519965, -1.039929,  0.666666,  0.666666,
                 -1.039929, -0.773435,  0.666666, -0.773435,  1.626735,  1.626735, -0.813368 ],
    [ -1.638020,  3.276037, -1.247389,  0.609378, -0.304687,  3.276037, -3.333333, -3.333333,
                  0.609374, -1.247389, -3.333333,  6.752593,  0.609378,  0.609374, -0.304687 ],
    [ -1.118922,  2.237835, -1.690100, -0.428805,  0.214407,  2.237840,  0.666666,  0.666666,
                 -0.428812, -7.690082,  0.666666,  6.309870,  7.571190,-16.428828,  8.214411 ],
    [  0.214407, -0.428805, -1.690100,  2.237835, -1.118922, -0.428812,  0.666666,  0.666666,
                  2.237840,  6.309870,  0.666666, -7.690082,-16.428828,  7.571190,  8.214411 ],
];

const GREGORY_ROWS: [usize; 15] = [0, 1, 15, 7, 5, 2, 4, 8, 6, 17, 14, 16, 11, 12, 10];

/// Converts a triangle [`SourcePatch`] to a quartic Box-spline patch.
///
/// The Box-spline spans fewer shapes than the quartic Bezier triangle, so it
/// cannot interpolate corner limit positions and tangents while keeping the
/// boundary curves. It is instead fit to the Gregory triangle of the patch,
/// for the isolated corner and the general case alike. The result is a dense
/// matrix.
pub fn convert_to_box_spline<R: Real>(source: &SourcePatch, matrix: &mut SparseMatrix<R>) {
    let mut gregory = SparseMatrix::new();
    GregoryTriConverter::new(source).convert(&mut gregory);

    matrix.resize_full(BOX_SPLINE_POINT_COUNT, gregory.column_count());
    for (row, weights) in GREGORY_TO_BOX_SPLINE.iter().enumerate() {
        let weights = weights.map(w::<R>);
        combine_rows_in_full(matrix, row, &gregory, &GREGORY_ROWS, &weights);
    }
}
