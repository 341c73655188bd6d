//! Limit masks of *Loop* vertices.
//!
//! Positions use the smooth and crease limit masks of the *Loop* scheme.
//! Tangents are scaled so that the edge points of a regular vertex match the
//! quartic Box-spline.
use std::f64::consts::PI;

use super::LimitWeights;
use crate::Real;

/// Limit masks of the *Loop* scheme.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoopLimits;

const ROOT3: f64 = 1.732_050_807_568_877_3;

impl LoopLimits {
    /// Smooth limit position mask of an interior vertex.
    fn smooth_position<R: Real>(valence: usize, p: &mut [R]) {
        let (vertex, edge) = if 6 == valence {
            (R::from_f64(0.5), R::from_f64(1.0 / 12.0))
        } else {
            let f_valence = valence as f64;
            let cos_theta = (2.0 * PI / f_valence).cos();

            let beta = 0.25 * cos_theta + 0.375;
            let gamma = (0.625 - beta * beta) / f_valence;

            let edge = R::from_f64(1.0 / (f_valence + 3.0 / (8.0 * gamma)));
            (R::from_f64(1.0 - edge.to_f64() * f_valence), edge)
        };

        p[0] = vertex;
        p[1..=valence].fill(edge);
    }

    /// Limit tangent across a crease, for a boundary vertex of `valence`
    /// edges. Index 0 is the vertex, `1..=valence` the edges.
    fn crease_tangent<R: Real>(valence: usize, t2: &mut [R]) {
        let interior_edge_count = valence - 2;
        let last = valence;

        t2[..=valence].fill(R::ZERO);
        match interior_edge_count {
            0 => {
                t2[0] = R::from_f64(-6.0);
                t2[1] = R::from_f64(3.0);
                t2[last] = R::from_f64(3.0);
            }
            1 => {
                t2[0] = R::from_f64(-3.0);
                t2[2] = R::from_f64(3.0);
            }
            2 => {
                let root3 = R::from_f64(ROOT3);
                let root3_by2 = R::from_f64(ROOT3 * 0.5);

                t2[0] = -root3;
                t2[1] = -root3_by2;
                t2[last] = -root3_by2;
                t2[2] = root3;
                t2[3] = root3;
            }
            _ => {
                // Flipped so that the tangent points inward, across the
                // surface.
                let theta = PI / (interior_edge_count + 1) as f64;

                let c_weight = R::from_f64(-3.0 * theta.sin());
                t2[1] = c_weight;
                t2[last] = c_weight;

                let e_coeff = -3.0 * 2.0 * (theta.cos() - 1.0);
                for i in 1..=interior_edge_count {
                    t2[1 + i] = R::from_f64(e_coeff * (i as f64 * theta).sin());
                }
            }
        }
    }
}

impl LimitWeights for LoopLimits {
    #[inline]
    fn interior_ring_width(valence: usize) -> usize {
        1 + valence
    }

    #[inline]
    fn boundary_ring_width(valence: usize) -> usize {
        1 + valence
    }

    fn interior_point_weights<R: Real>(
        valence: usize,
        face_in_ring: usize,
        p: &mut [R],
        edge_points: Option<(&mut [R], &mut [R])>,
    ) {
        debug_assert!(valence > 0);
        debug_assert!(face_in_ring < valence);

        let width = Self::interior_ring_width(valence);
        debug_assert!(p.len() >= width);

        // The position mask is symmetric; no orientation is involved.
        Self::smooth_position(valence, p);

        let Some((ep, em)) = edge_points else {
            return;
        };
        debug_assert!(ep.len() >= width && em.len() >= width);

        // Tangent along the first edge, scaled by the subdominant eigenvalue
        // (3 + cos(2π/v)) / 8, a normalization of 2/v, and 2/3 to place the
        // cubic point. The tangent along any other edge is a rotation.
        let theta = 2.0 * PI / valence as f64;
        let tan_scale = R::from_f64((3.0 + 2.0 * theta.cos()) / (6.0 * valence as f64));

        // The edge point along edge 0 is built in `em`, rotated last.
        em[0] = p[0];
        for i in 0..valence {
            let t1 = if 6 == valence {
                [1.0, 0.5, -0.5, -1.0, -0.5, 0.5][i]
            } else {
                (theta * i as f64).cos()
            };
            em[1 + i] = p[1 + i] + R::from_f64(t1) * tan_scale;
        }

        ep[..width].copy_from_slice(&em[..width]);
        ep[1..width].rotate_right(face_in_ring);
        em[1..width].rotate_right((face_in_ring + 1) % valence);
    }

    fn boundary_point_weights<R: Real>(
        valence: usize,
        face_in_ring: usize,
        p: &mut [R],
        edge_points: Option<(&mut [R], &mut [R])>,
    ) {
        debug_assert!(valence > 1);
        debug_assert!(face_in_ring < valence - 1);

        let width = Self::boundary_ring_width(valence);
        debug_assert!(p.len() >= width);

        // Crease limit position: the vertex and its two boundary edges.
        p[..width].fill(R::ZERO);
        p[0] = R::from_f64(4.0 / 6.0);
        p[1] = R::from_f64(1.0 / 6.0);
        p[valence] = R::from_f64(1.0 / 6.0);

        let Some((ep, em)) = edge_points else {
            return;
        };
        debug_assert!(ep.len() >= width && em.len() >= width);

        // Tangent along the crease, toward the leading edge.
        let t1_leading = R::from_f64(1.0 / 6.0);
        let t1_trailing = -R::from_f64(1.0 / 6.0);
        let t2_scale = R::from_f64(1.0 / 24.0);

        // The cross tangent is built in `em`, which is overwritten last.
        Self::crease_tangent(valence, em);

        // Interior edge points rotate the tangent across the surface
        // numerically toward the edge. `e` holds the cross tangent on entry.
        let face_angle = R::from_f64(PI / (valence - 1) as f64);
        let edge_point = |e: &mut [R], edge: usize| {
            let angle = face_angle * R::from_usize(edge);
            let cos_angle = angle.cos();
            let sin_angle = angle.sin();

            for e in &mut e[..width] {
                *e = t2_scale * *e * sin_angle;
            }
            e[0] += p[0];
            e[1] += p[1] + t1_leading * cos_angle;
            e[valence] += p[valence] + t1_trailing * cos_angle;
        };

        if 0 == face_in_ring {
            ep[..width].fill(R::ZERO);
            ep[0] = R::from_f64(2.0 / 3.0);
            ep[1] = R::from_f64(1.0 / 3.0);
        } else {
            ep[..width].copy_from_slice(&em[..width]);
            edge_point(ep, face_in_ring);
        }

        if face_in_ring == valence - 2 {
            em[..width].fill(R::ZERO);
            em[0] = R::from_f64(2.0 / 3.0);
            em[valence] = R::from_f64(1.0 / 3.0);
        } else {
            edge_point(em, (face_in_ring + 1) % valence);
        }
    }
}
