//! Limit masks of *Catmull-Clark* vertices.
//!
//! The tangents computed here differ from the *Catmull-Clark* limit tangents
//! used elsewhere: their direction is the same but their length is scaled so
//! that the edge points of the regular case coincide with those of the
//! bicubic B-spline.
//!
//! Intermediate values are computed in `f64` and cast to the weight type.
use std::f64::consts::PI;

use super::LimitWeights;
use crate::Real;

/// Limit masks of the *Catmull-Clark* scheme.
#[derive(Clone, Copy, Debug, Default)]
pub struct CatmarkLimits;

// Scale factors of the limit tangent from the eigenvalues of the subdivision
// matrix, for valences below 30.
const EF_TABLE: [f64; 30] = [
    0.0,
    0.0,
    0.0,
    8.1281572906372312e-01,
    0.5,
    3.6364406329142801e-01,
    2.8751379706077085e-01,
    2.3868786685851678e-01,
    2.0454364190756097e-01,
    1.7922903958061159e-01,
    1.5965737079986253e-01,
    1.4404233443011302e-01,
    1.3127568415883017e-01,
    1.2063172212675841e-01,
    1.1161437506676930e-01,
    1.0387245516114274e-01,
    9.7150019090724835e-02,
    9.1255917505950648e-02,
    8.6044378511602668e-02,
    8.1402211336798411e-02,
    7.7240129516184072e-02,
    7.3486719751997026e-02,
    7.0084157479797987e-02,
    6.6985104030725440e-02,
    6.4150420569810074e-02,
    6.1547457638637268e-02,
    5.9148757447233989e-02,
    5.6931056818776957e-02,
    5.4874512279256417e-02,
    5.2962091433796134e-02,
];

/// Returns the limit tangent scale factor for `valence`.
fn tangent_coefficient(valence: usize) -> f64 {
    debug_assert!(valence > 0);

    if let Some(&ef) = EF_TABLE.get(valence) {
        return ef;
    }

    let inv_valence = 1.0 / valence as f64;
    let cos_t = (2.0 * PI * inv_valence).cos();
    let divisor = (cos_t + 5.0) + ((cos_t + 9.0) * (cos_t + 1.0)).sqrt();

    16.0 * inv_valence / divisor
}

impl LimitWeights for CatmarkLimits {
    #[inline]
    fn interior_ring_width(valence: usize) -> usize {
        1 + 2 * valence
    }

    #[inline]
    fn boundary_ring_width(valence: usize) -> usize {
        2 * valence
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

        let f_valence = valence as f64;
        let one_over_val_plus5 = 1.0 / (f_valence + 5.0);
        let p_coeff = one_over_val_plus5 / f_valence;
        let tan_coeff = tangent_coefficient(valence) * 0.5 * one_over_val_plus5;
        let face_angle = 2.0 * PI / f_valence;

        // Position weights alternate between edge and face points of the
        // ring. The regular case is exact.
        let (p0, p_edge, p_face) = if 4 == valence {
            (
                R::from_f64(4.0 / 9.0),
                R::from_f64(1.0 / 9.0),
                R::from_f64(1.0 / 36.0),
            )
        } else {
            (
                R::from_f64(f_valence * one_over_val_plus5),
                R::from_f64(p_coeff * 4.0),
                R::from_f64(p_coeff),
            )
        };
        p[0] = p0;
        for i in 0..valence {
            p[1 + 2 * i] = p_edge;
            p[2 + 2 * i] = p_face;
        }

        let Some((ep, em)) = edge_points else {
            return;
        };
        debug_assert!(ep.len() >= width && em.len() >= width);

        // Each edge point of the tangent depends on three cosine terms, so
        // the tangent weights are accumulated, in `em`. Index 0 (the corner)
        // is zero.
        em[..width].fill(R::ZERO);
        {
            let t = &mut em[1..width];
            for i in 0..valence {
                let i_prev = (i + valence - 1) % valence;
                let i_next = (i + 1) % valence;

                let cos_i = if 4 == valence {
                    [1.0, 0.0, -1.0, 0.0][i]
                } else {
                    (face_angle * i as f64).cos()
                };
                let c = tan_coeff * cos_i;

                t[2 * i_prev] += R::from_f64(c * 2.0);
                t[2 * i_prev + 1] += R::from_f64(c);
                t[2 * i] += R::from_f64(c * 4.0);
                t[2 * i + 1] += R::from_f64(c);
                t[2 * i_next] += R::from_f64(c * 2.0);
            }
        }

        // Rotate the tangent along the leading and trailing edges of the
        // patch face and offset it by P.
        let ep_offset = 2 * ((valence - face_in_ring) % valence);
        let em_offset = 2 * ((2 * valence - face_in_ring - 1) % valence);

        ep[1..width].copy_from_slice(&em[1..width]);
        ep[1..width].rotate_left(ep_offset);
        em[1..width].rotate_left(em_offset);

        ep[0] = p[0];
        em[0] = p[0];
        for i in 1..width {
            ep[i] += p[i];
            em[i] += p[i];
        }
    }

    fn boundary_point_weights<R: Real>(
        valence: usize,
        face_in_ring: usize,
        p: &mut [R],
        edge_points: Option<(&mut [R], &mut [R])>,
    ) {
        debug_assert!(valence > 1);

        let num_faces = valence - 1;
        debug_assert!(face_in_ring < num_faces);

        let face_angle = PI / num_faces as f64;
        let width = Self::boundary_ring_width(valence);
        let n = width - 1;
        debug_assert!(p.len() >= width);

        p[..width].fill(R::ZERO);
        p[0] = R::from_f64(4.0 / 6.0);
        p[1] = R::from_f64(1.0 / 6.0);
        p[n] = R::from_f64(1.0 / 6.0);

        let Some((ep, em)) = edge_points else {
            return;
        };
        debug_assert!(ep.len() >= width && em.len() >= width);

        // The boundary tangent is (1/6, -1/6) along the two boundary edges.
        // The interior tangent involves the whole ring.
        let t_boundary_1 = 1.0 / 6.0;
        let t_boundary_n = -1.0 / 6.0;

        // The interior tangent is built in `em`, which is overwritten last.
        em[..width].fill(R::ZERO);
        {
            let tan = &mut em[..width];
            let k = num_faces as f64;
            let theta = face_angle;
            let c = theta.cos();
            let s = theta.sin();
            let div3 = 1.0 / 3.0;
            let div3kc = 1.0 / (3.0 * k + c);
            let gamma = -4.0 * s * div3kc;
            let alpha_0k = -((1.0 + 2.0 * c) * (1.0 + c).sqrt()) * div3kc / (1.0 - c).sqrt();
            let beta_0 = s * div3kc;

            tan[0] = R::from_f64(gamma * div3);
            tan[1] = R::from_f64(alpha_0k * div3);
            tan[2] = R::from_f64(beta_0 * div3);
            tan[n] = R::from_f64(alpha_0k * div3);

            for i in 1..valence - 1 {
                let sin_theta_i = (theta * i as f64).sin();
                let sin_theta_i_plus1 = (theta * (i + 1) as f64).sin();

                let alpha = 4.0 * sin_theta_i * div3kc;
                let beta = (sin_theta_i + sin_theta_i_plus1) * div3kc;

                tan[1 + 2 * i] = R::from_f64(alpha * div3);
                tan[2 + 2 * i] = R::from_f64(beta * div3);
            }
        }

        // `e` holds the interior tangent on entry.
        let edge_point = |e: &mut [R], edge: usize| {
            let angle = face_angle * edge as f64;
            let (sin_angle, cos_angle) = angle.sin_cos();
            let sin_r = R::from_f64(sin_angle);

            for e in &mut e[..width] {
                *e *= sin_r;
            }
            e[0] += p[0];
            e[1] += p[1] + R::from_f64(t_boundary_1 * cos_angle);
            e[n] += p[n] + R::from_f64(t_boundary_n * cos_angle);
        };

        // Ep on the leading (boundary) edge only has two weights.
        if 0 == face_in_ring {
            ep[..width].fill(R::ZERO);
            ep[0] = R::from_f64(2.0 / 3.0);
            ep[1] = R::from_f64(1.0 / 3.0);
        } else {
            ep[..width].copy_from_slice(&em[..width]);
            edge_point(ep, face_in_ring);
        }

        // Likewise Em on the trailing edge.
        if face_in_ring == num_faces - 1 {
            em[..width].fill(R::ZERO);
            em[0] = R::from_f64(2.0 / 3.0);
            em[n] = R::from_f64(1.0 / 3.0);
        } else {
            edge_point(em, (face_in_ring + 1) % valence);
        }
    }
}
