//! Source patch fixtures and comparison helpers shared by the tests.
#![allow(dead_code)]

use opensubdiv_patch::far::{SourcePatch, SourcePatchCorner, SparseMatrix};
use opensubdiv_patch::Real;

/// Absolute tolerance for `f64` comparisons.
pub const EPSILON_F64: f64 = 1e-9;
/// Absolute tolerance for `f32` comparisons.
pub const EPSILON_F32: f64 = 1e-4;

/// Build a corner from `(num_faces, patch_face, boundary)`.
pub fn corner(num_faces: usize, patch_face: usize, boundary: bool) -> SourcePatchCorner {
    SourcePatchCorner::new(num_faces, patch_face, boundary)
}

/// Build a patch from `(num_faces, patch_face, boundary)` per corner.
pub fn patch(corners: &[(usize, usize, bool)]) -> SourcePatch {
    let corners: Vec<_> = corners
        .iter()
        .map(|&(num_faces, patch_face, boundary)| corner(num_faces, patch_face, boundary))
        .collect();
    SourcePatch::new(&corners).expect("valid source patch")
}

/// An interior quad of a regular grid. 16 source points.
pub fn regular_quad() -> SourcePatch {
    patch(&[(4, 0, false); 4])
}

/// An interior quad whose corner 0 has `valence` faces, all others regular.
pub fn isolated_quad(valence: usize) -> SourcePatch {
    patch(&[(valence, 0, false), (4, 0, false), (4, 0, false), (4, 0, false)])
}

/// A quad on the boundary of a regular grid: the edge from corner 0 to
/// corner 1 is a boundary. 12 source points.
pub fn boundary_quad() -> SourcePatch {
    patch(&[(2, 0, true), (2, 1, true), (4, 0, false), (4, 0, false)])
}

/// Like [`boundary_quad()`] with three faces at corner 0.
pub fn irregular_boundary_quad() -> SourcePatch {
    patch(&[(3, 0, true), (2, 1, true), (4, 0, false), (4, 0, false)])
}

/// The corner quad of a regular grid with an infinitely sharp corner 0.
/// 9 source points.
pub fn sharp_corner_quad() -> SourcePatch {
    let mut corners = [
        corner(1, 0, true),
        corner(2, 1, true),
        corner(4, 0, false),
        corner(2, 0, true),
    ];
    corners[0].sharp = true;
    SourcePatch::new(&corners).expect("valid source patch")
}

/// A quad with a valence-2 interior corner 0, all other corners regular.
/// 12 source points.
pub fn val2_quad() -> SourcePatch {
    patch(&[(2, 0, false), (4, 0, false), (4, 0, false), (4, 0, false)])
}

/// An interior triangle of a regular triangle mesh. 12 source points.
pub fn regular_triangle() -> SourcePatch {
    patch(&[(6, 0, false); 3])
}

/// An interior triangle whose corner 0 has `valence` faces.
pub fn isolated_triangle(valence: usize) -> SourcePatch {
    patch(&[(valence, 0, false), (6, 0, false), (6, 0, false)])
}

/// A triangle on the boundary of a regular mesh: the edge from corner 0 to
/// corner 1 is a boundary.
pub fn boundary_triangle() -> SourcePatch {
    patch(&[(3, 0, true), (3, 2, true), (6, 0, false)])
}

/// Expands `row` of `matrix` to one `f64` weight per column.
pub fn dense_row<R: Real>(matrix: &SparseMatrix<R>, row: usize) -> Vec<f64> {
    let mut dense = vec![0.0; matrix.column_count()];
    for (column, weight) in matrix.row(row).iter() {
        dense[column] += weight.to_f64();
    }
    dense
}

/// Weighted sum of dense rows.
pub fn combine_dense<R: Real>(matrix: &SparseMatrix<R>, rows: &[(usize, f64)]) -> Vec<f64> {
    let mut dense = vec![0.0; matrix.column_count()];
    for &(row, scale) in rows {
        for (d, w) in dense.iter_mut().zip(dense_row(matrix, row)) {
            *d += scale * w;
        }
    }
    dense
}

pub fn assert_dense_eq(actual: &[f64], expected: &[f64], epsilon: f64) {
    assert_eq!(actual.len(), expected.len());
    for (column, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            (a - e).abs() < epsilon,
            "column {column}: {a} != {e} (epsilon {epsilon})"
        );
    }
}

/// Asserts that every row of `matrix` sums to one.
pub fn assert_rows_sum_to_one<R: Real>(matrix: &SparseMatrix<R>, epsilon: f64) {
    for (row, weights) in matrix.rows().enumerate() {
        let sum = weights.weight_sum().to_f64();
        assert!(
            (sum - 1.0).abs() < epsilon,
            "row {row} sums to {sum} (epsilon {epsilon})"
        );
    }
}

/// Asserts that no row references a source point twice.
pub fn assert_no_duplicate_columns<R: Real>(matrix: &SparseMatrix<R>) {
    for (row, weights) in matrix.rows().enumerate() {
        let mut columns: Vec<_> = weights.columns().to_vec();
        columns.sort();
        let len = columns.len();
        columns.dedup();
        assert_eq!(len, columns.len(), "row {row} has duplicate columns");
    }
}

/// Returns the row sizes of `matrix`.
pub fn row_sizes<R: Real>(matrix: &SparseMatrix<R>) -> Vec<usize> {
    (0..matrix.row_count()).map(|row| matrix.row_size(row)).collect()
}
