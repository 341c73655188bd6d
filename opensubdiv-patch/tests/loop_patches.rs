//! Tests for the Loop Gregory triangle and Box-spline conversions.

mod utils;
use utils::*;

use opensubdiv_patch::far::{
    convert_to_box_spline, GregoryTriConverter, SourcePatch, SparseMatrix,
    BOX_SPLINE_POINT_COUNT, GREGORY_TRIANGLE_POINT_COUNT,
};

fn gregory_triangle(source: &SourcePatch) -> SparseMatrix<f64> {
    let mut matrix = SparseMatrix::new();
    GregoryTriConverter::new(source).convert(&mut matrix);
    matrix
}

#[test]
fn test_regular_gregory_triangle_rows() {
    let source = regular_triangle();
    let converter = GregoryTriConverter::<f64>::new(&source);
    assert!(!converter.is_isolated_interior_patch());
    assert!(!converter.has_val2_interior_corner());

    let mut matrix = SparseMatrix::new();
    converter.convert(&mut matrix);

    assert_eq!(matrix.row_count(), GREGORY_TRIANGLE_POINT_COUNT);
    assert_eq!(matrix.column_count(), 12);

    #[rustfmt::skip]
    let expected = [
        7, 7, 7, 5, 5,
        7, 7, 7, 5, 5,
        7, 7, 7, 5, 5,
        4, 4, 4,
    ];
    assert_eq!(row_sizes(&matrix), expected);
    assert_rows_sum_to_one(&matrix, EPSILON_F64);
}

#[test]
fn test_regular_corner_and_edge_points() {
    let matrix = gregory_triangle(&regular_triangle());

    // The limit position.
    let p = dense_row(&matrix, 0);
    assert!((p[0] - 0.5).abs() < EPSILON_F64);
    for column in [1, 2, 3, 4, 5, 6] {
        assert!((p[column] - 1.0 / 12.0).abs() < EPSILON_F64);
    }

    // The quartic edge point along the edge to corner 1.
    let ep = dense_row(&matrix, 1);
    #[rustfmt::skip]
    let expected = [
        12.0 / 24.0, 4.0 / 24.0, 3.0 / 24.0, 1.0 / 24.0, 0.0, 1.0 / 24.0, 3.0 / 24.0,
        0.0, 0.0, 0.0, 0.0, 0.0,
    ];
    assert_dense_eq(&ep, &expected, EPSILON_F64);
}

#[test]
fn test_regular_mid_edge_point() {
    let matrix = gregory_triangle(&regular_triangle());

    // The two ends of the edge from corner 0 to 1, and the two points
    // opposite the edge.
    let m = dense_row(&matrix, 15);
    assert!((m[0] - 1.0 / 3.0).abs() < EPSILON_F64);
    assert!((m[1] - 1.0 / 3.0).abs() < EPSILON_F64);
    assert!((m[2] - 1.0 / 6.0).abs() < EPSILON_F64);
    assert!((m[6] - 1.0 / 6.0).abs() < EPSILON_F64);
}

#[test]
fn test_isolated_gregory_triangle_row_sizes() {
    let source = isolated_triangle(5);
    let converter = GregoryTriConverter::<f64>::new(&source);
    assert!(converter.is_isolated_interior_patch());

    let mut matrix = SparseMatrix::new();
    converter.convert(&mut matrix);

    #[rustfmt::skip]
    let expected = [
        6, 6, 6, 9, 9,
        7, 7, 7, 5, 9,
        7, 7, 7, 9, 5,
        9, 4, 9,
    ];
    assert_eq!(row_sizes(&matrix), expected);
    assert_eq!(matrix.element_count(), 9 * 6 + 74);
    assert_rows_sum_to_one(&matrix, EPSILON_F64);
}

#[test]
fn test_isolated_gregory_triangle_f32() {
    for valence in [3, 4, 7, 9] {
        let source = isolated_triangle(valence);
        let mut matrix = SparseMatrix::<f32>::new();
        GregoryTriConverter::new(&source).convert(&mut matrix);

        assert_eq!(matrix.element_count(), 9 * (1 + valence) + 74);
        assert_rows_sum_to_one(&matrix, EPSILON_F32);
    }
}

#[test]
fn test_unisolated_gregory_triangle_row_sums() {
    let sources = [
        boundary_triangle(),
        patch(&[(5, 0, false), (7, 0, false), (6, 0, false)]),
        patch(&[(4, 1, false), (6, 3, false), (5, 2, false)]),
        patch(&[(2, 0, true), (3, 2, true), (6, 0, false)]),
    ];

    for source in &sources {
        let converter = GregoryTriConverter::<f64>::new(source);
        assert!(!converter.is_isolated_interior_patch());

        let mut matrix = SparseMatrix::new();
        converter.convert(&mut matrix);
        assert_eq!(matrix.row_count(), GREGORY_TRIANGLE_POINT_COUNT);
        assert_rows_sum_to_one(&matrix, EPSILON_F64);
    }
}

#[test]
fn test_boundary_mid_edge_point() {
    let matrix = gregory_triangle(&boundary_triangle());

    // Midway between the corners of the boundary edge.
    let m = matrix.row(15);
    assert_eq!(m.len(), 2);
    assert_eq!(m.iter().collect::<Vec<_>>(), vec![(0, 0.5), (1, 0.5)]);
}

#[test]
fn test_regular_box_spline() {
    let source = regular_triangle();
    let mut matrix = SparseMatrix::<f64>::new();
    convert_to_box_spline(&source, &mut matrix);

    assert_eq!(matrix.row_count(), BOX_SPLINE_POINT_COUNT);
    // Dense over all source points.
    assert_eq!(matrix.element_count(), 12 * 12);
    assert_rows_sum_to_one(&matrix, 1e-4);
}

#[test_log::test]
fn test_box_spline_f32_and_f64_agree() {
    let source = isolated_triangle(4);

    let mut single = SparseMatrix::<f32>::new();
    convert_to_box_spline(&source, &mut single);
    let mut double = SparseMatrix::<f64>::new();
    convert_to_box_spline(&source, &mut double);

    assert_eq!(single.element_count(), double.element_count());
    for row in 0..BOX_SPLINE_POINT_COUNT {
        assert_dense_eq(&dense_row(&single, row), &dense_row(&double, row), 1e-3);
    }
}
