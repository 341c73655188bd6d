//! Tests for the conversion to linear patches.

mod utils;
use utils::*;

use opensubdiv_patch::far::{PatchBuilder, PatchBuilderOptions, PatchType, SourcePatch, SparseMatrix};
use opensubdiv_patch::sdc::Scheme;

fn linear<R: opensubdiv_patch::Real>(scheme: Scheme, source: &SourcePatch) -> SparseMatrix<R> {
    let builder = PatchBuilder::new(scheme, PatchBuilderOptions::default()).expect("supported scheme");
    let mut matrix = SparseMatrix::new();
    builder
        .convert_to_patch_type(source, builder.linear_patch_type(), &mut matrix)
        .expect("linear conversion");
    matrix
}

#[test]
fn test_regular_quad_limit_positions() {
    let matrix = linear::<f64>(Scheme::CatmullClark, &regular_quad());

    assert_eq!(matrix.row_count(), PatchType::Quads.control_vertex_count());
    assert_eq!(row_sizes(&matrix), [9, 9, 9, 9]);
    assert_rows_sum_to_one(&matrix, EPSILON_F64);
    assert_no_duplicate_columns(&matrix);

    let edge = 1.0 / 9.0;
    let face = 1.0 / 36.0;
    let p = dense_row(&matrix, 0);
    #[rustfmt::skip]
    let expected = [
        4.0 / 9.0, edge, face, edge,
        edge, face, edge, face,
        0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, face,
    ];
    assert_dense_eq(&p, &expected, EPSILON_F64);
}

#[test]
fn test_sharp_corner_is_interpolated() {
    let matrix = linear::<f64>(Scheme::CatmullClark, &sharp_corner_quad());

    assert_eq!(row_sizes(&matrix), [1, 3, 9, 3]);
    assert_eq!(matrix.row(0).iter().collect::<Vec<_>>(), vec![(0, 1.0)]);
    assert_rows_sum_to_one(&matrix, EPSILON_F64);
}

#[test]
fn test_boundary_corner_uses_boundary_neighbors() {
    let matrix = linear::<f64>(Scheme::CatmullClark, &boundary_quad());

    assert_eq!(row_sizes(&matrix), [3, 3, 9, 9]);
    assert_rows_sum_to_one(&matrix, EPSILON_F64);

    // Corner 0, the next corner along the boundary and the local point on
    // the other boundary edge.
    let p = dense_row(&matrix, 0);
    assert!((p[0] - 2.0 / 3.0).abs() < EPSILON_F64);
    assert!((p[1] - 1.0 / 6.0).abs() < EPSILON_F64);
    assert!((p[4] - 1.0 / 6.0).abs() < EPSILON_F64);
}

#[test]
fn test_val2_duplicates_are_merged() {
    let matrix = linear::<f64>(Scheme::CatmullClark, &val2_quad());

    assert_eq!(row_sizes(&matrix), [5, 8, 9, 8]);
    assert_rows_sum_to_one(&matrix, EPSILON_F64);
    assert_no_duplicate_columns(&matrix);

    let mut again = matrix.clone();
    again.remove_valence2_duplicates(4);
    assert_eq!(again, matrix);
}

#[test]
fn test_regular_triangle_limit_positions() {
    let matrix = linear::<f64>(Scheme::Loop, &regular_triangle());

    assert_eq!(matrix.row_count(), PatchType::Triangles.control_vertex_count());
    assert_eq!(row_sizes(&matrix), [7, 7, 7]);
    assert_rows_sum_to_one(&matrix, EPSILON_F64);

    let p = dense_row(&matrix, 1);
    assert!((p[1] - 0.5).abs() < EPSILON_F64);
    for column in [0, 2, 6, 7, 8, 9] {
        assert!((p[column] - 1.0 / 12.0).abs() < EPSILON_F64, "column {column}");
    }
}

#[test]
fn test_boundary_triangle() {
    let matrix = linear::<f32>(Scheme::Loop, &boundary_triangle());

    assert_eq!(row_sizes(&matrix), [3, 3, 7]);
    assert_rows_sum_to_one(&matrix, EPSILON_F32);
    assert_no_duplicate_columns(&matrix);
}

#[test]
fn test_val2_triangle() {
    let source = patch(&[(2, 0, false), (6, 0, false), (6, 0, false)]);
    assert_eq!(source.point_count(), 8);

    let matrix = linear::<f64>(Scheme::Loop, &source);
    assert_eq!(row_sizes(&matrix), [3, 6, 6]);
    assert_rows_sum_to_one(&matrix, EPSILON_F64);
    assert_no_duplicate_columns(&matrix);
}
