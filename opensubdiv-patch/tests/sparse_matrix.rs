//! Tests for the sparse matrix and its row views.

use opensubdiv_patch::far::SparseMatrix;
use opensubdiv_patch::{Error, Index};

/// Two rows over four columns: `[0.5 * p0 + 0.5 * p2]` and
/// `[0.25 * p1 + 0.25 * p3 + 0.5 * p0]`.
fn two_rows() -> SparseMatrix<f32> {
    let mut matrix = SparseMatrix::new();
    matrix.resize_with_row_sizes(4, &[2, 3]);

    let mut row = matrix.row_mut(0);
    row.assign(0, 0, 0.5);
    row.assign(1, 2, 0.5);

    let mut row = matrix.row_mut(1);
    row.assign(0, 1, 0.25);
    row.assign(1, 3, 0.25);
    row.assign(2, 0, 0.5);

    matrix
}

#[test]
fn test_empty_matrix() {
    let matrix = SparseMatrix::<f64>::new();
    assert!(matrix.is_empty());
    assert_eq!(matrix.row_count(), 0);
    assert_eq!(matrix.element_count(), 0);
    assert!(matrix.columns().is_empty());
}

#[test]
fn test_row_sizes_and_offsets() {
    let matrix = two_rows();

    assert_eq!(matrix.row_count(), 2);
    assert_eq!(matrix.column_count(), 4);
    assert_eq!(matrix.element_count(), 5);
    assert_eq!(matrix.row_size(0), 2);
    assert_eq!(matrix.row_size(1), 3);
    assert_eq!(matrix.row_offsets(), &[0, 2, 5]);
}

#[test]
fn test_row_views() {
    let matrix = two_rows();

    let row = matrix.row(1);
    assert_eq!(row.len(), 3);
    assert!(!row.is_empty());
    assert_eq!(row.columns(), &[Index(1), Index(3), Index(0)]);
    assert_eq!(row.weights(), &[0.25, 0.25, 0.5]);
    assert_eq!(row.weight_sum(), 1.0);
    assert_eq!(
        row.iter().collect::<Vec<_>>(),
        vec![(1, 0.25), (3, 0.25), (0, 0.5)]
    );

    assert_eq!(matrix.row_columns(0), &[Index(0), Index(2)]);
    assert_eq!(matrix.row_elements(0), &[0.5, 0.5]);
    assert_eq!(matrix.rows().count(), 2);
}

#[test]
fn test_flat_buffers() {
    let matrix = two_rows();

    assert_eq!(matrix.columns_as_u32(), &[0, 2, 1, 3, 0]);
    assert_eq!(matrix.elements(), &[0.5, 0.5, 0.25, 0.25, 0.5]);
}

#[test]
fn test_get_row_out_of_bounds() {
    let matrix = two_rows();

    assert!(matrix.get_row(1).is_ok());
    assert!(matches!(
        matrix.get_row(2),
        Err(Error::IndexOutOfBounds { index: 2, max: 2 })
    ));
}

#[test]
fn test_resize_full() {
    let mut matrix = SparseMatrix::<f64>::new();
    matrix.resize_full(3, 5);

    assert_eq!(matrix.element_count(), 15);
    for row in matrix.rows() {
        assert_eq!(row.len(), 5);
        assert_eq!(
            row.columns(),
            &[Index(0), Index(1), Index(2), Index(3), Index(4)]
        );
        assert!(row.weights().iter().all(|&w| 0.0 == w));
    }
}

#[test]
fn test_resize_clears_previous_content() {
    let mut matrix = two_rows();
    matrix.resize_with_row_sizes(2, &[1]);

    assert_eq!(matrix.row_count(), 1);
    assert_eq!(matrix.element_count(), 1);
    assert_eq!(matrix.row(0).weights(), &[0.0]);
}

#[test]
fn test_incremental_row_sizes() {
    let mut matrix = SparseMatrix::<f32>::new();
    // Fewer elements reserved than needed: rows grow the storage.
    matrix.resize(3, 6, 2);
    matrix.set_row_size(0, 2);
    matrix.set_row_size(1, 0);
    matrix.set_row_size(2, 4);

    assert_eq!(matrix.element_count(), 6);
    assert!(matrix.row(1).is_empty());
    assert_eq!(matrix.row(2).len(), 4);
}

#[test]
fn test_copy_row() {
    let mut matrix = SparseMatrix::<f64>::new();
    matrix.resize_with_row_sizes(3, &[2, 1, 2]);
    {
        let mut row = matrix.row_mut(0);
        row.assign(0, 1, 0.75);
        row.assign(1, 2, 0.25);
    }
    matrix.row_mut(1).assign(0, 0, 1.0);

    matrix.copy_row(2, 0);

    assert_eq!(matrix.row(2).columns(), &[Index(1), Index(2)]);
    assert_eq!(matrix.row(2).weights(), &[0.75, 0.25]);
    // The row in between is untouched.
    assert_eq!(matrix.row(1).weights(), &[1.0]);
}

#[test]
fn test_row_mut_weights() {
    let mut matrix = two_rows();
    {
        let mut row = matrix.row_mut(0);
        row.set_weight(1, 0.25);
        row.weights_mut()[0] = 0.75;
        assert_eq!(row.columns(), &[Index(0), Index(2)]);
        assert_eq!(row.weights(), &[0.75, 0.25]);
    }
    assert_eq!(matrix.row(0).weight_sum(), 1.0);
}

#[test]
fn test_swap() {
    let mut a = two_rows();
    let mut b = SparseMatrix::new();
    a.swap(&mut b);

    assert!(a.is_empty());
    assert_eq!(b.row_count(), 2);
}

#[test]
fn test_apply() -> anyhow::Result<()> {
    let matrix = two_rows();
    let points = [[0.0, 0.0], [4.0, 0.0], [2.0, 2.0], [0.0, 4.0]];

    let result = matrix.apply(&points)?;
    assert_eq!(result, vec![[1.0, 1.0], [1.0, 1.0]]);

    Ok(())
}

#[test]
fn test_apply_wrong_buffer_size() {
    let matrix = two_rows();

    assert!(matches!(
        matrix.apply(&[[1.0f32; 3]; 3]),
        Err(Error::InvalidBufferSize {
            expected: 4,
            actual: 3
        })
    ));
}

#[test]
fn test_remove_valence2_duplicates() {
    let mut matrix = SparseMatrix::<f64>::new();
    matrix.resize_with_row_sizes(6, &[5, 2]);
    {
        // Corner 1 appears twice, point 5 is not a corner.
        let mut row = matrix.row_mut(0);
        row.assign(0, 1, 0.25);
        row.assign(1, 5, 0.25);
        row.assign(2, 1, 0.125);
        row.assign(3, 0, 0.25);
        row.assign(4, 2, 0.125);
    }
    {
        let mut row = matrix.row_mut(1);
        row.assign(0, 5, 0.5);
        row.assign(1, 5, 0.5);
    }

    matrix.remove_valence2_duplicates(4);

    assert_eq!(matrix.element_count(), 6);
    let row = matrix.row(0);
    assert_eq!(row.columns(), &[Index(1), Index(5), Index(0), Index(2)]);
    assert_eq!(row.weights(), &[0.375, 0.25, 0.25, 0.125]);

    // Only corner columns are merged.
    assert_eq!(matrix.row(1).len(), 2);

    let once = matrix.clone();
    matrix.remove_valence2_duplicates(4);
    assert_eq!(matrix, once);
}
