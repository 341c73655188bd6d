//! Row-compressed sparse matrices of patch weights.
//!
//! A [`SparseMatrix`] holds one row per patch control point. Each row is a
//! short list of `(source point, weight)` pairs, stored contiguously with all
//! other rows. Rows are sized in order with
//! [`set_row_size()`](SparseMatrix::set_row_size) and then filled through a
//! [`SparseRowMut`].
//!
//! Rows are read through a [`SparseRow`], which gives access to the column
//! indices and weights of a single row.
use crate::{Error, Index, Real, Result};

/// Gives read access to a single row of a [`SparseMatrix`].
#[derive(Clone, Copy, Debug)]
pub struct SparseRow<'a, R> {
    columns: &'a [Index],
    weights: &'a [R],
}

impl<'a, R: Real> SparseRow<'a, R> {
    /// Returns the source point indices of the row.
    #[inline]
    pub fn columns(&self) -> &'a [Index] {
        self.columns
    }

    /// Returns the weights of the row.
    #[inline]
    pub fn weights(&self) -> &'a [R] {
        self.weights
    }

    /// Returns the number of entries in the row.
    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        0 == self.len()
    }

    /// Iterates over `(column, weight)` pairs.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (usize, R)> + 'a {
        self.columns
            .iter()
            .zip(self.weights.iter())
            .map(|(&column, &weight)| (column.into(), weight))
    }

    /// Returns the sum of all weights.
    ///
    /// The rows of corner and edge points sum to one.
    pub fn weight_sum(&self) -> R {
        self.weights.iter().fold(R::ZERO, |sum, &w| sum + w)
    }
}

/// Gives write access to a single row of a [`SparseMatrix`].
#[derive(Debug)]
pub struct SparseRowMut<'a, R> {
    columns: &'a mut [Index],
    weights: &'a mut [R],
}

impl<'a, R: Real> SparseRowMut<'a, R> {
    /// Returns the number of entries in the row.
    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        0 == self.len()
    }

    /// Sets entry `slot` of the row to `weight` of source point `column`.
    #[inline]
    pub fn assign(&mut self, slot: usize, column: usize, weight: R) {
        self.columns[slot] = column.into();
        self.weights[slot] = weight;
    }

    /// Sets only the weight of entry `slot`.
    #[inline]
    pub fn set_weight(&mut self, slot: usize, weight: R) {
        self.weights[slot] = weight;
    }

    /// Overwrites this row with the entries of a row of equal size.
    #[inline]
    pub fn copy_from(&mut self, other: SparseRow<'_, R>) {
        self.columns.copy_from_slice(other.columns);
        self.weights.copy_from_slice(other.weights);
    }

    /// Returns the source point indices of the row.
    #[inline]
    pub fn columns(&self) -> &[Index] {
        self.columns
    }

    /// Returns the weights of the row.
    #[inline]
    pub fn weights(&self) -> &[R] {
        self.weights
    }

    /// Returns the weights of the row for modification.
    #[inline]
    pub fn weights_mut(&mut self) -> &mut [R] {
        self.weights
    }
}

/// A row-compressed sparse matrix.
///
/// Columns correspond to the points of a [`SourcePatch`](super::SourcePatch),
/// rows to the control points of a patch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseMatrix<R> {
    row_count: usize,
    column_count: usize,
    element_count: usize,
    // One more entry than rows; entry `r + 1` is written when row `r` is
    // sized.
    row_offsets: Vec<usize>,
    columns: Vec<Index>,
    elements: Vec<R>,
}

impl<R: Real> SparseMatrix<R> {
    /// Create an empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the matrix and prepares it for `rows` rows over `columns`
    /// source points.
    ///
    /// `element_capacity` is a hint of the total number of entries. Rows must
    /// then be sized in order with [`set_row_size()`](Self::set_row_size).
    pub fn resize(&mut self, rows: usize, columns: usize, element_capacity: usize) {
        self.row_count = rows;
        self.column_count = columns;
        self.element_count = 0;

        self.row_offsets.clear();
        self.row_offsets.resize(rows + 1, 0);

        self.columns.clear();
        self.columns.resize(element_capacity, Index::default());
        self.elements.clear();
        self.elements.resize(element_capacity, R::ZERO);
    }

    /// Clears the matrix and makes it dense: every row has one entry per
    /// column, in column order, with all weights zero.
    pub fn resize_full(&mut self, rows: usize, columns: usize) {
        self.resize(rows, columns, rows * columns);
        for row in 0..rows {
            self.set_row_size(row, columns);
            for (slot, column) in self.row_columns_mut(row).iter_mut().enumerate() {
                *column = slot.into();
            }
        }
    }

    /// Clears the matrix and sizes one row per entry of `row_sizes`.
    pub fn resize_with_row_sizes(&mut self, columns: usize, row_sizes: &[usize]) {
        self.resize(row_sizes.len(), columns, row_sizes.iter().sum());
        for (row, &size) in row_sizes.iter().enumerate() {
            self.set_row_size(row, size);
        }
    }

    /// Sets the number of entries of `row`.
    ///
    /// Rows have to be sized in ascending order, each exactly once, after a
    /// call to [`resize()`](Self::resize).
    pub fn set_row_size(&mut self, row: usize, size: usize) {
        debug_assert!(row < self.row_count);
        debug_assert_eq!(self.row_offsets[row], self.element_count);

        let end = self.row_offsets[row] + size;
        self.row_offsets[row + 1] = end;
        self.element_count = end;

        if self.columns.len() < end {
            self.columns.resize(end, Index::default());
            self.elements.resize(end, R::ZERO);
        }
    }

    /// Returns the number of rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns the number of columns, i.e. the number of source points.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Returns the total number of entries over all rows.
    #[inline]
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        0 == self.row_count
    }

    /// Returns the number of entries of `row`.
    #[inline]
    pub fn row_size(&self, row: usize) -> usize {
        self.row_offsets[row + 1].saturating_sub(self.row_offsets[row])
    }

    #[inline]
    fn row_range(&self, row: usize) -> std::ops::Range<usize> {
        self.row_offsets[row]..self.row_offsets[row] + self.row_size(row)
    }

    /// Returns a read view of `row`.
    #[inline]
    pub fn row(&self, row: usize) -> SparseRow<'_, R> {
        let range = self.row_range(row);
        SparseRow {
            columns: &self.columns[range.clone()],
            weights: &self.elements[range],
        }
    }

    /// Returns a write view of `row`.
    #[inline]
    pub fn row_mut(&mut self, row: usize) -> SparseRowMut<'_, R> {
        let range = self.row_range(row);
        SparseRowMut {
            columns: &mut self.columns[range.clone()],
            weights: &mut self.elements[range],
        }
    }

    /// Returns a read view of `row` or an error if it does not exist.
    pub fn get_row(&self, row: usize) -> Result<SparseRow<'_, R>> {
        if row < self.row_count {
            Ok(self.row(row))
        } else {
            Err(Error::IndexOutOfBounds {
                index: row,
                max: self.row_count,
            })
        }
    }

    /// Iterates over all rows in order.
    pub fn rows(&self) -> impl Iterator<Item = SparseRow<'_, R>> {
        (0..self.row_count).map(move |row| self.row(row))
    }

    #[inline]
    pub fn row_columns(&self, row: usize) -> &[Index] {
        &self.columns[self.row_range(row)]
    }

    #[inline]
    pub fn row_columns_mut(&mut self, row: usize) -> &mut [Index] {
        let range = self.row_range(row);
        &mut self.columns[range]
    }

    #[inline]
    pub fn row_elements(&self, row: usize) -> &[R] {
        &self.elements[self.row_range(row)]
    }

    #[inline]
    pub fn row_elements_mut(&mut self, row: usize) -> &mut [R] {
        let range = self.row_range(row);
        &mut self.elements[range]
    }

    /// Returns the column indices of all rows.
    #[inline]
    pub fn columns(&self) -> &[Index] {
        &self.columns[..self.element_count]
    }

    /// Returns the column indices of all rows as raw `u32`s.
    ///
    /// Handy for uploading the matrix to a GPU buffer.
    #[inline]
    pub fn columns_as_u32(&self) -> &[u32] {
        bytemuck::cast_slice(self.columns())
    }

    /// Returns the weights of all rows.
    #[inline]
    pub fn elements(&self) -> &[R] {
        &self.elements[..self.element_count]
    }

    /// Returns the offset of each row into [`columns()`](Self::columns) and
    /// [`elements()`](Self::elements), plus the total element count.
    #[inline]
    pub fn row_offsets(&self) -> &[usize] {
        &self.row_offsets
    }

    /// Copies row `src` into row `dst`. Both rows must be of equal size.
    pub fn copy_row(&mut self, dst: usize, src: usize) {
        debug_assert_eq!(self.row_size(dst), self.row_size(src));

        let src_range = self.row_range(src);
        let dst_start = self.row_offsets[dst];
        self.columns.copy_within(src_range.clone(), dst_start);
        self.elements.copy_within(src_range, dst_start);
    }

    /// Exchanges the contents of two matrices.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Evaluates the matrix for the given source point data.
    ///
    /// Returns one value per row, the weighted sum of the `source` values
    /// referenced by that row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBufferSize`] if `source` does not hold exactly
    /// one value per column.
    pub fn apply<const N: usize>(&self, source: &[[R; N]]) -> Result<Vec<[R; N]>> {
        if source.len() != self.column_count {
            return Err(Error::InvalidBufferSize {
                expected: self.column_count,
                actual: source.len(),
            });
        }

        Ok(self
            .rows()
            .map(|row| {
                let mut point = [R::ZERO; N];
                for (column, weight) in row.iter() {
                    for (p, s) in point.iter_mut().zip(source[column].iter()) {
                        *p += weight * *s;
                    }
                }
                point
            })
            .collect())
    }

    /// Merges duplicate entries of the patch corners in every row.
    ///
    /// Valence-2 interior corners make the same source point appear more than
    /// once in the ring of an adjacent corner. Entries for the first
    /// `regular_face_size` columns (the patch corners) are merged by summing
    /// their weights into the first occurrence; rows without duplicates are
    /// copied unchanged.
    ///
    /// Applying this twice is the same as applying it once.
    pub fn remove_valence2_duplicates(&mut self, regular_face_size: usize) {
        debug_assert!(regular_face_size <= 4);

        let mut merged = SparseMatrix::new();
        merged.resize(self.row_count, self.column_count, self.element_count);

        for row in 0..self.row_count {
            let src = self.row(row);

            let mut corner_hits = [false; 4];
            let mut corner_dups = 0;
            for &column in src.columns() {
                let column = usize::from(column);
                if column < regular_face_size {
                    corner_dups += corner_hits[column] as usize;
                    corner_hits[column] = true;
                }
            }

            merged.set_row_size(row, src.len() - corner_dups);
            let mut dst = merged.row_mut(row);

            if 0 == corner_dups {
                dst.copy_from(src);
                continue;
            }

            let mut corner_slot: [Option<usize>; 4] = [None; 4];
            let mut slot = 0;
            for (column, weight) in src.iter() {
                if column < regular_face_size {
                    if let Some(first) = corner_slot[column] {
                        dst.weights[first] += weight;
                        continue;
                    }
                    corner_slot[column] = Some(slot);
                }
                dst.assign(slot, column, weight);
                slot += 1;
            }
        }

        merged.columns.truncate(merged.element_count);
        merged.elements.truncate(merged.element_count);
        self.swap(&mut merged);
    }
}

/// A dense accumulator for combining sparse rows.
///
/// Tracks which columns were touched so the result can be written back as a
/// sparse row in ascending column order.
#[derive(Debug, Default)]
pub(crate) struct DenseRow<R> {
    weights: Vec<R>,
    mask: Vec<bool>,
}

impl<R: Real> DenseRow<R> {
    pub(crate) fn new(width: usize) -> Self {
        Self {
            weights: vec![R::ZERO; width],
            mask: vec![false; width],
        }
    }

    /// Zeroes all weights and forgets touched columns.
    pub(crate) fn clear(&mut self) {
        self.weights.fill(R::ZERO);
        self.mask.fill(false);
    }

    /// Adds `scale` times `row` and marks its columns.
    pub(crate) fn add_sparse_point(&mut self, row: SparseRow<'_, R>, scale: R) {
        for (column, weight) in row.iter() {
            self.weights[column] += scale * weight;
            self.mask[column] = true;
        }
    }

    /// Adds to a single column without marking it.
    #[inline]
    pub(crate) fn add_unmasked(&mut self, column: usize, weight: R) {
        self.weights[column] += weight;
    }

    /// Writes the touched columns, in ascending order, to the front of `dst`.
    /// Returns the number of entries written.
    pub(crate) fn compact_into(&self, dst: &mut SparseRowMut<'_, R>) -> usize {
        let mut count = 0;
        for (column, &weight) in self.weights.iter().enumerate() {
            if self.mask[column] {
                dst.assign(count, column, weight);
                count += 1;
            }
        }
        count
    }
}

/// Overwrites a full-width row of `dst` with a weighted sum of rows of `src`.
///
/// Zero weights are skipped.
pub(crate) fn combine_rows_in_full<R: Real>(
    dst: &mut SparseMatrix<R>,
    dst_row: usize,
    src: &SparseMatrix<R>,
    src_rows: &[usize],
    src_weights: &[R],
) {
    debug_assert_eq!(dst.row_size(dst_row), dst.column_count());

    let full = dst.row_elements_mut(dst_row);
    full.fill(R::ZERO);
    for (&src_row, &scale) in src_rows.iter().zip(src_weights.iter()) {
        if scale == R::ZERO {
            continue;
        }
        for (column, weight) in src.row(src_row).iter() {
            full[column] += scale * weight;
        }
    }
}
