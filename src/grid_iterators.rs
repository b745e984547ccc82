use crate::cells::Cartesian2DCoordinate;
use crate::units::{ColumnIndex, Height, RowIndex, Width};

#[inline]
fn from_row_column_indices(col_index: ColumnIndex, row_index: RowIndex) -> Cartesian2DCoordinate {
    let (ColumnIndex(col), RowIndex(row)) = (col_index, row_index);
    Cartesian2DCoordinate::new(col as u32, row as u32)
}

/// Row-major walk over every coordinate of a rectangular grid.
#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    cells_count: usize,
    row_width: Width,
}

impl CellIter {
    pub(crate) fn new(width: Width, height: Height) -> CellIter {
        CellIter {
            current_cell_number: 0,
            cells_count: width.0 * height.0,
            row_width: width,
        }
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = Cartesian2DCoordinate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let Width(width) = self.row_width;
            let coord = from_row_column_indices(ColumnIndex(self.current_cell_number % width),
                                                RowIndex(self.current_cell_number / width));
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn cell_iter_is_row_major() {
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        let coords = CellIter::new(Width(3), Height(2)).collect::<Vec<_>>();
        assert_eq!(coords,
                   &[gc(0, 0), gc(1, 0), gc(2, 0), gc(0, 1), gc(1, 1), gc(2, 1)]);
    }

    #[test]
    fn cell_iter_exact_size() {
        let mut iter = CellIter::new(Width(4), Height(4));
        assert_eq!(iter.len(), 16);
        let _ = iter.next();
        assert_eq!(iter.len(), 15);
    }

    #[test]
    fn empty_iterator() {
        assert_eq!(CellIter::new(Width(0), Height(5)).count(), 0);
    }
}
