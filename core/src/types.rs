use core::ops::RangeInclusive;

/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`, 0-based, row-major.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Clipped `[x-1, x+1]` range along one axis of length `len`.
fn axis_span(x: Coord, len: Coord) -> RangeInclusive<Coord> {
    x.saturating_sub(1)..=x.saturating_add(1).min(len.saturating_sub(1))
}

/// Iterates the 3x3 block around a cell, clipped to the board, center included.
///
/// Yields in row-major order. Callers that only want the surrounding cells must
/// skip the center themselves.
#[derive(Clone, Debug)]
pub struct Neighborhood {
    cols: RangeInclusive<Coord>,
    rows: RangeInclusive<Coord>,
    row: Option<Coord>,
    col_iter: RangeInclusive<Coord>,
}

impl Neighborhood {
    pub fn new((row, col): Coord2, (rows, cols): Coord2) -> Self {
        let mut row_span = axis_span(row, rows);
        let col_span = axis_span(col, cols);
        let first_row = row_span.next();
        Self {
            cols: col_span.clone(),
            rows: row_span,
            row: first_row,
            col_iter: col_span,
        }
    }
}

impl Iterator for Neighborhood {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = self.row?;
            if let Some(col) = self.col_iter.next() {
                return Some((row, col));
            }
            self.row = self.rows.next();
            self.col_iter = self.cols.clone();
        }
    }
}
