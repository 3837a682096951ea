#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Offsets the position on a torus of the given side, wrapping around at every edge.
    pub fn offset_wrapping(self, row_offset: isize, col_offset: isize, side: usize) -> Self {
        fn wrap(center: usize, offset: isize, side: usize) -> usize {
            (center as isize + offset).rem_euclid(side as isize) as usize
        }

        Self {
            row: wrap(self.row, row_offset, side),
            col: wrap(self.col, col_offset, side),
        }
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_wraps_both_edges() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.offset_wrapping(-1, -1, 5), Position::new(4, 4));

        let far_corner = Position::new(4, 4);
        assert_eq!(far_corner.offset_wrapping(1, 1, 5), Position::new(0, 0));
        assert_eq!(far_corner.offset_wrapping(0, -1, 5), Position::new(4, 3));
    }
}
