use crate::{board::Grid, pos::Position};

/// Row/column offsets of the eight Moore neighbours.
const NEIGHBOR_RELATIVE_POSITIONS: &[[isize; 2]] = &[
    [-1, -1],
    [-1, 0],
    [-1, 1],
    [0, -1],
    [0, 1],
    [1, -1],
    [1, 0],
    [1, 1],
];

/// Counts, for every cell, how many of its eight Moore neighbours equal `target`.
///
/// Neighbour indices wrap modulo the side in both dimensions, so on a 3x3 grid a cell sees
/// every other cell exactly once. Runs in `O(side²)`.
pub fn count_neighbors<T>(grid: &Grid<T>, target: T) -> Grid<u8>
where
    T: PartialEq,
{
    let side = grid.side();
    let indicator = grid.map(|cell| *cell == target);

    Grid::from_fn(side, |pos| neighbor_positions(pos, side).filter(|&n| indicator[n]).count() as u8)
}

/// The eight periodic neighbours of `pos`. Positions repeat when the side is small enough for
/// several offsets to wrap onto the same cell.
pub fn neighbor_positions(pos: Position, side: usize) -> impl Iterator<Item = Position> {
    NEIGHBOR_RELATIVE_POSITIONS
        .iter()
        .map(move |&[row_offset, col_offset]| pos.offset_wrapping(row_offset, col_offset, side))
}
