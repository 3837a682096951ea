use std::ops::{Index, IndexMut};

use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AutomatonError;

use super::pos::Position;

/// A dense square grid stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    side: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    pub fn filled(side: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self {
            side,
            cells: vec![value; side * side],
        }
    }

    /// Builds a grid by calling `f` once per position, in row-major order.
    pub fn from_fn<F>(side: usize, f: F) -> Self
    where
        F: FnMut(Position) -> T,
    {
        let cells = Self::positions_for(side).map(f).collect_vec();
        Self { side, cells }
    }

    /// Builds a grid from its rows, rejecting any row whose length differs from the row count.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, AutomatonError> {
        let side = rows.len();

        if let Some((row, cells)) = rows.iter().find_position(|cells| cells.len() != side) {
            return Err(AutomatonError::NotSquare {
                row,
                len: cells.len(),
                expected: side,
            });
        }

        let cells = rows.into_iter().flatten().collect_vec();
        Ok(Self { side, cells })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    pub fn get<P>(&self, pos: P) -> Option<&T>
    where
        P: Into<Position>,
    {
        let index = self.pos_to_index(pos)?;
        self.cells.get(index)
    }

    pub fn get_mut<P>(&mut self, pos: P) -> Option<&mut T>
    where
        P: Into<Position>,
    {
        let index = self.pos_to_index(pos)?;
        self.cells.get_mut(index)
    }

    pub fn enumerate(&self) -> impl Iterator<Item = (Position, &T)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, cell)| (self.index_to_pos(index), cell))
    }

    pub fn enumerate_mut(&mut self) -> impl Iterator<Item = (Position, &mut T)> {
        let side = self.side;
        self.cells
            .iter_mut()
            .enumerate()
            .map(move |(index, cell)| (Position::new(index / side, index % side), cell))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks panics on a zero chunk size, and an empty grid has no rows anyway.
        self.cells.chunks(self.side.max(1))
    }

    pub fn count<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        self.cells.iter().filter(|cell| predicate(cell)).count()
    }

    pub fn map<U, F>(&self, mut f: F) -> Grid<U>
    where
        F: FnMut(&T) -> U,
    {
        Grid {
            side: self.side,
            cells: self.cells.iter().map(|cell| f(cell)).collect(),
        }
    }

    pub fn try_map<U, E, F>(&self, mut f: F) -> Result<Grid<U>, E>
    where
        F: FnMut(Position, &T) -> Result<U, E>,
    {
        let cells = self
            .enumerate()
            .map(|(pos, cell)| f(pos, cell))
            .collect::<Result<Vec<_>, E>>()?;

        Ok(Grid {
            side: self.side,
            cells,
        })
    }

    pub fn into_rows(self) -> Vec<Vec<T>> {
        let side = self.side.max(1);
        let mut cells = self.cells.into_iter();

        let mut rows = Vec::with_capacity(self.side);
        for _ in 0..self.side {
            rows.push(cells.by_ref().take(side).collect());
        }
        rows
    }

    fn positions_for(side: usize) -> impl Iterator<Item = Position> {
        (0..side)
            .cartesian_product(0..side)
            .map(|(row, col)| Position { row, col })
    }

    fn pos_to_index<P>(&self, pos: P) -> Option<usize>
    where
        P: Into<Position>,
    {
        let Position { row, col } = pos.into();

        if row >= self.side || col >= self.side {
            return None;
        }

        Some(col + row * self.side)
    }

    fn index_to_pos(&self, index: usize) -> Position {
        Position {
            row: index / self.side,
            col: index % self.side,
        }
    }
}

impl<T, P> Index<P> for Grid<T>
where
    P: Into<Position>,
{
    type Output = T;

    fn index(&self, pos: P) -> &T {
        let pos = pos.into();
        self.get(pos)
            .unwrap_or_else(|| panic!("position {pos:?} outside grid of side {}", self.side))
    }
}

impl<T, P> IndexMut<P> for Grid<T>
where
    P: Into<Position>,
{
    fn index_mut(&mut self, pos: P) -> &mut T {
        let pos = pos.into();
        let side = self.side;
        self.get_mut(pos)
            .unwrap_or_else(|| panic!("position {pos:?} outside grid of side {side}"))
    }
}

// Grids travel as a list of rows so that JSON dumps read like the grid itself.
impl<T> Serialize for Grid<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.rows())
    }
}

impl<'de, T> Deserialize<'de> for Grid<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<Vec<T>>::deserialize(deserializer)?;
        Grid::from_rows(rows).map_err(serde::de::Error::custom)
    }
}
