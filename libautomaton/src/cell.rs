//! Cell states and their numeric encoding.
//!
//! The encoding is stable and shared by every rule set: `DEAD = 0`, `ALIVE = 1`, `DORMANT = 2`.

use std::fmt;

use strum::{Display, FromRepr};

/// A closed set of states a rule set allows its cells to hold.
pub trait CellState: Copy + Eq + Default + fmt::Debug + fmt::Display + Send + Sync + 'static {
    const ALIVE: Self;
    const DEAD: Self;

    fn code(self) -> u8;

    /// Decodes a raw value, returning `None` if it is not part of this state set.
    fn from_code(code: u8) -> Option<Self>;
}

/// States of the classical binary automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, FromRepr)]
#[strum(serialize_all = "UPPERCASE")]
#[repr(u8)]
pub enum LifeCell {
    #[default]
    Dead = 0,
    Alive = 1,
}

/// States of the dormant automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, FromRepr)]
#[strum(serialize_all = "UPPERCASE")]
#[repr(u8)]
pub enum DormantCell {
    #[default]
    Dead = 0,
    Alive = 1,
    Dormant = 2,
}

impl CellState for LifeCell {
    const ALIVE: Self = Self::Alive;
    const DEAD: Self = Self::Dead;

    fn code(self) -> u8 {
        self as u8
    }

    fn from_code(code: u8) -> Option<Self> {
        Self::from_repr(code)
    }
}

impl CellState for DormantCell {
    const ALIVE: Self = Self::Alive;
    const DEAD: Self = Self::Dead;

    fn code(self) -> u8 {
        self as u8
    }

    fn from_code(code: u8) -> Option<Self> {
        Self::from_repr(code)
    }
}
