use itertools::Itertools;

use crate::{board::Grid, cell::CellState, error::AutomatonError};

/// Counts cells that hold `from` in `before` and `to` in `after`.
pub fn count_transitions<S>(
    before: &Grid<S>,
    after: &Grid<S>,
    from: S,
    to: S,
) -> Result<usize, AutomatonError>
where
    S: CellState,
{
    if before.side() != after.side() {
        return Err(AutomatonError::SideMismatch {
            expected: before.side(),
            actual: after.side(),
        });
    }

    let count = before
        .cells()
        .iter()
        .zip_eq(after.cells())
        .filter(|&(&old, &new)| old == from && new == to)
        .count();

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Automaton, DormantLife, cell::DormantCell};

    #[test]
    fn counts_dormancy_flows() {
        let mut dl =
            DormantLife::new(vec![vec![0, 1, 2], vec![0, 1, 2], vec![0, 0, 0]], Some(3)).unwrap();
        let before = dl.grid().clone();
        let after = dl.step().unwrap().clone();

        let count = |from, to| count_transitions(&before, &after, from, to).unwrap();

        assert_eq!(count(DormantCell::Alive, DormantCell::Dormant), 2);
        assert_eq!(count(DormantCell::Dormant, DormantCell::Alive), 2);
        assert_eq!(count(DormantCell::Alive, DormantCell::Dead), 0);
        assert_eq!(count(DormantCell::Dead, DormantCell::Alive), 0);
    }

    #[test]
    fn sides_must_match() {
        let small = Grid::filled(3, DormantCell::Dead);
        let large = Grid::filled(4, DormantCell::Dead);

        assert!(count_transitions(&small, &large, DormantCell::Dead, DormantCell::Dead).is_err());
    }
}
