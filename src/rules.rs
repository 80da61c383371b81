//! B3/S23 transition rule expressed as a three-way write decision.

/// What the apply phase does to a destination cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Write DEAD: a live cell with fewer than two or more than three neighbors.
    Die,
    /// Write LIVE: exactly three neighbors (birth or survival).
    Live,
    /// Leave the destination untouched; it already holds the prior value.
    Keep,
}

/// Decide the transition for a cell from its snapshot state and neighbor count.
#[inline]
pub fn decide(alive: bool, live_neighbors: u8) -> Transition {
    if alive && !(2..=3).contains(&live_neighbors) {
        Transition::Die
    } else if live_neighbors == 3 {
        Transition::Live
    } else {
        Transition::Keep
    }
}

/// The next state with `Keep` resolved against the current state.
#[inline]
pub fn next_state(alive: bool, live_neighbors: u8) -> bool {
    match decide(alive, live_neighbors) {
        Transition::Die => false,
        Transition::Live => true,
        Transition::Keep => alive,
    }
}

#[cfg(test)]
mod tests {
    use super::{Transition, decide, next_state};

    fn expected_next(alive: bool, neighbors: u8) -> bool {
        if alive {
            neighbors == 2 || neighbors == 3
        } else {
            neighbors == 3
        }
    }

    #[test]
    fn next_state_matches_b3_s23() {
        for alive in [false, true] {
            for neighbors in 0u8..=8 {
                assert_eq!(
                    next_state(alive, neighbors),
                    expected_next(alive, neighbors),
                    "alive={alive} neighbors={neighbors}"
                );
            }
        }
    }

    #[test]
    fn unchanged_cells_are_never_written() {
        for neighbors in 0u8..=8 {
            if neighbors != 3 {
                assert_eq!(decide(false, neighbors), Transition::Keep);
            }
        }
        assert_eq!(decide(true, 2), Transition::Keep);
    }

    #[test]
    fn survival_with_three_is_an_explicit_write() {
        assert_eq!(decide(true, 3), Transition::Live);
        assert_eq!(decide(false, 3), Transition::Live);
    }

    #[test]
    fn under_and_overpopulation_die() {
        for neighbors in [0u8, 1, 4, 5, 6, 7, 8] {
            assert_eq!(decide(true, neighbors), Transition::Die);
        }
    }
}
