//! Seeded random-walk player used by headless runs.

use maze_pursuit_core::{CellCoord, Direction, GridQuery};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Steers the player through the maze with reproducible random turns.
#[derive(Debug)]
pub(crate) struct Autopilot {
    rng: ChaCha8Rng,
    turn_chance: f64,
    heading: Option<Direction>,
}

impl Autopilot {
    pub(crate) fn new(seed: u64, turn_chance: f64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            turn_chance,
            heading: None,
        }
    }

    /// Returns a new heading when the autopilot decides to turn.
    ///
    /// The current heading is kept while it stays open unless a random turn is
    /// rolled; reversing is only chosen in dead ends.
    pub(crate) fn steer(&mut self, cell: CellCoord, grid: &impl GridQuery) -> Option<Direction> {
        let open: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|direction| grid.is_traversable(cell.step(*direction)))
            .collect();
        if open.is_empty() {
            return None;
        }

        let blocked = self
            .heading
            .map_or(true, |heading| !open.contains(&heading));
        if !blocked && !self.rng.gen_bool(self.turn_chance) {
            return None;
        }

        let forward: Vec<Direction> = open
            .iter()
            .copied()
            .filter(|direction| Some(direction.reversed()) != self.heading)
            .collect();
        let choices = if forward.is_empty() { &open } else { &forward };
        let next = choices.choose(&mut self.rng).copied()?;

        if Some(next) == self.heading {
            return None;
        }
        self.heading = Some(next);
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_pursuit_core::MazeView;
    use maze_pursuit_world::layout;

    #[test]
    fn same_seed_walks_the_same_way() {
        let maze = layout::default_maze().expect("default layout parses");
        let grid = MazeView::new(&maze, false);
        let walk = |seed| {
            let mut autopilot = Autopilot::new(seed, 0.5);
            (1..20)
                .map(|column| autopilot.steer(CellCoord::new(1, column), &grid))
                .collect::<Vec<_>>()
        };

        assert_eq!(walk(7), walk(7));
    }

    #[test]
    fn dead_end_turns_around() {
        let maze = layout::parse("WWWW\nW  W\nWWWW").expect("layout parses");
        let grid = MazeView::new(&maze, false);
        let mut autopilot = Autopilot::new(1, 0.0);

        assert_eq!(
            autopilot.steer(CellCoord::new(1, 1), &grid),
            Some(Direction::Right)
        );
        assert_eq!(autopilot.steer(CellCoord::new(1, 1), &grid), None);
        assert_eq!(
            autopilot.steer(CellCoord::new(1, 2), &grid),
            Some(Direction::Left)
        );
    }

    #[test]
    fn boxed_in_player_never_turns() {
        let maze = layout::parse("WWW\nW W\nWWW").expect("layout parses");
        let grid = MazeView::new(&maze, false);
        let mut autopilot = Autopilot::new(3, 1.0);

        assert_eq!(autopilot.steer(CellCoord::new(1, 1), &grid), None);
    }
}
