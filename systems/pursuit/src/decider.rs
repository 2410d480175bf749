//! Per-mode single-step movement strategies.

use maze_pursuit_core::{Axis, BehaviorMode, CellCoord, Direction, GridQuery, MovementIntent};

use crate::distance_field::{self, DistanceField};

/// Orientation remembered by the wall-following patrol between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PatrolMemory {
    /// Axis the adversary is currently sweeping along.
    pub axis: Axis,
    /// Direction of travel along [`Self::axis`].
    pub direction: Direction,
}

impl Default for PatrolMemory {
    fn default() -> Self {
        Self {
            axis: Axis::Horizontal,
            direction: Axis::Horizontal.default_direction(),
        }
    }
}

/// Turns a behavior mode into a single movement intent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MovementDecider {
    patrol: PatrolMemory,
}

impl MovementDecider {
    /// Creates a decider whose patrol starts from the provided memory.
    #[must_use]
    pub fn with_patrol(patrol: PatrolMemory) -> Self {
        Self { patrol }
    }

    /// Patrol orientation carried into the next tick.
    #[must_use]
    pub fn patrol(&self) -> PatrolMemory {
        self.patrol
    }

    /// Picks the step for an adversary at `position` following `mode`.
    ///
    /// `target` is the player's cell for `Chase` and `RunAway` and the
    /// remembered sound for `InvestigateSound`. A missing target falls back to
    /// patrolling for this tick without touching the mode.
    pub fn decide(
        &mut self,
        position: CellCoord,
        mode: BehaviorMode,
        target: Option<CellCoord>,
        grid: &impl GridQuery,
    ) -> MovementIntent {
        let Some(target) = target.filter(|_| mode != BehaviorMode::Patrol) else {
            return self.patrol_step(position, grid);
        };

        let field = distance_field::compute(target, grid);
        match mode {
            BehaviorMode::Chase | BehaviorMode::InvestigateSound => {
                approach(position, &field, grid)
            }
            BehaviorMode::RunAway => flee(position, &field, grid),
            BehaviorMode::Patrol => self.patrol_step(position, grid),
        }
    }

    fn patrol_step(&mut self, position: CellCoord, grid: &impl GridQuery) -> MovementIntent {
        let open = |direction: Direction| grid.is_traversable(position.step(direction));
        let current = self.patrol.direction;
        let other_axis = self.patrol.axis.other();
        let fallback = other_axis.default_direction();

        let candidates = [
            (self.patrol.axis, current),
            (self.patrol.axis, current.reversed()),
            (other_axis, fallback),
            (other_axis, fallback.reversed()),
        ];

        match candidates.into_iter().find(|(_, direction)| open(*direction)) {
            Some((axis, direction)) => {
                self.patrol = PatrolMemory { axis, direction };
                MovementIntent::Step(direction)
            }
            None => MovementIntent::Stay,
        }
    }
}

/// Steps onto the reachable neighbor closest to the field's source.
fn approach(position: CellCoord, field: &DistanceField, grid: &impl GridQuery) -> MovementIntent {
    let mut best: Option<(Direction, u32)> = None;
    for (direction, neighbor) in open_neighbors(position, grid) {
        let Some(distance) = field.distance(neighbor) else {
            continue;
        };
        if best.map_or(true, |(_, closest)| distance < closest) {
            best = Some((direction, distance));
        }
    }

    best.map_or(MovementIntent::Stay, |(direction, _)| {
        MovementIntent::Step(direction)
    })
}

/// Steps onto the neighbor farthest from the field's source; a neighbor the
/// source cannot reach at all beats any finite distance.
fn flee(position: CellCoord, field: &DistanceField, grid: &impl GridQuery) -> MovementIntent {
    let mut best: Option<(Direction, Option<u32>)> = None;
    for (direction, neighbor) in open_neighbors(position, grid) {
        let distance = field.distance(neighbor);
        let better = match (best, distance) {
            (None, _) => true,
            (Some((_, None)), _) => false,
            (Some((_, Some(_))), None) => true,
            (Some((_, Some(farthest))), Some(distance)) => distance > farthest,
        };
        if better {
            best = Some((direction, distance));
        }
    }

    best.map_or(MovementIntent::Stay, |(direction, _)| {
        MovementIntent::Step(direction)
    })
}

fn open_neighbors<'a, G: GridQuery>(
    position: CellCoord,
    grid: &'a G,
) -> impl Iterator<Item = (Direction, CellCoord)> + 'a {
    Direction::ALL
        .into_iter()
        .map(move |direction| (direction, position.step(direction)))
        .filter(move |(_, neighbor)| grid.is_traversable(*neighbor))
}
