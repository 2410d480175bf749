#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Pursuit.
//!
//! The world owns the maze, the player, the adversary roster, the special
//! effect timer and the score. It is the only place pellets are consumed and
//! the only place positions change; adversary decisions arrive as
//! [`Command::SteerAdversary`] values produced by the pursuit system.

pub mod layout;

use std::time::Duration;

use maze_pursuit_core::{
    AdversaryId, BehaviorMode, CellCoord, CellState, Command, Direction, Event, GridQuery, Maze,
    MazeView, MovementIntent, Pellet, PlacementError,
};

/// Points awarded for capturing a vulnerable adversary.
pub const CAPTURE_AWARD: u32 = 200;

const DEFAULT_SPECIAL_EFFECT_DURATION: Duration = Duration::from_secs(6);
const DEFAULT_ADVERSARY_STEP_INTERVAL: Duration = Duration::from_millis(400);

/// Tunable rules applied by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    special_effect_duration: Duration,
    adversary_step_interval: Duration,
}

impl WorldConfig {
    /// Creates a new configuration.
    ///
    /// `adversary_step_interval` is the simulated time an adversary must
    /// accumulate before each step; a zero interval lets adversaries step on
    /// every steering command.
    #[must_use]
    pub const fn new(special_effect_duration: Duration, adversary_step_interval: Duration) -> Self {
        Self {
            special_effect_duration,
            adversary_step_interval,
        }
    }

    /// Duration the special effect stays active after a power pellet.
    #[must_use]
    pub const fn special_effect_duration(&self) -> Duration {
        self.special_effect_duration
    }

    /// Simulated time an adversary accumulates between steps.
    #[must_use]
    pub const fn adversary_step_interval(&self) -> Duration {
        self.adversary_step_interval
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_SPECIAL_EFFECT_DURATION,
            DEFAULT_ADVERSARY_STEP_INTERVAL,
        )
    }
}

/// Progress of the current run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunStatus {
    /// The run is still being played.
    Running,
    /// Every regular and power pellet was collected.
    Won,
    /// An adversary caught the player.
    Lost,
}

/// Represents the authoritative Maze Pursuit world state.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    maze: Maze,
    player: Option<Player>,
    adversaries: Vec<Adversary>,
    next_adversary_id: u32,
    special_effect_remaining: Duration,
    score: u32,
    status: RunStatus,
    tick_index: u64,
}

impl World {
    /// Creates an empty world using the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates an empty world using the provided configuration.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            config,
            maze: Maze::default(),
            player: None,
            adversaries: Vec::new(),
            next_adversary_id: 0,
            special_effect_remaining: Duration::ZERO,
            score: 0,
            status: RunStatus::Running,
            tick_index: 0,
        }
    }

    fn grid(&self) -> MazeView<'_> {
        MazeView::new(&self.maze, self.special_effect_active())
    }

    fn special_effect_active(&self) -> bool {
        !self.special_effect_remaining.is_zero()
    }

    fn adversary_index(&self, adversary: AdversaryId) -> Option<usize> {
        self.adversaries.iter().position(|entry| entry.id == adversary)
    }

    fn placement_error(&self, cell: CellCoord) -> Option<PlacementError> {
        let grid = self.grid();
        if !grid.in_bounds(cell) {
            Some(PlacementError::OutOfBounds)
        } else if grid.is_wall(cell) {
            Some(PlacementError::Wall)
        } else {
            None
        }
    }

    fn advance_special_effect(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if !self.special_effect_active() {
            return;
        }

        self.special_effect_remaining = self.special_effect_remaining.saturating_sub(dt);
        if !self.special_effect_active() {
            tracing::debug!("special effect expired");
            out_events.push(Event::SpecialEffectExpired);
        }
    }

    fn advance_player(&mut self, out_events: &mut Vec<Event>) {
        let grid = MazeView::new(&self.maze, !self.special_effect_remaining.is_zero());
        let Some(player) = self.player.as_mut() else {
            return;
        };

        player.previous = player.cell;
        let Some((direction, destination)) = player.next_move(&grid) else {
            return;
        };

        let from = player.cell;
        player.cell = destination;
        player.heading = Some(direction);
        out_events.push(Event::PlayerMoved {
            from,
            to: destination,
        });

        self.collect_at(destination, out_events);
        if self.status != RunStatus::Running {
            return;
        }

        // Adversaries report their mode after the player moves, so an active
        // effect already counts as vulnerable here.
        let vulnerable_by_effect = self.special_effect_active();
        let mut index = 0;
        while index < self.adversaries.len() {
            if self.collides(index) {
                let vulnerable =
                    vulnerable_by_effect || self.adversaries[index].mode == BehaviorMode::RunAway;
                if self.resolve_collision(index, vulnerable, out_events) {
                    continue;
                }
                return;
            }
            index += 1;
        }
    }

    fn collect_at(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let Some(pellet) = self.maze.collect(cell) else {
            return;
        };

        self.score = self.score.saturating_add(pellet.score());
        tracing::debug!(?cell, ?pellet, score = self.score, "pellet collected");
        out_events.push(Event::PelletCollected { cell, pellet });

        match pellet {
            Pellet::Power => {
                let duration = self.config.special_effect_duration;
                self.special_effect_remaining = duration;
                if !duration.is_zero() {
                    out_events.push(Event::SpecialEffectStarted { duration });
                }
            }
            Pellet::Sound => out_events.push(Event::SoundEmitted { cell }),
            Pellet::Regular => {}
        }

        if pellet.counts_toward_clear() && self.maze.remaining_collectibles() == 0 {
            self.status = RunStatus::Won;
            tracing::info!(score = self.score, "maze cleared");
            out_events.push(Event::MazeCleared);
        }
    }

    fn steer(
        &mut self,
        adversary: AdversaryId,
        mode: BehaviorMode,
        intent: MovementIntent,
        player_visible: bool,
        out_events: &mut Vec<Event>,
    ) {
        let Some(index) = self.adversary_index(adversary) else {
            return;
        };

        let step_interval = self.config.adversary_step_interval;
        let grid = MazeView::new(&self.maze, !self.special_effect_remaining.is_zero());
        let entry = &mut self.adversaries[index];
        entry.player_visible = player_visible;

        if entry.mode != mode {
            tracing::debug!(
                adversary = adversary.get(),
                from = entry.mode.label(),
                to = mode.label(),
                "adversary mode changed"
            );
            out_events.push(Event::AdversaryModeChanged {
                adversary,
                from: entry.mode,
                to: mode,
            });
            entry.mode = mode;
        }

        entry.previous = entry.cell;
        if entry.accumulator < step_interval {
            return;
        }
        entry.accumulator = entry.accumulator.saturating_sub(step_interval);

        let destination = entry.cell.apply(intent);
        if destination != entry.cell && grid.is_traversable(destination) {
            let from = entry.cell;
            entry.cell = destination;
            out_events.push(Event::AdversaryAdvanced {
                adversary,
                from,
                to: destination,
            });
        }

        if self.collides(index) {
            let vulnerable = self.adversaries[index].mode == BehaviorMode::RunAway;
            let _ = self.resolve_collision(index, vulnerable, out_events);
        }
    }

    /// Detects the player and the adversary sharing a cell or swapping cells.
    fn collides(&self, index: usize) -> bool {
        let (Some(player), Some(adversary)) = (self.player.as_ref(), self.adversaries.get(index))
        else {
            return false;
        };

        let same_cell = adversary.cell == player.cell;
        let pass_through = adversary.cell == player.previous
            && adversary.previous == player.cell
            && player.previous != player.cell;
        same_cell || pass_through
    }

    /// Returns `true` when the adversary was captured and removed.
    fn resolve_collision(
        &mut self,
        index: usize,
        vulnerable: bool,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let adversary = self.adversaries[index];
        if vulnerable {
            let _ = self.adversaries.remove(index);
            self.score = self.score.saturating_add(CAPTURE_AWARD);
            tracing::debug!(adversary = adversary.id.get(), "adversary captured");
            out_events.push(Event::AdversaryCaptured {
                adversary: adversary.id,
                cell: adversary.cell,
                award: CAPTURE_AWARD,
            });
            true
        } else {
            self.status = RunStatus::Lost;
            tracing::info!(
                adversary = adversary.id.get(),
                score = self.score,
                "player caught"
            );
            out_events.push(Event::PlayerCaught {
                adversary: adversary.id,
                cell: adversary.cell,
            });
            false
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureMaze { maze } => {
            let rows = maze.rows();
            let columns = maze.columns();
            let config = world.config;
            *world = World::with_config(config);
            world.maze = maze;
            out_events.push(Event::MazeConfigured { rows, columns });
        }
        Command::PlacePlayer { cell } => {
            if let Some(reason) = world.placement_error(cell) {
                out_events.push(Event::PlacementRejected { cell, reason });
                return;
            }

            let _ = world.maze.set(cell, CellState::Empty);
            world.player = Some(Player::at(cell));
            out_events.push(Event::PlayerPlaced { cell });
        }
        Command::SpawnAdversary { cell } => {
            if let Some(reason) = world.placement_error(cell) {
                out_events.push(Event::PlacementRejected { cell, reason });
                return;
            }

            let id = AdversaryId::new(world.next_adversary_id);
            world.next_adversary_id = world.next_adversary_id.saturating_add(1);
            world.adversaries.push(Adversary::spawn(id, cell));
            out_events.push(Event::AdversarySpawned {
                adversary: id,
                cell,
            });
        }
        Command::SetPlayerHeading { direction } => {
            let grid = MazeView::new(&world.maze, world.special_effect_active());
            if let Some(player) = world.player.as_mut() {
                player.intended = Some(direction);
                if grid.is_traversable(player.cell.step(direction)) {
                    player.heading = Some(direction);
                }
            }
        }
        Command::Tick { dt } => {
            if world.status != RunStatus::Running {
                return;
            }

            world.tick_index = world.tick_index.saturating_add(1);
            world.advance_special_effect(dt, out_events);
            world.advance_player(out_events);
            if world.status != RunStatus::Running {
                return;
            }

            for adversary in &mut world.adversaries {
                adversary.accumulator = adversary.accumulator.saturating_add(dt);
            }
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::SteerAdversary {
            adversary,
            mode,
            intent,
            player_visible,
        } => {
            if world.status != RunStatus::Running {
                return;
            }
            world.steer(adversary, mode, intent, player_visible, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{RunStatus, World};
    use maze_pursuit_core::{AdversarySnapshot, AdversaryView, CellCoord, Maze, MazeView};

    /// Provides read-only access to the maze.
    #[must_use]
    pub fn maze(world: &World) -> &Maze {
        &world.maze
    }

    /// Captures the grid view consumed by the adversary behavior engine.
    #[must_use]
    pub fn grid_view(world: &World) -> MazeView<'_> {
        world.grid()
    }

    /// Cell currently occupied by the player, if one was placed.
    #[must_use]
    pub fn player_cell(world: &World) -> Option<CellCoord> {
        world.player.as_ref().map(|player| player.cell)
    }

    /// Captures a read-only view of the adversaries inhabiting the maze.
    #[must_use]
    pub fn adversary_view(world: &World) -> AdversaryView {
        AdversaryView::from_snapshots(
            world
                .adversaries
                .iter()
                .map(|adversary| AdversarySnapshot {
                    id: adversary.id,
                    cell: adversary.cell,
                    mode: adversary.mode,
                    player_visible: adversary.player_visible,
                })
                .collect(),
        )
    }

    /// Reports whether the special effect is currently active.
    #[must_use]
    pub fn is_special_effect_active(world: &World) -> bool {
        world.special_effect_active()
    }

    /// Simulated time left before the special effect expires.
    #[must_use]
    pub fn special_effect_remaining(world: &World) -> Duration {
        world.special_effect_remaining
    }

    /// Points accumulated during the current run.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Progress of the current run.
    #[must_use]
    pub fn status(world: &World) -> RunStatus {
        world.status
    }

    /// Number of ticks processed since the maze was configured.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[derive(Clone, Copy, Debug)]
struct Player {
    cell: CellCoord,
    previous: CellCoord,
    heading: Option<Direction>,
    intended: Option<Direction>,
}

impl Player {
    fn at(cell: CellCoord) -> Self {
        Self {
            cell,
            previous: cell,
            heading: None,
            intended: None,
        }
    }

    /// The intended heading wins whenever it is open; otherwise the player
    /// keeps travelling along its current heading.
    fn next_move(&self, grid: &impl GridQuery) -> Option<(Direction, CellCoord)> {
        [self.intended, self.heading]
            .into_iter()
            .flatten()
            .map(|direction| (direction, self.cell.step(direction)))
            .find(|(_, destination)| grid.is_traversable(*destination))
    }
}

#[derive(Clone, Copy, Debug)]
struct Adversary {
    id: AdversaryId,
    cell: CellCoord,
    previous: CellCoord,
    mode: BehaviorMode,
    player_visible: bool,
    accumulator: Duration,
}

impl Adversary {
    fn spawn(id: AdversaryId, cell: CellCoord) -> Self {
        Self {
            id,
            cell,
            previous: cell,
            mode: BehaviorMode::Patrol,
            player_visible: false,
            accumulator: Duration::ZERO,
        }
    }
}
