#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Pursuit engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views such as [`MazeView`] through the [`GridQuery`] trait, and respond
//! exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical title shown when the experience boots.
pub const GAME_TITLE: &str = "Maze Pursuit";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the world's maze with the provided grid.
    ConfigureMaze {
        /// Cell grid that becomes the authoritative maze.
        maze: Maze,
    },
    /// Places the player at the provided cell, clearing any collectible there.
    PlacePlayer {
        /// Cell the player should occupy.
        cell: CellCoord,
    },
    /// Requests that a new adversary be spawned at the provided cell.
    SpawnAdversary {
        /// Cell the adversary should occupy once spawned.
        cell: CellCoord,
    },
    /// Records the heading the player wants to travel in.
    SetPlayerHeading {
        /// Direction the player intends to move in.
        direction: Direction,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Reports an adversary's decision for the current tick.
    SteerAdversary {
        /// Identifier of the adversary being steered.
        adversary: AdversaryId,
        /// Behavior mode the adversary settled on this tick.
        mode: BehaviorMode,
        /// Single step the adversary wants to take.
        intent: MovementIntent,
        /// Whether the adversary had the player in its line of sight.
        player_visible: bool,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a new maze replaced the previous one.
    MazeConfigured {
        /// Number of rows contained in the maze.
        rows: u32,
        /// Number of columns contained in the maze.
        columns: u32,
    },
    /// Confirms that the player was placed into the maze.
    PlayerPlaced {
        /// Cell the player occupies after placement.
        cell: CellCoord,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
    },
    /// Reports that the player consumed a collectible.
    PelletCollected {
        /// Cell that held the collectible.
        cell: CellCoord,
        /// Kind of collectible that was consumed.
        pellet: Pellet,
    },
    /// Reports that a sound pellet emitted a sound at the provided cell.
    SoundEmitted {
        /// Cell the sound originated from.
        cell: CellCoord,
    },
    /// Announces that the special effect became active.
    SpecialEffectStarted {
        /// Duration of simulated time the effect remains active.
        duration: Duration,
    },
    /// Announces that the special effect ran out.
    SpecialEffectExpired,
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an adversary was created.
    AdversarySpawned {
        /// Identifier assigned to the newly spawned adversary.
        adversary: AdversaryId,
        /// Cell the adversary occupies after spawning.
        cell: CellCoord,
    },
    /// Confirms that an adversary moved between two cells.
    AdversaryAdvanced {
        /// Identifier of the adversary that moved.
        adversary: AdversaryId,
        /// Cell the adversary occupied before moving.
        from: CellCoord,
        /// Cell the adversary occupies after moving.
        to: CellCoord,
    },
    /// Announces that an adversary reported a different behavior mode.
    AdversaryModeChanged {
        /// Identifier of the adversary whose mode changed.
        adversary: AdversaryId,
        /// Mode reported before the change.
        from: BehaviorMode,
        /// Mode reported after the change.
        to: BehaviorMode,
    },
    /// Confirms that the player captured a vulnerable adversary.
    AdversaryCaptured {
        /// Identifier of the captured adversary.
        adversary: AdversaryId,
        /// Cell where the capture happened.
        cell: CellCoord,
        /// Points awarded for the capture.
        award: u32,
    },
    /// Reports that an adversary caught the player, ending the run.
    PlayerCaught {
        /// Identifier of the adversary that caught the player.
        adversary: AdversaryId,
        /// Cell where the player was caught.
        cell: CellCoord,
    },
    /// Reports that every regular and power pellet has been collected.
    MazeCleared,
    /// Reports that a placement request was rejected.
    PlacementRejected {
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
}

/// Reasons a placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the maze.
    OutOfBounds,
    /// The requested cell is a wall.
    Wall,
}

/// Location of a single grid cell expressed as row and column coordinates.
///
/// Coordinates are signed so that neighbor arithmetic at the maze border
/// produces out-of-bounds values instead of wrapping; bounds checks reject
/// them as not traversable.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellCoord {
    row: i32,
    column: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Cell reached by taking a single step in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (row_delta, column_delta) = direction.delta();
        Self {
            row: self.row.saturating_add(row_delta),
            column: self.column.saturating_add(column_delta),
        }
    }

    /// Cell reached by applying the provided intent; `Stay` yields the same cell.
    #[must_use]
    pub const fn apply(self, intent: MovementIntent) -> Self {
        match intent {
            MovementIntent::Stay => self,
            MovementIntent::Step(direction) => self.step(direction),
        }
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }
}

/// Cardinal movement directions available to the player and adversaries.
///
/// Every direction is a unit `(row_delta, column_delta)` pair with exactly one
/// non-zero component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Fixed iteration order used whenever directions are enumerated.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step expressed as `(row_delta, column_delta)`.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    /// Direction pointing the opposite way along the same axis.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Axis the direction travels along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }

    /// Direction that leads from `from` to the adjacent cell `to`, if any.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        let row_diff = from.row().abs_diff(to.row());
        let column_diff = from.column().abs_diff(to.column());
        if row_diff + column_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Self::Right)
            } else {
                Some(Self::Left)
            }
        } else if to.row() > from.row() {
            Some(Self::Down)
        } else {
            Some(Self::Up)
        }
    }
}

/// Pair of opposing cardinal directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Left and right.
    Horizontal,
    /// Up and down.
    Vertical,
}

impl Axis {
    /// The other cardinal pair.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Direction chosen when travel along this axis starts afresh.
    #[must_use]
    pub const fn default_direction(self) -> Direction {
        match self {
            Self::Horizontal => Direction::Right,
            Self::Vertical => Direction::Down,
        }
    }
}

/// Single-step decision produced for an entity each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementIntent {
    /// Remain on the current cell; the zero vector.
    #[default]
    Stay,
    /// Move one cell in the provided direction.
    Step(Direction),
}

impl MovementIntent {
    /// Step expressed as `(row_delta, column_delta)`; `Stay` is `(0, 0)`.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Stay => (0, 0),
            Self::Step(direction) => direction.delta(),
        }
    }

    /// Direction of travel, if the intent moves at all.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Stay => None,
            Self::Step(direction) => Some(direction),
        }
    }
}

/// Top-level strategy an adversary is currently following.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum BehaviorMode {
    /// Sweeping the maze without a target.
    #[default]
    Patrol,
    /// Pursuing a visible player.
    Chase,
    /// Fleeing while the special effect makes the adversary vulnerable.
    RunAway,
    /// Heading toward the last sound the adversary was told about.
    InvestigateSound,
}

impl BehaviorMode {
    /// Short lowercase label used by presentation layers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Patrol => "patrol",
            Self::Chase => "chase",
            Self::RunAway => "run away",
            Self::InvestigateSound => "investigate sound",
        }
    }
}

/// Unique identifier assigned to an adversary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdversaryId(u32);

impl AdversaryId {
    /// Creates a new adversary identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable representation of a single adversary's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdversarySnapshot {
    /// Unique identifier assigned to the adversary.
    pub id: AdversaryId,
    /// Grid cell currently occupied by the adversary.
    pub cell: CellCoord,
    /// Behavior mode the adversary last reported.
    pub mode: BehaviorMode,
    /// Whether the adversary last reported the player in its line of sight.
    pub player_visible: bool,
}

/// Read-only snapshot describing all adversaries within the maze.
#[derive(Clone, Debug, Default)]
pub struct AdversaryView {
    snapshots: Vec<AdversarySnapshot>,
}

impl AdversaryView {
    /// Creates a new adversary view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AdversarySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured adversary snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &AdversarySnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the adversary with the provided identifier, if present.
    #[must_use]
    pub fn get(&self, id: AdversaryId) -> Option<&AdversarySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Number of adversaries captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no adversaries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AdversarySnapshot> {
        self.snapshots
    }
}

/// Classification of a single maze cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Impassable wall.
    Wall,
    /// Traversable cell without a collectible.
    #[default]
    Empty,
    /// Traversable cell holding a regular pellet.
    RegularPellet,
    /// Traversable cell holding a power pellet.
    PowerPellet,
    /// Traversable cell holding a sound pellet.
    SoundPellet,
}

impl CellState {
    /// Reports whether the cell blocks movement and sight.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }

    /// Collectible held by the cell, if any.
    #[must_use]
    pub const fn pellet(self) -> Option<Pellet> {
        match self {
            Self::RegularPellet => Some(Pellet::Regular),
            Self::PowerPellet => Some(Pellet::Power),
            Self::SoundPellet => Some(Pellet::Sound),
            Self::Wall | Self::Empty => None,
        }
    }
}

/// Collectible variants the player can consume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pellet {
    /// Plain pellet that only awards points.
    Regular,
    /// Pellet that activates the special effect.
    Power,
    /// Pellet that emits a sound adversaries may investigate.
    Sound,
}

impl Pellet {
    /// Points awarded for consuming the pellet.
    #[must_use]
    pub const fn score(self) -> u32 {
        match self {
            Self::Regular | Self::Sound => 10,
            Self::Power => 50,
        }
    }

    /// Reports whether the pellet counts toward clearing the maze.
    #[must_use]
    pub const fn counts_toward_clear(self) -> bool {
        matches!(self, Self::Regular | Self::Power)
    }
}

/// Errors raised when a maze cannot be built from raw cells.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    /// The cell count does not match the requested dimensions.
    #[error("maze of {rows}x{columns} requires {expected} cells but {actual} were provided")]
    CellCountMismatch {
        /// Requested number of rows.
        rows: u32,
        /// Requested number of columns.
        columns: u32,
        /// Number of cells the dimensions require.
        expected: usize,
        /// Number of cells provided.
        actual: usize,
    },
    /// The requested dimensions cannot be addressed.
    #[error("maze dimensions {rows}x{columns} are too large")]
    TooLarge {
        /// Requested number of rows.
        rows: u32,
        /// Requested number of columns.
        columns: u32,
    },
}

/// Dense row-major grid of cell states with fixed dimensions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    rows: u32,
    columns: u32,
    cells: Vec<CellState>,
}

impl Maze {
    /// Creates a maze of the provided dimensions with every cell set to `fill`.
    ///
    /// Dimensions whose product does not fit in memory produce an empty maze.
    #[must_use]
    pub fn new(rows: u32, columns: u32, fill: CellState) -> Self {
        match cell_capacity(rows, columns) {
            Some(capacity) => Self {
                rows,
                columns,
                cells: vec![fill; capacity],
            },
            None => Self::default(),
        }
    }

    /// Creates a maze from row-major cells, validating the cell count.
    pub fn from_cells(rows: u32, columns: u32, cells: Vec<CellState>) -> Result<Self, MazeError> {
        let expected = cell_capacity(rows, columns).ok_or(MazeError::TooLarge { rows, columns })?;
        if cells.len() != expected {
            return Err(MazeError::CellCountMismatch {
                rows,
                columns,
                expected,
                actual: cells.len(),
            });
        }

        Ok(Self {
            rows,
            columns,
            cells,
        })
    }

    /// Number of rows contained in the maze.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns contained in the maze.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// State of the provided cell, or `None` when it lies outside the maze.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<CellState> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Overwrites the state of a cell, returning whether the cell exists.
    pub fn set(&mut self, cell: CellCoord, state: CellState) -> bool {
        match self.index(cell).and_then(|index| self.cells.get_mut(index)) {
            Some(slot) => {
                *slot = state;
                true
            }
            None => false,
        }
    }

    /// Consumes the collectible at the provided cell, leaving it empty.
    pub fn collect(&mut self, cell: CellCoord) -> Option<Pellet> {
        let slot = self.index(cell).and_then(|index| self.cells.get_mut(index))?;
        let pellet = slot.pellet()?;
        *slot = CellState::Empty;
        Some(pellet)
    }

    /// Number of collectibles that still need to be consumed to clear the maze.
    #[must_use]
    pub fn remaining_collectibles(&self) -> usize {
        self.cells
            .iter()
            .filter_map(|state| state.pellet())
            .filter(|pellet| pellet.counts_toward_clear())
            .count()
    }

    /// Dense cell states stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Row-major offset of the provided cell, if it lies within the maze.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        let row = u32::try_from(cell.row()).ok()?;
        let column = u32::try_from(cell.column()).ok()?;
        if row >= self.rows || column >= self.columns {
            return None;
        }

        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

fn cell_capacity(rows: u32, columns: u32) -> Option<usize> {
    let capacity = u64::from(rows).checked_mul(u64::from(columns))?;
    usize::try_from(capacity).ok()
}

/// Read-only query surface the adversary behavior engine consumes.
///
/// Implementors only need to describe dimensions, walls and the special
/// effect flag; bounds checks and traversability derive from those.
pub trait GridQuery {
    /// Dimensions of the grid as `(rows, columns)`.
    fn dimensions(&self) -> (u32, u32);

    /// Reports whether an in-bounds cell is a wall. Out-of-bounds cells are
    /// not walls, they are simply not traversable.
    fn is_wall(&self, cell: CellCoord) -> bool;

    /// Reports whether the special effect currently makes adversaries vulnerable.
    fn is_special_effect_active(&self) -> bool;

    /// Reports whether the cell lies within the grid.
    fn in_bounds(&self, cell: CellCoord) -> bool {
        let (rows, columns) = self.dimensions();
        let row_fits = u32::try_from(cell.row()).map_or(false, |row| row < rows);
        let column_fits = u32::try_from(cell.column()).map_or(false, |column| column < columns);
        row_fits && column_fits
    }

    /// Reports whether the cell can be entered or seen through.
    fn is_traversable(&self, cell: CellCoord) -> bool {
        self.in_bounds(cell) && !self.is_wall(cell)
    }
}

/// Read-only view pairing a maze with the current special effect flag.
#[derive(Clone, Copy, Debug)]
pub struct MazeView<'a> {
    maze: &'a Maze,
    special_effect_active: bool,
}

impl<'a> MazeView<'a> {
    /// Captures a new view over the provided maze.
    #[must_use]
    pub const fn new(maze: &'a Maze, special_effect_active: bool) -> Self {
        Self {
            maze,
            special_effect_active,
        }
    }

    /// Underlying maze backing the view.
    #[must_use]
    pub const fn maze(&self) -> &'a Maze {
        self.maze
    }

    /// State of the provided cell, or `None` when it lies outside the maze.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<CellState> {
        self.maze.cell(cell)
    }
}

impl GridQuery for MazeView<'_> {
    fn dimensions(&self) -> (u32, u32) {
        (self.maze.rows(), self.maze.columns())
    }

    fn is_wall(&self, cell: CellCoord) -> bool {
        self.maze.cell(cell).map_or(false, CellState::is_wall)
    }

    fn is_special_effect_active(&self) -> bool {
        self.special_effect_active
    }
}
