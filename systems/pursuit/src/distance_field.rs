//! Breadth-first step distances from a single source cell.

use std::collections::VecDeque;

use maze_pursuit_core::{CellCoord, Direction, GridQuery};

const UNREACHABLE: u32 = u32::MAX;

/// Dense step-count grid produced by a single planning call.
///
/// The field mirrors the grid dimensions and stores the breadth-first search
/// results from its source. Distances default to `u32::MAX` internally so
/// unreachable cells, walls included, report `None` through [`Self::distance`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceField {
    rows: u32,
    columns: u32,
    source: CellCoord,
    distances: Vec<u32>,
}

/// Computes the step distance from `source` to every reachable cell.
///
/// Edges exist between orthogonal neighbors whenever the destination is
/// traversable. A source that is a wall or lies outside the grid leaves every
/// cell unreachable. The grid is only read.
#[must_use]
pub fn compute(source: CellCoord, grid: &impl GridQuery) -> DistanceField {
    let (rows, columns) = grid.dimensions();
    let cell_count = usize::try_from(u64::from(rows) * u64::from(columns)).unwrap_or(0);
    let mut field = DistanceField {
        rows,
        columns,
        source,
        distances: vec![UNREACHABLE; cell_count],
    };

    if !grid.is_traversable(source) {
        return field;
    }
    let Some(source_index) = field.index(source) else {
        return field;
    };

    field.distances[source_index] = 0;
    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(cell) = queue.pop_front() {
        let Some(current_index) = field.index(cell) else {
            continue;
        };
        let next_distance = field.distances[current_index].saturating_add(1);

        for direction in Direction::ALL {
            let neighbor = cell.step(direction);
            if !grid.is_traversable(neighbor) {
                continue;
            }

            let Some(neighbor_index) = field.index(neighbor) else {
                continue;
            };

            if field.distances[neighbor_index] <= next_distance {
                continue;
            }

            field.distances[neighbor_index] = next_distance;
            queue.push_back(neighbor);
        }
    }

    field
}

impl DistanceField {
    /// Steps needed to reach `cell` from the source, or `None` when the cell
    /// is unreachable or outside the grid.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        let index = self.index(cell)?;
        self.distances
            .get(index)
            .copied()
            .filter(|distance| *distance != UNREACHABLE)
    }

    /// Reports whether `cell` can be reached from the source.
    #[must_use]
    pub fn is_reachable(&self, cell: CellCoord) -> bool {
        self.distance(cell).is_some()
    }

    /// Cell the field was computed from.
    #[must_use]
    pub fn source(&self) -> CellCoord {
        self.source
    }

    /// Dimensions of the field as `(rows, columns)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let row = u32::try_from(cell.row()).ok()?;
        let column = u32::try_from(cell.column()).ok()?;
        if row >= self.rows || column >= self.columns {
            return None;
        }

        let width = usize::try_from(self.columns).ok()?;
        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}
