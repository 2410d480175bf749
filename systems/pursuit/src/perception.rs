//! Axis-aligned line of sight between two cells.

use maze_pursuit_core::{CellCoord, GridQuery};

/// Reports whether `observer` has an unobstructed straight view of `target`.
///
/// Sight only travels along a shared row or column. Every cell strictly
/// between the two endpoints must be traversable; cells outside the grid
/// block sight just like walls. The endpoints themselves are never tested,
/// so a cell always sees itself.
#[must_use]
pub fn can_see(observer: CellCoord, target: CellCoord, grid: &impl GridQuery) -> bool {
    if observer.row() == target.row() {
        let row = observer.row();
        let (low, high) = ordered(observer.column(), target.column());
        span(low, high).all(|column| grid.is_traversable(CellCoord::new(row, column)))
    } else if observer.column() == target.column() {
        let column = observer.column();
        let (low, high) = ordered(observer.row(), target.row());
        span(low, high).all(|row| grid.is_traversable(CellCoord::new(row, column)))
    } else {
        false
    }
}

fn ordered(a: i32, b: i32) -> (i32, i32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Exclusive range of coordinates strictly between `low` and `high`.
fn span(low: i32, high: i32) -> std::ops::Range<i32> {
    low.saturating_add(1)..high
}
