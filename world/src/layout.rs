//! Text layout format used to describe mazes.
//!
//! Each line describes one row of the maze and every row must have the same
//! width. Glyphs map to cell states as follows: `W` wall, `.` regular pellet,
//! `P` power pellet, `S` sound pellet, and a space for an empty cell.

use maze_pursuit_core::{CellState, Maze, MazeError};
use thiserror::Error;

/// Built-in maze used when no layout file is supplied.
pub const DEFAULT_LAYOUT: [&str; 33] = [
    "WWWWWWWWWWWWWWWWWWWWWWWWWWWWWWW",
    "W..........................S..W",
    "W.WWWWW.WWWWWWWPWWWWWWW.WWWWW.W",
    "W.W   W.W     W.W     W.W   W.W",
    "W.W   W.W     W.W     W.W   W.W",
    "W.WWWWW.WWWWWWW.WWWWWWW.WWWWW.W",
    "W.............................W",
    "W.WWWWW.WW.WWWWWWWWW.WW.WWWWW.W",
    "W.WWWWW.WW.WWWWWWWWW.WW.WWWWW.W",
    "W.......WW.....W.....WW.......W",
    "WWWWWWW.WWWWW.WW.WWWWWW.WWWWWWW",
    "      W.WWWWW.WW.WWWWWW.W      ",
    "      W.................W      ",
    "      W.WWWWWWWWWWWWWWW.W      ",
    "      W.................W      ",
    "      W.WWWWWWWWWWWWWWW.W      ",
    "      W.................W      ",
    "      W.WWWWWWWWWWWWWWW.W      ",
    "      W.................W      ",
    "      W.WW.WWWWWWWW.WWW.W      ",
    "      W.WW.WWWWWWWW.WWW.W      ",
    "WWWWWWW.WW.WWWWWWWW.WWW.WWWWWWW",
    "W.............................W",
    "W.WWWWW.WWWWW.W.W.WWWWW.WWWWW.W",
    "W.WWWWW.WWWWW.W.W.WWWWW.WWWWW.W",
    "W...WW..............WW........W",
    "WWW.WW.WW.WWWWWWWWW.WW.WW.WWWWW",
    "WWW.WW.WW.WWWWWWWWW.WW.WW.WWWWW",
    "W.............................W",
    "W.WWWWWWWWWWW.W.W.WWWWWWWWWWW.W",
    "W.WWWWWWWWWWW.W.W.WWWWWWWWWWW.W",
    "W.............................W",
    "WWWWWWWWWWWWWWWWWWWWWWWWWWWWWWW",
];

/// Errors raised while parsing a maze layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The layout did not contain a single row.
    #[error("layout contains no rows")]
    Empty,
    /// A row's width differs from the first row's width.
    #[error("row {row} is {actual} cells wide but the layout is {expected} cells wide")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
    /// A glyph did not map to any cell state.
    #[error("unknown glyph {glyph:?} at row {row}, column {column}")]
    UnknownGlyph {
        /// Zero-based row of the glyph.
        row: usize,
        /// Zero-based column of the glyph.
        column: usize,
        /// Glyph that could not be interpreted.
        glyph: char,
    },
    /// The layout is too large to be addressed by cell coordinates.
    #[error("layout of {rows}x{columns} cells is too large")]
    TooLarge {
        /// Number of rows in the layout.
        rows: usize,
        /// Number of columns in the layout.
        columns: usize,
    },
    /// The parsed cells could not form a maze.
    #[error(transparent)]
    Maze(#[from] MazeError),
}

/// Parses a layout from newline-separated text.
///
/// Carriage returns are stripped and a single trailing empty line is ignored,
/// but spaces are significant because they describe empty cells.
pub fn parse(text: &str) -> Result<Maze, LayoutError> {
    let mut rows: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if rows.last().is_some_and(|line| line.is_empty()) {
        let _ = rows.pop();
    }
    parse_rows(&rows)
}

/// Parses a layout from pre-split rows.
pub fn parse_rows<S: AsRef<str>>(rows: &[S]) -> Result<Maze, LayoutError> {
    let Some(first) = rows.first() else {
        return Err(LayoutError::Empty);
    };
    let width = first.as_ref().chars().count();
    if width == 0 {
        return Err(LayoutError::Empty);
    }

    let mut cells = Vec::with_capacity(width.saturating_mul(rows.len()));
    for (row_index, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        let actual = row.chars().count();
        if actual != width {
            return Err(LayoutError::RaggedRow {
                row: row_index,
                expected: width,
                actual,
            });
        }

        for (column_index, glyph) in row.chars().enumerate() {
            let state = cell_for_glyph(glyph).ok_or(LayoutError::UnknownGlyph {
                row: row_index,
                column: column_index,
                glyph,
            })?;
            cells.push(state);
        }
    }

    let too_large = LayoutError::TooLarge {
        rows: rows.len(),
        columns: width,
    };
    let row_count = u32::try_from(rows.len())
        .ok()
        .filter(|count| i32::try_from(*count).is_ok());
    let column_count = u32::try_from(width)
        .ok()
        .filter(|count| i32::try_from(*count).is_ok());
    let (Some(row_count), Some(column_count)) = (row_count, column_count) else {
        return Err(too_large);
    };

    Ok(Maze::from_cells(row_count, column_count, cells)?)
}

/// Parses the built-in layout.
pub fn default_maze() -> Result<Maze, LayoutError> {
    parse_rows(&DEFAULT_LAYOUT)
}

/// Glyph used to describe the provided cell state in layout text.
#[must_use]
pub const fn glyph(state: CellState) -> char {
    match state {
        CellState::Wall => 'W',
        CellState::Empty => ' ',
        CellState::RegularPellet => '.',
        CellState::PowerPellet => 'P',
        CellState::SoundPellet => 'S',
    }
}

/// Serializes a maze back into layout text, one line per row.
#[must_use]
pub fn to_text(maze: &Maze) -> String {
    let width = usize::try_from(maze.columns()).unwrap_or(0);
    if width == 0 {
        return String::new();
    }

    let mut text = String::with_capacity(maze.cells().len() + maze.cells().len() / width);
    for row in maze.cells().chunks(width) {
        text.extend(row.iter().map(|state| glyph(*state)));
        text.push('\n');
    }
    text
}

const fn cell_for_glyph(glyph: char) -> Option<CellState> {
    match glyph {
        'W' => Some(CellState::Wall),
        ' ' => Some(CellState::Empty),
        '.' => Some(CellState::RegularPellet),
        'P' => Some(CellState::PowerPellet),
        'S' => Some(CellState::SoundPellet),
        _ => None,
    }
}
