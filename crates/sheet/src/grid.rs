use crate::cell::Cell;

const ABSENT: Cell = Cell::Absent;

/// A named 2D grid of cells (row-major storage)
///
/// Rows may be ragged; missing trailing cells read as [`Cell::Absent`].
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    name: String,
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// Create a new empty grid with a name
    #[must_use]
    pub fn new(name: &str) -> Self {
        Grid {
            name: name.to_string(),
            rows: Vec::new(),
        }
    }

    /// Create a grid from a 2D vector of values
    #[must_use]
    pub fn from_rows<T: Into<Cell>>(name: &str, rows: Vec<Vec<T>>) -> Self {
        Grid {
            name: name.to_string(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Get the grid name (sheet name in the source container)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get all rows
    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Get a single row
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Get the number of rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the width of the widest row
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the grid has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a cell; out-of-range positions read as absent
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&ABSENT)
    }

    /// Append a row
    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Check if a row contains only blank cells (a missing row counts as blank)
    #[must_use]
    pub fn row_is_blank(&self, index: usize) -> bool {
        self.rows
            .get(index)
            .is_none_or(|row| row.iter().all(Cell::is_blank))
    }
}
