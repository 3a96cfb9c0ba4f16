use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A scalar cell value: absent, numeric, or textual.
///
/// This is deliberately narrower than a full spreadsheet value model; cells
/// carry no formulas, dates or booleans. Anything a container reports outside
/// these three shapes is folded to text at decode time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Absent,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Check if the cell is absent
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Cell::Absent)
    }

    /// Check if the cell carries no usable content (absent or whitespace-only text)
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Absent => true,
            Cell::Number(_) => false,
            Cell::Text(s) => s.trim().is_empty(),
        }
    }

    /// Try to get the value as a number
    ///
    /// Numeric text parses too, so `"42"` compares as a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse().ok(),
            Cell::Absent => None,
        }
    }

    /// Get the value as a string (empty for absent cells)
    #[must_use]
    pub fn as_str(&self) -> String {
        match self {
            Cell::Absent => String::new(),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }

    /// Parse a string into a `Cell` with type inference
    /// Tries: absent -> number -> text
    #[must_use]
    pub fn parse(s: &str) -> Cell {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Cell::Absent;
        }

        if let Ok(n) = trimmed.parse::<f64>() {
            return Cell::Number(n);
        }

        Cell::Text(s.to_string())
    }

    /// Natural ordering: numeric when both sides are comparable as numbers,
    /// otherwise case-sensitive string comparison.
    #[must_use]
    pub fn natural_cmp(&self, other: &Cell) -> Ordering {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            _ => self.as_str().cmp(&other.as_str()),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Absent
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Absent => write!(f, ""),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Number(i as f64)
    }
}

impl From<i32> for Cell {
    fn from(i: i32) -> Self {
        Cell::Number(f64::from(i))
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Cell::Absent,
        }
    }
}
