use crate::grid::Grid;

/// Policy for locating the header row inside a noisy grid.
#[derive(Debug, Clone, Default)]
pub enum HeaderPolicy {
    /// The first row containing at least one non-blank cell is the header.
    #[default]
    FirstNonEmpty,
    /// Scan only the first `window` rows and pick the first row containing a
    /// cell whose text matches one of `keywords` (case-insensitive
    /// containment). Falls back to the first non-blank row inside the window
    /// when nothing matches.
    Keyword {
        window: usize,
        keywords: Vec<String>,
    },
}

impl HeaderPolicy {
    /// Default scan window for the keyword mode
    pub const DEFAULT_WINDOW: usize = 5;

    /// Create a keyword policy with the default scan window
    #[must_use]
    pub fn keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        HeaderPolicy::Keyword {
            window: Self::DEFAULT_WINDOW,
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

/// Locate the header row of a grid under the given policy.
///
/// Returns `None` when every scanned row is blank; callers are expected to
/// skip such a grid and keep processing its siblings. A grid whose only
/// non-blank row is its last one has zero data rows, which is legal.
#[must_use]
pub fn locate_header(grid: &Grid, policy: &HeaderPolicy) -> Option<usize> {
    match policy {
        HeaderPolicy::FirstNonEmpty => first_non_blank(grid, grid.row_count()),
        HeaderPolicy::Keyword { window, keywords } => {
            let scanned = grid.row_count().min(*window);
            for index in 0..scanned {
                let Some(row) = grid.row(index) else { break };
                let hit = row.iter().any(|cell| {
                    let text = cell.as_str().to_lowercase();
                    !text.is_empty() && keywords.iter().any(|k| text.contains(&k.to_lowercase()))
                });
                if hit {
                    return Some(index);
                }
            }
            first_non_blank(grid, scanned)
        }
    }
}

fn first_non_blank(grid: &Grid, limit: usize) -> Option<usize> {
    (0..limit.min(grid.row_count())).find(|&index| !grid.row_is_blank(index))
}
