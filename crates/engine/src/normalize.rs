use crate::record::Record;
use rowsift_sheet::{Cell, Grid};

/// Convert the rows below a grid's header row into records.
///
/// Each data-row cell is paired with the trimmed header cell at the same
/// column, for columns within the header row's width. Columns whose header
/// cell is absent (or trims to nothing) contribute no key; absent data cells
/// leave the key unset. Records that end up with zero fields are dropped.
/// Duplicate trimmed header names: the last occurrence wins.
#[must_use]
pub fn normalize(grid: &Grid, header_row: usize) -> Vec<Record> {
    let headers: Vec<Option<String>> = grid
        .row(header_row)
        .unwrap_or_default()
        .iter()
        .map(|cell| {
            let trimmed = cell.as_str().trim().to_string();
            (!cell.is_absent() && !trimmed.is_empty()).then_some(trimmed)
        })
        .collect();

    let mut records = Vec::new();
    for row in grid.rows().iter().skip(header_row + 1) {
        let mut record = Record::new();
        for (col, key) in headers.iter().enumerate() {
            let Some(key) = key else { continue };
            let cell = row.get(col).unwrap_or(&Cell::Absent);
            if cell.is_absent() {
                continue;
            }
            record.insert(key.clone(), cell.clone());
        }
        if !record.is_empty() {
            records.push(record);
        }
    }

    records
}
