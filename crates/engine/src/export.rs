use crate::error::ExportError;
use crate::query::Pipeline;
use chrono::Local;
use indexmap::IndexSet;
use rowsift_sheet::{Cell, Grid};
use tracing::info;

/// An exported payload and the filename to suggest for it
#[derive(Debug, Clone)]
pub struct Export {
    pub bytes: Vec<u8>,
    pub suggested_name: String,
}

impl Pipeline {
    /// Serialize the current view — filtered and sorted, unpaginated — to an
    /// xlsx payload.
    ///
    /// Columns are the union of field names across the view in first-seen
    /// order; absent fields render as empty cells. Encode failures are
    /// fatal for this call only.
    pub fn export_xlsx(&self) -> Result<Export, ExportError> {
        let grid = self.view_grid();
        let bytes = grid.to_xlsx_bytes()?;

        info!(rows = grid.row_count(), size = bytes.len(), "exported view as xlsx");
        Ok(Export {
            bytes,
            suggested_name: suggested_name("xlsx"),
        })
    }

    /// Serialize the current view to a CSV payload
    pub fn export_csv(&self) -> Result<Export, ExportError> {
        let grid = self.view_grid();
        let bytes = grid.to_csv_bytes()?;

        info!(rows = grid.row_count(), size = bytes.len(), "exported view as csv");
        Ok(Export {
            bytes,
            suggested_name: suggested_name("csv"),
        })
    }

    /// Materialize the view as a grid: one header row of the column union,
    /// then one row per record
    #[must_use]
    pub fn view_grid(&self) -> Grid {
        let view = self.view();

        let mut columns: IndexSet<String> = IndexSet::new();
        for record in &view {
            for name in record.field_names() {
                columns.insert(name.to_string());
            }
        }

        let mut grid = Grid::new("Export");
        grid.push_row(columns.iter().map(|name| Cell::Text(name.clone())).collect());
        for record in view {
            grid.push_row(
                columns
                    .iter()
                    .map(|name| record.get(name).cloned().unwrap_or(Cell::Absent))
                    .collect(),
            );
        }

        grid
    }
}

fn suggested_name(extension: &str) -> String {
    format!(
        "rowsift-export-{}.{extension}",
        Local::now().format("%Y%m%d-%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn pipeline_with(records: Vec<Record>) -> Pipeline {
        let mut pipeline = Pipeline::new();
        pipeline.dataset = records;
        pipeline
    }

    #[test]
    fn test_columns_are_first_seen_union() {
        let pipeline = pipeline_with(vec![
            Record::from_pairs([("Name", "A"), ("Grade", "9")]),
            Record::from_pairs([("Name", "B"), ("State", "CA")]),
        ]);

        let grid = pipeline.view_grid();

        let header: Vec<String> = grid.rows()[0].iter().map(Cell::as_str).collect();
        assert_eq!(header, vec!["Name", "Grade", "State"]);
        // Fields the record lacks render as absent cells
        assert!(grid.get(1, 2).is_absent());
        assert!(grid.get(2, 1).is_absent());
    }

    #[test]
    fn test_export_respects_filter_and_sort_not_pagination() {
        let mut pipeline = pipeline_with(vec![
            Record::from_pairs([("Name", "C"), ("Grade", "12")]),
            Record::from_pairs([("Name", "A"), ("Grade", "9")]),
            Record::from_pairs([("Name", "B"), ("Grade", "11")]),
        ]);
        pipeline.toggle_sort("Name");
        pipeline.set_page_size(1); // Pagination must not truncate the export

        let grid = pipeline.view_grid();
        assert_eq!(grid.row_count(), 4); // header + all three records
        assert_eq!(grid.get(1, 0), &Cell::Text("A".to_string()));
        assert_eq!(grid.get(3, 0), &Cell::Text("C".to_string()));
    }

    #[test]
    fn test_empty_view_exports_header_only_grid() {
        let pipeline = Pipeline::new();
        let grid = pipeline.view_grid();

        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.width(), 0);
        // Still a valid xlsx payload
        assert!(pipeline.export_xlsx().is_ok());
    }

    #[test]
    fn test_suggested_names_carry_extension() {
        let pipeline = pipeline_with(vec![Record::from_pairs([("a", "1")])]);

        let xlsx = pipeline.export_xlsx().unwrap();
        assert!(xlsx.suggested_name.starts_with("rowsift-export-"));
        assert!(xlsx.suggested_name.ends_with(".xlsx"));

        let csv = pipeline.export_csv().unwrap();
        assert!(csv.suggested_name.ends_with(".csv"));
    }
}
