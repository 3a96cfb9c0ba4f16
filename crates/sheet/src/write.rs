use crate::cell::Cell;
use crate::error::WriteError;
use crate::grid::Grid;
use rust_xlsxwriter::Workbook;
use std::io::Write;
use tracing::debug;

/// Hard limits of the xlsx container
const XLSX_MAX_ROWS: usize = 1_048_576;
const XLSX_MAX_COLS: usize = 16_384;

impl Grid {
    /// Serialize the grid to an in-memory xlsx workbook
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::TooLarge`] when the grid exceeds the container's
    /// row or column limits, and [`WriteError::Workbook`] when the writer
    /// rejects content (for example an invalid sheet name).
    pub fn to_xlsx_bytes(&self) -> Result<Vec<u8>, WriteError> {
        if self.row_count() > XLSX_MAX_ROWS || self.width() > XLSX_MAX_COLS {
            return Err(WriteError::TooLarge {
                rows: self.row_count(),
                cols: self.width(),
            });
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.name())?;

        for (row_idx, row) in self.rows().iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                let row_num = row_idx as u32;
                let col_num = col_idx as u16;

                match cell {
                    Cell::Absent => {} // Leave empty
                    Cell::Number(n) => {
                        worksheet.write_number(row_num, col_num, *n)?;
                    }
                    Cell::Text(s) => {
                        worksheet.write_string(row_num, col_num, s)?;
                    }
                }
            }
        }

        let bytes = workbook.save_to_buffer()?;
        debug!(rows = self.row_count(), size = bytes.len(), "encoded xlsx");
        Ok(bytes)
    }

    /// Write the grid to a writer as CSV; absent cells render as empty fields
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), WriteError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for row in self.rows() {
            let record: Vec<String> = row.iter().map(Cell::as_str).collect();
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Serialize the grid to CSV bytes
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, WriteError> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(buffer)
    }
}
