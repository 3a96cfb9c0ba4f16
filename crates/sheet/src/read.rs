use crate::cell::Cell;
use crate::error::ReadError;
use crate::grid::Grid;
use calamine::{Data, Reader, Xls, Xlsx};
use std::io::Cursor;
use tracing::debug;

/// ZIP local-file magic; xlsx containers are ZIP archives
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
/// OLE2 compound-document magic; legacy xls containers
const OLE2_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
/// UTF-8 byte order mark, stripped before CSV parsing
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Options for decoding a payload
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// CSV delimiter; auto-detected from a leading sample when `None`
    pub delimiter: Option<u8>,
    /// Whether to run type inference on CSV fields
    pub infer_types: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            delimiter: None,
            infer_types: true,
        }
    }
}

impl ReadOptions {
    /// Set a fixed CSV delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Set whether to infer CSV field types
    #[must_use]
    pub fn with_type_inference(mut self, infer_types: bool) -> Self {
        self.infer_types = infer_types;
        self
    }
}

/// Decode a raw spreadsheet payload into its sheets, in container order.
///
/// The container is sniffed from content: ZIP magic means xlsx, OLE2 magic
/// means legacy xls, and anything that decodes as text is parsed as CSV
/// (one grid). Pure function of the payload.
pub fn read_sheets(bytes: &[u8]) -> Result<Vec<Grid>, ReadError> {
    read_sheets_with_options(bytes, &ReadOptions::default())
}

/// Decode a raw spreadsheet payload with custom options
pub fn read_sheets_with_options(
    bytes: &[u8],
    options: &ReadOptions,
) -> Result<Vec<Grid>, ReadError> {
    if bytes.starts_with(&ZIP_MAGIC) {
        debug!(size = bytes.len(), "decoding xlsx payload");
        return read_xlsx(bytes);
    }
    if bytes.starts_with(&OLE2_MAGIC) {
        debug!(size = bytes.len(), "decoding xls payload");
        return read_xls(bytes);
    }
    if !bytes.is_empty() && !bytes.contains(&0) {
        let text = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);
        debug!(size = bytes.len(), "decoding text payload as csv");
        return read_csv(&String::from_utf8_lossy(text), options).map(|grid| vec![grid]);
    }

    Err(ReadError::UnknownFormat { size: bytes.len() })
}

/// Convert a calamine value to a cell
///
/// The record model only admits text, numbers and absence, so booleans,
/// ISO date strings and cell errors all fold to text. Serial datetimes
/// keep their numeric value.
fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Absent,
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("#ERROR: {e:?}")),
    }
}

fn read_xlsx(bytes: &[u8]) -> Result<Vec<Grid>, ReadError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let sheet_names = workbook.sheet_names().to_vec();

    let mut grids = Vec::with_capacity(sheet_names.len());
    for name in sheet_names {
        let range = workbook.worksheet_range(&name)?;
        let mut grid = Grid::new(&name);
        for row in range.rows() {
            grid.push_row(row.iter().map(data_to_cell).collect());
        }
        debug!(sheet = %name, rows = grid.row_count(), "decoded sheet");
        grids.push(grid);
    }

    Ok(grids)
}

fn read_xls(bytes: &[u8]) -> Result<Vec<Grid>, ReadError> {
    let mut workbook: Xls<_> = Xls::new(Cursor::new(bytes))?;
    let sheet_names = workbook.sheet_names().to_vec();

    let mut grids = Vec::with_capacity(sheet_names.len());
    for name in sheet_names {
        let range = workbook.worksheet_range(&name)?;
        let mut grid = Grid::new(&name);
        for row in range.rows() {
            grid.push_row(row.iter().map(data_to_cell).collect());
        }
        grids.push(grid);
    }

    Ok(grids)
}

fn read_csv(content: &str, options: &ReadOptions) -> Result<Grid, ReadError> {
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| detect_delimiter(content));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false) // Header location is handled downstream
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut grid = Grid::new("Sheet1");
    for result in reader.records() {
        let record = result?;
        let row: Vec<Cell> = record
            .iter()
            .map(|field| {
                if options.infer_types {
                    Cell::parse(field)
                } else if field.is_empty() {
                    Cell::Absent
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect();
        grid.push_row(row);
    }

    Ok(grid)
}

/// Detect the CSV delimiter from a leading sample
///
/// Candidates are scored by per-line frequency discounted by variance, so a
/// delimiter that appears a consistent number of times per line wins.
#[must_use]
pub fn detect_delimiter(content: &str) -> u8 {
    let candidates = [b',', b';', b'\t', b'|'];
    let sample_lines: Vec<_> = content.lines().take(10).collect();

    let mut best_delimiter = b',';
    let mut best_score = 0.0f32;

    for &delimiter in &candidates {
        if sample_lines.is_empty() {
            continue;
        }

        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| line.bytes().filter(|&b| b == delimiter).count())
            .collect();

        let avg = counts.iter().sum::<usize>() as f32 / counts.len() as f32;
        let variance = counts
            .iter()
            .map(|&c| (c as f32 - avg).powi(2))
            .sum::<f32>()
            / counts.len() as f32;
        let score = avg / (1.0 + variance.sqrt());

        if score > best_score {
            best_score = score;
            best_delimiter = delimiter;
        }
    }

    best_delimiter
}
