use thiserror::Error;

/// Errors raised while decoding a spreadsheet payload
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Unrecognized spreadsheet container ({size} bytes)")]
    UnknownFormat { size: usize },

    #[error("XLSX error: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    #[error("XLS error: {0}")]
    Xls(#[from] calamine::XlsError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised while encoding a grid into a container
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Grid too large for container: {rows} rows x {cols} columns")]
    TooLarge { rows: usize, cols: usize },

    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
