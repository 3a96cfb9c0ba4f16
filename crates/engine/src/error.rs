use rowsift_sheet::{ReadError, WriteError};
use thiserror::Error;

/// Errors collected (never thrown) at the ingestion boundary
#[derive(Error, Debug)]
pub enum IngestError {
    /// The payload is not a recognizable spreadsheet container.
    /// Fatal for that file, non-fatal for the batch.
    #[error("Decode failed: {0}")]
    Decode(#[from] ReadError),

    /// A sheet has no discoverable header row. That sheet is skipped;
    /// sibling sheets are still processed.
    #[error("No header row found in sheet '{sheet}'")]
    NoHeader { sheet: String },
}

/// Errors raised by the export boundary, fatal for that export call only
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Encode failed: {0}")]
    Encode(#[from] WriteError),
}
