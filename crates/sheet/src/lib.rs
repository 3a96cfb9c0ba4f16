//! Cell/Grid model and spreadsheet container support for rowsift
//!
//! A [`Grid`] is the raw rectangular cell layout of one sheet, before any
//! header interpretation. Payloads decode into grids with [`read_sheets`]
//! (xlsx, legacy xls and CSV are sniffed from content), and grids encode
//! back into containers with [`Grid::to_xlsx_bytes`] and
//! [`Grid::to_csv_bytes`]. [`locate_header`] finds the header row inside a
//! noisy grid.
//!
//! # Examples
//!
//! ```
//! use rowsift_sheet::{locate_header, read_sheets, Cell, HeaderPolicy};
//!
//! let grids = read_sheets(b"Name,Grade\nA,9").unwrap();
//! assert_eq!(grids.len(), 1);
//!
//! let header = locate_header(&grids[0], &HeaderPolicy::FirstNonEmpty);
//! assert_eq!(header, Some(0));
//! assert_eq!(grids[0].get(1, 1), &Cell::Number(9.0));
//! ```

mod cell;
mod error;
mod grid;
mod header;
mod read;
mod write;

/// Re-export cell value type.
pub use cell::Cell;
/// Re-export decode/encode error types.
pub use error::{ReadError, WriteError};
/// Re-export grid type.
pub use grid::Grid;
/// Re-export header location.
pub use header::{locate_header, HeaderPolicy};
/// Re-export payload decoding.
pub use read::{detect_delimiter, read_sheets, read_sheets_with_options, ReadOptions};
