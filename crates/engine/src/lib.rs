//! Record normalization, classification and query engine for rowsift
//!
//! The [`Pipeline`] owns the accumulated [`Record`] dataset and the single
//! mutable [`QueryState`]; everything else is a pure projection of the two.
//! Data flows file bytes → grids → header location → [`normalize`] →
//! dataset → filter/search/sort/paginate → page or export.
//!
//! # Examples
//!
//! ```
//! use rowsift_engine::{CategoryTable, Pipeline};
//!
//! let mut pipeline = Pipeline::new().with_categories(CategoryTable::default());
//!
//! let report = pipeline.ingest_bytes("roster.csv", b"Name,Grade\nA,9\nB,11");
//! assert!(report.errors.is_empty());
//!
//! pipeline.set_search_term("11");
//! let page = pipeline.page();
//! assert_eq!(page.total_count, 1);
//! assert_eq!(page.records[0].get("Name").unwrap().as_str(), "B");
//! ```

mod classify;
mod error;
mod export;
mod ingest;
mod normalize;
mod query;
mod record;

/// Re-export the classifier configuration.
pub use classify::{CategoryRule, CategoryTable, NOT_APPLICABLE};
/// Re-export boundary error types.
pub use error::{ExportError, IngestError};
/// Re-export the export payload type.
pub use export::Export;
/// Re-export ingestion boundary types.
pub use ingest::{IngestFailure, IngestReport, SourceFile};
/// Re-export row normalization.
pub use normalize::normalize;
/// Re-export the pipeline and its query surface.
pub use query::{Page, Pipeline, QueryState, SortDirection, SortSpec};
/// Re-export the record type.
pub use record::Record;
