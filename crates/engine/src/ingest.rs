use crate::error::IngestError;
use crate::normalize::normalize;
use crate::query::Pipeline;
use crate::record::Record;
use rowsift_sheet::{locate_header, read_sheets_with_options};
use tracing::{debug, info, warn};

/// One uploaded file: a name and its raw byte payload
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    /// Create a source file
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        SourceFile {
            name: name.into(),
            bytes,
        }
    }
}

/// A collected per-file (or per-sheet) ingestion failure
#[derive(Debug)]
pub struct IngestFailure {
    pub file: String,
    pub error: IngestError,
}

/// The outcome of one ingestion call: the dataset delta plus every
/// per-file and per-sheet failure, collected rather than thrown
#[derive(Debug, Default)]
pub struct IngestReport {
    pub added: Vec<Record>,
    pub errors: Vec<IngestFailure>,
}

impl IngestReport {
    /// Partial success is reported distinctly from total failure: true only
    /// when nothing was ingested and at least one error was collected
    #[must_use]
    pub fn is_total_failure(&self) -> bool {
        self.added.is_empty() && !self.errors.is_empty()
    }
}

impl Pipeline {
    /// Ingest a batch of files, appending their records to the dataset.
    ///
    /// Files are processed in input order, so the merged dataset is
    /// deterministic regardless of payload size. A file that fails to
    /// decode, or a sheet without a discoverable header, contributes an
    /// error to the report without aborting the rest of the batch. When the
    /// pipeline carries a category table, records are classified as they
    /// are ingested. The query state is never touched.
    pub fn ingest_files(&mut self, files: &[SourceFile]) -> IngestReport {
        let mut report = IngestReport::default();

        for file in files {
            match read_sheets_with_options(&file.bytes, &self.read_options) {
                Err(error) => {
                    warn!(file = %file.name, %error, "failed to decode payload");
                    report.errors.push(IngestFailure {
                        file: file.name.clone(),
                        error: IngestError::Decode(error),
                    });
                }
                Ok(grids) => {
                    for grid in &grids {
                        let Some(header_row) = locate_header(grid, &self.header_policy) else {
                            debug!(file = %file.name, sheet = %grid.name(), "sheet has no header row, skipping");
                            report.errors.push(IngestFailure {
                                file: file.name.clone(),
                                error: IngestError::NoHeader {
                                    sheet: grid.name().to_string(),
                                },
                            });
                            continue;
                        };

                        let mut records = normalize(grid, header_row);
                        if let Some(table) = &self.categories {
                            records = records.iter().map(|r| table.classify(r)).collect();
                        }

                        debug!(
                            file = %file.name,
                            sheet = %grid.name(),
                            header_row,
                            count = records.len(),
                            "normalized sheet"
                        );
                        report.added.extend_from_slice(&records);
                        self.dataset.append(&mut records);
                    }
                }
            }
        }

        info!(
            added = report.added.len(),
            errors = report.errors.len(),
            dataset = self.dataset.len(),
            "ingest complete"
        );
        report
    }

    /// Ingest a single payload
    pub fn ingest_bytes(&mut self, name: &str, bytes: &[u8]) -> IngestReport {
        self.ingest_files(&[SourceFile::new(name, bytes.to_vec())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowsift_sheet::Cell;

    #[test]
    fn test_ingest_csv_bytes() {
        let mut pipeline = Pipeline::new();
        let report = pipeline.ingest_bytes("roster.csv", b"Name,Grade\nA,9\nB,11");

        assert_eq!(report.added.len(), 2);
        assert!(report.errors.is_empty());
        assert_eq!(pipeline.dataset().len(), 2);
        assert_eq!(
            pipeline.dataset()[0].get("Name"),
            Some(&Cell::Text("A".to_string()))
        );
    }

    #[test]
    fn test_ingest_is_additive_without_dedup() {
        let mut pipeline = Pipeline::new();
        pipeline.ingest_bytes("a.csv", b"Name\nA");
        pipeline.ingest_bytes("a.csv", b"Name\nA");

        // Same logical row uploaded twice yields two records
        assert_eq!(pipeline.dataset().len(), 2);
    }

    #[test]
    fn test_ingest_classifies_when_table_present() {
        let mut pipeline =
            Pipeline::new().with_categories(crate::classify::CategoryTable::default());
        pipeline.ingest_bytes("a.csv", b"Name,Grade\nA,9");

        let record = &pipeline.dataset()[0];
        assert_eq!(record.get("Grade Level"), Some(&Cell::Number(9.0)));
        assert_eq!(
            record.get("Cost"),
            Some(&Cell::Text(crate::classify::NOT_APPLICABLE.to_string()))
        );
    }

    #[test]
    fn test_bad_file_collects_error_and_continues() {
        let mut pipeline = Pipeline::new();
        let files = vec![
            SourceFile::new("bad.bin", vec![0x00, 0x01]),
            SourceFile::new("good.csv", b"Name\nA".to_vec()),
        ];

        let report = pipeline.ingest_files(&files);

        assert_eq!(report.added.len(), 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].file, "bad.bin");
        assert!(matches!(report.errors[0].error, IngestError::Decode(_)));
        assert!(!report.is_total_failure());
    }

    #[test]
    fn test_total_failure() {
        let mut pipeline = Pipeline::new();
        let report = pipeline.ingest_bytes("bad.bin", &[0x00]);

        assert!(report.is_total_failure());
        assert!(pipeline.dataset().is_empty());
    }

    #[test]
    fn test_merge_order_follows_input_order() {
        let mut pipeline = Pipeline::new();
        let files = vec![
            SourceFile::new("second-uploaded-first.csv", b"Name\nZ".to_vec()),
            SourceFile::new("b.csv", b"Name\nA".to_vec()),
        ];
        pipeline.ingest_files(&files);

        let names: Vec<String> = pipeline
            .dataset()
            .iter()
            .map(|r| r.get("Name").unwrap().as_str())
            .collect();
        assert_eq!(names, vec!["Z", "A"]);
    }
}
