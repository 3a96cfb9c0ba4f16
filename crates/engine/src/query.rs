use crate::classify::{CategoryTable, NOT_APPLICABLE};
use crate::record::Record;
use rowsift_sheet::{HeaderPolicy, ReadOptions};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort direction for a sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A sort key and direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

/// The current filter/search/sort/pagination configuration
///
/// Mutated only through [`Pipeline`] setters; ingestion never touches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    pub category_filter: Option<String>,
    pub search_term: String,
    pub sort: Option<SortSpec>,
    /// 1-based page index
    pub page_index: usize,
    pub page_size: usize,
}

impl QueryState {
    pub const DEFAULT_PAGE_SIZE: usize = 250;
}

impl Default for QueryState {
    fn default() -> Self {
        QueryState {
            category_filter: None,
            search_term: String::new(),
            sort: None,
            page_index: 1,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

/// One materialized page of the current view
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub records: Vec<Record>,
    pub total_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

/// The ingestion-normalization-and-query pipeline.
///
/// Owns the accumulated dataset and the single mutable [`QueryState`].
/// The view is recomputed in full on every read — filter, then search,
/// then sort, then paginate. That order is a contract: sorting must see
/// the whole filtered set, never a single page.
#[derive(Debug, Default)]
pub struct Pipeline {
    pub(crate) dataset: Vec<Record>,
    pub(crate) state: QueryState,
    pub(crate) header_policy: HeaderPolicy,
    pub(crate) read_options: ReadOptions,
    pub(crate) categories: Option<CategoryTable>,
}

impl Pipeline {
    /// Create a pipeline with default settings and no classifier
    #[must_use]
    pub fn new() -> Self {
        Pipeline::default()
    }

    /// Enable classification at ingestion with the given category table
    #[must_use]
    pub fn with_categories(mut self, table: CategoryTable) -> Self {
        self.categories = Some(table);
        self
    }

    /// Set the header location policy
    #[must_use]
    pub fn with_header_policy(mut self, policy: HeaderPolicy) -> Self {
        self.header_policy = policy;
        self
    }

    /// Set payload decode options
    #[must_use]
    pub fn with_read_options(mut self, options: ReadOptions) -> Self {
        self.read_options = options;
        self
    }

    /// The full accumulated dataset, in ingestion order
    #[must_use]
    pub fn dataset(&self) -> &[Record] {
        &self.dataset
    }

    /// The current query state
    #[must_use]
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Drop all accumulated records and reset the query state to defaults
    pub fn reset(&mut self) {
        self.dataset.clear();
        self.state = QueryState::default();
    }

    /// Keep only records whose value at `field` is present and applicable
    pub fn set_category_filter(&mut self, field: Option<String>) {
        self.state.category_filter = field;
    }

    /// Set the free-text search term; empty keeps every record
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.search_term = term.into();
    }

    /// Sort by a field, toggling direction on repeat.
    ///
    /// Sorting an already-ascending field flips it to descending; any other
    /// field starts ascending.
    pub fn toggle_sort(&mut self, field: &str) {
        let direction = match &self.state.sort {
            Some(sort) if sort.key == field && sort.direction == SortDirection::Ascending => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        self.state.sort = Some(SortSpec {
            key: field.to_string(),
            direction,
        });
    }

    /// Clear the sort, restoring ingestion order
    pub fn clear_sort(&mut self) {
        self.state.sort = None;
    }

    /// Set the page size (floored at 1) and reset to page 1, since changing
    /// density invalidates prior page numbering
    pub fn set_page_size(&mut self, size: usize) {
        self.state.page_size = size.max(1);
        self.state.page_index = 1;
    }

    /// Set the 1-based page index, clamped to the current page range
    pub fn set_page_index(&mut self, index: usize) {
        let total = self.total_pages(self.view().len());
        self.state.page_index = index.clamp(1, total);
    }

    /// The filtered, searched and sorted view, unpaginated
    #[must_use]
    pub fn view(&self) -> Vec<&Record> {
        let term = self.state.search_term.to_lowercase();

        let mut rows: Vec<&Record> = self
            .dataset
            .iter()
            .filter(|record| match &self.state.category_filter {
                Some(field) => record
                    .get(field)
                    .is_some_and(|cell| cell.as_str() != NOT_APPLICABLE),
                None => true,
            })
            .filter(|record| record.matches_search(&term))
            .collect();

        if let Some(sort) = &self.state.sort {
            // Stable sort: ties keep their upstream order
            rows.sort_by(|a, b| compare_records(a, b, sort));
        }

        rows
    }

    /// Materialize the current page of the view
    #[must_use]
    pub fn page(&self) -> Page {
        let view = self.view();
        let total_count = view.len();
        let total_pages = self.total_pages(total_count);
        let current_page = self.state.page_index.clamp(1, total_pages);

        let start = (current_page - 1) * self.state.page_size;
        let records = view
            .into_iter()
            .skip(start)
            .take(self.state.page_size)
            .cloned()
            .collect();

        Page {
            records,
            total_count,
            total_pages,
            current_page,
        }
    }

    fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.state.page_size).max(1)
    }
}

/// Compare two records on a sort key.
///
/// Records missing the key sort after all records that have it, in both
/// directions; direction reversal applies only between present values so
/// that invariant survives descending sorts.
fn compare_records(a: &Record, b: &Record, sort: &SortSpec) -> Ordering {
    match (a.get(&sort.key), b.get(&sort.key)) {
        (Some(x), Some(y)) => {
            let ordering = x.natural_cmp(y);
            match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowsift_sheet::Cell;

    fn two_record_pipeline() -> Pipeline {
        let mut pipeline = Pipeline::new();
        pipeline.dataset = vec![
            Record::from_pairs([("Name", "A"), ("Grade", "9")]),
            Record::from_pairs([("Name", "B"), ("Grade", "11")]),
        ];
        pipeline
    }

    #[test]
    fn test_page_of_one() {
        let mut pipeline = two_record_pipeline();
        pipeline.toggle_sort("Name");
        pipeline.set_page_size(1);

        let page = pipeline.page();
        assert_eq!(page.records.len(), 1);
        assert_eq!(
            page.records[0].get("Name"),
            Some(&Cell::Text("A".to_string()))
        );
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total_count, 2);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_search_filters_by_any_field() {
        let mut pipeline = two_record_pipeline();
        pipeline.set_search_term("11");

        let view = pipeline.view();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].get("Name"), Some(&Cell::Text("B".to_string())));
    }

    #[test]
    fn test_empty_search_keeps_everything() {
        let pipeline = two_record_pipeline();
        assert_eq!(pipeline.view().len(), 2);
    }

    #[test]
    fn test_category_filter_excludes_sentinel_and_missing() {
        let mut pipeline = Pipeline::new();
        pipeline.dataset = vec![
            Record::from_pairs([("Cost", "$100")]),
            Record::from_pairs([("Cost", "N/A")]),
            Record::from_pairs([("Name", "no cost field")]),
        ];
        pipeline.set_category_filter(Some("Cost".to_string()));

        let view = pipeline.view();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].get("Cost"), Some(&Cell::Text("$100".to_string())));
    }

    #[test]
    fn test_sort_is_numeric_when_comparable() {
        let mut pipeline = two_record_pipeline();
        pipeline.toggle_sort("Grade");

        // Numeric order: 9 before 11 (lexicographic would flip them)
        let view = pipeline.view();
        assert_eq!(view[0].get("Name"), Some(&Cell::Text("A".to_string())));
        assert_eq!(view[1].get("Name"), Some(&Cell::Text("B".to_string())));
    }

    #[test]
    fn test_toggle_sort_flips_then_resets() {
        let mut pipeline = two_record_pipeline();

        pipeline.toggle_sort("Name");
        assert_eq!(
            pipeline.state().sort.as_ref().unwrap().direction,
            SortDirection::Ascending
        );

        pipeline.toggle_sort("Name");
        assert_eq!(
            pipeline.state().sort.as_ref().unwrap().direction,
            SortDirection::Descending
        );

        // A third toggle on the same field starts ascending again
        pipeline.toggle_sort("Name");
        assert_eq!(
            pipeline.state().sort.as_ref().unwrap().direction,
            SortDirection::Ascending
        );

        // Switching fields always resets to ascending
        pipeline.toggle_sort("Name");
        pipeline.toggle_sort("Grade");
        let sort = pipeline.state().sort.as_ref().unwrap();
        assert_eq!(sort.key, "Grade");
        assert_eq!(sort.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_sort_stability_on_ties() {
        let mut pipeline = Pipeline::new();
        pipeline.dataset = vec![
            Record::from_pairs([("Grade", "9"), ("Name", "first")]),
            Record::from_pairs([("Grade", "9"), ("Name", "second")]),
            Record::from_pairs([("Grade", "9"), ("Name", "third")]),
        ];

        pipeline.toggle_sort("Grade");
        let ascending: Vec<_> = pipeline
            .view()
            .iter()
            .map(|r| r.get("Name").unwrap().as_str())
            .collect();
        assert_eq!(ascending, vec!["first", "second", "third"]);

        pipeline.toggle_sort("Grade");
        let descending: Vec<_> = pipeline
            .view()
            .iter()
            .map(|r| r.get("Name").unwrap().as_str())
            .collect();
        assert_eq!(descending, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_records_missing_sort_key_go_last_both_directions() {
        let mut pipeline = Pipeline::new();
        pipeline.dataset = vec![
            Record::from_pairs([("Name", "keyless")]),
            Record::from_pairs([("Grade", "11")]),
            Record::from_pairs([("Grade", "9")]),
        ];

        pipeline.toggle_sort("Grade");
        let view = pipeline.view();
        assert_eq!(view[0].get("Grade"), Some(&Cell::Number(9.0)));
        assert!(view[2].get("Grade").is_none());

        pipeline.toggle_sort("Grade");
        let view = pipeline.view();
        assert_eq!(view[0].get("Grade"), Some(&Cell::Number(11.0)));
        assert!(view[2].get("Grade").is_none());
    }

    #[test]
    fn test_view_is_idempotent() {
        let mut pipeline = two_record_pipeline();
        pipeline.set_search_term("a");
        pipeline.toggle_sort("Grade");

        let first: Vec<Record> = pipeline.view().into_iter().cloned().collect();
        let second: Vec<Record> = pipeline.view().into_iter().cloned().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_page_index_clamps() {
        let mut pipeline = two_record_pipeline();
        pipeline.set_page_size(1);

        pipeline.set_page_index(99);
        assert_eq!(pipeline.state().page_index, 2);

        pipeline.set_page_index(0);
        assert_eq!(pipeline.state().page_index, 1);
    }

    #[test]
    fn test_page_size_reset_goes_back_to_page_one() {
        let mut pipeline = two_record_pipeline();
        pipeline.set_page_size(1);
        pipeline.set_page_index(2);

        pipeline.set_page_size(10);
        assert_eq!(pipeline.state().page_index, 1);
        assert_eq!(pipeline.state().page_size, 10);
    }

    #[test]
    fn test_page_size_floors_at_one() {
        let mut pipeline = two_record_pipeline();
        pipeline.set_page_size(0);
        assert_eq!(pipeline.state().page_size, 1);
    }

    #[test]
    fn test_empty_dataset_still_has_one_page() {
        let pipeline = Pipeline::new();
        let page = pipeline.page();

        assert!(page.records.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_last_page_may_be_short() {
        let mut pipeline = Pipeline::new();
        pipeline.dataset = (0..5)
            .map(|i| Record::from_pairs([("n", &*i.to_string())]))
            .collect();
        pipeline.set_page_size(2);
        pipeline.set_page_index(3);

        let page = pipeline.page();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.records.len(), 1);
    }

    #[test]
    fn test_page_never_exceeds_page_size() {
        let mut pipeline = Pipeline::new();
        pipeline.dataset = (0..17)
            .map(|i| Record::from_pairs([("n", &*i.to_string())]))
            .collect();
        pipeline.set_page_size(4);

        for index in 1..=5 {
            pipeline.set_page_index(index);
            assert!(pipeline.page().records.len() <= 4);
        }
    }

    #[test]
    fn test_reset_clears_dataset_and_state() {
        let mut pipeline = two_record_pipeline();
        pipeline.set_search_term("x");
        pipeline.reset();

        assert!(pipeline.dataset().is_empty());
        assert_eq!(pipeline.state(), &QueryState::default());
    }
}
