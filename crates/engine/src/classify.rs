use crate::record::Record;
use rowsift_sheet::Cell;
use serde::{Deserialize, Serialize};

/// Sentinel value a canonical field takes when no source field matched.
/// Category filtering treats it as "not applicable" and excludes it.
pub const NOT_APPLICABLE: &str = "N/A";

/// One canonical category and the keywords that claim source fields for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub canonical: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    /// Create a rule
    #[must_use]
    pub fn new<S, I, K>(canonical: S, keywords: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        CategoryRule {
            canonical: canonical.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    fn matches(&self, field_lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| field_lower.contains(&keyword.to_lowercase()))
    }
}

/// An ordered keyword table mapping raw field names onto canonical fields
///
/// The table is configuration, not control flow: callers may swap in their
/// own rules (or load them from JSON) without touching the pipeline. The
/// mapping is a best-effort heuristic; false positives and negatives are
/// expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        CategoryTable {
            rules: vec![
                CategoryRule::new("Grade Level", ["grade", "class", "year"]),
                CategoryRule::new("Cost", ["cost", "price", "fee"]),
                CategoryRule::new(
                    "Application Deadline",
                    ["deadline", "due date", "application close"],
                ),
                CategoryRule::new(
                    "Eligibility Requirements",
                    ["eligibility", "requirements", "qualifications"],
                ),
            ],
        }
    }
}

impl CategoryTable {
    /// Create a table from rules, kept in the given order
    #[must_use]
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        CategoryTable { rules }
    }

    /// Load a table from a JSON array of `{canonical, keywords}` objects
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The rules in table order
    #[must_use]
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Canonical field names in table order
    pub fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.canonical.as_str())
    }

    /// Enrich a record with canonical fields without removing any original.
    ///
    /// Each original field name is tested against the rules in table order;
    /// the first matching category wins that field, and the first field to
    /// claim a category supplies its value. Unmatched categories get the
    /// [`NOT_APPLICABLE`] sentinel. Canonical fields come first in the
    /// enriched record, originals follow in their own order; an original
    /// field sharing a canonical name keeps its own value.
    #[must_use]
    pub fn classify(&self, record: &Record) -> Record {
        let mut claimed: Vec<Option<&Cell>> = vec![None; self.rules.len()];

        for (name, value) in record.iter() {
            let lower = name.to_lowercase();
            let Some(index) = self.rules.iter().position(|rule| rule.matches(&lower)) else {
                continue;
            };
            if claimed[index].is_none() {
                claimed[index] = Some(value);
            }
        }

        let mut enriched = Record::new();
        for (rule, value) in self.rules.iter().zip(claimed) {
            let cell = value
                .cloned()
                .unwrap_or_else(|| Cell::Text(NOT_APPLICABLE.to_string()));
            enriched.insert(rule.canonical.clone(), cell);
        }
        for (name, value) in record.iter() {
            enriched.insert(name.clone(), value.clone());
        }

        enriched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_maps_known_fields() {
        let record = Record::from_pairs([
            ("Name", "Summer Research"),
            ("Grade level", "9-12"),
            ("Program fee", "$500"),
        ]);

        let enriched = CategoryTable::default().classify(&record);

        assert_eq!(
            enriched.get("Grade Level"),
            Some(&Cell::Text("9-12".to_string()))
        );
        assert_eq!(enriched.get("Cost"), Some(&Cell::Text("$500".to_string())));
        // Originals survive untouched
        assert_eq!(
            enriched.get("Name"),
            Some(&Cell::Text("Summer Research".to_string()))
        );
        assert_eq!(
            enriched.get("Grade level"),
            Some(&Cell::Text("9-12".to_string()))
        );
    }

    #[test]
    fn test_unmatched_category_gets_sentinel() {
        let record = Record::from_pairs([("Name", "X")]);
        let enriched = CategoryTable::default().classify(&record);

        assert_eq!(
            enriched.get("Application Deadline"),
            Some(&Cell::Text(NOT_APPLICABLE.to_string()))
        );
        assert_eq!(
            enriched.get("Eligibility Requirements"),
            Some(&Cell::Text(NOT_APPLICABLE.to_string()))
        );
    }

    #[test]
    fn test_canonical_fields_come_first() {
        let record = Record::from_pairs([("Name", "X"), ("Grade", "9")]);
        let enriched = CategoryTable::default().classify(&record);

        let names: Vec<_> = enriched.field_names().collect();
        assert_eq!(
            names,
            vec![
                "Grade Level",
                "Cost",
                "Application Deadline",
                "Eligibility Requirements",
                "Name",
                "Grade",
            ]
        );
    }

    #[test]
    fn test_first_matching_field_claims_category() {
        // Both "Grade" and "Class" match Grade Level; the earlier field wins
        let record = Record::from_pairs([("Grade", "9"), ("Class", "Biology")]);
        let enriched = CategoryTable::default().classify(&record);

        assert_eq!(enriched.get("Grade Level"), Some(&Cell::Number(9.0)));
    }

    #[test]
    fn test_first_matching_category_wins_per_field() {
        // "year" is a Grade Level keyword, so a "Yearly fee" field is claimed
        // by Grade Level (first in table order) rather than Cost
        let record = Record::from_pairs([("Yearly fee", "$100")]);
        let enriched = CategoryTable::default().classify(&record);

        assert_eq!(
            enriched.get("Grade Level"),
            Some(&Cell::Text("$100".to_string()))
        );
        assert_eq!(
            enriched.get("Cost"),
            Some(&Cell::Text(NOT_APPLICABLE.to_string()))
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let record = Record::from_pairs([("APPLICATION DEADLINE", "June 1")]);
        let enriched = CategoryTable::default().classify(&record);

        assert_eq!(
            enriched.get("Application Deadline"),
            Some(&Cell::Text("June 1".to_string()))
        );
    }

    #[test]
    fn test_original_value_wins_on_name_collision() {
        // A literal "Cost" field matches the Cost keywords; the enriched
        // record keeps a single field with the original value
        let record = Record::from_pairs([("Cost", "free")]);
        let enriched = CategoryTable::default().classify(&record);

        assert_eq!(enriched.get("Cost"), Some(&Cell::Text("free".to_string())));
        assert_eq!(
            enriched.len(),
            CategoryTable::default().rules().len()
        );
    }

    #[test]
    fn test_custom_table_from_json() {
        let table = CategoryTable::from_json(
            r#"[{"canonical": "Location", "keywords": ["state", "city", "where"]}]"#,
        )
        .unwrap();

        let record = Record::from_pairs([("State", "CA")]);
        let enriched = table.classify(&record);

        assert_eq!(enriched.get("Location"), Some(&Cell::Text("CA".to_string())));
        assert!(enriched.get("Grade Level").is_none());
    }
}
