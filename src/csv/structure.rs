//! CSV row data structures.
//!
//! This module defines the intermediate row used between the raw CSV record
//! and a [`Publication`].

use crate::csv::config::{CsvConfig, Field};
use crate::utils::coerce_integer;
use crate::{AnalysisError, Publication};
use csv::StringRecord;
use std::collections::HashMap;

/// Structured raw data from one CSV record.
#[derive(Debug, Clone)]
pub(crate) struct RawCsvRow {
    /// Non-empty cells keyed by the field their header maps to
    pub(crate) fields: HashMap<Field, String>,
    /// Line number for error reporting
    pub(crate) line_number: usize,
}

/// Earliest publication year accepted from an export.
pub(crate) const EARLIEST_YEAR: i32 = 1700;

/// Why a row did not become a publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowRejection {
    MissingYear,
    /// A numeric year outside `EARLIEST_YEAR..=max_year`
    ImplausibleYear(i64),
}

impl RawCsvRow {
    /// Create a new row from a CSV record and the per-column field mapping.
    pub(crate) fn from_record(
        columns: &[Option<Field>],
        record: &StringRecord,
        config: &CsvConfig,
        line_number: usize,
    ) -> Result<Self, AnalysisError> {
        let mut fields = HashMap::new();

        for (i, value) in record.iter().enumerate() {
            if i >= columns.len() {
                if !config.flexible {
                    return Err(AnalysisError::MalformedInput {
                        message: format!(
                            "Record has more fields ({}) than headers ({})",
                            record.len(),
                            columns.len()
                        ),
                        line: line_number,
                    });
                }
                break;
            }

            let value = if config.trim { value.trim() } else { value };
            if value.is_empty() {
                continue;
            }

            if let Some(field) = columns[i] {
                fields.entry(field).or_insert_with(|| value.to_string());
            }
        }

        Ok(RawCsvRow {
            fields,
            line_number,
        })
    }

    /// Get a field value by name.
    pub(crate) fn get_field(&self, field: Field) -> Option<&String> {
        self.fields.get(&field)
    }

    /// Convert to a publication, coercing the numeric columns.
    ///
    /// Rows without a usable year are rejected, as are years before
    /// [`EARLIEST_YEAR`] or after `max_year`. An unusable or negative
    /// citation count becomes `None`.
    pub(crate) fn into_publication(mut self, max_year: i32) -> Result<Publication, RowRejection> {
        let year = self
            .get_field(Field::Year)
            .and_then(|value| coerce_integer(value))
            .ok_or(RowRejection::MissingYear)?;
        let year = i32::try_from(year)
            .ok()
            .filter(|year| (EARLIEST_YEAR..=max_year).contains(year))
            .ok_or(RowRejection::ImplausibleYear(year))?;

        let cited_by = self
            .get_field(Field::CitedBy)
            .and_then(|value| coerce_integer(value))
            .and_then(|count| u64::try_from(count).ok());

        let id = self
            .fields
            .remove(&Field::Id)
            .unwrap_or_else(|| nanoid::nanoid!());

        Ok(Publication {
            id,
            title: self.fields.remove(&Field::Title),
            abstract_text: self.fields.remove(&Field::Abstract),
            author_keywords: self.fields.remove(&Field::AuthorKeywords),
            index_keywords: self.fields.remove(&Field::IndexKeywords),
            affiliations: self.fields.remove(&Field::Affiliations),
            authors: self.fields.remove(&Field::Authors),
            source_title: self.fields.remove(&Field::SourceTitle),
            year,
            cited_by,
            enrichment: Default::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn create_test_record(fields: &[&str]) -> StringRecord {
        let mut record = StringRecord::new();
        for field in fields {
            record.push_field(field);
        }
        record
    }

    #[test]
    fn test_from_record_basic() {
        let columns = vec![Some(Field::Title), Some(Field::Year), None];
        let record = create_test_record(&["Test Article", " 2021 ", "ignored"]);
        let config = CsvConfig::new();

        let row = RawCsvRow::from_record(&columns, &record, &config, 2).unwrap();

        assert_eq!(
            row.get_field(Field::Title),
            Some(&"Test Article".to_string())
        );
        assert_eq!(row.get_field(Field::Year), Some(&"2021".to_string()));
        assert_eq!(row.fields.len(), 2);
        assert_eq!(row.line_number, 2);
    }

    #[test]
    fn test_from_record_skips_empty_cells() {
        let columns = vec![Some(Field::Title), Some(Field::Abstract)];
        let record = create_test_record(&["Test Article", "   "]);

        let row = RawCsvRow::from_record(&columns, &record, &CsvConfig::new(), 2).unwrap();
        assert_eq!(row.get_field(Field::Abstract), None);
    }

    #[test]
    fn test_from_record_too_many_fields_strict() {
        let columns = vec![Some(Field::Title)];
        let record = create_test_record(&["Test Article", "Extra Field"]);

        let result = RawCsvRow::from_record(&columns, &record, &CsvConfig::new(), 7);
        assert!(matches!(
            result,
            Err(AnalysisError::MalformedInput { line: 7, .. })
        ));
    }

    #[test]
    fn test_from_record_too_many_fields_flexible() {
        let columns = vec![Some(Field::Title)];
        let record = create_test_record(&["Test Article", "Extra Field"]);
        let mut config = CsvConfig::new();
        config.set_flexible(true);

        let row = RawCsvRow::from_record(&columns, &record, &config, 1).unwrap();
        assert_eq!(
            row.get_field(Field::Title),
            Some(&"Test Article".to_string())
        );
    }

    #[test]
    fn test_conversion_to_publication() {
        let columns = vec![
            Some(Field::Id),
            Some(Field::Title),
            Some(Field::Year),
            Some(Field::CitedBy),
        ];
        let record = create_test_record(&["2-s2.0-1", "Test Article", "2019.0", "n/a"]);

        let row = RawCsvRow::from_record(&columns, &record, &CsvConfig::new(), 1).unwrap();
        let publication = row.into_publication(2030).unwrap();

        assert_eq!(publication.id, "2-s2.0-1");
        assert_eq!(publication.title.as_deref(), Some("Test Article"));
        assert_eq!(publication.year, 2019);
        assert_eq!(publication.cited_by, None);
    }

    #[test]
    fn test_missing_year_is_rejected() {
        let columns = vec![Some(Field::Title), Some(Field::Year)];
        let record = create_test_record(&["Test Article", "unknown"]);

        let row = RawCsvRow::from_record(&columns, &record, &CsvConfig::new(), 1).unwrap();
        assert_eq!(row.into_publication(2030), Err(RowRejection::MissingYear));
    }

    #[rstest]
    #[case("2020000", Err(RowRejection::ImplausibleYear(2_020_000)))]
    #[case("2031", Err(RowRejection::ImplausibleYear(2031)))]
    #[case("-5", Err(RowRejection::ImplausibleYear(-5)))]
    #[case("1699", Err(RowRejection::ImplausibleYear(1699)))]
    #[case("1700", Ok(1700))]
    #[case("2030", Ok(2030))]
    fn test_year_bounds(#[case] year: &str, #[case] expected: Result<i32, RowRejection>) {
        let columns = vec![Some(Field::Year)];
        let record = create_test_record(&[year]);

        let row = RawCsvRow::from_record(&columns, &record, &CsvConfig::new(), 1).unwrap();
        let result = row.into_publication(2030).map(|p| p.year);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_negative_citations_are_missing() {
        let columns = vec![Some(Field::Year), Some(Field::CitedBy)];
        let record = create_test_record(&["2020", "-3"]);

        let row = RawCsvRow::from_record(&columns, &record, &CsvConfig::new(), 1).unwrap();
        let publication = row.into_publication(2030).unwrap();
        assert_eq!(publication.cited_by, None);
        assert!(!publication.id.is_empty());
    }
}
