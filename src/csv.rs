//! CSV export loader.
//!
//! Reads a Scopus-style export into [`Publication`] records. Headers are
//! matched case-insensitively through a configurable alias map, the required
//! columns are checked before any row is read, and the numeric columns are
//! coerced rather than rejected. Rows whose year is missing or outside the
//! accepted range are dropped and counted.
//!
//! # Example
//!
//! ```
//! use agribib::CsvLoader;
//!
//! let input = "\
//! Year,Cited by,Title,Abstract,Author Keywords,Index Keywords,Affiliations,Authors,Source title
//! 2021,4,Example Paper,,,,,Smith J.,Sensors
//! unknown,1,Undated Paper,,,,,Doe A.,Sensors";
//!
//! let table = CsvLoader::new().parse(input).unwrap();
//! assert_eq!(table.publications.len(), 1);
//! assert_eq!(table.dropped_missing_year, 1);
//! ```

mod config;
mod structure;

pub use config::{CsvConfig, Field, REQUIRED_FIELDS};

use csv::{ReaderBuilder, StringRecord};
use log::{debug, info, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{AnalysisError, Publication, Result};
use structure::{RawCsvRow, RowRejection};

/// Publications read from an export, with the rows that were dropped.
#[derive(Debug, Clone, Default)]
pub struct LoadedTable {
    /// Rows with a usable year, in input order
    pub publications: Vec<Publication>,
    /// Rows dropped because the year was missing or not numeric
    pub dropped_missing_year: usize,
    /// Rows dropped because the year was outside the accepted range
    pub dropped_implausible_year: usize,
}

/// Loader for CSV exports with configurable header mappings.
///
/// # Examples
///
/// ```
/// use agribib::csv::{CsvLoader, CsvConfig};
///
/// let mut config = CsvConfig::new();
/// config.set_delimiter(b';');
///
/// let loader = CsvLoader::new().with_config(config);
/// ```
#[derive(Debug, Clone)]
pub struct CsvLoader {
    config: CsvConfig,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvLoader {
    /// Creates a new loader with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: CsvConfig::new(),
        }
    }

    /// Creates a new loader with custom configuration
    #[must_use]
    pub fn with_config(mut self, config: CsvConfig) -> Self {
        self.config = config;
        self
    }

    /// Parses an export held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MissingColumn`] when a required column is
    /// absent and [`AnalysisError::InvalidFormat`] or
    /// [`AnalysisError::MalformedInput`] when the CSV cannot be read.
    pub fn parse(&self, input: &str) -> Result<LoadedTable> {
        self.parse_reader(input.as_bytes())
    }

    /// Reads and parses an export file.
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<LoadedTable> {
        let path = path.as_ref();
        info!("Loading export from {}", path.display());
        let file = File::open(path)?;
        self.parse_reader(file)
    }

    /// Parses an export from any reader.
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<LoadedTable> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| AnalysisError::InvalidFormat(e.to_string()))?;
        let columns = self.resolve_columns(headers);

        for field in REQUIRED_FIELDS {
            if !columns.contains(&Some(*field)) {
                return Err(AnalysisError::MissingColumn(
                    field.column_name().to_string(),
                ));
            }
        }

        let mut table = LoadedTable::default();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| AnalysisError::InvalidFormat(e.to_string()))?;
            let line_number = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(index + 2);
            let row = RawCsvRow::from_record(&columns, &record, &self.config, line_number)?;
            match row.into_publication(self.config.max_year) {
                Ok(publication) => table.publications.push(publication),
                Err(RowRejection::MissingYear) => {
                    debug!("Dropping row at line {line_number}: missing year");
                    table.dropped_missing_year += 1;
                }
                Err(RowRejection::ImplausibleYear(year)) => {
                    warn!("Dropping row at line {line_number}: implausible year {year}");
                    table.dropped_implausible_year += 1;
                }
            }
        }

        info!(
            "Loaded {} publications \
             ({} rows dropped for missing year, {} for implausible year)",
            table.publications.len(),
            table.dropped_missing_year,
            table.dropped_implausible_year
        );
        Ok(table)
    }

    /// Maps each header to a field, keeping one column per field.
    ///
    /// When several headers map to the same field, the one matching the
    /// earliest alias wins and ties go to the leftmost column.
    fn resolve_columns(&self, headers: &StringRecord) -> Vec<Option<Field>> {
        let matches: Vec<Option<(Field, usize)>> = headers
            .iter()
            .map(|header| self.config.match_header(header))
            .collect();

        matches
            .iter()
            .enumerate()
            .map(|(index, matched)| {
                let (field, rank) = (*matched)?;
                let shadowed = matches.iter().enumerate().any(|(other, m)| {
                    matches!(m, Some((f, r)) if *f == field && (*r, other) < (rank, index))
                });
                (!shadowed).then_some(field)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "Authors,Title,Year,Source title,Cited by,Affiliations,Abstract,\
                          Author Keywords,Index Keywords,EID";

    const SCOPUS_HEADER: &str = "Authors,Author full names,Author(s) ID,Title,Year,\
                                 Source title,Volume,Issue,Art. No.,Page start,Page end,\
                                 Page count,Cited by,DOI,Link,Affiliations,\
                                 Authors with affiliations,Abstract,Author Keywords,\
                                 Index Keywords,Document Type,Publication Stage,\
                                 Open Access,Source,EID";

    #[test]
    fn test_basic_export() {
        let input = format!(
            "{HEADER}\n\
             \"Smith J.; Doe A.\",Test Paper,2023,Test Journal,5,\
             \"Univ A, Kenya; Univ B, Ghana\",Text,IoT,Sensors,2-s2.0-1\n\
             Roe B.,Another Paper,2022,Another Journal,,,,,,2-s2.0-2"
        );

        let table = CsvLoader::new().parse(&input).unwrap();
        assert_eq!(table.publications.len(), 2);
        assert_eq!(table.dropped_missing_year, 0);

        let first = &table.publications[0];
        assert_eq!(first.id, "2-s2.0-1");
        assert_eq!(first.title.as_deref(), Some("Test Paper"));
        assert_eq!(first.author_names(), vec!["Smith J.", "Doe A."]);
        assert_eq!(first.year, 2023);
        assert_eq!(first.cited_by, Some(5));
        assert_eq!(first.source_title.as_deref(), Some("Test Journal"));

        let second = &table.publications[1];
        assert_eq!(second.cited_by, None);
        assert_eq!(second.affiliations, None);
    }

    #[test]
    fn test_missing_required_column() {
        let input = "Authors,Title,Year\nSmith J.,Test Paper,2023";
        let result = CsvLoader::new().parse(input);
        assert!(matches!(
            result,
            Err(AnalysisError::MissingColumn(column)) if column == "Cited by"
        ));
    }

    #[test]
    fn test_rows_without_year_are_counted() {
        let input = format!(
            "{HEADER}\n\
             Smith J.,Dated,2020,J,1,,,,,\n\
             Smith J.,Undated,,J,1,,,,,\n\
             Smith J.,Garbage,soon,J,1,,,,,"
        );

        let table = CsvLoader::new().parse(&input).unwrap();
        assert_eq!(table.publications.len(), 1);
        assert_eq!(table.dropped_missing_year, 2);
    }

    #[test]
    fn test_scopus_source_column_is_not_a_source_title() {
        let input = format!(
            "{SCOPUS_HEADER}\n\
             Smith J.,\"Smith, John\",123,Soil sensing,2021,,,,,,,,4,,,\
             \"Univ, Nairobi, Kenya\",,,,,Article,Final,,Scopus,2-s2.0-9\n\
             Doe A.,\"Doe, Ann\",456,Edge caching,2022,IEEE Access,,,,,,,1,,,\
             \"KTH, Stockholm, Sweden\",,,,,Article,Final,,Scopus,2-s2.0-10"
        );

        let table = CsvLoader::new().parse(&input).unwrap();
        assert_eq!(table.publications.len(), 2);
        assert_eq!(table.publications[0].source_title, None);
        assert_eq!(
            table.publications[1].source_title.as_deref(),
            Some("IEEE Access")
        );
        assert_eq!(table.publications[1].authors.as_deref(), Some("Doe A."));
        assert_eq!(table.publications[1].id, "2-s2.0-10");

        let report = crate::report::top_sources(&table.publications, 15, 50);
        assert_eq!(report.ignored.total, 1);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].label, "IEEE Access");
    }

    #[test]
    fn test_earlier_alias_wins_over_leftmost_column() {
        let input = "Journal,Title,Year,Source title,Cited by,Affiliations,Abstract,\
                     Author Keywords,Index Keywords,Authors\n\
                     Old name,Test Paper,2023,Sensors,1,,,,,Smith J.";

        let table = CsvLoader::new().parse(input).unwrap();
        assert_eq!(
            table.publications[0].source_title.as_deref(),
            Some("Sensors")
        );
    }

    #[test]
    fn test_implausible_years_are_counted() {
        let input = format!(
            "{HEADER}\n\
             Smith J.,Dated,2020,J,1,,,,,\n\
             Smith J.,Typo,2020000,J,1,,,,,\n\
             Smith J.,Future,2031,J,1,,,,,\n\
             Smith J.,Undated,,J,1,,,,,"
        );

        let mut config = CsvConfig::new();
        config.set_max_year(2030);

        let table = CsvLoader::new().with_config(config).parse(&input).unwrap();
        assert_eq!(table.publications.len(), 1);
        assert_eq!(table.publications[0].year, 2020);
        assert_eq!(table.dropped_missing_year, 1);
        assert_eq!(table.dropped_implausible_year, 2);
    }

    #[test]
    fn test_custom_delimiter() {
        let input = HEADER.replace(',', ";") + "\nSmith J.;Test Paper;2023;J;3;;;;;";

        let mut config = CsvConfig::new();
        config.set_delimiter(b';');

        let table = CsvLoader::new().with_config(config).parse(&input).unwrap();
        assert_eq!(table.publications[0].title.as_deref(), Some("Test Paper"));
        assert_eq!(table.publications[0].cited_by, Some(3));
    }

    #[test]
    fn test_generated_ids_without_eid_column() {
        let header = HEADER.trim_end_matches(",EID");
        let input = format!("{header}\nSmith J.,Test Paper,2023,J,3,,,,");

        let table = CsvLoader::new().parse(&input).unwrap();
        assert_eq!(table.publications[0].id.len(), 21);
    }

    #[test]
    fn test_extra_cells_are_rejected() {
        let input = format!("{HEADER}\nSmith J.,Test Paper,2023,J,3,,,,,id,surplus");
        let result = CsvLoader::new().parse(&input);
        assert!(matches!(result, Err(AnalysisError::MalformedInput { line: 2, .. })));
    }
}
