//! CSV loader configuration.

use std::collections::HashMap;

/// Export columns understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Title,
    Abstract,
    AuthorKeywords,
    IndexKeywords,
    Affiliations,
    Authors,
    SourceTitle,
    Year,
    CitedBy,
}

impl Field {
    /// Column name as written by Scopus exports.
    pub fn column_name(self) -> &'static str {
        match self {
            Field::Id => "EID",
            Field::Title => "Title",
            Field::Abstract => "Abstract",
            Field::AuthorKeywords => "Author Keywords",
            Field::IndexKeywords => "Index Keywords",
            Field::Affiliations => "Affiliations",
            Field::Authors => "Authors",
            Field::SourceTitle => "Source title",
            Field::Year => "Year",
            Field::CitedBy => "Cited by",
        }
    }
}

/// Columns that must be present before any analysis runs.
pub const REQUIRED_FIELDS: &[Field] = &[
    Field::Year,
    Field::CitedBy,
    Field::Title,
    Field::Abstract,
    Field::AuthorKeywords,
    Field::IndexKeywords,
    Field::Affiliations,
    Field::Authors,
    Field::SourceTitle,
];

/// Default header mappings for common export column names
const DEFAULT_HEADERS: &[(Field, &[&str])] = &[
    (Field::Id, &["eid", "id"]),
    (Field::Title, &["title", "article title", "document title"]),
    (Field::Abstract, &["abstract"]),
    (Field::AuthorKeywords, &["author keywords"]),
    (Field::IndexKeywords, &["index keywords"]),
    (Field::Affiliations, &["affiliations"]),
    (Field::Authors, &["authors", "author"]),
    (Field::SourceTitle, &["source title", "journal"]),
    (Field::Year, &["year", "publication year"]),
    (Field::CitedBy, &["cited by", "times cited"]),
];

/// Configuration for CSV loading with custom header mappings.
///
/// # Examples
///
/// ```
/// use agribib::csv::{CsvConfig, Field};
///
/// let mut config = CsvConfig::new();
/// config.set_header_mapping(Field::CitedBy, vec!["Citations".to_string()]);
/// config.set_delimiter(b';');
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Custom header mappings for CSV columns
    header_map: HashMap<Field, Vec<String>>,
    /// Delimiter to use for parsing the CSV
    pub(crate) delimiter: u8,
    /// Whether to trim whitespace from cell values
    pub(crate) trim: bool,
    /// Whether rows may have more cells than the header
    pub(crate) flexible: bool,
    /// Latest accepted publication year
    pub(crate) max_year: i32,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvConfig {
    /// Creates a new CSV configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        let mut config = Self {
            header_map: HashMap::new(),
            delimiter: b',',
            trim: true,
            flexible: false,
            max_year: default_max_year(),
        };
        config.set_default_headers();
        config
    }

    fn set_default_headers(&mut self) {
        for (field, aliases) in DEFAULT_HEADERS {
            self.header_map
                .insert(*field, aliases.iter().map(|s| s.to_string()).collect());
        }
    }

    /// Sets a custom header mapping, replacing the default aliases
    pub fn set_header_mapping(&mut self, field: Field, aliases: Vec<String>) -> &mut Self {
        self.header_map.insert(field, aliases);
        self
    }

    /// Sets the delimiter character
    pub fn set_delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether cell values are trimmed
    pub fn set_trim(&mut self, trim: bool) -> &mut Self {
        self.trim = trim;
        self
    }

    /// Sets whether rows with extra cells are accepted
    pub fn set_flexible(&mut self, flexible: bool) -> &mut Self {
        self.flexible = flexible;
        self
    }

    /// Sets the latest accepted publication year; later rows are dropped
    pub fn set_max_year(&mut self, max_year: i32) -> &mut Self {
        self.max_year = max_year;
        self
    }

    /// Finds the field for a given header, ignoring case and a leading BOM
    pub fn get_field_for_header(&self, header: &str) -> Option<Field> {
        self.match_header(header).map(|(field, _)| field)
    }

    /// Field for a header and the position of the matching alias.
    ///
    /// Lower positions are preferred when several columns map to one field.
    pub(crate) fn match_header(&self, header: &str) -> Option<(Field, usize)> {
        let header_lower = header.trim_start_matches('\u{feff}').trim().to_lowercase();
        self.header_map.iter().find_map(|(field, aliases)| {
            aliases
                .iter()
                .position(|a| a.to_lowercase() == header_lower)
                .map(|rank| (*field, rank))
        })
    }
}

/// The year after the current one, so in-press papers are kept.
fn default_max_year() -> i32 {
    time::OffsetDateTime::now_utc().year() + 1
}
