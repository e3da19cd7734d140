//! A library for classifying and summarizing bibliographic exports.
//!
//! `agribib` reads a Scopus-style CSV export, marks every publication as
//! agriculture-related or not, resolves the countries named in its
//! affiliations and aggregates the result into bibliometric reports.
//!
//! # Key Features
//!
//! - **Loading**: header-mapped CSV parsing with numeric coercion and
//!   fail-fast validation of the required columns
//! - **Classification**: case-insensitive keyword matching over title,
//!   abstract, keywords and affiliations
//! - **Country extraction**: ISO 3166-1 names first, then an ordered table of
//!   abbreviations, cities and institutions
//! - **Aggregation**: per year, author, country or source, with publication
//!   counts, citation sums and H-index split by research focus
//! - **Reports and charts**: volume trends, citations per year, top authors,
//!   sources and countries, rendered to SVG with the `charts` feature
//!
//! # Basic Usage
//!
//! ```rust
//! use agribib::csv::CsvLoader;
//! use agribib::Pipeline;
//!
//! let input = "\
//! Authors,Title,Year,Source title,Cited by,Affiliations,Abstract,Author Keywords,Index Keywords
//! Smith J.,A Smart Agriculture IoT Platform,2020,Sensors,12,\"Univ, Nairobi, Kenya\",,,";
//!
//! let table = CsvLoader::new().parse(input).unwrap();
//! let records = Pipeline::standard().run(table.publications);
//!
//! assert!(records[0].is_agriculture());
//! assert!(records[0].countries().unwrap().contains("Kenya"));
//! ```
//!
//! # Aggregation
//!
//! ```rust
//! use agribib::aggregate::{Aggregator, GroupKey, Ranking};
//! # let records: Vec<agribib::Publication> = Vec::new();
//!
//! let authors = Aggregator::new(GroupKey::Author).aggregate(&records);
//! for group in authors.top_n(Ranking::Publications, 10) {
//!     println!("{}: h-index {}", group.key, group.h_index.total);
//! }
//! ```
//!
//! # Error Handling
//!
//! Only malformed input is an error: an unreadable table or a missing
//! required column fails with [`AnalysisError`] before any analysis runs.
//! Missing years, unparseable citation counts and unresolved affiliations are
//! counted and reported instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

extern crate csv as csv_crate;

pub mod aggregate;
#[cfg(feature = "charts")]
pub mod chart;
pub mod classify;
pub mod config;
pub mod country;
pub mod csv;
mod pipeline;
mod regex;
pub mod report;
pub mod stats;
mod utils;

// Reexports
pub use classify::KeywordClassifier;
pub use country::{CountryExtractor, CountrySet};
pub use csv::CsvLoader;
pub use pipeline::{Pipeline, Stage};

/// A specialized Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that stop an analysis run.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    InvalidFormat(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Malformed input: {message} at line {line}")]
    MalformedInput { message: String, line: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to render {path}: {message}")]
    Render { path: String, message: String },
}

impl From<csv_crate::Error> for AnalysisError {
    fn from(err: csv_crate::Error) -> Self {
        AnalysisError::InvalidFormat(err.to_string())
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::Config(err.to_string())
    }
}

/// Research focus of a publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Agriculture,
    NonAgriculture,
}

impl Category {
    /// Human readable label used in logs and chart legends.
    pub fn label(self) -> &'static str {
        match self {
            Category::Agriculture => "Agriculture",
            Category::NonAgriculture => "Non-Agriculture",
        }
    }
}

/// Fields derived from a publication by pipeline stages.
///
/// `None` means the stage producing the value has not run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    /// Set by [`KeywordClassifier`]
    pub is_agriculture: Option<bool>,
    /// Set by [`CountryExtractor`]; an empty set means unresolved
    pub countries: Option<CountrySet>,
}

/// A single row of a bibliographic export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    /// EID from the export, or a generated id
    pub id: String,
    /// Title of the work
    pub title: Option<String>,
    /// Abstract text
    pub abstract_text: Option<String>,
    /// Semicolon separated author keywords
    pub author_keywords: Option<String>,
    /// Semicolon separated index keywords
    pub index_keywords: Option<String>,
    /// Semicolon separated affiliation blocks
    pub affiliations: Option<String>,
    /// Semicolon separated author names
    pub authors: Option<String>,
    /// Journal, conference or book series
    pub source_title: Option<String>,
    /// Publication year
    pub year: i32,
    /// Citation count, `None` when the export had no usable value
    pub cited_by: Option<u64>,
    /// Derived fields
    pub enrichment: Enrichment,
}

impl Publication {
    /// Distinct author names, in order of appearance.
    pub fn author_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in utils::split_multi_value(self.authors.as_deref().unwrap_or_default()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Author and index keywords, trimmed and lower-cased.
    pub fn keywords(&self) -> impl Iterator<Item = String> {
        [self.author_keywords.as_deref(), self.index_keywords.as_deref()]
            .into_iter()
            .flatten()
            .flat_map(utils::split_multi_value)
            .map(str::to_lowercase)
    }

    /// Whether the classifier marked this record agriculture-related.
    ///
    /// Unclassified records count as non-agriculture.
    pub fn is_agriculture(&self) -> bool {
        self.enrichment.is_agriculture.unwrap_or(false)
    }

    pub fn category(&self) -> Category {
        if self.is_agriculture() {
            Category::Agriculture
        } else {
            Category::NonAgriculture
        }
    }

    /// Countries resolved from the affiliations, if extraction ran.
    pub fn countries(&self) -> Option<&CountrySet> {
        self.enrichment.countries.as_ref()
    }

    /// First listed author, used when quoting a peak-year paper.
    pub fn first_author(&self) -> Option<&str> {
        self.author_names().first().copied()
    }
}
