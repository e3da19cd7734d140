//! Run configuration.
//!
//! Every field has a default, so a JSON config file only needs the keys it
//! changes:
//!
//! ```
//! use agribib::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::from_json(r#"{ "start_year": 2015, "top_authors": 20 }"#).unwrap();
//! assert_eq!(config.start_year, 2015);
//! assert_eq!(config.top_sources, 15);
//! ```

use crate::classify::AGRICULTURE_KEYWORDS;
use crate::country::ExtractorConfig;
use crate::csv::CsvConfig;
use crate::{AnalysisError, CountryExtractor, KeywordClassifier, Pipeline, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for a full analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Records published before this year are left out
    pub start_year: i32,
    /// Rows dated after this year are dropped as implausible; defaults to next year
    pub max_year: Option<i32>,
    pub top_authors: usize,
    pub top_sources: usize,
    pub top_countries: usize,
    /// Entries per category in the top contributors report
    pub top_contributors: usize,
    /// Source titles longer than this are cut in reports and charts
    pub source_label_width: usize,
    /// Field delimiter of the input table
    pub delimiter: char,
    /// Keywords added to the built-in agriculture list
    pub extra_keywords: Vec<String>,
    /// Use `extra_keywords` instead of the built-in list
    pub replace_keywords: bool,
    pub countries: ExtractorConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            start_year: 2012,
            max_year: None,
            top_authors: 30,
            top_sources: 15,
            top_countries: 15,
            top_contributors: 10,
            source_label_width: 50,
            delimiter: ',',
            extra_keywords: Vec::new(),
            replace_keywords: false,
            countries: ExtractorConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parses a JSON config document.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] for invalid JSON or settings.
    pub fn from_json(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON config file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let input = fs::read_to_string(path)?;
        Self::from_json(&input)
    }

    fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() {
            return Err(AnalysisError::Config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )));
        }
        if self.replace_keywords && self.extra_keywords.is_empty() {
            return Err(AnalysisError::Config(
                "replace_keywords is set but extra_keywords is empty".to_string(),
            ));
        }
        if let Some(max_year) = self.max_year.filter(|max_year| *max_year < self.start_year) {
            return Err(AnalysisError::Config(format!(
                "max_year {max_year} is before start_year {}",
                self.start_year
            )));
        }
        Ok(())
    }

    /// CSV settings derived from this config.
    pub fn csv_config(&self) -> Result<CsvConfig> {
        self.validate()?;
        let mut config = CsvConfig::new();
        config.set_delimiter(self.delimiter as u8);
        if let Some(max_year) = self.max_year {
            config.set_max_year(max_year);
        }
        Ok(config)
    }

    /// Keyword classifier using the configured keyword list.
    pub fn classifier(&self) -> Result<KeywordClassifier> {
        if self.extra_keywords.is_empty() {
            return Ok(KeywordClassifier::new());
        }
        let extra = self.extra_keywords.iter().map(String::as_str);
        if self.replace_keywords {
            KeywordClassifier::with_keywords(extra)
        } else {
            KeywordClassifier::with_keywords(AGRICULTURE_KEYWORDS.iter().copied().chain(extra))
        }
    }

    /// Classifier and country extractor, in that order.
    pub fn pipeline(&self) -> Result<Pipeline> {
        Ok(Pipeline::new()
            .with_stage(self.classifier()?)
            .with_stage(CountryExtractor::new().with_config(self.countries.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Publication;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::from_json("{}").unwrap();
        assert_eq!(config.start_year, 2012);
        assert_eq!(config.top_authors, 30);
        assert_eq!(config.top_contributors, 10);
        assert_eq!(config.delimiter, ',');
        assert!(!config.countries.match_alpha2_codes);
    }

    #[test]
    fn test_nested_country_settings() {
        let config = AnalysisConfig::from_json(
            r#"{ "countries": { "match_alpha2_codes": true, "extra_overrides": [["CSIRO", "Australia"]] } }"#,
        )
        .unwrap();
        assert!(config.countries.match_alpha2_codes);
        assert_eq!(
            config.countries.extra_overrides,
            vec![("CSIRO".to_string(), "Australia".to_string())]
        );
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = AnalysisConfig::from_json("{ start_year: }").unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_replace_without_keywords_is_rejected() {
        let err = AnalysisConfig::from_json(r#"{ "replace_keywords": true }"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        let err = AnalysisConfig::from_json(r#"{ "delimiter": "§" }"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_max_year_reaches_the_loader() {
        let config = AnalysisConfig::from_json(r#"{ "max_year": 2021 }"#).unwrap();
        let input = "Authors,Title,Year,Source title,Cited by,Affiliations,Abstract,\
                     Author Keywords,Index Keywords\n\
                     Smith J.,Kept,2021,J,1,,,,\n\
                     Smith J.,Future,2022,J,1,,,,";

        let loader = crate::CsvLoader::new().with_config(config.csv_config().unwrap());
        let table = loader.parse(input).unwrap();
        assert_eq!(table.publications.len(), 1);
        assert_eq!(table.dropped_implausible_year, 1);
    }

    #[test]
    fn test_max_year_before_start_year_is_rejected() {
        let err =
            AnalysisConfig::from_json(r#"{ "start_year": 2015, "max_year": 2010 }"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_extra_keywords_extend_or_replace() {
        let publication = Publication {
            title: Some("Vineyard monitoring".to_string()),
            ..Default::default()
        };
        let mut config = AnalysisConfig::default();
        assert!(!config.classifier().unwrap().is_agriculture(&publication));

        config.extra_keywords = vec!["vineyard".to_string()];
        let extended = config.classifier().unwrap();
        assert!(extended.is_agriculture(&publication));
        assert!(extended.matches(Some("smart farming")));

        config.replace_keywords = true;
        let replaced = config.classifier().unwrap();
        assert!(replaced.is_agriculture(&publication));
        assert!(!replaced.matches(Some("smart farming")));
    }

    #[test]
    fn test_pipeline_uses_country_settings() {
        let mut config = AnalysisConfig::default();
        config.countries.match_alpha2_codes = true;
        let pipeline = config.pipeline().unwrap();
        let record = pipeline.apply(Publication {
            affiliations: Some("Lab, Boston, MA, US".to_string()),
            ..Default::default()
        });
        assert!(record.countries().unwrap().contains("United States"));
    }
}
