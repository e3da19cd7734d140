//! Agriculture keyword classifier.
//!
//! A publication is agriculture-related when any keyword phrase occurs,
//! ignoring case, as a plain substring of its title, abstract, author
//! keywords, index keywords or affiliations. There is no tokenization or
//! stemming: "organic farming" matches only that literal text.
//!
//! # Example
//!
//! ```
//! use agribib::{KeywordClassifier, Publication};
//!
//! let classifier = KeywordClassifier::new();
//! let publication = Publication {
//!     title: Some("A Smart Agriculture IoT Platform".to_string()),
//!     ..Default::default()
//! };
//! assert!(classifier.is_agriculture(&publication));
//! ```

use crate::regex::{Regex, RegexBuilder, escape};
use crate::{AnalysisError, Publication, Result, Stage};
use itertools::Itertools;
use std::sync::LazyLock;

/// Default agriculture-domain phrases.
pub const AGRICULTURE_KEYWORDS: &[&str] = &[
    "agriculture",
    "farming",
    "agritech",
    "precision agriculture",
    "smart agriculture",
    "crop monitoring",
    "crop prediction",
    "crop disease",
    "crop yield forecasting",
    "precision farming",
    "site-specific crop management",
    "variable rate technology",
    "sustainable farming",
    "conservation agriculture",
    "agroecology",
    "organic farming",
    "livestock management",
    "animal health monitoring",
    "dairy farming technology",
    "poultry monitoring",
    "soil health monitoring",
    "irrigation management",
    "water usage efficiency",
    "nutrient management",
    "agricultural drones",
    "farm robotics",
    "automated harvesting",
    "robotic weeding",
    "climate-smart agriculture",
    "agricultural adaptation to climate change",
    "weather prediction for farming",
    "agri-food supply chain",
    "food traceability",
    "agricultural logistics",
    "farm to table",
    "pesticide application technology",
    "herbicide resistance management",
    "fertilizer optimization",
    "agricultural big data",
    "farm data analytics",
    "agricultural informatics",
    "agricultural decision support systems",
];

static DEFAULT_MATCHER: LazyLock<Regex> = LazyLock::new(|| {
    build_matcher(AGRICULTURE_KEYWORDS.iter().copied())
        .expect("default agriculture keywords form a valid pattern")
});

/// Compiles keyword phrases into one escaped, case-insensitive alternation.
fn build_matcher<'a, I>(keywords: I) -> Result<Regex>
where
    I: IntoIterator<Item = &'a str>,
{
    let pattern = keywords
        .into_iter()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unique_by(|k| k.to_lowercase())
        .map(escape)
        .join("|");
    if pattern.is_empty() {
        return Err(AnalysisError::Config(
            "keyword list must contain at least one phrase".to_string(),
        ));
    }
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| AnalysisError::Config(format!("invalid keyword pattern: {e}")))
}

/// Marks publications as agriculture-related by keyword search.
///
/// The classifier is a pure function of the publication: running it twice
/// on the same record gives the same answer.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    matcher: Regex,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordClassifier {
    /// Creates a classifier using [`AGRICULTURE_KEYWORDS`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            matcher: DEFAULT_MATCHER.clone(),
        }
    }

    /// Creates a classifier from a custom keyword list.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] if the list has no usable phrase.
    pub fn with_keywords<'a, I>(keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        Ok(Self {
            matcher: build_matcher(keywords)?,
        })
    }

    /// Whether a single text value contains any keyword. Missing text never matches.
    pub fn matches(&self, text: Option<&str>) -> bool {
        text.is_some_and(|t| self.matcher.is_match(t))
    }

    /// Whether the publication is agriculture-related.
    pub fn is_agriculture(&self, publication: &Publication) -> bool {
        [
            publication.title.as_deref(),
            publication.abstract_text.as_deref(),
            publication.author_keywords.as_deref(),
            publication.index_keywords.as_deref(),
            publication.affiliations.as_deref(),
        ]
        .into_iter()
        .any(|text| self.matches(text))
    }
}

impl Stage for KeywordClassifier {
    fn name(&self) -> &'static str {
        "keyword classifier"
    }

    fn apply(&self, mut publication: Publication) -> Publication {
        publication.enrichment.is_agriculture = Some(self.is_agriculture(&publication));
        publication
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn publication_with_title(title: &str) -> Publication {
        Publication {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[rstest]
    #[case("A Smart Agriculture IoT Platform", true)]
    #[case("ORGANIC FARMING with sensors", true)]
    #[case("Agritech start-ups", true)]
    #[case("Organic-farming practices", true)]
    #[case("Edge computing for smart cities", false)]
    #[case("Farm-to-table logistics", false)]
    fn test_title_matching(#[case] title: &str, #[case] expected: bool) {
        let classifier = KeywordClassifier::new();
        assert_eq!(
            classifier.is_agriculture(&publication_with_title(title)),
            expected
        );
    }

    #[test]
    fn test_every_field_is_searched() {
        let classifier = KeywordClassifier::new();
        let cases = [
            Publication {
                abstract_text: Some("We study crop disease detection".to_string()),
                ..Default::default()
            },
            Publication {
                author_keywords: Some("IoT; Precision Farming".to_string()),
                ..Default::default()
            },
            Publication {
                index_keywords: Some("Food Traceability; Blockchain".to_string()),
                ..Default::default()
            },
            Publication {
                affiliations: Some("Faculty of Agriculture, Univ of Nairobi, Kenya".to_string()),
                ..Default::default()
            },
        ];
        for publication in &cases {
            assert!(classifier.is_agriculture(publication), "{publication:?}");
        }
    }

    #[test]
    fn test_empty_record_is_not_agriculture() {
        let classifier = KeywordClassifier::new();
        assert!(!classifier.is_agriculture(&Publication::default()));
        assert!(!classifier.matches(None));
        assert!(!classifier.matches(Some("")));
    }

    #[test]
    fn test_custom_keywords() {
        let classifier = KeywordClassifier::with_keywords(["aquaculture", "fish farm"]).unwrap();
        assert!(classifier.is_agriculture(&publication_with_title("Aquaculture monitoring")));
        assert!(!classifier.is_agriculture(&publication_with_title("Smart agriculture")));
    }

    #[test]
    fn test_keywords_are_escaped() {
        let classifier = KeywordClassifier::with_keywords(["c++ (farm)"]).unwrap();
        assert!(classifier.matches(Some("Using C++ (farm) tooling")));
        assert!(!classifier.matches(Some("Using C farm tooling")));
    }

    #[test]
    fn test_empty_keyword_list_is_rejected() {
        let result = KeywordClassifier::with_keywords(["", "  "]);
        assert!(matches!(result, Err(AnalysisError::Config(_))));
    }

    #[test]
    fn test_stage_is_idempotent() {
        let classifier = KeywordClassifier::new();
        let once = classifier.apply(publication_with_title("Irrigation management in Kenya"));
        let twice = classifier.apply(once.clone());
        assert_eq!(once.enrichment.is_agriculture, Some(true));
        assert_eq!(once, twice);
    }
}
