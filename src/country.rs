//! Country extraction from affiliation strings.
//!
//! Affiliations are noisy free text listing one institution per
//! `;`-separated block. Each block is resolved on its own, in up to three
//! passes, and the first pass that finds something wins for that block:
//!
//! 1. **Canonical names**: the first ISO 3166-1 name contained in the block,
//!    case-sensitively. Names are tried longest first, ties in lexicographic
//!    order, so "Nigeria" beats "Niger" and "United States" beats "Jersey"
//!    in "New Jersey, United States".
//! 2. **Alpha-2 codes** (opt-in): the last comma-separated token equal to
//!    an ISO code, e.g. `"Boston, MA, US"` (so "MA" is not read as Morocco).
//! 3. **Overrides**: the first pattern of an ordered table of aliases,
//!    institutions, cities and abbreviations found case-insensitively.
//!
//! Countries from all blocks are collected into a [`CountrySet`]. An empty
//! set means the affiliation could not be resolved; callers count those.
//!
//! # Example
//!
//! ```
//! use agribib::CountryExtractor;
//!
//! let extractor = CountryExtractor::new();
//! let countries = extractor.extract(Some(
//!     "Univ. of Nairobi, Nairobi, Kenya; Gazi University, Ankara; Makerere Univ., Kampala, Uganda",
//! ));
//! assert_eq!(countries.iter().collect::<Vec<_>>(), vec!["Kenya", "Türkiye", "Uganda"]);
//! ```

mod iso;
mod overrides;

pub use iso::ISO_COUNTRIES;
pub use overrides::DEFAULT_OVERRIDES;

use crate::{Publication, Stage};
use compact_str::CompactString;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// ISO entries in matching order: longest name first, then lexicographic.
static CANONICAL_ORDER: LazyLock<Vec<(&'static str, &'static str)>> = LazyLock::new(|| {
    let mut entries = ISO_COUNTRIES.to_vec();
    entries.sort_by_key(|(_, name)| (Reverse(name.chars().count()), *name));
    entries
});

fn country_for_code(code: &str) -> Option<&'static str> {
    ISO_COUNTRIES
        .iter()
        .find(|(alpha2, _)| *alpha2 == code)
        .map(|(_, name)| *name)
}

/// Distinct country names resolved from one affiliation string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountrySet(BTreeSet<CompactString>);

impl CountrySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a country, returning `false` if it was already present.
    pub fn insert(&mut self, country: impl Into<CompactString>) -> bool {
        self.0.insert(country.into())
    }

    pub fn contains(&self, country: &str) -> bool {
        self.0.contains(country)
    }

    /// Country names in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(CompactString::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no country could be resolved.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<CompactString>> FromIterator<S> for CountrySet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Configuration options for country extraction.
///
/// # Examples
///
/// ```
/// use agribib::country::{CountryExtractor, ExtractorConfig};
///
/// let config = ExtractorConfig {
///     match_alpha2_codes: true,
///     extra_overrides: vec![("Wageningen".to_string(), "Netherlands".to_string())],
/// };
/// let extractor = CountryExtractor::new().with_config(config);
/// assert!(extractor.extract(Some("Wageningen University & Research")).contains("Netherlands"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Accept a bare alpha-2 code as a comma-separated token of a block.
    pub match_alpha2_codes: bool,
    /// `(pattern, country)` pairs tried before the built-in overrides.
    pub extra_overrides: Vec<(String, String)>,
}

/// Resolves affiliation strings to countries.
#[derive(Debug, Clone)]
pub struct CountryExtractor {
    /// Lower-cased pattern and target country, in evaluation order
    overrides: Vec<(String, CompactString)>,
    match_alpha2_codes: bool,
}

impl Default for CountryExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CountryExtractor {
    /// Creates an extractor with the built-in override table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            overrides: Self::compile_overrides(DEFAULT_OVERRIDES.iter().copied()),
            match_alpha2_codes: false,
        }
    }

    /// Applies a configuration; extra overrides take precedence over built-in ones.
    #[must_use]
    pub fn with_config(mut self, config: ExtractorConfig) -> Self {
        let extra = config
            .extra_overrides
            .iter()
            .map(|(pattern, country)| (pattern.as_str(), country.as_str()));
        self.overrides = Self::compile_overrides(extra.chain(DEFAULT_OVERRIDES.iter().copied()));
        self.match_alpha2_codes = config.match_alpha2_codes;
        self
    }

    fn compile_overrides<'a>(
        pairs: impl Iterator<Item = (&'a str, &'a str)>,
    ) -> Vec<(String, CompactString)> {
        pairs
            .filter(|(pattern, _)| !pattern.trim().is_empty())
            .map(|(pattern, country)| (pattern.to_lowercase(), CompactString::from(country)))
            .collect()
    }

    /// Canonical names in the order they are tried.
    pub fn canonical_order() -> impl Iterator<Item = &'static str> {
        CANONICAL_ORDER.iter().map(|(_, name)| *name)
    }

    /// Extracts the set of countries named in an affiliation string.
    ///
    /// Missing or blank input gives an empty set.
    pub fn extract(&self, affiliations: Option<&str>) -> CountrySet {
        let mut countries = CountrySet::new();
        let Some(affiliations) = affiliations else {
            return countries;
        };
        for component in affiliations.split(';') {
            if let Some(country) = self.match_component(component) {
                countries.insert(country);
            }
        }
        countries
    }

    /// Resolves a single institution block.
    fn match_component(&self, component: &str) -> Option<CompactString> {
        if component.trim().is_empty() {
            return None;
        }

        if let Some((_, name)) = CANONICAL_ORDER
            .iter()
            .find(|(_, name)| component.contains(name))
        {
            return Some(CompactString::from(*name));
        }

        if self.match_alpha2_codes {
            let code_match = component
                .split(',')
                .rev()
                .find_map(|token| country_for_code(token.trim()));
            if let Some(name) = code_match {
                return Some(CompactString::from(name));
            }
        }

        let lowered = component.to_lowercase();
        self.overrides
            .iter()
            .find(|(pattern, _)| lowered.contains(pattern.as_str()))
            .map(|(_, country)| country.clone())
    }
}

impl Stage for CountryExtractor {
    fn name(&self) -> &'static str {
        "country extractor"
    }

    fn apply(&self, mut publication: Publication) -> Publication {
        let countries = self.extract(publication.affiliations.as_deref());
        if countries.is_empty() {
            if let Some(affiliations) = publication.affiliations.as_deref() {
                debug!("Unable to extract country from: {affiliations}");
            }
        }
        publication.enrichment.countries = Some(countries);
        publication
    }
}
