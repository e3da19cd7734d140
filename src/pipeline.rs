//! Record enrichment pipeline.

use crate::{CountryExtractor, KeywordClassifier, Publication};
use log::info;

/// Trait for implementing record enrichment stages.
///
/// A stage is a pure transform: it takes a publication, fills in the
/// derived fields it owns and returns it. Running a stage twice on the same
/// record must give the same result.
pub trait Stage {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Enrich a single publication.
    fn apply(&self, publication: Publication) -> Publication;
}

/// An ordered sequence of [`Stage`]s applied to every record.
///
/// # Examples
///
/// ```
/// use agribib::{CountryExtractor, KeywordClassifier, Pipeline, Publication};
///
/// let pipeline = Pipeline::new()
///     .with_stage(KeywordClassifier::new())
///     .with_stage(CountryExtractor::new());
///
/// let records = pipeline.run(vec![Publication {
///     title: Some("Precision farming with drones".to_string()),
///     affiliations: Some("Wageningen University, Wageningen, Netherlands".to_string()),
///     ..Default::default()
/// }]);
/// assert!(records[0].is_agriculture());
/// ```
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Classifier followed by country extractor, both with default settings.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with_stage(KeywordClassifier::new())
            .with_stage(CountryExtractor::new())
    }

    /// Appends a stage.
    #[must_use]
    pub fn with_stage<S: Stage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Names of the stages, in application order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Runs every stage over a single record.
    pub fn apply(&self, publication: Publication) -> Publication {
        self.stages
            .iter()
            .fold(publication, |record, stage| stage.apply(record))
    }

    /// Runs every stage over every record, preserving input order.
    pub fn run(&self, publications: Vec<Publication>) -> Vec<Publication> {
        info!(
            "Enriching {} publications with stages: {}",
            publications.len(),
            self.stage_names().join(", ")
        );
        publications
            .into_iter()
            .map(|publication| self.apply(publication))
            .collect()
    }
}
