//! Bibliometric reports over an enriched publication table.
//!
//! [`analyze`] is the whole run: it enriches the loaded table, applies the
//! start-year filter and builds every report. Each report can also be built
//! on its own from a slice of enriched publications.
//!
//! # Example
//!
//! ```
//! use agribib::config::AnalysisConfig;
//! use agribib::csv::CsvLoader;
//! use agribib::report::analyze;
//!
//! let input = "\
//! Authors,Title,Year,Source title,Cited by,Affiliations,Abstract,Author Keywords,Index Keywords
//! Smith J.,Smart agriculture sensing,2019,Sensors,12,\"Univ, Nairobi, Kenya\",,IoT,
//! Doe A.,Edge caching,2020,IEEE Access,3,\"KTH, Stockholm, Sweden\",,Edge,
//! Roe B.,Old work,2005,Sensors,1,\"KTH, Stockholm, Sweden\",,,";
//!
//! let table = CsvLoader::new().parse(input).unwrap();
//! let report = analyze(table, &AnalysisConfig::default()).unwrap();
//!
//! assert_eq!(report.summary.analysed.total, 2);
//! assert_eq!(report.summary.dropped_before_start, 1);
//! assert_eq!(report.volume.totals.agric, 1);
//! ```

mod citations;
mod rankings;
mod summary;
mod volume;

pub use citations::{
    CitationsReport, CitedPaper, PeakExplanation, YearCitations, citations_per_year,
};
pub use rankings::{
    ContributorSection, ContributorsReport, RankedEntry, RankingReport, top_authors,
    top_contributors, top_countries, top_country_citations, top_sources,
};
pub use summary::{DatasetSummary, summarize};
pub use volume::{SeriesTrend, VolumeReport, YearVolume, volume_per_year};

use crate::aggregate::Split;
use crate::config::AnalysisConfig;
use crate::csv::LoadedTable;
use crate::{Category, Publication, Result};
use serde::Serialize;

/// One line of a per-year chart: all records or a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Series {
    General,
    Agriculture,
    NonAgriculture,
}

impl Series {
    pub const ALL: [Series; 3] = [Series::General, Series::Agriculture, Series::NonAgriculture];

    pub fn label(self) -> &'static str {
        match self {
            Series::General => "General",
            Series::Agriculture => Category::Agriculture.label(),
            Series::NonAgriculture => Category::NonAgriculture.label(),
        }
    }

    /// Whether a record belongs to this series.
    pub fn includes(self, publication: &Publication) -> bool {
        match self {
            Series::General => true,
            Series::Agriculture => publication.is_agriculture(),
            Series::NonAgriculture => !publication.is_agriculture(),
        }
    }

    /// The matching side of a split value.
    pub fn pick<T: Copy>(self, split: &Split<T>) -> T {
        match self {
            Series::General => split.total,
            Series::Agriculture => split.agric,
            Series::NonAgriculture => split.non_agric,
        }
    }
}

/// Every report of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub summary: DatasetSummary,
    pub volume: VolumeReport,
    pub citations: CitationsReport,
    pub authors: RankingReport,
    pub sources: RankingReport,
    pub countries: RankingReport,
    pub country_citations: RankingReport,
    pub contributors: ContributorsReport,
}

impl Report {
    /// Builds every report from already enriched and filtered records.
    pub fn build(
        records: &[Publication],
        summary: DatasetSummary,
        config: &AnalysisConfig,
    ) -> Self {
        Self {
            volume: volume_per_year(records, summary.start_year),
            citations: citations_per_year(records),
            authors: top_authors(records, config.top_authors),
            sources: top_sources(records, config.top_sources, config.source_label_width),
            countries: top_countries(records, config.top_countries),
            country_citations: top_country_citations(records, config.top_countries),
            contributors: top_contributors(
                records,
                config.top_contributors,
                config.source_label_width,
            ),
            summary,
        }
    }
}

/// Enriches a loaded table, applies the start-year filter and builds all reports.
///
/// # Errors
///
/// Returns [`crate::AnalysisError::Config`] when the configured keyword list
/// is unusable.
pub fn analyze(table: LoadedTable, config: &AnalysisConfig) -> Result<Report> {
    let pipeline = config.pipeline()?;
    let enriched = pipeline.run(table.publications);
    let (records, summary) = summarize(
        enriched,
        table.dropped_missing_year,
        table.dropped_implausible_year,
        config.start_year,
    );
    Ok(Report::build(&records, summary, config))
}
