use super::Series;
use crate::Publication;
use crate::aggregate::{Aggregator, GroupKey, Split};
use crate::stats::find_peaks;
use crate::utils::{most_common, truncate_label};
use log::info;
use serde::Serialize;

const PAPERS_PER_PEAK: usize = 3;
const KEYWORDS_PER_PEAK: usize = 3;
const SOURCES_PER_PEAK: usize = 3;
const QUOTED_TITLE_WIDTH: usize = 100;

/// Citation figures for one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearCitations {
    pub year: i32,
    /// Mean citations per document; zero for a category without documents
    pub mean_citations: Split<f64>,
    /// Documents with a citation count
    pub documents: Split<usize>,
}

/// A highly cited paper quoted for a peak year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitedPaper {
    /// Title, cut to 100 characters
    pub title: String,
    /// First author, with "et al." when there are co-authors
    pub authors: String,
    pub cited_by: u64,
}

impl CitedPaper {
    fn quote(paper: &Publication) -> Self {
        let authors = match (paper.first_author(), paper.author_names().len()) {
            (None, _) => "Unknown Author".to_string(),
            (Some(first), 1) => first.to_string(),
            (Some(first), _) => format!("{first} et al."),
        };
        let title = paper.title.as_deref().unwrap_or_default();
        Self {
            title: truncate_label(title, QUOTED_TITLE_WIDTH),
            authors,
            cited_by: paper.cited_by.unwrap_or_default(),
        }
    }
}

/// What stood out in a year where mean citations peaked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakExplanation {
    pub series: Series,
    pub year: i32,
    pub mean_citations: f64,
    /// Cited documents of the series in that year
    pub candidates: usize,
    pub top_papers: Vec<CitedPaper>,
    pub trending_keywords: Vec<String>,
    pub top_sources: Vec<String>,
}

/// Mean citations per year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CitationsReport {
    /// Years with at least one cited-by value, ascending
    pub years: Vec<YearCitations>,
    /// Records without a citation count
    pub ignored: Split<usize>,
    pub peaks: Vec<PeakExplanation>,
}

impl CitationsReport {
    /// Mean citations of one series, in year order.
    pub fn means(&self, series: Series) -> Vec<f64> {
        self.years
            .iter()
            .map(|year| series.pick(&year.mean_citations))
            .collect()
    }
}

fn explain_peak(
    records: &[Publication],
    series: Series,
    year: i32,
    mean_citations: f64,
) -> PeakExplanation {
    let mut candidates: Vec<&Publication> = records
        .iter()
        .filter(|r| r.year == year && series.includes(r) && r.cited_by.is_some_and(|c| c > 0))
        .collect();
    candidates.sort_by(|a, b| b.cited_by.cmp(&a.cited_by));

    let top_papers = candidates
        .iter()
        .take(PAPERS_PER_PEAK)
        .map(|paper| CitedPaper::quote(paper))
        .collect();
    let trending_keywords = most_common(
        candidates.iter().flat_map(|r| r.keywords()),
        KEYWORDS_PER_PEAK,
    );
    let top_sources = most_common(
        candidates
            .iter()
            .filter_map(|r| r.source_title.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty()),
        SOURCES_PER_PEAK,
    );

    PeakExplanation {
        series,
        year,
        mean_citations,
        candidates: candidates.len(),
        top_papers,
        trending_keywords,
        top_sources,
    }
}

/// Computes mean citations per year and explains the local peaks of each series.
///
/// Records without a citation count are left out and counted as ignored.
pub fn citations_per_year(records: &[Publication]) -> CitationsReport {
    let aggregation = Aggregator::new(GroupKey::Year).aggregate(records);
    info!(
        "Ignored documents due to missing citation counts: \
         {} general, {} agriculture, {} non-agriculture",
        aggregation.ignored.total, aggregation.ignored.agric, aggregation.ignored.non_agric
    );

    let mut report = CitationsReport {
        years: aggregation
            .by_year()
            .into_iter()
            .map(|(year, group)| YearCitations {
                year,
                mean_citations: Split {
                    total: group.mean_citations.total.unwrap_or_default(),
                    agric: group.mean_citations.agric.unwrap_or_default(),
                    non_agric: group.mean_citations.non_agric.unwrap_or_default(),
                },
                documents: group.publications,
            })
            .collect(),
        ignored: aggregation.ignored,
        peaks: Vec::new(),
    };

    for series in Series::ALL {
        let means = report.means(series);
        for index in find_peaks(&means) {
            if means[index] <= 0.0 {
                continue;
            }
            let explanation = explain_peak(records, series, report.years[index].year, means[index]);
            info!(
                "Peak in {} citations in {} ({:.2} on average) among {} papers; \
                 topics: {}; sources: {}",
                series.label(),
                explanation.year,
                explanation.mean_citations,
                explanation.candidates,
                explanation.trending_keywords.join(", "),
                explanation.top_sources.join(", "),
            );
            for paper in &explanation.top_papers {
                info!(
                    "'{}' by {}, {} citations",
                    paper.title, paper.authors, paper.cited_by
                );
            }
            report.peaks.push(explanation);
        }
    }
    report
}
