use crate::aggregate::{
    Aggregation, Aggregator, AggregatorConfig, GroupKey, GroupStats, Ranking, Split,
};
use crate::utils::truncate_label;
use crate::{Category, Publication};
use log::info;
use serde::Serialize;

/// One row of a ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// Display label; source titles may be shortened
    pub label: String,
    pub agric_ratio: f64,
    pub non_agric_ratio: f64,
    pub citations_per_publication: f64,
    #[serde(flatten)]
    pub stats: GroupStats,
}

impl RankedEntry {
    fn new(stats: &GroupStats, label_width: Option<usize>) -> Self {
        Self {
            label: match label_width {
                Some(width) => truncate_label(&stats.key, width),
                None => stats.key.to_string(),
            },
            agric_ratio: stats.agric_ratio(),
            non_agric_ratio: stats.non_agric_ratio(),
            citations_per_publication: stats.citations_per_publication(),
            stats: stats.clone(),
        }
    }
}

/// Top groups of one aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingReport {
    pub key: GroupKey,
    pub ranking: Ranking,
    pub entries: Vec<RankedEntry>,
    pub ignored: Split<usize>,
}

fn rank(
    aggregation: &Aggregation,
    ranking: Ranking,
    n: usize,
    label_width: Option<usize>,
) -> RankingReport {
    let entries: Vec<RankedEntry> = aggregation
        .top_n(ranking, n)
        .into_iter()
        .map(|stats| RankedEntry::new(stats, label_width))
        .collect();
    for (position, entry) in entries.iter().enumerate() {
        info!(
            "{:>2}. {}: {} publications ({} agriculture, {} non-agriculture), \
             {} citations, h-index {} ({} / {})",
            position + 1,
            entry.label,
            entry.stats.publications.total,
            entry.stats.publications.agric,
            entry.stats.publications.non_agric,
            entry.stats.citations.total,
            entry.stats.h_index.total,
            entry.stats.h_index.agric,
            entry.stats.h_index.non_agric,
        );
    }
    RankingReport {
        key: aggregation.key,
        ranking,
        entries,
        ignored: aggregation.ignored,
    }
}

/// Most prolific authors with their H-indices.
pub fn top_authors(records: &[Publication], n: usize) -> RankingReport {
    info!("Top {n} authors by publications");
    let aggregation = Aggregator::new(GroupKey::Author).aggregate(records);
    rank(&aggregation, Ranking::Publications, n, None)
}

/// Most frequent source titles, labels cut to `label_width` characters.
pub fn top_sources(records: &[Publication], n: usize, label_width: usize) -> RankingReport {
    info!("Top {n} sources by publications");
    let aggregation = Aggregator::new(GroupKey::Source).aggregate(records);
    rank(&aggregation, Ranking::Publications, n, Some(label_width))
}

/// Countries with the most publications, with agriculture shares.
pub fn top_countries(records: &[Publication], n: usize) -> RankingReport {
    info!("Top {n} countries by publications");
    let aggregation = Aggregator::new(GroupKey::Country).aggregate(records);
    rank(&aggregation, Ranking::Publications, n, None)
}

/// Countries with the most citations.
pub fn top_country_citations(records: &[Publication], n: usize) -> RankingReport {
    info!("Top {n} countries by citations");
    let aggregation = Aggregator::new(GroupKey::Country).aggregate(records);
    rank(&aggregation, Ranking::Citations, n, None)
}

/// Top groups within one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributorSection {
    pub key: GroupKey,
    pub category: Category,
    /// `(label, publications in this category)`, highest first
    pub entries: Vec<(String, usize)>,
}

/// Leading countries, authors and sources among agriculture and among
/// non-agriculture publications.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContributorsReport {
    pub sections: Vec<ContributorSection>,
    /// Records without the grouping field, per key
    pub ignored: Vec<(GroupKey, Split<usize>)>,
}

impl ContributorsReport {
    pub fn section(&self, key: GroupKey, category: Category) -> Option<&ContributorSection> {
        self.sections
            .iter()
            .find(|section| section.key == key && section.category == category)
    }
}

/// Counts publications only, so records without citations are kept.
pub fn top_contributors(
    records: &[Publication],
    n: usize,
    label_width: usize,
) -> ContributorsReport {
    let mut report = ContributorsReport::default();
    for key in [GroupKey::Country, GroupKey::Author, GroupKey::Source] {
        let aggregation = Aggregator::new(key)
            .with_config(AggregatorConfig {
                require_citations: false,
            })
            .aggregate(records);
        for category in [Category::Agriculture, Category::NonAgriculture] {
            let entries: Vec<(String, usize)> = aggregation
                .top_n(Ranking::CategoryPublications(category), n)
                .into_iter()
                .map(|stats| {
                    let label = match key {
                        GroupKey::Source => truncate_label(&stats.key, label_width),
                        _ => stats.key.to_string(),
                    };
                    (label, stats.publications.get(category))
                })
                .collect();
            info!(
                "Top {} {key} contributors in {}: {}",
                entries.len(),
                category.label(),
                entries
                    .iter()
                    .map(|(label, count)| format!("{label} ({count})"))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            report.sections.push(ContributorSection {
                key,
                category,
                entries,
            });
        }
        info!(
            "Ignored {key} records due to missing data: {} agriculture, {} non-agriculture",
            aggregation.ignored.agric, aggregation.ignored.non_agric
        );
        report.ignored.push((key, aggregation.ignored));
    }
    report
}
