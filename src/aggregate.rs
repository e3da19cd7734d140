//! Grouped bibliometric statistics.
//!
//! An [`Aggregator`] groups enriched publications by year, author, country
//! or source title and computes, for every group, publication counts,
//! citation sums and means and the H-index, each split into total,
//! agriculture and non-agriculture.
//!
//! Authors and countries are multi-valued: a record is fanned out to every
//! distinct value it carries and keeps its own classification in each
//! group. A record that lacks the grouping field, or (when citations are
//! required) a usable citation count, is left out and tallied in
//! [`Aggregation::ignored`].
//!
//! # Example
//!
//! ```
//! use agribib::aggregate::{Aggregator, GroupKey, Ranking};
//! use agribib::{Pipeline, Publication};
//!
//! let records = Pipeline::standard().run(vec![
//!     Publication {
//!         authors: Some("Smith J.; Doe A.".to_string()),
//!         title: Some("Smart agriculture sensing".to_string()),
//!         cited_by: Some(10),
//!         ..Default::default()
//!     },
//!     Publication {
//!         authors: Some("Smith J.".to_string()),
//!         title: Some("Edge computing".to_string()),
//!         cited_by: Some(3),
//!         ..Default::default()
//!     },
//! ]);
//!
//! let authors = Aggregator::new(GroupKey::Author).aggregate(&records);
//! let top = authors.top_n(Ranking::Publications, 1);
//! assert_eq!(top[0].key, "Smith J.");
//! assert_eq!(top[0].publications.total, 2);
//! assert_eq!(top[0].h_index.total, 2);
//! ```

use crate::stats::{h_index, mean};
use crate::{Category, CountrySet, Publication};
use compact_str::{CompactString, ToCompactString};
use either::Either;
use log::info;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Add;

/// Field used to form groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Year,
    Author,
    Country,
    Source,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GroupKey::Year => "year",
            GroupKey::Author => "author",
            GroupKey::Country => "country",
            GroupKey::Source => "source title",
        };
        f.write_str(name)
    }
}

/// A value split by research focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Split<T> {
    pub total: T,
    pub agric: T,
    pub non_agric: T,
}

impl<T: Copy> Split<T> {
    /// The value for one category.
    pub fn get(&self, category: Category) -> T {
        match category {
            Category::Agriculture => self.agric,
            Category::NonAgriculture => self.non_agric,
        }
    }
}

impl<T: Copy + Add<Output = T>> Split<T> {
    /// Builds a split whose total is the sum of both categories.
    pub fn from_parts(agric: T, non_agric: T) -> Self {
        Self {
            total: agric + non_agric,
            agric,
            non_agric,
        }
    }
}

impl Split<usize> {
    /// Counts one record of the given category.
    pub fn record(&mut self, category: Category) {
        self.total += 1;
        match category {
            Category::Agriculture => self.agric += 1,
            Category::NonAgriculture => self.non_agric += 1,
        }
    }
}

/// Statistics for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub key: CompactString,
    pub publications: Split<usize>,
    pub citations: Split<u64>,
    pub h_index: Split<u32>,
    pub mean_citations: Split<Option<f64>>,
}

impl GroupStats {
    /// Share of agriculture publications, in percent.
    pub fn agric_ratio(&self) -> f64 {
        percentage(self.publications.agric, self.publications.total)
    }

    /// Share of non-agriculture publications, in percent.
    pub fn non_agric_ratio(&self) -> f64 {
        percentage(self.publications.non_agric, self.publications.total)
    }

    /// Total citations divided by total publications.
    pub fn citations_per_publication(&self) -> f64 {
        if self.publications.total == 0 {
            0.0
        } else {
            self.citations.total as f64 / self.publications.total as f64
        }
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// How groups are ranked by [`Aggregation::top_n`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ranking {
    /// Total publication count
    Publications,
    /// Total citation count
    Citations,
    /// Publication count within one category; groups without any are skipped
    CategoryPublications(Category),
}

impl Ranking {
    fn score(self, group: &GroupStats) -> u64 {
        match self {
            Ranking::Publications => group.publications.total as u64,
            Ranking::Citations => group.citations.total,
            Ranking::CategoryPublications(category) => group.publications.get(category) as u64,
        }
    }
}

/// Result of one aggregation pass.
#[derive(Debug, Clone, Serialize)]
pub struct Aggregation {
    pub key: GroupKey,
    /// Groups in order of first appearance in the input
    pub groups: Vec<GroupStats>,
    /// Records left out for missing data, counted once per record
    pub ignored: Split<usize>,
}

impl Aggregation {
    /// The first `n` groups by `ranking`, ties kept in input order.
    pub fn top_n(&self, ranking: Ranking, n: usize) -> Vec<&GroupStats> {
        let mut ranked: Vec<&GroupStats> = self
            .groups
            .iter()
            .filter(|group| {
                !matches!(ranking, Ranking::CategoryPublications(_)) || ranking.score(group) > 0
            })
            .collect();
        ranked.sort_by(|a, b| ranking.score(b).cmp(&ranking.score(a)));
        ranked.truncate(n);
        ranked
    }

    /// Looks up a group by key.
    pub fn get(&self, key: &str) -> Option<&GroupStats> {
        self.groups.iter().find(|group| group.key == key)
    }

    /// Groups keyed by numeric year; only meaningful for [`GroupKey::Year`].
    pub fn by_year(&self) -> BTreeMap<i32, &GroupStats> {
        self.groups
            .iter()
            .filter_map(|group| group.key.parse::<i32>().ok().map(|year| (year, group)))
            .collect()
    }
}

/// Configuration options for an [`Aggregator`].
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Leave out records without a usable citation count.
    ///
    /// Disable for count-only analyses such as publication volume.
    pub require_citations: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            require_citations: true,
        }
    }
}

#[derive(Debug)]
struct GroupAccumulator {
    key: CompactString,
    publications: Split<usize>,
    agric_citations: Vec<u64>,
    non_agric_citations: Vec<u64>,
}

impl GroupAccumulator {
    fn new(key: CompactString) -> Self {
        Self {
            key,
            publications: Split::default(),
            agric_citations: Vec::new(),
            non_agric_citations: Vec::new(),
        }
    }

    fn add(&mut self, category: Category, cited_by: Option<u64>) {
        self.publications.record(category);
        if let Some(count) = cited_by {
            match category {
                Category::Agriculture => self.agric_citations.push(count),
                Category::NonAgriculture => self.non_agric_citations.push(count),
            }
        }
    }

    fn finish(self) -> GroupStats {
        let all: Vec<u64> = self
            .agric_citations
            .iter()
            .chain(&self.non_agric_citations)
            .copied()
            .collect();
        GroupStats {
            key: self.key,
            publications: self.publications,
            citations: Split::from_parts(
                self.agric_citations.iter().sum(),
                self.non_agric_citations.iter().sum(),
            ),
            h_index: Split {
                total: h_index(&all),
                agric: h_index(&self.agric_citations),
                non_agric: h_index(&self.non_agric_citations),
            },
            mean_citations: Split {
                total: mean(&all),
                agric: mean(&self.agric_citations),
                non_agric: mean(&self.non_agric_citations),
            },
        }
    }
}

/// Groups publications and computes per-group statistics.
#[derive(Debug, Clone)]
pub struct Aggregator {
    key: GroupKey,
    config: AggregatorConfig,
}

impl Aggregator {
    /// Creates an aggregator that requires citation counts.
    #[must_use]
    pub fn new(key: GroupKey) -> Self {
        Self {
            key,
            config: AggregatorConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: AggregatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Distinct values of the grouping field for one record.
    fn group_values(
        &self,
        record: &Publication,
    ) -> Either<std::option::IntoIter<CompactString>, std::vec::IntoIter<CompactString>> {
        match self.key {
            GroupKey::Year => Either::Left(Some(record.year.to_compact_string()).into_iter()),
            GroupKey::Source => Either::Left(
                record
                    .source_title
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(CompactString::from)
                    .into_iter(),
            ),
            GroupKey::Author => Either::Right(
                record
                    .author_names()
                    .into_iter()
                    .map(CompactString::from)
                    .collect::<Vec<_>>()
                    .into_iter(),
            ),
            GroupKey::Country => Either::Right(
                record
                    .countries()
                    .into_iter()
                    .flat_map(CountrySet::iter)
                    .map(CompactString::from)
                    .collect::<Vec<_>>()
                    .into_iter(),
            ),
        }
    }

    /// Aggregates the records.
    pub fn aggregate(&self, records: &[Publication]) -> Aggregation {
        let mut index: HashMap<CompactString, usize> = HashMap::new();
        let mut accumulators: Vec<GroupAccumulator> = Vec::new();
        let mut ignored = Split::default();

        for record in records {
            let category = record.category();
            if self.config.require_citations && record.cited_by.is_none() {
                ignored.record(category);
                continue;
            }
            let mut values = self.group_values(record).peekable();
            if values.peek().is_none() {
                ignored.record(category);
                continue;
            }
            for value in values {
                let slot = *index.entry(value.clone()).or_insert_with(|| {
                    accumulators.push(GroupAccumulator::new(value));
                    accumulators.len() - 1
                });
                accumulators[slot].add(category, record.cited_by);
            }
        }

        let groups: Vec<GroupStats> = accumulators
            .into_iter()
            .map(GroupAccumulator::finish)
            .collect();
        info!(
            "Aggregated {} records by {} into {} groups; \
             ignored due to missing data: {} agriculture, {} non-agriculture",
            records.len(),
            self.key,
            groups.len(),
            ignored.agric,
            ignored.non_agric
        );
        Aggregation {
            key: self.key,
            groups,
            ignored,
        }
    }
}
