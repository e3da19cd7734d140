use crate::Publication;
use crate::aggregate::Split;
use log::info;
use serde::Serialize;

/// Record counts before and after filtering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub start_year: i32,
    /// Records with a usable year, before the start-year filter
    pub loaded: Split<usize>,
    /// Records kept for analysis
    pub analysed: Split<usize>,
    /// Rows the loader dropped for a missing year
    pub dropped_missing_year: usize,
    /// Rows the loader dropped for a year outside the accepted range
    pub dropped_implausible_year: usize,
    /// Records published before `start_year`
    pub dropped_before_start: usize,
    /// Analysed records whose affiliations named no known country
    pub unresolved_affiliations: usize,
}

fn count_categories(records: &[Publication]) -> Split<usize> {
    let mut counts = Split::default();
    for record in records {
        counts.record(record.category());
    }
    counts
}

/// Drops records published before `start_year` and summarizes the table.
///
/// Records must already be classified for the category counts to mean
/// anything.
pub fn summarize(
    records: Vec<Publication>,
    dropped_missing_year: usize,
    dropped_implausible_year: usize,
    start_year: i32,
) -> (Vec<Publication>, DatasetSummary) {
    let loaded = count_categories(&records);
    let kept: Vec<Publication> = records
        .into_iter()
        .filter(|record| record.year >= start_year)
        .collect();
    let analysed = count_categories(&kept);
    let unresolved_affiliations = kept
        .iter()
        .filter(|record| record.countries().is_some_and(|c| c.is_empty()))
        .count();

    let summary = DatasetSummary {
        start_year,
        loaded,
        analysed,
        dropped_missing_year,
        dropped_implausible_year,
        dropped_before_start: loaded.total - analysed.total,
        unresolved_affiliations,
    };
    info!(
        "Loaded {} publications ({} agriculture, {} non-agriculture); \
         {dropped_missing_year} dropped for missing year, \
         {dropped_implausible_year} for implausible year",
        loaded.total, loaded.agric, loaded.non_agric
    );
    info!(
        "Analysing {} publications from {start_year} on ({} agriculture, {} non-agriculture); \
         {} earlier ones left out",
        analysed.total, analysed.agric, analysed.non_agric, summary.dropped_before_start
    );
    info!("Affiliations without a resolved country: {unresolved_affiliations}");
    (kept, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CountrySet, Enrichment};
    use pretty_assertions::assert_eq;

    fn record(year: i32, agric: bool, countries: &[&str]) -> Publication {
        Publication {
            year,
            enrichment: Enrichment {
                is_agriculture: Some(agric),
                countries: Some(countries.iter().copied().collect::<CountrySet>()),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_summarize_filters_by_start_year() {
        let records = vec![
            record(2010, true, &["Kenya"]),
            record(2012, true, &[]),
            record(2015, false, &["Ghana"]),
            record(2011, false, &[]),
        ];
        let (kept, summary) = summarize(records, 2, 1, 2012);

        let years: Vec<i32> = kept.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2012, 2015]);
        assert_eq!(
            summary,
            DatasetSummary {
                start_year: 2012,
                loaded: Split::from_parts(2, 2),
                analysed: Split::from_parts(1, 1),
                dropped_missing_year: 2,
                dropped_implausible_year: 1,
                dropped_before_start: 2,
                unresolved_affiliations: 1,
            }
        );
    }

    #[test]
    fn test_summarize_empty() {
        let (kept, summary) = summarize(Vec::new(), 0, 0, 2012);
        assert!(kept.is_empty());
        assert_eq!(summary.analysed.total, 0);
    }
}
