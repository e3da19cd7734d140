use super::Series;
use crate::Publication;
use crate::aggregate::{Aggregator, AggregatorConfig, GroupKey, Split};
use crate::stats::{TrendLine, average_growth_rate, linear_regression};
use log::info;
use serde::Serialize;

/// Publication counts for one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearVolume {
    pub year: i32,
    pub publications: Split<usize>,
}

/// Growth figures of one series over the timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SeriesTrend {
    pub publications: usize,
    /// Mean year-over-year change in percent, skipping years after a zero
    pub average_growth_rate: Option<f64>,
    /// First year with the highest count
    pub peak_year: Option<i32>,
    pub trend: Option<TrendLine>,
}

/// Publication volume per year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VolumeReport {
    /// Every year from the start year to the last year with a publication
    pub years: Vec<YearVolume>,
    pub totals: Split<usize>,
    pub trends: Split<SeriesTrend>,
}

impl VolumeReport {
    /// Counts of one series, in timeline order.
    pub fn counts(&self, series: Series) -> Vec<usize> {
        self.years
            .iter()
            .map(|year| series.pick(&year.publications))
            .collect()
    }

    fn series_trend(&self, series: Series) -> SeriesTrend {
        let counts = self.counts(series);
        let values: Vec<u64> = counts.iter().map(|&c| c as u64).collect();
        let xs: Vec<f64> = self.years.iter().map(|y| f64::from(y.year)).collect();
        let ys: Vec<f64> = counts.iter().map(|&c| c as f64).collect();

        let mut peak: Option<(i32, usize)> = None;
        for (year, &count) in self.years.iter().zip(&counts) {
            if peak.is_none_or(|(_, best)| count > best) {
                peak = Some((year.year, count));
            }
        }

        SeriesTrend {
            publications: counts.iter().sum(),
            average_growth_rate: average_growth_rate(&values),
            peak_year: peak.map(|(year, _)| year),
            trend: linear_regression(&xs, &ys),
        }
    }
}

/// Counts publications per year on a continuous, zero-filled timeline.
///
/// Records without citation counts are included.
pub fn volume_per_year(records: &[Publication], start_year: i32) -> VolumeReport {
    let aggregation = Aggregator::new(GroupKey::Year)
        .with_config(AggregatorConfig {
            require_citations: false,
        })
        .aggregate(records);
    let by_year = aggregation.by_year();

    let mut report = VolumeReport::default();
    let Some(&last_year) = by_year.keys().next_back() else {
        info!("No publications to count per year");
        return report;
    };
    let first_year = by_year
        .keys()
        .next()
        .map_or(start_year, |&first| first.min(start_year));

    report.years = (first_year..=last_year)
        .map(|year| YearVolume {
            year,
            publications: by_year
                .get(&year)
                .map(|group| group.publications)
                .unwrap_or_default(),
        })
        .collect();
    report.totals = Split::from_parts(
        report.counts(Series::Agriculture).iter().sum(),
        report.counts(Series::NonAgriculture).iter().sum(),
    );
    report.trends = Split {
        total: report.series_trend(Series::General),
        agric: report.series_trend(Series::Agriculture),
        non_agric: report.series_trend(Series::NonAgriculture),
    };

    for series in Series::ALL {
        let trend = series.pick(&report.trends);
        info!(
            "{} publications: {}, average annual growth rate: {}, peak year: {}",
            series.label(),
            trend.publications,
            trend
                .average_growth_rate
                .map_or_else(|| "n/a".to_string(), |rate| format!("{rate:.2}%")),
            trend
                .peak_year
                .map_or_else(|| "n/a".to_string(), |year| year.to_string()),
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Enrichment;
    use pretty_assertions::assert_eq;

    fn record(year: i32, agric: bool) -> Publication {
        Publication {
            year,
            enrichment: Enrichment {
                is_agriculture: Some(agric),
                countries: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_timeline_is_zero_filled() {
        let records = vec![
            record(2014, true),
            record(2016, false),
            record(2016, true),
            record(2016, true),
        ];
        let report = volume_per_year(&records, 2013);

        let years: Vec<i32> = report.years.iter().map(|y| y.year).collect();
        assert_eq!(years, vec![2013, 2014, 2015, 2016]);
        assert_eq!(report.counts(Series::General), vec![0, 1, 0, 3]);
        assert_eq!(report.counts(Series::Agriculture), vec![0, 1, 0, 2]);
        assert_eq!(report.totals, Split::from_parts(3, 1));
    }

    #[test]
    fn test_trends() {
        let records = vec![
            record(2012, true),
            record(2013, true),
            record(2013, true),
            record(2014, true),
            record(2014, true),
            record(2014, true),
            record(2014, true),
        ];
        let report = volume_per_year(&records, 2012);
        let agric = report.trends.agric;

        assert_eq!(agric.publications, 7);
        assert_eq!(agric.peak_year, Some(2014));
        // 1 -> 2 -> 4
        assert_eq!(agric.average_growth_rate, Some(100.0));
        let trend = agric.trend.unwrap();
        assert!((trend.slope - 1.5).abs() < 1e-9);

        assert_eq!(report.trends.non_agric.publications, 0);
        assert_eq!(report.trends.non_agric.average_growth_rate, None);
    }

    #[test]
    fn test_peak_year_prefers_earliest() {
        let records = vec![record(2013, false), record(2015, false)];
        let report = volume_per_year(&records, 2012);
        assert_eq!(report.trends.total.peak_year, Some(2013));
    }

    #[test]
    fn test_empty_input() {
        let report = volume_per_year(&[], 2012);
        assert!(report.years.is_empty());
        assert_eq!(report.trends.total.peak_year, None);
    }
}
