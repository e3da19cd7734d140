//! Small numeric routines shared by the reports.

use serde::Serialize;

/// Calculates the H-index of a list of citation counts.
///
/// The H-index is the largest `h` such that at least `h` values are `>= h`.
/// Counts are sorted in descending order and scanned, incrementing while the
/// current count is at least one more than the running index.
///
/// # Examples
///
/// ```
/// use agribib::stats::h_index;
///
/// assert_eq!(h_index(&[10, 8, 5, 4, 3]), 4);
/// assert_eq!(h_index(&[0, 0, 0]), 0);
/// assert_eq!(h_index(&[]), 0);
/// ```
pub fn h_index(citations: &[u64]) -> u32 {
    let mut sorted = citations.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    let mut h = 0u32;
    for citation in sorted {
        if citation > u64::from(h) {
            h += 1;
        } else {
            break;
        }
    }
    h
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[u64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64)
    }
}

/// Least-squares line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    /// Value of the line at `x`.
    pub fn at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fits a least-squares line through the points.
///
/// Returns `None` for fewer than two points or when every `x` is equal.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Option<TrendLine> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        sxy += (x - mean_x) * (y - mean_y);
        sxx += (x - mean_x) * (x - mean_x);
    }
    if sxx == 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    Some(TrendLine {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Year-over-year percentage changes; `None` where the previous value is zero.
pub fn percentage_changes(values: &[u64]) -> Vec<Option<f64>> {
    values
        .windows(2)
        .map(|w| {
            if w[0] == 0 {
                None
            } else {
                Some((w[1] as f64 - w[0] as f64) / w[0] as f64 * 100.0)
            }
        })
        .collect()
}

/// Mean of the defined percentage changes.
pub fn average_growth_rate(values: &[u64]) -> Option<f64> {
    let defined: Vec<f64> = percentage_changes(values).into_iter().flatten().collect();
    if defined.is_empty() {
        None
    } else {
        Some(defined.iter().sum::<f64>() / defined.len() as f64)
    }
}

/// Finds local maxima.
///
/// A peak is a value strictly greater than its left neighbour and strictly
/// greater than the first differing value to its right. Flat peaks report
/// the middle index of the plateau (rounded down). The first and last
/// samples are never peaks.
pub fn find_peaks(values: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if values.len() < 3 {
        return peaks;
    }
    let last = values.len() - 1;
    let mut i = 1;
    while i < last {
        if values[i - 1] < values[i] {
            let mut ahead = i + 1;
            while ahead < last && values[ahead] == values[i] {
                ahead += 1;
            }
            if values[ahead] < values[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
                continue;
            }
        }
        i += 1;
    }
    peaks
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(&[10, 8, 5, 4, 3], 4)]
    #[case(&[3, 4, 5, 8, 10], 4)]
    #[case(&[0, 0, 0], 0)]
    #[case(&[], 0)]
    #[case(&[1], 1)]
    #[case(&[100], 1)]
    #[case(&[25, 8, 5, 3, 3], 3)]
    #[case(&[6, 6, 6, 6, 6, 6], 6)]
    fn test_h_index(#[case] citations: &[u64], #[case] expected: u32) {
        assert_eq!(h_index(citations), expected);
    }

    #[test]
    fn test_h_index_definition_holds() {
        let citations = [9, 7, 6, 2, 1, 0, 14, 3];
        let h = h_index(&citations) as u64;
        assert!(citations.iter().filter(|&&c| c >= h).count() as u64 >= h);
        assert!((citations.iter().filter(|&&c| c > h).count() as u64) < h + 1);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1, 2, 3, 6]), Some(3.0));
    }

    #[test]
    fn test_linear_regression_recovers_line() {
        let xs = [2012.0, 2013.0, 2014.0, 2015.0];
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x - 6000.0).collect();
        let line = linear_regression(&xs, &ys).unwrap();
        assert!((line.slope - 3.0).abs() < 1e-9);
        assert!((line.at(2014.0) - ys[2]).abs() < 1e-6);
    }

    #[test]
    fn test_linear_regression_degenerate() {
        assert_eq!(linear_regression(&[1.0], &[2.0]), None);
        assert_eq!(linear_regression(&[1.0, 1.0], &[2.0, 3.0]), None);
    }

    #[test]
    fn test_growth_rates() {
        assert_eq!(
            percentage_changes(&[10, 20, 0, 5]),
            vec![Some(100.0), Some(-100.0), None]
        );
        assert_eq!(average_growth_rate(&[10, 20, 10]), Some(25.0));
        assert_eq!(average_growth_rate(&[0, 0]), None);
        assert_eq!(average_growth_rate(&[7]), None);
    }

    #[rstest]
    #[case(&[], &[])]
    #[case(&[1.0, 2.0], &[])]
    #[case(&[1.0, 3.0, 2.0], &[1])]
    #[case(&[0.0, 2.0, 1.0, 4.0, 3.0], &[1, 3])]
    #[case(&[1.0, 3.0, 3.0, 3.0, 1.0], &[2])]
    #[case(&[1.0, 3.0, 3.0, 1.0], &[1])]
    #[case(&[1.0, 3.0, 3.0, 4.0, 1.0], &[3])]
    #[case(&[5.0, 3.0, 4.0], &[])]
    #[case(&[1.0, 2.0, 3.0], &[])]
    fn test_find_peaks(#[case] values: &[f64], #[case] expected: &[usize]) {
        assert_eq!(find_peaks(values), expected);
    }
}
