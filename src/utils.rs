use std::collections::HashMap;

/// Splits a semicolon separated export cell into trimmed, non-empty values
///
/// # Arguments
///
/// * `value` - Raw cell content such as `"Smith J.; Doe A."`
pub fn split_multi_value(value: &str) -> impl Iterator<Item = &str> {
    value.split(';').map(str::trim).filter(|s| !s.is_empty())
}

/// Coerces a numeric export cell to an integer.
///
/// Integers and integral floats (`"2019.0"`, as written by spreadsheet
/// tools) are accepted. Anything else, including fractional values, is
/// treated as missing.
pub fn coerce_integer(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(number) = value.parse::<i64>() {
        return Some(number);
    }
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() && number.fract() == 0.0 => {
            if number.abs() < i64::MAX as f64 {
                Some(number as i64)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Shortens a label to `max_chars` characters, appending `...` when cut
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() > max_chars {
        let mut short: String = label.chars().take(max_chars).collect();
        short.push_str("...");
        short
    } else {
        label.to_string()
    }
}

/// The `n` most frequent values, ties in order of first appearance
pub fn most_common<I, S>(values: I, n: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for value in values {
        let value = value.as_ref();
        match index.get(value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(value.to_string(), counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(n).map(|(value, _)| value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_split_multi_value() {
        let values: Vec<&str> = split_multi_value(" Smith J.;Doe A. ;; ").collect();
        assert_eq!(values, vec!["Smith J.", "Doe A."]);
        assert_eq!(split_multi_value("").count(), 0);
    }

    #[rstest]
    #[case("2019", Some(2019))]
    #[case(" 2019 ", Some(2019))]
    #[case("2019.0", Some(2019))]
    #[case("0", Some(0))]
    #[case("12.5", None)]
    #[case("n/a", None)]
    #[case("", None)]
    #[case("NaN", None)]
    #[case("inf", None)]
    fn test_coerce_integer(#[case] input: &str, #[case] expected: Option<i64>) {
        assert_eq!(coerce_integer(input), expected);
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Sensors", 50), "Sensors");
        assert_eq!(truncate_label("abcdef", 3), "abc...");
        assert_eq!(truncate_label("Ağ Teknolojileri", 2), "Ağ...");
    }

    #[test]
    fn test_most_common_keeps_first_seen_on_ties() {
        let values = ["iot", "lora", "drones", "lora", "iot", "edge"];
        assert_eq!(most_common(values, 3), vec!["iot", "lora", "drones"]);
        assert!(most_common(Vec::<String>::new(), 3).is_empty());
    }
}
