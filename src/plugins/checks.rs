//! Set comparisons shared by the built-in verify steps

use std::collections::HashSet;

/// Values with no counterpart in `reference`, in their original order.
///
/// Repeated values are reported once per occurrence.
pub fn unmatched<'a>(values: &'a [String], reference: &[String]) -> Vec<&'a str> {
    let reference: HashSet<&str> = reference.iter().map(String::as_str).collect();
    values
        .iter()
        .map(String::as_str)
        .filter(|value| !reference.contains(value))
        .collect()
}

/// Formats one message per unmatched value
pub fn report_unmatched<F>(values: &[String], reference: &[String], message: F) -> Vec<String>
where
    F: Fn(&str) -> String,
{
    unmatched(values, reference).into_iter().map(message).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_unmatched_keeps_order_and_duplicates() {
        let values = strings(&["C", "A", "C", "B"]);
        let reference = strings(&["A"]);
        assert_eq!(unmatched(&values, &reference), vec!["C", "C", "B"]);
    }

    #[test]
    fn test_unmatched_against_empty_reference() {
        let values = strings(&["A"]);
        assert_eq!(unmatched(&values, &[]), vec!["A"]);
    }

    #[test]
    fn test_report_unmatched() {
        let values = strings(&["FOO", "BAR"]);
        let reference = strings(&["BAR"]);
        assert_eq!(
            report_unmatched(&values, &reference, |v| format!("{} missing", v)),
            vec!["FOO missing"]
        );
    }
}
