//! Line-oriented regex extraction

use super::{ExtractError, Extractor};
use crate::pipeline::ResultSet;
use async_trait::async_trait;
use regex::Regex;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Scans a file line by line, testing every line against every field pattern.
///
/// Capture group 1 of a matching pattern is appended to that field. Every
/// declared field is present in the result, possibly empty.
#[derive(Debug, Clone, Default)]
pub struct LinePatternExtractor {
    patterns: Vec<(String, Regex)>,
}

impl LinePatternExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pattern(mut self, field: impl Into<String>, pattern: Regex) -> Self {
        self.patterns.push((field.into(), pattern));
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(field, _)| field.as_str())
    }

    pub fn extract_from_str(&self, content: &str) -> ResultSet {
        let mut results = self.empty_result_set();
        for line in content.lines() {
            self.scan_line(line, &mut results);
        }
        results
    }

    fn empty_result_set(&self) -> ResultSet {
        self.patterns
            .iter()
            .map(|(field, _)| (field.clone(), Vec::new()))
            .collect()
    }

    fn scan_line(&self, line: &str, results: &mut ResultSet) {
        for (field, pattern) in &self.patterns {
            if let Some(value) = pattern.captures(line).and_then(|c| c.get(1)) {
                results
                    .entry(field.clone())
                    .or_default()
                    .push(value.as_str().to_string());
            }
        }
    }
}

#[async_trait]
impl<C: Sync> Extractor<C> for LinePatternExtractor {
    async fn extract(&self, file: File, _config: &C) -> Result<ResultSet, ExtractError> {
        let mut results = self.empty_result_set();
        let mut lines = BufReader::new(file).lines();
        while let Some(line) = lines.next_line().await? {
            self.scan_line(&line, &mut results);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn env_extractor() -> LinePatternExtractor {
        LinePatternExtractor::new()
            .with_pattern("envVars", Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*=\s*\S").unwrap())
    }

    #[test]
    fn test_every_field_is_present() {
        let extractor = env_extractor().with_pattern("other", Regex::new(r"other: (\S+)").unwrap());
        let results = extractor.extract_from_str("");

        assert_eq!(results.len(), 2);
        assert!(results["envVars"].is_empty());
        assert!(results["other"].is_empty());
    }

    #[test]
    fn test_one_line_can_feed_several_fields() {
        let extractor = LinePatternExtractor::new()
            .with_pattern("params", Regex::new(r#"- objectName: "(\S*)""#).unwrap())
            .with_pattern("names", Regex::new(r"objectName: (\S*)").unwrap());

        let results = extractor.extract_from_str(r#"  - objectName: "/app/db""#);

        assert_eq!(results["params"], vec!["/app/db"]);
        assert_eq!(results["names"], vec![r#""/app/db""#]);
    }

    #[test]
    fn test_field_names_in_declaration_order() {
        let extractor = env_extractor().with_pattern("b", Regex::new("(b)").unwrap());
        assert_eq!(extractor.field_names().collect::<Vec<_>>(), vec!["envVars", "b"]);
    }

    #[tokio::test]
    async fn test_extract_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env");
        fs::write(&path, "FOO=bar\n\n# comment\nBAZ = qux\n").unwrap();

        let file = File::open(&path).await.unwrap();
        let results = env_extractor().extract(file, &()).await.unwrap();

        assert_eq!(results["envVars"], vec!["FOO", "BAZ"]);
    }
}
