use regex::Regex;

use crate::theory::TheoryError;

/// A set of label patterns for definitions that should not be checked.
/// In a pattern, '*' matches any run of characters and every other character is literal.
/// A pattern has to match the whole label.
#[derive(Clone, Debug, Default)]
pub struct ExclusionFilter {
    patterns: Vec<String>,
    regex: Option<Regex>,
}

impl ExclusionFilter {
    pub fn new(patterns: &[String]) -> Result<ExclusionFilter, TheoryError> {
        let patterns: Vec<String> = patterns
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if patterns.is_empty() {
            return Ok(ExclusionFilter::default());
        }
        let alternatives: Vec<String> = patterns
            .iter()
            .map(|pattern| {
                pattern
                    .split('*')
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(".*")
            })
            .collect();
        let source = format!("^(?:{})$", alternatives.join("|"));
        let regex = Regex::new(&source)
            .map_err(|e| TheoryError(format!("bad exclusion pattern: {}", e)))?;
        Ok(ExclusionFilter {
            patterns,
            regex: Some(regex),
        })
    }

    /// Parses a comma-separated list like "df-bi,df-cleq,*-ex".
    pub fn parse(list: &str) -> Result<ExclusionFilter, TheoryError> {
        let patterns: Vec<String> = list.split(',').map(|s| s.to_string()).collect();
        ExclusionFilter::new(&patterns)
    }

    pub fn is_excluded(&self, label: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(label),
            None => false,
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcards() {
        let filter = ExclusionFilter::parse("df-bi, df-cleq,*-ex,df-*x").unwrap();
        assert!(filter.is_excluded("df-bi"));
        assert!(filter.is_excluded("df-cleq"));
        assert!(filter.is_excluded("df-sb-ex"));
        assert!(filter.is_excluded("df-x"));
        assert!(filter.is_excluded("df-abcx"));
        assert!(!filter.is_excluded("df-bic"));
        assert!(!filter.is_excluded("xdf-bi"));
        assert!(!filter.is_excluded("df-exa"));
        assert_eq!(filter.patterns().len(), 4);
    }

    #[test]
    fn test_other_characters_are_literal() {
        let filter = ExclusionFilter::parse("df-a.b,df-(c)").unwrap();
        assert!(filter.is_excluded("df-a.b"));
        assert!(!filter.is_excluded("df-axb"));
        assert!(filter.is_excluded("df-(c)"));
    }

    #[test]
    fn test_empty_filter_excludes_nothing() {
        let filter = ExclusionFilter::parse("").unwrap();
        assert!(!filter.is_excluded("df-bi"));
        assert!(!ExclusionFilter::default().is_excluded(""));
    }
}
