//! User supplied regular expression for narrowing registry tags

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::version::error::FilterError;

/// Tag filter backed by an optional regular expression.
///
/// Without a pattern every tag matches. With one, a tag matches when the
/// pattern is found anywhere in it; anchor with `^`/`$` to match whole tags.
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    pattern: Option<Regex>,
}

impl TagFilter {
    pub fn new(pattern: Option<&str>) -> Result<Self, FilterError> {
        let pattern = pattern
            .map(|p| {
                Regex::new(p).map_err(|source| FilterError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .transpose()?;

        Ok(Self { pattern })
    }

    pub fn matches(&self, tag: &str) -> bool {
        self.pattern.as_ref().is_none_or(|re| re.is_match(tag))
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }
}

impl FromStr for TagFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(Some(s))
    }
}

impl PartialEq for TagFilter {
    fn eq(&self, other: &Self) -> bool {
        self.pattern() == other.pattern()
    }
}

impl Eq for TagFilter {}

// Config files carry the pattern as a string or null; compile it on load
impl<'de> Deserialize<'de> for TagFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pattern = Option::<String>::deserialize(deserializer)?;
        Self::new(pattern.as_deref()).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pattern().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, "anything", true)]
    #[case(None, "", true)]
    #[case(Some(r"^v\d+\.\d+\.\d+$"), "v1.2.3", true)]
    #[case(Some(r"^v\d+\.\d+\.\d+$"), "v1.2.3-rc1", false)]
    #[case(Some(r"^v\d+\.\d+\.\d+$"), "latest", false)]
    #[case(Some("alpine"), "1.25-alpine3.19", true)] // unanchored search
    #[case(Some("alpine"), "1.25-bookworm", false)]
    fn matches_returns_expected(
        #[case] pattern: Option<&str>,
        #[case] tag: &str,
        #[case] expected: bool,
    ) {
        let filter = TagFilter::new(pattern).unwrap();
        assert_eq!(filter.matches(tag), expected);
    }

    #[test]
    fn new_rejects_invalid_pattern() {
        let result = TagFilter::new(Some("v(1"));

        assert!(matches!(
            result,
            Err(FilterError::InvalidPattern { ref pattern, .. }) if pattern == "v(1"
        ));
    }

    #[test]
    fn from_str_and_display_round_trip_the_pattern() {
        let filter: TagFilter = r"^\d+$".parse().unwrap();

        assert_eq!(filter.pattern(), Some(r"^\d+$"));
        assert_eq!(filter.to_string(), r"^\d+$");
        assert_eq!(TagFilter::default().to_string(), "");
    }

    #[rstest]
    #[case(serde_json::json!(null), None)]
    #[case(serde_json::json!(r"^v\d+"), Some(r"^v\d+"))]
    fn deserialize_compiles_pattern(
        #[case] value: serde_json::Value,
        #[case] expected: Option<&str>,
    ) {
        let filter: TagFilter = serde_json::from_value(value).unwrap();
        assert_eq!(filter.pattern(), expected);
    }

    #[test]
    fn deserialize_rejects_invalid_pattern() {
        let result = serde_json::from_value::<TagFilter>(serde_json::json!("v(1"));
        assert!(result.is_err());
    }
}
