use std::collections::HashSet;

use regex::Regex;

use crate::error::PatternError;

/// Compiled visibility filter: a regex over display text plus the set of
/// severities still enabled
///
/// Replaced wholesale on every accepted edit; a failed compile leaves the
/// previous value in place.
#[derive(Clone)]
pub struct FilterState {
    /// Compiled pattern; None matches everything
    regex: Option<Regex>,

    /// Original pattern string
    pattern: String,

    /// Severities whose records stay visible
    active_severities: HashSet<u32>,
}

impl FilterState {
    /// Compile a new filter from a pattern and an active severity set
    pub fn new(pattern: &str, active_severities: HashSet<u32>) -> Result<Self, PatternError> {
        let regex = if pattern.is_empty() {
            None
        } else {
            Some(Regex::new(pattern).map_err(|source| PatternError {
                pattern: pattern.to_string(),
                source,
            })?)
        };

        Ok(Self {
            regex,
            pattern: pattern.to_string(),
            active_severities,
        })
    }

    /// A filter with no pattern over the given severity set
    pub fn match_all(active_severities: HashSet<u32>) -> Self {
        Self {
            regex: None,
            pattern: String::new(),
            active_severities,
        }
    }

    /// A new state with a different pattern and the same severity set
    pub fn with_pattern(&self, pattern: &str) -> Result<Self, PatternError> {
        Self::new(pattern, self.active_severities.clone())
    }

    /// A new state with one severity toggled
    pub fn with_severity(&self, severity: u32, enabled: bool) -> Self {
        let mut next = self.clone();
        if enabled {
            next.active_severities.insert(severity);
        } else {
            next.active_severities.remove(&severity);
        }
        next
    }

    /// Whether a record with this display text and severity is visible
    pub fn matches(&self, text: &str, severity: u32) -> bool {
        if !self.active_severities.contains(&severity) {
            return false;
        }
        match &self.regex {
            Some(re) => re.is_match(text),
            None => true,
        }
    }

    /// Get the original pattern
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check if filter has a text pattern
    pub fn has_pattern(&self) -> bool {
        self.regex.is_some()
    }

    pub fn active_severities(&self) -> &HashSet<u32> {
        &self.active_severities
    }

    pub fn is_severity_active(&self, severity: u32) -> bool {
        self.active_severities.contains(&severity)
    }
}

impl std::fmt::Debug for FilterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterState")
            .field("pattern", &self.pattern)
            .field("active_severities", &self.active_severities)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_levels() -> HashSet<u32> {
        HashSet::from([10, 20, 30, 40, 50])
    }

    #[test]
    fn test_empty_pattern_matches_everything() {
        let filter = FilterState::new("", all_levels()).unwrap();
        assert!(!filter.has_pattern());
        assert!(filter.matches("anything at all", 20));
    }

    #[test]
    fn test_pattern_and_severity_must_both_match() {
        let filter = FilterState::new("fail", HashSet::from([30, 40])).unwrap();
        assert!(filter.matches("fail now", 30));
        assert!(!filter.matches("ok", 20));
        assert!(filter.matches("total failure", 40));
        assert!(!filter.matches("fail now", 20));
        assert!(!filter.matches("all good", 30));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = FilterState::new("(unclosed", all_levels()).unwrap_err();
        assert_eq!(err.pattern, "(unclosed");
    }

    #[test]
    fn test_with_severity_toggles() {
        let filter = FilterState::new("", all_levels()).unwrap();
        let filter = filter.with_severity(20, false);
        assert!(!filter.is_severity_active(20));
        let filter = filter.with_severity(20, true);
        assert!(filter.is_severity_active(20));
    }

    #[test]
    fn test_with_pattern_keeps_severities() {
        let filter = FilterState::new("", HashSet::from([40])).unwrap();
        let filter = filter.with_pattern("^err").unwrap();
        assert_eq!(filter.pattern(), "^err");
        assert!(filter.matches("error: disk full", 40));
        assert!(!filter.matches("error: disk full", 20));
    }
}
