use thiserror::Error;

/// A level-table violation found while building a registry
///
/// Raised before any record is accepted; the viewer refuses to start on an
/// inconsistent level configuration.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("level {level:?} is missing from the {table} table")]
    MissingLevel { table: &'static str, level: String },

    #[error("the {table} table names unknown level {level:?}")]
    UnknownLevel { table: &'static str, level: String },

    #[error("level {level:?} appears more than once")]
    DuplicateLevel { level: String },

    #[error("severity for level {level:?} must be a positive integer, got {value}")]
    SeverityOutOfRange { level: String, value: i64 },

    #[error("severity {value} is assigned to both {first:?} and {second:?}")]
    DuplicateSeverity {
        value: u32,
        first: String,
        second: String,
    },

    #[error("color for level {level:?} must have 3 or 4 components, got {count}")]
    ColorComponentCount { level: String, count: usize },

    #[error("{channel} channel for level {level:?} must be in 0..=255, got {value}")]
    ColorChannelOutOfRange {
        level: String,
        channel: &'static str,
        value: i64,
    },

    #[error("alpha for level {level:?} must be in 1..=100, got {value}")]
    AlphaOutOfRange { level: String, value: i64 },
}

/// A rejected filter pattern; the previously active filter is kept
#[derive(Debug, Error)]
#[error("invalid filter pattern {pattern:?}: {source}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// A level name the registry does not know
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown log level {name:?}")]
pub struct UnknownLevel {
    pub name: String,
}

/// A severity value no registered level maps to
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("no registered level for severity {severity}")]
pub struct UnknownSeverity {
    pub severity: u32,
}
