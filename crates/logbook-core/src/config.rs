use std::collections::BTreeMap;

use serde::Deserialize;

use logbook_types::ColorMode;

use crate::error::ConfigError;
use crate::intake::DEFAULT_QUEUE_CAPACITY;
use crate::registry::{self, LevelRegistry};

/// Viewer configuration, typically loaded from a TOML file
///
/// The level tables default to the built-in five levels; `validate` turns
/// them into a registry or reports the first violation.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LogbookConfig {
    /// Level names in display order
    pub levels: Vec<String>,

    /// Level name to numeric severity
    pub severities: BTreeMap<String, i64>,

    /// Level name to color components, [r, g, b] or [r, g, b, alpha percent]
    pub colors: BTreeMap<String, Vec<i64>>,

    /// Filter pattern applied before the first edit
    pub initial_filter_pattern: String,

    /// How visible records are colorized
    pub color_mode: ColorMode,

    /// Render messages raw instead of through the formatter
    pub ignore_formatter: bool,

    /// Force contrasting text in background tint mode
    pub readable_text: bool,

    /// Pending-queue bound; 0 means unbounded
    pub queue_capacity: usize,
}

impl Default for LogbookConfig {
    fn default() -> Self {
        Self {
            levels: registry::default_levels(),
            severities: registry::default_severities(),
            colors: registry::default_colors(),
            initial_filter_pattern: String::new(),
            color_mode: ColorMode::Disabled,
            ignore_formatter: false,
            readable_text: false,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl LogbookConfig {
    /// Validate the level tables into a registry
    pub fn validate(&self) -> Result<LevelRegistry, ConfigError> {
        LevelRegistry::from_tables(self.levels.clone(), &self.severities, &self.colors)
    }
}
