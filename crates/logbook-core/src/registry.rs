use std::collections::{BTreeMap, HashMap, HashSet};

use logbook_types::Rgba;

use crate::error::{ConfigError, UnknownLevel, UnknownSeverity};

/// Validated mapping between level names, severities, and display colors
///
/// Construction is the only place level configuration is checked; a value of
/// this type always holds three mutually consistent tables. Shared behind an
/// `Arc` between the viewer and any handler feeding it.
#[derive(Clone, Debug)]
pub struct LevelRegistry {
    /// Level names in configured order
    levels: Vec<String>,

    /// Name -> severity
    severities: HashMap<String, u32>,

    /// Severity -> color
    colors: HashMap<u32, Rgba>,

    /// Severity -> name
    names: HashMap<u32, String>,
}

impl LevelRegistry {
    /// Validate the three level tables and build a registry from them
    ///
    /// The level list and both table key sets must be exactly equal.
    /// Severities must be positive and unique, colors must have 3 or 4
    /// components with channels in 0..=255 and alpha in 1..=100 percent.
    pub fn from_tables(
        levels: Vec<String>,
        severities: &BTreeMap<String, i64>,
        colors: &BTreeMap<String, Vec<i64>>,
    ) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for level in &levels {
            if !seen.insert(level.as_str()) {
                return Err(ConfigError::DuplicateLevel {
                    level: level.clone(),
                });
            }
        }

        for level in &levels {
            if !severities.contains_key(level) {
                return Err(ConfigError::MissingLevel {
                    table: "severities",
                    level: level.clone(),
                });
            }
            if !colors.contains_key(level) {
                return Err(ConfigError::MissingLevel {
                    table: "colors",
                    level: level.clone(),
                });
            }
        }
        for name in severities.keys() {
            if !seen.contains(name.as_str()) {
                return Err(ConfigError::UnknownLevel {
                    table: "severities",
                    level: name.clone(),
                });
            }
        }
        for name in colors.keys() {
            if !seen.contains(name.as_str()) {
                return Err(ConfigError::UnknownLevel {
                    table: "colors",
                    level: name.clone(),
                });
            }
        }

        let mut severity_map = HashMap::with_capacity(levels.len());
        let mut name_map: HashMap<u32, String> = HashMap::with_capacity(levels.len());
        for level in &levels {
            let raw = severities[level];
            let value = u32::try_from(raw)
                .ok()
                .filter(|v| *v >= 1)
                .ok_or_else(|| ConfigError::SeverityOutOfRange {
                    level: level.clone(),
                    value: raw,
                })?;
            if let Some(first) = name_map.get(&value) {
                return Err(ConfigError::DuplicateSeverity {
                    value,
                    first: first.clone(),
                    second: level.clone(),
                });
            }
            name_map.insert(value, level.clone());
            severity_map.insert(level.clone(), value);
        }

        let mut color_map = HashMap::with_capacity(levels.len());
        for level in &levels {
            let rgba = parse_color(level, &colors[level])?;
            color_map.insert(severity_map[level], rgba);
        }

        Ok(Self {
            levels,
            severities: severity_map,
            colors: color_map,
            names: name_map,
        })
    }

    /// Numeric severity for a level name
    pub fn severity_of(&self, name: &str) -> Result<u32, UnknownLevel> {
        self.severities
            .get(name)
            .copied()
            .ok_or_else(|| UnknownLevel {
                name: name.to_string(),
            })
    }

    /// Display color for a severity value
    pub fn color_of(&self, severity: u32) -> Result<Rgba, UnknownSeverity> {
        self.colors
            .get(&severity)
            .copied()
            .ok_or(UnknownSeverity { severity })
    }

    /// Level name for a severity value
    pub fn level_name(&self, severity: u32) -> Result<&str, UnknownSeverity> {
        self.names
            .get(&severity)
            .map(String::as_str)
            .ok_or(UnknownSeverity { severity })
    }

    /// Whether a level name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.severities.contains_key(name)
    }

    /// Level names in configured order
    pub fn levels(&self) -> impl Iterator<Item = &str> + '_ {
        self.levels.iter().map(String::as_str)
    }

    /// Every registered severity value, in level order
    pub fn severity_values(&self) -> impl Iterator<Item = u32> + '_ {
        self.levels.iter().map(|name| self.severities[name])
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for LevelRegistry {
    fn default() -> Self {
        Self::from_tables(default_levels(), &default_severities(), &default_colors())
            .expect("built-in level tables are valid")
    }
}

fn parse_color(level: &str, components: &[i64]) -> Result<Rgba, ConfigError> {
    if components.len() != 3 && components.len() != 4 {
        return Err(ConfigError::ColorComponentCount {
            level: level.to_string(),
            count: components.len(),
        });
    }

    let mut rgb = [0u8; 3];
    for (i, channel) in ["red", "green", "blue"].into_iter().enumerate() {
        rgb[i] =
            u8::try_from(components[i]).map_err(|_| ConfigError::ColorChannelOutOfRange {
                level: level.to_string(),
                channel,
                value: components[i],
            })?;
    }

    let alpha = match components.get(3) {
        Some(&raw) => u8::try_from(raw)
            .ok()
            .filter(|a| (1..=100).contains(a))
            .ok_or_else(|| ConfigError::AlphaOutOfRange {
                level: level.to_string(),
                value: raw,
            })?,
        None => 100,
    };

    Ok(Rgba::new(rgb[0], rgb[1], rgb[2], alpha))
}

/// Built-in level list, lowest severity first
pub(crate) fn default_levels() -> Vec<String> {
    ["debug", "info", "warning", "error", "critical"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Built-in name -> severity table
pub(crate) fn default_severities() -> BTreeMap<String, i64> {
    BTreeMap::from([
        ("debug".to_string(), 10),
        ("info".to_string(), 20),
        ("warning".to_string(), 30),
        ("error".to_string(), 40),
        ("critical".to_string(), 50),
    ])
}

/// Built-in name -> color table
pub(crate) fn default_colors() -> BTreeMap<String, Vec<i64>> {
    BTreeMap::from([
        ("debug".to_string(), vec![255, 255, 255, 100]),
        ("info".to_string(), vec![204, 236, 242, 100]),
        ("warning".to_string(), vec![152, 210, 217, 100]),
        ("error".to_string(), vec![223, 57, 57, 100]),
        ("critical".to_string(), vec![182, 60, 66, 100]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = LevelRegistry::default();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.severity_of("warning").unwrap(), 30);
        assert_eq!(registry.level_name(50).unwrap(), "critical");
        assert_eq!(registry.color_of(40).unwrap(), Rgba::new(223, 57, 57, 100));
        let values: Vec<u32> = registry.severity_values().collect();
        assert_eq!(values, vec![10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_missing_severity_entry() {
        let mut severities = default_severities();
        severities.remove("info");
        let err =
            LevelRegistry::from_tables(default_levels(), &severities, &default_colors())
                .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingLevel {
                table: "severities",
                level: "info".to_string()
            }
        );
    }

    #[test]
    fn test_extra_color_entry() {
        let mut colors = default_colors();
        colors.insert("verbose".to_string(), vec![1, 2, 3]);
        let err =
            LevelRegistry::from_tables(default_levels(), &default_severities(), &colors)
                .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownLevel {
                table: "colors",
                level: "verbose".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_level_name() {
        let mut levels = default_levels();
        levels.push("debug".to_string());
        let err =
            LevelRegistry::from_tables(levels, &default_severities(), &default_colors())
                .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateLevel { .. }));
    }

    #[test]
    fn test_zero_severity_rejected() {
        let mut severities = default_severities();
        severities.insert("debug".to_string(), 0);
        let err =
            LevelRegistry::from_tables(default_levels(), &severities, &default_colors())
                .unwrap_err();
        assert_eq!(
            err,
            ConfigError::SeverityOutOfRange {
                level: "debug".to_string(),
                value: 0
            }
        );
    }

    #[test]
    fn test_negative_severity_rejected() {
        let mut severities = default_severities();
        severities.insert("error".to_string(), -40);
        let err =
            LevelRegistry::from_tables(default_levels(), &severities, &default_colors())
                .unwrap_err();
        assert!(matches!(err, ConfigError::SeverityOutOfRange { .. }));
    }

    #[test]
    fn test_duplicate_severity_rejected() {
        let mut severities = default_severities();
        severities.insert("critical".to_string(), 40);
        let err =
            LevelRegistry::from_tables(default_levels(), &severities, &default_colors())
                .unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateSeverity {
                value: 40,
                first: "error".to_string(),
                second: "critical".to_string()
            }
        );
    }

    #[test]
    fn test_color_component_count() {
        let mut colors = default_colors();
        colors.insert("info".to_string(), vec![1, 2]);
        let err =
            LevelRegistry::from_tables(default_levels(), &default_severities(), &colors)
                .unwrap_err();
        assert_eq!(
            err,
            ConfigError::ColorComponentCount {
                level: "info".to_string(),
                count: 2
            }
        );
    }

    #[test]
    fn test_color_channel_out_of_range() {
        let mut colors = default_colors();
        colors.insert("info".to_string(), vec![204, 300, 242]);
        let err =
            LevelRegistry::from_tables(default_levels(), &default_severities(), &colors)
                .unwrap_err();
        assert_eq!(
            err,
            ConfigError::ColorChannelOutOfRange {
                level: "info".to_string(),
                channel: "green",
                value: 300
            }
        );
    }

    #[test]
    fn test_alpha_bounds() {
        for bad in [0i64, 101] {
            let mut colors = default_colors();
            colors.insert("debug".to_string(), vec![255, 255, 255, bad]);
            let err =
                LevelRegistry::from_tables(default_levels(), &default_severities(), &colors)
                    .unwrap_err();
            assert!(matches!(err, ConfigError::AlphaOutOfRange { .. }));
        }
    }

    #[test]
    fn test_three_component_color_defaults_to_opaque() {
        let mut colors = default_colors();
        colors.insert("debug".to_string(), vec![10, 20, 30]);
        let registry =
            LevelRegistry::from_tables(default_levels(), &default_severities(), &colors)
                .unwrap();
        assert_eq!(registry.color_of(10).unwrap(), Rgba::new(10, 20, 30, 100));
    }

    #[test]
    fn test_unknown_lookups() {
        let registry = LevelRegistry::default();
        assert!(registry.severity_of("verbose").is_err());
        assert_eq!(registry.color_of(99), Err(UnknownSeverity { severity: 99 }));
        assert!(!registry.contains("verbose"));
        assert!(registry.contains("debug"));
    }
}
