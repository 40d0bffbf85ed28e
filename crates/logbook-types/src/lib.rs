//! Shared types for logbook
//!
//! This crate contains data structures used across multiple logbook crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Record Types
// ============================================================================

/// A single log record as handed to the intake funnel
#[derive(Clone, Debug)]
pub struct Record {
    /// Numeric severity, resolved against the level registry
    pub severity: u32,

    /// Pre-rendered message text
    pub message: String,

    /// Emission time
    pub timestamp: DateTime<Utc>,

    /// Name of the emitting logger
    pub source: String,

    /// Attached exception payload (if the record carried one)
    pub exception: Option<ExceptionInfo>,
}

impl Record {
    /// Create a record stamped with the current time
    pub fn new(severity: u32, message: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            timestamp: Utc::now(),
            source: source.into(),
            exception: None,
        }
    }

    /// Attach an exception payload
    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }
}

/// Exception details carried alongside a record, used for tooltips
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExceptionInfo {
    /// Exception type name
    pub kind: String,

    /// Exception message
    pub message: String,

    /// Traceback lines, outermost frame first
    pub traceback: Vec<String>,
}

impl ExceptionInfo {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            traceback: Vec::new(),
        }
    }
}

// ============================================================================
// Color Types
// ============================================================================

/// An RGB color with alpha expressed as a 1-100 percentage
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity percent, 1..=100
    pub a: u8,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 100 }
    }

    /// HSL lightness in [0.0, 1.0]
    pub fn lightness(&self) -> f32 {
        let max = self.r.max(self.g).max(self.b) as f32;
        let min = self.r.min(self.g).min(self.b) as f32;
        (max + min) / (2.0 * 255.0)
    }
}

/// How the color engine decorates visible records
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// No coloring; any previously assigned colors are cleared
    #[default]
    Disabled,
    /// Tint the record text with its severity color
    ForegroundTint,
    /// Fill the record background with its severity color
    BackgroundTint,
}

impl ColorMode {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::ForegroundTint => "foreground",
            Self::BackgroundTint => "background",
        }
    }
}

// ============================================================================
// Geometry & Identity
// ============================================================================

/// A screen position, as reported by the presentation layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Identifies the viewer instance that emitted a signal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LogbookId(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lightness_extremes() {
        assert_eq!(Rgba::opaque(0, 0, 0).lightness(), 0.0);
        assert_eq!(Rgba::opaque(255, 255, 255).lightness(), 1.0);
    }

    #[test]
    fn test_lightness_midpoint() {
        let gray = Rgba::opaque(128, 128, 128);
        assert!((gray.lightness() - 0.502).abs() < 0.001);
    }

    #[test]
    fn test_color_mode_default_is_disabled() {
        assert_eq!(ColorMode::default(), ColorMode::Disabled);
    }

    #[test]
    fn test_record_new_has_no_exception() {
        let record = Record::new(20, "hello", "app.core");
        assert_eq!(record.severity, 20);
        assert!(record.exception.is_none());
    }
}
