use logbook_types::{ExceptionInfo, Record};

/// Renders records into display text and exception payloads into tooltips
///
/// Injected at viewer construction; swapping it only affects records
/// ingested afterwards.
pub trait RecordFormatter: Send {
    /// Produce the display line for a record
    fn format(&self, record: &Record, level_label: &str) -> String;

    /// Produce tooltip text for an attached exception
    fn format_exception(&self, exception: &ExceptionInfo) -> String {
        let mut text = format!("{}: {}", exception.kind, exception.message);
        for frame in &exception.traceback {
            text.push('\n');
            text.push_str(frame);
        }
        text
    }
}

/// Default formatter: time, padded level label, source, message
#[derive(Clone, Copy, Debug, Default)]
pub struct LineFormatter;

impl RecordFormatter for LineFormatter {
    fn format(&self, record: &Record, level_label: &str) -> String {
        format!(
            "{} {:<8} {} | {}",
            record.timestamp.format("%H:%M:%S%.3f"),
            level_label.to_uppercase(),
            record.source,
            record.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_line_formatter_layout() {
        let mut record = Record::new(30, "disk almost full", "app.storage");
        record.timestamp = chrono::Utc
            .with_ymd_and_hms(2024, 3, 1, 12, 30, 45)
            .unwrap();
        let line = LineFormatter.format(&record, "warning");
        assert_eq!(line, "12:30:45.000 WARNING  app.storage | disk almost full");
    }

    #[test]
    fn test_exception_tooltip_includes_frames() {
        let mut exception = ExceptionInfo::new("TimeoutError", "backend did not answer");
        exception.traceback = vec!["  in call_backend".to_string(), "  in run".to_string()];
        let text = LineFormatter.format_exception(&exception);
        assert_eq!(
            text,
            "TimeoutError: backend did not answer\n  in call_backend\n  in run"
        );
    }
}
