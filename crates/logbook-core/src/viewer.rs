use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use logbook_types::{ColorMode, LogbookId, Point, Record};

use crate::color;
use crate::config::LogbookConfig;
use crate::context::{ContextRequest, ContextSink};
use crate::error::{ConfigError, PatternError, UnknownLevel};
use crate::filter::FilterState;
use crate::format::{LineFormatter, RecordFormatter};
use crate::intake::IntakeQueue;
use crate::registry::LevelRegistry;
use crate::store::{RecordItem, RecordStore};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A live, filterable view over records received from anywhere in the process
///
/// Owns the record store and the filter and color engines. All mutation runs
/// on the caller's thread through `&mut self`; producer threads reach the
/// viewer only through the cloneable intake handle.
pub struct Logbook {
    id: LogbookId,
    registry: Arc<LevelRegistry>,
    intake: IntakeQueue,
    store: RecordStore,
    filter: FilterState,
    color_mode: ColorMode,
    formatter: Box<dyn RecordFormatter>,
    ignore_formatter: bool,
    readable_text: bool,
    context_sink: Option<Box<dyn ContextSink>>,
    unmapped_severities: u64,
}

impl Logbook {
    /// Build a viewer from configuration
    ///
    /// Fails on an inconsistent level configuration before any record is
    /// accepted. A configured filter pattern that does not compile is
    /// dropped with a warning instead; pattern problems stay recoverable.
    pub fn new(config: &LogbookConfig) -> Result<Self, ConfigError> {
        let registry = Arc::new(config.validate()?);

        let mut filter = FilterState::match_all(registry.severity_values().collect());
        if !config.initial_filter_pattern.is_empty() {
            match filter.with_pattern(&config.initial_filter_pattern) {
                Ok(compiled) => filter = compiled,
                Err(err) => warn!(%err, "ignoring configured filter pattern"),
            }
        }

        Ok(Self {
            id: LogbookId(NEXT_ID.fetch_add(1, Ordering::Relaxed)),
            registry,
            intake: IntakeQueue::new(config.queue_capacity),
            store: RecordStore::new(),
            filter,
            color_mode: config.color_mode,
            formatter: Box::new(LineFormatter),
            ignore_formatter: config.ignore_formatter,
            readable_text: config.readable_text,
            context_sink: None,
            unmapped_severities: 0,
        })
    }

    /// Producer-facing handle; clone freely across threads
    pub fn intake(&self) -> IntakeQueue {
        self.intake.clone()
    }

    pub fn id(&self) -> LogbookId {
        self.id
    }

    /// The validated level registry
    pub fn registry(&self) -> &Arc<LevelRegistry> {
        &self.registry
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// The stored records and their display state
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// The active filter
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Records seen with a severity missing from the registry
    pub fn unmapped_severities(&self) -> u64 {
        self.unmapped_severities
    }

    /// Move queued records into the store, classifying each one
    ///
    /// Returns how many records were ingested. This is the single consumer
    /// the intake funnel feeds; call it from one thread only.
    pub fn pump(&mut self) -> usize {
        let drained = self.intake.drain();
        let count = drained.len();
        for record in drained {
            self.ingest(record);
        }
        count
    }

    fn ingest(&mut self, record: Record) {
        let label = match self.registry.level_name(record.severity) {
            Ok(name) => name.to_string(),
            Err(err) => {
                self.unmapped_severities += 1;
                warn!(%err, source = %record.source, "flagging record with unregistered severity");
                record.severity.to_string()
            }
        };

        let display_text = if self.ignore_formatter {
            record.message.clone()
        } else {
            self.formatter.format(&record, &label)
        };
        let tooltip = record
            .exception
            .as_ref()
            .map(|exception| self.formatter.format_exception(exception));

        let mut item = RecordItem::new(record, display_text, tooltip);
        item.hidden = !self.filter.matches(&item.display_text, item.record.severity);
        // An unmapped severity was already counted above; its colors stay clear.
        let _ = color::apply(&mut item, self.color_mode, &self.registry, self.readable_text);
        self.store.append(item);
    }

    /// Replace the filter pattern and recompute visibility for every item
    ///
    /// A pattern that fails to compile is rejected and the previous filter
    /// stays active.
    pub fn set_pattern(&mut self, pattern: &str) -> Result<(), PatternError> {
        self.filter = self.filter.with_pattern(pattern)?;
        self.refilter();
        Ok(())
    }

    /// Enable or disable a level by name, recomputing visibility
    pub fn set_level_enabled(&mut self, level: &str, enabled: bool) -> Result<(), UnknownLevel> {
        let severity = self.registry.severity_of(level)?;
        self.filter = self.filter.with_severity(severity, enabled);
        self.refilter();
        Ok(())
    }

    /// Switch the coloring mode, recoloring every stored item
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
        self.recolor();
    }

    /// Replace the formatter used for records ingested from now on
    pub fn set_formatter(&mut self, formatter: impl RecordFormatter + 'static) {
        self.formatter = Box::new(formatter);
    }

    /// Register the receiver for context-menu requests
    pub fn set_context_sink(&mut self, sink: impl ContextSink + 'static) {
        self.context_sink = Some(Box::new(sink));
    }

    /// Discard every stored record
    ///
    /// Records still queued in the intake funnel are untouched; the next
    /// pump ingests them as usual.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Resolve a context-menu request to the records it applies to
    ///
    /// Selected items win; otherwise the single item under the cursor.
    /// Returns None and emits nothing when neither yields a record. At most
    /// one sink delivery happens per call.
    pub fn request_context(
        &mut self,
        position: Point,
        selected: &[usize],
        under_cursor: Option<usize>,
    ) -> Option<ContextRequest> {
        let records: Vec<Record> = if selected.is_empty() {
            under_cursor
                .and_then(|index| self.store.get(index))
                .map(|item| vec![item.record.clone()])
                .unwrap_or_default()
        } else {
            selected
                .iter()
                .filter_map(|&index| self.store.get(index))
                .map(|item| item.record.clone())
                .collect()
        };

        if records.is_empty() {
            return None;
        }

        let request = ContextRequest {
            position,
            records,
            source: self.id,
        };
        if let Some(sink) = self.context_sink.as_mut() {
            sink.context_requested(request.clone());
        }
        Some(request)
    }

    fn refilter(&mut self) {
        for item in self.store.iter_mut() {
            item.hidden = !self.filter.matches(&item.display_text, item.record.severity);
        }
    }

    fn recolor(&mut self) {
        let mode = self.color_mode;
        let readable = self.readable_text;
        for item in self.store.iter_mut() {
            // Unmapped severities were counted at ingest.
            let _ = color::apply(item, mode, &self.registry, readable);
        }
    }
}
