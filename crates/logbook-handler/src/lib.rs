//! Bridges the `log` facade into logbook intake queues
//!
//! `LogbookHandler` plays the role a framework handler plays elsewhere: it
//! receives every record emitted through the `log` macros, resolves the
//! record's level name against the shared registry, and fans the resulting
//! record out to every subscribed viewer. Subscription is explicit; nothing
//! is broadcast process-wide beyond the facade itself.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{Level, LevelFilter, Log, Metadata, SetLoggerError};
use parking_lot::RwLock;

use logbook_core::{IntakeQueue, LevelRegistry};
use logbook_types::Record;

/// Maps a facade level to a configured level name
pub type LevelMapper = fn(Level) -> &'static str;

/// Mapping used when the registry carries the built-in level names
fn default_level_name(level: Level) -> &'static str {
    match level {
        Level::Trace | Level::Debug => "debug",
        Level::Info => "info",
        Level::Warn => "warning",
        Level::Error => "error",
    }
}

/// A `log::Log` implementation that feeds subscribed viewers
///
/// Clones share the same subscriber list, so keep one clone around for
/// `subscribe` after another was consumed by `install`.
#[derive(Clone)]
pub struct LogbookHandler {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Arc<LevelRegistry>,
    mapper: LevelMapper,
    queues: RwLock<Vec<IntakeQueue>>,
    unmapped: AtomicU64,
}

impl LogbookHandler {
    /// Create a handler resolving level names through the given registry
    pub fn new(registry: Arc<LevelRegistry>) -> Self {
        Self::with_mapper(registry, default_level_name)
    }

    /// Create a handler with a custom facade-level mapping
    pub fn with_mapper(registry: Arc<LevelRegistry>, mapper: LevelMapper) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry,
                mapper,
                queues: RwLock::new(Vec::new()),
                unmapped: AtomicU64::new(0),
            }),
        }
    }

    /// Deliver future records to this queue as well
    pub fn subscribe(&self, queue: IntakeQueue) {
        self.inner.queues.write().push(queue);
    }

    /// Records skipped because their mapped level name was not registered
    pub fn unmapped(&self) -> u64 {
        self.inner.unmapped.load(Ordering::Relaxed)
    }

    /// Install this handler as the global `log` logger
    pub fn install(self, max_level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_max_level(max_level);
        log::set_boxed_logger(Box::new(self))
    }
}

impl Log for LogbookHandler {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let name = (self.inner.mapper)(record.level());
        let Ok(severity) = self.inner.registry.severity_of(name) else {
            // A handler cannot log about itself; count and move on.
            self.inner.unmapped.fetch_add(1, Ordering::Relaxed);
            return;
        };

        let entry = Record::new(severity, record.args().to_string(), record.target());
        let queues = self.inner.queues.read();
        for queue in queues.iter() {
            queue.submit(entry.clone());
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use logbook_core::LogbookConfig;

    fn handler() -> LogbookHandler {
        let registry = Arc::new(LogbookConfig::default().validate().unwrap());
        LogbookHandler::new(registry)
    }

    #[test]
    fn test_levels_map_to_registry_severities() {
        let handler = handler();
        let queue = IntakeQueue::unbounded();
        handler.subscribe(queue.clone());

        for level in [Level::Trace, Level::Debug, Level::Info, Level::Warn, Level::Error] {
            handler.log(
                &log::Record::builder()
                    .args(format_args!("message"))
                    .level(level)
                    .target("app.module")
                    .build(),
            );
        }

        let severities: Vec<u32> = queue.drain().iter().map(|r| r.severity).collect();
        assert_eq!(severities, vec![10, 10, 20, 30, 40]);
    }

    #[test]
    fn test_target_becomes_source() {
        let handler = handler();
        let queue = IntakeQueue::unbounded();
        handler.subscribe(queue.clone());

        handler.log(
            &log::Record::builder()
                .args(format_args!("hello"))
                .level(Level::Info)
                .target("app.db")
                .build(),
        );

        let drained = queue.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].source, "app.db");
        assert_eq!(drained[0].message, "hello");
    }

    #[test]
    fn test_fan_out_reaches_every_subscriber() {
        let handler = handler();
        let first = IntakeQueue::unbounded();
        let second = IntakeQueue::unbounded();
        handler.subscribe(first.clone());
        handler.subscribe(second.clone());

        handler.log(
            &log::Record::builder()
                .args(format_args!("shared"))
                .level(Level::Warn)
                .target("app")
                .build(),
        );

        assert_eq!(first.drain().len(), 1);
        assert_eq!(second.drain().len(), 1);
    }

    #[test]
    fn test_install_routes_facade_macros() {
        // The global logger can only be set once per process, so this is
        // the sole test that installs one.
        let handler = handler();
        let queue = IntakeQueue::unbounded();
        handler.subscribe(queue.clone());
        handler.clone().install(LevelFilter::Info).unwrap();

        log::info!(target: "app.install", "routed through the global logger");

        let drained = queue.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].source, "app.install");
        assert_eq!(drained[0].severity, 20);
    }

    #[test]
    fn test_unmapped_level_is_counted_and_skipped() {
        // A registry without a "debug" level cannot accept Debug records
        let mut config = LogbookConfig::default();
        config.levels.retain(|l| l != "debug");
        config.severities.remove("debug");
        config.colors.remove("debug");
        let registry = Arc::new(config.validate().unwrap());

        let handler = LogbookHandler::new(registry);
        let queue = IntakeQueue::unbounded();
        handler.subscribe(queue.clone());

        handler.log(
            &log::Record::builder()
                .args(format_args!("lost"))
                .level(Level::Debug)
                .target("app")
                .build(),
        );

        assert_eq!(handler.unmapped(), 1);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_custom_mapper() {
        fn upside_down(level: Level) -> &'static str {
            match level {
                Level::Error => "debug",
                _ => "error",
            }
        }

        let registry = Arc::new(LogbookConfig::default().validate().unwrap());
        let handler = LogbookHandler::with_mapper(registry, upside_down);
        let queue = IntakeQueue::unbounded();
        handler.subscribe(queue.clone());

        handler.log(
            &log::Record::builder()
                .args(format_args!("x"))
                .level(Level::Error)
                .target("app")
                .build(),
        );

        assert_eq!(queue.drain()[0].severity, 10);
    }
}
