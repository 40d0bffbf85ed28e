//! Record intake, filtering, and coloring for logbook
//!
//! This crate is the viewer core: a thread-safe intake funnel for records
//! emitted anywhere in the process, an append-only record store, and the
//! filter and color engines that keep the stored view consistent with the
//! current configuration. Rendering is left to the embedding surface.

mod color;
mod config;
mod context;
mod error;
mod filter;
mod format;
mod intake;
mod registry;
mod store;
mod viewer;

pub use config::LogbookConfig;
pub use context::{ContextRequest, ContextSink};
pub use error::{ConfigError, PatternError, UnknownLevel, UnknownSeverity};
pub use filter::FilterState;
pub use format::{LineFormatter, RecordFormatter};
pub use intake::{DEFAULT_QUEUE_CAPACITY, IntakeQueue, IntakeStats};
pub use registry::LevelRegistry;
pub use store::{RecordItem, RecordStore};
pub use viewer::Logbook;

// Re-export types used in our public API
pub use logbook_types::{ColorMode, ExceptionInfo, LogbookId, Point, Record, Rgba};
