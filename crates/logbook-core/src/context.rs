use logbook_types::{LogbookId, Point, Record};

/// Payload handed to the context sink when the presentation layer asks for
/// a context menu
#[derive(Clone, Debug)]
pub struct ContextRequest {
    /// Cursor position as reported by the caller
    pub position: Point,

    /// Records the request applies to, selection order preserved
    pub records: Vec<Record>,

    /// The viewer that emitted the request
    pub source: LogbookId,
}

/// Receives context-menu requests from a viewer
pub trait ContextSink: Send {
    fn context_requested(&mut self, request: ContextRequest);
}

impl<F> ContextSink for F
where
    F: FnMut(ContextRequest) + Send,
{
    fn context_requested(&mut self, request: ContextRequest) {
        self(request)
    }
}
