use logbook_types::{Record, Rgba};

/// A stored record plus the display state computed for it
#[derive(Clone, Debug)]
pub struct RecordItem {
    /// The record as received; never mutated after intake
    pub record: Record,

    /// Text produced by the formatter at intake time
    pub display_text: String,

    /// Tooltip text derived from the record's exception, if any
    pub tooltip: Option<String>,

    /// Whether the current filter hides this item
    pub(crate) hidden: bool,

    /// Text color assigned by the color engine
    pub(crate) foreground: Option<Rgba>,

    /// Background color assigned by the color engine
    pub(crate) background: Option<Rgba>,
}

impl RecordItem {
    pub fn new(record: Record, display_text: String, tooltip: Option<String>) -> Self {
        Self {
            record,
            display_text,
            tooltip,
            hidden: false,
            foreground: None,
            background: None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn foreground(&self) -> Option<Rgba> {
        self.foreground
    }

    pub fn background(&self) -> Option<Rgba> {
        self.background
    }
}

/// Append-only store of record items in arrival order
///
/// Indices are stable until `clear`; items are only removed wholesale.
#[derive(Debug, Default)]
pub struct RecordStore {
    items: Vec<RecordItem>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item, returning its index
    pub fn append(&mut self, item: RecordItem) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    /// Discard every stored item
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RecordItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordItem> + '_ {
        self.items.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut RecordItem> + '_ {
        self.items.iter_mut()
    }

    /// Items the current filter leaves visible
    pub fn visible(&self) -> impl Iterator<Item = &RecordItem> + '_ {
        self.items.iter().filter(|item| !item.hidden)
    }

    pub fn visible_len(&self) -> usize {
        self.visible().count()
    }
}
