use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

use logbook_types::Record;

/// Default bound on records queued ahead of the consumer
pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;

/// Counters describing intake traffic
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntakeStats {
    /// Records accepted by submit
    pub submitted: u64,

    /// Records evicted unread because the queue was full
    pub dropped: u64,
}

/// Thread-safe funnel between producer threads and the single consumer
///
/// Producers only ever lock the pending queue; the record store on the
/// consumer side is never touched from a producer thread. Clones share the
/// same queue.
#[derive(Clone)]
pub struct IntakeQueue {
    inner: Arc<Inner>,
}

struct Inner {
    /// Records awaiting the next pump, oldest first
    queue: Mutex<VecDeque<Record>>,

    /// Bound on queued records; 0 means unbounded
    capacity: usize,

    /// Records accepted so far
    submitted: AtomicU64,

    /// Records evicted because the queue was full
    dropped: AtomicU64,

    /// Wakes the consumer after a submit
    notify: Notify,
}

impl IntakeQueue {
    /// Create a queue holding at most `capacity` pending records (0 means
    /// unbounded)
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                queue: Mutex::new(VecDeque::new()),
                capacity,
                submitted: AtomicU64::new(0),
                dropped: AtomicU64::new(0),
                notify: Notify::new(),
            }),
        }
    }

    /// Create a queue without a pending bound
    pub fn unbounded() -> Self {
        Self::new(0)
    }

    /// Enqueue a record from any thread
    ///
    /// At capacity the oldest pending record is evicted and counted as
    /// dropped. Never blocks on the consumer and never reorders.
    pub fn submit(&self, record: Record) {
        let mut queue = self.inner.queue.lock();
        if self.inner.capacity > 0 {
            while queue.len() >= self.inner.capacity {
                queue.pop_front();
                self.inner.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
        queue.push_back(record);
        drop(queue);

        self.inner.submitted.fetch_add(1, Ordering::Relaxed);
        self.inner.notify.notify_one();
    }

    /// Take every pending record, preserving submission order
    pub fn drain(&self) -> Vec<Record> {
        self.inner.queue.lock().drain(..).collect()
    }

    /// Wait until a submit has happened since the last wakeup
    pub async fn notified(&self) {
        self.inner.notify.notified().await;
    }

    /// Pending records not yet drained
    pub fn len(&self) -> usize {
        self.inner.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records accepted so far
    pub fn submitted(&self) -> u64 {
        self.inner.submitted.load(Ordering::Relaxed)
    }

    /// Records evicted because the queue was full
    pub fn dropped(&self) -> u64 {
        self.inner.dropped.load(Ordering::Relaxed)
    }

    /// Snapshot of the traffic counters
    pub fn stats(&self) -> IntakeStats {
        IntakeStats {
            submitted: self.submitted(),
            dropped: self.dropped(),
        }
    }
}

impl Default for IntakeQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}
