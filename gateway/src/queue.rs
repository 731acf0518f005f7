//! Hand-off queue between ingestion and consumption
//!
//! Bounded, multi-producer, single-consumer. When full, the oldest event is
//! evicted so that producers never wait on a slow consumer.

use crate::metrics::Metrics;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Notify;
use vahti_core::AlarmEvent;

/// Bounded drop-oldest queue of decoded events
///
/// `push` is synchronous and never blocks. `recv` suspends while the queue is
/// empty and yields `None` only once the queue is closed *and* drained.
///
/// Only one task may call [`recv`](HandoffQueue::recv) at a time.
pub struct HandoffQueue {
    state: Mutex<QueueState>,
    ready: Notify,
    capacity: usize,
    counters: QueueCounters,
}

struct QueueState {
    events: VecDeque<AlarmEvent>,
    closed: bool,
}

#[derive(Default)]
struct QueueCounters {
    pushed: AtomicU64,
    dropped: AtomicU64,
    drained: AtomicU64,
}

impl HandoffQueue {
    /// Create a queue holding at most `capacity` events
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        if let Some(m) = Metrics::get() {
            m.set_queue_capacity(capacity);
        }
        Self {
            state: Mutex::new(QueueState {
                events: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            ready: Notify::new(),
            capacity,
            counters: QueueCounters::default(),
        }
    }

    /// Enqueue an event, evicting the oldest one if the queue is full
    ///
    /// Returns the evicted event, if any.
    pub fn push(&self, event: AlarmEvent) -> Option<AlarmEvent> {
        let evicted = {
            let mut state = self.state.lock();
            let evicted = if state.events.len() >= self.capacity {
                state.events.pop_front()
            } else {
                None
            };
            state.events.push_back(event);
            // Gauge writes stay ordered with the depth they report
            if let Some(m) = Metrics::get() {
                m.set_queue_depth(state.events.len());
            }
            evicted
        };

        self.counters.pushed.fetch_add(1, Ordering::Relaxed);
        if evicted.is_some() {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
        }

        // Stores a permit when the consumer is not waiting yet
        self.ready.notify_one();
        evicted
    }

    /// Take the next event without waiting
    pub fn try_recv(&self) -> Option<AlarmEvent> {
        let event = {
            let mut state = self.state.lock();
            let event = state.events.pop_front();
            if let (Some(_), Some(m)) = (&event, Metrics::get()) {
                m.set_queue_depth(state.events.len());
            }
            event
        };

        if event.is_some() {
            self.counters.drained.fetch_add(1, Ordering::Relaxed);
        }
        event
    }

    /// Wait for the next event
    ///
    /// Returns `None` once the queue has been closed and every event taken.
    pub async fn recv(&self) -> Option<AlarmEvent> {
        loop {
            if let Some(event) = self.try_recv() {
                return Some(event);
            }
            if self.state.lock().closed {
                // A push may have landed between the two locks
                return self.try_recv();
            }
            self.ready.notified().await;
        }
    }

    /// Mark the queue closed; the consumer drains what is left and stops
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.ready.notify_one();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total events pushed
    pub fn total_pushed(&self) -> u64 {
        self.counters.pushed.load(Ordering::Relaxed)
    }

    /// Total events evicted because the queue was full
    pub fn total_dropped(&self) -> u64 {
        self.counters.dropped.load(Ordering::Relaxed)
    }

    /// Total events taken by the consumer
    pub fn total_drained(&self) -> u64 {
        self.counters.drained.load(Ordering::Relaxed)
    }
}
