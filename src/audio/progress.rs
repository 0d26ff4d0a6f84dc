//! Progress fan-out: many observers, one audio thread.
//!
//! Playback progress has two independent read sites (the detail view's
//! scrubber and the now-playing pill), and view surfaces mount and unmount
//! freely. Subscriptions are therefore explicit and removable: dropping a
//! `ProgressSubscription` unregisters it, so a closed detail view cannot
//! leak its listener.

use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};

use super::types::ProgressEvent;

struct BusInner {
    next_id: u64,
    subscribers: Vec<(u64, Sender<ProgressEvent>)>,
}

/// Cloneable handle to the progress fan-out.
#[derive(Clone)]
pub struct ProgressBus {
    inner: Arc<Mutex<BusInner>>,
}

impl ProgressBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(BusInner {
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Register a new subscriber. The returned subscription unregisters
    /// itself when dropped.
    pub fn subscribe(&self) -> ProgressSubscription {
        let (tx, rx) = channel();
        let id = {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.next_id += 1;
            let id = inner.next_id;
            inner.subscribers.push((id, tx));
            id
        };
        ProgressSubscription {
            id,
            rx,
            bus: self.clone(),
        }
    }

    /// Deliver an event to every live subscriber, pruning dead ones.
    pub fn publish(&self, event: ProgressEvent) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.subscribers.retain(|(_, tx)| tx.send(event).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .subscribers
            .len()
    }

    fn unsubscribe(&self, id: u64) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.subscribers.retain(|(sid, _)| *sid != id);
    }
}

impl Default for ProgressBus {
    fn default() -> Self {
        Self::new()
    }
}

/// One registered observer of playback progress.
pub struct ProgressSubscription {
    id: u64,
    rx: Receiver<ProgressEvent>,
    bus: ProgressBus,
}

impl ProgressSubscription {
    /// Drain every event queued since the last call, in publish order.
    pub fn drain(&self) -> Vec<ProgressEvent> {
        self.rx.try_iter().collect()
    }
}

impl Drop for ProgressSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.id);
    }
}
