use std::sync::{Arc, Mutex, Weak};

use crate::model::Snapshot;

pub(crate) type Listener = Arc<dyn Fn(&Snapshot) + Send + Sync>;

/// Registered snapshot observers, delivered to in insertion order.
pub(crate) struct SubscriberList {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

impl SubscriberList {
    pub(crate) fn new() -> Self {
        SubscriberList {
            next_id: 1,
            entries: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, listener: Listener) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: u64) {
        self.entries.retain(|(entry_id, _)| *entry_id != id);
    }

    /// Snapshot of the current listeners, so broadcast can run without
    /// holding the list lock.
    pub(crate) fn listeners(&self) -> Vec<Listener> {
        self.entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }

}

/// Deregistration handle returned by `Store::subscribe`.
///
/// `unsubscribe` is idempotent: calling it twice, or after the store is
/// gone, is a no-op. Dropping the handle without calling it leaves the
/// subscription active for the life of the store.
#[must_use = "dropping the handle silently leaves the subscription active"]
pub struct Subscription {
    pub(crate) list: Weak<Mutex<SubscriberList>>,
    pub(crate) id: u64,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        if let Some(list) = self.list.upgrade() {
            if let Ok(mut list) = list.lock() {
                list.remove(self.id);
            }
        }
    }
}
