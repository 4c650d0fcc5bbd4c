//! The entity store: one snapshot, compute-then-swap commits, synchronous
//! subscriber broadcast, and a post-commit domain-event channel.

mod emitter;
mod habit_ops;
mod subscription;
mod todo_ops;
mod user_ops;

use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use event_emitter_rs::EventEmitter;
use log::debug;

use crate::datefmt::{format_date, DateFormat};
use crate::error::StoreError;
use crate::model::{avatars_unlocked, Notification, NotificationKind, Snapshot, User};

pub use emitter::{LevelUpEvent, StreakRecordEvent, LEVEL_UP, STREAK_RECORD};
pub use subscription::Subscription;

use emitter::Outbox;
use subscription::SubscriberList;

/// In-memory store holding the single current [`Snapshot`].
///
/// Clone-friendly via `Arc`: clones share the same state, so a host can
/// hand cheap handles to every component while tests construct isolated
/// instances with [`Store::new`]. Mutation is expected from one logical
/// thread of control; the locks exist for shared ownership, not for
/// concurrent writers.
#[derive(Clone)]
pub struct Store {
    snapshot: Arc<RwLock<Snapshot>>,
    subscribers: Arc<Mutex<SubscriberList>>,
    emitter: Arc<Mutex<EventEmitter>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Create a store seeded with a default user singleton.
    pub fn new() -> Self {
        Self::with_user(User::default())
    }

    /// Create a store seeded with the given user singleton.
    pub fn with_user(user: User) -> Self {
        Store {
            snapshot: Arc::new(RwLock::new(Snapshot::new(user))),
            subscribers: Arc::new(Mutex::new(SubscriberList::new())),
            emitter: Arc::new(Mutex::new(EventEmitter::new())),
        }
    }

    /// Clone of the current snapshot. Callers get their own copy; nothing
    /// they do to it affects the store.
    pub fn state(&self) -> Result<Snapshot, StoreError> {
        let snapshot = self
            .snapshot
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(snapshot.clone())
    }

    /// Apply a transform to the current snapshot and commit the result.
    ///
    /// The transform runs against a scratch clone: if it fails, the prior
    /// snapshot is left intact and the error propagates. On success the
    /// new snapshot is swapped in and every subscriber is notified
    /// synchronously, in insertion order, before this call returns.
    pub fn set_state<F>(&self, transform: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Snapshot) -> Result<(), StoreError>,
    {
        self.commit("set_state", |snapshot, _outbox| transform(snapshot))
    }

    /// Register a snapshot observer. Fires once per commit, synchronously.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        let id = match self.subscribers.lock() {
            Ok(mut list) => list.add(Arc::new(callback)),
            // A poisoned listener list cannot accept new subscribers; the
            // returned handle is inert.
            Err(_) => 0,
        };
        Subscription {
            list: Arc::downgrade(&self.subscribers),
            id,
        }
    }

    /// Register a listener for a named domain event ([`LEVEL_UP`],
    /// [`STREAK_RECORD`]). Payloads arrive as JSON strings; delivery is
    /// decoupled from the commit and happens after it completes.
    pub fn on<F>(&self, event: &str, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        if let Ok(mut emitter) = self.emitter.lock() {
            emitter.on(event, listener);
        }
    }

    /// Render a date in the given format, defaulting to the user's stored
    /// preference when `format` is `None`.
    pub fn format_date(
        &self,
        date: DateTime<Utc>,
        format: Option<DateFormat>,
    ) -> Result<String, StoreError> {
        let format = match format {
            Some(format) => format,
            None => {
                let snapshot = self
                    .snapshot
                    .read()
                    .map_err(|_| StoreError::LockPoisoned("read"))?;
                snapshot.user.preferences.date_format
            }
        };
        Ok(format_date(date, format))
    }

    /// Compute-then-swap commit shared by every mutation operation.
    pub(crate) fn commit<T, F>(&self, operation: &'static str, transform: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Snapshot, &mut Outbox) -> Result<T, StoreError>,
    {
        let mut next = {
            let current = self
                .snapshot
                .read()
                .map_err(|_| StoreError::LockPoisoned("read"))?;
            current.clone()
        };

        let mut outbox = Outbox::new();
        let value = transform(&mut next, &mut outbox)?;

        {
            let mut slot = self
                .snapshot
                .write()
                .map_err(|_| StoreError::LockPoisoned("commit"))?;
            *slot = next.clone();
        }
        debug!("{} committed", operation);

        self.broadcast(&next);
        self.emit_queued(outbox);

        Ok(value)
    }

    fn broadcast(&self, snapshot: &Snapshot) {
        let listeners = match self.subscribers.lock() {
            Ok(list) => list.listeners(),
            Err(_) => return,
        };
        for listener in listeners {
            listener(snapshot);
        }
    }

    fn emit_queued(&self, outbox: Outbox) {
        let events = outbox.drain();
        if events.is_empty() {
            return;
        }
        if let Ok(mut emitter) = self.emitter.lock() {
            for event in events {
                emitter.emit(event.name, event.payload);
            }
        }
    }
}

/// Level-up bookkeeping shared by todo and habit completion: consult the
/// avatar unlock table, push notifications when the user wants them, and
/// queue a post-commit event. No-op unless the level increased.
pub(crate) fn check_level_up(
    snapshot: &mut Snapshot,
    outbox: &mut Outbox,
    old_level: u32,
    new_level: u32,
) {
    if new_level <= old_level {
        return;
    }

    let unlocked = avatars_unlocked(old_level, new_level);
    if snapshot.user.toggles.level_ups {
        if unlocked.is_empty() {
            snapshot.notifications.insert(
                0,
                Notification::new(
                    NotificationKind::LevelUp,
                    "Level up!",
                    format!("You reached level {}.", new_level),
                ),
            );
        }
        for avatar in &unlocked {
            snapshot.notifications.insert(
                0,
                Notification::new(
                    NotificationKind::LevelUp,
                    "Level up!",
                    format!(
                        "You reached level {} and unlocked the {} avatar.",
                        new_level, avatar
                    ),
                ),
            );
        }
    }

    outbox.enqueue(
        LEVEL_UP,
        &LevelUpEvent {
            old_level,
            new_level,
            unlocked: unlocked.into_iter().map(String::from).collect(),
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn set_state_commits_and_broadcasts() {
        let store = Store::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let _sub = store.subscribe(move |snapshot| {
            counter.store(snapshot.tags.len(), Ordering::SeqCst);
        });

        store
            .set_state(|snapshot| {
                snapshot.tags.insert("health".to_string());
                Ok(())
            })
            .unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert!(store.state().unwrap().tags.contains("health"));
    }

    #[test]
    fn failed_transform_leaves_prior_snapshot() {
        let store = Store::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _sub = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let before = store.state().unwrap();
        let result = store.set_state(|snapshot| {
            snapshot.tags.insert("doomed".to_string());
            Err(StoreError::InvalidInput("nope".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(store.state().unwrap(), before);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let store = Store::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let sub = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.set_state(|_| Ok(())).unwrap();
        sub.unsubscribe();
        sub.unsubscribe();
        store.set_state(|_| Ok(())).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clones_share_state() {
        let store = Store::new();
        let handle = store.clone();

        handle
            .set_state(|snapshot| {
                snapshot.tags.insert("shared".to_string());
                Ok(())
            })
            .unwrap();

        assert!(store.state().unwrap().tags.contains("shared"));
    }

    #[test]
    fn format_date_defaults_to_preference() {
        use chrono::TimeZone;

        let store = Store::new();
        let date = Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap();

        // Default preference is MM/DD/YYYY.
        assert_eq!(store.format_date(date, None).unwrap(), "01/05/2026");
        assert_eq!(
            store.format_date(date, Some(DateFormat::IsoDate)).unwrap(),
            "2026-01-05"
        );
    }
}
