use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Habit, HistoryEntry, Notification, Todo, User};

/// The full application state at one point in time.
///
/// The store holds exactly one current snapshot; every mutation produces a
/// new one (compute-then-swap). `todos`, `habits`, and `history` are kept
/// newest-first; `tags` is the global append-only tag set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub user: User,
    pub todos: Vec<Todo>,
    pub habits: Vec<Habit>,
    pub tags: BTreeSet<String>,
    pub history: Vec<HistoryEntry>,
    pub notifications: Vec<Notification>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot {
            user: User::default(),
            todos: Vec::new(),
            habits: Vec::new(),
            tags: BTreeSet::new(),
            history: Vec::new(),
            notifications: Vec::new(),
        }
    }
}

impl Snapshot {
    pub fn new(user: User) -> Self {
        Snapshot {
            user,
            ..Default::default()
        }
    }

    pub fn todo(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn habit(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn notification(&self, id: &str) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id == id)
    }

    /// Union tags into the global set. The set is append-only; nothing
    /// ever removes from it, so this only grows.
    pub(crate) fn absorb_tags(&mut self, tags: &BTreeSet<String>) {
        for tag in tags {
            if !tag.trim().is_empty() {
                self.tags.insert(tag.clone());
            }
        }
    }

    /// Prepend a history entry (newest-first).
    pub(crate) fn log(&mut self, entry: HistoryEntry) {
        self.history.insert(0, entry);
    }
}
