//! State engine for a gamified habit/todo tracker.
//!
//! One [`Store`] holds one immutable [`Snapshot`] of the whole application
//! state (user, todos, habits, tags, history, notifications). Every named
//! mutation operation computes a new snapshot, swaps it in atomically, and
//! synchronously notifies subscribers; gameplay operations also append an
//! audit record to the newest-first history log. Named domain events
//! (level-ups, streak records) fire after the commit completes.
//!
//! There is no persistence and no network surface: the store is
//! process-lifetime state consumed by a host UI layer through the
//! read/write/subscribe API.

mod datefmt;
mod error;
mod model;
mod store;

pub use datefmt::{format_date, DateFormat};
pub use error::{EntityKind, StoreError};
pub use model::{
    avatars_unlocked, ChecklistItem, Difficulty, Habit, HabitDraft, HabitKind, HabitPatch,
    HistoryAction, HistoryEntry, HistoryKind, Notification, NotificationKind, NotificationToggles,
    Preferences, Snapshot, Todo, TodoDraft, TodoPatch, User, UserPatch, AVATAR_UNLOCKS,
};
pub use store::{
    LevelUpEvent, Store, StreakRecordEvent, Subscription, LEVEL_UP, STREAK_RECORD,
};
