//! Domain model: the entities held by the store's snapshot.

mod difficulty;
mod habit;
mod history;
mod notification;
mod snapshot;
mod todo;
mod user;

pub use difficulty::Difficulty;
pub use habit::{Habit, HabitDraft, HabitKind, HabitPatch};
pub use history::{HistoryAction, HistoryEntry, HistoryKind};
pub use notification::{Notification, NotificationKind};
pub use snapshot::Snapshot;
pub use todo::{ChecklistItem, Todo, TodoDraft, TodoPatch};
pub use user::{avatars_unlocked, NotificationToggles, Preferences, User, UserPatch, AVATAR_UNLOCKS};
