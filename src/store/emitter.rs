//! Named domain events queued during a commit and emitted after it.

use log::warn;
use serde::{Deserialize, Serialize};

/// Event name for level increases.
pub const LEVEL_UP: &str = "LevelUp";
/// Event name for new personal-best habit streaks.
pub const STREAK_RECORD: &str = "StreakRecord";

/// Payload for [`LEVEL_UP`] events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelUpEvent {
    pub old_level: u32,
    pub new_level: u32,
    /// Avatars crossed in the unlock table between the two levels.
    pub unlocked: Vec<String>,
}

/// Payload for [`STREAK_RECORD`] events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakRecordEvent {
    pub habit_id: String,
    pub title: String,
    pub streak: u32,
}

pub(crate) struct QueuedEvent {
    pub name: &'static str,
    pub payload: String,
}

/// Events collected while a transform runs. The store emits them only
/// after the new snapshot is committed and broadcast, so listeners always
/// observe post-commit state.
#[derive(Default)]
pub(crate) struct Outbox {
    events: Vec<QueuedEvent>,
}

impl Outbox {
    pub(crate) fn new() -> Self {
        Outbox::default()
    }

    pub(crate) fn enqueue<T: Serialize>(&mut self, name: &'static str, payload: &T) {
        match serde_json::to_string(payload) {
            Ok(json) => self.events.push(QueuedEvent {
                name,
                payload: json,
            }),
            Err(err) => warn!("dropping {} event, payload failed to serialize: {}", name, err),
        }
    }

    pub(crate) fn drain(self) -> Vec<QueuedEvent> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enqueue_serializes_payload() {
        let mut outbox = Outbox::new();
        outbox.enqueue(
            LEVEL_UP,
            &LevelUpEvent {
                old_level: 1,
                new_level: 2,
                unlocked: vec!["squire".to_string()],
            },
        );

        let events = outbox.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "LevelUp");

        let payload: LevelUpEvent = serde_json::from_str(&events[0].payload).unwrap();
        assert_eq!(payload.new_level, 2);
        assert_eq!(payload.unlocked, vec!["squire"]);
    }
}
