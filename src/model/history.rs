use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Difficulty;

/// Which collection the logged action touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    Todo,
    Habit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Added,
    Edited,
    Completed,
    Uncompleted,
    Deleted,
}

/// Append-only audit record of one state-changing action.
///
/// Carries value snapshots (title, tags, difficulty) rather than entity
/// references, so the record stays meaningful after the entity is deleted.
/// Never mutated or pruned after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub kind: HistoryKind,
    pub action: HistoryAction,
    pub title: String,
    pub tags: BTreeSet<String>,
    pub difficulty: Difficulty,
    pub timestamp: DateTime<Utc>,
    pub exp_gained: Option<i32>,
    pub health_change: Option<i32>,
}

impl HistoryEntry {
    pub(crate) fn record(
        kind: HistoryKind,
        action: HistoryAction,
        title: impl Into<String>,
        tags: &BTreeSet<String>,
        difficulty: Difficulty,
    ) -> Self {
        HistoryEntry {
            id: Uuid::new_v4().to_string(),
            kind,
            action,
            title: title.into(),
            tags: tags.clone(),
            difficulty,
            timestamp: Utc::now(),
            exp_gained: None,
            health_change: None,
        }
    }

    pub(crate) fn exp_gained(mut self, exp: i32) -> Self {
        self.exp_gained = Some(exp);
        self
    }

    pub(crate) fn health_change(mut self, health: i32) -> Self {
        self.health_change = Some(health);
        self
    }
}
