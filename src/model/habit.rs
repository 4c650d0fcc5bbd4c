use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Difficulty;

/// Whether completing the habit rewards or penalizes the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitKind {
    /// Completion grants EXP/health and extends the streak.
    Positive,
    /// Completion costs EXP/health and resets the streak to 0.
    Negative,
}

/// A recurring behavior with a completion streak.
///
/// `streak` counts consecutive completions since the last reset; it is
/// unsigned, so "never below zero" holds by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub title: String,
    pub description: String,
    pub kind: HabitKind,
    pub difficulty: Difficulty,
    pub tags: BTreeSet<String>,
    pub streak: u32,
    pub last_completed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    pub(crate) fn from_draft(draft: HabitDraft) -> Self {
        Habit {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            kind: draft.kind,
            difficulty: draft.difficulty,
            tags: draft.tags,
            streak: 0,
            last_completed: None,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn apply(&mut self, patch: HabitPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(difficulty) = patch.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
    }
}

/// Input shape for `add_habit`.
#[derive(Debug, Clone)]
pub struct HabitDraft {
    pub title: String,
    pub description: String,
    pub kind: HabitKind,
    pub difficulty: Difficulty,
    pub tags: BTreeSet<String>,
}

impl HabitDraft {
    pub fn new(title: impl Into<String>, kind: HabitKind) -> Self {
        HabitDraft {
            title: title.into(),
            description: String::new(),
            kind,
            difficulty: Difficulty::default(),
            tags: BTreeSet::new(),
        }
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }
}

/// Field-by-field update for `update_habit`.
///
/// `streak` and `last_completed` are owned by the complete/uncomplete
/// operations and cannot be patched directly.
#[derive(Debug, Clone, Default)]
pub struct HabitPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<HabitKind>,
    pub difficulty: Option<Difficulty>,
    pub tags: Option<BTreeSet<String>>,
}

impl HabitPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn kind(mut self, kind: HabitKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn tags(mut self, tags: BTreeSet<String>) -> Self {
        self.tags = Some(tags);
        self
    }
}
