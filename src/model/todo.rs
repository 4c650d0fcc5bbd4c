use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Difficulty;

/// A single line of a todo's checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

impl ChecklistItem {
    pub fn new(text: impl Into<String>) -> Self {
        ChecklistItem {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            completed: false,
        }
    }
}

/// A one-off task.
///
/// Invariant: `completed_at` is set iff `completed` is true. Both are
/// toggled together by the store's complete/uncomplete operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub difficulty: Difficulty,
    pub tags: BTreeSet<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub checklist: Vec<ChecklistItem>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Todo {
    pub(crate) fn from_draft(draft: TodoDraft) -> Self {
        Todo {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            completed: false,
            difficulty: draft.difficulty,
            tags: draft.tags,
            due_date: draft.due_date,
            checklist: draft.checklist,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Apply a patch, replacing only the fields it carries.
    pub(crate) fn apply(&mut self, patch: TodoPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(difficulty) = patch.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(checklist) = patch.checklist {
            self.checklist = checklist;
        }
    }
}

/// Input shape for `add_todo`.
#[derive(Debug, Clone, Default)]
pub struct TodoDraft {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub tags: BTreeSet<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub checklist: Vec<ChecklistItem>,
}

impl TodoDraft {
    pub fn new(title: impl Into<String>) -> Self {
        TodoDraft {
            title: title.into(),
            ..Default::default()
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

    pub fn due(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn checklist_item(mut self, text: impl Into<String>) -> Self {
        self.checklist.push(ChecklistItem::new(text));
        self
    }
}

/// Field-by-field update for `update_todo`.
///
/// Enumerates exactly which fields are updatable; `completed`/`completed_at`
/// are owned by the complete/uncomplete operations and absent here.
/// `due_date` takes `Option<Option<..>>` so a patch can clear the date.
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub tags: Option<BTreeSet<String>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub checklist: Option<Vec<ChecklistItem>>,
}

impl TodoPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
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

    pub fn due(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn checklist(mut self, checklist: Vec<ChecklistItem>) -> Self {
        self.checklist = Some(checklist);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_draft() {
        let todo = Todo::from_draft(
            TodoDraft::new("Buy groceries")
                .difficulty(Difficulty::Medium)
                .tag("errands")
                .checklist_item("milk"),
        );

        assert!(!todo.id.is_empty());
        assert_eq!(todo.title, "Buy groceries");
        assert_eq!(todo.difficulty, Difficulty::Medium);
        assert!(todo.tags.contains("errands"));
        assert_eq!(todo.checklist.len(), 1);
        assert!(!todo.completed);
        assert!(todo.completed_at.is_none());
    }

    #[test]
    fn apply_patch_merges_only_given_fields() {
        let mut todo = Todo::from_draft(TodoDraft::new("Original").tag("a"));
        let created_at = todo.created_at;

        todo.apply(TodoPatch::default().title("Renamed"));

        assert_eq!(todo.title, "Renamed");
        assert!(todo.tags.contains("a"));
        assert_eq!(todo.created_at, created_at);
    }

    #[test]
    fn patch_can_clear_due_date() {
        let mut todo = Todo::from_draft(TodoDraft::new("t").due(Utc::now()));
        assert!(todo.due_date.is_some());

        todo.apply(TodoPatch::default().due(None));
        assert!(todo.due_date.is_none());
    }
}
