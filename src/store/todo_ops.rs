//! Todo mutation operations.

use chrono::Utc;
use log::info;

use crate::error::{EntityKind, StoreError};
use crate::model::{HistoryAction, HistoryEntry, HistoryKind, Todo, TodoDraft, TodoPatch};

use super::{check_level_up, Store};

impl Store {
    /// Create a todo from a draft. Blank titles are rejected.
    pub fn add_todo(&self, draft: TodoDraft) -> Result<Todo, StoreError> {
        if draft.title.trim().is_empty() {
            return Err(StoreError::InvalidInput(
                "todo title must not be blank".to_string(),
            ));
        }

        self.commit("add_todo", move |snapshot, _outbox| {
            let todo = Todo::from_draft(draft);
            snapshot.absorb_tags(&todo.tags);
            snapshot.log(
                HistoryEntry::record(
                    HistoryKind::Todo,
                    HistoryAction::Added,
                    &todo.title,
                    &todo.tags,
                    todo.difficulty,
                ),
            );
            snapshot.todos.insert(0, todo.clone());
            info!("todo {} added", todo.id);
            Ok(todo)
        })
    }

    /// Shallow-merge a patch into an existing todo. Unknown ids fail with
    /// `NotFound` and write no history.
    pub fn update_todo(&self, id: &str, patch: TodoPatch) -> Result<Todo, StoreError> {
        if matches!(&patch.title, Some(title) if title.trim().is_empty()) {
            return Err(StoreError::InvalidInput(
                "todo title must not be blank".to_string(),
            ));
        }

        self.commit("update_todo", move |snapshot, _outbox| {
            let index = snapshot
                .todos
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| StoreError::not_found(EntityKind::Todo, id))?;

            snapshot.todos[index].apply(patch);
            let todo = snapshot.todos[index].clone();
            snapshot.absorb_tags(&todo.tags);
            snapshot.log(
                HistoryEntry::record(
                    HistoryKind::Todo,
                    HistoryAction::Edited,
                    &todo.title,
                    &todo.tags,
                    todo.difficulty,
                ),
            );
            Ok(todo)
        })
    }

    /// Mark a todo completed and award its difficulty EXP. Completing an
    /// already-completed todo is a no-op that returns the todo unchanged.
    pub fn complete_todo(&self, id: &str) -> Result<Todo, StoreError> {
        self.commit("complete_todo", move |snapshot, outbox| {
            let index = snapshot
                .todos
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| StoreError::not_found(EntityKind::Todo, id))?;

            if snapshot.todos[index].completed {
                return Ok(snapshot.todos[index].clone());
            }

            snapshot.todos[index].completed = true;
            snapshot.todos[index].completed_at = Some(Utc::now());
            let todo = snapshot.todos[index].clone();

            let exp = todo.difficulty.exp();
            let (old_level, new_level) = snapshot.user.gain_exp(exp);

            snapshot.log(
                HistoryEntry::record(
                    HistoryKind::Todo,
                    HistoryAction::Completed,
                    &todo.title,
                    &todo.tags,
                    todo.difficulty,
                )
                .exp_gained(exp as i32),
            );
            check_level_up(snapshot, outbox, old_level, new_level);
            info!("todo {} completed (+{} exp)", todo.id, exp);
            Ok(todo)
        })
    }

    /// Inverse of `complete_todo`: clears the completion and takes the
    /// same EXP back (saturating at 0). No-op on a todo that is not
    /// completed.
    pub fn uncomplete_todo(&self, id: &str) -> Result<Todo, StoreError> {
        self.commit("uncomplete_todo", move |snapshot, _outbox| {
            let index = snapshot
                .todos
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| StoreError::not_found(EntityKind::Todo, id))?;

            if !snapshot.todos[index].completed {
                return Ok(snapshot.todos[index].clone());
            }

            snapshot.todos[index].completed = false;
            snapshot.todos[index].completed_at = None;
            let todo = snapshot.todos[index].clone();

            let exp = todo.difficulty.exp();
            snapshot.user.lose_exp(exp);

            snapshot.log(
                HistoryEntry::record(
                    HistoryKind::Todo,
                    HistoryAction::Uncompleted,
                    &todo.title,
                    &todo.tags,
                    todo.difficulty,
                )
                .exp_gained(-(exp as i32)),
            );
            info!("todo {} uncompleted (-{} exp)", todo.id, exp);
            Ok(todo)
        })
    }

    /// Remove a todo. Its history entries persist; its tags stay in the
    /// global set.
    pub fn delete_todo(&self, id: &str) -> Result<(), StoreError> {
        self.commit("delete_todo", move |snapshot, _outbox| {
            let index = snapshot
                .todos
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| StoreError::not_found(EntityKind::Todo, id))?;

            let todo = snapshot.todos.remove(index);
            snapshot.log(
                HistoryEntry::record(
                    HistoryKind::Todo,
                    HistoryAction::Deleted,
                    &todo.title,
                    &todo.tags,
                    todo.difficulty,
                ),
            );
            info!("todo {} deleted", todo.id);
            Ok(())
        })
    }
}
