//! Habit mutation operations.

use chrono::Utc;
use log::info;

use crate::error::{EntityKind, StoreError};
use crate::model::{
    Habit, HabitDraft, HabitKind, HabitPatch, HistoryAction, HistoryEntry, HistoryKind,
    Notification, NotificationKind,
};

use super::{check_level_up, Store, StreakRecordEvent, STREAK_RECORD};

impl Store {
    /// Create a habit from a draft. Blank titles are rejected.
    pub fn add_habit(&self, draft: HabitDraft) -> Result<Habit, StoreError> {
        if draft.title.trim().is_empty() {
            return Err(StoreError::InvalidInput(
                "habit title must not be blank".to_string(),
            ));
        }

        self.commit("add_habit", move |snapshot, _outbox| {
            let habit = Habit::from_draft(draft);
            snapshot.absorb_tags(&habit.tags);
            snapshot.log(
                HistoryEntry::record(
                    HistoryKind::Habit,
                    HistoryAction::Added,
                    &habit.title,
                    &habit.tags,
                    habit.difficulty,
                ),
            );
            snapshot.habits.insert(0, habit.clone());
            info!("habit {} added", habit.id);
            Ok(habit)
        })
    }

    /// Shallow-merge a patch into an existing habit. Unknown ids fail with
    /// `NotFound` and write no history.
    pub fn update_habit(&self, id: &str, patch: HabitPatch) -> Result<Habit, StoreError> {
        if matches!(&patch.title, Some(title) if title.trim().is_empty()) {
            return Err(StoreError::InvalidInput(
                "habit title must not be blank".to_string(),
            ));
        }

        self.commit("update_habit", move |snapshot, _outbox| {
            let index = snapshot
                .habits
                .iter()
                .position(|h| h.id == id)
                .ok_or_else(|| StoreError::not_found(EntityKind::Habit, id))?;

            snapshot.habits[index].apply(patch);
            let habit = snapshot.habits[index].clone();
            snapshot.absorb_tags(&habit.tags);
            snapshot.log(
                HistoryEntry::record(
                    HistoryKind::Habit,
                    HistoryAction::Edited,
                    &habit.title,
                    &habit.tags,
                    habit.difficulty,
                ),
            );
            Ok(habit)
        })
    }

    /// Log one completion of a habit.
    ///
    /// Positive habits extend the streak and reward EXP/health; negative
    /// habits reset the streak to 0 and cost EXP/health. A positive streak
    /// beating the previous count past 1 is a new record and, when the
    /// user's streak_records toggle is on, produces a notification in the
    /// same commit.
    pub fn complete_habit(&self, id: &str) -> Result<Habit, StoreError> {
        self.commit("complete_habit", move |snapshot, outbox| {
            let index = snapshot
                .habits
                .iter()
                .position(|h| h.id == id)
                .ok_or_else(|| StoreError::not_found(EntityKind::Habit, id))?;

            let old_streak = snapshot.habits[index].streak;
            let kind = snapshot.habits[index].kind;
            let difficulty = snapshot.habits[index].difficulty;
            let exp = difficulty.exp();
            let health = difficulty.health();

            let (exp_change, health_change, old_level, new_level) = match kind {
                HabitKind::Positive => {
                    snapshot.habits[index].streak = old_streak + 1;
                    let (old_level, new_level) = snapshot.user.gain_exp(exp);
                    snapshot.user.adjust_health(health);
                    (exp as i32, health, old_level, new_level)
                }
                HabitKind::Negative => {
                    snapshot.habits[index].streak = 0;
                    let (old_level, new_level) = snapshot.user.lose_exp(exp);
                    snapshot.user.adjust_health(-health);
                    (-(exp as i32), -health, old_level, new_level)
                }
            };
            snapshot.habits[index].last_completed = Some(Utc::now());
            let habit = snapshot.habits[index].clone();

            let is_new_record =
                kind == HabitKind::Positive && habit.streak > old_streak && habit.streak > 1;
            if is_new_record {
                if snapshot.user.toggles.streak_records {
                    snapshot.notifications.insert(
                        0,
                        Notification::new(
                            NotificationKind::StreakRecord,
                            "New streak record!",
                            format!("{} is on a {}-streak.", habit.title, habit.streak),
                        ),
                    );
                }
                outbox.enqueue(
                    STREAK_RECORD,
                    &StreakRecordEvent {
                        habit_id: habit.id.clone(),
                        title: habit.title.clone(),
                        streak: habit.streak,
                    },
                );
            }

            snapshot.log(
                HistoryEntry::record(
                    HistoryKind::Habit,
                    HistoryAction::Completed,
                    &habit.title,
                    &habit.tags,
                    difficulty,
                )
                .exp_gained(exp_change)
                .health_change(health_change),
            );
            check_level_up(snapshot, outbox, old_level, new_level);
            info!(
                "habit {} completed (streak {}, {:+} exp, {:+} health)",
                habit.id, habit.streak, exp_change, health_change
            );
            Ok(habit)
        })
    }

    /// Take back the most recent completion: streak drops by one and the
    /// EXP/health delta of the habit's kind is reversed. A habit at streak
    /// 0 is left untouched (deep-equal snapshot).
    pub fn uncomplete_habit(&self, id: &str) -> Result<Habit, StoreError> {
        self.commit("uncomplete_habit", move |snapshot, _outbox| {
            let index = snapshot
                .habits
                .iter()
                .position(|h| h.id == id)
                .ok_or_else(|| StoreError::not_found(EntityKind::Habit, id))?;

            if snapshot.habits[index].streak == 0 {
                return Ok(snapshot.habits[index].clone());
            }

            let kind = snapshot.habits[index].kind;
            let difficulty = snapshot.habits[index].difficulty;
            let exp = difficulty.exp();
            let health = difficulty.health();

            snapshot.habits[index].streak -= 1;
            if snapshot.habits[index].streak == 0 {
                snapshot.habits[index].last_completed = None;
            }

            let (exp_change, health_change) = match kind {
                HabitKind::Positive => {
                    snapshot.user.lose_exp(exp);
                    snapshot.user.adjust_health(-health);
                    (-(exp as i32), -health)
                }
                HabitKind::Negative => {
                    snapshot.user.gain_exp(exp);
                    snapshot.user.adjust_health(health);
                    (exp as i32, health)
                }
            };
            let habit = snapshot.habits[index].clone();

            snapshot.log(
                HistoryEntry::record(
                    HistoryKind::Habit,
                    HistoryAction::Uncompleted,
                    &habit.title,
                    &habit.tags,
                    difficulty,
                )
                .exp_gained(exp_change)
                .health_change(health_change),
            );
            info!(
                "habit {} uncompleted (streak {}, {:+} exp, {:+} health)",
                habit.id, habit.streak, exp_change, health_change
            );
            Ok(habit)
        })
    }

    /// Remove a habit. Its history entries persist; its tags stay in the
    /// global set.
    pub fn delete_habit(&self, id: &str) -> Result<(), StoreError> {
        self.commit("delete_habit", move |snapshot, _outbox| {
            let index = snapshot
                .habits
                .iter()
                .position(|h| h.id == id)
                .ok_or_else(|| StoreError::not_found(EntityKind::Habit, id))?;

            let habit = snapshot.habits.remove(index);
            snapshot.log(
                HistoryEntry::record(
                    HistoryKind::Habit,
                    HistoryAction::Deleted,
                    &habit.title,
                    &habit.tags,
                    habit.difficulty,
                ),
            );
            info!("habit {} deleted", habit.id);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;

    #[test]
    fn positive_completion_rewards() {
        let store = Store::new();
        let habit = store
            .add_habit(HabitDraft::new("Run", HabitKind::Positive).difficulty(Difficulty::Medium))
            .unwrap();

        let before = store.state().unwrap();
        let updated = store.complete_habit(&habit.id).unwrap();

        let state = store.state().unwrap();
        assert_eq!(updated.streak, 1);
        assert_eq!(state.user.exp, before.user.exp + 2);
        // Health starts full, so the gain clamps at max_health.
        assert_eq!(state.user.health, state.user.max_health);
        assert!(updated.last_completed.is_some());
        assert_eq!(state.history[0].exp_gained, Some(2));
        assert_eq!(state.history[0].health_change, Some(2));
    }

    #[test]
    fn negative_completion_resets_and_penalizes() {
        let store = Store::new();
        let habit = store
            .add_habit(
                HabitDraft::new("Junk food", HabitKind::Negative).difficulty(Difficulty::Hard),
            )
            .unwrap();

        let before = store.state().unwrap();
        let updated = store.complete_habit(&habit.id).unwrap();

        let state = store.state().unwrap();
        assert_eq!(updated.streak, 0);
        assert_eq!(state.user.exp, before.user.exp.saturating_sub(3));
        assert_eq!(state.user.health, before.user.health - 3);
        assert_eq!(state.history[0].exp_gained, Some(-3));
        assert_eq!(state.history[0].health_change, Some(-3));
    }

    #[test]
    fn streak_record_notification_on_second_completion() {
        let store = Store::new();
        let habit = store
            .add_habit(HabitDraft::new("Read", HabitKind::Positive))
            .unwrap();

        store.complete_habit(&habit.id).unwrap();
        // streak 1 is not a record
        assert!(store.state().unwrap().notifications.is_empty());

        store.complete_habit(&habit.id).unwrap();
        let state = store.state().unwrap();
        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.notifications[0].kind, NotificationKind::StreakRecord);
    }

    #[test]
    fn streak_record_respects_toggle() {
        let store = Store::new();
        store
            .set_state(|snapshot| {
                snapshot.user.toggles.streak_records = false;
                Ok(())
            })
            .unwrap();
        let habit = store
            .add_habit(HabitDraft::new("Read", HabitKind::Positive))
            .unwrap();

        store.complete_habit(&habit.id).unwrap();
        store.complete_habit(&habit.id).unwrap();

        assert!(store.state().unwrap().notifications.is_empty());
    }

    #[test]
    fn uncomplete_at_streak_zero_is_identity() {
        let store = Store::new();
        let habit = store
            .add_habit(HabitDraft::new("Run", HabitKind::Positive))
            .unwrap();

        let before = store.state().unwrap();
        store.uncomplete_habit(&habit.id).unwrap();

        assert_eq!(store.state().unwrap(), before);
    }

    #[test]
    fn uncomplete_reverses_positive_delta() {
        let store = Store::new();
        // Drop health below max so the +1/-1 round trip is observable.
        store
            .set_state(|snapshot| {
                snapshot.user.health = 40;
                Ok(())
            })
            .unwrap();
        let habit = store
            .add_habit(HabitDraft::new("Run", HabitKind::Positive))
            .unwrap();

        store.complete_habit(&habit.id).unwrap();
        let mid = store.state().unwrap();
        assert_eq!(mid.user.health, 41);
        assert_eq!(mid.user.exp, 1);

        let updated = store.uncomplete_habit(&habit.id).unwrap();
        let state = store.state().unwrap();
        assert_eq!(updated.streak, 0);
        assert!(updated.last_completed.is_none());
        assert_eq!(state.user.health, 40);
        assert_eq!(state.user.exp, 0);
        assert_eq!(state.history[0].action, HistoryAction::Uncompleted);
        assert_eq!(state.history[0].exp_gained, Some(-1));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store = Store::new();
        for result in [
            store.complete_habit("missing").map(|_| ()),
            store.uncomplete_habit("missing").map(|_| ()),
            store.delete_habit("missing"),
            store
                .update_habit("missing", HabitPatch::default())
                .map(|_| ()),
        ] {
            assert!(matches!(result, Err(StoreError::NotFound { .. })));
        }
        assert!(store.state().unwrap().history.is_empty());
    }
}
