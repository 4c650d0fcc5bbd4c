#![allow(dead_code)] // not every fixture is used by every test binary

use habitquest::{Difficulty, HabitDraft, HabitKind, Store, TodoDraft};

/// Store whose user starts at the given EXP total.
pub fn store_with_exp(exp: u32) -> Store {
    let store = Store::new();
    store
        .set_state(|snapshot| {
            snapshot.user.exp = exp;
            Ok(())
        })
        .unwrap();
    store
}

/// Store whose user starts at the given health (max stays at default).
pub fn store_with_health(health: i32) -> Store {
    let store = Store::new();
    store
        .set_state(|snapshot| {
            snapshot.user.health = health;
            Ok(())
        })
        .unwrap();
    store
}

pub fn todo(store: &Store, title: &str, difficulty: Difficulty) -> String {
    store
        .add_todo(TodoDraft::new(title).difficulty(difficulty))
        .unwrap()
        .id
}

pub fn habit(store: &Store, title: &str, kind: HabitKind, difficulty: Difficulty) -> String {
    store
        .add_habit(HabitDraft::new(title, kind).difficulty(difficulty))
        .unwrap()
        .id
}
