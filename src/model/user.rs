use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::datefmt::DateFormat;

/// Avatars granted as the user levels up. Consulted whenever a commit
/// raises the derived level; avatars between the old and new level are
/// considered newly unlocked.
pub const AVATAR_UNLOCKS: &[(u32, &str)] = &[
    (1, "wanderer"),
    (2, "squire"),
    (3, "scout"),
    (5, "knight"),
    (8, "wizard"),
    (10, "champion"),
];

/// Avatars unlocked strictly after `old_level`, up to and including
/// `new_level`. Empty when the level did not increase.
pub fn avatars_unlocked(old_level: u32, new_level: u32) -> Vec<&'static str> {
    AVATAR_UNLOCKS
        .iter()
        .filter(|(level, _)| *level > old_level && *level <= new_level)
        .map(|(_, avatar)| *avatar)
        .collect()
}

/// Which kinds of notifications the user wants generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationToggles {
    pub reminders: bool,
    pub streak_records: bool,
    pub level_ups: bool,
    pub system: bool,
}

impl Default for NotificationToggles {
    fn default() -> Self {
        NotificationToggles {
            reminders: true,
            streak_records: true,
            level_ups: true,
            system: true,
        }
    }
}

/// Display and locale preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub language: String,
    pub timezone: String,
    pub date_format: DateFormat,
    pub dark_mode: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            language: "en".to_string(),
            timezone: "UTC".to_string(),
            date_format: DateFormat::MonthDayYear,
            dark_mode: false,
        }
    }
}

/// The singleton player record.
///
/// `level` is never stored: it is derived from `exp` on every read so it
/// cannot drift from the formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub bio: String,
    pub location: String,
    pub birthday: Option<NaiveDate>,
    pub join_date: DateTime<Utc>,
    pub avatar: String,
    pub health: i32,
    pub max_health: i32,
    pub exp: u32,
    pub preferences: Preferences,
    pub toggles: NotificationToggles,
}

impl Default for User {
    fn default() -> Self {
        User {
            name: String::new(),
            username: String::new(),
            email: String::new(),
            password: String::new(),
            bio: String::new(),
            location: String::new(),
            birthday: None,
            join_date: Utc::now(),
            avatar: "wanderer".to_string(),
            health: 50,
            max_health: 50,
            exp: 0,
            preferences: Preferences::default(),
            toggles: NotificationToggles::default(),
        }
    }
}

impl User {
    /// Derived level: `exp / 10 + 1`.
    pub fn level(&self) -> u32 {
        self.exp / 10 + 1
    }

    /// Add or remove health, clamped to `[0, max_health]`.
    pub(crate) fn adjust_health(&mut self, delta: i32) {
        self.health = (self.health + delta).clamp(0, self.max_health);
    }

    /// Add EXP; returns (old_level, new_level).
    pub(crate) fn gain_exp(&mut self, amount: u32) -> (u32, u32) {
        let old = self.level();
        self.exp += amount;
        (old, self.level())
    }

    /// Remove EXP, saturating at 0; returns (old_level, new_level).
    pub(crate) fn lose_exp(&mut self, amount: u32) -> (u32, u32) {
        let old = self.level();
        self.exp = self.exp.saturating_sub(amount);
        (old, self.level())
    }

    pub(crate) fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(password) = patch.password {
            self.password = password;
        }
        if let Some(bio) = patch.bio {
            self.bio = bio;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(birthday) = patch.birthday {
            self.birthday = birthday;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = avatar;
        }
        if let Some(preferences) = patch.preferences {
            self.preferences = preferences;
        }
        if let Some(toggles) = patch.toggles {
            self.toggles = toggles;
        }
    }
}

/// Field-by-field update for `update_user`.
///
/// Gameplay fields (`health`, `max_health`, `exp`) are owned by the
/// complete/uncomplete operations and absent here.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub birthday: Option<Option<NaiveDate>>,
    pub avatar: Option<String>,
    pub preferences: Option<Preferences>,
    pub toggles: Option<NotificationToggles>,
}

impl UserPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn toggles(mut self, toggles: NotificationToggles) -> Self {
        self.toggles = Some(toggles);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_is_derived_from_exp() {
        let mut user = User::default();
        assert_eq!(user.level(), 1);

        user.exp = 9;
        assert_eq!(user.level(), 1);

        user.exp = 10;
        assert_eq!(user.level(), 2);

        user.exp = 12;
        assert_eq!(user.level(), 2);
    }

    #[test]
    fn health_clamps_both_ends() {
        let mut user = User::default();
        user.adjust_health(100);
        assert_eq!(user.health, user.max_health);

        user.adjust_health(-1000);
        assert_eq!(user.health, 0);
    }

    #[test]
    fn lose_exp_saturates() {
        let mut user = User::default();
        user.exp = 2;
        let (old, new) = user.lose_exp(5);
        assert_eq!(user.exp, 0);
        assert_eq!((old, new), (1, 1));
    }

    #[test]
    fn unlocks_between_levels() {
        assert_eq!(avatars_unlocked(1, 3), vec!["squire", "scout"]);
        assert_eq!(avatars_unlocked(4, 5), vec!["knight"]);
        assert!(avatars_unlocked(3, 3).is_empty());
        assert!(avatars_unlocked(5, 4).is_empty());
    }
}
