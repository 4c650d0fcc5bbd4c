//! User, tag, and notification operations. None of these write history.

use log::info;

use crate::error::{EntityKind, StoreError};
use crate::model::{Notification, NotificationKind, User, UserPatch};

use super::Store;

impl Store {
    /// Shallow-merge profile/preference fields into the user singleton.
    pub fn update_user(&self, patch: UserPatch) -> Result<User, StoreError> {
        self.commit("update_user", move |snapshot, _outbox| {
            snapshot.user.apply(patch);
            Ok(snapshot.user.clone())
        })
    }

    /// Union one tag into the global set. Blank tags are ignored without
    /// touching the store; duplicates are absorbed by set semantics.
    pub fn add_tag(&self, tag: impl Into<String>) -> Result<(), StoreError> {
        let tag = tag.into();
        if tag.trim().is_empty() {
            return Ok(());
        }

        self.commit("add_tag", move |snapshot, _outbox| {
            snapshot.tags.insert(tag);
            Ok(())
        })
    }

    /// Append a notification.
    pub fn add_notification(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Notification, StoreError> {
        let notification = Notification::new(kind, title, message);
        self.commit("add_notification", move |snapshot, _outbox| {
            snapshot.notifications.push(notification.clone());
            Ok(notification)
        })
    }

    /// Set a notification's read flag.
    pub fn mark_notification_read(&self, id: &str) -> Result<Notification, StoreError> {
        self.commit("mark_notification_read", move |snapshot, _outbox| {
            let notification = snapshot
                .notifications
                .iter_mut()
                .find(|n| n.id == id)
                .ok_or_else(|| StoreError::not_found(EntityKind::Notification, id))?;
            notification.read = true;
            Ok(notification.clone())
        })
    }

    /// Remove a notification by id.
    pub fn remove_notification(&self, id: &str) -> Result<(), StoreError> {
        self.commit("remove_notification", move |snapshot, _outbox| {
            let index = snapshot
                .notifications
                .iter()
                .position(|n| n.id == id)
                .ok_or_else(|| StoreError::not_found(EntityKind::Notification, id))?;
            snapshot.notifications.remove(index);
            info!("notification {} removed", id);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_user_merges_without_history() {
        let store = Store::new();
        let user = store
            .update_user(UserPatch::default().name("Ada").bio("counts things"))
            .unwrap();

        assert_eq!(user.name, "Ada");
        assert_eq!(user.bio, "counts things");
        assert!(store.state().unwrap().history.is_empty());
    }

    #[test]
    fn add_tag_blank_and_duplicate_are_noops() {
        let store = Store::new();
        store.add_tag("  ").unwrap();
        assert!(store.state().unwrap().tags.is_empty());

        store.add_tag("focus").unwrap();
        store.add_tag("focus").unwrap();
        assert_eq!(store.state().unwrap().tags.len(), 1);
    }

    #[test]
    fn notification_lifecycle() {
        let store = Store::new();
        let n = store
            .add_notification(NotificationKind::Reminder, "Stand up", "Stretch your legs")
            .unwrap();
        assert!(!n.read);

        let n = store.mark_notification_read(&n.id).unwrap();
        assert!(n.read);
        assert!(store.state().unwrap().notifications[0].read);

        store.remove_notification(&n.id).unwrap();
        assert!(store.state().unwrap().notifications.is_empty());

        let err = store.remove_notification(&n.id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn no_history_from_user_tag_notification_ops() {
        let store = Store::new();
        store.add_tag("t").unwrap();
        store.update_user(UserPatch::default().name("x")).unwrap();
        let n = store
            .add_notification(NotificationKind::System, "a", "b")
            .unwrap();
        store.mark_notification_read(&n.id).unwrap();
        store.remove_notification(&n.id).unwrap();

        assert!(store.state().unwrap().history.is_empty());
    }
}
