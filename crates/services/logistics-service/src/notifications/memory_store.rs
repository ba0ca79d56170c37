//! Process-local notification store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use common::AppResult;
use domain::Notification;

use super::NotificationStore;

#[derive(Default)]
pub struct InMemoryNotificationStore {
    notifications: RwLock<HashMap<Uuid, Notification>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.notifications.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notifications.read().await.is_empty()
    }

    /// Every stored notification, newest first.
    pub async fn all(&self) -> Vec<Notification> {
        let mut all: Vec<_> = self.notifications.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn insert(&self, notification: &Notification) -> AppResult<()> {
        self.notifications
            .write()
            .await
            .insert(notification.id, notification.clone());
        Ok(())
    }

    async fn recent(&self, recipient: &str, since: DateTime<Utc>) -> AppResult<Vec<Notification>> {
        let mut matching: Vec<_> = self
            .notifications
            .read()
            .await
            .values()
            .filter(|n| n.recipient_contact == recipient && n.created_at >= since)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn mark_read(&self, id: Uuid) -> AppResult<bool> {
        Ok(self
            .notifications
            .write()
            .await
            .get_mut(&id)
            .map(Notification::mark_read)
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use domain::NotificationType;

    #[tokio::test]
    async fn recent_is_scoped_to_recipient_and_sorted() {
        let store = InMemoryNotificationStore::new();
        let now = Utc::now();

        let older = Notification::new(NotificationType::RouteUpdated, "ana@example.com", "a", "a")
            .created(now - Duration::seconds(30));
        let newer = Notification::new(NotificationType::RouteCompleted, "ana@example.com", "b", "b")
            .created(now - Duration::seconds(10));
        let foreign = Notification::new(NotificationType::RouteCompleted, "rui@example.com", "c", "c");

        for n in [&older, &newer, &foreign] {
            store.insert(n).await.unwrap();
        }

        let recent = store
            .recent("ana@example.com", now - Duration::minutes(1))
            .await
            .unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, newer.id);
        assert_eq!(recent[1].id, older.id);
    }

    #[tokio::test]
    async fn mark_read_reports_change_once() {
        let store = InMemoryNotificationStore::new();
        let n = Notification::new(NotificationType::InvoicePaid, "ana@example.com", "s", "m");
        store.insert(&n).await.unwrap();

        assert!(store.mark_read(n.id).await.unwrap());
        assert!(!store.mark_read(n.id).await.unwrap());
        assert!(!store.mark_read(Uuid::new_v4()).await.unwrap());
    }
}
