//! Non-blocking notification dispatcher.
//!
//! `record` hands the notification to a bounded queue and returns at once.
//! A single worker drains the queue into the store. Failures never reach the
//! caller: a full or closed queue and store errors are logged and counted.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use chrono::{Duration, Utc};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

use common::AppResult;
use domain::{Notification, NotificationType, DEFAULT_NOTIFICATION_WINDOW_MINUTES};

use super::NotificationStore;

pub struct NotificationDispatcher {
    store: Arc<dyn NotificationStore>,
    sender: RwLock<Option<mpsc::Sender<Notification>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    window_minutes: i64,
}

impl NotificationDispatcher {
    /// Spawn the worker on the current tokio runtime.
    pub fn start(store: Arc<dyn NotificationStore>, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(run_worker(store.clone(), rx));

        Self {
            store,
            sender: RwLock::new(Some(tx)),
            worker: Mutex::new(Some(worker)),
            window_minutes: DEFAULT_NOTIFICATION_WINDOW_MINUTES,
        }
    }

    /// Override the default `list_recent` window.
    pub fn with_window(mut self, minutes: i64) -> Self {
        self.window_minutes = minutes;
        self
    }

    /// Queue a `pending` notification.
    pub fn record(
        &self,
        notification_type: NotificationType,
        recipient_contact: &str,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.enqueue(Notification::new(
            notification_type,
            recipient_contact,
            subject,
            message,
        ));
    }

    /// Queue the same notification once for every distinct recipient.
    pub fn record_all<'r>(
        &self,
        notification_type: NotificationType,
        recipients: impl IntoIterator<Item = &'r str>,
        subject: &str,
        message: &str,
    ) {
        let mut seen = HashSet::new();
        for recipient in recipients {
            if seen.insert(recipient) {
                self.record(notification_type, recipient, subject, message);
            }
        }
    }

    /// Queue a fully built notification.
    pub fn enqueue(&self, notification: Notification) {
        if notification.recipient_contact.trim().is_empty() {
            tracing::debug!(
                notification_type = %notification.notification_type,
                "Notification without recipient skipped"
            );
            return;
        }

        let sent = match self.sender.read() {
            Ok(guard) => match guard.as_ref() {
                Some(tx) => tx.try_send(notification).map_err(|e| match e {
                    mpsc::error::TrySendError::Full(_) => "queue full",
                    mpsc::error::TrySendError::Closed(_) => "queue closed",
                }),
                None => Err("dispatcher stopped"),
            },
            Err(_) => Err("dispatcher lock poisoned"),
        };

        if let Err(reason) = sent {
            metrics::counter!("notifications_dropped_total").increment(1);
            tracing::warn!(reason, "Notification dropped");
        }
    }

    /// Notifications for `recipient` created within the trailing window,
    /// newest first. `None` uses the configured default window.
    pub async fn list_recent(
        &self,
        recipient: &str,
        max_age_minutes: Option<i64>,
    ) -> AppResult<Vec<Notification>> {
        let minutes = max_age_minutes.unwrap_or(self.window_minutes);
        let since = Utc::now() - Duration::minutes(minutes);

        let mut notifications = self.store.recent(recipient, since).await?;
        notifications.retain(|n| n.created_at >= since);
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    /// Mark one notification as read. Malformed or unknown ids, records that
    /// were already read, and store failures all yield `false`.
    pub async fn mark_read(&self, id: &str) -> bool {
        let Ok(id) = Uuid::parse_str(id.trim()) else {
            return false;
        };

        match self.store.mark_read(id).await {
            Ok(changed) => changed,
            Err(e) => {
                tracing::warn!(error = %e, %id, "Failed to mark notification as read");
                false
            }
        }
    }

    /// Close the queue and wait for the worker to store what is left.
    pub async fn shutdown(&self) {
        if let Ok(mut guard) = self.sender.write() {
            guard.take();
        }

        if let Some(worker) = self.worker.lock().await.take() {
            if let Err(e) = worker.await {
                tracing::error!(error = %e, "Notification worker terminated abnormally");
            }
        }
    }
}

async fn run_worker(store: Arc<dyn NotificationStore>, mut rx: mpsc::Receiver<Notification>) {
    while let Some(notification) = rx.recv().await {
        match store.insert(&notification).await {
            Ok(()) => {
                metrics::counter!("notifications_recorded_total").increment(1);
            }
            Err(e) => {
                metrics::counter!("notifications_failed_total").increment(1);
                tracing::warn!(
                    error = %e,
                    notification_type = %notification.notification_type,
                    "Failed to store notification"
                );
            }
        }
    }
    tracing::debug!("Notification worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::{InMemoryNotificationStore, MockNotificationStore};
    use common::AppError;

    #[tokio::test]
    async fn recorded_notifications_reach_the_store() {
        let store = Arc::new(InMemoryNotificationStore::new());
        let dispatcher = NotificationDispatcher::start(store.clone(), 8);

        dispatcher.record(
            NotificationType::RouteCompleted,
            "ana@example.com",
            "Route completed",
            "Route Lisbon loop completed",
        );
        dispatcher.shutdown().await;

        let stored = store.all().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, "pending");
        assert!(!stored[0].is_read);
    }

    #[tokio::test]
    async fn record_all_skips_duplicate_recipients() {
        let store = Arc::new(InMemoryNotificationStore::new());
        let dispatcher = NotificationDispatcher::start(store.clone(), 8);

        dispatcher.record_all(
            NotificationType::InvoicePaid,
            ["owner@example.com", "ops@example.com", "owner@example.com", ""],
            "Invoice paid",
            "Invoice 7 was paid",
        );
        dispatcher.shutdown().await;

        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn store_failures_are_swallowed() {
        let mut store = MockNotificationStore::new();
        store
            .expect_insert()
            .times(1)
            .returning(|_| Err(AppError::internal("connection refused")));

        let dispatcher = NotificationDispatcher::start(Arc::new(store), 8);
        dispatcher.record(NotificationType::InvoicePaid, "ana@example.com", "s", "m");
        dispatcher.shutdown().await;
    }

    #[tokio::test]
    async fn record_after_shutdown_is_dropped() {
        let store = Arc::new(InMemoryNotificationStore::new());
        let dispatcher = NotificationDispatcher::start(store.clone(), 8);
        dispatcher.shutdown().await;

        dispatcher.record(NotificationType::InvoicePaid, "ana@example.com", "s", "m");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn mark_read_rejects_bad_ids() {
        let store = Arc::new(InMemoryNotificationStore::new());
        let dispatcher = NotificationDispatcher::start(store, 8);

        assert!(!dispatcher.mark_read("not-a-uuid").await);
        assert!(!dispatcher.mark_read(&Uuid::new_v4().to_string()).await);
    }

    #[tokio::test]
    async fn mark_read_store_error_yields_false() {
        let mut store = MockNotificationStore::new();
        store
            .expect_mark_read()
            .returning(|_| Err(AppError::internal("timeout")));

        let dispatcher = NotificationDispatcher::start(Arc::new(store), 8);
        assert!(!dispatcher.mark_read(&Uuid::new_v4().to_string()).await);
    }

    #[tokio::test]
    async fn list_recent_honours_the_window() {
        let store = Arc::new(InMemoryNotificationStore::new());
        let now = Utc::now();
        let old = Notification::new(NotificationType::DeliveryUpdated, "rui@example.com", "old", "old")
            .created(now - Duration::minutes(5));
        let fresh =
            Notification::new(NotificationType::DeliveryUpdated, "rui@example.com", "new", "new")
                .created(now - Duration::minutes(1));
        store.insert(&old).await.unwrap();
        store.insert(&fresh).await.unwrap();

        let dispatcher = NotificationDispatcher::start(store, 8);
        let recent = dispatcher.list_recent("rui@example.com", Some(3)).await.unwrap();

        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, fresh.id);
    }
}
