//! Notification storage abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use common::AppResult;
use domain::Notification;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Document store keyed by recipient contact and creation time.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persist a new notification
    async fn insert(&self, notification: &Notification) -> AppResult<()>;

    /// Notifications for `recipient` created at or after `since`, newest first
    async fn recent(&self, recipient: &str, since: DateTime<Utc>) -> AppResult<Vec<Notification>>;

    /// Flip `is_read`; returns true only if the record changed
    async fn mark_read(&self, id: Uuid) -> AppResult<bool>;
}
