//! Redis-backed notification store.
//!
//! Layout:
//! - `notification:{id}`: JSON document, expires after the configured TTL
//! - `notifications:recipient:{contact}`: sorted set of ids scored by
//!   `created_at` in milliseconds

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::Notification;

use super::NotificationStore;

const NOTIFICATION_PREFIX: &str = "notification:";
const RECIPIENT_PREFIX: &str = "notifications:recipient:";

/// Redis store with connection pooling.
#[derive(Clone)]
pub struct RedisNotificationStore {
    connection: ConnectionManager,
    ttl_seconds: u64,
}

impl RedisNotificationStore {
    /// Open the client and establish the managed connection.
    pub async fn connect(redis_url: &str, ttl_seconds: u64) -> AppResult<Self> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        tracing::info!("Redis notification store connected");

        Ok(Self {
            connection,
            ttl_seconds,
        })
    }

    fn document_key(id: Uuid) -> String {
        format!("{}{}", NOTIFICATION_PREFIX, id)
    }

    fn recipient_key(contact: &str) -> String {
        format!("{}{}", RECIPIENT_PREFIX, contact)
    }
}

/// Highest index score whose document has already expired. Ids at or below
/// it are pruned from the recipient set on every insert.
fn expiry_cutoff(now: DateTime<Utc>, ttl_seconds: u64) -> i64 {
    let ttl_ms = i64::try_from(ttl_seconds)
        .ok()
        .and_then(|secs| secs.checked_mul(1000))
        .unwrap_or(i64::MAX);
    now.timestamp_millis().saturating_sub(ttl_ms)
}

#[async_trait]
impl NotificationStore for RedisNotificationStore {
    async fn insert(&self, notification: &Notification) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(notification)
            .map_err(|e| AppError::internal(format!("Notification serialization error: {}", e)))?;
        let recipient_key = Self::recipient_key(&notification.recipient_contact);

        let _: () = redis::pipe()
            .atomic()
            .set_ex(Self::document_key(notification.id), json, self.ttl_seconds)
            .ignore()
            .zadd(
                &recipient_key,
                notification.id.to_string(),
                notification.created_at.timestamp_millis(),
            )
            .ignore()
            .zrembyscore(
                &recipient_key,
                "-inf",
                expiry_cutoff(Utc::now(), self.ttl_seconds),
            )
            .ignore()
            .expire(&recipient_key, self.ttl_seconds as i64)
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(())
    }

    async fn recent(&self, recipient: &str, since: DateTime<Utc>) -> AppResult<Vec<Notification>> {
        let mut conn = self.connection.clone();
        let recipient_key = Self::recipient_key(recipient);

        let ids: Vec<String> = conn
            .zrevrangebyscore(&recipient_key, "+inf", since.timestamp_millis())
            .await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids
            .iter()
            .map(|id| format!("{}{}", NOTIFICATION_PREFIX, id))
            .collect();
        let documents: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await?;

        // Documents may have expired while their ids linger in the index
        let notifications = documents
            .into_iter()
            .flatten()
            .filter_map(|json| match serde_json::from_str::<Notification>(&json) {
                Ok(n) => Some(n),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable notification document");
                    None
                }
            })
            .collect();

        Ok(notifications)
    }

    async fn mark_read(&self, id: Uuid) -> AppResult<bool> {
        let mut conn = self.connection.clone();
        let key = Self::document_key(id);

        let json: Option<String> = conn.get(&key).await?;
        let Some(json) = json else {
            return Ok(false);
        };

        let mut notification: Notification = serde_json::from_str(&json)
            .map_err(|e| AppError::internal(format!("Notification deserialization error: {}", e)))?;
        if !notification.mark_read() {
            return Ok(false);
        }

        let ttl: i64 = conn.ttl(&key).await?;
        let ttl = if ttl > 0 { ttl as u64 } else { self.ttl_seconds };
        let json = serde_json::to_string(&notification)
            .map_err(|e| AppError::internal(format!("Notification serialization error: {}", e)))?;
        conn.set_ex::<_, _, ()>(&key, json, ttl).await?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn cutoff_trails_now_by_the_ttl() {
        let now = Utc::now();
        let cutoff = expiry_cutoff(now, 3600);
        assert_eq!(cutoff, (now - Duration::hours(1)).timestamp_millis());
    }

    #[test]
    fn cutoff_saturates_for_huge_ttls() {
        let now = Utc::now();
        assert_eq!(expiry_cutoff(now, u64::MAX), now.timestamp_millis().saturating_sub(i64::MAX));
    }
}
