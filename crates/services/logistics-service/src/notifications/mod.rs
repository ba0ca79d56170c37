//! Best-effort notification side-channel.
//!
//! Writes are queued after the business transaction commits and stored by a
//! background worker; nothing in here can fail the caller's operation.

mod dispatcher;
mod memory_store;
mod redis_store;
mod store;

pub use dispatcher::NotificationDispatcher;
pub use memory_store::InMemoryNotificationStore;
pub use redis_store::RedisNotificationStore;
pub use store::NotificationStore;

#[cfg(any(test, feature = "test-utils"))]
pub use store::MockNotificationStore;
