//! Logistics Service Library
//!
//! Persistence, the consistency engine services, the notification side
//! channel and the bulk import/export adapters of the courier backend.

pub mod config;
pub mod infra;
pub mod notifications;
pub mod repository;
pub mod service;
pub mod transfer;

use std::sync::Arc;

use tracing::info;

use common::{AppResult, NotificationConfig};

use crate::config::LogisticsServiceConfig;
use crate::infra::Database;
use crate::notifications::{
    InMemoryNotificationStore, NotificationDispatcher, NotificationStore, RedisNotificationStore,
};
use crate::service::Services;

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = LogisticsServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database.url).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Redis when a URL is configured, process memory otherwise.
pub async fn notification_store(
    config: &NotificationConfig,
) -> AppResult<Arc<dyn NotificationStore>> {
    match &config.redis_url {
        Some(url) => {
            let store = RedisNotificationStore::connect(url, config.ttl_seconds).await?;
            info!("Notifications stored in Redis");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("No Redis URL configured; notifications are kept in memory");
            Ok(Arc::new(InMemoryNotificationStore::new()))
        }
    }
}

/// A connected database plus every service wired on top of it.
pub struct Runtime {
    pub database: Database,
    pub services: Services,
    pub notifier: Arc<NotificationDispatcher>,
}

impl Runtime {
    /// Connect, migrate and start the notification worker.
    pub async fn start(config: &LogisticsServiceConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let database = Database::connect_with(&config.database).await?;
        let store = notification_store(&config.notifications).await?;
        let notifier = Arc::new(
            NotificationDispatcher::start(store, config.notifications.queue_capacity)
                .with_window(config.notifications.window_minutes),
        );
        let services = Services::from_connection(database.get_connection(), notifier.clone());

        Ok(Self {
            database,
            services,
            notifier,
        })
    }

    /// Drain pending notifications before the process exits.
    pub async fn shutdown(&self) {
        self.notifier.shutdown().await;
    }
}
