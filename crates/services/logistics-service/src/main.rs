//! Logistics Service - operator CLI for migrations, bulk transfer and
//! notification inspection.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use domain::{Actor, UserRole};
use logistics_service_lib::config::LogisticsServiceConfig;
use logistics_service_lib::service::ServiceContainer;
use logistics_service_lib::transfer::{self, EntityKind, Format};
use logistics_service_lib::{MigrateAction, Runtime};

#[derive(Parser)]
#[command(name = "logistics-service")]
#[command(about = "Courier logistics backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Create entities from a JSON or CSV file
    Import {
        #[arg(value_enum)]
        entity: EntityKind,
        file: PathBuf,
        #[arg(long, value_enum, default_value = "json")]
        format: Format,
        /// Contact that receives the import notification
        #[arg(long, env = "LOGISTICS_OPERATOR_CONTACT", default_value = "operator@localhost")]
        actor_contact: String,
    },
    /// Write entities to stdout or a file
    Export {
        #[arg(value_enum)]
        entity: EntityKind,
        #[arg(long, value_enum, default_value = "json")]
        format: Format,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, env = "LOGISTICS_OPERATOR_CONTACT", default_value = "operator@localhost")]
        actor_contact: String,
    },
    /// Inspect stored notifications
    Notifications {
        #[command(subcommand)]
        action: NotificationCommands,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[derive(Subcommand)]
enum NotificationCommands {
    /// Recent notifications for one recipient, newest first
    Recent {
        contact: String,
        #[arg(long)]
        minutes: Option<i64>,
    },
    /// Mark a notification as read
    MarkRead { id: String },
}

fn operator(contact: String) -> Actor {
    Actor::new(Uuid::nil(), UserRole::Admin, contact)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            return logistics_service_lib::run_migrations(migrate_action).await;
        }
        other => other,
    };

    let config = LogisticsServiceConfig::from_env();
    let runtime = Runtime::start(&config).await?;
    let result = run(&runtime, command).await;
    runtime.shutdown().await;
    result
}

async fn run(runtime: &Runtime, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Migrate { .. } => {}
        Commands::Import {
            entity,
            file,
            format,
            actor_contact,
        } => {
            let reader = BufReader::new(File::open(&file)?);
            let report = transfer::import(
                &runtime.services,
                &operator(actor_contact),
                entity,
                format,
                reader,
            )
            .await?;

            println!("Imported {} {}", report.imported, entity.as_str());
            for (row, message) in &report.failed {
                println!("  row {}: {}", row, message);
            }
        }
        Commands::Export {
            entity,
            format,
            output,
            actor_contact,
        } => {
            let actor = operator(actor_contact);
            let count = match output {
                Some(path) => {
                    let writer = BufWriter::new(File::create(&path)?);
                    transfer::export(&runtime.services, &actor, entity, format, writer).await?
                }
                None => {
                    transfer::export(&runtime.services, &actor, entity, format, io::stdout().lock())
                        .await?
                }
            };
            tracing::info!(count, entity = entity.as_str(), "Export written");
        }
        Commands::Notifications { action } => match action {
            NotificationCommands::Recent { contact, minutes } => {
                let notifications = runtime
                    .services
                    .notifications()
                    .list_recent(&contact, minutes)
                    .await?;
                println!("{}", serde_json::to_string_pretty(&notifications)?);
            }
            NotificationCommands::MarkRead { id } => {
                let changed = runtime.services.notifications().mark_read(&id).await;
                println!("{}", if changed { "marked read" } else { "unchanged" });
            }
        },
    }

    Ok(())
}
