//! Bulk import and export of entities as JSON arrays or CSV files.
//!
//! Imports go through the regular services, so every row is validated and
//! checked exactly like an interactive write. A bad row is reported and
//! skipped; it never aborts the rest of the file.

mod records;

pub use records::{
    DeliveryRecord, InvoiceDocument, InvoiceItemRecord, InvoiceRecord, RouteRecord,
    VehicleRecord, WarehouseRecord,
};

use std::future::Future;
use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use common::{AppError, AppResult};
use domain::{Actor, Notification, NotificationType, NOTIFICATION_STATUS_SENT};

use crate::service::ServiceContainer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Json,
    Csv,
}

impl Format {
    pub fn label(&self) -> &'static str {
        match self {
            Format::Json => "JSON",
            Format::Csv => "CSV",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EntityKind {
    Warehouses,
    Vehicles,
    Routes,
    Deliveries,
    Invoices,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Warehouses => "warehouses",
            EntityKind::Vehicles => "vehicles",
            EntityKind::Routes => "routes",
            EntityKind::Deliveries => "deliveries",
            EntityKind::Invoices => "invoices",
        }
    }
}

/// Outcome of one import. `failed` holds 1-based row numbers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub failed: Vec<(usize, String)>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Parse every row independently; a row that does not deserialize becomes an
/// `Err` entry instead of failing the whole document.
fn parse_rows<R: DeserializeOwned>(
    format: Format,
    reader: impl Read,
) -> AppResult<Vec<Result<R, String>>> {
    match format {
        Format::Json => {
            let values: Vec<serde_json::Value> = serde_json::from_reader(reader)
                .map_err(|e| AppError::validation(format!("JSON must contain a list: {}", e)))?;
            Ok(values
                .into_iter()
                .map(|v| serde_json::from_value(v).map_err(|e| e.to_string()))
                .collect())
        }
        Format::Csv => {
            let mut csv_reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_reader(reader);
            Ok(csv_reader
                .deserialize()
                .map(|row| row.map_err(|e| e.to_string()))
                .collect())
        }
    }
}

fn write_rows<R: Serialize>(format: Format, writer: impl Write, rows: &[R]) -> AppResult<()> {
    match format {
        Format::Json => serde_json::to_writer_pretty(writer, rows)
            .map_err(|e| AppError::internal(format!("JSON export failed: {}", e))),
        Format::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            for row in rows {
                csv_writer
                    .serialize(row)
                    .map_err(|e| AppError::internal(format!("CSV export failed: {}", e)))?;
            }
            csv_writer
                .flush()
                .map_err(|e| AppError::internal(format!("CSV export failed: {}", e)))
        }
    }
}

async fn import_each<R, F, Fut>(rows: Vec<Result<R, String>>, mut create: F) -> ImportReport
where
    F: FnMut(R) -> Fut,
    Fut: Future<Output = AppResult<()>>,
{
    let mut report = ImportReport::default();
    for (idx, row) in rows.into_iter().enumerate() {
        let outcome = match row {
            Ok(record) => create(record).await.map_err(|e| e.user_message()),
            Err(parse_error) => Err(parse_error),
        };
        match outcome {
            Ok(()) => report.imported += 1,
            Err(message) => {
                tracing::warn!(row = idx + 1, %message, "Import row rejected");
                report.failed.push((idx + 1, message));
            }
        }
    }
    report
}

/// Create one entity per row of `reader`.
#[tracing::instrument(skip(services, actor, reader), fields(entity = kind.as_str(), format = format.label()))]
pub async fn import(
    services: &dyn ServiceContainer,
    actor: &Actor,
    kind: EntityKind,
    format: Format,
    reader: impl Read,
) -> AppResult<ImportReport> {
    let report = match kind {
        EntityKind::Warehouses => {
            let fleet = services.fleet();
            let rows = parse_rows::<WarehouseRecord>(format, reader)?;
            import_each(rows, |r| {
                let fleet = fleet.clone();
                async move {
                    fleet.upsert_warehouse(actor, r.into(), None).await?;
                    Ok(())
                }
            })
            .await
        }
        EntityKind::Vehicles => {
            let fleet = services.fleet();
            let rows = parse_rows::<VehicleRecord>(format, reader)?;
            import_each(rows, |r| {
                let fleet = fleet.clone();
                async move {
                    fleet.upsert_vehicle(actor, r.into(), None).await?;
                    Ok(())
                }
            })
            .await
        }
        EntityKind::Routes => {
            let routes = services.routes();
            let rows = parse_rows::<RouteRecord>(format, reader)?;
            import_each(rows, |r| {
                let routes = routes.clone();
                async move {
                    routes.upsert_route(actor, r.into_input()?, None).await?;
                    Ok(())
                }
            })
            .await
        }
        EntityKind::Deliveries => {
            let deliveries = services.deliveries();
            let rows = parse_rows::<DeliveryRecord>(format, reader)?;
            import_each(rows, |r| {
                let deliveries = deliveries.clone();
                async move {
                    deliveries.upsert_delivery(actor, r.into_input()?, None).await?;
                    Ok(())
                }
            })
            .await
        }
        EntityKind::Invoices => {
            let invoices = services.invoices();
            let rows: Vec<Result<InvoiceDocument, String>> = match format {
                Format::Json => parse_rows(format, reader)?,
                Format::Csv => parse_rows::<InvoiceRecord>(format, reader)?
                    .into_iter()
                    .map(|row| row.map(InvoiceDocument::from))
                    .collect(),
            };
            import_each(rows, |r| {
                let invoices = invoices.clone();
                async move {
                    invoices.upsert_invoice(actor, r.into(), None).await?;
                    Ok(())
                }
            })
            .await
        }
    };

    tracing::info!(imported = report.imported, failed = report.failed.len(), "Import finished");
    services.notifications().enqueue(
        Notification::new(
            NotificationType::DataImported,
            actor.contact.as_str(),
            format!("{} imported", kind.as_str()),
            format!(
                "Imported {} {} from {} ({} rejected)",
                report.imported,
                kind.as_str(),
                format.label(),
                report.failed.len()
            ),
        )
        .with_status(NOTIFICATION_STATUS_SENT),
    );
    Ok(report)
}

/// Write every entity of `kind` visible to `actor`; returns the row count.
#[tracing::instrument(skip(services, actor, writer), fields(entity = kind.as_str(), format = format.label()))]
pub async fn export(
    services: &dyn ServiceContainer,
    actor: &Actor,
    kind: EntityKind,
    format: Format,
    writer: impl Write,
) -> AppResult<usize> {
    let count = match kind {
        EntityKind::Warehouses => {
            let rows: Vec<WarehouseRecord> = services
                .fleet()
                .list_warehouses()
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
            write_rows(format, writer, &rows)?;
            rows.len()
        }
        EntityKind::Vehicles => {
            let rows: Vec<VehicleRecord> = services
                .fleet()
                .list_vehicles()
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
            write_rows(format, writer, &rows)?;
            rows.len()
        }
        EntityKind::Routes => {
            let rows: Vec<RouteRecord> = services
                .routes()
                .list_routes(actor)
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
            write_rows(format, writer, &rows)?;
            rows.len()
        }
        EntityKind::Deliveries => {
            let rows: Vec<DeliveryRecord> = services
                .deliveries()
                .list_deliveries(actor)
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
            write_rows(format, writer, &rows)?;
            rows.len()
        }
        EntityKind::Invoices => {
            let docs: Vec<InvoiceDocument> = services
                .invoices()
                .list_invoices(actor)
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
            match format {
                Format::Json => write_rows(format, writer, &docs)?,
                Format::Csv => {
                    let headers: Vec<&InvoiceRecord> = docs.iter().map(|d| &d.invoice).collect();
                    write_rows(format, writer, &headers)?
                }
            }
            docs.len()
        }
    };

    services.notifications().enqueue(
        Notification::new(
            NotificationType::DataExported,
            actor.contact.as_str(),
            format!("{} exported", kind.as_str()),
            format!("Exported {} {} to {}", count, kind.as_str(), format.label()),
        )
        .with_status(NOTIFICATION_STATUS_SENT),
    );
    Ok(count)
}
