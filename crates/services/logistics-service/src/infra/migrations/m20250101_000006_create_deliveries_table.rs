//! Migration: deliveries.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users_table::Users;
use super::m20250101_000002_create_employees_tables::Employees;
use super::m20250101_000004_create_invoices_tables::Invoices;
use super::m20250101_000005_create_routes_table::Routes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Deliveries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Deliveries::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Deliveries::TrackingNumber)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Deliveries::Description).text().null())
                    .col(ColumnDef::new(Deliveries::SenderName).string_len(100).not_null())
                    .col(ColumnDef::new(Deliveries::SenderAddress).string_len(255).not_null())
                    .col(ColumnDef::new(Deliveries::SenderPhone).string_len(20).null())
                    .col(ColumnDef::new(Deliveries::SenderEmail).string_len(255).null())
                    .col(ColumnDef::new(Deliveries::RecipientName).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Deliveries::RecipientAddress)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Deliveries::RecipientPhone).string_len(20).null())
                    .col(ColumnDef::new(Deliveries::RecipientEmail).string_len(255).null())
                    .col(ColumnDef::new(Deliveries::ItemType).string_len(50).null())
                    .col(ColumnDef::new(Deliveries::Weight).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(Deliveries::Dimensions).string_len(50).null())
                    .col(
                        ColumnDef::new(Deliveries::Status)
                            .string_len(20)
                            .not_null()
                            .default("Registered"),
                    )
                    .col(ColumnDef::new(Deliveries::Priority).string_len(20).null())
                    .col(
                        ColumnDef::new(Deliveries::RegisteredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Deliveries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Deliveries::InTransition)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Deliveries::Destination).string_len(255).null())
                    .col(ColumnDef::new(Deliveries::DeliveryDate).date().null())
                    .col(ColumnDef::new(Deliveries::InvoiceId).uuid().null())
                    .col(ColumnDef::new(Deliveries::DriverId).uuid().null())
                    .col(ColumnDef::new(Deliveries::ClientId).uuid().null())
                    .col(ColumnDef::new(Deliveries::RouteId).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deliveries_invoice_id")
                            .from(Deliveries::Table, Deliveries::InvoiceId)
                            .to(Invoices::Table, Invoices::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deliveries_driver_id")
                            .from(Deliveries::Table, Deliveries::DriverId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deliveries_client_id")
                            .from(Deliveries::Table, Deliveries::ClientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deliveries_route_id")
                            .from(Deliveries::Table, Deliveries::RouteId)
                            .to(Routes::Table, Routes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deliveries_route_id")
                    .table(Deliveries::Table)
                    .col(Deliveries::RouteId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Deliveries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Deliveries {
    Table,
    Id,
    TrackingNumber,
    Description,
    SenderName,
    SenderAddress,
    SenderPhone,
    SenderEmail,
    RecipientName,
    RecipientAddress,
    RecipientPhone,
    RecipientEmail,
    ItemType,
    Weight,
    Dimensions,
    Status,
    Priority,
    RegisteredAt,
    UpdatedAt,
    InTransition,
    Destination,
    DeliveryDate,
    InvoiceId,
    DriverId,
    ClientId,
    RouteId,
}
