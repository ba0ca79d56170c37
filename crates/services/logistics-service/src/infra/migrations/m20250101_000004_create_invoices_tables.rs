//! Migration: invoices and invoice items.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Invoices::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Invoices::IdInvoice)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Invoices::UserId).uuid().null())
                    .col(
                        ColumnDef::new(Invoices::InvoiceStatus)
                            .string_len(50)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(Invoices::InvoiceType).string_len(50).not_null())
                    .col(ColumnDef::new(Invoices::Quantity).integer().null())
                    .col(
                        ColumnDef::new(Invoices::InvoiceDatetime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Invoices::Cost).decimal_len(12, 2).not_null())
                    .col(
                        ColumnDef::new(Invoices::Paid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Invoices::PaymentMethod).string_len(50).not_null())
                    .col(ColumnDef::new(Invoices::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Invoices::Address).string_len(255).not_null())
                    .col(ColumnDef::new(Invoices::Contact).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Invoices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invoices::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoices_user_id")
                            .from(Invoices::Table, Invoices::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InvoiceItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvoiceItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InvoiceItems::InvoiceId).uuid().not_null())
                    .col(
                        ColumnDef::new(InvoiceItems::ShipmentType)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(InvoiceItems::Weight).decimal_len(10, 2).not_null())
                    .col(
                        ColumnDef::new(InvoiceItems::DeliverySpeed)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(InvoiceItems::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(InvoiceItems::UnitPrice)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(InvoiceItems::Notes).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoice_items_invoice_id")
                            .from(InvoiceItems::Table, InvoiceItems::InvoiceId)
                            .to(Invoices::Table, Invoices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invoice_items_invoice_id")
                    .table(InvoiceItems::Table)
                    .col(InvoiceItems::InvoiceId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InvoiceItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Invoices {
    Table,
    Id,
    IdInvoice,
    UserId,
    InvoiceStatus,
    InvoiceType,
    Quantity,
    InvoiceDatetime,
    Cost,
    Paid,
    PaymentMethod,
    Name,
    Address,
    Contact,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InvoiceItems {
    Table,
    Id,
    InvoiceId,
    ShipmentType,
    Weight,
    DeliverySpeed,
    Quantity,
    UnitPrice,
    Notes,
}
