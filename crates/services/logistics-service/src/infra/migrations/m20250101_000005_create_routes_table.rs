//! Migration: routes, with the unique (driver, vehicle, date) slot index.

use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_employees_tables::Employees;
use super::m20250101_000003_create_fleet_tables::{Vehicles, Warehouses};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Routes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Routes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Routes::Description).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Routes::DeliveryStatus)
                            .string_len(20)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(Routes::DeliveryDate).date().not_null())
                    .col(ColumnDef::new(Routes::DeliveryStartTime).time().not_null())
                    .col(ColumnDef::new(Routes::DeliveryEndTime).time().not_null())
                    .col(
                        ColumnDef::new(Routes::ExpectedDurationMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Routes::KmsTravelled)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Routes::DriverNotes).text().null())
                    .col(ColumnDef::new(Routes::DriverId).uuid().null())
                    .col(ColumnDef::new(Routes::VehicleId).uuid().null())
                    .col(ColumnDef::new(Routes::WarehouseId).uuid().null())
                    .col(ColumnDef::new(Routes::OriginName).string_len(100).null())
                    .col(ColumnDef::new(Routes::OriginAddress).string_len(255).null())
                    .col(ColumnDef::new(Routes::OriginContact).string_len(20).null())
                    .col(ColumnDef::new(Routes::DestinationName).string_len(100).null())
                    .col(ColumnDef::new(Routes::DestinationAddress).string_len(255).null())
                    .col(ColumnDef::new(Routes::DestinationContact).string_len(20).null())
                    .col(
                        ColumnDef::new(Routes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Routes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_routes_driver_id")
                            .from(Routes::Table, Routes::DriverId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_routes_vehicle_id")
                            .from(Routes::Table, Routes::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_routes_warehouse_id")
                            .from(Routes::Table, Routes::WarehouseId)
                            .to(Warehouses::Table, Warehouses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Guards the slot against concurrent writers
        manager
            .create_index(
                Index::create()
                    .name("idx_routes_driver_vehicle_date")
                    .table(Routes::Table)
                    .col(Routes::DriverId)
                    .col(Routes::VehicleId)
                    .col(Routes::DeliveryDate)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_routes_driver_vehicle_date")
                    .table(Routes::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Routes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Routes {
    Table,
    Id,
    Description,
    DeliveryStatus,
    DeliveryDate,
    DeliveryStartTime,
    DeliveryEndTime,
    ExpectedDurationMinutes,
    KmsTravelled,
    DriverNotes,
    DriverId,
    VehicleId,
    WarehouseId,
    OriginName,
    OriginAddress,
    OriginContact,
    DestinationName,
    DestinationAddress,
    DestinationContact,
    CreatedAt,
    UpdatedAt,
}
