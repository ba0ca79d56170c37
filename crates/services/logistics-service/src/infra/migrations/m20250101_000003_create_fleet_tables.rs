//! Migration: warehouses and vehicles.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Warehouses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Warehouses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Warehouses::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Warehouses::Address).string_len(255).not_null())
                    .col(ColumnDef::new(Warehouses::Contact).string_len(20).null())
                    .col(ColumnDef::new(Warehouses::PoScheduleOpen).time().not_null())
                    .col(ColumnDef::new(Warehouses::PoScheduleClose).time().not_null())
                    .col(
                        ColumnDef::new(Warehouses::MaximumStorageCapacity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Warehouses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Warehouses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vehicles::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Vehicles::PlateNumber)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Vehicles::VehicleType).string_len(50).not_null())
                    .col(ColumnDef::new(Vehicles::Brand).string_len(50).null())
                    .col(ColumnDef::new(Vehicles::Model).string_len(50).null())
                    .col(ColumnDef::new(Vehicles::Capacity).decimal_len(10, 2).not_null())
                    .col(
                        ColumnDef::new(Vehicles::VehicleStatus)
                            .string_len(20)
                            .not_null()
                            .default("Active"),
                    )
                    .col(ColumnDef::new(Vehicles::Year).integer().not_null())
                    .col(ColumnDef::new(Vehicles::FuelType).string_len(20).null())
                    .col(ColumnDef::new(Vehicles::LastMaintenanceDate).date().null())
                    .col(
                        ColumnDef::new(Vehicles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Vehicles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Warehouses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Warehouses {
    Table,
    Id,
    Name,
    Address,
    Contact,
    PoScheduleOpen,
    PoScheduleClose,
    MaximumStorageCapacity,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Vehicles {
    Table,
    Id,
    PlateNumber,
    VehicleType,
    Brand,
    Model,
    Capacity,
    VehicleStatus,
    Year,
    FuelType,
    LastMaintenanceDate,
    CreatedAt,
    UpdatedAt,
}
