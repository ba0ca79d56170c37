//! Migration: employees and their driver / staff specialization tables.

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
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employees::Id).uuid().not_null().primary_key())
                    // One employee record per user
                    .col(ColumnDef::new(Employees::UserId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Employees::Position).string_len(10).not_null())
                    .col(ColumnDef::new(Employees::Schedule).string_len(100).null())
                    .col(ColumnDef::new(Employees::Wage).decimal_len(12, 2).not_null())
                    .col(ColumnDef::new(Employees::HireDate).date().not_null())
                    .col(
                        ColumnDef::new(Employees::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Employees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employees::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employees_user_id")
                            .from(Employees::Table, Employees::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmployeeDrivers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmployeeDrivers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EmployeeDrivers::EmployeeId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(EmployeeDrivers::LicenseNumber)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeDrivers::LicenseCategory)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeDrivers::LicenseExpiryDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeDrivers::DrivingExperienceYears)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EmployeeDrivers::DriverStatus)
                            .string_len(50)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_drivers_employee_id")
                            .from(EmployeeDrivers::Table, EmployeeDrivers::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmployeeStaff::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmployeeStaff::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EmployeeStaff::EmployeeId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(EmployeeStaff::Department)
                            .string_len(100)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_staff_employee_id")
                            .from(EmployeeStaff::Table, EmployeeStaff::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmployeeStaff::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EmployeeDrivers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Employees {
    Table,
    Id,
    UserId,
    Position,
    Schedule,
    Wage,
    HireDate,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EmployeeDrivers {
    Table,
    Id,
    EmployeeId,
    LicenseNumber,
    LicenseCategory,
    LicenseExpiryDate,
    DrivingExperienceYears,
    DriverStatus,
}

#[derive(DeriveIden)]
enum EmployeeStaff {
    Table,
    Id,
    EmployeeId,
    Department,
}
