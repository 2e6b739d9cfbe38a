//! Create driver_payouts table

use sea_orm_migration::prelude::*;

use super::m20250301_000004_create_drivers::Drivers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DriverPayouts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DriverPayouts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DriverPayouts::DriverId).string().not_null())
                    .col(
                        ColumnDef::new(DriverPayouts::Amount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DriverPayouts::Status)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(DriverPayouts::ExternalTransferId).string())
                    .col(ColumnDef::new(DriverPayouts::FailureReason).string())
                    .col(
                        ColumnDef::new(DriverPayouts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DriverPayouts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_driver_payouts_driver")
                            .from(DriverPayouts::Table, DriverPayouts::DriverId)
                            .to(Drivers::Table, Drivers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Balance checks sum over a driver's rows by status
        manager
            .create_index(
                Index::create()
                    .name("idx_driver_payouts_driver_status")
                    .table(DriverPayouts::Table)
                    .col(DriverPayouts::DriverId)
                    .col(DriverPayouts::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DriverPayouts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum DriverPayouts {
    Table,
    Id,
    DriverId,
    Amount,
    Status,
    ExternalTransferId,
    FailureReason,
    CreatedAt,
    UpdatedAt,
}
