//! Create driver_locations table

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
                    .table(DriverLocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DriverLocations::DriverId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DriverLocations::Lat).double().not_null())
                    .col(ColumnDef::new(DriverLocations::Lon).double().not_null())
                    .col(ColumnDef::new(DriverLocations::Accuracy).double())
                    .col(ColumnDef::new(DriverLocations::Heading).double())
                    .col(ColumnDef::new(DriverLocations::Speed).double())
                    .col(
                        ColumnDef::new(DriverLocations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_driver_locations_driver")
                            .from(DriverLocations::Table, DriverLocations::DriverId)
                            .to(Drivers::Table, Drivers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DriverLocations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum DriverLocations {
    Table,
    DriverId,
    Lat,
    Lon,
    Accuracy,
    Heading,
    Speed,
    UpdatedAt,
}
