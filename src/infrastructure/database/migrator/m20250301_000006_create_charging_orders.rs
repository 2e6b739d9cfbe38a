//! Create charging_orders and charging_order_cars tables

use sea_orm_migration::prelude::*;

use super::m20250301_000002_create_addresses::Addresses;
use super::m20250301_000003_create_cars::Cars;
use super::m20250301_000004_create_drivers::Drivers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChargingOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChargingOrders::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ChargingOrders::CustomerId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChargingOrders::AddressId).string().not_null())
                    .col(ColumnDef::new(ChargingOrders::DriverId).string())
                    .col(ColumnDef::new(ChargingOrders::ChargingUnitId).string())
                    .col(
                        ColumnDef::new(ChargingOrders::OrderNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ChargingOrders::ChargingDuration)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargingOrders::NumberOfCars)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargingOrders::BaseFee)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargingOrders::Distance)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargingOrders::DeliveryFee)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargingOrders::Tax)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargingOrders::Tip)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargingOrders::TotalAmount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargingOrders::Status)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(ChargingOrders::PaymentMethod)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargingOrders::PaymentStatus)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(ChargingOrders::ScheduledAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(ChargingOrders::Notes).string())
                    .col(ColumnDef::new(ChargingOrders::CancellationReason).string())
                    .col(
                        ColumnDef::new(ChargingOrders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargingOrders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChargingOrders::StartedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(ChargingOrders::CompletedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(ChargingOrders::CancelledAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_charging_orders_address")
                            .from(ChargingOrders::Table, ChargingOrders::AddressId)
                            .to(Addresses::Table, Addresses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_charging_orders_driver")
                            .from(ChargingOrders::Table, ChargingOrders::DriverId)
                            .to(Drivers::Table, Drivers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_charging_orders_customer")
                    .table(ChargingOrders::Table)
                    .col(ChargingOrders::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_charging_orders_status")
                    .table(ChargingOrders::Table)
                    .col(ChargingOrders::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_charging_orders_driver")
                    .table(ChargingOrders::Table)
                    .col(ChargingOrders::DriverId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChargingOrderCars::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChargingOrderCars::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ChargingOrderCars::ChargingOrderId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargingOrderCars::CarId)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_charging_order_cars_order")
                            .from(
                                ChargingOrderCars::Table,
                                ChargingOrderCars::ChargingOrderId,
                            )
                            .to(ChargingOrders::Table, ChargingOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_charging_order_cars_car")
                            .from(ChargingOrderCars::Table, ChargingOrderCars::CarId)
                            .to(Cars::Table, Cars::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_charging_order_cars_order")
                    .table(ChargingOrderCars::Table)
                    .col(ChargingOrderCars::ChargingOrderId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChargingOrderCars::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ChargingOrders::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ChargingOrders {
    Table,
    Id,
    CustomerId,
    AddressId,
    DriverId,
    ChargingUnitId,
    OrderNumber,
    ChargingDuration,
    NumberOfCars,
    BaseFee,
    Distance,
    DeliveryFee,
    Tax,
    Tip,
    TotalAmount,
    Status,
    PaymentMethod,
    PaymentStatus,
    ScheduledAt,
    Notes,
    CancellationReason,
    CreatedAt,
    UpdatedAt,
    StartedAt,
    CompletedAt,
    CancelledAt,
}

#[derive(Iden)]
pub enum ChargingOrderCars {
    Table,
    Id,
    ChargingOrderId,
    CarId,
}
