//! Fuel order entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub customer_id: String,
    pub address_id: String,

    #[sea_orm(nullable)]
    pub driver_id: Option<String>,

    /// Human-facing number, `PT-{millis}-{rand6}`
    #[sea_orm(unique)]
    pub order_number: String,

    /// PRIVATE or COMMERCIAL
    pub delivery_type: String,

    /// PENDING, CONFIRMED, DISPATCHED, IN_TRANSIT, DELIVERED, CANCELLED
    pub status: String,

    /// ONLINE, CASH_ON_DELIVERY, CARD_ON_DELIVERY
    pub payment_method: String,

    /// PENDING, PAID, FAILED, REFUNDED
    pub payment_status: String,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub fuel_cost: Decimal,

    /// Internal markup amount, never surfaced to the customer
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub company_markup: Decimal,

    /// Miles from the company origin
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub distance: Decimal,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub delivery_fee: Decimal,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub tax: Decimal,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub tip: Decimal,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_amount: Decimal,

    #[sea_orm(nullable)]
    pub delivery_date: Option<DateTimeUtc>,

    #[sea_orm(nullable)]
    pub cancellation_reason: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub delivered_at: Option<DateTimeUtc>,

    #[sea_orm(nullable)]
    pub cancelled_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
