//! EV charging order entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "charging_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub customer_id: String,
    pub address_id: String,

    #[sea_orm(nullable)]
    pub driver_id: Option<String>,

    #[sea_orm(nullable)]
    pub charging_unit_id: Option<String>,

    /// Human-facing number, `CHG-{millis}-{rand6}`
    #[sea_orm(unique)]
    pub order_number: String,

    /// 1h, 2h, 5h or 24h
    pub charging_duration: String,

    pub number_of_cars: i32,

    /// per-car price x number of cars
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub base_fee: Decimal,

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

    /// PENDING, CONFIRMED, ASSIGNED, IN_PROGRESS, COMPLETED, CANCELLED
    pub status: String,

    pub payment_method: String,
    pub payment_status: String,

    #[sea_orm(nullable)]
    pub scheduled_at: Option<DateTimeUtc>,

    #[sea_orm(nullable)]
    pub notes: Option<String>,

    #[sea_orm(nullable)]
    pub cancellation_reason: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub started_at: Option<DateTimeUtc>,

    #[sea_orm(nullable)]
    pub completed_at: Option<DateTimeUtc>,

    #[sea_orm(nullable)]
    pub cancelled_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::charging_order_car::Entity")]
    Cars,
}

impl Related<super::charging_order_car::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cars.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
