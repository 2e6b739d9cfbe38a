//! Charging order to car association entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "charging_order_cars")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub charging_order_id: String,
    pub car_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::charging_order::Entity",
        from = "Column::ChargingOrderId",
        to = "super::charging_order::Column::Id",
        on_delete = "Cascade"
    )]
    ChargingOrder,
}

impl Related<super::charging_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChargingOrder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
