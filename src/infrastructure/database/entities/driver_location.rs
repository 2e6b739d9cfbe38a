//! Latest driver position entity. One row per driver, latest-wins.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "driver_locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub driver_id: String,

    #[sea_orm(column_type = "Double")]
    pub lat: f64,

    #[sea_orm(column_type = "Double")]
    pub lon: f64,

    #[sea_orm(nullable, column_type = "Double")]
    pub accuracy: Option<f64>,

    #[sea_orm(nullable, column_type = "Double")]
    pub heading: Option<f64>,

    #[sea_orm(nullable, column_type = "Double")]
    pub speed: Option<f64>,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
