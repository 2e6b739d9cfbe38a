//! Driver entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "drivers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    #[sea_orm(nullable)]
    pub vehicle_make: Option<String>,

    #[sea_orm(nullable)]
    pub vehicle_model: Option<String>,

    #[sea_orm(nullable)]
    pub vehicle_plate: Option<String>,

    /// Driver-toggled; gates dispatch
    pub is_available: bool,

    /// Admin-toggled; inactive drivers can never be dispatched
    pub is_active: bool,

    /// Connected account id at the payout rail
    #[sea_orm(nullable)]
    pub payout_account_id: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
