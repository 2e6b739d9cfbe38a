//! Customer address entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "addresses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub customer_id: String,
    pub label: String,
    pub street: String,
    pub city: String,

    #[sea_orm(nullable)]
    pub state_code: Option<String>,

    #[sea_orm(nullable)]
    pub postal_code: Option<String>,

    /// Unset when geocoding returned no result
    #[sea_orm(nullable, column_type = "Double")]
    pub lat: Option<f64>,

    #[sea_orm(nullable, column_type = "Double")]
    pub lon: Option<f64>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
