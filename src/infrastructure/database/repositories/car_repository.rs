//! SeaORM implementation of CarRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::car::{Car, CarRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::car;

use super::{db_err, not_found};

pub struct SeaOrmCarRepository {
    db: DatabaseConnection,
}

impl SeaOrmCarRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(c: car::Model) -> Car {
    Car {
        id: c.id,
        customer_id: c.customer_id,
        make: c.make,
        model: c.model,
        plate: c.plate,
        created_at: c.created_at,
    }
}

#[async_trait]
impl CarRepository for SeaOrmCarRepository {
    async fn insert(&self, c: Car) -> DomainResult<Car> {
        car::ActiveModel {
            id: Set(c.id.clone()),
            customer_id: Set(c.customer_id.clone()),
            make: Set(c.make.clone()),
            model: Set(c.model.clone()),
            plate: Set(c.plate.clone()),
            created_at: Set(c.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(c)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Car>> {
        let model = car::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn list_for_customer(&self, customer_id: &str) -> DomainResult<Vec<Car>> {
        let models = car::Entity::find()
            .filter(car::Column::CustomerId.eq(customer_id))
            .order_by_asc(car::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = car::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(not_found("Car", id));
        }
        Ok(())
    }
}
