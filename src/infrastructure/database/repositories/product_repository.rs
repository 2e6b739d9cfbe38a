//! SeaORM implementation of ProductRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::product::{Product, ProductRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::product;

use super::{db_err, not_found};

pub struct SeaOrmProductRepository {
    db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(p: product::Model) -> Product {
    Product {
        id: p.id,
        name: p.name,
        description: p.description,
        base_price: p.base_price,
        is_available: p.is_available,
        created_at: p.created_at,
        updated_at: p.updated_at,
    }
}

fn domain_to_active(p: &Product) -> product::ActiveModel {
    product::ActiveModel {
        id: Set(p.id.clone()),
        name: Set(p.name.clone()),
        description: Set(p.description.clone()),
        base_price: Set(p.base_price),
        is_available: Set(p.is_available),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
    }
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn insert(&self, p: Product) -> DomainResult<Product> {
        domain_to_active(&p).insert(&self.db).await.map_err(db_err)?;
        Ok(p)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Product>> {
        let model = product::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn update(&self, p: &Product) -> DomainResult<()> {
        let existing = product::Entity::find_by_id(&p.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(not_found("Product", &p.id));
        }
        domain_to_active(p).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn list(&self, only_available: bool) -> DomainResult<Vec<Product>> {
        let mut query = product::Entity::find().order_by_asc(product::Column::Name);
        if only_available {
            query = query.filter(product::Column::IsAvailable.eq(true));
        }
        let models = query.all(&self.db).await.map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
