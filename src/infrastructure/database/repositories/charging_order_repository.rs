//! SeaORM implementation of ChargingOrderRepository

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait, UpdateResult,
};
use tracing::debug;

use crate::domain::charging_order::{
    ChargingDuration, ChargingOrder, ChargingOrderRepository, ChargingStatus,
};
use crate::domain::order::{PaymentMethod, PaymentStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{charging_order, charging_order_car};

use super::{db_err, insert_err, not_found};

pub struct SeaOrmChargingOrderRepository {
    db: DatabaseConnection,
}

impl SeaOrmChargingOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn parse_status(s: &str) -> DomainResult<ChargingStatus> {
    ChargingStatus::parse(s)
        .ok_or_else(|| DomainError::Database(format!("Unknown charging status {}", s)))
}

fn parse_duration(s: &str) -> DomainResult<ChargingDuration> {
    ChargingDuration::parse(s)
        .ok_or_else(|| DomainError::Database(format!("Unknown charging duration {}", s)))
}

fn model_to_domain(
    o: charging_order::Model,
    cars: Vec<charging_order_car::Model>,
) -> DomainResult<ChargingOrder> {
    Ok(ChargingOrder {
        id: o.id,
        customer_id: o.customer_id,
        address_id: o.address_id,
        driver_id: o.driver_id,
        charging_unit_id: o.charging_unit_id,
        order_number: o.order_number,
        charging_duration: parse_duration(&o.charging_duration)?,
        number_of_cars: o.number_of_cars,
        car_ids: cars.into_iter().map(|c| c.car_id).collect(),
        base_fee: o.base_fee,
        distance: o.distance,
        delivery_fee: o.delivery_fee,
        tax: o.tax,
        tip: o.tip,
        total_amount: o.total_amount,
        status: parse_status(&o.status)?,
        payment_method: PaymentMethod::parse(&o.payment_method)
            .ok_or_else(|| DomainError::Database(format!("Unknown payment method {}", o.payment_method)))?,
        payment_status: PaymentStatus::parse(&o.payment_status)
            .ok_or_else(|| DomainError::Database(format!("Unknown payment status {}", o.payment_status)))?,
        scheduled_at: o.scheduled_at,
        notes: o.notes,
        cancellation_reason: o.cancellation_reason,
        created_at: o.created_at,
        updated_at: o.updated_at,
        started_at: o.started_at,
        completed_at: o.completed_at,
        cancelled_at: o.cancelled_at,
    })
}

fn domain_to_active(o: &ChargingOrder) -> charging_order::ActiveModel {
    charging_order::ActiveModel {
        id: Set(o.id.clone()),
        customer_id: Set(o.customer_id.clone()),
        address_id: Set(o.address_id.clone()),
        driver_id: Set(o.driver_id.clone()),
        charging_unit_id: Set(o.charging_unit_id.clone()),
        order_number: Set(o.order_number.clone()),
        charging_duration: Set(o.charging_duration.as_str().to_string()),
        number_of_cars: Set(o.number_of_cars),
        base_fee: Set(o.base_fee),
        distance: Set(o.distance),
        delivery_fee: Set(o.delivery_fee),
        tax: Set(o.tax),
        tip: Set(o.tip),
        total_amount: Set(o.total_amount),
        status: Set(o.status.as_str().to_string()),
        payment_method: Set(o.payment_method.as_str().to_string()),
        payment_status: Set(o.payment_status.as_str().to_string()),
        scheduled_at: Set(o.scheduled_at),
        notes: Set(o.notes.clone()),
        cancellation_reason: Set(o.cancellation_reason.clone()),
        created_at: Set(o.created_at),
        updated_at: Set(o.updated_at),
        started_at: Set(o.started_at),
        completed_at: Set(o.completed_at),
        cancelled_at: Set(o.cancelled_at),
    }
}

async fn with_cars<C: ConnectionTrait>(
    conn: &C,
    models: Vec<charging_order::Model>,
) -> DomainResult<Vec<ChargingOrder>> {
    let ids: Vec<String> = models.iter().map(|o| o.id.clone()).collect();
    let cars = charging_order_car::Entity::find()
        .filter(charging_order_car::Column::ChargingOrderId.is_in(ids))
        .all(conn)
        .await
        .map_err(db_err)?;

    let mut orders = Vec::with_capacity(models.len());
    for model in models {
        let own: Vec<charging_order_car::Model> = cars
            .iter()
            .filter(|c| c.charging_order_id == model.id)
            .cloned()
            .collect();
        orders.push(model_to_domain(model, own)?);
    }
    Ok(orders)
}

async fn find_with_cars<C: ConnectionTrait>(
    conn: &C,
    id: &str,
) -> DomainResult<Option<ChargingOrder>> {
    let model = charging_order::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(db_err)?;
    match model {
        Some(model) => {
            let cars = charging_order_car::Entity::find()
                .filter(charging_order_car::Column::ChargingOrderId.eq(id))
                .all(conn)
                .await
                .map_err(db_err)?;
            Ok(Some(model_to_domain(model, cars)?))
        }
        None => Ok(None),
    }
}

// ── ChargingOrderRepository impl ────────────────────────────────

#[async_trait]
impl ChargingOrderRepository for SeaOrmChargingOrderRepository {
    async fn insert(&self, o: ChargingOrder) -> DomainResult<ChargingOrder> {
        debug!(order_id = %o.id, order_number = %o.order_number, "Inserting charging order");

        let txn = self.db.begin().await.map_err(db_err)?;
        domain_to_active(&o)
            .insert(&txn)
            .await
            .map_err(|e| insert_err(e, "order number"))?;
        for car_id in &o.car_ids {
            charging_order_car::ActiveModel {
                charging_order_id: Set(o.id.clone()),
                car_id: Set(car_id.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_err)?;
        }
        txn.commit().await.map_err(db_err)?;
        Ok(o)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ChargingOrder>> {
        find_with_cars(&self.db, id).await
    }

    async fn update_transition(
        &self,
        o: &ChargingOrder,
        expected: ChargingStatus,
    ) -> DomainResult<()> {
        let result: UpdateResult = charging_order::Entity::update_many()
            .col_expr(charging_order::Column::Status, Expr::value(o.status.as_str()))
            .col_expr(
                charging_order::Column::PaymentStatus,
                Expr::value(o.payment_status.as_str()),
            )
            .col_expr(
                charging_order::Column::CancellationReason,
                Expr::value(o.cancellation_reason.clone()),
            )
            .col_expr(charging_order::Column::UpdatedAt, Expr::value(o.updated_at))
            .col_expr(charging_order::Column::StartedAt, Expr::value(o.started_at))
            .col_expr(
                charging_order::Column::CompletedAt,
                Expr::value(o.completed_at),
            )
            .col_expr(
                charging_order::Column::CancelledAt,
                Expr::value(o.cancelled_at),
            )
            .filter(charging_order::Column::Id.eq(&o.id))
            .filter(charging_order::Column::Status.eq(expected.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            let exists = charging_order::Entity::find_by_id(&o.id)
                .one(&self.db)
                .await
                .map_err(db_err)?
                .is_some();
            if !exists {
                return Err(not_found("ChargingOrder", &o.id));
            }
            return Err(DomainError::Conflict(format!(
                "Charging order {} was modified concurrently",
                o.id
            )));
        }
        Ok(())
    }

    async fn set_payment_status(
        &self,
        order_id: &str,
        status: PaymentStatus,
    ) -> DomainResult<()> {
        let result: UpdateResult = charging_order::Entity::update_many()
            .col_expr(
                charging_order::Column::PaymentStatus,
                Expr::value(status.as_str()),
            )
            .col_expr(
                charging_order::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(charging_order::Column::Id.eq(order_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(not_found("ChargingOrder", order_id));
        }
        Ok(())
    }

    async fn list_for_customer(
        &self,
        customer_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<ChargingOrder>, u64)> {
        let paginator = charging_order::Entity::find()
            .filter(charging_order::Column::CustomerId.eq(customer_id))
            .order_by_desc(charging_order::Column::CreatedAt)
            .paginate(&self.db, limit.max(1));
        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.max(1) - 1)
            .await
            .map_err(db_err)?;
        Ok((with_cars(&self.db, models).await?, total))
    }

    async fn list_all(
        &self,
        status: Option<ChargingStatus>,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<ChargingOrder>, u64)> {
        let mut query =
            charging_order::Entity::find().order_by_desc(charging_order::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(charging_order::Column::Status.eq(status.as_str()));
        }
        let paginator = query.paginate(&self.db, limit.max(1));
        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.max(1) - 1)
            .await
            .map_err(db_err)?;
        Ok((with_cars(&self.db, models).await?, total))
    }

    async fn list_earning_for_driver(&self, driver_id: &str) -> DomainResult<Vec<ChargingOrder>> {
        let models = charging_order::Entity::find()
            .filter(charging_order::Column::DriverId.eq(driver_id))
            .filter(charging_order::Column::Status.eq(ChargingStatus::Completed.as_str()))
            .filter(charging_order::Column::PaymentStatus.eq(PaymentStatus::Paid.as_str()))
            .order_by_desc(charging_order::Column::CompletedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        with_cars(&self.db, models).await
    }

    async fn assign_driver(
        &self,
        order_id: &str,
        driver_id: &str,
        charging_unit_id: Option<&str>,
    ) -> DomainResult<ChargingOrder> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let driver = super::driver_repository::find_dispatchable(&txn, driver_id).await?;
        if !driver.can_be_dispatched() {
            return Err(DomainError::DriverUnavailable(driver_id.to_string()));
        }

        let mut order = find_with_cars(&txn, order_id)
            .await?
            .ok_or_else(|| not_found("ChargingOrder", order_id))?;
        order.driver_id = Some(driver_id.to_string());
        order.charging_unit_id = charging_unit_id.map(String::from);
        if order.status == ChargingStatus::Pending {
            order.apply_status(ChargingStatus::Assigned)?;
        } else {
            order.updated_at = chrono::Utc::now();
        }

        domain_to_active(&order).update(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(order)
    }
}
