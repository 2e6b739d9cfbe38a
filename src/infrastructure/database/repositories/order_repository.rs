//! SeaORM implementation of OrderRepository

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait, UpdateResult,
};
use tracing::debug;

use crate::domain::order::{
    DeliveryType, Order, OrderItem, OrderRepository, OrderStatus, PaymentMethod, PaymentStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{order, order_item};

use super::{db_err, insert_err, not_found};

pub struct SeaOrmOrderRepository {
    db: DatabaseConnection,
}

impl SeaOrmOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn parse_status(s: &str) -> DomainResult<OrderStatus> {
    OrderStatus::parse(s).ok_or_else(|| DomainError::Database(format!("Unknown order status {}", s)))
}

fn parse_payment_method(s: &str) -> DomainResult<PaymentMethod> {
    PaymentMethod::parse(s)
        .ok_or_else(|| DomainError::Database(format!("Unknown payment method {}", s)))
}

fn parse_payment_status(s: &str) -> DomainResult<PaymentStatus> {
    PaymentStatus::parse(s)
        .ok_or_else(|| DomainError::Database(format!("Unknown payment status {}", s)))
}

fn parse_delivery_type(s: &str) -> DomainResult<DeliveryType> {
    DeliveryType::parse(s)
        .ok_or_else(|| DomainError::Database(format!("Unknown delivery type {}", s)))
}

fn model_to_domain(o: order::Model, items: Vec<order_item::Model>) -> DomainResult<Order> {
    Ok(Order {
        id: o.id,
        customer_id: o.customer_id,
        address_id: o.address_id,
        driver_id: o.driver_id,
        order_number: o.order_number,
        delivery_type: parse_delivery_type(&o.delivery_type)?,
        status: parse_status(&o.status)?,
        payment_method: parse_payment_method(&o.payment_method)?,
        payment_status: parse_payment_status(&o.payment_status)?,
        fuel_cost: o.fuel_cost,
        company_markup: o.company_markup,
        distance: o.distance,
        delivery_fee: o.delivery_fee,
        tax: o.tax,
        tip: o.tip,
        total_amount: o.total_amount,
        items: items
            .into_iter()
            .map(|i| OrderItem {
                product_id: i.product_id,
                quantity: i.quantity,
                unit_price: i.unit_price,
                subtotal: i.subtotal,
            })
            .collect(),
        delivery_date: o.delivery_date,
        cancellation_reason: o.cancellation_reason,
        created_at: o.created_at,
        updated_at: o.updated_at,
        delivered_at: o.delivered_at,
        cancelled_at: o.cancelled_at,
    })
}

fn domain_to_active(o: &Order) -> order::ActiveModel {
    order::ActiveModel {
        id: Set(o.id.clone()),
        customer_id: Set(o.customer_id.clone()),
        address_id: Set(o.address_id.clone()),
        driver_id: Set(o.driver_id.clone()),
        order_number: Set(o.order_number.clone()),
        delivery_type: Set(o.delivery_type.as_str().to_string()),
        status: Set(o.status.as_str().to_string()),
        payment_method: Set(o.payment_method.as_str().to_string()),
        payment_status: Set(o.payment_status.as_str().to_string()),
        fuel_cost: Set(o.fuel_cost),
        company_markup: Set(o.company_markup),
        distance: Set(o.distance),
        delivery_fee: Set(o.delivery_fee),
        tax: Set(o.tax),
        tip: Set(o.tip),
        total_amount: Set(o.total_amount),
        delivery_date: Set(o.delivery_date),
        cancellation_reason: Set(o.cancellation_reason.clone()),
        created_at: Set(o.created_at),
        updated_at: Set(o.updated_at),
        delivered_at: Set(o.delivered_at),
        cancelled_at: Set(o.cancelled_at),
    }
}

/// Attach line items to a page of orders with one query.
async fn with_items<C: ConnectionTrait>(
    conn: &C,
    models: Vec<order::Model>,
) -> DomainResult<Vec<Order>> {
    let ids: Vec<String> = models.iter().map(|o| o.id.clone()).collect();
    let items = order_item::Entity::find()
        .filter(order_item::Column::OrderId.is_in(ids))
        .all(conn)
        .await
        .map_err(db_err)?;

    let mut orders = Vec::with_capacity(models.len());
    for model in models {
        let own: Vec<order_item::Model> = items
            .iter()
            .filter(|i| i.order_id == model.id)
            .cloned()
            .collect();
        orders.push(model_to_domain(model, own)?);
    }
    Ok(orders)
}

// ── OrderRepository impl ────────────────────────────────────────

#[async_trait]
impl OrderRepository for SeaOrmOrderRepository {
    async fn insert(&self, o: Order) -> DomainResult<Order> {
        debug!(order_id = %o.id, order_number = %o.order_number, "Inserting order");

        let txn = self.db.begin().await.map_err(db_err)?;
        domain_to_active(&o)
            .insert(&txn)
            .await
            .map_err(|e| insert_err(e, "order number"))?;
        for item in &o.items {
            order_item::ActiveModel {
                order_id: Set(o.id.clone()),
                product_id: Set(item.product_id.clone()),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                subtotal: Set(item.subtotal),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_err)?;
        }
        txn.commit().await.map_err(db_err)?;
        Ok(o)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Order>> {
        let model = order::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        match model {
            Some(model) => {
                let items = order_item::Entity::find()
                    .filter(order_item::Column::OrderId.eq(id))
                    .all(&self.db)
                    .await
                    .map_err(db_err)?;
                Ok(Some(model_to_domain(model, items)?))
            }
            None => Ok(None),
        }
    }

    // Line items are immutable after creation; status and payment
    // writes only touch the order row
    async fn update_transition(&self, o: &Order, expected: OrderStatus) -> DomainResult<()> {
        let result: UpdateResult = order::Entity::update_many()
            .col_expr(order::Column::Status, Expr::value(o.status.as_str()))
            .col_expr(
                order::Column::PaymentStatus,
                Expr::value(o.payment_status.as_str()),
            )
            .col_expr(
                order::Column::CancellationReason,
                Expr::value(o.cancellation_reason.clone()),
            )
            .col_expr(order::Column::UpdatedAt, Expr::value(o.updated_at))
            .col_expr(order::Column::DeliveredAt, Expr::value(o.delivered_at))
            .col_expr(order::Column::CancelledAt, Expr::value(o.cancelled_at))
            .filter(order::Column::Id.eq(&o.id))
            .filter(order::Column::Status.eq(expected.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            let exists = order::Entity::find_by_id(&o.id)
                .one(&self.db)
                .await
                .map_err(db_err)?
                .is_some();
            if !exists {
                return Err(not_found("Order", &o.id));
            }
            return Err(DomainError::Conflict(format!(
                "Order {} was modified concurrently",
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
        let result: UpdateResult = order::Entity::update_many()
            .col_expr(order::Column::PaymentStatus, Expr::value(status.as_str()))
            .col_expr(order::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(order::Column::Id.eq(order_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(not_found("Order", order_id));
        }
        Ok(())
    }

    async fn list_for_customer(
        &self,
        customer_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Order>, u64)> {
        let paginator = order::Entity::find()
            .filter(order::Column::CustomerId.eq(customer_id))
            .order_by_desc(order::Column::CreatedAt)
            .paginate(&self.db, limit.max(1));
        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.max(1) - 1)
            .await
            .map_err(db_err)?;
        Ok((with_items(&self.db, models).await?, total))
    }

    async fn list_all(
        &self,
        status: Option<OrderStatus>,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Order>, u64)> {
        let mut query = order::Entity::find().order_by_desc(order::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(order::Column::Status.eq(status.as_str()));
        }
        let paginator = query.paginate(&self.db, limit.max(1));
        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.max(1) - 1)
            .await
            .map_err(db_err)?;
        Ok((with_items(&self.db, models).await?, total))
    }

    async fn list_earning_for_driver(&self, driver_id: &str) -> DomainResult<Vec<Order>> {
        let models = order::Entity::find()
            .filter(order::Column::DriverId.eq(driver_id))
            .filter(order::Column::Status.eq(OrderStatus::Delivered.as_str()))
            .filter(order::Column::PaymentStatus.eq(PaymentStatus::Paid.as_str()))
            .order_by_desc(order::Column::DeliveredAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        with_items(&self.db, models).await
    }

    async fn assign_driver(&self, order_id: &str, driver_id: &str) -> DomainResult<Order> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let driver = super::driver_repository::find_dispatchable(&txn, driver_id).await?;
        if !driver.can_be_dispatched() {
            return Err(DomainError::DriverUnavailable(driver_id.to_string()));
        }

        let model = order::Entity::find_by_id(order_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| not_found("Order", order_id))?;
        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .all(&txn)
            .await
            .map_err(db_err)?;

        let mut order = model_to_domain(model, items)?;
        order.driver_id = Some(driver_id.to_string());
        if order.status == OrderStatus::Pending {
            order.apply_status(OrderStatus::Confirmed)?;
        } else {
            order.updated_at = chrono::Utc::now();
        }

        domain_to_active(&order).update(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(order)
    }
}
