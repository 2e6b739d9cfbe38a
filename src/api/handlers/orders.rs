//! Fuel order API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::{actor_from, error_response, require_admin, ApiError};
use crate::api::dto::{
    ApiResponse, AssignDriverRequest, CancelOrderRequest, CreateOrderRequest, EmptyData,
    OrderDto, PaginatedResponse, PaginationParams, StatusFilter, UpdateOrderStatusRequest,
    ValidatedJson,
};
use crate::api::router::ApiState;
use crate::application::services::order::{CreateOrder, NewOrderItem};
use crate::auth::AuthenticatedUser;
use crate::domain::order::{DeliveryType, OrderStatus, PaymentMethod};
use crate::domain::OrderKind;

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}

/// Create a fuel order
///
/// Validates the address and items, prices the order off the live
/// catalog and the distance-based fee schedule. No driver is assigned
/// and no payment is taken at creation.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "Orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderDto>),
        (status = 400, description = "Validation failure", body = ApiResponse<EmptyData>),
        (status = 404, description = "Address or product not found", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_order(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(req): ValidatedJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderDto>>), ApiError> {
    let delivery_type = DeliveryType::parse(&req.delivery_type)
        .ok_or_else(|| bad_request(format!("Unknown delivery type {}", req.delivery_type)))?;
    let payment_method = PaymentMethod::parse(&req.payment_method)
        .ok_or_else(|| bad_request(format!("Unknown payment method {}", req.payment_method)))?;

    let cmd = CreateOrder {
        customer_id: user.user_id,
        address_id: req.address_id,
        delivery_type,
        payment_method,
        items: req
            .items
            .into_iter()
            .map(|i| NewOrderItem {
                product_id: i.product_id,
                quantity: i.quantity,
            })
            .collect(),
        tip: req.tip,
        delivery_date: req.delivery_date,
    };

    let order = state.orders.create(cmd).await.map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(OrderDto::from_domain(&order))),
    ))
}

/// List the caller's fuel orders
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "Orders",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated orders", body = ApiResponse<PaginatedResponse<OrderDto>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_my_orders(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<OrderDto>>>, ApiError> {
    let (page, limit) = pagination.clamped();
    let (orders, total) = state
        .orders
        .list_for_customer(&user.user_id, page, limit)
        .await
        .map_err(error_response)?;
    let items = orders.iter().map(OrderDto::from_domain).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

/// All fuel orders, optionally filtered by status (admin)
#[utoipa::path(
    get,
    path = "/api/v1/admin/orders",
    tag = "Orders",
    params(StatusFilter, PaginationParams),
    responses(
        (status = 200, description = "Paginated orders", body = ApiResponse<PaginatedResponse<OrderDto>>),
        (status = 403, description = "Admin access required", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_all_orders(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filter): Query<StatusFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<OrderDto>>>, ApiError> {
    require_admin(&user)?;
    let status = match filter.status.as_deref() {
        Some(s) => Some(
            OrderStatus::parse(s).ok_or_else(|| bad_request(format!("Unknown status {}", s)))?,
        ),
        None => None,
    };
    let (page, limit) = pagination.clamped();
    let (orders, total) = state
        .orders
        .list_all(status, page, limit)
        .await
        .map_err(error_response)?;
    let items = orders.iter().map(OrderDto::from_domain).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

/// Fetch a single fuel order
///
/// Customers see their own orders, drivers the orders assigned to them,
/// admins everything.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    tag = "Orders",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order", body = ApiResponse<OrderDto>),
        (status = 404, description = "Not found or not visible", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_order(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<OrderDto>>, ApiError> {
    let actor = actor_from(&user);
    let order = state.orders.get(&id, &actor).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(OrderDto::from_domain(&order))))
}

/// Advance the order status
///
/// Admins may apply any valid transition; the assigned driver may move
/// the order along the delivery path only.
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/status",
    tag = "Orders",
    params(("id" = String, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Updated order", body = ApiResponse<OrderDto>),
        (status = 409, description = "Illegal transition", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_order_status(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateOrderStatusRequest>,
) -> Result<Json<ApiResponse<OrderDto>>, ApiError> {
    let next = OrderStatus::parse(&req.status)
        .ok_or_else(|| bad_request(format!("Unknown status {}", req.status)))?;
    let actor = actor_from(&user);
    let order = state
        .orders
        .set_status(&id, next, &actor)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(OrderDto::from_domain(&order))))
}

/// Cancel an order as the customer
///
/// Allowed while the order is PENDING or CONFIRMED; once the driver is
/// on the road cancellation is refused.
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/cancel",
    tag = "Orders",
    params(("id" = String, Path, description = "Order id")),
    request_body = CancelOrderRequest,
    responses(
        (status = 200, description = "Cancelled order", body = ApiResponse<OrderDto>),
        (status = 409, description = "No longer cancellable", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn cancel_order(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<CancelOrderRequest>,
) -> Result<Json<ApiResponse<OrderDto>>, ApiError> {
    let order = state
        .orders
        .customer_cancel(&id, &user.user_id, req.reason)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(OrderDto::from_domain(&order))))
}

/// Assign a driver to a fuel order (admin)
///
/// The availability check and the order write share one transaction;
/// concurrent assignments of the same driver cannot both pass.
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/assign",
    tag = "Orders",
    params(("id" = String, Path, description = "Order id")),
    request_body = AssignDriverRequest,
    responses(
        (status = 200, description = "Driver assigned", body = ApiResponse<OrderDto>),
        (status = 409, description = "Driver unavailable", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn assign_driver(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<AssignDriverRequest>,
) -> Result<Json<ApiResponse<OrderDto>>, ApiError> {
    require_admin(&user)?;
    state
        .dispatch
        .assign_driver(OrderKind::Fuel, &id, &req.driver_id, None)
        .await
        .map_err(error_response)?;
    let order = state
        .orders
        .get(&id, &crate::application::services::Actor::Admin)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(OrderDto::from_domain(&order))))
}
