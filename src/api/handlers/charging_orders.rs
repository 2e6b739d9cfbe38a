//! Charging order API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::{actor_from, error_response, require_admin, ApiError};
use crate::api::dto::{
    ApiResponse, AssignDriverRequest, CancelOrderRequest, ChargingOrderDto,
    CreateChargingOrderRequest, EmptyData, PaginatedResponse, PaginationParams, StatusFilter,
    UpdateOrderStatusRequest, ValidatedJson,
};
use crate::api::router::ApiState;
use crate::application::services::charging::CreateChargingOrder;
use crate::application::services::Actor;
use crate::auth::AuthenticatedUser;
use crate::domain::charging_order::{ChargingDuration, ChargingStatus};
use crate::domain::order::PaymentMethod;
use crate::domain::OrderKind;

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}

/// Create a charging order
///
/// Covers one or more customer-owned cars; the fee is the per-car
/// duration price times the car count, plus delivery fee and tax.
#[utoipa::path(
    post,
    path = "/api/v1/charging-orders",
    tag = "Charging Orders",
    request_body = CreateChargingOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<ChargingOrderDto>),
        (status = 400, description = "Validation failure", body = ApiResponse<EmptyData>),
        (status = 404, description = "Address or car not found", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_charging_order(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(req): ValidatedJson<CreateChargingOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ChargingOrderDto>>), ApiError> {
    let charging_duration = ChargingDuration::parse(&req.charging_duration)
        .ok_or_else(|| bad_request(format!("Unknown charging duration {}", req.charging_duration)))?;
    let payment_method = PaymentMethod::parse(&req.payment_method)
        .ok_or_else(|| bad_request(format!("Unknown payment method {}", req.payment_method)))?;

    let cmd = CreateChargingOrder {
        customer_id: user.user_id,
        address_id: req.address_id,
        charging_duration,
        number_of_cars: req.number_of_cars,
        car_ids: req.car_ids,
        payment_method,
        tip: req.tip,
        scheduled_at: req.scheduled_at,
        notes: req.notes,
    };

    let order = state.charging.create(cmd).await.map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ChargingOrderDto::from_domain(&order))),
    ))
}

/// List the caller's charging orders
#[utoipa::path(
    get,
    path = "/api/v1/charging-orders",
    tag = "Charging Orders",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated orders", body = ApiResponse<PaginatedResponse<ChargingOrderDto>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_my_charging_orders(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<ChargingOrderDto>>>, ApiError> {
    let (page, limit) = pagination.clamped();
    let (orders, total) = state
        .charging
        .list_for_customer(&user.user_id, page, limit)
        .await
        .map_err(error_response)?;
    let items = orders.iter().map(ChargingOrderDto::from_domain).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

/// All charging orders, optionally filtered by status (admin)
#[utoipa::path(
    get,
    path = "/api/v1/admin/charging-orders",
    tag = "Charging Orders",
    params(StatusFilter, PaginationParams),
    responses(
        (status = 200, description = "Paginated orders", body = ApiResponse<PaginatedResponse<ChargingOrderDto>>),
        (status = 403, description = "Admin access required", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_all_charging_orders(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filter): Query<StatusFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<ChargingOrderDto>>>, ApiError> {
    require_admin(&user)?;
    let status = match filter.status.as_deref() {
        Some(s) => Some(
            ChargingStatus::parse(s).ok_or_else(|| bad_request(format!("Unknown status {}", s)))?,
        ),
        None => None,
    };
    let (page, limit) = pagination.clamped();
    let (orders, total) = state
        .charging
        .list_all(status, page, limit)
        .await
        .map_err(error_response)?;
    let items = orders.iter().map(ChargingOrderDto::from_domain).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

/// Fetch a single charging order
#[utoipa::path(
    get,
    path = "/api/v1/charging-orders/{id}",
    tag = "Charging Orders",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order", body = ApiResponse<ChargingOrderDto>),
        (status = 404, description = "Not found or not visible", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_charging_order(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ChargingOrderDto>>, ApiError> {
    let actor = actor_from(&user);
    let order = state
        .charging
        .get(&id, &actor)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(ChargingOrderDto::from_domain(
        &order,
    ))))
}

/// Advance the charging order status
#[utoipa::path(
    post,
    path = "/api/v1/charging-orders/{id}/status",
    tag = "Charging Orders",
    params(("id" = String, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Updated order", body = ApiResponse<ChargingOrderDto>),
        (status = 409, description = "Illegal transition", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_charging_order_status(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateOrderStatusRequest>,
) -> Result<Json<ApiResponse<ChargingOrderDto>>, ApiError> {
    let next = ChargingStatus::parse(&req.status)
        .ok_or_else(|| bad_request(format!("Unknown status {}", req.status)))?;
    let actor = actor_from(&user);
    let order = state
        .charging
        .set_status(&id, next, &actor)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(ChargingOrderDto::from_domain(
        &order,
    ))))
}

/// Cancel a charging order as the customer
///
/// Allowed in any non-terminal status.
#[utoipa::path(
    post,
    path = "/api/v1/charging-orders/{id}/cancel",
    tag = "Charging Orders",
    params(("id" = String, Path, description = "Order id")),
    request_body = CancelOrderRequest,
    responses(
        (status = 200, description = "Cancelled order", body = ApiResponse<ChargingOrderDto>),
        (status = 409, description = "No longer cancellable", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn cancel_charging_order(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<CancelOrderRequest>,
) -> Result<Json<ApiResponse<ChargingOrderDto>>, ApiError> {
    let order = state
        .charging
        .customer_cancel(&id, &user.user_id, req.reason)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(ChargingOrderDto::from_domain(
        &order,
    ))))
}

/// Assign a driver to a charging order (admin)
#[utoipa::path(
    post,
    path = "/api/v1/charging-orders/{id}/assign",
    tag = "Charging Orders",
    params(("id" = String, Path, description = "Order id")),
    request_body = AssignDriverRequest,
    responses(
        (status = 200, description = "Driver assigned", body = ApiResponse<ChargingOrderDto>),
        (status = 409, description = "Driver unavailable", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn assign_charging_driver(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<AssignDriverRequest>,
) -> Result<Json<ApiResponse<ChargingOrderDto>>, ApiError> {
    require_admin(&user)?;
    state
        .dispatch
        .assign_driver(
            OrderKind::Charging,
            &id,
            &req.driver_id,
            req.charging_unit_id.as_deref(),
        )
        .await
        .map_err(error_response)?;
    let order = state
        .charging
        .get(&id, &Actor::Admin)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(ChargingOrderDto::from_domain(
        &order,
    ))))
}
