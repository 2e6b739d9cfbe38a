//! Driver and dispatch API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::{error_response, require_admin, require_self_or_admin, ApiError};
use crate::api::dto::{
    ApiResponse, AvailabilityRequest, DriverDto, EmptyData, LocationDto, LocationUpdateRequest,
    PaginatedResponse, PaginationParams, RegisterDriverRequest, ValidatedJson,
};
use crate::api::router::ApiState;
use crate::application::services::dispatch::RegisterDriver;
use crate::auth::AuthenticatedUser;
use crate::domain::pricing::Coordinates;

/// Register a driver (admin)
#[utoipa::path(
    post,
    path = "/api/v1/drivers",
    tag = "Drivers",
    request_body = RegisterDriverRequest,
    responses(
        (status = 201, description = "Driver registered", body = ApiResponse<DriverDto>),
        (status = 403, description = "Admin access required", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn register_driver(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(req): ValidatedJson<RegisterDriverRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DriverDto>>), ApiError> {
    require_admin(&user)?;
    let driver = state
        .dispatch
        .register_driver(RegisterDriver {
            name: req.name,
            phone: req.phone,
            vehicle_make: req.vehicle_make,
            vehicle_model: req.vehicle_model,
            vehicle_plate: req.vehicle_plate,
            payout_account_id: req.payout_account_id,
        })
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(DriverDto::from_domain(&driver))),
    ))
}

/// List drivers (admin)
#[utoipa::path(
    get,
    path = "/api/v1/drivers",
    tag = "Drivers",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated drivers", body = ApiResponse<PaginatedResponse<DriverDto>>),
        (status = 403, description = "Admin access required", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_drivers(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<DriverDto>>>, ApiError> {
    require_admin(&user)?;
    let (page, limit) = pagination.clamped();
    let (drivers, total) = state
        .dispatch
        .list_drivers(page, limit)
        .await
        .map_err(error_response)?;
    let items = drivers.iter().map(DriverDto::from_domain).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

/// Fetch a driver profile (admin or the driver themselves)
#[utoipa::path(
    get,
    path = "/api/v1/drivers/{id}",
    tag = "Drivers",
    params(("id" = String, Path, description = "Driver id")),
    responses(
        (status = 200, description = "Driver", body = ApiResponse<DriverDto>),
        (status = 404, description = "Not found", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_driver(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DriverDto>>, ApiError> {
    require_self_or_admin(&user, &id)?;
    let driver = state.dispatch.get_driver(&id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(DriverDto::from_domain(&driver))))
}

/// Toggle availability (admin or the driver themselves)
#[utoipa::path(
    post,
    path = "/api/v1/drivers/{id}/availability",
    tag = "Drivers",
    params(("id" = String, Path, description = "Driver id")),
    request_body = AvailabilityRequest,
    responses(
        (status = 200, description = "Availability updated", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_availability(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(req): Json<AvailabilityRequest>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    require_self_or_admin(&user, &id)?;
    state
        .dispatch
        .set_availability(&id, req.available)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

/// Driver location ping (the driver themselves)
///
/// Latest-wins: one position per driver, no history retained.
#[utoipa::path(
    post,
    path = "/api/v1/drivers/{id}/location",
    tag = "Drivers",
    params(("id" = String, Path, description = "Driver id")),
    request_body = LocationUpdateRequest,
    responses(
        (status = 200, description = "Location recorded", body = ApiResponse<EmptyData>),
        (status = 400, description = "Invalid coordinates", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_location(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<LocationUpdateRequest>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    // Drivers may only ping their own position
    if !user.is_admin() && user.user_id != id {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Access denied")),
        ));
    }
    state
        .dispatch
        .update_location(
            &id,
            Coordinates::new(req.lat, req.lon),
            req.accuracy,
            req.heading,
            req.speed,
        )
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

/// Latest known driver position
#[utoipa::path(
    get,
    path = "/api/v1/drivers/{id}/location",
    tag = "Drivers",
    params(("id" = String, Path, description = "Driver id")),
    responses(
        (status = 200, description = "Latest position", body = ApiResponse<LocationDto>),
        (status = 404, description = "No position recorded", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_location(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LocationDto>>, ApiError> {
    let location = state
        .dispatch
        .get_location(&id)
        .await
        .map_err(error_response)?
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!(
                "No location recorded for driver {}",
                id
            ))),
        ))?;
    Ok(Json(ApiResponse::success(LocationDto::from_domain(
        &location,
    ))))
}
