//! Customer car API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::{error_response, ApiError};
use crate::api::dto::{ApiResponse, CarDto, CreateCarRequest, EmptyData, ValidatedJson};
use crate::api::router::ApiState;
use crate::auth::AuthenticatedUser;
use crate::domain::car::Car;

/// Register a car
#[utoipa::path(
    post,
    path = "/api/v1/cars",
    tag = "Cars",
    request_body = CreateCarRequest,
    responses(
        (status = 201, description = "Car registered", body = ApiResponse<CarDto>),
        (status = 422, description = "Validation failure", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_car(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(req): ValidatedJson<CreateCarRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CarDto>>), ApiError> {
    let car = Car {
        id: Uuid::new_v4().to_string(),
        customer_id: user.user_id,
        make: req.make,
        model: req.model,
        plate: req.plate,
        created_at: Utc::now(),
    };
    let saved = state
        .repos
        .cars()
        .insert(car)
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CarDto::from_domain(&saved))),
    ))
}

/// List the caller's cars
#[utoipa::path(
    get,
    path = "/api/v1/cars",
    tag = "Cars",
    responses(
        (status = 200, description = "Cars", body = ApiResponse<Vec<CarDto>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_cars(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<CarDto>>>, ApiError> {
    let cars = state
        .repos
        .cars()
        .list_for_customer(&user.user_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        cars.iter().map(CarDto::from_domain).collect(),
    )))
}

/// Delete a car
#[utoipa::path(
    delete,
    path = "/api/v1/cars/{id}",
    tag = "Cars",
    params(("id" = String, Path, description = "Car id")),
    responses(
        (status = 200, description = "Car deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_car(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    let owned = state
        .repos
        .cars()
        .find_by_id(&id)
        .await
        .map_err(error_response)?
        .filter(|c| user.is_admin() || c.customer_id == user.user_id);
    if owned.is_none() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Car {} not found", id))),
        ));
    }

    state
        .repos
        .cars()
        .delete(&id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
