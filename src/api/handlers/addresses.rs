//! Address API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use super::{error_response, ApiError};
use crate::api::dto::{AddressDto, ApiResponse, CreateAddressRequest, EmptyData, ValidatedJson};
use crate::api::router::ApiState;
use crate::auth::AuthenticatedUser;
use crate::domain::address::Address;

/// Create a delivery address
///
/// The street address is geocoded at creation. A geocoder failure or an
/// empty result degrades to an address without coordinates, which can
/// be listed but cannot take orders.
#[utoipa::path(
    post,
    path = "/api/v1/addresses",
    tag = "Addresses",
    request_body = CreateAddressRequest,
    responses(
        (status = 201, description = "Address created", body = ApiResponse<AddressDto>),
        (status = 422, description = "Validation failure", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_address(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(req): ValidatedJson<CreateAddressRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AddressDto>>), ApiError> {
    let query = match &req.state_code {
        Some(sc) => format!("{}, {}, {}", req.street, req.city, sc),
        None => format!("{}, {}", req.street, req.city),
    };
    let coordinates = match state.geocoder.geocode(&query).await {
        Ok(coords) => coords,
        Err(e) => {
            warn!(query = %query, error = %e, "Geocoding failed, storing address without coordinates");
            None
        }
    };

    let now = Utc::now();
    let address = Address {
        id: Uuid::new_v4().to_string(),
        customer_id: user.user_id,
        label: req.label,
        street: req.street,
        city: req.city,
        state_code: req.state_code,
        postal_code: req.postal_code,
        coordinates,
        created_at: now,
        updated_at: now,
    };

    let saved = state
        .repos
        .addresses()
        .insert(address)
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AddressDto::from_domain(&saved))),
    ))
}

/// List the caller's addresses
#[utoipa::path(
    get,
    path = "/api/v1/addresses",
    tag = "Addresses",
    responses(
        (status = 200, description = "Addresses", body = ApiResponse<Vec<AddressDto>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_addresses(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<AddressDto>>>, ApiError> {
    let addresses = state
        .repos
        .addresses()
        .list_for_customer(&user.user_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        addresses.iter().map(AddressDto::from_domain).collect(),
    )))
}

/// Delete an address
#[utoipa::path(
    delete,
    path = "/api/v1/addresses/{id}",
    tag = "Addresses",
    params(("id" = String, Path, description = "Address id")),
    responses(
        (status = 200, description = "Address deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_address(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    // Ownership check before the delete; other customers' addresses
    // read as not-found
    let owned = state
        .repos
        .addresses()
        .find_by_id(&id)
        .await
        .map_err(error_response)?
        .filter(|a| user.is_admin() || a.customer_id == user.user_id);
    if owned.is_none() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Address {} not found", id))),
        ));
    }

    state
        .repos
        .addresses()
        .delete(&id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
