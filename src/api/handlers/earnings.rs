//! Driver earnings and payout API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::{error_response, require_self_or_admin, ApiError};
use crate::api::dto::{ApiResponse, EarningsDto, EmptyData, PayoutDto, PayoutRequest, ValidatedJson};
use crate::api::router::ApiState;
use crate::auth::AuthenticatedUser;
use crate::domain::payout::PayoutStatus;

/// Driver earnings snapshot
///
/// Derived from order state at read time: delivery fee plus tip over
/// delivered-and-paid fuel orders and completed-and-paid charging
/// orders, minus finalized and in-flight payouts.
#[utoipa::path(
    get,
    path = "/api/v1/drivers/{id}/earnings",
    tag = "Earnings",
    params(("id" = String, Path, description = "Driver id")),
    responses(
        (status = 200, description = "Earnings snapshot", body = ApiResponse<EarningsDto>),
        (status = 403, description = "Access denied", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_earnings(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EarningsDto>>, ApiError> {
    require_self_or_admin(&user, &id)?;
    let summary = state
        .earnings
        .compute_earnings(&id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(EarningsDto::from_domain(
        &summary,
    ))))
}

/// Request a payout
///
/// Validates against the available balance, reserves the amount and
/// runs the transfer on the payout rail. A declined transfer is
/// recorded as a FAILED ledger row and surfaced as 502 with the
/// failure reason.
#[utoipa::path(
    post,
    path = "/api/v1/drivers/{id}/payouts",
    tag = "Earnings",
    params(("id" = String, Path, description = "Driver id")),
    request_body = PayoutRequest,
    responses(
        (status = 201, description = "Payout succeeded", body = ApiResponse<PayoutDto>),
        (status = 400, description = "Below minimum or over balance", body = ApiResponse<EmptyData>),
        (status = 502, description = "Transfer declined or rail unreachable", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn request_payout(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<PayoutRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PayoutDto>>), ApiError> {
    require_self_or_admin(&user, &id)?;
    let payout = state
        .earnings
        .request_payout(&id, req.amount)
        .await
        .map_err(error_response)?;

    if payout.status == PayoutStatus::Failed {
        let reason = payout
            .failure_reason
            .clone()
            .unwrap_or_else(|| "Transfer failed".to_string());
        return Err((
            StatusCode::BAD_GATEWAY,
            Json(ApiResponse::error(format!("Payout failed: {}", reason))),
        ));
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(PayoutDto::from_domain(&payout))),
    ))
}

/// Payout history, newest first
#[utoipa::path(
    get,
    path = "/api/v1/drivers/{id}/payouts",
    tag = "Earnings",
    params(("id" = String, Path, description = "Driver id")),
    responses(
        (status = 200, description = "Payout ledger", body = ApiResponse<Vec<PayoutDto>>),
        (status = 403, description = "Access denied", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_payouts(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<PayoutDto>>>, ApiError> {
    require_self_or_admin(&user, &id)?;
    let payouts = state
        .earnings
        .list_payouts(&id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        payouts.iter().map(PayoutDto::from_domain).collect(),
    )))
}
