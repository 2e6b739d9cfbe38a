//! Payment API handlers: charge intents, the processor callback and
//! refunds.

use axum::{extract::State, http::StatusCode, Extension, Json};

use super::{error_response, require_admin, ApiError};
use crate::api::dto::{
    ApiResponse, ChargeIntentDto, CreateIntentRequest, EmptyData, PaymentCallbackRequest,
    PaymentStatusDto, RefundRequest, ValidatedJson,
};
use crate::api::router::ApiState;
use crate::application::services::payments::PaymentCallback;
use crate::auth::AuthenticatedUser;
use crate::domain::{OrderKind, PaymentOutcome};

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}

fn parse_kind(s: &str) -> Result<OrderKind, ApiError> {
    match s {
        "fuel" => Ok(OrderKind::Fuel),
        "charging" => Ok(OrderKind::Charging),
        other => Err(bad_request(format!("Unknown order kind {}", other))),
    }
}

/// Create a charge intent for an ONLINE order
///
/// The order stays payment-PENDING until the processor callback lands.
#[utoipa::path(
    post,
    path = "/api/v1/payments/intent",
    tag = "Payments",
    request_body = CreateIntentRequest,
    responses(
        (status = 201, description = "Charge intent created", body = ApiResponse<ChargeIntentDto>),
        (status = 400, description = "Order is not paid online", body = ApiResponse<EmptyData>),
        (status = 502, description = "Gateway unreachable", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_intent(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(req): ValidatedJson<CreateIntentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ChargeIntentDto>>), ApiError> {
    let kind = parse_kind(&req.order_kind)?;

    // The caller must be able to see the order at all
    let actor = super::actor_from(&user);
    match kind {
        OrderKind::Fuel => {
            state
                .orders
                .get(&req.order_id, &actor)
                .await
                .map_err(error_response)?;
        }
        OrderKind::Charging => {
            state
                .charging
                .get(&req.order_id, &actor)
                .await
                .map_err(error_response)?;
        }
    }

    let intent = state
        .payments
        .create_intent(&req.order_id, kind)
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ChargeIntentDto::from_domain(&intent))),
    ))
}

/// Processor callback (webhook)
///
/// Applies the terminal payment outcome to the referenced order.
/// Re-delivery of the same callback is a no-op in effect.
#[utoipa::path(
    post,
    path = "/api/v1/payments/callback",
    tag = "Payments",
    request_body = PaymentCallbackRequest,
    responses(
        (status = 200, description = "Status applied", body = ApiResponse<PaymentStatusDto>),
        (status = 404, description = "Referenced order not found", body = ApiResponse<EmptyData>)
    )
)]
pub async fn payment_callback(
    State(state): State<ApiState>,
    ValidatedJson(req): ValidatedJson<PaymentCallbackRequest>,
) -> Result<Json<ApiResponse<PaymentStatusDto>>, ApiError> {
    let kind = parse_kind(&req.order_kind)?;
    let claimed_outcome = match req.status.as_str() {
        "succeeded" => PaymentOutcome::Succeeded,
        "failed" => PaymentOutcome::Failed,
        other => return Err(bad_request(format!("Unknown payment status {}", other))),
    };

    let status = state
        .payments
        .apply(PaymentCallback {
            external_payment_id: req.payment_id,
            claimed_outcome,
            order_id: req.order_id,
            order_kind: kind,
        })
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(PaymentStatusDto {
        payment_status: status.as_str().to_string(),
    })))
}

/// Refund an online payment (admin)
///
/// The order flips to REFUNDED only once the cumulative refunded amount
/// covers the full total; partial refunds leave it PAID.
#[utoipa::path(
    post,
    path = "/api/v1/payments/refund",
    tag = "Payments",
    request_body = RefundRequest,
    responses(
        (status = 200, description = "Refund processed", body = ApiResponse<PaymentStatusDto>),
        (status = 403, description = "Admin access required", body = ApiResponse<EmptyData>),
        (status = 502, description = "Gateway unreachable", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn refund(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(req): ValidatedJson<RefundRequest>,
) -> Result<Json<ApiResponse<PaymentStatusDto>>, ApiError> {
    require_admin(&user)?;
    let kind = parse_kind(&req.order_kind)?;

    let status = state
        .payments
        .refund(&req.order_id, kind, &req.payment_id, req.amount)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(PaymentStatusDto {
        payment_status: status.as_str().to_string(),
    })))
}
