//! REST API handlers

pub mod addresses;
pub mod cars;
pub mod charging_orders;
pub mod drivers;
pub mod earnings;
pub mod health;
pub mod orders;
pub mod payments;
pub mod products;

use axum::http::StatusCode;
use axum::Json;

use crate::api::dto::ApiResponse;
use crate::application::services::Actor;
use crate::auth::AuthenticatedUser;
use crate::domain::DomainError;

/// Error shape shared by every handler
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

/// Map a domain error to an HTTP status and the response envelope.
pub(crate) fn error_response(e: DomainError) -> ApiError {
    let status = match &e {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_)
        | DomainError::InvalidQuantity { .. }
        | DomainError::AddressNotGeocoded(_)
        | DomainError::InsufficientBalance { .. } => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_)
        | DomainError::IllegalTransition { .. }
        | DomainError::IllegalCancellation { .. }
        | DomainError::DriverUnavailable(_) => StatusCode::CONFLICT,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::ExternalService(_) => StatusCode::BAD_GATEWAY,
        DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    // Internal detail stays in the logs
    let message = match &e {
        DomainError::Database(_) => "Internal server error".to_string(),
        other => other.to_string(),
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %e, "Request failed");
    }
    (status, Json(ApiResponse::error(message)))
}

/// Resolve the command actor from the authenticated user.
pub(crate) fn actor_from(user: &AuthenticatedUser) -> Actor {
    if user.is_admin() {
        Actor::Admin
    } else if user.is_driver() {
        Actor::Driver(user.user_id.clone())
    } else {
        Actor::Customer(user.user_id.clone())
    }
}

/// Admin gate for endpoints the role claim alone decides.
pub(crate) fn require_admin(user: &AuthenticatedUser) -> Result<(), ApiError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Admin access required")),
        ))
    }
}

/// Allow the subject themselves or an admin.
pub(crate) fn require_self_or_admin(user: &AuthenticatedUser, id: &str) -> Result<(), ApiError> {
    if user.is_admin() || user.user_id == id {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Access denied")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn error_mapping_covers_the_taxonomy() {
        let cases = [
            (
                error_response(DomainError::NotFound {
                    entity: "Order",
                    field: "id",
                    value: "x".into(),
                })
                .0,
                StatusCode::NOT_FOUND,
            ),
            (
                error_response(DomainError::Validation("bad".into())).0,
                StatusCode::BAD_REQUEST,
            ),
            (
                error_response(DomainError::InsufficientBalance {
                    requested: dec!(10),
                    available: dec!(5),
                })
                .0,
                StatusCode::BAD_REQUEST,
            ),
            (
                error_response(DomainError::IllegalTransition {
                    from: "PENDING".into(),
                    to: "DELIVERED".into(),
                })
                .0,
                StatusCode::CONFLICT,
            ),
            (
                error_response(DomainError::DriverUnavailable("d1".into())).0,
                StatusCode::CONFLICT,
            ),
            (
                error_response(DomainError::Forbidden("no".into())).0,
                StatusCode::FORBIDDEN,
            ),
            (
                error_response(DomainError::ExternalService("down".into())).0,
                StatusCode::BAD_GATEWAY,
            ),
            (
                error_response(DomainError::Database("boom".into())).0,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (got, want) in cases {
            assert_eq!(got, want);
        }
    }

    #[test]
    fn database_detail_is_not_leaked() {
        let (_, body) = error_response(DomainError::Database("secret dsn".into()));
        assert_eq!(body.error.as_deref(), Some("Internal server error"));
    }

    #[test]
    fn actor_resolution_follows_role() {
        let admin = AuthenticatedUser {
            user_id: "u1".into(),
            role: "admin".into(),
        };
        assert!(matches!(actor_from(&admin), Actor::Admin));

        let driver = AuthenticatedUser {
            user_id: "d1".into(),
            role: "driver".into(),
        };
        assert!(matches!(actor_from(&driver), Actor::Driver(id) if id == "d1"));

        let customer = AuthenticatedUser {
            user_id: "c1".into(),
            role: "customer".into(),
        };
        assert!(matches!(actor_from(&customer), Actor::Customer(id) if id == "c1"));
    }
}
