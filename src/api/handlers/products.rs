//! Fuel product API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::{error_response, require_admin, ApiError};
use crate::api::dto::product::{CreateProductRequest, ProductDto, UpdateProductRequest};
use crate::api::dto::{ApiResponse, EmptyData, ValidatedJson};
use crate::api::router::ApiState;
use crate::auth::AuthenticatedUser;
use crate::domain::product::Product;

/// List fuel products
///
/// Customers see available products with the marked-up unit price;
/// admins see the full catalog.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Products",
    responses(
        (status = 200, description = "Products", body = ApiResponse<Vec<ProductDto>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_products(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<ProductDto>>>, ApiError> {
    let products = state
        .repos
        .products()
        .list(!user.is_admin())
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        products
            .iter()
            .map(|p| ProductDto::from_domain(p, &state.pricing))
            .collect(),
    )))
}

/// Create a product (admin)
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "Products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductDto>),
        (status = 403, description = "Admin access required", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(req): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProductDto>>), ApiError> {
    require_admin(&user)?;
    if req.base_price <= rust_decimal::Decimal::ZERO {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Base price must be positive")),
        ));
    }

    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4().to_string(),
        name: req.name,
        description: req.description,
        base_price: req.base_price,
        is_available: req.is_available,
        created_at: now,
        updated_at: now,
    };
    let saved = state
        .repos
        .products()
        .insert(product)
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ProductDto::from_domain(
            &saved,
            &state.pricing,
        ))),
    ))
}

/// Update a product (admin); absent fields are left unchanged
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<ProductDto>),
        (status = 404, description = "Not found", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateProductRequest>,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    require_admin(&user)?;
    let mut product = state
        .repos
        .products()
        .find_by_id(&id)
        .await
        .map_err(error_response)?
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Product {} not found", id))),
        ))?;

    if let Some(name) = req.name {
        product.name = name;
    }
    if let Some(description) = req.description {
        product.description = Some(description);
    }
    if let Some(base_price) = req.base_price {
        if base_price <= rust_decimal::Decimal::ZERO {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("Base price must be positive")),
            ));
        }
        product.base_price = base_price;
    }
    if let Some(is_available) = req.is_available {
        product.is_available = is_available;
    }
    product.updated_at = Utc::now();

    state
        .repos
        .products()
        .update(&product)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(ProductDto::from_domain(
        &product,
        &state.pricing,
    ))))
}
