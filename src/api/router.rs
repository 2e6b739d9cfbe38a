//! API router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto::*;
use crate::api::handlers::{
    addresses, cars, charging_orders, drivers, earnings, health, orders, payments, products,
};
use crate::application::services::{
    ChargingService, DispatchService, EarningsService, OrderService, PaymentSyncService,
};
use crate::auth::jwt::JwtConfig;
use crate::auth::middleware::auth_middleware;
use crate::domain::pricing::PricingConfig;
use crate::domain::{Geocoder, RepositoryProvider};

/// Shared state for every REST handler.
#[derive(Clone)]
pub struct ApiState {
    pub orders: Arc<OrderService>,
    pub charging: Arc<ChargingService>,
    pub dispatch: Arc<DispatchService>,
    pub payments: Arc<PaymentSyncService>,
    pub earnings: Arc<EarningsService>,
    pub repos: Arc<dyn RepositoryProvider>,
    pub geocoder: Arc<dyn Geocoder>,
    pub pricing: PricingConfig,
    pub metrics: PrometheusHandle,
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT issued by the identity service"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Orders
        orders::create_order,
        orders::list_my_orders,
        orders::list_all_orders,
        orders::get_order,
        orders::update_order_status,
        orders::cancel_order,
        orders::assign_driver,
        // Charging orders
        charging_orders::create_charging_order,
        charging_orders::list_my_charging_orders,
        charging_orders::list_all_charging_orders,
        charging_orders::get_charging_order,
        charging_orders::update_charging_order_status,
        charging_orders::cancel_charging_order,
        charging_orders::assign_charging_driver,
        // Drivers
        drivers::register_driver,
        drivers::list_drivers,
        drivers::get_driver,
        drivers::set_availability,
        drivers::update_location,
        drivers::get_location,
        // Earnings
        earnings::get_earnings,
        earnings::request_payout,
        earnings::list_payouts,
        // Payments
        payments::create_intent,
        payments::payment_callback,
        payments::refund,
        // Addresses
        addresses::create_address,
        addresses::list_addresses,
        addresses::delete_address,
        // Products
        products::list_products,
        products::create_product,
        products::update_product,
        // Cars
        cars::create_car,
        cars::list_cars,
        cars::delete_car,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            EmptyData,
            PaginationParams,
            PaginatedResponse<OrderDto>,
            PaginatedResponse<ChargingOrderDto>,
            PaginatedResponse<DriverDto>,
            // Orders
            OrderDto,
            OrderItemDto,
            CreateOrderRequest,
            OrderItemRequest,
            UpdateOrderStatusRequest,
            CancelOrderRequest,
            AssignDriverRequest,
            // Charging
            ChargingOrderDto,
            CreateChargingOrderRequest,
            // Drivers
            DriverDto,
            RegisterDriverRequest,
            AvailabilityRequest,
            LocationUpdateRequest,
            LocationDto,
            // Earnings
            EarningsDto,
            EarningEntryDto,
            PayoutDto,
            PayoutRequest,
            // Payments
            CreateIntentRequest,
            ChargeIntentDto,
            PaymentCallbackRequest,
            RefundRequest,
            PaymentStatusDto,
            // Addresses
            AddressDto,
            CreateAddressRequest,
            // Products
            ProductDto,
            CreateProductRequest,
            UpdateProductRequest,
            // Cars
            CarDto,
            CreateCarRequest,
            // Health
            health::HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness probe. No authentication required."),
        (name = "Orders", description = "Fuel delivery orders: creation with distance-based pricing, the PENDING → CONFIRMED → DISPATCHED → IN_TRANSIT → DELIVERED lifecycle, customer cancellation and driver assignment."),
        (name = "Charging Orders", description = "Mobile EV charging sessions covering one or more customer cars. Priced per duration tier (1h, 2h, 5h, 24h) per car."),
        (name = "Drivers", description = "Driver registration (admin), availability toggling and live location pings. Location is latest-wins with no history."),
        (name = "Earnings", description = "Driver earnings derived from delivered-and-paid orders (delivery fee + tip) and the append-only payout ledger."),
        (name = "Payments", description = "Online payment synchronization: charge intents, the processor callback webhook and admin refunds. On-delivery methods settle at hand-off instead."),
        (name = "Addresses", description = "Customer delivery addresses, geocoded at creation. Ungeocoded addresses cannot take orders."),
        (name = "Products", description = "Fuel catalog. Customers see the marked-up unit price; the base price and the markup stay internal."),
        (name = "Cars", description = "Customer-owned electric cars referenced by charging orders."),
    ),
    info(
        title = "PetroTap Order Engine API",
        version = "1.0.0",
        description = "REST API for the PetroTap fuel-delivery and mobile EV-charging marketplace.

## Authentication

Tokens are issued by the identity service; this API verifies them.
Pass `Authorization: Bearer <token>` on every request except `/health`
and the payment callback webhook. Roles: `customer`, `driver`, `admin`.

## Response format

Every response is wrapped in a standard envelope:
```json
{\"success\": true, \"data\": {...}}
```
On error:
```json
{\"success\": false, \"data\": null, \"error\": \"description\"}
```

## Pagination

List endpoints accept `page` (1-based) and `limit` (default 50, max 100)."
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: ApiState, jwt_config: JwtConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let order_routes = Router::new()
        .route("/", post(orders::create_order).get(orders::list_my_orders))
        .route("/{id}", get(orders::get_order))
        .route("/{id}/status", post(orders::update_order_status))
        .route("/{id}/cancel", post(orders::cancel_order))
        .route("/{id}/assign", post(orders::assign_driver));

    let charging_routes = Router::new()
        .route(
            "/",
            post(charging_orders::create_charging_order)
                .get(charging_orders::list_my_charging_orders),
        )
        .route("/{id}", get(charging_orders::get_charging_order))
        .route(
            "/{id}/status",
            post(charging_orders::update_charging_order_status),
        )
        .route("/{id}/cancel", post(charging_orders::cancel_charging_order))
        .route("/{id}/assign", post(charging_orders::assign_charging_driver));

    let admin_routes = Router::new()
        .route("/orders", get(orders::list_all_orders))
        .route("/charging-orders", get(charging_orders::list_all_charging_orders));

    // Driver profile, dispatch and earnings share the /drivers prefix
    let driver_routes = Router::new()
        .route("/", post(drivers::register_driver).get(drivers::list_drivers))
        .route("/{id}", get(drivers::get_driver))
        .route("/{id}/availability", post(drivers::set_availability))
        .route(
            "/{id}/location",
            post(drivers::update_location).get(drivers::get_location),
        )
        .route("/{id}/earnings", get(earnings::get_earnings))
        .route(
            "/{id}/payouts",
            post(earnings::request_payout).get(earnings::list_payouts),
        );

    let payment_routes = Router::new()
        .route("/intent", post(payments::create_intent))
        .route("/refund", post(payments::refund));

    let address_routes = Router::new()
        .route(
            "/",
            post(addresses::create_address).get(addresses::list_addresses),
        )
        .route("/{id}", delete(addresses::delete_address));

    let product_routes = Router::new()
        .route("/", get(products::list_products).post(products::create_product))
        .route("/{id}", put(products::update_product));

    let car_routes = Router::new()
        .route("/", post(cars::create_car).get(cars::list_cars))
        .route("/{id}", delete(cars::delete_car));

    let protected = Router::new()
        .nest("/api/v1/orders", order_routes)
        .nest("/api/v1/charging-orders", charging_routes)
        .nest("/api/v1/admin", admin_routes)
        .nest("/api/v1/drivers", driver_routes)
        .nest("/api/v1/payments", payment_routes)
        .nest("/api/v1/addresses", address_routes)
        .nest("/api/v1/products", product_routes)
        .nest("/api/v1/cars", car_routes)
        .layer(middleware::from_fn_with_state(
            jwt_config,
            auth_middleware,
        ));

    // Processor webhook is authenticated by the gateway, not by user JWT
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .route("/api/v1/payments/callback", post(payments::payment_callback));

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(public)
        .merge(protected)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_builds() {
        let doc = ApiDoc::openapi();
        assert!(!doc.paths.paths.is_empty());
    }
}
