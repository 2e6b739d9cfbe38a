//! API data transfer objects

pub mod address;
pub mod car;
pub mod charging;
pub mod common;
pub mod driver;
pub mod order;
pub mod payment;
pub mod payout;
pub mod product;
pub mod validated_json;

pub use address::{AddressDto, CreateAddressRequest};
pub use car::{CarDto, CreateCarRequest};
pub use charging::{ChargingOrderDto, CreateChargingOrderRequest};
pub use common::{ApiResponse, EmptyData, PaginatedResponse, PaginationParams};
pub use driver::{
    AssignDriverRequest, AvailabilityRequest, DriverDto, LocationDto, LocationUpdateRequest,
    RegisterDriverRequest,
};
pub use order::{
    CancelOrderRequest, CreateOrderRequest, OrderDto, OrderItemDto, OrderItemRequest, StatusFilter,
    UpdateOrderStatusRequest,
};
pub use payment::{
    ChargeIntentDto, CreateIntentRequest, PaymentCallbackRequest, PaymentStatusDto, RefundRequest,
};
pub use payout::{EarningEntryDto, EarningsDto, PayoutDto, PayoutRequest};
pub use product::{CreateProductRequest, ProductDto, UpdateProductRequest};
pub use validated_json::ValidatedJson;
