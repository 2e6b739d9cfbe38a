//! HTTP clients for the outbound collaborator ports

pub mod geocoder;
pub mod payment_gateway;
pub mod push;

pub use geocoder::HttpGeocoder;
pub use payment_gateway::HttpPaymentGateway;
pub use push::HttpPushSender;
