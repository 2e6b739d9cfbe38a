//! Authentication: JWT verification and the Axum middleware

pub mod jwt;
pub mod middleware;

pub use jwt::{verify_token, AuthError, Claims, JwtConfig};
pub use middleware::{auth_middleware, AuthenticatedUser};
