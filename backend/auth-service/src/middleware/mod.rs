/// Middleware implementations
pub mod jwt_auth;

// Middleware modules:
// - jwt_auth: bearer-token discovery, validation, and principal installation
// - Request logging: handled by actix_web::middleware::Logger
// - CORS: handled by actix_cors::Cors

pub use jwt_auth::{authenticate, AuthenticatedUser, AuthenticationOutcome, JwtAuthMiddleware};
