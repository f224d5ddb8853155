/// HTTP request handlers (REST API)
pub mod health;
pub mod me;

pub use health::health_check;
pub use me::current_identity;
