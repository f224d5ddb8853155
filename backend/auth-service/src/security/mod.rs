/// Security module: token issuance, parsing, and validation.
pub mod jwt;

pub use jwt::{Claims, TOKEN_VALIDITY_SECS};
