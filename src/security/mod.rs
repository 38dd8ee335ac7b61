/// Security module: password hashing and token issuing/verification
pub mod jwt;
pub mod password;

pub use jwt::{AccessClaims, JwtKeys, RefreshClaims, TokenError};
pub use password::{hash_password, verify_password};
