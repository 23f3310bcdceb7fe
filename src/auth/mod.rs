//! Bearer-token authentication for businesses, admins and customers.

pub mod extractors;
pub mod password;
pub mod token;

use thiserror::Error;

pub use extractors::{AuthenticatedAdmin, AuthenticatedBusiness, AuthenticatedCustomer};
pub use password::{hash_password, verify_password};
pub use token::{Claims, Subject, TokenService};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing or malformed Authorization header")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Token is not valid for this resource")]
    WrongActor,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token signing failed: {0}")]
    Signing(String),
}
