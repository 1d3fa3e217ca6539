//! Credentials, tokens and the per-account access gate.
//!
//! Flow Overview: `POST /login` loads the account by number, checks the password
//! with [`password::verify_password`] and returns a token from
//! [`token::TokenService::issue`]. Protected routes run
//! [`gate::require_account_owner`] before the handler.

pub mod gate;
pub mod password;
pub mod token;

pub use gate::{require_account_owner, AuthorizedAccount, TOKEN_HEADER};
pub use token::{Claims, TokenService};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to hash password")]
    Hashing,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid token")]
    InvalidToken,
    #[error("failed to sign token")]
    Signing,
    #[error("configuration error: {0}")]
    Configuration(&'static str),
}
