//! # Bankd (Banking Accounts API)
//!
//! `bankd` is a small JSON REST service over a single `accounts` table. Clients
//! create accounts, log in with the account number and password, and receive a
//! bearer token that grants access to that one account.
//!
//! ## Authentication
//!
//! Passwords are hashed with **Argon2id** before they reach the store; the
//! plaintext is never persisted or logged. Login returns an **HS256 JWT** bound
//! to the account number. The signing secret is loaded once at startup and the
//! process refuses to start without it.
//!
//! ## Access Gate
//!
//! Routes under `/accounts/{id}` require the `x-jwt-token` header. The gate
//! verifies the token, loads the account behind `{id}` and only lets the request
//! through when both account numbers match. Every denial looks the same to the
//! client (`401 {"error":"permission denied"}`) so callers cannot learn which
//! check failed.

pub mod bank;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
