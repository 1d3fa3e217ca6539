use crate::bank::auth::token::DEFAULT_TOKEN_TTL_SECONDS;
use anyhow::{Context, Result};
use clap::{Arg, Command};
use secrecy::SecretString;

pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_TOKEN_TTL_SECONDS: &str = "token-ttl-seconds";

#[derive(Debug)]
pub struct Options {
    pub jwt_secret: SecretString,
    pub token_ttl_seconds: u64,
}

impl Options {
    /// # Errors
    /// Returns an error if the signing secret is missing.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let jwt_secret = matches
            .get_one::<String>(ARG_JWT_SECRET)
            .cloned()
            .map(SecretString::from)
            .context("missing required argument: --jwt-secret")?;

        let token_ttl_seconds = matches
            .get_one::<u64>(ARG_TOKEN_TTL_SECONDS)
            .copied()
            .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS);

        Ok(Self {
            jwt_secret,
            token_ttl_seconds,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("Secret used to sign and verify HS256 tokens")
                .env("BANKD_JWT_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_TOKEN_TTL_SECONDS)
                .long(ARG_TOKEN_TTL_SECONDS)
                .help("Lifetime of issued tokens in seconds")
                .env("BANKD_TOKEN_TTL_SECONDS")
                .default_value("3600")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}
