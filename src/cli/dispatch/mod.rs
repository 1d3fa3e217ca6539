use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{auth, ARG_DSN, ARG_IN_MEMORY, ARG_PORT, ARG_SEED};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(3000);
    let in_memory = matches.get_flag(ARG_IN_MEMORY);

    let dsn = matches.get_one::<String>(ARG_DSN).cloned();
    if !in_memory && dsn.is_none() {
        return Err(anyhow::anyhow!("missing required argument: --dsn"));
    }

    let auth_opts = auth::Options::parse(matches).context("invalid token settings")?;

    Ok(Action::Server(Args {
        port,
        dsn,
        in_memory,
        seed: matches.get_flag(ARG_SEED),
        jwt_secret: auth_opts.jwt_secret,
        token_ttl_seconds: auth_opts.token_ttl_seconds,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    #[test]
    fn builds_server_action() {
        temp_env::with_vars(
            [
                ("BANKD_PORT", None::<&str>),
                ("BANKD_SEED", None),
                ("BANKD_IN_MEMORY", None),
                ("BANKD_TOKEN_TTL_SECONDS", None),
            ],
            || {
                let matches = commands::new().get_matches_from(vec![
                    "bankd",
                    "--dsn",
                    "postgres://bank@localhost:5432/bank",
                    "--jwt-secret",
                    "s3cret",
                    "--seed",
                ]);

                let Action::Server(args) = handler(&matches).unwrap();
                assert_eq!(args.port, 3000);
                assert_eq!(
                    args.dsn.as_deref(),
                    Some("postgres://bank@localhost:5432/bank")
                );
                assert!(!args.in_memory);
                assert!(args.seed);
                assert_eq!(args.jwt_secret.expose_secret(), "s3cret");
                assert_eq!(args.token_ttl_seconds, 3600);
            },
        );
    }

    #[test]
    fn in_memory_without_dsn() {
        temp_env::with_vars([("BANKD_DSN", None::<&str>)], || {
            let matches = commands::new().get_matches_from(vec![
                "bankd",
                "--in-memory",
                "--jwt-secret",
                "s3cret",
            ]);

            let Action::Server(args) = handler(&matches).unwrap();
            assert!(args.in_memory);
            assert!(args.dsn.is_none());
        });
    }
}
