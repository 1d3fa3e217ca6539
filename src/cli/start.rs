use crate::cli::{actions::Action, commands, dispatch, telemetry};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::Level;

/// Map verbosity count to tracing level
const fn get_verbosity_level(verbosity: u8) -> Option<Level> {
    match verbosity {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

/// Load `path` into the process environment unless `PROD=true`.
///
/// Variables already set win over the file. Returns whether the file was read.
fn load_dotenv(path: &Path) -> Result<bool> {
    if std::env::var("PROD").is_ok_and(|value| value == "true") || !path.is_file() {
        return Ok(false);
    }

    dotenvy::from_path(path).with_context(|| format!("Failed to load {}", path.display()))?;

    Ok(true)
}

/// Parse arguments, initialize telemetry and return the action to run.
///
/// # Errors
///
/// Returns an error if `.env` is unreadable, or telemetry initialization or
/// action dispatch fails
pub fn start() -> Result<Action> {
    load_dotenv(Path::new(".env"))?;

    let matches = commands::new().get_matches();

    let verbosity_level = get_verbosity_level(
        matches
            .get_one::<u8>(commands::logging::ARG_VERBOSITY)
            .copied()
            .unwrap_or(0),
    );

    telemetry::init(verbosity_level)?;

    dispatch::handler(&matches)
}
