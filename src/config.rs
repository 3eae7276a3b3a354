//! Runtime configuration from flags and environment.

use std::env;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::ConfigError;

/// Environment variable holding the committer identity.
pub const COMMITTER_ENV_VAR: &str = "TRACKCHANGES_COMMITTER";

/// Environment variable holding the checkout directory.
pub const CHECKOUT_DIR_ENV_VAR: &str = "TRACKCHANGES_CHECKOUT_DIR";

/// Read a non-empty environment variable, warning when it is set but empty.
fn non_empty_env(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        Ok(_) => {
            warn!("{} is set but empty, ignoring it", name);
            None
        }
        Err(_) => None,
    }
}

/// Committer identity for entry headers.
///
/// Uses `flag` if given, then [`COMMITTER_ENV_VAR`], then
/// `user.name <user.email>` from the default git configuration.
pub fn resolve_committer(flag: Option<&str>) -> Result<String, ConfigError> {
    if let Some(committer) = flag {
        return Ok(committer.to_string());
    }

    if let Some(committer) = non_empty_env(COMMITTER_ENV_VAR) {
        debug!("Using committer from {}", COMMITTER_ENV_VAR);
        return Ok(committer);
    }

    let config = git2::Config::open_default().map_err(ConfigError::GitConfig)?;
    committer_from_git_config(&config).ok_or(ConfigError::MissingCommitter)
}

/// `user.name <user.email>` from a git configuration, if both are set.
pub fn committer_from_git_config(config: &git2::Config) -> Option<String> {
    let name = config.get_string("user.name").ok()?;
    let email = config.get_string("user.email").ok()?;
    Some(format!("{} <{}>", name, email))
}

/// Checkout directory from `flag` or [`CHECKOUT_DIR_ENV_VAR`], made absolute.
pub fn resolve_checkout_dir(flag: Option<PathBuf>) -> Option<PathBuf> {
    let dir = flag.or_else(|| non_empty_env(CHECKOUT_DIR_ENV_VAR).map(PathBuf::from))?;
    Some(std::path::absolute(&dir).unwrap_or(dir))
}
