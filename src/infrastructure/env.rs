use std::{collections::HashMap, env, str::FromStr};
use tracing::warn;

/// Returns a HashMap containing all environment variables.
pub fn get_envv() -> HashMap<String, String> {
    env::vars().collect()
}

/// Returns the value of an environment variable or a default value if not found.
///
/// ```rust
/// let url = notification_sync::infrastructure::env::get_env_or(
///     "NOTIFICATION_SYNC_API_URL",
///     "http://localhost:8080/api",
/// );
/// assert!(!url.is_empty());
/// ```
pub fn get_env_or(key: &str, default: &str) -> String {
    get_envv()
        .remove(key)
        .unwrap_or_else(|| default.to_string())
}

/// Returns the variable when it is set and not blank.
pub fn get_env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parses a variable, warning and falling back to `default` when it is
/// missing or malformed.
pub fn get_env_parsed<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring malformed value {:?} for {}", raw, key);
                default
            }
        },
        Err(_) => default,
    }
}
