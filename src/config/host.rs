//! Current host identity.
//!
//! Resolved once per run, in priority order: the `--host` flag, the
//! `DOTFILEMANAGER_HOSTNAME` environment variable, then the machine name
//! reported by the operating system.
use crate::error::ConfigError;

/// Environment variable that overrides the machine name.
pub const HOST_ENV_VAR: &str = "DOTFILEMANAGER_HOSTNAME";

/// Resolve the host name for this run from the real environment.
///
/// # Errors
///
/// Returns [`ConfigError::HostUnavailable`] if no override is given and the
/// operating system's machine name cannot be read as UTF-8.
pub fn resolve(flag: Option<&str>) -> Result<String, ConfigError> {
    resolve_with(flag, |key| std::env::var(key).ok(), system_hostname)
}

/// Resolve the host name with injectable lookups.
///
/// Empty overrides are ignored so that `DOTFILEMANAGER_HOSTNAME=` behaves
/// like an unset variable.
///
/// # Errors
///
/// Returns [`ConfigError::HostUnavailable`] if every source comes up empty.
pub fn resolve_with<E, S>(flag: Option<&str>, env: E, system: S) -> Result<String, ConfigError>
where
    E: Fn(&str) -> Option<String>,
    S: FnOnce() -> Result<String, ConfigError>,
{
    if let Some(host) = flag.filter(|h| !h.is_empty()) {
        return Ok(host.to_string());
    }
    if let Some(host) = env(HOST_ENV_VAR).filter(|h| !h.is_empty()) {
        return Ok(host);
    }
    system()
}

fn system_hostname() -> Result<String, ConfigError> {
    let name = hostname::get().map_err(|e| ConfigError::HostUnavailable(e.to_string()))?;
    name.into_string()
        .map_err(|raw| ConfigError::HostUnavailable(format!("not valid UTF-8: {}", raw.display())))
}
