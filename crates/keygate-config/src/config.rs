// crates/keygate-config/src/config.rs
// ============================================================================
// Module: Keygate Configuration
// Description: Configuration loading and validation for the gateway.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: keygate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed: the gateway refuses to
//! start rather than running with a partially-applied admission policy.
//! Unknown fields are parse errors so typos cannot silently relax policy.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use keygate_core::AdmissionSettings;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "keygate.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "KEYGATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of administrative secrets.
pub(crate) const MAX_ADMIN_SECRETS: usize = 64;
/// Maximum length of an administrative secret.
pub(crate) const MAX_ADMIN_SECRET_LENGTH: usize = 256;
/// Maximum number of allow-listed client addresses.
pub(crate) const MAX_ALLOWED_IPS: usize = 1024;
/// Maximum length of a single allow-listed address.
pub(crate) const MAX_IP_LENGTH: usize = 64;
/// Maximum number of globally allowed routes.
pub(crate) const MAX_ALLOWED_ROUTES: usize = 256;
/// Maximum length of a single route entry.
pub(crate) const MAX_ROUTE_LENGTH: usize = 512;

// ============================================================================
// SECTION: Gateway Configuration
// ============================================================================

/// Top-level gateway configuration model.
///
/// # Invariants
/// - Unknown fields are rejected at parse time.
/// - A loaded value has passed [`GatewayConfig::validate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Admission pipeline settings.
    #[serde(default)]
    pub admission: AdmissionConfig,
}

impl GatewayConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path argument wins; otherwise the `KEYGATE_CONFIG` environment
    /// variable, then `keygate.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.admission.validate()
    }

    /// Converts the configuration into the engine's settings snapshot.
    #[must_use]
    pub fn into_settings(self) -> AdmissionSettings {
        self.admission.into_settings()
    }
}

// ============================================================================
// SECTION: Admission Configuration
// ============================================================================

/// Admission pipeline configuration section.
///
/// # Invariants
/// - `allowed_ips = []` is a valid deny-all policy; absence means no
///   restriction. The same distinction holds for `allowed_routes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdmissionConfig {
    /// Administrative secrets granting the highest-privilege role.
    #[serde(default)]
    pub admin_secrets: Vec<String>,
    /// Source-IP allow-list; absent means no restriction.
    pub allowed_ips: Option<Vec<String>>,
    /// Trust the forwarding header in place of the transport address.
    #[serde(default)]
    pub use_x_forwarded_for: bool,
    /// Global route allow-list evaluated before any role matrix.
    pub allowed_routes: Option<Vec<String>>,
}

impl AdmissionConfig {
    /// Validates the admission section against hard limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a collection exceeds its bound
    /// or an entry is empty or over-long.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_secrets.len() > MAX_ADMIN_SECRETS {
            return Err(ConfigError::Invalid("too many admin secrets".to_string()));
        }
        for secret in &self.admin_secrets {
            if secret.trim().is_empty() {
                return Err(ConfigError::Invalid("admin secret must be non-empty".to_string()));
            }
            if secret.len() > MAX_ADMIN_SECRET_LENGTH {
                return Err(ConfigError::Invalid("admin secret exceeds max length".to_string()));
            }
        }
        if let Some(ips) = &self.allowed_ips {
            if ips.len() > MAX_ALLOWED_IPS {
                return Err(ConfigError::Invalid("too many allowed ips".to_string()));
            }
            for ip in ips {
                if ip.trim().is_empty() {
                    return Err(ConfigError::Invalid("allowed ip must be non-empty".to_string()));
                }
                if ip.len() > MAX_IP_LENGTH {
                    return Err(ConfigError::Invalid("allowed ip exceeds max length".to_string()));
                }
            }
        }
        if let Some(routes) = &self.allowed_routes {
            if routes.len() > MAX_ALLOWED_ROUTES {
                return Err(ConfigError::Invalid("too many allowed routes".to_string()));
            }
            for route in routes {
                if route.trim().is_empty() {
                    return Err(ConfigError::Invalid(
                        "allowed route must be non-empty".to_string(),
                    ));
                }
                if route.len() > MAX_ROUTE_LENGTH {
                    return Err(ConfigError::Invalid(
                        "allowed route exceeds max length".to_string(),
                    ));
                }
                if !route.starts_with('/') {
                    return Err(ConfigError::Invalid(
                        "allowed route must start with '/'".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Converts the section into the engine's settings snapshot.
    #[must_use]
    pub fn into_settings(self) -> AdmissionSettings {
        AdmissionSettings {
            admin_secrets: self.admin_secrets,
            allowed_ips: self.allowed_ips,
            use_x_forwarded_for: self.use_x_forwarded_for,
            allowed_routes: self.allowed_routes,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}
