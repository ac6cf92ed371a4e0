//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use url::Url;

use crate::config::schema::GatekeeperConfig;
use crate::config::validation::validate_config;
use crate::error::ConfigError;

/// Read and deserialize a TOML file without semantic validation.
///
/// CLI overrides are applied to the result before [`finalize`].
pub fn read_config(path: &Path) -> Result<GatekeeperConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Deserialize configuration from TOML text.
pub fn parse_config(content: &str) -> Result<GatekeeperConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Validate a configuration assembled in code (defaults plus overrides).
pub fn finalize(config: GatekeeperConfig) -> Result<GatekeeperConfig, ConfigError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    if let Ok(origin) = Url::parse(&config.upstream.origin) {
        if origin.path() != "/" {
            tracing::warn!(
                origin = %config.upstream.origin,
                path = origin.path(),
                "Upstream origin path is ignored; inbound paths are forwarded as-is"
            );
        }
    }

    Ok(config)
}
