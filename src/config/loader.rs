//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (ACL_OVERVIEW_*)
//! 2. Configuration file (TOML)
//! 3. Default values

use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "acl-overview.toml",
    ".acl-overview.toml",
    "~/.config/acl-overview/config.toml",
    "/etc/acl-overview/config.toml",
];

/// Environment variable prefix; `__` separates nested keys
pub const ENV_PREFIX: &str = "ACL_OVERVIEW";

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. Defaults come from serde defaults on AppConfig

    // 2. Configuration file
    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // First existing default path wins
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // 3. Environment, e.g. ACL_OVERVIEW_REPOSITORY__SNAPSHOT, ACL_OVERVIEW_LAYOUT__ACL_PREFIX
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("report.include")
            .with_list_parse_key("report.exclude"),
    );

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let layout = &config.layout;
    for (field, value) in [
        ("layout.principal_workspace", &layout.principal_workspace),
        ("layout.role_workspace", &layout.role_workspace),
        ("layout.group_workspace", &layout.group_workspace),
        ("layout.roles_collection", &layout.roles_collection),
        ("layout.groups_collection", &layout.groups_collection),
        ("layout.acl_prefix", &layout.acl_prefix),
        ("layout.path_property", &layout.path_property),
        ("layout.permission_property", &layout.permission_property),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: field.to_string(),
            });
        }
    }

    for (field, value) in [
        ("layout.roles_collection", &layout.roles_collection),
        ("layout.groups_collection", &layout.groups_collection),
    ] {
        if value.contains('/') {
            return Err(ConfigError::Invalid {
                message: format!("{} must be a single record name, got: {}", field, value),
            });
        }
    }

    if let Some(snapshot) = &config.repository.snapshot
        && snapshot.trim().is_empty()
    {
        return Err(ConfigError::Invalid {
            message: "repository.snapshot must not be empty".to_string(),
        });
    }

    validate_patterns(&config.report.include, "report.include")?;
    validate_patterns(&config.report.exclude, "report.exclude")?;

    Ok(())
}

/// Validate that all patterns are valid regex
fn validate_patterns(patterns: &[String], field_path: &str) -> Result<(), ConfigError> {
    for pattern in patterns {
        if let Err(e) = regex::Regex::new(pattern) {
            return Err(ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                reason: format!("in {}: {}", field_path, e),
            });
        }
    }
    Ok(())
}
