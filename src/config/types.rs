//! Configuration types for acl-overview
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Record store settings
    pub repository: RepositoryConfig,

    /// Names and conventions of the stored records
    pub layout: LayoutConfig,

    /// Role resolution settings
    pub resolver: ResolverConfig,

    /// Overview output settings
    pub report: ReportConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Record store configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Snapshot file to load (`.json` or `.toml`)
    pub snapshot: Option<String>,
}

/// Layout of principal, group and role records
///
/// A principal record holds its role references as the properties of a
/// `roles` child and its group references as the properties of a `groups`
/// child. Groups hold role references the same way. A role record has one
/// child per target repository named `<acl_prefix><repository>`, and every
/// child of such a block is one raw entry with a path and a permission code.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Workspace holding principals
    pub principal_workspace: String,

    /// Workspace holding roles
    pub role_workspace: String,

    /// Workspace holding groups
    pub group_workspace: String,

    /// Child record holding role references
    pub roles_collection: String,

    /// Child record holding group references
    pub groups_collection: String,

    /// Prefix of ACL-definition block names
    pub acl_prefix: String,

    /// Entry property holding the path
    pub path_property: String,

    /// Entry property holding the permission code
    pub permission_property: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            principal_workspace: "users".to_string(),
            role_workspace: "userroles".to_string(),
            group_workspace: "usergroups".to_string(),
            roles_collection: "roles".to_string(),
            groups_collection: "groups".to_string(),
            acl_prefix: "acl_".to_string(),
            path_property: "path".to_string(),
            permission_property: "permissions".to_string(),
        }
    }
}

/// Role resolution configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Keep only the first occurrence of a role reached more than once
    pub deduplicate_roles: bool,
}

/// Overview output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format
    pub format: OutputFormat,

    /// Repository name patterns to include (regex, overrides exclude)
    pub include: Vec<String>,

    /// Repository name patterns to exclude (regex)
    pub exclude: Vec<String>,
}

/// Overview output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned text table
    #[default]
    Table,
    /// JSON object keyed by repository
    Json,
}

impl OutputFormat {
    /// Try to parse a format from a string
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
