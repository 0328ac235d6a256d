//! ACL Overview
//!
//! Computes the effective access-control entries of a security principal
//! stored in a tree-structured repository.
//!
//! ## Features
//!
//! - **Role resolution** through direct assignment and one level of group membership
//! - **ACL extraction** from per-repository definition blocks (`acl_<repository>`)
//! - **Failure isolation**: unreadable or dangling records shrink the result, never abort it
//! - **Flexible configuration** via TOML files and environment variables
//!
//! ## Example Configuration
//!
//! ```toml
//! [repository]
//! snapshot = "site.json"
//!
//! [layout]
//! acl_prefix = "acl_"             # Blocks named acl_<repository>
//! permission_property = "permissions"
//!
//! [resolver]
//! deduplicate_roles = false       # Roles reached twice are listed twice
//!
//! [report]
//! format = "table"
//! exclude = ["^config$"]          # Hide the config repository
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod overview;
pub mod report;
pub mod repository;

// Re-export main types
pub use config::{AppConfig, load_config};
pub use error::{AppError, Result};
pub use overview::{AclEntry, Overview, OverviewBuilder, PermissionLevel, PrincipalRef};
pub use repository::{InMemoryRepository, RepositoryReader};
