//! Permission overview engine
//!
//! Computes which access-control entries a principal effectively holds,
//! grouped by target repository.
//!
//! ## Resolution Model
//!
//! ```text
//! principal → direct roles ─┐
//!           → groups → roles ┴→ ACL blocks (acl_<repository>) → entries → overview
//! ```
//!
//! - Direct roles come first, then roles inherited through groups, in
//!   encounter order. Group membership is followed one level deep.
//! - A role reached twice contributes its entries twice unless deduplication
//!   is enabled.
//! - Dangling references, unreadable records and unreadable reference
//!   collections are skipped at the smallest possible scope.
//! - An entry without a readable permission code is dropped; an unknown code
//!   keeps the entry with an empty label.
//!
//! ## Example
//!
//! ```
//! use acl_overview::config::LayoutConfig;
//! use acl_overview::overview::{OverviewBuilder, PrincipalRef};
//! use acl_overview::repository::{InMemoryRepository, SnapshotRecord};
//!
//! let mut repo = InMemoryRepository::new();
//! repo.insert_records("userroles", vec![
//!     SnapshotRecord::new("editors").with_id("r-editors").with_child(
//!         SnapshotRecord::new("acl_website").with_child(
//!             SnapshotRecord::new("0")
//!                 .with_property("path", "/")
//!                 .with_property("permissions", 63),
//!         ),
//!     ),
//! ]).unwrap();
//! repo.insert_records("users", vec![
//!     SnapshotRecord::new("alice")
//!         .with_child(SnapshotRecord::new("roles").with_property("0", "r-editors")),
//! ]).unwrap();
//!
//! let layout = LayoutConfig::default();
//! let alice: PrincipalRef = repo.find("users", "alice").unwrap().into();
//! let overview = OverviewBuilder::new(&repo, &layout).build(&alice);
//!
//! assert_eq!(overview.entries("website").unwrap()[0].permission_label(), "Read/Write");
//! ```

pub mod builder;
pub mod codec;
pub mod extractor;
pub mod filter;
pub mod resolver;
pub mod types;

pub use builder::OverviewBuilder;
pub use codec::{label_for, level_for};
pub use extractor::{AclExtractor, parse_acl_block_name};
pub use filter::RepositoryFilter;
pub use resolver::RoleResolver;
pub use types::{AclEntry, Group, Overview, PermissionLevel, PrincipalRef, Role};
