//! ACL extraction
//!
//! Turns a role's ACL-definition blocks into [`AclEntry`] values. Each block
//! is a child of the role record named `<prefix><repository>`; each child of a
//! block is one raw entry.
//!
//! An entry whose permission code cannot be read is dropped. A missing path
//! is not a drop condition and reads as the empty string.

use crate::config::LayoutConfig;
use crate::overview::codec;
use crate::overview::types::{AclEntry, Role};
use crate::repository::{RecordPath, RepositoryReader};
use tracing::{debug, trace, warn};

/// Repository name encoded in an ACL-definition block name
///
/// Returns `None` for names without the prefix or with nothing after it.
pub fn parse_acl_block_name<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    name.strip_prefix(prefix).filter(|repo| !repo.is_empty())
}

/// Reads access-control entries from role records
pub struct AclExtractor<'a, R: ?Sized> {
    reader: &'a R,
    layout: &'a LayoutConfig,
}

impl<'a, R: RepositoryReader + ?Sized> AclExtractor<'a, R> {
    pub fn new(reader: &'a R, layout: &'a LayoutConfig) -> Self {
        Self { reader, layout }
    }

    /// All entries granted by a role, in block order then entry order
    pub fn extract(&self, role: &Role) -> Vec<AclEntry> {
        let role_path = &role.record.path;
        let blocks = match self.reader.child_names(role_path) {
            Ok(names) => names,
            Err(e) => {
                warn!(role = %role.name, error = %e, "Cannot list ACL blocks, skipping role");
                return Vec::new();
            }
        };

        let mut entries = Vec::new();
        for block in &blocks {
            let Some(repository) = parse_acl_block_name(block, &self.layout.acl_prefix) else {
                trace!(role = %role.name, child = %block, "Not an ACL block");
                continue;
            };
            self.extract_block(role, repository, &role_path.child(block), &mut entries);
        }

        debug!(role = %role.name, entries = entries.len(), "Extracted ACL entries");
        entries
    }

    fn extract_block(
        &self,
        role: &Role,
        repository: &str,
        block_path: &RecordPath,
        out: &mut Vec<AclEntry>,
    ) {
        let names = match self.reader.child_names(block_path) {
            Ok(names) => names,
            Err(e) => {
                warn!(block = %block_path, error = %e, "Cannot list ACL entries, skipping block");
                return;
            }
        };

        for name in &names {
            let entry_path = block_path.child(name);

            let code = match self
                .reader
                .property(&entry_path, &self.layout.permission_property)
            {
                Ok(Some(code)) => code,
                Ok(None) => {
                    debug!(entry = %entry_path, "Entry has no permission code, dropping");
                    continue;
                }
                Err(e) => {
                    warn!(entry = %entry_path, error = %e, "Permission code unreadable, dropping entry");
                    continue;
                }
            };

            out.push(AclEntry {
                repository: repository.to_string(),
                path: self.read_path(&entry_path),
                permission: codec::level_for(Some(&code)),
                role_name: role.name.clone(),
            });
        }
    }

    fn read_path(&self, entry_path: &RecordPath) -> String {
        match self.reader.property(entry_path, &self.layout.path_property) {
            Ok(Some(value)) => value.to_string(),
            Ok(None) => String::new(),
            Err(e) => {
                debug!(entry = %entry_path, error = %e, "Entry path unreadable");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overview::types::PermissionLevel;
    use crate::repository::{InMemoryRepository, RecordRef, SnapshotRecord};

    fn entry(name: &str, path: &str, code: i64) -> SnapshotRecord {
        SnapshotRecord::new(name)
            .with_property("path", path)
            .with_property("permissions", code)
    }

    fn role(repo: &InMemoryRepository, id: &str) -> Role {
        repo.dereference(&RecordRef::new("userroles", id))
            .unwrap()
            .unwrap()
            .into()
    }

    #[test]
    fn test_parse_acl_block_name() {
        assert_eq!(parse_acl_block_name("acl_website", "acl_"), Some("website"));
        assert_eq!(parse_acl_block_name("acl_dam", "acl_"), Some("dam"));
        assert_eq!(parse_acl_block_name("acl_", "acl_"), None);
        assert_eq!(parse_acl_block_name("title", "acl_"), None);
        assert_eq!(parse_acl_block_name("website_acl", "acl_"), None);
    }

    #[test]
    fn test_extract_entries_in_order() {
        let mut repo = InMemoryRepository::new();
        repo.insert_records(
            "userroles",
            vec![
                SnapshotRecord::new("editors")
                    .with_id("editors")
                    .with_child(
                        SnapshotRecord::new("acl_website")
                            .with_child(entry("0", "/", 63))
                            .with_child(entry("1", "/news", 8)),
                    )
                    .with_child(SnapshotRecord::new("description"))
                    .with_child(SnapshotRecord::new("acl_dam").with_child(entry("0", "/", 0))),
            ],
        )
        .unwrap();

        let layout = LayoutConfig::default();
        let extractor = AclExtractor::new(&repo, &layout);
        let entries = extractor.extract(&role(&repo, "editors"));

        let summary: Vec<_> = entries
            .iter()
            .map(|e| (e.repository.as_str(), e.path.as_str(), e.permission))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("website", "/", PermissionLevel::All),
                ("website", "/news", PermissionLevel::Read),
                ("dam", "/", PermissionLevel::None),
            ]
        );
        assert!(entries.iter().all(|e| e.role_name == "editors"));
    }

    #[test]
    fn test_role_without_blocks_is_empty() {
        let mut repo = InMemoryRepository::new();
        repo.insert_records(
            "userroles",
            vec![
                SnapshotRecord::new("plain")
                    .with_id("plain")
                    .with_child(SnapshotRecord::new("settings")),
            ],
        )
        .unwrap();

        let layout = LayoutConfig::default();
        let extractor = AclExtractor::new(&repo, &layout);
        assert!(extractor.extract(&role(&repo, "plain")).is_empty());
    }

    #[test]
    fn test_missing_path_kept_missing_code_dropped() {
        let mut repo = InMemoryRepository::new();
        repo.insert_records(
            "userroles",
            vec![
                SnapshotRecord::new("editors").with_id("editors").with_child(
                    SnapshotRecord::new("acl_website")
                        .with_child(SnapshotRecord::new("0").with_property("permissions", 8))
                        .with_child(SnapshotRecord::new("1").with_property("path", "/orphan"))
                        .with_child(entry("2", "/odd", 5)),
                ),
            ],
        )
        .unwrap();

        let layout = LayoutConfig::default();
        let extractor = AclExtractor::new(&repo, &layout);
        let entries = extractor.extract(&role(&repo, "editors"));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "");
        assert_eq!(entries[0].permission, PermissionLevel::Read);
        assert_eq!(entries[1].path, "/odd");
        assert_eq!(entries[1].permission_label(), "");
    }

    #[test]
    fn test_unreadable_block_skips_only_that_block() {
        let mut repo = InMemoryRepository::new();
        repo.insert_records(
            "userroles",
            vec![
                SnapshotRecord::new("editors")
                    .with_id("editors")
                    .with_child(
                        SnapshotRecord::new("acl_website")
                            .mark_unreadable()
                            .with_child(entry("0", "/", 63)),
                    )
                    .with_child(SnapshotRecord::new("acl_dam").with_child(entry("0", "/", 8))),
            ],
        )
        .unwrap();

        let layout = LayoutConfig::default();
        let extractor = AclExtractor::new(&repo, &layout);
        let entries = extractor.extract(&role(&repo, "editors"));

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].repository, "dam");
    }

    #[test]
    fn test_custom_layout() {
        let mut repo = InMemoryRepository::new();
        repo.insert_records(
            "userroles",
            vec![
                SnapshotRecord::new("editors").with_id("editors").with_child(
                    SnapshotRecord::new("perm_forum").with_child(
                        SnapshotRecord::new("0")
                            .with_property("target", "/board")
                            .with_property("level", 63),
                    ),
                ),
            ],
        )
        .unwrap();

        let layout = LayoutConfig {
            acl_prefix: "perm_".to_string(),
            path_property: "target".to_string(),
            permission_property: "level".to_string(),
            ..Default::default()
        };
        let extractor = AclExtractor::new(&repo, &layout);
        let entries = extractor.extract(&role(&repo, "editors"));

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].repository, "forum");
        assert_eq!(entries[0].path, "/board");
        assert_eq!(entries[0].permission, PermissionLevel::All);
    }
}
