//! Overview types
//!
//! Transient projections of stored principals, roles and groups, and the
//! repository-grouped result handed to callers.

use crate::repository::{Record, RecordPath};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// The principal whose permissions are being collected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalRef {
    pub id: String,
    pub path: RecordPath,
}

impl PrincipalRef {
    pub fn new(id: impl Into<String>, path: RecordPath) -> Self {
        Self {
            id: id.into(),
            path,
        }
    }
}

impl From<Record> for PrincipalRef {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            path: record.path,
        }
    }
}

/// A resolved role
///
/// The display name is the role record's name. ACL-definition blocks are read
/// lazily through `record` by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub record: Record,
}

impl From<Record> for Role {
    fn from(record: Record) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            record,
        }
    }
}

/// A resolved group; its own role references live under `record`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub record: Record,
}

impl From<Record> for Group {
    fn from(record: Record) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            record,
        }
    }
}

/// Display level of a raw permission code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionLevel {
    /// Read and write access
    All,
    /// Read-only access
    Read,
    /// Access explicitly denied
    None,
    /// Code absent or not one of the known values
    Unknown,
}

impl PermissionLevel {
    /// Human-readable label
    pub const fn label(&self) -> &'static str {
        match self {
            PermissionLevel::All => "Read/Write",
            PermissionLevel::Read => "Read Only",
            PermissionLevel::None => "Deny Access",
            PermissionLevel::Unknown => "",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for PermissionLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One access-control entry granted by a role on a repository path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AclEntry {
    pub repository: String,
    pub path: String,
    pub permission: PermissionLevel,
    pub role_name: String,
}

impl AclEntry {
    pub fn permission_label(&self) -> &'static str {
        self.permission.label()
    }
}

/// Entries grouped by repository name, in first-seen repository order
///
/// A repository key is only present when it holds at least one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Overview {
    repositories: IndexMap<String, Vec<AclEntry>>,
}

impl Overview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to its repository group
    pub fn push(&mut self, entry: AclEntry) {
        self.repositories
            .entry(entry.repository.clone())
            .or_default()
            .push(entry);
    }

    /// Repository names in first-seen order
    pub fn repositories(&self) -> impl Iterator<Item = &str> {
        self.repositories.keys().map(String::as_str)
    }

    /// Entries for a repository, `None` if it has none
    pub fn entries(&self, repository: &str) -> Option<&[AclEntry]> {
        self.repositories.get(repository).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AclEntry])> {
        self.repositories
            .iter()
            .map(|(repo, entries)| (repo.as_str(), entries.as_slice()))
    }

    /// Number of repositories
    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Number of entries across all repositories
    pub fn total_entries(&self) -> usize {
        self.repositories.values().map(Vec::len).sum()
    }
}

impl FromIterator<AclEntry> for Overview {
    fn from_iter<I: IntoIterator<Item = AclEntry>>(iter: I) -> Self {
        let mut overview = Overview::new();
        for entry in iter {
            overview.push(entry);
        }
        overview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(repository: &str, path: &str) -> AclEntry {
        AclEntry {
            repository: repository.to_string(),
            path: path.to_string(),
            permission: PermissionLevel::Read,
            role_name: "editors".to_string(),
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(PermissionLevel::All.label(), "Read/Write");
        assert_eq!(PermissionLevel::Read.label(), "Read Only");
        assert_eq!(PermissionLevel::None.label(), "Deny Access");
        assert_eq!(PermissionLevel::Unknown.label(), "");
    }

    #[test]
    fn test_overview_groups_in_first_seen_order() {
        let overview: Overview = vec![
            entry("website", "/a"),
            entry("dam", "/b"),
            entry("website", "/c"),
        ]
        .into_iter()
        .collect();

        assert_eq!(overview.repositories().collect::<Vec<_>>(), vec!["website", "dam"]);
        let paths: Vec<_> = overview
            .entries("website")
            .unwrap()
            .iter()
            .map(|e| e.path.as_str())
            .collect();
        assert_eq!(paths, vec!["/a", "/c"]);
        assert_eq!(overview.len(), 2);
        assert_eq!(overview.total_entries(), 3);
    }

    #[test]
    fn test_empty_overview_has_no_keys() {
        let overview = Overview::new();
        assert!(overview.is_empty());
        assert!(overview.entries("website").is_none());
        assert_eq!(serde_json::to_string(&overview).unwrap(), "{}");
    }

    #[test]
    fn test_serialize_entry_uses_label() {
        let mut overview = Overview::new();
        overview.push(AclEntry {
            repository: "website".into(),
            path: "/".into(),
            permission: PermissionLevel::All,
            role_name: "editors".into(),
        });

        let json = serde_json::to_value(&overview).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "website": [
                    {
                        "repository": "website",
                        "path": "/",
                        "permission": "Read/Write",
                        "role_name": "editors"
                    }
                ]
            })
        );
    }
}
