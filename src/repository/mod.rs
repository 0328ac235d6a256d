//! Repository read interface
//!
//! The overview engine only ever reads from a tree-structured record store.
//! Records live in named workspaces, are addressed by slash-separated paths and
//! carry ordered scalar properties plus ordered named children.
//!
//! Implementations report failures as [`RepositoryError`]; deciding what a
//! failure means is left to the caller. Missing records, missing properties and
//! dangling references are *not* failures: they come back as empty lists or
//! `None`.
//!
//! [`RepositoryError`]: crate::error::RepositoryError

pub mod memory;

use crate::error::RepositoryResult;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use memory::{InMemoryRepository, Snapshot, SnapshotRecord, WorkspaceSnapshot};

/// Address of a record: workspace name plus absolute path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordPath {
    workspace: String,
    path: String,
}

impl RecordPath {
    /// Create a path, normalizing it to a single leading slash and no trailing slash
    pub fn new(workspace: impl Into<String>, path: impl AsRef<str>) -> Self {
        let trimmed = path.as_ref().trim_matches('/');
        Self {
            workspace: workspace.into(),
            path: format!("/{}", trimmed),
        }
    }

    /// The root record of a workspace
    pub fn root(workspace: impl Into<String>) -> Self {
        Self::new(workspace, "/")
    }

    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.path == "/"
    }

    /// Last path segment (empty for the root)
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }

    /// Path of the named child record
    pub fn child(&self, name: &str) -> Self {
        let path = if self.is_root() {
            format!("/{}", name)
        } else {
            format!("{}/{}", self.path, name)
        };
        Self {
            workspace: self.workspace.clone(),
            path,
        }
    }
}

impl fmt::Display for RecordPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.workspace, self.path)
    }
}

/// Read-only handle to a stored record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub path: RecordPath,
}

/// Identifier-style reference to a record in a given workspace
///
/// Role and group references stored on principals and groups are both of this
/// shape; only the target workspace differs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordRef {
    pub workspace: String,
    pub id: String,
}

impl RecordRef {
    pub fn new(workspace: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.workspace, self.id)
    }
}

/// Stored scalar property value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Integer(i64),
    String(String),
}

impl PropertyValue {
    /// Integer view of the value, accepting integer-valued strings
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(n) => Some(*n),
            PropertyValue::String(s) => s.trim().parse().ok(),
            PropertyValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Integer(n) => write!(f, "{}", n),
            PropertyValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Integer(value.into())
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

/// Read access to a tree-structured record store
pub trait RepositoryReader {
    /// Names of the record's children in stored order. A missing record has no children.
    fn child_names(&self, path: &RecordPath) -> RepositoryResult<Vec<String>>;

    /// Names of the record's properties in stored order. A missing record has no properties.
    fn property_names(&self, path: &RecordPath) -> RepositoryResult<Vec<String>>;

    /// Value of a single property, `None` if the record or property does not exist
    fn property(&self, path: &RecordPath, name: &str) -> RepositoryResult<Option<PropertyValue>>;

    /// Resolve a reference to its target record, `None` if it dangles
    fn dereference(&self, reference: &RecordRef) -> RepositoryResult<Option<Record>>;
}
