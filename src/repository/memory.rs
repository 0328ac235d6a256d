//! In-memory record store
//!
//! Backs the CLI and the test suites. The store is populated from a
//! [`Snapshot`], either built in code or loaded from a JSON/TOML file, and
//! keeps children and properties in document order. Records and individual
//! properties can be flagged unreadable to simulate storage failures.

use crate::error::{RepositoryError, RepositoryResult};
use crate::repository::{PropertyValue, Record, RecordPath, RecordRef, RepositoryReader};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, trace};

/// Serialized form of a whole store
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub workspaces: IndexMap<String, WorkspaceSnapshot>,
}

/// Top-level records of one workspace
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkspaceSnapshot {
    pub records: Vec<SnapshotRecord>,
}

/// A record with its properties and children
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotRecord {
    pub name: String,

    /// Identifier used by references; defaults to the record path
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub properties: IndexMap<String, PropertyValue>,

    #[serde(default)]
    pub children: Vec<SnapshotRecord>,

    /// Every read of this record fails
    #[serde(default)]
    pub unreadable: bool,

    /// Reads of these properties fail
    #[serde(default)]
    pub unreadable_properties: Vec<String>,
}

impl SnapshotRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: SnapshotRecord) -> Self {
        self.children.push(child);
        self
    }

    pub fn mark_unreadable(mut self) -> Self {
        self.unreadable = true;
        self
    }

    pub fn with_unreadable_property(mut self, name: impl Into<String>) -> Self {
        self.unreadable_properties.push(name.into());
        self
    }
}

#[derive(Debug)]
struct Node {
    id: String,
    /// Whether the id came from the snapshot rather than the path
    identified: bool,
    properties: IndexMap<String, PropertyValue>,
    children: Vec<String>,
    unreadable: bool,
    unreadable_properties: HashSet<String>,
}

impl Node {
    fn root() -> Self {
        Self {
            id: String::new(),
            identified: false,
            properties: IndexMap::new(),
            children: Vec::new(),
            unreadable: false,
            unreadable_properties: HashSet::new(),
        }
    }
}

#[derive(Debug)]
struct Workspace {
    /// Nodes keyed by path, in insertion order
    nodes: IndexMap<String, Node>,
    /// Identifier to path
    ids: HashMap<String, String>,
}

impl Workspace {
    fn new() -> Self {
        let mut nodes = IndexMap::new();
        nodes.insert("/".to_string(), Node::root());
        Self {
            nodes,
            ids: HashMap::new(),
        }
    }
}

/// Paths and ids claimed by a batch that has not been inserted yet
#[derive(Default)]
struct Pending {
    paths: HashSet<String>,
    ids: HashSet<String>,
}

impl Pending {
    fn check(
        &mut self,
        existing: Option<&Workspace>,
        parent: &RecordPath,
        record: &SnapshotRecord,
    ) -> RepositoryResult<()> {
        if record.name.is_empty() || record.name.contains('/') {
            return Err(RepositoryError::Snapshot(format!(
                "invalid record name '{}' under {}",
                record.name, parent
            )));
        }

        let path = parent.child(&record.name);
        let taken = existing.is_some_and(|ws| ws.nodes.contains_key(path.path()));
        if taken || !self.paths.insert(path.path().to_string()) {
            return Err(RepositoryError::Snapshot(format!(
                "duplicate record {}",
                path
            )));
        }

        let id = record
            .id
            .clone()
            .unwrap_or_else(|| path.path().to_string());
        let taken = existing.is_some_and(|ws| ws.ids.contains_key(&id));
        if taken || !self.ids.insert(id.clone()) {
            return Err(RepositoryError::Snapshot(format!(
                "duplicate record id '{}' at {}",
                id, path
            )));
        }

        for child in &record.children {
            self.check(existing, &path, child)?;
        }
        Ok(())
    }
}

/// Tree-structured record store held in memory
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    workspaces: HashMap<String, Workspace>,
}

impl InMemoryRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot
    pub fn from_snapshot(snapshot: Snapshot) -> RepositoryResult<Self> {
        let mut repository = Self::new();
        for (workspace, content) in snapshot.workspaces {
            repository.insert_records(&workspace, content.records)?;
        }
        Ok(repository)
    }

    /// Load a snapshot file, choosing the format from its extension (`.json` or `.toml`)
    pub fn load(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let snapshot: Snapshot = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| RepositoryError::Snapshot(format!("{}: {}", path.display(), e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| RepositoryError::Snapshot(format!("{}: {}", path.display(), e)))?,
            _ => {
                return Err(RepositoryError::Snapshot(format!(
                    "unsupported snapshot format: {} (expected .json or .toml)",
                    path.display()
                )));
            }
        };

        let repository = Self::from_snapshot(snapshot)?;
        debug!(
            path = %path.display(),
            workspaces = repository.workspaces.len(),
            "Loaded repository snapshot"
        );
        Ok(repository)
    }

    /// Add top-level records to a workspace, creating it if needed
    ///
    /// The whole batch is checked first; on error the store is left unchanged.
    pub fn insert_records(
        &mut self,
        workspace: &str,
        records: Vec<SnapshotRecord>,
    ) -> RepositoryResult<()> {
        let root = RecordPath::root(workspace);

        let mut pending = Pending::default();
        let existing = self.workspaces.get(workspace);
        for record in &records {
            pending.check(existing, &root, record)?;
        }

        let ws = self
            .workspaces
            .entry(workspace.to_string())
            .or_insert_with(Workspace::new);
        for record in records {
            Self::insert_record(ws, &root, record);
        }
        Ok(())
    }

    fn insert_record(ws: &mut Workspace, parent: &RecordPath, record: SnapshotRecord) {
        let path = parent.child(&record.name);
        let identified = record.id.is_some();
        let id = record.id.unwrap_or_else(|| path.path().to_string());

        trace!(path = %path, id = %id, "Inserting record");
        ws.ids.insert(id.clone(), path.path().to_string());
        if let Some(parent_node) = ws.nodes.get_mut(parent.path()) {
            parent_node.children.push(record.name.clone());
        }
        ws.nodes.insert(
            path.path().to_string(),
            Node {
                id,
                identified,
                properties: record.properties,
                children: Vec::new(),
                unreadable: record.unreadable,
                unreadable_properties: record.unreadable_properties.into_iter().collect(),
            },
        );

        for child in record.children {
            Self::insert_record(ws, &path, child);
        }
    }

    /// Find a record by identifier, falling back to its name
    ///
    /// The name fallback only considers records outside the subtree of an
    /// identified record, so reference collections and ACL blocks stored under
    /// a principal or role are never returned.
    pub fn find(&self, workspace: &str, key: &str) -> Option<Record> {
        let ws = self.workspaces.get(workspace)?;

        let path = ws.ids.get(key).cloned().or_else(|| {
            ws.nodes
                .keys()
                .map(|p| RecordPath::new(workspace, p))
                .find(|p| !p.is_root() && p.name() == key && !Self::inside_identified(ws, p))
                .map(|p| p.path().to_string())
        })?;

        let node = ws.nodes.get(&path)?;
        let path = RecordPath::new(workspace, path);
        Some(Record {
            id: node.id.clone(),
            name: path.name().to_string(),
            path,
        })
    }

    /// Whether any ancestor of `path` carries an explicit identifier
    fn inside_identified(ws: &Workspace, path: &RecordPath) -> bool {
        let segments: Vec<&str> = path.path().split('/').filter(|s| !s.is_empty()).collect();
        (1..segments.len()).any(|depth| {
            let ancestor = format!("/{}", segments[..depth].join("/"));
            ws.nodes.get(&ancestor).is_some_and(|node| node.identified)
        })
    }

    /// Number of records across all workspaces (workspace roots excluded)
    pub fn len(&self) -> usize {
        self.workspaces.values().map(|ws| ws.nodes.len() - 1).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Readable node at a path; `Ok(None)` if it does not exist
    fn node(&self, path: &RecordPath) -> RepositoryResult<Option<&Node>> {
        let Some(node) = self
            .workspaces
            .get(path.workspace())
            .and_then(|ws| ws.nodes.get(path.path()))
        else {
            return Ok(None);
        };

        if node.unreadable {
            return Err(RepositoryError::unreadable(
                path.to_string(),
                "record is not readable",
            ));
        }
        Ok(Some(node))
    }
}

impl RepositoryReader for InMemoryRepository {
    fn child_names(&self, path: &RecordPath) -> RepositoryResult<Vec<String>> {
        Ok(self
            .node(path)?
            .map(|node| node.children.clone())
            .unwrap_or_default())
    }

    fn property_names(&self, path: &RecordPath) -> RepositoryResult<Vec<String>> {
        Ok(self
            .node(path)?
            .map(|node| node.properties.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn property(&self, path: &RecordPath, name: &str) -> RepositoryResult<Option<PropertyValue>> {
        let Some(node) = self.node(path)? else {
            return Ok(None);
        };

        if node.unreadable_properties.contains(name) {
            return Err(RepositoryError::property_unreadable(path.to_string(), name));
        }
        Ok(node.properties.get(name).cloned())
    }

    fn dereference(&self, reference: &RecordRef) -> RepositoryResult<Option<Record>> {
        let Some(path) = self
            .workspaces
            .get(&reference.workspace)
            .and_then(|ws| ws.ids.get(&reference.id))
        else {
            return Ok(None);
        };

        let path = RecordPath::new(reference.workspace.clone(), path);
        let Some(node) = self.node(&path)? else {
            return Ok(None);
        };

        Ok(Some(Record {
            id: node.id.clone(),
            name: path.name().to_string(),
            path,
        }))
    }
}
