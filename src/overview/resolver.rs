//! Role resolution
//!
//! Collects the roles a principal holds directly and the roles it inherits
//! through its groups (one level deep). Every read is isolated: an unreadable
//! collection counts as empty, and a dangling or unreadable reference is
//! skipped without affecting its siblings.

use crate::config::LayoutConfig;
use crate::overview::types::{Group, PrincipalRef, Role};
use crate::repository::{Record, RecordPath, RecordRef, RepositoryReader};
use std::collections::HashSet;
use tracing::{debug, trace, warn};

/// Resolves a principal's effective roles
pub struct RoleResolver<'a, R: ?Sized> {
    reader: &'a R,
    layout: &'a LayoutConfig,
    deduplicate: bool,
}

impl<'a, R: RepositoryReader + ?Sized> RoleResolver<'a, R> {
    pub fn new(reader: &'a R, layout: &'a LayoutConfig) -> Self {
        Self {
            reader,
            layout,
            deduplicate: false,
        }
    }

    /// Drop repeated occurrences of a role, keeping the first
    pub fn with_deduplication(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    /// Direct roles followed by group-mediated roles, in encounter order
    pub fn resolve(&self, principal: &PrincipalRef) -> Vec<Role> {
        let mut roles = self.roles_of(&principal.path);
        let direct = roles.len();

        for group in self.groups_of(&principal.path) {
            trace!(group = %group.name, "Resolving group roles");
            roles.extend(self.roles_of(&group.record.path));
        }

        debug!(
            principal = %principal.id,
            direct,
            inherited = roles.len() - direct,
            "Resolved roles"
        );

        if self.deduplicate {
            let mut seen = HashSet::new();
            roles.retain(|role| seen.insert(role.id.clone()));
        }
        roles
    }

    /// Roles referenced from a principal or group record
    pub fn roles_of(&self, owner: &RecordPath) -> Vec<Role> {
        self.resolve_collection(
            owner,
            &self.layout.roles_collection,
            &self.layout.role_workspace,
        )
        .into_iter()
        .map(Role::from)
        .collect()
    }

    /// Groups referenced from a principal record
    pub fn groups_of(&self, owner: &RecordPath) -> Vec<Group> {
        self.resolve_collection(
            owner,
            &self.layout.groups_collection,
            &self.layout.group_workspace,
        )
        .into_iter()
        .map(Group::from)
        .collect()
    }

    /// Dereference every reference in `owner/collection`, skipping failures
    fn resolve_collection(&self, owner: &RecordPath, collection: &str, workspace: &str) -> Vec<Record> {
        self.read_references(&owner.child(collection), workspace)
            .iter()
            .filter_map(|reference| match self.reader.dereference(reference) {
                Ok(Some(record)) => Some(record),
                Ok(None) => {
                    debug!(reference = %reference, "Dangling reference, skipping");
                    None
                }
                Err(e) => {
                    warn!(reference = %reference, error = %e, "Cannot read referenced record, skipping");
                    None
                }
            })
            .collect()
    }

    fn read_references(&self, collection: &RecordPath, workspace: &str) -> Vec<RecordRef> {
        let names = match self.reader.property_names(collection) {
            Ok(names) => names,
            Err(e) => {
                warn!(collection = %collection, error = %e, "Cannot read references, treating as empty");
                return Vec::new();
            }
        };

        names
            .iter()
            .filter_map(|name| match self.reader.property(collection, name) {
                Ok(Some(value)) => {
                    let id = value.to_string();
                    (!id.trim().is_empty()).then(|| RecordRef::new(workspace, id.trim()))
                }
                Ok(None) => None,
                Err(e) => {
                    warn!(collection = %collection, property = %name, error = %e, "Cannot read reference, skipping");
                    None
                }
            })
            .collect()
    }
}
