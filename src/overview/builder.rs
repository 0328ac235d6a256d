//! Overview assembly
//!
//! Resolves a principal's roles, extracts each role's entries and groups them
//! by repository. Building never fails: any read failure only makes the
//! overview smaller.

use crate::config::{AppConfig, LayoutConfig};
use crate::error::ConfigError;
use crate::overview::extractor::AclExtractor;
use crate::overview::filter::RepositoryFilter;
use crate::overview::resolver::RoleResolver;
use crate::overview::types::{Overview, PrincipalRef};
use crate::repository::RepositoryReader;
use tracing::{debug, trace};

/// Builds permission overviews against a repository reader
pub struct OverviewBuilder<'a, R: ?Sized> {
    resolver: RoleResolver<'a, R>,
    extractor: AclExtractor<'a, R>,
    filter: RepositoryFilter,
}

impl<'a, R: RepositoryReader + ?Sized> OverviewBuilder<'a, R> {
    /// Create a builder with the given layout and no filtering
    pub fn new(reader: &'a R, layout: &'a LayoutConfig) -> Self {
        Self {
            resolver: RoleResolver::new(reader, layout),
            extractor: AclExtractor::new(reader, layout),
            filter: RepositoryFilter::allow_all(),
        }
    }

    /// Create a builder from application configuration
    pub fn from_config(reader: &'a R, config: &'a AppConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(reader, &config.layout)
            .with_deduplication(config.resolver.deduplicate_roles)
            .with_filter(RepositoryFilter::from_config(&config.report)?))
    }

    pub fn with_deduplication(mut self, deduplicate: bool) -> Self {
        self.resolver = self.resolver.with_deduplication(deduplicate);
        self
    }

    pub fn with_filter(mut self, filter: RepositoryFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Collect the principal's ACL entries grouped by repository
    pub fn build(&self, principal: &PrincipalRef) -> Overview {
        let roles = self.resolver.resolve(principal);

        let overview: Overview = roles
            .iter()
            .flat_map(|role| self.extractor.extract(role))
            .filter(|entry| {
                if self.filter.is_empty() {
                    return true;
                }
                let admitted = self.filter.admits(&entry.repository);
                if !admitted {
                    trace!(repository = %entry.repository, "Repository filtered out");
                }
                admitted
            })
            .collect();

        debug!(
            principal = %principal.id,
            roles = roles.len(),
            repositories = overview.len(),
            entries = overview.total_entries(),
            "Built overview"
        );
        overview
    }
}
