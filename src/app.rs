//! Command entry point
//!
//! Everything the `acl-overview` binary does after argument parsing and
//! logging setup: applying command-line overrides, loading the snapshot,
//! looking the principal up, building the overview and rendering it.

use crate::config::{AppConfig, OutputFormat, validate_config};
use crate::error::{AppError, ConfigError, Result};
use crate::overview::{OverviewBuilder, PrincipalRef};
use crate::report;
use crate::repository::InMemoryRepository;
use tracing::{error, info};

/// Command-line values that take precedence over the loaded configuration
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub snapshot: Option<String>,
    pub format: Option<String>,
}

/// Apply command-line overrides and re-validate the result
pub fn apply_overrides(config: &mut AppConfig, overrides: Overrides) -> Result<()> {
    if let Some(snapshot) = overrides.snapshot {
        config.repository.snapshot = Some(snapshot);
    }
    if let Some(format) = overrides.format {
        config.report.format =
            OutputFormat::try_parse(&format).ok_or_else(|| ConfigError::Invalid {
                message: format!("unknown output format '{}' (expected table or json)", format),
            })?;
    }
    validate_config(config)?;
    Ok(())
}

/// Produce the rendered overview of `principal`
///
/// Fails when no snapshot is configured, the snapshot cannot be loaded or the
/// principal does not exist. An existing principal without permissions is not
/// an error.
pub fn run(config: &AppConfig, principal: &str) -> Result<String> {
    let snapshot = config
        .repository
        .snapshot
        .as_deref()
        .ok_or_else(|| ConfigError::Missing {
            field: "repository.snapshot".to_string(),
        })?;

    let repository = InMemoryRepository::load(snapshot)
        .inspect_err(|e| error!(error = %e, path = %snapshot, "Failed to load snapshot"))?;

    let principal: PrincipalRef = repository
        .find(&config.layout.principal_workspace, principal)
        .ok_or_else(|| AppError::PrincipalNotFound(principal.to_string()))
        .inspect_err(|e| error!(error = %e, "Unknown principal"))?
        .into();

    let builder = OverviewBuilder::from_config(&repository, config)
        .inspect_err(|e| error!(error = %e, "Invalid report configuration"))?;
    let overview = builder.build(&principal);

    info!(
        principal = %principal.id,
        repositories = overview.len(),
        entries = overview.total_entries(),
        "Overview complete"
    );

    let mut output = report::render(&overview, config.report.format)?;
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}
