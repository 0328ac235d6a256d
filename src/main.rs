//! ACL Overview CLI
//!
//! Prints the effective access-control entries of a principal.

use acl_overview::{
    app::{self, Overrides},
    config::{LogFormat, load_config},
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// ACL Overview - effective permissions of a principal
#[derive(Parser, Debug)]
#[command(name = "acl-overview")]
#[command(version, about, long_about = None)]
struct Args {
    /// Principal name or identifier
    principal: String,

    /// Path to configuration file
    #[arg(short, long, env = "ACL_OVERVIEW_CONFIG")]
    config: Option<String>,

    /// Repository snapshot file (.json or .toml)
    #[arg(short, long, env = "ACL_OVERVIEW_SNAPSHOT")]
    snapshot: Option<String>,

    /// Output format (table, json)
    #[arg(short, long)]
    format: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ACL_OVERVIEW_LOG_LEVEL")]
    log_level: Option<String>,
}

fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration before logging so the configured level applies
    let mut config = load_config(args.config.as_deref())?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_logging(&level, config.logging.format);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting acl-overview");

    app::apply_overrides(
        &mut config,
        Overrides {
            snapshot: args.snapshot,
            format: args.format,
        },
    )?;

    print!("{}", app::run(&config, &args.principal)?);

    Ok(())
}
