//! Command-line definitions.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::path::PathBuf;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcDateTime};

/// Build-target resolution and result ledger for a wheel build farm
#[derive(Debug, Parser)]
#[command(name = "wheelhouse")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true, env = "WHEELHOUSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the ledger if needed and register the configured ABIs
    Init,
    /// Manage the ABIs every version is built for
    #[command(subcommand)]
    Abi(AbiCommand),
    /// Manage packages in the catalog
    #[command(subcommand)]
    Package(PackageCommand),
    /// Manage package versions in the catalog
    #[command(subcommand)]
    Version(VersionCommand),
    /// Read or advance the upstream index serial
    #[command(subcommand)]
    Serial(SerialCommand),
    /// Print the outstanding build targets, one per line
    Targets,
    /// Record a worker's build report
    Commit {
        /// JSON build report, or `-` for standard input
        report: PathBuf,
    },
    /// Print catalog and ledger statistics
    Stats,
}

#[derive(Debug, Subcommand)]
pub enum AbiCommand {
    /// Start building for an ABI
    Add { abi_tag: String },
    /// Stop building for an ABI
    Remove { abi_tag: String },
    /// List registered ABIs
    List,
}

#[derive(Debug, Subcommand)]
pub enum PackageCommand {
    /// Add a package (names are canonicalized)
    Add {
        #[arg(value_parser = package_name)]
        package: String,
        /// Never build this package
        #[arg(long)]
        skip: Option<String>,
    },
    /// Stop building a package
    Skip {
        #[arg(value_parser = package_name)]
        package: String,
        reason: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum VersionCommand {
    /// Add a version of a known package
    Add {
        #[arg(value_parser = package_name)]
        package: String,
        version: String,
        /// Release date as RFC 3339 (default: now)
        #[arg(long, value_parser = timestamp)]
        released: Option<UtcDateTime>,
        /// Never build this version
        #[arg(long)]
        skip: Option<String>,
    },
    /// Stop building a version
    Skip {
        #[arg(value_parser = package_name)]
        package: String,
        version: String,
        reason: String,
    },
    /// Forget every build of a version so it gets built again
    Forget {
        #[arg(value_parser = package_name)]
        package: String,
        version: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum SerialCommand {
    /// Print the last ingested serial
    Get,
    /// Record the serial ingested up to (it may not go backwards)
    Set { serial: u64 },
}

fn package_name(name: &str) -> Result<String, Infallible> {
    Ok(wheelhouse_build::canonicalize_name(name))
}

fn timestamp(value: &str) -> Result<UtcDateTime, time::error::Parse> {
    Ok(OffsetDateTime::parse(value, &Rfc3339)?.to_utc())
}
