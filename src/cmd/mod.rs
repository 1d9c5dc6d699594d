//! Command implementations.
//!
//! Every command writes its result to the given writer so it can be piped
//! into scripts; logs go to standard error.

mod catalog;
mod ledger;

use crate::cli::{Cli, Command};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::Write;
use wheelhouse_config::Config;
use wheelhouse_ledger::{Database, Repository};

/// Load the configuration, open the ledger and run the requested command.
pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let db = open(&config).await?;
    let repo = Repository::from(&db);
    let result = execute(&repo, &config, cli.command, &mut std::io::stdout()).await;
    db.close().await;
    result
}

async fn open(config: &Config) -> Result<Database> {
    let path = config.database.location().or_raise(|| ErrorKind::Config)?;
    let location = path.display().to_string();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).or_raise(|| ErrorKind::Open(location.clone()))?;
    }
    Database::connect(&path, config.database.max_connections)
        .await
        .or_raise(|| ErrorKind::Open(location))
}

async fn execute(repo: &Repository, config: &Config, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Init => ledger::init(repo, config, out).await,
        Command::Abi(command) => ledger::abi(repo, command, out).await,
        Command::Package(command) => catalog::package(repo, command, out).await,
        Command::Version(command) => catalog::version(repo, command, out).await,
        Command::Serial(command) => ledger::serial(repo, command, out).await,
        Command::Targets => ledger::targets(repo, out).await,
        Command::Commit { report } => ledger::commit(repo, &report, out).await,
        Command::Stats => ledger::stats(repo, out).await,
    }
}

/// Write one line of command output.
fn emit(out: &mut impl Write, line: impl std::fmt::Display) -> Result<()> {
    writeln!(out, "{line}").or_raise(|| ErrorKind::Output)
}
