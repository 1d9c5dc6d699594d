use crate::cli::{AbiCommand, SerialCommand};
use crate::cmd::emit;
use crate::error::{ErrorKind, LedgerResultExt, Result};
use exn::ResultExt;
use std::io::{Read, Write};
use std::path::Path;
use wheelhouse_config::Config;
use wheelhouse_ledger::{BuildReport, Repository};

/// Register every configured ABI that isn't registered yet.
pub(super) async fn init(repo: &Repository, config: &Config, out: &mut impl Write) -> Result<()> {
    for abi in &config.build.abis {
        if repo.add_build_abi(abi).await.or_ledger()? {
            emit(out, format_args!("registered {abi}"))?;
        }
    }
    Ok(())
}

pub(super) async fn abi(repo: &Repository, command: AbiCommand, out: &mut impl Write) -> Result<()> {
    match command {
        AbiCommand::Add { abi_tag } => {
            if !repo.add_build_abi(&abi_tag).await.or_ledger()? {
                tracing::warn!(abi_tag = %abi_tag, "ABI already registered");
            }
            Ok(())
        },
        AbiCommand::Remove { abi_tag } => {
            if !repo.remove_build_abi(&abi_tag).await.or_ledger()? {
                tracing::warn!(abi_tag = %abi_tag, "ABI was not registered");
            }
            Ok(())
        },
        AbiCommand::List => {
            for abi in repo.build_abis().await.or_ledger()? {
                emit(out, abi)?;
            }
            Ok(())
        },
    }
}

pub(super) async fn serial(repo: &Repository, command: SerialCommand, out: &mut impl Write) -> Result<()> {
    match command {
        SerialCommand::Get => emit(out, repo.serial().await.or_ledger()?),
        SerialCommand::Set { serial } => repo.set_serial(serial).await.or_ledger(),
    }
}

/// Print the work set as tab-separated `package version abi` lines.
pub(super) async fn targets(repo: &Repository, out: &mut impl Write) -> Result<()> {
    for target in repo.next_build_targets().await.or_ledger()? {
        emit(out, format_args!("{}\t{}\t{}", target.package, target.version, target.abi_tag))?;
    }
    Ok(())
}

pub(super) async fn commit(repo: &Repository, path: &Path, out: &mut impl Write) -> Result<()> {
    let report = read_report(path)?;
    let build_id = repo.commit_build_result(&report).await.or_ledger()?;
    emit(out, build_id)
}

fn read_report(path: &Path) -> Result<BuildReport> {
    let name = path.display().to_string();
    let contents = match path == Path::new("-") {
        true => {
            let mut contents = String::new();
            std::io::stdin().read_to_string(&mut contents).or_raise(|| ErrorKind::Report(name.clone()))?;
            contents
        },
        false => std::fs::read_to_string(path).or_raise(|| ErrorKind::Report(name.clone()))?,
    };
    serde_json::from_str(&contents).or_raise(|| ErrorKind::Report(name))
}

pub(super) async fn stats(repo: &Repository, out: &mut impl Write) -> Result<()> {
    let stats = repo.statistics().await.or_ledger()?;
    emit(out, format_args!("packages_count: {}", stats.packages_count))?;
    emit(out, format_args!("packages_built: {}", stats.packages_built))?;
    emit(out, format_args!("versions_count: {}", stats.versions_count))?;
    emit(out, format_args!("versions_built: {}", stats.versions_built))?;
    emit(out, format_args!("builds_count: {}", stats.builds_count))?;
    emit(out, format_args!("builds_last_hour: {}", stats.builds_last_hour))?;
    emit(out, format_args!("builds_success: {}", stats.builds_success))?;
    emit(out, format_args!("builds_time: {}s", stats.builds_time.as_secs()))?;
    emit(out, format_args!("files_count: {}", stats.files_count))?;
    emit(out, format_args!("files_size: {}", stats.files_size))
}
