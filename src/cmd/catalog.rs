use crate::cli::{PackageCommand, VersionCommand};
use crate::cmd::emit;
use crate::error::{LedgerResultExt, Result};
use std::io::Write;
use wheelhouse_ledger::Repository;

pub(super) async fn package(repo: &Repository, command: PackageCommand, out: &mut impl Write) -> Result<()> {
    match command {
        PackageCommand::Add { package, skip } => {
            let added = repo.add_package(&package, skip.as_deref()).await.or_ledger()?;
            match added {
                true => emit(out, format_args!("added {package}")),
                false => emit(out, format_args!("{package} already known")),
            }
        },
        PackageCommand::Skip { package, reason } => {
            repo.set_package_skip(&package, &reason).await.or_ledger()
        },
    }
}

pub(super) async fn version(repo: &Repository, command: VersionCommand, out: &mut impl Write) -> Result<()> {
    match command {
        VersionCommand::Add { package, version, released, skip } => {
            let added = repo
                .add_version(&package, &version, released, skip.as_deref())
                .await
                .or_ledger()?;
            match added {
                true => emit(out, format_args!("added {package} {version}")),
                false => emit(out, format_args!("{package} {version} already known")),
            }
        },
        VersionCommand::Skip { package, version, reason } => {
            repo.set_version_skip(&package, &version, &reason).await.or_ledger()
        },
        VersionCommand::Forget { package, version } => {
            let deleted = repo.delete_build_history(&package, &version).await.or_ledger()?;
            emit(out, format_args!("forgot {deleted} build(s) of {package} {version}"))
        },
    }
}
