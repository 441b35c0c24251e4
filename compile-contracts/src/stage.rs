//! Copying discovered sources into the hardhat project

use crate::{
    contracts::ContractFile,
    error::{CompileError, Result},
    utils,
};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Where `contract` ends up when staged into `target`, `<target>/<relative_path>/<filename>.sol`
pub fn staged_path(target: impl AsRef<Path>, contract: &ContractFile) -> PathBuf {
    utils::join_relative(target, &contract.relative_path).join(contract.file_name())
}

/// Copies every contract into `target`, re-creating its relative directory.
///
/// Contracts directly at the scanned root (`relative_path == "."`) land in `target` itself.
/// Existing content of `target` is never overwritten: a contract whose staged path already exists
/// is not copied, including the case where the contract already lives in `target`.
///
/// # Example
///
/// ```no_run
/// use compile_contracts::{copy_to_contracts_directory, find_solidity_contracts};
/// let contracts = find_solidity_contracts(".").unwrap();
/// assert!(copy_to_contracts_directory("contracts/solidity", &contracts).unwrap());
/// ```
pub fn copy_to_contracts_directory(
    target: impl AsRef<Path>,
    contracts: &[ContractFile],
) -> Result<bool> {
    stage_contracts(target, contracts)?;
    Ok(true)
}

/// Same as [`copy_to_contracts_directory`] but returns the paths of the files that were created.
///
/// Files that already existed in `target` are not part of the result.
pub fn stage_contracts(
    target: impl AsRef<Path>,
    contracts: &[ContractFile],
) -> Result<Vec<PathBuf>> {
    let target = target.as_ref();
    fs::create_dir_all(target).map_err(|err| CompileError::io(err, target))?;

    let mut staged = Vec::with_capacity(contracts.len());
    for contract in contracts {
        let dest = staged_path(target, contract);
        if dest.exists() {
            keep_existing(contract, &dest)?;
            continue
        }
        utils::create_parent_dir_all(&dest)?;
        tracing::trace!("staging \"{}\" at \"{}\"", contract.path.display(), dest.display());
        utils::copy_file(&contract.path, &dest, false)?;
        staged.push(dest);
    }
    tracing::debug!("staged {} contracts in \"{}\"", staged.len(), target.display());
    Ok(staged)
}

fn keep_existing(contract: &ContractFile, dest: &Path) -> Result<()> {
    if utils::is_same_file(&contract.path, dest)? {
        tracing::trace!("\"{}\" is already in place", dest.display());
        return Ok(())
    }
    let source = fs::read(&contract.path).map_err(|err| CompileError::io(err, &contract.path))?;
    let existing = fs::read(dest).map_err(|err| CompileError::io(err, dest))?;
    if source == existing {
        tracing::trace!("\"{}\" is already staged", dest.display());
    } else {
        tracing::warn!(
            "not staging \"{}\", \"{}\" already exists with different content",
            contract.path.display(),
            dest.display()
        );
    }
    Ok(())
}
