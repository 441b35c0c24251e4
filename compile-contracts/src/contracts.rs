//! Discovery of the solidity sources of a repository

use crate::{
    error::{CompileError, Result},
    filter::{FileFilter, IgnoreRules, DEFAULT_IGNORE_RULES},
    utils,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::{btree_map::Entry, BTreeMap},
    fmt,
    path::{Path, PathBuf},
};
use walkdir::{DirEntry, WalkDir};

/// A solidity source file found during discovery
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContractFile {
    /// Name of the file without the `.sol` extension
    pub filename: String,
    /// Absolute path to the source file
    pub path: PathBuf,
    /// Directory containing the file, relative to the scanned root, `.` for the root itself
    pub relative_path: PathBuf,
    /// Previously compiled artifact of this source, either `<filename>.json` or `abi.json` next
    /// to the source
    pub compiled_json_path: Option<PathBuf>,
}

impl ContractFile {
    /// Name of the source file, `<filename>.sol`
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.filename, utils::SOLIDITY_EXTENSION)
    }

    /// The directory containing the source
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Where the compiled artifact of this source belongs, the existing artifact if there is one,
    /// `<filename>.json` next to the source otherwise
    pub fn artifact_target(&self) -> PathBuf {
        self.compiled_json_path
            .clone()
            .unwrap_or_else(|| self.dir().join(format!("{}.json", self.filename)))
    }

    /// Returns the contracts keyed by their `filename`.
    ///
    /// Fails with [`CompileError::DuplicateContract`] if two contracts share the same name.
    pub fn by_name(contracts: &[ContractFile]) -> Result<BTreeMap<&str, &ContractFile>> {
        let mut map = BTreeMap::new();
        for contract in contracts {
            match map.entry(contract.filename.as_str()) {
                Entry::Vacant(entry) => {
                    entry.insert(contract);
                }
                Entry::Occupied(entry) => {
                    return Err(CompileError::DuplicateContract {
                        name: contract.filename.clone(),
                        first: entry.get().path.clone(),
                        second: contract.path.clone(),
                    })
                }
            }
        }
        Ok(map)
    }
}

impl fmt::Display for ContractFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.relative_path == Path::new(".") {
            return write!(f, "{}", self.file_name())
        }
        write!(f, "{}", utils::to_slash(&self.relative_path.join(self.file_name())))
    }
}

/// Returns all solidity contracts under the `root` that are not inside one of the
/// [`DEFAULT_IGNORE_RULES`]
///
/// # Example
///
/// ```no_run
/// use compile_contracts::find_solidity_contracts;
/// let contracts = find_solidity_contracts(".").unwrap();
/// ```
pub fn find_solidity_contracts(root: impl AsRef<Path>) -> Result<Vec<ContractFile>> {
    find_solidity_contracts_with(root, &DEFAULT_IGNORE_RULES)
}

/// Same as [`find_solidity_contracts`] but with custom [`IgnoreRules`]
///
/// Ignored folders are not descended into. The rules are applied to paths relative to `root`.
/// Contracts are returned in the order of a walk sorted by file name.
pub fn find_solidity_contracts_with(
    root: impl AsRef<Path>,
    rules: &IgnoreRules,
) -> Result<Vec<ContractFile>> {
    let root = utils::canonicalize(root)?;
    tracing::trace!("searching for solidity contracts in \"{}\"", root.display());

    let is_ignored = |entry: &DirEntry| {
        entry.file_type().is_dir() &&
            entry.path().strip_prefix(&root).map(|rel| rules.is_ignored(rel)).unwrap_or_default()
    };

    let walker =
        WalkDir::new(&root).sort_by_file_name().into_iter().filter_entry(|e| !is_ignored(e));
    let mut contracts = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !is_source_file(&entry) {
            continue
        }
        contracts.push(contract_file(&root, entry.path())?);
    }

    tracing::debug!("found {} solidity contracts in \"{}\"", contracts.len(), root.display());
    Ok(contracts)
}

/// Regular `.sol` files and symlinks to them, links to directories are never followed
fn is_source_file(entry: &DirEntry) -> bool {
    if !utils::is_solidity_file(entry.path()) {
        return false
    }
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

/// Narrows the contracts down to those matched by the filter
pub fn select_contracts(
    contracts: Vec<ContractFile>,
    filter: &dyn FileFilter,
) -> Vec<ContractFile> {
    contracts.into_iter().filter(|c| filter.is_match(&c.path)).collect()
}

fn contract_file(root: &Path, path: &Path) -> Result<ContractFile> {
    let filename = utils::file_stem(path)
        .ok_or_else(|| CompileError::msg(format!("Invalid file name \"{}\"", path.display())))?;
    let dir = path
        .parent()
        .ok_or_else(|| CompileError::msg(format!("No parent dir for \"{}\"", path.display())))?;
    let relative_path = match dir.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
        Ok(rel) => rel.to_path_buf(),
        Err(_) => {
            return Err(CompileError::msg(format!(
                "\"{}\" is not inside \"{}\"",
                path.display(),
                root.display()
            )))
        }
    };

    Ok(ContractFile {
        compiled_json_path: find_compiled_json(dir, &filename),
        filename,
        path: path.to_path_buf(),
        relative_path,
    })
}

/// Looks up the artifact of `filename` in `dir`, `<filename>.json` takes precedence over
/// `abi.json`
fn find_compiled_json(dir: &Path, filename: &str) -> Option<PathBuf> {
    [format!("{filename}.json"), utils::ABI_JSON.to_string()]
        .into_iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
