//! Rules that decide which folders and files take part in the discovery

use crate::{
    config::{HARDHAT_PROJECT_DIR, SOLIDITY_SOURCE},
    error::Result,
    utils,
};
use once_cell::sync::Lazy;
use regex::RegexSet;
use std::{
    collections::BTreeSet,
    fmt,
    fmt::Formatter,
    path::{Path, PathBuf},
};

/// Folders that are skipped by default, each entry is matched as a sequence of whole path
/// segments anywhere inside the path.
pub const IGNORED_FOLDERS: &[&str] = &["node_modules", "tests/solidity", "nix_tests"];

/// The default [`IgnoreRules`]
pub static DEFAULT_IGNORE_RULES: Lazy<IgnoreRules> =
    Lazy::new(|| IgnoreRules::builder().build().unwrap());

/// A predicate property that determines whether a file satisfies a certain condition
pub trait FileFilter {
    /// The predicate function that should return if the given `file` should be included.
    fn is_match(&self, file: &Path) -> bool;
}

impl<F> FileFilter for F
where
    F: Fn(&Path) -> bool,
{
    fn is_match(&self, file: &Path) -> bool {
        (self)(file)
    }
}

/// Matches `path` as whole segments anywhere in a `/` separated path
fn segment_pattern(path: &str) -> String {
    let segments = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("/");
    format!("(^|/){segments}(/|$)")
}

/// Set of patterns describing folders whose entire subtree is excluded from the discovery.
///
/// A path is ignored as soon as one of its ancestors is, so `abc/node_modules/precompiles` is
/// ignored just like `abc/node_modules`.
#[derive(Clone)]
pub struct IgnoreRules {
    patterns: Vec<String>,
    set: RegexSet,
}

impl IgnoreRules {
    pub fn builder() -> IgnoreRulesBuilder {
        IgnoreRulesBuilder::default()
    }

    /// Creates a set that ignores nothing
    pub fn none() -> Self {
        Self { patterns: Vec::new(), set: RegexSet::empty() }
    }

    /// Returns `true` if the path, or one of its ancestors, is an ignored folder
    ///
    /// # Example
    ///
    /// ```
    /// use compile_contracts::filter::DEFAULT_IGNORE_RULES;
    /// assert!(DEFAULT_IGNORE_RULES.is_ignored("abc/contracts/solidity/precompiles"));
    /// assert!(!DEFAULT_IGNORE_RULES.is_ignored("abc/contracts/solidity"));
    /// ```
    pub fn is_ignored(&self, path: impl AsRef<Path>) -> bool {
        let path = utils::to_slash(path.as_ref());
        self.set.is_match(&path)
    }

    /// The regular expressions this set consists of
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        DEFAULT_IGNORE_RULES.clone()
    }
}

impl fmt::Debug for IgnoreRules {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnoreRules").field("patterns", &self.patterns).finish()
    }
}

/// Returns `true` if the path is ignored by the [`DEFAULT_IGNORE_RULES`]
pub fn is_ignored_folder(path: impl AsRef<Path>) -> bool {
    DEFAULT_IGNORE_RULES.is_ignored(path)
}

#[derive(Debug, Clone)]
pub struct IgnoreRulesBuilder {
    defaults: bool,
    folders: Vec<String>,
    patterns: Vec<String>,
}

impl IgnoreRulesBuilder {
    /// Don't include the default ignored folders
    #[must_use]
    pub fn no_defaults(mut self) -> Self {
        self.defaults = false;
        self
    }

    /// Ignores every folder with this (`/` separated) name
    #[must_use]
    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.folders.push(folder.into());
        self
    }

    /// Ignores every path matching the regular expression, the expression is matched against the
    /// `/` separated form of the path
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    pub fn build(self) -> Result<IgnoreRules> {
        let Self { defaults, folders, patterns: custom } = self;
        let mut patterns = Vec::new();
        if defaults {
            // nested precompiles and numbered examples inside the staging project
            patterns.push(format!(
                r"(^|/){}/{}/(precompiles|\d+_\w+)(/|$)",
                regex::escape(HARDHAT_PROJECT_DIR),
                regex::escape(SOLIDITY_SOURCE)
            ));
            patterns.extend(IGNORED_FOLDERS.iter().copied().map(segment_pattern));
        }
        patterns.extend(folders.iter().map(|folder| segment_pattern(folder)));
        patterns.extend(custom);

        let set = RegexSet::new(&patterns)?;
        Ok(IgnoreRules { patterns, set })
    }
}

impl Default for IgnoreRulesBuilder {
    fn default() -> Self {
        Self { defaults: true, folders: Vec::new(), patterns: Vec::new() }
    }
}

/// A [FileFilter] that matches contracts by name, `Staking` or `Staking.sol`, or by the trailing
/// components of their path, `precompiles/staking/StakingI.sol`
#[derive(Debug, Clone, Default)]
pub struct ContractNameFilter {
    names: BTreeSet<String>,
    paths: Vec<PathBuf>,
}

impl ContractNameFilter {
    pub fn new<I, S>(contracts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::default();
        for contract in contracts {
            let contract = contract.as_ref();
            if contract.contains('/') || contract.contains('\\') {
                filter.paths.push(PathBuf::from(contract));
            } else {
                let name = contract
                    .strip_suffix(&format!(".{}", utils::SOLIDITY_EXTENSION))
                    .unwrap_or(contract);
                filter.names.insert(name.to_string());
            }
        }
        filter
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.paths.is_empty()
    }
}

impl fmt::Display for ContractNameFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let names = self
            .names
            .iter()
            .cloned()
            .chain(self.paths.iter().map(|p| p.display().to_string()))
            .collect::<Vec<_>>();
        write!(f, "{}", names.join(", "))
    }
}

impl FileFilter for ContractNameFilter {
    fn is_match(&self, file: &Path) -> bool {
        if let Some(stem) = utils::file_stem(file) {
            if self.names.contains(&stem) {
                return true
            }
        }
        self.paths.iter().any(|p| file.ends_with(p))
    }
}
