#![doc = include_str!("../README.md")]

pub mod contracts;
pub use contracts::{
    find_solidity_contracts, find_solidity_contracts_with, select_contracts, ContractFile,
};

mod compile;
pub use compile::{compile_contracts_in_dir, Compiler, HARDHAT_COMPILE_ARGS, NPX};

mod config;
pub use config::{
    ProjectPathsConfig, ProjectPathsConfigBuilder, ARTIFACTS_DIR, CACHE_DIR, HARDHAT_PROJECT_DIR,
    SOLIDITY_SOURCE,
};

pub mod error;
pub mod filter;
pub use filter::{is_ignored_folder, ContractNameFilter, FileFilter, IgnoreRules};

pub mod hh;
pub use hh::HardhatArtifact;

mod stage;
pub use stage::{copy_to_contracts_directory, stage_contracts, staged_path};

pub mod utils;
pub use utils::{find_repo_root, is_repo_root};

use error::{CompileError, Result};
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// A hardhat project into which the contracts of a repository are staged and compiled
#[derive(Debug, Clone)]
pub struct HardhatProject {
    /// The layout of the project
    pub paths: ProjectPathsConfig,
    /// The command that compiles the staged sources
    pub compiler: Compiler,
    /// Whether to remove the staged sources and the generated files after compiling
    pub cleanup: bool,
}

impl HardhatProject {
    /// Configure the project
    ///
    /// # Example
    ///
    /// ```no_run
    /// use compile_contracts::HardhatProject;
    /// let project = HardhatProject::builder().build().unwrap();
    /// ```
    pub fn builder() -> HardhatProjectBuilder {
        HardhatProjectBuilder::default()
    }

    /// The hardhat project of the repository at `repo`, `<repo>/contracts`
    pub fn from_repo_root(repo: impl AsRef<Path>) -> Result<Self> {
        Self::builder().paths(ProjectPathsConfig::from_repo_root(repo)?).build()
    }

    /// Returns the path at which hardhat writes the artifact of the contract
    pub fn artifact_path(&self, contract: &ContractFile) -> PathBuf {
        hh::artifact_path(&self.paths.artifacts, self.paths.sources_dir_name(), contract)
    }

    /// Copies the contracts into the project's sources directory
    pub fn stage(&self, contracts: &[ContractFile]) -> Result<Vec<PathBuf>> {
        stage_contracts(&self.paths.sources, contracts)
    }

    /// Runs the compiler in the project's sources directory
    pub fn compile(&self) -> Result<()> {
        self.compiler.compile(&self.paths.sources)
    }

    /// Checks for every contract whether its artifact exists
    pub fn verify_artifacts<'a>(
        &self,
        contracts: &'a [ContractFile],
    ) -> Vec<(&'a ContractFile, bool)> {
        contracts.iter().map(|c| (c, self.artifact_path(c).is_file())).collect()
    }

    /// Copies the artifact of every contract to [`ContractFile::artifact_target`].
    ///
    /// Contracts without a compiled artifact are skipped. Returns the written files.
    pub fn copy_compiled_contracts_back_to_source(
        &self,
        contracts: &[ContractFile],
    ) -> Result<Vec<PathBuf>> {
        Ok(self.write_back(contracts)?.written)
    }

    /// Removes everything hardhat generated, the `artifacts` and `cache` directories
    pub fn clean_up(&self) -> Result<()> {
        for dir in [&self.paths.artifacts, &self.paths.cache] {
            utils::remove_dir_if_exists(dir)?;
        }
        Ok(())
    }

    /// Removes the files created by [`Self::stage`] and the directories that became empty, up to
    /// the sources directory.
    ///
    /// Only pass the paths returned by [`Self::stage`], files that existed before are never part
    /// of them.
    pub fn remove_staged(&self, staged: &[PathBuf]) -> Result<()> {
        for file in staged {
            if file.is_file() {
                std::fs::remove_file(file).map_err(|err| CompileError::io(err, file))?;
            }
            utils::remove_empty_parents(file, &self.paths.sources)?;
        }
        Ok(())
    }

    /// Stages, compiles and copies the artifacts of the contracts back next to their sources.
    ///
    /// If the compiler fails, the error is returned as is and the staged files are kept.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use compile_contracts::{find_solidity_contracts, HardhatProject};
    /// let contracts = find_solidity_contracts(".").unwrap();
    /// let project = HardhatProject::from_repo_root(".").unwrap();
    /// let report = project.compile_contracts(&contracts).unwrap();
    /// assert!(report.is_success());
    /// ```
    #[tracing::instrument(
        skip_all,
        name = "hardhat-project::compile",
        fields(contracts = contracts.len())
    )]
    pub fn compile_contracts(&self, contracts: &[ContractFile]) -> Result<CompileReport> {
        if contracts.is_empty() {
            tracing::debug!("nothing to compile");
            return Ok(CompileReport::default())
        }
        let staged = self.stage(contracts)?;
        self.compile()?;
        let report = self.write_back(contracts)?;
        if self.cleanup {
            self.remove_staged(&staged)?;
            self.clean_up()?;
        }
        Ok(report)
    }

    fn write_back(&self, contracts: &[ContractFile]) -> Result<CompileReport> {
        let mut report = CompileReport::default();
        for contract in contracts {
            let artifact = self.artifact_path(contract);
            if !artifact.is_file() {
                tracing::warn!(
                    "no compiled artifact for \"{}\" at \"{}\"",
                    contract,
                    artifact.display()
                );
                report.missing.push(contract.clone());
                continue
            }
            let target = contract.artifact_target();
            tracing::trace!("copying \"{}\" to \"{}\"", artifact.display(), target.display());
            utils::copy_file(&artifact, &target, true)?;
            report.written.push(target);
        }
        Ok(report)
    }
}

pub struct HardhatProjectBuilder {
    paths: Option<ProjectPathsConfig>,
    compiler: Option<Compiler>,
    cleanup: bool,
}

impl HardhatProjectBuilder {
    #[must_use]
    pub fn paths(mut self, paths: ProjectPathsConfig) -> Self {
        self.paths = Some(paths);
        self
    }

    #[must_use]
    pub fn compiler(mut self, compiler: Compiler) -> Self {
        self.compiler = Some(compiler);
        self
    }

    /// Keeps the staged sources and the generated files after compiling
    #[must_use]
    pub fn no_cleanup(mut self) -> Self {
        self.cleanup = false;
        self
    }

    pub fn build(self) -> Result<HardhatProject> {
        let Self { paths, compiler, cleanup } = self;
        Ok(HardhatProject {
            paths: paths.map(Ok).unwrap_or_else(|| ProjectPathsConfig::builder().build())?,
            compiler: compiler.unwrap_or_default(),
            cleanup,
        })
    }
}

impl Default for HardhatProjectBuilder {
    fn default() -> Self {
        Self { paths: None, compiler: None, cleanup: true }
    }
}

/// Outcome of [`HardhatProject::compile_contracts`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    /// Artifacts that were copied next to their sources
    pub written: Vec<PathBuf>,
    /// Contracts for which hardhat produced no artifact
    pub missing: Vec<ContractFile>,
}

impl CompileReport {
    /// Whether every contract got its artifact
    pub fn is_success(&self) -> bool {
        self.missing.is_empty()
    }
}

impl fmt::Display for CompileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} artifacts written", self.written.len())?;
        if !self.missing.is_empty() {
            let missing = self.missing.iter().map(ToString::to_string).collect::<Vec<_>>();
            write!(f, ", missing: {}", missing.join(", "))?;
        }
        Ok(())
    }
}
