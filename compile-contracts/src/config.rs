use crate::{
    error::{CompileError, Result},
    utils,
};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Name of the Hardhat project directory at the top level of the repository
pub const HARDHAT_PROJECT_DIR: &str = "contracts";

/// Name of the sources directory inside the Hardhat project
pub const SOLIDITY_SOURCE: &str = "solidity";

/// Name of the directory Hardhat writes its artifacts to
pub const ARTIFACTS_DIR: &str = "artifacts";

/// Name of the directory Hardhat keeps its compilation cache in
pub const CACHE_DIR: &str = "cache";

/// Where to find all files or where to write them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPathsConfig {
    /// Hardhat project root, the directory containing `hardhat.config.js`
    pub root: PathBuf,
    /// Where the sources are staged before compiling
    pub sources: PathBuf,
    /// Where hardhat stores build artifacts
    pub artifacts: PathBuf,
    /// Where hardhat keeps its cache
    pub cache: PathBuf,
}

impl ProjectPathsConfig {
    pub fn builder() -> ProjectPathsConfigBuilder {
        ProjectPathsConfigBuilder::default()
    }

    /// Creates a new hardhat style config instance which points to the canonicalized root path
    pub fn hardhat(root: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::builder().build_with_root(utils::canonicalize(root)?))
    }

    /// Config for the hardhat project of the repository at `repo`, `<repo>/contracts`
    pub fn from_repo_root(repo: impl AsRef<Path>) -> Result<Self> {
        Self::hardhat(repo.as_ref().join(HARDHAT_PROJECT_DIR))
    }

    /// Returns the name of the sources directory as it appears in the artifacts directory,
    /// `solidity` for `<root>/solidity`
    pub fn sources_dir_name(&self) -> PathBuf {
        self.sources
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| {
                self.sources.file_name().map(PathBuf::from).unwrap_or_default()
            })
    }

    /// Creates the sources directory if it doesn't exist yet
    pub fn create_sources_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.sources)
            .map_err(|err| CompileError::io(err, &self.sources))
    }
}

impl fmt::Display for ProjectPathsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "root: {}", self.root.display())?;
        writeln!(f, "sources: {}", self.sources.display())?;
        writeln!(f, "artifacts: {}", self.artifacts.display())?;
        write!(f, "cache: {}", self.cache.display())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPathsConfigBuilder {
    root: Option<PathBuf>,
    sources: Option<PathBuf>,
    artifacts: Option<PathBuf>,
    cache: Option<PathBuf>,
}

impl ProjectPathsConfigBuilder {
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn sources(mut self, sources: impl Into<PathBuf>) -> Self {
        self.sources = Some(sources.into());
        self
    }

    pub fn artifacts(mut self, artifacts: impl Into<PathBuf>) -> Self {
        self.artifacts = Some(artifacts.into());
        self
    }

    pub fn cache(mut self, cache: impl Into<PathBuf>) -> Self {
        self.cache = Some(cache.into());
        self
    }

    /// Fills all unset paths relative to the given root
    pub fn build_with_root(self, root: impl Into<PathBuf>) -> ProjectPathsConfig {
        let root = root.into();
        ProjectPathsConfig {
            sources: self.sources.unwrap_or_else(|| root.join(SOLIDITY_SOURCE)),
            artifacts: self.artifacts.unwrap_or_else(|| root.join(ARTIFACTS_DIR)),
            cache: self.cache.unwrap_or_else(|| root.join(CACHE_DIR)),
            root,
        }
    }

    /// Builds the config, the root defaults to `./contracts` of the current directory
    pub fn build(self) -> Result<ProjectPathsConfig> {
        let root = match self.root.clone() {
            Some(root) => root,
            None => std::env::current_dir()
                .map_err(|err| CompileError::io(err, "."))?
                .join(HARDHAT_PROJECT_DIR),
        };
        Ok(self.build_with_root(utils::canonicalize(root)?))
    }
}
