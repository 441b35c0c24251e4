//! Hardhat support

use crate::{
    contracts::ContractFile,
    error::{CompileError, Result},
    utils,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The `_format` of artifacts written by hardhat
pub const HH_ARTIFACT_VERSION: &str = "hh-sol-artifact-1";

/// A hardhat artifact
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardhatArtifact {
    #[serde(rename = "_format")]
    pub format: String,
    /// A string with the contract's name.
    pub contract_name: String,
    /// The source name of this contract in the workspace like `solidity/Greeter.sol`
    pub source_name: String,
    /// The contract's ABI
    pub abi: serde_json::Value,
    /// A "0x"-prefixed hex string of the unlinked deployment bytecode. If the contract is not
    /// deployable, this has the string "0x"
    #[serde(default)]
    pub bytecode: Option<String>,
    /// A "0x"-prefixed hex string of the unlinked runtime/deployed bytecode. If the contract is
    /// not deployable, this has the string "0x"
    #[serde(default)]
    pub deployed_bytecode: Option<String>,
    #[serde(default)]
    pub link_references: serde_json::Value,
    #[serde(default)]
    pub deployed_link_references: serde_json::Value,
}

impl HardhatArtifact {
    /// Reads the artifact json file
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::trace!("reading hardhat artifact \"{}\"", path.display());
        let content = std::fs::read(path).map_err(|err| CompileError::io(err, path))?;
        Ok(serde_json::from_slice(&content)?)
    }

    /// Whether the artifact carries deployable bytecode
    pub fn is_deployable(&self) -> bool {
        self.bytecode.as_deref().map(|code| code != "0x" && !code.is_empty()).unwrap_or_default()
    }
}

/// Returns the path at which hardhat writes the artifact of `contract`:
/// `<artifacts>/<sources dir>/<relative_path>/<Name>.sol/<Name>.json`
pub fn artifact_path(
    artifacts: impl AsRef<Path>,
    sources_dir: impl AsRef<Path>,
    contract: &ContractFile,
) -> PathBuf {
    utils::join_relative(artifacts.as_ref().join(sources_dir), &contract.relative_path)
        .join(contract.file_name())
        .join(format!("{}.json", contract.filename))
}
