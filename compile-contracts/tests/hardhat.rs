//! Tests that run the real `npx hardhat compile`

use compile_contracts::{
    compile_contracts_in_dir, find_solidity_contracts, HardhatArtifact, HardhatProject,
    ProjectPathsConfig, SOLIDITY_SOURCE,
};
use fs_extra::dir;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Copies the sample hardhat project into a new temporary dir
fn hardhat_sample() -> TempDir {
    let tmp_dir = tempfile::tempdir().unwrap();
    let sample = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-data/hardhat-sample");
    let options = dir::CopyOptions {
        overwrite: true,
        skip_exist: false,
        buffer_size: 64000, //64kb
        copy_inside: true,
        content_only: true,
        depth: 0,
    };
    dir::copy(sample, tmp_dir.path(), &options).unwrap();
    tmp_dir
}

fn artifact(root: &Path, name: &str) -> PathBuf {
    root.join("artifacts")
        .join(SOLIDITY_SOURCE)
        .join(format!("{name}.sol"))
        .join(format!("{name}.json"))
}

#[test]
fn can_compile_contracts_in_dir() {
    let tmp_dir = hardhat_sample();
    let hardhat_dir = tmp_dir.path();

    compile_contracts_in_dir(hardhat_dir.join(SOLIDITY_SOURCE)).unwrap();

    let path = artifact(hardhat_dir, "SimpleContract");
    assert!(path.is_file());
    let artifact = HardhatArtifact::read(path).unwrap();
    assert_eq!(artifact.contract_name, "SimpleContract");
    assert!(artifact.is_deployable());
}

#[test]
fn can_compile_and_copy_back() {
    let tmp_dir = hardhat_sample();
    let hardhat_dir = tmp_dir.path();
    let repo = tempfile::tempdir().unwrap();
    std::fs::write(
        repo.path().join("Counter.sol"),
        r#"// SPDX-License-Identifier: LGPL-3.0-only
pragma solidity ^0.8.20;

contract Counter {
    uint256 public count;

    function increment() external {
        count += 1;
    }
}
"#,
    )
    .unwrap();

    let project = HardhatProject::builder()
        .paths(ProjectPathsConfig::hardhat(hardhat_dir).unwrap())
        .build()
        .unwrap();
    let contracts = find_solidity_contracts(repo.path()).unwrap();
    let report = project.compile_contracts(&contracts).unwrap();
    assert!(report.is_success(), "{report}");

    let artifact = HardhatArtifact::read(repo.path().join("Counter.json")).unwrap();
    assert_eq!(artifact.contract_name, "Counter");
    assert!(!project.paths.artifacts.exists());
}
