//! Utility functions

use crate::error::{CompileError, CompileIoError, Result};
use fs_extra::file;
use path_slash::PathExt;
use std::{
    borrow::Cow,
    fs,
    path::{Component, Path, PathBuf},
};

/// Extension of solidity source files
pub const SOLIDITY_EXTENSION: &str = "sol";

/// Name of the artifact file shared by every source in a directory, as used by the precompiles
pub const ABI_JSON: &str = "abi.json";

/// Entries that must all be present in the top level directory of the repository
pub const REPO_MARKERS: &[&str] = &["go.mod", "evmd"];

/// Returns `true` if the path has the `.sol` extension
pub fn is_solidity_file(path: impl AsRef<Path>) -> bool {
    path.as_ref().extension().map(|ext| ext == SOLIDITY_EXTENSION).unwrap_or_default()
}

/// Returns the path with `/` separators, regardless of the platform
pub fn to_slash(path: &Path) -> Cow<'_, str> {
    path.to_slash_lossy()
}

/// Returns the file stem of the given path as `String`
pub fn file_stem(path: impl AsRef<Path>) -> Option<String> {
    path.as_ref().file_stem().and_then(|s| s.to_str()).map(str::to_string)
}

/// Joins `rel` onto `base`, skipping `.` components so that `base.join(".")` stays `base`
pub fn join_relative(base: impl AsRef<Path>, rel: impl AsRef<Path>) -> PathBuf {
    let mut path = base.as_ref().to_path_buf();
    for component in rel.as_ref().components() {
        match component {
            Component::CurDir => {}
            other => path.push(other),
        }
    }
    path
}

/// Returns `true` if `dir` is the top level of the repository, see [`REPO_MARKERS`]
///
/// # Example
///
/// ```no_run
/// use compile_contracts::utils;
/// assert!(utils::is_repo_root(std::env::current_dir().unwrap()));
/// ```
pub fn is_repo_root(dir: impl AsRef<Path>) -> bool {
    is_repo_root_with(dir, REPO_MARKERS)
}

/// Same as [`is_repo_root`] but with a custom set of markers
pub fn is_repo_root_with(dir: impl AsRef<Path>, markers: &[&str]) -> bool {
    let dir = dir.as_ref();
    dir.is_dir() && !markers.is_empty() && markers.iter().all(|marker| dir.join(marker).exists())
}

/// Walks up from `start` and returns the first directory that is the repository root
pub fn find_repo_root(start: impl AsRef<Path>) -> Option<PathBuf> {
    let start = start.as_ref();
    let start = dunce::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());
    start.ancestors().find(|dir| is_repo_root(dir)).map(Path::to_path_buf)
}

/// Canonicalize the path, platform-agnostic
///
/// On windows this will ensure the path only consists of `/` separators
pub fn canonicalize(path: impl AsRef<Path>) -> std::result::Result<PathBuf, CompileIoError> {
    let path = path.as_ref();
    let res = dunce::canonicalize(path);
    #[cfg(windows)]
    let res = res.map(|p| PathBuf::from(p.to_slash_lossy().into_owned()));
    res.map_err(|err| CompileIoError::new(err, path))
}

/// Creates the parent directory of the `file` and all its ancestors if it does not exist
pub fn create_parent_dir_all(file: impl AsRef<Path>) -> Result<()> {
    let file = file.as_ref();
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent).map_err(|err| {
            CompileError::msg(format!(
                "Failed to create parent folder \"{}\": {}",
                parent.display(),
                err
            ))
        })?;
    }
    Ok(())
}

/// Removes the directory and everything in it, does nothing if it doesn't exist
pub fn remove_dir_if_exists(dir: impl AsRef<Path>) -> Result<bool> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(false)
    }
    tracing::trace!("removing \"{}\"", dir.display());
    fs::remove_dir_all(dir).map_err(|err| CompileError::io(err, dir))?;
    Ok(true)
}

/// commonly used options for copying files
fn file_copy_options(overwrite: bool) -> file::CopyOptions {
    file::CopyOptions {
        overwrite,
        skip_exist: false,
        buffer_size: 64000, //64kb
    }
}

/// Copies the `source` file to `target`.
///
/// An existing `target` is replaced only if `overwrite` is set, otherwise copying fails.
pub fn copy_file(
    source: impl AsRef<Path>,
    target: impl AsRef<Path>,
    overwrite: bool,
) -> Result<()> {
    file::copy(source, target, &file_copy_options(overwrite))?;
    Ok(())
}

/// Returns `true` if both paths resolve to the same file on disk
pub fn is_same_file(a: impl AsRef<Path>, b: impl AsRef<Path>) -> Result<bool> {
    Ok(canonicalize(a)? == canonicalize(b)?)
}

/// Removes the now empty ancestors of `file` that are inside of `stop`, `stop` itself is kept
pub fn remove_empty_parents(file: impl AsRef<Path>, stop: impl AsRef<Path>) -> Result<()> {
    let stop = stop.as_ref();
    for dir in file.as_ref().ancestors().skip(1) {
        if dir == stop || !dir.starts_with(stop) || !dir.is_dir() {
            break
        }
        let is_empty =
            fs::read_dir(dir).map_err(|err| CompileError::io(err, dir))?.next().is_none();
        if !is_empty {
            break
        }
        fs::remove_dir(dir).map_err(|err| CompileError::io(err, dir))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir_all, File};

    #[test]
    fn copy_file_respects_overwrite() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let source = tmp_dir.path().join("Source.sol");
        let target = tmp_dir.path().join("Target.sol");
        fs::write(&source, "contract Source {}").unwrap();
        fs::write(&target, "contract Target {}").unwrap();

        assert!(copy_file(&source, &target, false).is_err());
        assert_eq!(fs::read_to_string(&target).unwrap(), "contract Target {}");

        copy_file(&source, &target, true).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "contract Source {}");
    }

    #[test]
    fn can_detect_same_file() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let file = tmp_dir.path().join("Counter.sol");
        fs::write(&file, "").unwrap();
        fs::write(tmp_dir.path().join("Other.sol"), "").unwrap();

        assert!(is_same_file(&file, tmp_dir.path().join("./Counter.sol")).unwrap());
        assert!(!is_same_file(&file, tmp_dir.path().join("Other.sol")).unwrap());
    }

    #[test]
    fn can_detect_solidity_files() {
        assert!(is_solidity_file("contracts/Greeter.sol"));
        assert!(!is_solidity_file("contracts/Greeter.json"));
        assert!(!is_solidity_file("contracts/sol"));
    }

    #[test]
    fn join_relative_skips_current_dir() {
        assert_eq!(join_relative("/tmp/target", "."), PathBuf::from("/tmp/target"));
        assert_eq!(
            join_relative("/tmp/target", "precompiles/staking"),
            PathBuf::from("/tmp/target/precompiles/staking")
        );
        assert_eq!(join_relative("/tmp/target", "./nested"), PathBuf::from("/tmp/target/nested"));
    }

    #[test]
    fn can_detect_repo_root() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let root = tmp_dir.path();
        assert!(!is_repo_root(root));

        File::create(root.join("go.mod")).unwrap();
        assert!(!is_repo_root(root));

        create_dir_all(root.join("evmd")).unwrap();
        assert!(is_repo_root(root));

        let nested = root.join("precompiles").join("staking");
        create_dir_all(&nested).unwrap();
        assert!(!is_repo_root(&nested));
        assert_eq!(find_repo_root(&nested), Some(canonicalize(root).unwrap()));
    }

    #[test]
    fn custom_markers() {
        let tmp_dir = tempfile::tempdir().unwrap();
        File::create(tmp_dir.path().join("Makefile")).unwrap();
        assert!(is_repo_root_with(tmp_dir.path(), &["Makefile"]));
        assert!(!is_repo_root_with(tmp_dir.path(), &[]));
        assert!(!is_repo_root_with(tmp_dir.path().join("Makefile"), &["Makefile"]));
    }

    #[test]
    fn removes_empty_parents_only() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let sources = tmp_dir.path().join("solidity");
        let file = sources.join("precompiles/staking/StakingI.sol");
        create_dir_all(file.parent().unwrap()).unwrap();
        File::create(sources.join("precompiles/Keep.sol")).unwrap();

        remove_empty_parents(&file, &sources).unwrap();
        assert!(!sources.join("precompiles/staking").exists());
        assert!(sources.join("precompiles").is_dir());

        fs::remove_file(sources.join("precompiles/Keep.sol")).unwrap();
        remove_empty_parents(sources.join("precompiles/Keep.sol"), &sources).unwrap();
        assert!(!sources.join("precompiles").exists());
        assert!(sources.is_dir());
    }

    #[test]
    fn remove_missing_dir_is_noop() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let dir = tmp_dir.path().join("artifacts");
        assert!(!remove_dir_if_exists(&dir).unwrap());
        create_dir_all(dir.join("solidity")).unwrap();
        assert!(remove_dir_if_exists(&dir).unwrap());
        assert!(!dir.exists());
    }
}
