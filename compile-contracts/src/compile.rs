//! Running the external compiler on a staged hardhat project

use crate::error::{CompileError, Result};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

/// The name of the `npx` binary on the system
pub const NPX: &str = "npx";

/// Arguments passed to `npx` to compile a hardhat project
pub const HARDHAT_COMPILE_ARGS: &[&str] = &["hardhat", "compile"];

/// Abstraction over the external command that compiles a staged hardhat project
///
/// By default the command is `npx hardhat compile`, the `npx` path can be overwritten with the
/// `NPX_PATH` environment variable.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Compiler {
    /// Path to the executable
    pub program: PathBuf,
    /// Arguments passed to the executable
    pub args: Vec<String>,
}

impl Default for Compiler {
    fn default() -> Self {
        let program = std::env::var("NPX_PATH").unwrap_or_else(|_| NPX.to_string());
        Compiler::new(program).args(HARDHAT_COMPILE_ARGS.iter().copied())
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        if !self.args.is_empty() {
            write!(f, " {}", self.args.join(" "))?;
        }
        Ok(())
    }
}

impl Compiler {
    /// A new instance which runs `program` without arguments
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Compiler { program: program.into(), args: Vec::new() }
    }

    /// Adds an argument to pass to the command.
    #[must_use]
    pub fn arg<T: Into<String>>(mut self, arg: T) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments to pass to the command.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    /// Runs the command with `dir` as working directory and blocks until it exits.
    ///
    /// Returns [`CompileError::CompilerFailed`] if the process exits unsuccessfully. Nothing that
    /// was staged or produced is cleaned up on failure.
    #[tracing::instrument(
        skip_all,
        name = "compiler::compile",
        fields(dir = %dir.as_ref().display())
    )]
    pub fn compile(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        tracing::trace!("running `{}` in \"{}\"", self, dir.display());
        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .stdout(Stdio::piped())
            .output()
            .map_err(|err| CompileError::io(err, &self.program))?;
        self.compile_output(dir, output)
    }

    /// Compiles the project at `dir` and returns whether the `expected` artifact exists
    /// afterwards.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use compile_contracts::Compiler;
    /// let compiled = Compiler::default()
    ///     .compile_and_verify(
    ///         "contracts/solidity",
    ///         "contracts/artifacts/solidity/Counter.sol/Counter.json",
    ///     )
    ///     .unwrap();
    /// ```
    pub fn compile_and_verify(
        &self,
        dir: impl AsRef<Path>,
        expected: impl AsRef<Path>,
    ) -> Result<bool> {
        self.compile(dir)?;
        let expected = expected.as_ref();
        let exists = expected.is_file();
        if !exists {
            tracing::debug!("expected artifact \"{}\" is missing", expected.display());
        }
        Ok(exists)
    }

    fn compile_output(&self, dir: &Path, output: Output) -> Result<()> {
        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::debug!("{}", stdout.trim());
        }
        if output.status.success() {
            Ok(())
        } else {
            Err(CompileError::CompilerFailed {
                program: self.to_string(),
                dir: dir.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl AsRef<Path> for Compiler {
    fn as_ref(&self) -> &Path {
        &self.program
    }
}

/// Compiles the hardhat project that `dir` belongs to with the default [`Compiler`]
pub fn compile_contracts_in_dir(dir: impl AsRef<Path>) -> Result<()> {
    Compiler::default().compile(dir)
}
