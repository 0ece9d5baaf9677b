//! Binary resolution and blocking execution
//!
//! A [`Locator`] turns a logical tool name into a [`Binary`] with an absolute
//! path. The call site picks the failure mode explicitly:
//! [`Locator::resolve_mandatory`] fails with [`Error::ExecutableNotFound`],
//! [`Locator::resolve_optional`] yields `None` so best-effort tools can
//! degrade to empty results.
//!
//! Execution goes through duct with stdout and stderr captured separately.
//! Environment overrides apply to the child only; the parent environment is
//! never modified.

use crate::forward::ForwardResult;
use crate::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Finds executables on the search path
#[derive(Debug, Clone, Default)]
pub struct Locator {
    search_path: Option<OsString>,
    timeout: Option<Duration>,
}

impl Locator {
    /// Locator over the process `PATH`, without a timeout
    #[must_use]
    pub fn system() -> Self {
        Self::default()
    }

    /// Locator over an explicit search path (same syntax as `PATH`)
    #[must_use]
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
            timeout: None,
        }
    }

    /// Set the wall-clock limit handed to every resolved binary
    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Look up `name` (or a path) without deciding on severity
    #[must_use]
    pub fn find(&self, name: impl AsRef<OsStr>) -> Option<PathBuf> {
        let name = name.as_ref();
        let found = match &self.search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                which::which_in(name, Some(paths), cwd)
            }
            None => which::which(name),
        };
        match found {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::debug!(name = %name.to_string_lossy(), "Executable lookup failed: {e}");
                None
            }
        }
    }

    /// Resolve a tool the current operation cannot do without
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExecutableNotFound`] if `name` is not on the search path.
    pub fn resolve_mandatory(&self, name: &str) -> Result<Binary> {
        self.resolve_optional(name)
            .ok_or_else(|| Error::ExecutableNotFound {
                name: name.to_string(),
            })
    }

    /// Resolve a best-effort tool, `None` when it is not installed
    #[must_use]
    pub fn resolve_optional(&self, name: &str) -> Option<Binary> {
        self.find(name).map(|path| {
            tracing::debug!(name, path = %path.display(), "Resolved executable");
            Binary::new(name, path).with_timeout(self.timeout)
        })
    }

    /// Resolve the first of several candidate names that is installed
    #[must_use]
    pub fn resolve_first(&self, names: &[&str]) -> Option<Binary> {
        names.iter().find_map(|name| self.resolve_optional(name))
    }

    /// Resolve an explicit override path given by the user
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExecutableNotFound`] if the path is not an executable file.
    pub fn resolve_override(&self, path: &Path) -> Result<Binary> {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let resolved = self.find(path).ok_or_else(|| Error::ExecutableNotFound {
            name: path.display().to_string(),
        })?;
        Ok(Binary::new(name, resolved).with_timeout(self.timeout))
    }
}

/// A resolved executable
///
/// The path is fixed at construction; a different binary means a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary {
    name: String,
    path: PathBuf,
    timeout: Option<Duration>,
}

impl Binary {
    /// Wrap an already-resolved absolute path
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            timeout: None,
        }
    }

    /// Set the wall-clock limit for invocations of this binary
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Logical name the binary was resolved from
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the executable
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Timeout applied to invocations
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Start building an invocation with the given arguments
    pub fn command<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Invocation::new(&self.path)
            .args(args)
            .timeout(self.timeout)
    }

    /// Run with the strict failure policy and return trimmed stdout
    ///
    /// # Errors
    ///
    /// See [`Invocation::execute`].
    pub fn execute<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.command(args).execute()
    }
}

/// One subprocess call being assembled
#[derive(Debug, Clone)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
    envs: Vec<(OsString, OsString)>,
    dir: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl Invocation {
    /// Invocation of `program` without arguments
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            dir: None,
            timeout: None,
        }
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Set an environment variable for the child process only
    #[must_use]
    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.envs
            .push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }

    /// Run the child in `dir`
    #[must_use]
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Kill the child and fail with [`Error::Timeout`] after `timeout`
    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Environment overrides set on this invocation
    pub fn envs(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.envs.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    /// Human-readable command line for logs and errors
    #[must_use]
    pub fn display(&self) -> String {
        let program = self
            .program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy();
        std::iter::once(program.into_owned())
            .chain(self.args.iter().map(|a| quote_arg(&a.to_string_lossy())))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run and return stdout with trailing whitespace trimmed
    ///
    /// Any output on stderr counts as failure, whatever the exit status.
    ///
    /// # Errors
    ///
    /// - [`Error::Subprocess`] on non-empty stderr or a non-zero exit
    /// - [`Error::Timeout`] if the limit elapses
    /// - [`Error::ExecutableNotFound`] if the program cannot be spawned
    pub fn execute(&self) -> Result<String> {
        let output = self.run()?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() || !output.status.success() {
            return Err(Error::Subprocess {
                command: self.display(),
                exit_code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }

    /// Run and hand back whatever the child produced, never failing on its status
    ///
    /// # Errors
    ///
    /// Only spawn failures and timeouts are errors.
    pub fn capture(&self) -> Result<ForwardResult> {
        let output = self.run()?;
        Ok(ForwardResult {
            // Signal termination has no code
            exit_code: output.status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn run(&self) -> Result<std::process::Output> {
        tracing::debug!(command = %self.display(), dir = ?self.dir, "Running subprocess");

        let mut expr = duct::cmd(&self.program, &self.args)
            .stdout_capture()
            .stderr_capture()
            .unchecked();
        if let Some(dir) = &self.dir {
            expr = expr.dir(dir);
        }
        for (key, value) in &self.envs {
            expr = expr.env(key, value);
        }

        let handle = expr.start().map_err(|e| self.spawn_error(e))?;

        let output = match self.timeout {
            Some(limit) => match handle.wait_timeout(limit)? {
                Some(output) => output.clone(),
                None => {
                    if let Err(e) = handle.kill() {
                        tracing::warn!(command = %self.display(), "Failed to kill timed out process: {e}");
                    }
                    return Err(Error::Timeout {
                        command: self.display(),
                        seconds: limit.as_secs(),
                    });
                }
            },
            None => handle.wait()?.clone(),
        };

        tracing::debug!(
            command = %self.display(),
            status = ?output.status.code(),
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "Subprocess finished"
        );
        Ok(output)
    }

    fn spawn_error(&self, err: std::io::Error) -> Error {
        if err.kind() == std::io::ErrorKind::NotFound {
            Error::ExecutableNotFound {
                name: self.program.display().to_string(),
            }
        } else {
            Error::Io(err)
        }
    }
}

fn quote_arg(arg: &str) -> String {
    if arg.is_empty() || arg.contains(char::is_whitespace) {
        format!("\"{arg}\"")
    } else {
        arg.to_string()
    }
}

#[cfg(all(test, unix))]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::testing::fake_bin;
    use tempfile::TempDir;

    #[test]
    fn test_mandatory_missing_binary_fails() {
        let dir = TempDir::new().unwrap();
        let locator = Locator::with_search_path(dir.path());

        let err = locator.resolve_mandatory("culting-no-such-tool").unwrap_err();
        assert!(
            matches!(err, Error::ExecutableNotFound { ref name } if name == "culting-no-such-tool")
        );
    }

    #[test]
    fn test_optional_missing_binary_is_none() {
        let dir = TempDir::new().unwrap();
        let locator = Locator::with_search_path(dir.path());
        assert!(locator.resolve_optional("culting-no-such-tool").is_none());
    }

    #[test]
    fn test_resolves_absolute_path_and_first_candidate() {
        let dir = TempDir::new().unwrap();
        let path = fake_bin(dir.path(), "python", "echo hi");
        let locator = Locator::with_search_path(dir.path()).timeout(Some(Duration::from_secs(5)));

        let binary = locator.resolve_first(&["python3", "python"]).unwrap();
        assert_eq!(binary.name(), "python");
        assert_eq!(binary.path(), path);
        assert!(binary.path().is_absolute());
        assert_eq!(binary.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_resolve_override() {
        let dir = TempDir::new().unwrap();
        let path = fake_bin(dir.path(), "python3.12", "echo hi");
        let locator = Locator::with_search_path("");

        let binary = locator.resolve_override(&path).unwrap();
        assert_eq!(binary.name(), "python3.12");

        let err = locator
            .resolve_override(&dir.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, Error::ExecutableNotFound { .. }));
    }

    #[test]
    fn test_execute_trims_stdout() {
        let dir = TempDir::new().unwrap();
        let binary = Binary::new("tool", fake_bin(dir.path(), "tool", "echo \"  $1  \"; echo"));

        assert_eq!(binary.execute(["value"]).unwrap(), "  value");
    }

    #[test]
    fn test_execute_fails_on_stderr_even_with_zero_exit() {
        let dir = TempDir::new().unwrap();
        let binary = Binary::new("tool", fake_bin(dir.path(), "tool", "echo out; echo warn >&2"));

        let err = binary.execute(["x"]).unwrap_err();
        match err {
            Error::Subprocess {
                command,
                exit_code,
                stderr,
            } => {
                assert_eq!(command, "tool x");
                assert_eq!(exit_code, Some(0));
                assert_eq!(stderr, "warn");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_execute_fails_on_nonzero_exit() {
        let dir = TempDir::new().unwrap();
        let binary = Binary::new("tool", fake_bin(dir.path(), "tool", "exit 3"));

        let err = binary.execute(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, Error::Subprocess { exit_code: Some(3), .. }));
    }

    #[test]
    fn test_capture_is_tolerant() {
        let dir = TempDir::new().unwrap();
        let binary = Binary::new(
            "tool",
            fake_bin(dir.path(), "tool", "echo out; echo err >&2; exit 4"),
        );

        let result = binary.command(["a"]).capture().unwrap();
        assert_eq!(result.exit_code, 4);
        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
    }

    #[test]
    fn test_env_override_reaches_child_only() {
        let dir = TempDir::new().unwrap();
        let binary = Binary::new("tool", fake_bin(dir.path(), "tool", "echo \"$CULTING_TEST_SCOPED\""));

        let out = binary
            .command(Vec::<String>::new())
            .env("CULTING_TEST_SCOPED", "3.12.4")
            .execute()
            .unwrap();
        assert_eq!(out, "3.12.4");
        assert!(std::env::var_os("CULTING_TEST_SCOPED").is_none());
    }

    #[test]
    fn test_dir_sets_working_directory() {
        let dir = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let binary = Binary::new("tool", fake_bin(dir.path(), "tool", "pwd"));

        let out = binary
            .command(Vec::<String>::new())
            .dir(work.path())
            .execute()
            .unwrap();
        assert_eq!(
            Path::new(&out).canonicalize().unwrap(),
            work.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_timeout_kills_child() {
        let dir = TempDir::new().unwrap();
        let binary = Binary::new("tool", fake_bin(dir.path(), "tool", "exec sleep 5"))
            .with_timeout(Some(Duration::from_millis(200)));

        let err = binary.execute(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
    }

    #[test]
    fn test_spawn_missing_program() {
        let err = Invocation::new("/nonexistent/culting/tool").execute().unwrap_err();
        assert!(matches!(err, Error::ExecutableNotFound { .. }));
    }

    #[test]
    fn test_display_quotes_whitespace() {
        let inv = Invocation::new("/usr/bin/git").args(["commit", "-m", "Initial commit"]);
        assert_eq!(inv.display(), "git commit -m \"Initial commit\"");
    }
}
