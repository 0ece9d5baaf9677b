//! Git resolver
//!
//! Repositories are initialized with the external `git` binary so the user's
//! own configuration (identity, hooks, templates) applies.

use crate::command::{Binary, Locator};
use crate::{Error, Result};
use std::fs;
use std::path::Path;

/// Author identity read back from git configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitIdentity {
    /// `user.name`
    pub name: String,
    /// `user.email`, `None` when email usage is disabled
    pub email: Option<String>,
}

/// Settings for a fresh repository
#[derive(Debug, Clone)]
pub struct RepoSettings<'a> {
    /// Initial branch name
    pub branch: &'a str,
    /// Message of the first commit
    pub commit_message: &'a str,
    /// Readme file name, committed first
    pub readme_name: &'a str,
    /// Readme content
    pub readme: &'a str,
    /// Require and return `user.email`
    pub use_email: bool,
}

/// The git binary
#[derive(Debug, Clone)]
pub struct Git {
    binary: Binary,
}

impl Git {
    /// Locate `git`, which is mandatory for project initialization
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExecutableNotFound`] if git is not installed.
    pub fn locate(locator: &Locator) -> Result<Self> {
        locator.resolve_mandatory("git").map(Self::new)
    }

    /// Wrap a resolved binary
    #[must_use]
    pub fn new(binary: Binary) -> Self {
        Self { binary }
    }

    /// Underlying binary
    #[must_use]
    pub fn binary(&self) -> &Binary {
        &self.binary
    }

    /// Whether `path` already holds a repository
    #[must_use]
    pub fn is_repository(path: &Path) -> bool {
        path.join(".git").is_dir()
    }

    /// Initialize a repository at `path`, commit the readme and return the
    /// configured identity
    ///
    /// An existing repository is left alone apart from a warning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Subprocess`] if any git call fails, including a
    /// missing `user.name` or `user.email`.
    pub fn init(&self, path: &Path, settings: &RepoSettings<'_>) -> Result<GitIdentity> {
        let identity = self.identity(path, settings.use_email)?;

        if Self::is_repository(path) {
            tracing::warn!(path = %path.display(), "Already a Git repository, leaving it untouched");
            return Ok(identity);
        }

        let branch = format!("--initial-branch={}", settings.branch);
        self.binary
            .command(["init", "--quiet", branch.as_str()])
            .arg(path)
            .execute()?;

        fs::write(path.join(settings.readme_name), settings.readme)?;
        self.run_in(path, &["add", "--", settings.readme_name])?;
        self.run_in(path, &["commit", "--quiet", "-m", settings.commit_message])?;

        tracing::info!(path = %path.display(), branch = settings.branch, "Git repository initialized");
        Ok(identity)
    }

    /// Read `user.name` and, if requested, `user.email` as seen from `path`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Subprocess`] if a required value is not configured.
    pub fn identity(&self, path: &Path, use_email: bool) -> Result<GitIdentity> {
        let name = self.required_config(path, "user.name")?;
        let email = if use_email {
            Some(self.required_config(path, "user.email")?)
        } else {
            None
        };
        Ok(GitIdentity { name, email })
    }

    fn required_config(&self, path: &Path, key: &str) -> Result<String> {
        let unset = || Error::Subprocess {
            command: format!("git config {key}"),
            exit_code: Some(1),
            stderr: format!("{key} is not set, configure it with `git config --global {key}`"),
        };
        match self.run_in(path, &["config", key]) {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            Ok(_) => Err(unset()),
            // `git config` exits 1 without output for unset keys
            Err(Error::Subprocess {
                exit_code: Some(1),
                stderr,
                ..
            }) if stderr.is_empty() => Err(unset()),
            Err(e) => Err(e),
        }
    }

    fn run_in(&self, path: &Path, args: &[&str]) -> Result<String> {
        self.binary.command(["-C"]).arg(path).args(args).execute()
    }
}

#[cfg(all(test, unix))]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::testing::fake_bin;
    use tempfile::TempDir;

    /// Logs every call; `config` answers from env vars, empty means unset
    const FAKE_GIT: &str = r#"
echo "$@" >> "$GIT_LOG"
if [ "$1" = "-C" ]; then shift 2; fi
case "$1" in
  init) mkdir -p "$4/.git" ;;
  config)
    case "$2" in
      user.name) [ -n "$FAKE_NAME" ] && echo "$FAKE_NAME" || exit 1 ;;
      user.email) [ -n "$FAKE_EMAIL" ] && echo "$FAKE_EMAIL" || exit 1 ;;
    esac
    ;;
esac
"#;

    fn settings(use_email: bool) -> RepoSettings<'static> {
        RepoSettings {
            branch: "main",
            commit_message: "Initial commit",
            readme_name: "README.md",
            readme: "# Demo\n",
            use_email,
        }
    }

    fn git(dir: &Path) -> Git {
        Git::new(Binary::new("git", fake_bin(dir, "git", FAKE_GIT)))
    }

    #[test]
    #[serial_test::serial]
    fn test_init_commits_readme_and_reads_identity() {
        let bin = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let log = bin.path().join("git.log");

        temp_env::with_vars(
            [
                ("GIT_LOG", Some(log.to_str().unwrap())),
                ("FAKE_NAME", Some("Ada Lovelace")),
                ("FAKE_EMAIL", Some("ada@example.com")),
            ],
            || {
                let identity = git(bin.path()).init(project.path(), &settings(true)).unwrap();
                assert_eq!(identity.name, "Ada Lovelace");
                assert_eq!(identity.email.as_deref(), Some("ada@example.com"));
            },
        );

        assert!(Git::is_repository(project.path()));
        assert_eq!(
            fs::read_to_string(project.path().join("README.md")).unwrap(),
            "# Demo\n"
        );
        let calls = fs::read_to_string(&log).unwrap();
        assert!(calls.contains("init --quiet --initial-branch=main"));
        assert!(calls.contains("add -- README.md"));
        assert!(calls.contains("commit --quiet -m Initial commit"));
    }

    #[test]
    #[serial_test::serial]
    fn test_missing_identity_aborts_before_init() {
        let bin = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let log = bin.path().join("git.log");

        temp_env::with_vars(
            [
                ("GIT_LOG", Some(log.to_str().unwrap())),
                ("FAKE_NAME", Some("Ada")),
                ("FAKE_EMAIL", None),
            ],
            || {
                let err = git(bin.path()).init(project.path(), &settings(true)).unwrap_err();
                match err {
                    Error::Subprocess { stderr, .. } => assert!(stderr.contains("user.email")),
                    other => panic!("unexpected error {other:?}"),
                }
            },
        );
        assert!(!Git::is_repository(project.path()));
    }

    #[test]
    #[serial_test::serial]
    fn test_email_not_required_when_disabled() {
        let bin = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let log = bin.path().join("git.log");

        temp_env::with_vars(
            [
                ("GIT_LOG", Some(log.to_str().unwrap())),
                ("FAKE_NAME", Some("Ada")),
                ("FAKE_EMAIL", None),
            ],
            || {
                let identity = git(bin.path()).init(project.path(), &settings(false)).unwrap();
                assert_eq!(identity.email, None);
            },
        );
    }

    #[test]
    #[serial_test::serial]
    fn test_existing_repository_is_not_reinitialized() {
        let bin = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        fs::create_dir(project.path().join(".git")).unwrap();
        let log = bin.path().join("git.log");

        temp_env::with_vars(
            [
                ("GIT_LOG", Some(log.to_str().unwrap())),
                ("FAKE_NAME", Some("Ada")),
                ("FAKE_EMAIL", Some("ada@example.com")),
            ],
            || {
                git(bin.path()).init(project.path(), &settings(true)).unwrap();
            },
        );

        let calls = fs::read_to_string(&log).unwrap();
        assert!(!calls.contains("init"));
        assert!(!project.path().join("README.md").exists());
    }

    #[test]
    #[serial_test::serial]
    fn test_real_git_when_available() {
        let Some(binary) = Locator::system().resolve_optional("git") else {
            eprintln!("skipping: git is not installed");
            return;
        };
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let global = home.path().join("gitconfig");
        fs::write(
            &global,
            "[user]\n\tname = Ada Lovelace\n\temail = ada@example.com\n[commit]\n\tgpgsign = false\n",
        )
        .unwrap();

        temp_env::with_vars(
            [
                ("GIT_CONFIG_GLOBAL", Some(global.to_str().unwrap())),
                ("GIT_CONFIG_NOSYSTEM", Some("1")),
            ],
            || {
                let identity = Git::new(binary)
                    .init(project.path(), &settings(true))
                    .unwrap();
                assert_eq!(identity.name, "Ada Lovelace");
            },
        );
        assert!(Git::is_repository(project.path()));
    }
}
