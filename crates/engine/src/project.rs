//! Project initialization
//!
//! [`ProjectInitializer`] walks a fixed sequence of stages:
//!
//! ```text
//! Pending → EmptyDirVerified → NameValidated → VcsInitialized
//!         → TemplateAssetsWritten → VenvCreated → BaselineToolingInstalled → Done
//! ```
//!
//! The first failure aborts the sequence. Nothing is rolled back: a project
//! directory that got past the first stage stays on disk as it was left, and
//! the error log names the stage that failed.

use crate::git::{Git, GitIdentity, RepoSettings};
use crate::python::Interpreter;
use crate::venv::Venv;
use crate::{Error, Result};
use culting_config::Config;
use culting_core::{OperatingSystem, VersionRecord};
use culting_template::{AssetSource, ProjectContext, TemplateEngine};
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Lowercase identifier, at least two characters
static PROJECT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_]+$").expect("valid regex"));

/// Result of a successful name check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameCheck {
    /// Nothing to report
    Valid,
    /// Accepted, but leading underscores are meant for special use
    LeadingUnderscore,
}

/// Validate a project name
///
/// # Errors
///
/// Returns [`Error::Init`] for names that are not lowercase identifiers.
pub fn validate_project_name(name: &str) -> Result<NameCheck> {
    if !PROJECT_NAME.is_match(name) {
        return Err(Error::Init(format!(
            "Invalid project name '{name}': use lowercase letters, digits and underscores, \
             starting with a letter or underscore"
        )));
    }
    if name.starts_with('_') {
        tracing::warn!("Name '{name}' has a leading underscore, which is meant for special use");
        return Ok(NameCheck::LeadingUnderscore);
    }
    Ok(NameCheck::Valid)
}

/// Make `path` absolute, create it if needed and require it to be empty
///
/// # Errors
///
/// Returns [`Error::DirectoryNotEmpty`] if anything is already inside.
pub fn ensure_empty_dir(path: &Path) -> Result<PathBuf> {
    let path = std::path::absolute(path)?;
    if path.exists() && !path.is_dir() {
        return Err(Error::Init(format!(
            "Target exists and is not a directory: {}",
            path.display()
        )));
    }
    fs::create_dir_all(&path)?;
    if fs::read_dir(&path)?.next().is_some() {
        return Err(Error::DirectoryNotEmpty(path));
    }
    Ok(path)
}

/// Stages of project initialization, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum InitStage {
    /// Nothing done yet
    Pending,
    /// Target directory exists and is empty
    EmptyDirVerified,
    /// Project name accepted
    NameValidated,
    /// Repository created with the readme committed
    VcsInitialized,
    /// License, ignore file, manifest and package skeleton written
    TemplateAssetsWritten,
    /// Virtual environment created
    VenvCreated,
    /// Baseline packages installed into the venv
    BaselineToolingInstalled,
    /// Finished
    Done,
}

impl InitStage {
    /// Short description for progress output
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::EmptyDirVerified => "target directory verified",
            Self::NameValidated => "project name validated",
            Self::VcsInitialized => "git repository initialized",
            Self::TemplateAssetsWritten => "project files written",
            Self::VenvCreated => "virtual environment created",
            Self::BaselineToolingInstalled => "baseline tooling installed",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Layout and naming choices for a new project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOptions {
    /// Target directory
    pub path: PathBuf,
    /// Project name, derived from the directory when absent
    pub name: Option<String>,
    /// Venv directory, relative to the project
    pub venv: String,
    /// Source folder, relative to the project
    pub src: String,
    /// Readme file name
    pub readme: String,
    /// License file name
    pub license_file: String,
    /// License key
    pub license: String,
    /// Ignore-file template name
    pub gitignore: String,
    /// Packages installed into the venv
    pub baseline: Vec<String>,
    /// Require an email in the git identity
    pub use_email: bool,
    /// Initial branch
    pub default_branch: String,
    /// First commit message
    pub initial_commit_message: String,
}

impl InitOptions {
    /// Options for `path` with every choice taken from configuration
    #[must_use]
    pub fn from_config(path: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            path: path.into(),
            name: None,
            venv: config.package.venv.clone(),
            src: config.package.src.clone(),
            readme: config.package.readme.clone(),
            license_file: config.package.license_file.clone(),
            license: config.package.license.clone(),
            gitignore: config.assets.gitignore.clone(),
            baseline: config.package.baseline.clone(),
            use_email: config.git.use_email,
            default_branch: config.git.default_branch.clone(),
            initial_commit_message: config.git.initial_commit_message.clone(),
        }
    }
}

/// A successfully initialized project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    /// Validated package name
    pub name: String,
    /// Absolute project directory
    pub path: PathBuf,
    /// Interpreter the venv was created from
    pub python_path: PathBuf,
    /// Its version
    pub python_version: VersionRecord,
    /// Venv directory
    pub venv_path: PathBuf,
    /// Interpreter inside the venv
    pub venv_python: PathBuf,
    /// Author identity from git
    pub author: GitIdentity,
}

/// Drives the initialization stages
pub struct ProjectInitializer<'a> {
    options: InitOptions,
    os: OperatingSystem,
    interpreter: Interpreter,
    git: Git,
    assets: &'a dyn AssetSource,
    templates: TemplateEngine,
    stage: InitStage,
    on_stage: Option<Box<dyn FnMut(InitStage) + 'a>>,
}

impl<'a> ProjectInitializer<'a> {
    /// Prepare an initializer; nothing is touched until [`Self::run`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if the embedded templates fail to load.
    pub fn new(
        options: InitOptions,
        os: OperatingSystem,
        interpreter: Interpreter,
        git: Git,
        assets: &'a dyn AssetSource,
    ) -> Result<Self> {
        Ok(Self {
            options,
            os,
            interpreter,
            git,
            assets,
            templates: TemplateEngine::new()?,
            stage: InitStage::Pending,
            on_stage: None,
        })
    }

    /// Call `callback` each time a stage completes
    #[must_use]
    pub fn on_stage(mut self, callback: impl FnMut(InitStage) + 'a) -> Self {
        self.on_stage = Some(Box::new(callback));
        self
    }

    /// Last stage reached
    #[must_use]
    pub fn stage(&self) -> InitStage {
        self.stage
    }

    /// Run every stage
    ///
    /// # Errors
    ///
    /// Returns the first failure. The project directory is left as is.
    pub fn run(&mut self) -> Result<ProjectDescriptor> {
        let result = self.run_stages();
        if let Err(e) = &result {
            tracing::error!(
                reached = %self.stage,
                path = %self.options.path.display(),
                "Project initialization stopped: {e}"
            );
            if self.stage >= InitStage::EmptyDirVerified {
                tracing::warn!(
                    "Partially initialized project left at {}, remove it before retrying",
                    self.options.path.display()
                );
            }
        }
        result
    }

    fn advance(&mut self, stage: InitStage) {
        self.stage = stage;
        tracing::debug!(%stage, "Initialization stage reached");
        if let Some(callback) = self.on_stage.as_mut() {
            callback(stage);
        }
    }

    fn run_stages(&mut self) -> Result<ProjectDescriptor> {
        // Pre-flight, no side effects
        let python_version = self.interpreter.version()?;

        let path = ensure_empty_dir(&self.options.path)?;
        self.options.path.clone_from(&path);
        self.advance(InitStage::EmptyDirVerified);

        let name = match &self.options.name {
            Some(name) => name.clone(),
            None => dir_name(&path)?,
        };
        validate_project_name(&name)?;
        tracing::info!("Initializing package '{name}'");
        self.advance(InitStage::NameValidated);

        let context = ProjectContext::new(&name)
            .with_python(&python_version)
            .with_layout(
                self.os,
                &self.options.venv,
                &self.options.src,
                &self.options.readme,
                &self.options.license_file,
            )
            .with_license(&self.options.license);
        let readme = self.templates.render("README.md", &context)?;
        let author = self.git.init(
            &path,
            &RepoSettings {
                branch: &self.options.default_branch,
                commit_message: &self.options.initial_commit_message,
                readme_name: &self.options.readme,
                readme: &readme,
                use_email: self.options.use_email,
            },
        )?;
        self.advance(InitStage::VcsInitialized);

        let context = context.with_author(&author.name, author.email.clone());
        self.write_assets(&path, &context)?;
        self.advance(InitStage::TemplateAssetsWritten);

        let venv_path = path.join(&self.options.venv);
        let venv = Venv::create(&self.interpreter, &venv_path, self.os)?;
        self.advance(InitStage::VenvCreated);

        venv.install(&self.options.baseline, self.interpreter.binary().timeout())?;
        self.advance(InitStage::BaselineToolingInstalled);

        self.advance(InitStage::Done);
        tracing::info!("Project '{name}' initialized at {}", path.display());

        Ok(ProjectDescriptor {
            name,
            path,
            python_path: self.interpreter.path().to_path_buf(),
            python_version,
            venv_python: venv.python_path(),
            venv_path,
            author,
        })
    }

    /// Fetch remote texts first so a fetch failure writes nothing
    fn write_assets(&self, root: &Path, context: &ProjectContext) -> Result<()> {
        let license = self.assets.license(&self.options.license)?;
        let gitignore = self.assets.gitignore(&self.options.gitignore)?;

        write_file(
            &root.join(&self.options.license_file),
            &TemplateEngine::fill_license(&license, context),
        )?;
        write_file(
            &root.join(".gitignore"),
            &ignore_venv(gitignore, &self.options.venv),
        )?;
        write_file(
            &root.join("pyproject.toml"),
            &self.templates.render("pyproject.toml", context)?,
        )?;
        write_file(&root.join("requirements.in"), "")?;
        write_file(&root.join("requirements.lock"), "")?;

        let package = root.join(&self.options.src).join(&context.name);
        write_file(
            &package.join("__init__.py"),
            &self.templates.render("__init__.py", context)?,
        )?;
        write_file(
            &package.join("__main__.py"),
            &self.templates.render("__main__.py", context)?,
        )?;
        write_file(&package.join("py.typed"), "")?;
        write_file(&root.join("tests").join("__init__.py"), "")?;

        tracing::debug!(path = %root.display(), "Project files written");
        Ok(())
    }
}

fn dir_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            Error::Init(format!(
                "Cannot derive a project name from {}, pass one explicitly",
                path.display()
            ))
        })
}

/// Make sure the venv directory is ignored even when renamed
fn ignore_venv(mut gitignore: String, venv: &str) -> String {
    let venv = venv.trim_matches('/');
    let listed = gitignore
        .lines()
        .any(|line| line.trim().trim_matches('/') == venv);
    if !listed {
        if !gitignore.is_empty() && !gitignore.ends_with('\n') {
            gitignore.push('\n');
        }
        gitignore.push_str(&format!("\n# culting virtual environment\n/{venv}/\n"));
    }
    gitignore
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
