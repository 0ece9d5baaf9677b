//! Template context management
//!
//! The context provides data that is available to templates during rendering.

use chrono::Datelike;
use culting_core::{OperatingSystem, VersionRecord};
use serde::Serialize;

/// Context data available to project templates
#[derive(Debug, Clone, Serialize)]
pub struct ProjectContext {
    /// Validated package name
    pub name: String,

    /// Author name from the VCS identity
    pub author_name: String,

    /// Author email, absent when email usage is disabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,

    /// Interpreter version as rendered to users, e.g. `3.13t`
    pub python_version: String,

    /// `requires-python` constraint, e.g. `>=3.13`
    pub requires_python: String,

    /// Virtual environment directory, relative to the project root
    pub venv: String,

    /// Interpreter inside the venv, relative to the project root
    pub venv_python: String,

    /// Source folder, relative to the project root
    pub src: String,

    /// Readme file name
    pub readme: String,

    /// License file name
    pub license_file: String,

    /// License template identifier
    pub license: String,

    /// Trove classifier for the operating system
    pub os_classifier: String,

    /// Current year, used in license headers
    pub year: i32,
}

impl ProjectContext {
    /// Create a context with default layout for the given package name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            author_name: String::new(),
            author_email: None,
            python_version: String::new(),
            requires_python: String::new(),
            venv: ".venv".to_string(),
            venv_python: ".venv/bin/python".to_string(),
            src: "src".to_string(),
            readme: "README.md".to_string(),
            license_file: "LICENSE".to_string(),
            license: "mit".to_string(),
            os_classifier: OperatingSystem::Posix.classifier().to_string(),
            year: chrono::Local::now().year(),
        }
    }

    /// Set author information
    #[must_use]
    pub fn with_author(mut self, name: impl Into<String>, email: Option<String>) -> Self {
        self.author_name = name.into();
        self.author_email = email;
        self
    }

    /// Set interpreter version and derived constraint
    #[must_use]
    pub fn with_python(mut self, version: &VersionRecord) -> Self {
        self.python_version = version.to_string();
        self.requires_python = version.requires_python();
        self
    }

    /// Set the project layout for an operating-system family
    #[must_use]
    pub fn with_layout(
        mut self,
        os: OperatingSystem,
        venv: &str,
        src: &str,
        readme: &str,
        license_file: &str,
    ) -> Self {
        self.venv = venv.to_string();
        self.venv_python = os
            .venv_python(std::path::Path::new(venv))
            .to_string_lossy()
            .replace('\\', "/");
        self.src = src.to_string();
        self.readme = readme.to_string();
        self.license_file = license_file.to_string();
        self.os_classifier = os.classifier().to_string();
        self
    }

    /// Set the license template identifier
    #[must_use]
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = license.into();
        self
    }

    /// Copyright holder line for license texts
    #[must_use]
    pub fn copyright_holder(&self) -> String {
        match &self.author_email {
            Some(email) if !email.is_empty() => format!("{} <{email}>", self.author_name),
            _ => self.author_name.clone(),
        }
    }
}
