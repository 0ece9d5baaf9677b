//! End-to-end project initialization against fake tools

#![cfg(unix)]
#![allow(clippy::unwrap_used, clippy::panic)]

mod common;

use common::{FAKE_GIT, FAKE_PYTHON, StaticAssets, fake_bin};
use culting_config::Config;
use culting_core::{Error, OperatingSystem};
use culting_engine::{
    Binary, Git, InitOptions, InitStage, Interpreter, ProjectInitializer,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct Tools {
    bin: TempDir,
    git: Git,
    python: Interpreter,
}

fn tools() -> Tools {
    let bin = TempDir::new().unwrap();
    let git = Git::new(Binary::new("git", fake_bin(bin.path(), "git", FAKE_GIT)));
    let python = Interpreter::new(Binary::new(
        "python3",
        fake_bin(bin.path(), "python3", FAKE_PYTHON),
    ));
    Tools { bin, git, python }
}

fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            (
                entry.file_name().to_string_lossy().into_owned(),
                fs::read(entry.path()).unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_init_empty_path_derives_name() {
    let tools = tools();
    let work = TempDir::new().unwrap();
    let target = work.path().join("demo");
    let assets = StaticAssets::default();
    let mut stages = Vec::new();

    let project = {
        let mut initializer = ProjectInitializer::new(
            InitOptions::from_config(&target, &Config::default()),
            OperatingSystem::Posix,
            tools.python.clone(),
            tools.git.clone(),
            &assets,
        )
        .unwrap()
        .on_stage(|stage| stages.push(stage));
        initializer.run().unwrap()
    };

    assert_eq!(project.name, "demo");
    assert_eq!(project.python_version.to_string(), "3.12");
    assert!(target.join(".git").is_dir());
    assert!(project.venv_path.is_dir());
    assert_eq!(project.venv_python, target.join(".venv/bin/python"));

    let pyproject = fs::read_to_string(target.join("pyproject.toml")).unwrap();
    assert!(pyproject.contains("\"demo\""));
    assert!(pyproject.contains("requires-python = \">=3.12\""));

    let license = fs::read_to_string(target.join("LICENSE")).unwrap();
    assert!(license.contains("Ada Lovelace <ada@example.com>"));
    assert!(!license.contains("[year]"));

    for file in [
        "README.md",
        ".gitignore",
        "requirements.in",
        "requirements.lock",
        "src/demo/__init__.py",
        "src/demo/__main__.py",
        "src/demo/py.typed",
        "tests/__init__.py",
    ] {
        assert!(target.join(file).is_file(), "{file} should exist");
    }

    let pip_log = fs::read_to_string(target.join(".venv/pip.log")).unwrap();
    assert!(pip_log.contains("-m pip install --disable-pip-version-check --quiet --upgrade pip pip-tools"));

    assert_eq!(
        stages,
        [
            InitStage::EmptyDirVerified,
            InitStage::NameValidated,
            InitStage::VcsInitialized,
            InitStage::TemplateAssetsWritten,
            InitStage::VenvCreated,
            InitStage::BaselineToolingInstalled,
            InitStage::Done,
        ]
    );
}

#[test]
fn test_init_non_empty_path_changes_nothing() {
    let tools = tools();
    let work = TempDir::new().unwrap();
    fs::write(work.path().join("notes.txt"), "keep me").unwrap();
    fs::create_dir(work.path().join("data")).unwrap();
    let before = snapshot(work.path());
    let assets = StaticAssets::default();

    let mut initializer = ProjectInitializer::new(
        InitOptions::from_config(work.path(), &Config::default()),
        OperatingSystem::Posix,
        tools.python.clone(),
        tools.git.clone(),
        &assets,
    )
    .unwrap();
    let err = initializer.run().unwrap_err();

    assert!(err.is_init(), "unexpected error {err:?}");
    assert_eq!(initializer.stage(), InitStage::Pending);
    assert_eq!(snapshot(work.path()), before);
    assert!(!tools.bin.path().join("git.log").exists());
    assert_eq!(assets.calls.get(), 0);
}

#[test]
fn test_invalid_name_stops_before_git() {
    let tools = tools();
    let work = TempDir::new().unwrap();
    let mut options = InitOptions::from_config(work.path().join("demo"), &Config::default());
    options.name = Some("My-Project".to_string());
    let assets = StaticAssets::default();

    let mut initializer = ProjectInitializer::new(
        options,
        OperatingSystem::Posix,
        tools.python.clone(),
        tools.git.clone(),
        &assets,
    )
    .unwrap();
    let err = initializer.run().unwrap_err();

    assert!(matches!(err, Error::Init(_)));
    assert_eq!(initializer.stage(), InitStage::EmptyDirVerified);
    assert!(!tools.bin.path().join("git.log").exists());
}

#[test]
fn test_fetch_failure_leaves_partial_project() {
    let tools = tools();
    let work = TempDir::new().unwrap();
    let target = work.path().join("demo");
    let assets = StaticAssets {
        fail: true,
        ..StaticAssets::default()
    };

    let mut initializer = ProjectInitializer::new(
        InitOptions::from_config(&target, &Config::default()),
        OperatingSystem::Posix,
        tools.python.clone(),
        tools.git.clone(),
        &assets,
    )
    .unwrap();
    let err = initializer.run().unwrap_err();

    assert!(matches!(err, Error::Fetch(_)));
    assert_eq!(initializer.stage(), InitStage::VcsInitialized);
    // No rollback: the repository and readme stay, nothing else was written
    assert!(target.join(".git").is_dir());
    assert!(target.join("README.md").is_file());
    assert!(!target.join("LICENSE").exists());
    assert!(!target.join("pyproject.toml").exists());
    assert!(!target.join(".venv").exists());
}

#[test]
fn test_venv_failure_is_fatal() {
    let tools = tools();
    let broken = Interpreter::new(Binary::new(
        "python3",
        fake_bin(
            tools.bin.path(),
            "broken-python",
            r#"[ "$1" = "-VV" ] && echo "Python 3.11.2" && exit 0
echo "Error: ensurepip is not available" >&2
exit 1"#,
        ),
    ));
    let work = TempDir::new().unwrap();
    let target = work.path().join("demo");
    let assets = StaticAssets::default();

    let mut initializer = ProjectInitializer::new(
        InitOptions::from_config(&target, &Config::default()),
        OperatingSystem::Posix,
        broken,
        tools.git.clone(),
        &assets,
    )
    .unwrap();
    let err = initializer.run().unwrap_err();

    assert!(matches!(err, Error::Subprocess { .. }));
    assert_eq!(initializer.stage(), InitStage::TemplateAssetsWritten);
    assert!(target.join("pyproject.toml").is_file());
}
