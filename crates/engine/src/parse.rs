//! Parsers for tool output
//!
//! Every function here is pure: raw text in, structured values out. Format
//! drift in a tool's output is fixed here without touching orchestration.

use culting_core::VersionRecord;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// `Python 3.13.0 experimental free-threading build (main, ...)`
static INTERPRETER_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Python (3\.\d+)").expect("valid regex"));

/// Free-threaded builds mention this in `-VV` output
const FREE_THREADING_MARKER: &str = "free-threading build";

/// `3.12`, `3.12.4`, `3.13.0rc1`, `3.13.1t`, `3.13.1+freethreaded`
static VERSION_IN_LISTING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(3\.\d{1,2})(?:\.\d+)?(?:(?:a|b|rc)\d+)?(t|\+freethreaded)?\b")
        .expect("valid regex")
});

/// `3.12.4` or `3.13.1t` as printed by `pyenv versions --bare`
static PYENV_FULL_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(3\.\d{1,2})\.(\d+)(t?)$").expect("valid regex"));

/// ` -V:3.13t *       C:\Python313\python3.13t.exe` or the older ` -3.12-64  C:\...`
static PY_LIST_PATHS_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*-(?:V:)?(3\.\d{1,2})(t?)(?:-\d{2})?\s*(\*)?\s+(\S.*?)\s*$")
        .expect("valid regex")
});

/// One interpreter registered with the Windows `py` launcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherEntry {
    /// Registered version
    pub version: VersionRecord,
    /// Interpreter executable
    pub path: PathBuf,
    /// Marked with `*` as the launcher default
    pub is_default: bool,
}

/// Extract the interpreter version from `python -VV` output
///
/// The free-threaded flag is set when the build marker is present.
#[must_use]
pub fn interpreter_version(output: &str) -> Option<VersionRecord> {
    let caps = INTERPRETER_VERSION.captures(output)?;
    let free_threaded = output.contains(FREE_THREADING_MARKER);
    Some(VersionRecord::new(&caps[1], free_threaded))
}

/// Extract every `major.minor[t]` version mentioned in a listing
///
/// The result is de-duplicated and ordered, see [`sort_versions`].
#[must_use]
pub fn version_list(output: &str) -> Vec<VersionRecord> {
    let found = VERSION_IN_LISTING
        .captures_iter(output)
        .map(|caps| VersionRecord::new(&caps[1], caps.get(2).is_some()))
        .collect();
    sort_versions(found)
}

/// Order versions by ascending minor, standard builds before free-threaded
/// builds of the same minor, and drop duplicates
#[must_use]
pub fn sort_versions(mut versions: Vec<VersionRecord>) -> Vec<VersionRecord> {
    versions.sort_by_key(|v| (v.minor(), v.free_threaded()));
    versions.dedup();
    versions
}

/// Pick the newest installed patch release of `version` from
/// `pyenv versions --bare --skip-envs`
///
/// Returns the full version name, e.g. `3.12.10` for `3.12`.
#[must_use]
pub fn pyenv_full_version(output: &str, version: &VersionRecord) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            let caps = PYENV_FULL_VERSION.captures(line)?;
            let matches = &caps[1] == version.major_minor()
                && caps[3].is_empty() != version.free_threaded();
            let patch: u32 = caps[2].parse().ok()?;
            matches.then(|| (patch, line.to_string()))
        })
        .max_by_key(|(patch, _)| *patch)
        .map(|(_, name)| name)
}

/// Parse `py --list-paths` output
#[must_use]
pub fn launcher_entries(output: &str) -> Vec<LauncherEntry> {
    output
        .lines()
        .filter_map(|line| {
            let caps = PY_LIST_PATHS_ENTRY.captures(line)?;
            Some(LauncherEntry {
                version: VersionRecord::new(&caps[1], !caps[2].is_empty()),
                path: PathBuf::from(&caps[4]),
                is_default: caps.get(3).is_some(),
            })
        })
        .collect()
}

/// Path of the launcher's default interpreter (the entry marked `*`)
#[must_use]
pub fn launcher_default(output: &str) -> Option<PathBuf> {
    launcher_entries(output)
        .into_iter()
        .find(|entry| entry.is_default)
        .map(|entry| entry.path)
}

/// Path registered with the launcher for an exact version
#[must_use]
pub fn launcher_path(output: &str, version: &VersionRecord) -> Option<PathBuf> {
    launcher_entries(output)
        .into_iter()
        .find(|entry| &entry.version == version)
        .map(|entry| entry.path)
}

/// Parse `uv python list --only-installed`, keeping interpreters that live
/// under `install_dir` (the output of `uv python dir`)
///
/// System interpreters uv merely discovered are skipped; culting only uses
/// the ones uv manages.
#[must_use]
pub fn uv_managed(output: &str, install_dir: &Path) -> Vec<(VersionRecord, PathBuf)> {
    output
        .lines()
        .filter_map(|line| {
            let (key, rest) = line.trim().split_once(char::is_whitespace)?;
            // `path -> symlink target`
            let path = rest.trim().split(" -> ").next()?.trim();
            let path = PathBuf::from(path);
            if !path.starts_with(install_dir) {
                return None;
            }
            let caps = VERSION_IN_LISTING.captures(key)?;
            Some((VersionRecord::new(&caps[1], caps.get(2).is_some()), path))
        })
        .collect()
}
