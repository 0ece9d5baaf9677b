//! Hermetic fakes for the external tools

#![allow(dead_code, clippy::unwrap_used)]

use culting_core::{Error, Result};
use culting_template::AssetSource;
use std::cell::Cell;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// git that creates `.git`, knows an identity and logs its calls
pub const FAKE_GIT: &str = r#"
echo "$@" >> "$(dirname "$0")/git.log"
if [ "$1" = "-C" ]; then shift 2; fi
case "$1" in
  init) mkdir -p "$4/.git" ;;
  config)
    case "$2" in
      user.name) echo "Ada Lovelace" ;;
      user.email) echo "ada@example.com" ;;
    esac
    ;;
esac
"#;

/// python whose venv module writes a venv python that logs pip calls
pub const FAKE_PYTHON: &str = r#"
case "$1" in
  -VV) echo "Python 3.12.4 (main, Jun  6 2024, 18:26:44) [GCC 11.4.0]" ;;
  -m)
    if [ "$2" = "venv" ]; then
      mkdir -p "$3/bin"
      printf '#!/bin/sh\necho "$@" >> "$(dirname "$0")/../pip.log"\n' > "$3/bin/python"
      chmod +x "$3/bin/python"
    fi
    ;;
esac
"#;

pub fn fake_bin(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Fixed asset texts, optionally failing, counting calls
#[derive(Default)]
pub struct StaticAssets {
    pub fail: bool,
    pub calls: Cell<usize>,
}

impl AssetSource for StaticAssets {
    fn license(&self, id: &str) -> Result<String> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(Error::Fetch(format!("HTTP 503: license {id}")));
        }
        Ok("MIT License\n\nCopyright (c) [year] [fullname]\n".to_string())
    }

    fn gitignore(&self, _id: &str) -> Result<String> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(Error::Fetch("HTTP 503: gitignore".to_string()));
        }
        Ok("__pycache__/\n.venv\n".to_string())
    }
}
