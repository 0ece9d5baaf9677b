//! Build script for culting-cli.
//!
//! Emits build, rustc and git metadata through vergen for `culting --version`.

use vergen_git2::{Emitter, Git2Builder};

fn main() -> anyhow::Result<()> {
    let build = vergen::BuildBuilder::default().build_date(true).build()?;
    let rustc = vergen::RustcBuilder::default().semver(true).build()?;

    vergen::Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&rustc)?
        .emit()?;

    // Falls back to placeholder values outside a repository
    let git2 = Git2Builder::default().sha(true).commit_date(true).build()?;
    Emitter::default().add_instructions(&git2)?.emit()?;

    Ok(())
}
