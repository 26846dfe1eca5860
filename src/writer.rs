use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use scaffold_cli::artifacts::Artifact;

#[derive(Debug)]
pub(crate) struct ForceRequired {
    pub(crate) target: PathBuf,
}

impl fmt::Display for ForceRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Target exists: {}. Use --force to overwrite.",
            self.target.display()
        )
    }
}

impl std::error::Error for ForceRequired {}

pub(crate) fn existing_targets(dir: &Path, artifacts: &[Artifact]) -> Vec<PathBuf> {
    artifacts
        .iter()
        .map(|a| dir.join(&a.path))
        .filter(|p| p.exists())
        .collect()
}

pub(crate) fn write_artifact(dir: &Path, artifact: &Artifact) -> Result<()> {
    let target = dir.join(&artifact.path);
    let verb = if target.exists() { "force" } else { "create" };
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&target, &artifact.contents)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    if artifact.executable {
        make_executable(&target)?;
    }
    println!("{verb:>8}  {}", artifact.path.display());
    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms)
        .with_context(|| format!("Failed to chmod {}", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Rewrites `rel` under `dir` with `edit`. Returns `false` (and writes
/// nothing) when the file is missing or `edit` finds nothing to change.
pub(crate) fn patch_file(
    dir: &Path,
    rel: &str,
    edit: impl FnOnce(&str) -> Option<String>,
) -> Result<bool> {
    let path = dir.join(rel);
    if !path.is_file() {
        tracing::warn!(path = %path.display(), "file not found; skipping edit");
        println!("{:>8}  {rel}", "skip");
        return Ok(false);
    }
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let Some(updated) = edit(&text) else {
        tracing::warn!(path = %path.display(), "expected anchor not found; skipping edit");
        println!("{:>8}  {rel}", "skip");
        return Ok(false);
    };
    std::fs::write(&path, updated)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{:>8}  {rel}", "patch");
    Ok(true)
}

/// Appends to `rel` under `dir`, creating it when missing.
pub(crate) fn append_file(dir: &Path, rel: &str, edit: impl FnOnce(&str) -> String) -> Result<()> {
    let path = dir.join(rel);
    let existing = if path.exists() {
        std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    } else {
        String::new()
    };
    std::fs::write(&path, edit(&existing))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{:>8}  {rel}", "append");
    Ok(())
}
