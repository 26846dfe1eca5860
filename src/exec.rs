use std::path::Path;
use std::process::{Command, ExitStatus};

use anyhow::{bail, Context, Result};

/// True when `bin` resolves to a file on `PATH`.
pub(crate) fn is_in_path(bin: &str) -> bool {
    let Some(path) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path).any(|dir| dir.join(bin).is_file())
}

/// Runs `bin args..` inside `dir`, failing on a non-zero exit.
pub(crate) fn run_in(dir: &Path, bin: &str, args: &[&str]) -> Result<ExitStatus> {
    let line = format!("{bin} {}", args.join(" "));
    tracing::debug!(dir = %dir.display(), command = %line, "running");
    let status = Command::new(bin)
        .current_dir(dir)
        .args(args)
        .status()
        .with_context(|| format!("Failed to spawn `{line}`"))?;
    if !status.success() {
        bail!("`{line}` failed with status: {status}");
    }
    Ok(status)
}

/// Prompts need both ends attached to a terminal.
pub(crate) fn can_prompt() -> bool {
    use std::io::IsTerminal;
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}
