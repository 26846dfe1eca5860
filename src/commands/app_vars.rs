use std::io::Write;

use anyhow::{Context, Result};

use scaffold_cli::app_vars::{AppVars, AppVarsInput, Target};

use crate::cli::AppVarsArgs;

pub(crate) fn cmd_app_vars(args: AppVarsArgs) -> Result<()> {
    // Set by GitHub Actions; empty outside a runner, as in the shell version.
    let runner_os = std::env::var("RUNNER_OS").unwrap_or_default();
    let github_sha = std::env::var("GITHUB_SHA").unwrap_or_default();

    let vars = AppVars::resolve(&AppVarsInput {
        tag_prefix: &args.tag_prefix,
        git_ref: &args.git_ref,
        target: Target::from_arg(args.target.as_deref()),
        app_name: &args.app_name,
        staging_name: args.staging_name.as_deref(),
        runner_os: &runner_os,
        github_sha: &github_sha,
    });

    let mut stdout = std::io::stdout().lock();
    for (key, value) in vars.outputs() {
        writeln!(stdout, "{key}={value}").context("Failed to write to stdout")?;
    }
    Ok(())
}
