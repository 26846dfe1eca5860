use std::path::Path;

use anyhow::{Context, Result};

use scaffold_cli::answers::{default_repo, default_staging_name, Answers, PartialAnswers, Runner};
use scaffold_cli::artifacts::{
    self, build_artifacts, template_source, DATABASE_PRODUCTION, GEMFILE_ADDITIONS,
};
use scaffold_cli::project_edits::{
    append_gemfile, insert_application_config, replace_production_section, APPLICATION_CONFIG,
};

use crate::cli::NewArgs;
use crate::exec;
use crate::prompt;
use crate::writer::{self, ForceRequired};

pub(crate) fn cmd_new(args: NewArgs) -> Result<()> {
    let dir = args.dir.clone();

    let interactive = !args.non_interactive && exec::can_prompt();
    let answers = gather_answers(&args, interactive)?;
    tracing::debug!(?answers, interactive, "resolved answers");

    let override_dir = artifacts::override_dir();
    let override_dir = override_dir.as_deref();
    let files = build_artifacts(&answers, override_dir)?;

    let existing = writer::existing_targets(&dir, &files);
    if !existing.is_empty() && !args.force {
        if !interactive {
            return Err(ForceRequired {
                target: existing[0].clone(),
            }
            .into());
        }
        for p in &existing {
            println!("{:>8}  {}", "exists", p.display());
        }
        let ok = prompt::confirm(
            &format!("{} file(s) already exist. Overwrite?", existing.len()),
            false,
        )?;
        if !ok {
            println!("Cancelled. Nothing was written to {}", dir.display());
            return Ok(());
        }
    }

    // Only create the project dir once nothing can stop the run.
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let additions = template_source(GEMFILE_ADDITIONS, override_dir)?;
    writer::append_file(&dir, "Gemfile", |gemfile| append_gemfile(gemfile, &additions))?;

    if !args.skip_install {
        install_packages(&dir);
    }

    let production = template_source(DATABASE_PRODUCTION, override_dir)?;
    writer::patch_file(&dir, "config/database.yml", |text| {
        replace_production_section(text, &production)
    })?;

    for file in &files {
        writer::write_artifact(&dir, file)?;
    }

    writer::patch_file(&dir, "config/application.rb", |text| {
        APPLICATION_CONFIG
            .iter()
            .try_fold(text.to_string(), |rb, line| insert_application_config(&rb, line))
    })?;

    println!(
        "Scaffolded {} (production: {}, staging: {}, repo: {})",
        dir.display(),
        answers.app_name,
        answers.staging_name,
        answers.repo
    );
    Ok(())
}

fn gather_answers(args: &NewArgs, interactive: bool) -> Result<Answers> {
    let flags = PartialAnswers {
        app_name: args.app_name.clone(),
        staging_name: args.staging_name.clone(),
        repo: args.repo.clone(),
        pipeline: args.pipeline.clone(),
        runner: args.runner,
        ..Default::default()
    };
    let file = match &args.answers {
        Some(path) => PartialAnswers::load(path)?,
        None => PartialAnswers::default(),
    };
    let mut partial = flags.or(file);
    if interactive {
        partial = ask_missing(partial)?;
    }
    partial.finish()
}

fn missing(v: &Option<String>) -> bool {
    v.as_deref().map_or(true, |s| s.trim().is_empty())
}

fn ask_missing(mut p: PartialAnswers) -> Result<PartialAnswers> {
    if missing(&p.app_name) {
        p.app_name = Some(prompt::input("Heroku production app name?", None)?);
    }
    let app_name = p.app_name.clone().unwrap_or_default();

    if missing(&p.staging_name) {
        let default = default_staging_name(&app_name);
        p.staging_name = Some(prompt::input(
            "Heroku staging app name?",
            Some(default.as_str()),
        )?);
    }
    if p.runner.is_none() {
        let cloud = prompt::confirm("Use GitHub cloud runners? (no for self-hosted)", false)?;
        p.runner = Some(if cloud {
            Runner::Cloud
        } else {
            Runner::SelfHosted
        });
    }
    if missing(&p.pipeline) {
        p.pipeline = Some(prompt::input("Heroku pipeline uuid?", None)?);
    }
    if missing(&p.repo) {
        let default = default_repo(p.default_org(), &app_name);
        p.repo = Some(prompt::input(
            "GitHub repository? (format: orga/repo)",
            Some(default.as_str()),
        )?);
    }
    Ok(p)
}

fn install_packages(dir: &Path) {
    for tool in ["bundle", "yarn"] {
        if !exec::is_in_path(tool) {
            tracing::warn!("{tool} not found in PATH; skipping `{tool} install`");
            continue;
        }
        println!("{:>8}  {tool} install", "run");
        if let Err(e) = exec::run_in(dir, tool, &["install"]) {
            tracing::warn!("{e:#}");
        }
    }
}
