use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use scaffold_cli::answers::Runner;

use crate::commands;

#[derive(Parser, Debug)]
#[command(
    name = "scaffold",
    version,
    about = "Docker, GitHub Actions and Heroku review-app scaffolding for Rails projects"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the deployment scaffolding into a Rails project
    New(NewArgs),
    /// Print the short review-app name for a branch (no trailing newline)
    ShortName(ShortNameArgs),
    /// Print the deployment variables of a workflow job as key=value lines
    AppVars(AppVarsArgs),
}

#[derive(Args, Debug)]
pub(crate) struct NewArgs {
    /// Project directory
    #[arg(default_value = ".")]
    pub(crate) dir: PathBuf,
    /// Heroku production app name
    #[arg(long)]
    pub(crate) app_name: Option<String>,
    /// Heroku staging app name (default: <app-name>-staging)
    #[arg(long)]
    pub(crate) staging_name: Option<String>,
    /// GitHub repository as orga/repo (default: zeitdev/<app-name>)
    #[arg(long)]
    pub(crate) repo: Option<String>,
    /// Heroku pipeline uuid
    #[arg(long)]
    pub(crate) pipeline: Option<String>,
    /// Where the test and master deploy workflows run
    #[arg(long, value_enum)]
    pub(crate) runner: Option<Runner>,
    /// Read answers from a .toml, .yaml/.yml or .json file
    #[arg(long)]
    pub(crate) answers: Option<PathBuf>,
    /// Never prompt; fail on missing answers and existing files
    #[arg(long)]
    pub(crate) non_interactive: bool,
    /// Overwrite files that already exist
    #[arg(long)]
    pub(crate) force: bool,
    /// Do not run `bundle install` / `yarn install`
    #[arg(long)]
    pub(crate) skip_install: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ShortNameArgs {
    /// Application base name
    #[arg(allow_hyphen_values = true)]
    pub(crate) prefix: String,
    /// Source branch name
    #[arg(allow_hyphen_values = true)]
    pub(crate) branch: String,
    /// Commit or content hash
    #[arg(allow_hyphen_values = true)]
    pub(crate) hash: String,
}

#[derive(Args, Debug)]
pub(crate) struct AppVarsArgs {
    /// Prefix for the buildx cache keys (e.g. `deploy`, `tests`)
    pub(crate) tag_prefix: String,
    /// Git ref of the job (`refs/heads/<branch>` or a bare branch name)
    #[arg(value_name = "REF")]
    pub(crate) git_ref: String,
    /// `staging`, `master`, or omitted for a review app
    pub(crate) target: Option<String>,
    /// Heroku production app name
    #[arg(long)]
    pub(crate) app_name: String,
    /// Heroku staging app name (default: <app-name>-staging)
    #[arg(long)]
    pub(crate) staging_name: Option<String>,
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::New(args) => commands::new::cmd_new(args),
        Commands::ShortName(args) => commands::short_name::cmd_short_name(args),
        Commands::AppVars(args) => commands::app_vars::cmd_app_vars(args),
    }
}
