use std::io::Write;

use anyhow::{Context, Result};

use scaffold_cli::short_name::derive_short_name;

use crate::cli::ShortNameArgs;

pub(crate) fn cmd_short_name(args: ShortNameArgs) -> Result<()> {
    let id = derive_short_name(&args.prefix, &args.branch, &args.hash);
    tracing::debug!(branch = %args.branch, short_name = %id, "derived short name");

    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{id}").context("Failed to write to stdout")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(())
}
