//! Diagnostics go to stderr so stdout only carries command output.

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub(crate) const LOG_ENV: &str = "SCAFFOLD_LOG";

pub(crate) fn init() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
