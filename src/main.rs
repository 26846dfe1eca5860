mod cli;
mod commands;
mod exec;
mod logging;
mod prompt;
mod writer;

fn main() -> anyhow::Result<()> {
    logging::init();
    crate::cli::run()
}
