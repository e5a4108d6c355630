//! A CLI for inspecting and extracting Catacomb 3-D asset files.

mod cli;

use clap::Parser;

use crate::cli::Cli;

fn init_tracing(cli: &Cli) {
    // RUST_LOG wins when set; otherwise -v steps up from warnings.
    let default_level = match cli.verbosity() {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);
    cli.run()
}
